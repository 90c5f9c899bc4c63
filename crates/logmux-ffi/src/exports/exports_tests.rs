#![allow(non_snake_case)]

use super::*;
use logmux_handlers::{DefaultStreamFactory, MemoryPort};
use parking_lot::Mutex;
use std::ptr;
use std::sync::Arc;

// Serializes tests that use the global manager and platform
static GLOBAL_MANAGER_LOCK: Mutex<()> = Mutex::new(());

const JSON: u8 = DataFormat::Json as u8;

/// Attach a fresh in-memory port to the global `Serial` stream type
fn global_serial_port() -> Arc<MemoryPort> {
    let port = Arc::new(MemoryPort::new());
    DefaultStreamFactory::instance()
        .register_port(DefaultStreamFactory::SERIAL, port.clone())
        .unwrap();
    port
}

/// Run a request through the export, returning the reply on success
fn process(request: &str, capacity: usize) -> Option<String> {
    let mut buf = vec![0u8; capacity.max(request.len())];
    buf[..request.len()].copy_from_slice(request.as_bytes());
    let mut rep_size = 0usize;

    let ok = unsafe {
        logmux_process_request(buf.as_mut_ptr(), buf.len(), request.len(), &mut rep_size, JSON)
    };

    ok.then(|| String::from_utf8(buf[..rep_size].to_vec()).unwrap())
}

#[test]
fn logmux_process_request___null_buffer___invalid_argument() {
    let _guard = GLOBAL_MANAGER_LOCK.lock();
    let mut rep_size = 0usize;

    let ok = unsafe { logmux_process_request(ptr::null_mut(), 16, 4, &mut rep_size, JSON) };

    assert!(!ok);
    assert_eq!(logmux_last_error(), ERROR_INVALID_ARGUMENT);
}

#[test]
fn logmux_process_request___unknown_format___fails() {
    let _guard = GLOBAL_MANAGER_LOCK.lock();
    let mut buf = br#"{"cmd":"enumHandlers"}"#.to_vec();
    let len = buf.len();

    let ok = unsafe { logmux_process_request(buf.as_mut_ptr(), len, len, ptr::null_mut(), 9) };

    assert!(!ok);
    assert_eq!(logmux_last_error(), 14);
}

#[test]
fn logmux_process_request___request_larger_than_buffer___fails() {
    let _guard = GLOBAL_MANAGER_LOCK.lock();
    let mut buf = vec![0u8; 4];

    let ok = unsafe { logmux_process_request(buf.as_mut_ptr(), 4, 5, ptr::null_mut(), JSON) };

    assert!(!ok);
    assert_eq!(logmux_last_error(), 12);
}

#[test]
fn logmux_process_request___success_clears_last_error() {
    let _guard = GLOBAL_MANAGER_LOCK.lock();
    let mut buf = vec![0u8; 4];
    unsafe { logmux_process_request(buf.as_mut_ptr(), 4, 5, ptr::null_mut(), JSON) };

    let reply = process(r#"{"cmd":"enumHandlers"}"#, 256);

    assert!(reply.is_some());
    assert_eq!(logmux_last_error(), ERROR_NONE);
}

#[test]
fn logmux_process_request___add_log_remove___end_to_end() {
    let _guard = GLOBAL_MANAGER_LOCK.lock();
    logmux_shutdown();
    let port = global_serial_port();
    let category = c"app.net";

    let added = process(
        r#"{"cmd":"addHandler","id":"ffi-usb","hnd":{"type":"StreamLogHandler"},"strm":{"type":"Serial"},"lvl":"warn"}"#,
        256,
    );
    let listed = process(r#"{"cmd":"enumHandlers"}"#, 256);
    unsafe {
        logmux_log_message(LogLevel::Info as u8, category.as_ptr(), b"quiet".as_ptr(), 5);
        logmux_log_message(LogLevel::Error as u8, category.as_ptr(), b"loud".as_ptr(), 4);
    }
    let enabled = unsafe { logmux_log_enabled(LogLevel::Warn as u8, category.as_ptr()) };
    let removed = process(r#"{"cmd":"removeHandler","id":"ffi-usb"}"#, 256);

    assert_eq!(added.as_deref(), Some(""));
    assert_eq!(listed.as_deref(), Some(r#"["ffi-usb"]"#));
    assert_eq!(port.text(), "[app.net] ERROR: loud\r\n");
    assert!(enabled);
    assert_eq!(removed.as_deref(), Some(""));
    assert!(!unsafe { logmux_log_enabled(LogLevel::Panic as u8, ptr::null()) });
}

#[test]
fn logmux_process_request___unsupported_stream___reports_manager_code() {
    let _guard = GLOBAL_MANAGER_LOCK.lock();

    let reply = process(
        r#"{"cmd":"addHandler","id":"uart","hnd":{"type":"StreamLogHandler"},"strm":{"type":"Serial1"}}"#,
        256,
    );

    assert!(reply.is_none());
    assert_eq!(logmux_last_error(), 3);
}

#[test]
fn logmux_apply_config___invalid_json___config_error() {
    let _guard = GLOBAL_MANAGER_LOCK.lock();
    let config = b"{\"handlers\": [";

    let ok = unsafe { logmux_apply_config(config.as_ptr(), config.len()) };

    assert!(!ok);
    assert_eq!(logmux_last_error(), 7);
}

#[test]
fn logmux_apply_config___empty_config___succeeds() {
    let _guard = GLOBAL_MANAGER_LOCK.lock();
    let ok = unsafe { logmux_apply_config(ptr::null(), 0) };

    assert!(ok);
}

#[test]
fn logmux_apply_config___provisions_handlers() {
    let _guard = GLOBAL_MANAGER_LOCK.lock();
    logmux_shutdown();
    let port = global_serial_port();
    let config = br#"{"handlers":[{"id":"cfg","hnd":{"type":"JSONStreamLogHandler"},"strm":{"type":"Serial"},"lvl":"all"}]}"#;

    let ok = unsafe { logmux_apply_config(config.as_ptr(), config.len()) };
    unsafe { logmux_log_write(LogLevel::Info as u8, ptr::null(), b"raw".as_ptr(), 3) };
    logmux_shutdown();

    assert!(ok);
    assert!(port.text().contains("\"raw\""));
    assert!(!port.is_open());
}

#[test]
fn logmux_log_message___null_arguments___no_crash() {
    let _guard = GLOBAL_MANAGER_LOCK.lock();
    unsafe {
        logmux_log_message(LogLevel::Error as u8, ptr::null(), ptr::null(), 0);
        logmux_log_write(LogLevel::Error as u8, ptr::null(), ptr::null(), 10);
    }
}

#[test]
fn logmux_init___can_be_called_multiple_times() {
    let _guard = GLOBAL_MANAGER_LOCK.lock();
    assert!(logmux_init());
    assert!(logmux_init());
}

#[test]
fn logmux_log_message___invalid_utf8_category___still_filtered() {
    let _guard = GLOBAL_MANAGER_LOCK.lock();
    logmux_shutdown();
    let port = global_serial_port();
    let config = br#"{"handlers":[{"id":"quiet-app","hnd":{"type":"StreamLogHandler"},"strm":{"type":"Serial"},"filt":[{"cat":"app","lvl":"none"}],"lvl":"all"}]}"#;
    let garbled = b"app.\xff\0";
    let plain = c"sys";

    let ok = unsafe { logmux_apply_config(config.as_ptr(), config.len()) };
    let enabled = unsafe { logmux_log_enabled(LogLevel::Error as u8, garbled.as_ptr().cast()) };
    unsafe {
        logmux_log_message(LogLevel::Error as u8, garbled.as_ptr().cast(), b"hidden".as_ptr(), 6);
        logmux_log_message(LogLevel::Error as u8, plain.as_ptr(), b"shown".as_ptr(), 5);
    }
    logmux_shutdown();

    assert!(ok);
    assert!(!enabled);
    assert_eq!(port.text(), "[sys] ERROR: shown\r\n");
}
