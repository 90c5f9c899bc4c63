//! C ABI exported functions
//!
//! These functions are the entry points called by the platform's C code.
//! Functions returning `bool` record a numeric error code on failure that
//! [`logmux_last_error`] reports for the calling thread.

use crate::panic_guard::{catch_panic, install_panic_hook};
use logmux_core::{LogAttributes, LogLevel, LoggingConfig};
use logmux_manager::{LogManager, Platform, init_logging};
use logmux_protocol::{DataFormat, ProtocolError, RequestProcessor};
use std::borrow::Cow;
use std::cell::Cell;
use std::ffi::{CStr, c_char};
use std::panic::AssertUnwindSafe;

/// No error recorded
pub const ERROR_NONE: u32 = 0;
/// A panic was caught at the boundary
pub const ERROR_INTERNAL: u32 = 20;
/// A required pointer was null or a size was inconsistent
pub const ERROR_INVALID_ARGUMENT: u32 = 21;

thread_local! {
    static LAST_ERROR: Cell<u32> = const { Cell::new(ERROR_NONE) };
}

fn set_last_error(code: u32) {
    LAST_ERROR.with(|e| e.set(code));
}

/// Run `f` behind the panic guard, recording its error code on failure
fn guarded(f: impl FnOnce() -> Result<(), u32>) -> bool {
    let code = match catch_panic(AssertUnwindSafe(f)) {
        Ok(Ok(())) => ERROR_NONE,
        Ok(Err(code)) => code,
        Err(_) => ERROR_INTERNAL,
    };
    set_last_error(code);
    code == ERROR_NONE
}

/// Read an optional category name, replacing invalid UTF-8
///
/// # Safety
/// `category` must be null or a valid null-terminated C string.
unsafe fn category_arg<'a>(category: *const c_char) -> Option<Cow<'a, str>> {
    if category.is_null() {
        return None;
    }
    // SAFETY: caller guarantees a valid null-terminated string
    Some(unsafe { CStr::from_ptr(category) }.to_string_lossy())
}

/// Read a byte slice argument, treating null as empty
///
/// # Safety
/// `data` must be null or valid for `len` bytes.
unsafe fn bytes_arg<'a>(data: *const u8, len: usize) -> &'a [u8] {
    if data.is_null() || len == 0 {
        return &[];
    }
    // SAFETY: caller guarantees data is valid for len bytes
    unsafe { std::slice::from_raw_parts(data, len) }
}

/// Initialize the logging subsystem
///
/// Creates the global log manager, routes Rust `tracing` events into it,
/// and installs a panic hook that reports through the same path. Safe to
/// call more than once.
#[unsafe(no_mangle)]
pub extern "C" fn logmux_init() -> bool {
    guarded(|| {
        LogManager::instance();
        init_logging();
        install_panic_hook();
        Ok(())
    })
}

/// Process a control request in place
///
/// # Parameters
/// - `buf`: Buffer holding the request; the reply overwrites it
/// - `buf_size`: Total capacity of `buf`
/// - `req_size`: Number of request bytes at the start of `buf`
/// - `rep_size`: Receives the reply size on success
/// - `fmt`: Data format code (2 = JSON)
///
/// # Returns
/// `true` on success. On failure the buffer contents and `*rep_size` are
/// unspecified.
///
/// # Safety
/// - `buf` must be valid for reads and writes of `buf_size` bytes
/// - `rep_size` must be null or valid for a write
#[unsafe(no_mangle)]
pub unsafe extern "C" fn logmux_process_request(
    buf: *mut u8,
    buf_size: usize,
    req_size: usize,
    rep_size: *mut usize,
    fmt: u8,
) -> bool {
    guarded(|| unsafe { process_request_impl(buf, buf_size, req_size, rep_size, fmt) })
}

/// Internal implementation of logmux_process_request (wrapped by panic handler)
unsafe fn process_request_impl(
    buf: *mut u8,
    buf_size: usize,
    req_size: usize,
    rep_size: *mut usize,
    fmt: u8,
) -> Result<(), u32> {
    if buf.is_null() {
        return Err(ERROR_INVALID_ARGUMENT);
    }
    let format = DataFormat::from_u8(fmt)
        .ok_or(ProtocolError::UnsupportedFormat(fmt))
        .map_err(|e| e.error_code())?;

    // SAFETY: caller guarantees buf is valid for buf_size bytes
    let buffer = unsafe { std::slice::from_raw_parts_mut(buf, buf_size) };
    let size = RequestProcessor::global()
        .process(buffer, req_size, format)
        .map_err(|e| e.error_code())?;

    if !rep_size.is_null() {
        // SAFETY: caller guarantees rep_size is valid for a write
        unsafe { *rep_size = size };
    }
    Ok(())
}

/// Apply a JSON logging configuration to the global manager
///
/// The configuration has the form `{"handlers": [<addHandler fields>...]}`.
/// Handlers are added in order; the first failure stops the rest.
///
/// # Safety
/// `config_json` must be valid for `config_len` bytes if not null
#[unsafe(no_mangle)]
pub unsafe extern "C" fn logmux_apply_config(config_json: *const u8, config_len: usize) -> bool {
    guarded(|| {
        // SAFETY: caller guarantees config_json is valid for config_len bytes
        let bytes = unsafe { bytes_arg(config_json, config_len) };
        let config = LoggingConfig::from_json(bytes).map_err(|e| {
            tracing::error!("Failed to parse logging config: {}", e);
            logmux_core::LogError::from(e).error_code()
        })?;
        LogManager::instance()
            .apply_config(&config)
            .map_err(|e| e.error_code())
    })
}

/// Log a message through the platform dispatch
///
/// `level` is a numeric level code; unknown codes are treated as NONE and
/// therefore dropped. Invalid UTF-8 in the message is replaced.
///
/// # Safety
/// - `category` must be null or a valid null-terminated C string
/// - `msg` must be valid for `msg_len` bytes if not null
#[unsafe(no_mangle)]
pub unsafe extern "C" fn logmux_log_message(
    level: u8,
    category: *const c_char,
    msg: *const u8,
    msg_len: usize,
) {
    let _ = catch_panic(AssertUnwindSafe(|| {
        // SAFETY: caller guarantees the pointer contracts above
        let (category, msg) = unsafe { (category_arg(category), bytes_arg(msg, msg_len)) };
        Platform::global().log_message(
            &String::from_utf8_lossy(msg),
            LogLevel::from_u8(level),
            category.as_deref(),
            &LogAttributes::new(),
        );
    }));
}

/// Write raw data through the platform dispatch
///
/// # Safety
/// - `category` must be null or a valid null-terminated C string
/// - `data` must be valid for `len` bytes if not null
#[unsafe(no_mangle)]
pub unsafe extern "C" fn logmux_log_write(
    level: u8,
    category: *const c_char,
    data: *const u8,
    len: usize,
) {
    let _ = catch_panic(AssertUnwindSafe(|| {
        // SAFETY: caller guarantees the pointer contracts above
        let (category, data) = unsafe { (category_arg(category), bytes_arg(data, len)) };
        Platform::global().log_write(data, LogLevel::from_u8(level), category.as_deref());
    }));
}

/// Check whether a message at `level` in `category` would be logged
///
/// # Safety
/// `category` must be null or a valid null-terminated C string
#[unsafe(no_mangle)]
pub unsafe extern "C" fn logmux_log_enabled(level: u8, category: *const c_char) -> bool {
    catch_panic(AssertUnwindSafe(|| {
        // SAFETY: caller guarantees a valid string or null
        let category = unsafe { category_arg(category) };
        Platform::global().log_enabled(LogLevel::from_u8(level), category.as_deref())
    }))
    .unwrap_or(false)
}

/// Error code of the last failed call on this thread, or 0
#[unsafe(no_mangle)]
pub extern "C" fn logmux_last_error() -> u32 {
    LAST_ERROR.with(Cell::get)
}

/// Destroy all factory handlers and detach from the platform
///
/// Caller-registered handlers are detached but not destroyed. Handlers can
/// be added again afterwards.
#[unsafe(no_mangle)]
pub extern "C" fn logmux_shutdown() {
    let _ = catch_panic(|| LogManager::instance().shutdown());
}

#[cfg(test)]
#[path = "exports/exports_tests.rs"]
mod exports_tests;
