#![allow(non_snake_case)]

use super::*;
use logmux_core::{LogError, LogLevel};
use logmux_handlers::{DefaultStreamFactory, MemoryPort};
use logmux_manager::Platform;
use std::sync::Arc;
use test_case::test_case;

fn test_manager() -> (LogManager, Arc<MemoryPort>) {
    let platform: &'static Platform = Box::leak(Box::new(Platform::new()));
    let port = Arc::new(MemoryPort::new());
    let streams = DefaultStreamFactory::new()
        .with_port(DefaultStreamFactory::SERIAL, port.clone())
        .unwrap();
    let manager = LogManager::with_platform(platform);
    manager.set_stream_factory(Arc::new(streams));
    (manager, port)
}

/// Copy `request` into a buffer of `capacity` bytes and process it
fn run(manager: &LogManager, request: &str, capacity: usize) -> Result<String, ProtocolError> {
    let mut buf = vec![0u8; capacity.max(request.len())];
    buf[..request.len()].copy_from_slice(request.as_bytes());
    let size = RequestProcessor::new(manager).process(&mut buf, request.len(), DataFormat::Json)?;
    Ok(String::from_utf8(buf[..size].to_vec()).unwrap())
}

const ADD_USB: &str = r#"{"cmd": "addHandler", "id": "usb",
    "hnd": {"type": "StreamLogHandler"},
    "strm": {"type": "Serial"},
    "lvl": "warn"}"#;

// Command tests

#[test_case("addHandler", Some(Command::AddHandler))]
#[test_case("removeHandler", Some(Command::RemoveHandler))]
#[test_case("enumHandlers", Some(Command::EnumHandlers))]
#[test_case("AddHandler", None ; "case sensitive")]
#[test_case("", None ; "empty")]
fn Command___from_name___maps(name: &str, expected: Option<Command>) {
    assert_eq!(Command::from_name(name), expected);
}

#[test]
fn Command___as_str___roundtrips_name() {
    for cmd in [Command::AddHandler, Command::RemoveHandler, Command::EnumHandlers] {
        assert_eq!(Command::from_name(cmd.as_str()), Some(cmd));
    }
}

// Request tests

#[test]
fn Request___deserialize___reads_handler_fields() {
    let request: Request = serde_json::from_str(ADD_USB).unwrap();

    assert_eq!(request.cmd, "addHandler");
    assert_eq!(request.handler.id, "usb");
    assert_eq!(request.handler.handler.type_name, "StreamLogHandler");
    assert_eq!(request.handler.level, LogLevel::Warn);
}

#[test]
fn Request___deserialize___level_defaults_to_none() {
    let request: Request = serde_json::from_str(r#"{"cmd": "addHandler", "id": "h1"}"#).unwrap();

    assert_eq!(request.handler.level, LogLevel::Off);
}

#[test]
fn Request___deserialize___filter_defaults() {
    let request: Request =
        serde_json::from_str(r#"{"cmd": "addHandler", "filt": [{"cat": "app"}, {"lvl": "all"}]}"#)
            .unwrap();

    let filters = &request.handler.filters;
    assert_eq!(filters[0].category, "app");
    assert_eq!(filters[0].level, LogLevel::Off);
    assert_eq!(filters[1].category, "");
    assert_eq!(filters[1].level, LogLevel::All);
}

#[test]
fn Request___command___unknown_name_fails() {
    let request: Request = serde_json::from_str(r#"{"cmd": "reboot"}"#).unwrap();

    assert_eq!(
        request.command(),
        Err(ProtocolError::UnknownCommand("reboot".to_string()))
    );
}

// RequestProcessor tests

#[test]
fn RequestProcessor___process___enum_empty_is_empty_array() {
    let (manager, _port) = test_manager();

    let reply = run(&manager, r#"{"cmd": "enumHandlers"}"#, 64).unwrap();

    assert_eq!(reply, "[]");
}

#[test]
fn RequestProcessor___process___add_then_enum() {
    let (manager, port) = test_manager();

    let add_reply = run(&manager, ADD_USB, 256).unwrap();
    let enum_reply = run(&manager, r#"{"cmd": "enumHandlers"}"#, 64).unwrap();

    assert_eq!(add_reply, "");
    assert_eq!(enum_reply, r#"["usb"]"#);
    assert!(port.is_open());
    assert!(manager.query_enabled(LogLevel::Warn, None));
    assert!(!manager.query_enabled(LogLevel::Info, None));
}

#[test]
fn RequestProcessor___process___enum_lists_in_creation_order() {
    let (manager, _port) = test_manager();
    run(&manager, &ADD_USB.replace("\"usb\"", "\"h1\""), 256).unwrap();
    run(&manager, &ADD_USB.replace("\"usb\"", "\"h2\""), 256).unwrap();

    let reply = run(&manager, r#"{"cmd": "enumHandlers"}"#, 64).unwrap();

    assert_eq!(reply, r#"["h1","h2"]"#);
}

#[test]
fn RequestProcessor___process___remove_unknown_id_succeeds() {
    let (manager, _port) = test_manager();

    let reply = run(&manager, r#"{"cmd": "removeHandler", "id": "missing"}"#, 64).unwrap();

    assert_eq!(reply, "");
}

#[test]
fn RequestProcessor___process___remove_destroys_handler() {
    let (manager, port) = test_manager();
    run(&manager, ADD_USB, 256).unwrap();

    run(&manager, r#"{"cmd": "removeHandler", "id": "usb"}"#, 64).unwrap();

    assert!(manager.factory_handler_ids().is_empty());
    assert!(!port.is_open());
}

#[test]
fn RequestProcessor___process___missing_stream_is_manager_error() {
    let (manager, _port) = test_manager();
    let request = r#"{"cmd": "addHandler", "id": "uart",
        "hnd": {"type": "StreamLogHandler"},
        "strm": {"type": "Serial1", "param": {"baud": 115200}}}"#;

    let result = run(&manager, request, 256);

    assert_eq!(
        result,
        Err(ProtocolError::Manager(LogError::UnsupportedStream(
            "Serial1".to_string()
        )))
    );
    assert!(manager.factory_handler_ids().is_empty());
}

#[test]
fn RequestProcessor___process___params_alias_accepted() {
    let (manager, _port) = test_manager();
    let request = r#"{"cmd": "addHandler", "id": "usb",
        "hnd": {"type": "JSONStreamLogHandler", "params": {}},
        "strm": {"type": "Serial", "params": {}}}"#;

    run(&manager, request, 256).unwrap();

    assert_eq!(manager.factory_handler_ids(), vec!["usb"]);
}

#[test_case(r#"{"cmd": "addHandler", "id": "h1", "lvl": "loud"}"# ; "unknown default level")]
#[test_case(r#"{"cmd": "addHandler", "id": "h1", "filt": [{"cat": "a", "lvl": "WARN"}]}"# ; "unknown filter level")]
#[test_case(r#"{"cmd": "addHandler", "id": "h1", "filt": {"cat": "a"}}"# ; "filters not an array")]
#[test_case(r#"{"id": "h1"}"# ; "missing command")]
#[test_case(r#"["enumHandlers"]"# ; "not an object")]
#[test_case(r#"{"cmd": "enumHandlers""# ; "truncated")]
fn RequestProcessor___process___malformed_request(request: &str) {
    let (manager, _port) = test_manager();

    let result = run(&manager, request, 256);

    assert!(matches!(result, Err(ProtocolError::Malformed(_))), "{result:?}");
    assert!(manager.factory_handler_ids().is_empty());
}

#[test]
fn RequestProcessor___process___unknown_command() {
    let (manager, _port) = test_manager();

    let result = run(&manager, r#"{"cmd": "reboot"}"#, 64);

    assert_eq!(result, Err(ProtocolError::UnknownCommand("reboot".to_string())));
}

#[test]
fn RequestProcessor___process___ignores_bytes_past_request() {
    let (manager, _port) = test_manager();
    let request = r#"{"cmd": "enumHandlers"}"#;
    let mut buf = vec![b'x'; 64];
    buf[..request.len()].copy_from_slice(request.as_bytes());

    let size = RequestProcessor::new(&manager)
        .process(&mut buf, request.len(), DataFormat::Json)
        .unwrap();

    assert_eq!(&buf[..size], b"[]");
}

#[test]
fn RequestProcessor___process___request_larger_than_buffer() {
    let (manager, _port) = test_manager();
    let mut buf = vec![0u8; 8];

    let result = RequestProcessor::new(&manager).process(&mut buf, 9, DataFormat::Json);

    assert_eq!(
        result,
        Err(ProtocolError::RequestTooLarge {
            size: 9,
            capacity: 8
        })
    );
}

#[test]
fn RequestProcessor___process___reply_larger_than_buffer() {
    let (manager, _port) = test_manager();
    run(&manager, &ADD_USB.replace("\"usb\"", "\"a-rather-long-handler-identifier\""), 256).unwrap();
    let request = r#"{"cmd":"enumHandlers"}"#;

    let result = run(&manager, request, request.len());

    assert!(matches!(result, Err(ProtocolError::ReplyTooLarge { .. })));
}

#[test_case(DataFormat::Binary)]
#[test_case(DataFormat::Text)]
#[test_case(DataFormat::Protobuf)]
fn RequestProcessor___process___unsupported_format(format: DataFormat) {
    let (manager, _port) = test_manager();
    let request = br#"{"cmd": "enumHandlers"}"#;
    let mut buf = request.to_vec();

    let result = RequestProcessor::new(&manager).process(&mut buf, request.len(), format);

    assert_eq!(result, Err(ProtocolError::UnsupportedFormat(format as u8)));
}

#[test]
fn RequestProcessor___execute___enum_returns_ids() {
    let (manager, _port) = test_manager();
    let add: Request = serde_json::from_str(ADD_USB).unwrap();
    let list: Request = serde_json::from_str(r#"{"cmd": "enumHandlers"}"#).unwrap();
    let processor = RequestProcessor::new(&manager);

    processor.execute(&add).unwrap();
    let reply = processor.execute(&list).unwrap();

    assert_eq!(reply, Reply::HandlerIds(vec!["usb".to_string()]));
}
