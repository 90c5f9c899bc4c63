#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

// LogLevel tests

#[test]
fn LogLevel___ordering___all_less_than_trace() {
    assert!(LogLevel::All < LogLevel::Trace);
}

#[test]
fn LogLevel___ordering___trace_less_than_info() {
    assert!(LogLevel::Trace < LogLevel::Info);
}

#[test]
fn LogLevel___ordering___warn_less_than_error() {
    assert!(LogLevel::Warn < LogLevel::Error);
}

#[test]
fn LogLevel___ordering___panic_less_than_off() {
    assert!(LogLevel::Panic < LogLevel::Off);
}

#[test]
fn LogLevel___default___is_off() {
    assert_eq!(LogLevel::default(), LogLevel::Off);
}

#[test_case(0, LogLevel::All)]
#[test_case(1, LogLevel::Trace)]
#[test_case(30, LogLevel::Info)]
#[test_case(40, LogLevel::Warn)]
#[test_case(50, LogLevel::Error)]
#[test_case(60, LogLevel::Panic)]
#[test_case(70, LogLevel::Off)]
#[test_case(2, LogLevel::Off ; "unknown code")]
#[test_case(255, LogLevel::Off ; "out of range code")]
fn LogLevel___from_u8___maps_code(code: u8, expected: LogLevel) {
    assert_eq!(LogLevel::from_u8(code), expected);
}

#[test]
fn LogLevel___from_u8___roundtrips_repr() {
    for (_, level) in LogLevel::NAMES {
        assert_eq!(LogLevel::from_u8(level as u8), level);
    }
}

#[test_case("none", LogLevel::Off)]
#[test_case("trace", LogLevel::Trace)]
#[test_case("info", LogLevel::Info)]
#[test_case("warn", LogLevel::Warn)]
#[test_case("error", LogLevel::Error)]
#[test_case("panic", LogLevel::Panic)]
#[test_case("all", LogLevel::All)]
fn LogLevel___from_name___known_name(name: &str, expected: LogLevel) {
    assert_eq!(LogLevel::from_name(name), Some(expected));
}

#[test_case("WARN" ; "uppercase")]
#[test_case("Warn" ; "mixed case")]
#[test_case("debug" ; "unsupported level")]
#[test_case("" ; "empty")]
fn LogLevel___from_name___rejects(name: &str) {
    assert_eq!(LogLevel::from_name(name), None);
}

#[test]
fn LogLevel___from_str___unknown_returns_error() {
    let result: Result<LogLevel, _> = "verbose".parse();

    assert_eq!(result, Err(LogError::UnknownLevel("verbose".to_string())));
}

#[test]
fn LogLevel___passes___threshold_semantics() {
    assert!(LogLevel::Warn.passes(LogLevel::Warn));
    assert!(LogLevel::Error.passes(LogLevel::Warn));
    assert!(!LogLevel::Info.passes(LogLevel::Warn));
    assert!(LogLevel::Trace.passes(LogLevel::All));
    assert!(!LogLevel::Panic.passes(LogLevel::Off));
    assert!(!LogLevel::Off.passes(LogLevel::Off));
}

#[test]
fn LogLevel___display___shows_uppercase() {
    assert_eq!(LogLevel::Trace.to_string(), "TRACE");
    assert_eq!(LogLevel::Panic.to_string(), "PANIC");
    assert_eq!(LogLevel::Off.to_string(), "NONE");
}

#[test]
fn LogLevel___serde___uses_lowercase_names() {
    let json = serde_json::to_string(&LogLevel::Off).unwrap();
    let level: LogLevel = serde_json::from_str("\"warn\"").unwrap();

    assert_eq!(json, "\"none\"");
    assert_eq!(level, LogLevel::Warn);
}

#[test]
fn LogLevel___serde___rejects_wrong_case() {
    let result: Result<LogLevel, _> = serde_json::from_str("\"Warn\"");

    assert!(result.is_err());
}
