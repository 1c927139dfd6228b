use super::*;

#[test]
fn parse_accepts_names_and_numbers() {
    assert_eq!(LogLevel::parse("none").unwrap(), LogLevel::None);
    assert_eq!(LogLevel::parse("ERROR").unwrap(), LogLevel::Error);
    assert_eq!(LogLevel::parse(" warning ").unwrap(), LogLevel::Warn);
    assert_eq!(LogLevel::parse("3").unwrap(), LogLevel::Info);
    assert_eq!(LogLevel::parse("4").unwrap(), LogLevel::Debug);
}

#[test]
fn parse_rejects_unknown_level() {
    let err = LogLevel::parse("trace").unwrap_err();
    assert!(err.to_string().contains("unknown log level"));
}

#[test]
fn levels_order_by_verbosity() {
    assert!(LogLevel::None < LogLevel::Error);
    assert!(LogLevel::Warn < LogLevel::Debug);
}

#[test]
fn filter_maps_none_to_off() {
    assert_eq!(LogLevel::None.filter(), LevelFilter::OFF);
    assert_eq!(LogLevel::Debug.filter(), LevelFilter::DEBUG);
}

#[test]
fn deserializes_from_number_or_name() {
    let level: LogLevel = serde_json::from_str("4").unwrap();
    assert_eq!(level, LogLevel::Debug);
    let level: LogLevel = serde_json::from_str("\"warn\"").unwrap();
    assert_eq!(level, LogLevel::Warn);
    assert!(serde_json::from_str::<LogLevel>("9").is_err());
}

#[test]
fn init_with_none_installs_nothing() {
    assert!(!init_logging(LogLevel::None));
}

#[cfg(not(target_arch = "wasm32"))]
#[test]
fn native_sink_installs_once() {
    init_logging(LogLevel::Warn);
    assert!(tracing::dispatcher::has_been_set());
    assert!(!init_logging(LogLevel::Debug));
}
