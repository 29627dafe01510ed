use lansweep::config::{parse_port_spec, port_preset, ScanConfig, DEFAULT_CONCURRENCY};
use lansweep::errors::ScanError;

#[test]
fn test_parse_plain_port_list() {
    assert_eq!(parse_port_spec("80,443").unwrap(), vec![80, 443]);
}

#[test]
fn test_parse_port_ranges() {
    assert_eq!(parse_port_spec("1-5,22").unwrap(), vec![1, 2, 3, 4, 5, 22]);
}

#[test]
fn test_ports_are_sorted_and_deduplicated() {
    assert_eq!(parse_port_spec("443,80,443,80").unwrap(), vec![80, 443]);
    assert_eq!(parse_port_spec("20-22,21").unwrap(), vec![20, 21, 22]);
}

#[test]
fn test_invalid_port_specs_are_rejected() {
    for spec in ["", "abc", "0", "70000", "80,", "5-1"] {
        assert!(
            matches!(parse_port_spec(spec), Err(ScanError::InvalidPortSpec(_))),
            "spec {:?} should be rejected",
            spec
        );
    }
}

#[test]
fn test_port_presets() {
    assert!(port_preset("web").unwrap().contains(&443));
    assert!(port_preset("printers").unwrap().contains(&9100));
    assert!(port_preset("WINDOWS").unwrap().contains(&3389));
    assert!(port_preset("no-such-preset").is_none());
}

#[test]
fn test_concurrency_bounds() {
    let mut config = ScanConfig::default();
    assert!(config.validate().is_ok());

    config.concurrency = 0;
    assert!(matches!(
        config.validate(),
        Err(ScanError::InvalidConcurrency(0))
    ));

    config.concurrency = 1024;
    assert!(config.validate().is_ok());

    config.concurrency = 1025;
    assert!(config.validate().is_err());
}

#[test]
fn test_default_config_is_sane() {
    let config = ScanConfig::default();
    assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
    assert!(!config.ports.is_empty());
    assert!(config.ping_attempts >= 1);
    assert!(config.vendor_api_timeout_ms <= 2000);
}
