use lansweep::errors::ScanError;
use lansweep::net::range::{cidr_notation, expand, parse_cidr, usable_host_count};
use std::net::Ipv4Addr;

#[test]
fn test_slash24_expands_to_254_hosts() {
    let hosts = expand("192.168.1.0", 24).unwrap();
    assert_eq!(hosts.len(), 254);
    assert_eq!(hosts[0], Ipv4Addr::new(192, 168, 1, 1));
    assert_eq!(hosts[253], Ipv4Addr::new(192, 168, 1, 254));
}

#[test]
fn test_base_may_lie_anywhere_in_subnet() {
    // the interface address is rarely the network address
    let from_network = expand("192.168.1.0", 24).unwrap();
    let from_host = expand("192.168.1.77", 24).unwrap();
    assert_eq!(from_network, from_host);
}

#[test]
fn test_slash30_has_two_hosts() {
    let hosts = expand("10.0.0.0", 30).unwrap();
    assert_eq!(
        hosts,
        vec![Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2)]
    );
}

#[test]
fn test_slash16_bounds() {
    let hosts = expand("10.4.3.9", 16).unwrap();
    assert_eq!(hosts.len(), 65534);
    assert_eq!(hosts[0], Ipv4Addr::new(10, 4, 0, 1));
    assert_eq!(hosts[65533], Ipv4Addr::new(10, 4, 255, 254));
}

#[test]
fn test_slash32_names_exactly_the_address() {
    let hosts = expand("10.0.0.5", 32).unwrap();
    assert_eq!(hosts, vec![Ipv4Addr::new(10, 0, 0, 5)]);
}

#[test]
fn test_network_and_broadcast_are_excluded() {
    let hosts = expand("10.0.0.20", 28).unwrap();
    assert_eq!(hosts.len(), 14);
    assert!(!hosts.contains(&Ipv4Addr::new(10, 0, 0, 16)));
    assert!(!hosts.contains(&Ipv4Addr::new(10, 0, 0, 31)));
    assert!(hosts.contains(&Ipv4Addr::new(10, 0, 0, 17)));
    assert!(hosts.contains(&Ipv4Addr::new(10, 0, 0, 30)));
}

#[test]
fn test_hosts_come_out_in_ascending_order() {
    let hosts = expand("172.16.4.0", 26).unwrap();
    let mut sorted = hosts.clone();
    sorted.sort_by_key(|h| u32::from(*h));
    assert_eq!(hosts, sorted);
}

#[test]
fn test_invalid_prefixes_are_rejected() {
    for prefix in [0u8, 31, 33, 64] {
        let result = expand("10.0.0.0", prefix);
        assert!(
            matches!(result, Err(ScanError::InvalidPrefix(p)) if p == prefix),
            "prefix /{} should be rejected",
            prefix
        );
    }
}

#[test]
fn test_invalid_addresses_are_rejected() {
    assert!(matches!(
        expand("999.1.2.3", 24),
        Err(ScanError::InvalidAddress(_))
    ));
    assert!(matches!(
        expand("not-an-address", 24),
        Err(ScanError::InvalidAddress(_))
    ));
}

#[test]
fn test_usable_host_count() {
    assert_eq!(usable_host_count(24).unwrap(), 254);
    assert_eq!(usable_host_count(30).unwrap(), 2);
    assert_eq!(usable_host_count(32).unwrap(), 1);
    assert_eq!(usable_host_count(16).unwrap(), 65534);
    assert!(usable_host_count(31).is_err());
    assert!(usable_host_count(0).is_err());
}

#[test]
fn test_parse_cidr() {
    let (addr, prefix_len) = parse_cidr("192.168.1.0/24").unwrap();
    assert_eq!(addr, Ipv4Addr::new(192, 168, 1, 0));
    assert_eq!(prefix_len, 24);

    assert!(matches!(
        parse_cidr("192.168.1.0"),
        Err(ScanError::InvalidCidr(_))
    ));
    assert!(matches!(
        parse_cidr("banana/24"),
        Err(ScanError::InvalidAddress(_))
    ));
    assert!(matches!(
        parse_cidr("192.168.1.0/abc"),
        Err(ScanError::InvalidCidr(_))
    ));
}

#[test]
fn test_cidr_notation_normalizes_to_network_address() {
    assert_eq!(
        cidr_notation(Ipv4Addr::new(192, 168, 1, 77), 24),
        "192.168.1.0/24"
    );
    assert_eq!(cidr_notation(Ipv4Addr::new(10, 0, 0, 5), 32), "10.0.0.5/32");
}
