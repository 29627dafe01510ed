use lansweep::report::{export, render_table, service_label, summary_line, write_csv};
use lansweep::{HostRecord, InterfaceProfile, ScanReport};
use std::net::Ipv4Addr;
use std::time::Duration;

fn sample_report() -> ScanReport {
    let mut printer = HostRecord::new(Ipv4Addr::new(10, 0, 0, 70));
    printer.rtt = Some(Duration::from_millis(3));
    printer.hostname = Some("printer-2f".to_string());
    printer.open_ports = vec![515, 631, 9100];

    let mut pi = HostRecord::new(Ipv4Addr::new(10, 0, 0, 9));
    pi.rtt = Some(Duration::from_millis(12));
    pi.mac = Some("B8:27:EB:01:02:03".to_string());
    pi.vendor = Some("Raspberry Pi Foundation".to_string());
    pi.open_ports = vec![22, 80];

    ScanReport::new(
        "10.0.0.0/24".to_string(),
        254,
        Duration::from_millis(2450),
        vec![printer, pi],
    )
}

#[test]
fn test_hosts_sort_numerically_not_lexically() {
    let report = sample_report();
    // .9 comes before .70 even though "70" sorts first as a string
    assert_eq!(report.hosts[0].addr, Ipv4Addr::new(10, 0, 0, 9));
    assert_eq!(report.hosts[1].addr, Ipv4Addr::new(10, 0, 0, 70));
    assert_eq!(report.responsive(), 2);
}

#[test]
fn test_table_shows_hosts_and_placeholders() {
    let report = sample_report();
    let rendered = render_table(&report).to_string();
    assert!(rendered.contains("10.0.0.9"));
    assert!(rendered.contains("10.0.0.70"));
    assert!(rendered.contains("SSH"));
    // the printer has no MAC, so its cell falls back to a dash
    assert!(rendered.contains('-'));
}

#[test]
fn test_table_truncates_long_port_lists() {
    let mut host = HostRecord::new(Ipv4Addr::new(10, 0, 0, 5));
    host.open_ports = vec![1, 2, 3, 4, 5, 6, 7, 8];
    let report = ScanReport::new(
        "10.0.0.0/29".to_string(),
        6,
        Duration::from_millis(100),
        vec![host],
    );
    let rendered = render_table(&report).to_string();
    assert!(rendered.contains("(+2)"));
}

#[test]
fn test_summary_line() {
    let line = summary_line(&sample_report());
    assert!(line.contains("2 of 254"));
    assert!(line.contains("10.0.0.0/24"));
    assert!(line.contains("2.45s"));
}

#[test]
fn test_service_labels() {
    assert_eq!(service_label(22), "SSH");
    assert_eq!(service_label(9100), "JetDirect");
    assert_eq!(service_label(8080), "HTTP-Alt");
    assert_eq!(service_label(49152), "");
}

#[test]
fn test_json_export() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    export(&sample_report(), &path).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["network"], "10.0.0.0/24");
    assert_eq!(value["probed"], 254);
    assert_eq!(value["elapsed_ms"], 2450);

    let hosts = value["hosts"].as_array().unwrap();
    assert_eq!(hosts.len(), 2);
    assert_eq!(hosts[0]["addr"], "10.0.0.9");
    assert_eq!(hosts[0]["rtt_ms"], 12);
    assert!(hosts[0]["hostname"].is_null());
    assert_eq!(hosts[1]["hostname"], "printer-2f");
}

#[test]
fn test_csv_export() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    export(&sample_report(), &path).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let mut lines = raw.lines();
    assert_eq!(
        lines.next(),
        Some("ip,hostname,mac,vendor,rtt_ms,open_ports")
    );
    let first = lines.next().unwrap();
    assert!(first.starts_with("10.0.0.9,"));
    assert!(first.contains("22;80"));
}

#[test]
fn test_csv_omits_missing_fields() {
    let report = ScanReport::new(
        "10.0.0.0/30".to_string(),
        2,
        Duration::from_millis(50),
        vec![HostRecord::new(Ipv4Addr::new(10, 0, 0, 1))],
    );
    let mut buffer = Vec::new();
    write_csv(&report, &mut buffer).unwrap();
    let raw = String::from_utf8(buffer).unwrap();
    assert!(raw.lines().any(|line| line == "10.0.0.1,,,,,"));
}

#[test]
fn test_export_rejects_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["report.txt", "report"] {
        let err = export(&sample_report(), &dir.path().join(name)).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }
}

#[test]
fn test_interface_profile_cidr() {
    let profile = InterfaceProfile {
        name: "eth0".to_string(),
        description: "Ethernet adapter".to_string(),
        addr: Ipv4Addr::new(192, 168, 1, 34),
        prefix_len: 24,
    };
    assert_eq!(profile.cidr(), "192.168.1.0/24");
}
