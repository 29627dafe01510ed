use crate::model::{HostRecord, ScanReport};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Render the report as a terminal table, hosts in address order.
pub fn render_table(report: &ScanReport) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec!["IP", "Hostname", "MAC", "Vendor", "RTT", "Open Ports"]);

    for host in &report.hosts {
        table.add_row(vec![
            Cell::new(host.addr.to_string()),
            Cell::new(host.hostname.clone().unwrap_or_else(|| "-".to_string())),
            Cell::new(host.mac.clone().unwrap_or_else(|| "-".to_string())),
            Cell::new(host.vendor.clone().unwrap_or_else(|| "-".to_string())),
            Cell::new(
                host.rtt
                    .map(|rtt| format!("{} ms", rtt.as_millis()))
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(format_ports(host)),
        ]);
    }
    table
}

/// Summary line printed under the table.
pub fn summary_line(report: &ScanReport) -> String {
    format!(
        "{} of {} addresses on {} responded in {:.2}s",
        report.responsive(),
        report.probed,
        report.network,
        report.elapsed.as_secs_f64()
    )
}

fn format_ports(host: &HostRecord) -> String {
    if host.open_ports.is_empty() {
        return "-".to_string();
    }
    let mut shown = host
        .open_ports
        .iter()
        .take(6)
        .map(|&port| {
            let label = service_label(port);
            if label.is_empty() {
                port.to_string()
            } else {
                format!("{} ({})", port, label)
            }
        })
        .collect::<Vec<String>>()
        .join(", ");
    if host.open_ports.len() > 6 {
        shown.push_str(&format!(" (+{})", host.open_ports.len() - 6));
    }
    shown
}

/// Well-known service name for a port, or an empty string.
pub fn service_label(port: u16) -> &'static str {
    match port {
        21 => "FTP",
        22 => "SSH",
        23 => "Telnet",
        25 => "SMTP",
        53 => "DNS",
        80 => "HTTP",
        135 => "RPC",
        139 => "NetBIOS",
        161 => "SNMP",
        443 => "HTTPS",
        445 => "SMB",
        515 => "LPD",
        631 => "IPP",
        3306 => "MySQL",
        3389 => "RDP",
        5900 => "VNC",
        5985 => "WinRM",
        8000 | 8080 | 8443 => "HTTP-Alt",
        9100 => "JetDirect",
        _ => "",
    }
}

/// Write the report to a file, format chosen by extension (.json or .csv).
pub fn export(report: &ScanReport, path: &Path) -> io::Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match extension.as_deref() {
        Some("json") => write_json(report, File::create(path)?),
        Some("csv") => write_csv(report, File::create(path)?),
        _ => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("unsupported export format: {}", path.display()),
        )),
    }
}

pub fn write_json<W: Write>(report: &ScanReport, writer: W) -> io::Result<()> {
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

pub fn write_csv<W: Write>(report: &ScanReport, writer: W) -> io::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(["ip", "hostname", "mac", "vendor", "rtt_ms", "open_ports"])
        .map_err(csv_to_io)?;
    for host in &report.hosts {
        let ports = host
            .open_ports
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<String>>()
            .join(";");
        csv_writer
            .write_record([
                host.addr.to_string(),
                host.hostname.clone().unwrap_or_default(),
                host.mac.clone().unwrap_or_default(),
                host.vendor.clone().unwrap_or_default(),
                host.rtt
                    .map(|rtt| rtt.as_millis().to_string())
                    .unwrap_or_default(),
                ports,
            ])
            .map_err(csv_to_io)?;
    }
    csv_writer.flush()
}

fn csv_to_io(e: csv::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e)
}
