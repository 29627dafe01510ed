use super::ProbeStage;
use crate::errors::ScanError;
use crate::model::HostRecord;
use async_trait::async_trait;
use std::net::Ipv4Addr;
use tokio::process::Command;

/// Reads the OS neighbor table for the probed address. The echo exchange
/// that ran just before this stage is what populates the entry.
pub struct ArpStage;

#[async_trait]
impl ProbeStage for ArpStage {
    fn name(&self) -> &'static str {
        "arp"
    }

    async fn enrich(&self, host: &mut HostRecord) -> Result<(), ScanError> {
        host.mac = lookup_mac(host.addr).await;
        Ok(())
    }
}

/// Clear the OS ARP cache so the sweep observes fresh neighbor entries.
/// Clearing usually needs elevation; failure is downgraded to a warning
/// and the sweep continues with whatever the table already holds.
pub async fn flush_table() {
    match flush_command().output().await {
        Ok(output) if output.status.success() => log::debug!("ARP cache flushed"),
        Ok(_) => log::warn!("could not flush ARP cache; continuing with existing entries"),
        Err(e) => log::warn!("could not flush ARP cache: {}; continuing with existing entries", e),
    }
}

#[cfg(target_os = "windows")]
fn flush_command() -> Command {
    let mut command = Command::new("arp");
    command.args(["-d", "*"]);
    command
}

#[cfg(target_os = "macos")]
fn flush_command() -> Command {
    let mut command = Command::new("arp");
    command.args(["-d", "-a"]);
    command
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn flush_command() -> Command {
    let mut command = Command::new("ip");
    command.args(["neigh", "flush", "all"]);
    command
}

/// Look up the MAC recorded for an address in the neighbor table.
#[cfg(target_os = "linux")]
pub async fn lookup_mac(addr: Ipv4Addr) -> Option<String> {
    let contents = tokio::fs::read_to_string("/proc/net/arp").await.ok()?;
    mac_from_proc_arp(&contents, addr)
}

/// Look up the MAC recorded for an address in the neighbor table.
#[cfg(not(target_os = "linux"))]
pub async fn lookup_mac(addr: Ipv4Addr) -> Option<String> {
    let mut command = Command::new("arp");
    #[cfg(target_os = "windows")]
    command.args(["-a", &addr.to_string()]);
    #[cfg(not(target_os = "windows"))]
    command.args(["-n", &addr.to_string()]);
    let output = command.output().await.ok()?;
    mac_from_arp_output(&String::from_utf8_lossy(&output.stdout), addr)
}

/// Parse a /proc/net/arp dump, e.g.
/// `192.168.1.7  0x1  0x2  b8:27:eb:4e:19:22  *  wlan0`.
pub fn mac_from_proc_arp(contents: &str, addr: Ipv4Addr) -> Option<String> {
    let needle = addr.to_string();
    for line in contents.lines().skip(1) {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() >= 4 && parts[0] == needle {
            return normalize_hw_addr(parts[3]);
        }
    }
    None
}

/// Parse `arp` command output for one address. Handles the Windows
/// layout (`192.168.1.7   b8-27-eb-4e-19-22   dynamic`) and the BSD one
/// (`? (192.168.1.7) at b8:27:eb:4e:19:22 on en0`).
pub fn mac_from_arp_output(output: &str, addr: Ipv4Addr) -> Option<String> {
    let needle = addr.to_string();
    for line in output.lines() {
        let mut addr_seen = false;
        let mut mac = None;
        for token in line.split_whitespace() {
            let token = token.trim_matches(|c| c == '(' || c == ')');
            if token == needle {
                addr_seen = true;
            } else if mac.is_none() {
                mac = normalize_hw_addr(token);
            }
        }
        if addr_seen && mac.is_some() {
            return mac;
        }
    }
    None
}

/// Normalize a hardware address token to uppercase colon form. macOS
/// prints octets without leading zeros; broadcast, multicast and
/// incomplete entries are rejected.
pub fn normalize_hw_addr(token: &str) -> Option<String> {
    let parts: Vec<&str> = token.split(|c| c == ':' || c == '-').collect();
    if parts.len() != 6 {
        return None;
    }
    let mut octets = Vec::with_capacity(6);
    for part in parts {
        if part.is_empty() || part.len() > 2 || !part.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        octets.push(format!("{:0>2}", part.to_ascii_uppercase()));
    }
    if u8::from_str_radix(&octets[0], 16).ok()? & 0x01 != 0 {
        return None;
    }
    let mac = octets.join(":");
    if mac == "00:00:00:00:00:00" {
        return None;
    }
    Some(mac)
}
