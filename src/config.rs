use crate::errors::ScanError;

/// Default number of concurrently probed addresses.
pub const DEFAULT_CONCURRENCY: usize = 30;

/// Upper bound accepted for the concurrency limit.
pub const MAX_CONCURRENCY: usize = 1024;

/// Runtime settings for a single sweep.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// TCP ports probed on each responsive host (empty disables port probing)
    pub ports: Vec<u16>,

    /// Timeout in milliseconds for one echo request
    pub ping_timeout_ms: u64,

    /// Echo requests sent per address before the host counts as unreachable
    pub ping_attempts: u32,

    /// Timeout in milliseconds for TCP connection attempts
    pub tcp_connect_timeout_ms: u64,

    /// Timeout in milliseconds for the NetBIOS name query fallback
    pub netbios_timeout_ms: u64,

    /// Timeout in milliseconds for the remote vendor API tier
    pub vendor_api_timeout_ms: u64,

    /// Maximum number of addresses probed at the same time
    pub concurrency: usize,

    /// Skip port probing entirely
    pub skip_ports: bool,

    /// Leave the OS ARP cache untouched before the sweep
    pub skip_arp_flush: bool,

    /// Never contact the remote vendor API
    pub offline: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ports: default_ports(),
            ping_timeout_ms: 1000,
            ping_attempts: 1,
            tcp_connect_timeout_ms: 100,
            netbios_timeout_ms: 1000,
            vendor_api_timeout_ms: 2000,
            concurrency: DEFAULT_CONCURRENCY,
            skip_ports: false,
            skip_arp_flush: false,
            offline: false,
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.concurrency == 0 || self.concurrency > MAX_CONCURRENCY {
            return Err(ScanError::InvalidConcurrency(self.concurrency));
        }
        Ok(())
    }
}

/// Ports worth checking on a typical office network.
pub fn default_ports() -> Vec<u16> {
    vec![
        22,   // SSH
        23,   // Telnet
        53,   // DNS
        80,   // HTTP
        135,  // MS RPC
        139,  // NetBIOS session
        161,  // SNMP
        443,  // HTTPS
        445,  // SMB
        515,  // LPD
        631,  // IPP
        3389, // RDP
        5900, // VNC
        8080, // HTTP proxy
        9100, // JetDirect
    ]
}

/// Named port sets selectable from the command line.
pub fn port_preset(name: &str) -> Option<Vec<u16>> {
    match name.to_ascii_lowercase().as_str() {
        "common" => Some(default_ports()),
        "web" => Some(vec![80, 443, 8000, 8080, 8443]),
        "windows" => Some(vec![135, 139, 445, 3389, 5985]),
        "printers" => Some(vec![515, 631, 9100]),
        "management" => Some(vec![22, 23, 80, 161, 443, 3389, 5900, 8080]),
        _ => None,
    }
}

/// Parses a comma-separated port list with optional `a-b` ranges into a
/// sorted, deduplicated set. Port 0 is rejected.
pub fn parse_port_spec(spec: &str) -> Result<Vec<u16>, ScanError> {
    let mut ports = Vec::new();
    if spec.trim().is_empty() {
        return Err(ScanError::InvalidPortSpec(spec.to_string()));
    }
    for token in spec.split(',') {
        let token = token.trim();
        if let Some((lo, hi)) = token.split_once('-') {
            let lo = parse_port(lo).ok_or_else(|| ScanError::InvalidPortSpec(token.to_string()))?;
            let hi = parse_port(hi).ok_or_else(|| ScanError::InvalidPortSpec(token.to_string()))?;
            if lo > hi {
                return Err(ScanError::InvalidPortSpec(token.to_string()));
            }
            ports.extend(lo..=hi);
        } else {
            let port =
                parse_port(token).ok_or_else(|| ScanError::InvalidPortSpec(token.to_string()))?;
            ports.push(port);
        }
    }
    ports.sort_unstable();
    ports.dedup();
    Ok(ports)
}

fn parse_port(s: &str) -> Option<u16> {
    match s.trim().parse::<u16>() {
        Ok(0) | Err(_) => None,
        Ok(p) => Some(p),
    }
}
