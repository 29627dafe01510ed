use serde::{Serialize, Serializer};
use std::net::Ipv4Addr;
use std::time::Duration;

/// A local interface and the IPv4 network it fronts.
#[derive(Debug, Clone, Serialize)]
pub struct InterfaceProfile {
    pub name: String,
    pub description: String,
    pub addr: Ipv4Addr,
    pub prefix_len: u8,
}

impl InterfaceProfile {
    /// Network address of the attached subnet in CIDR notation,
    /// e.g. `192.168.1.0/24`.
    pub fn cidr(&self) -> String {
        let mask = if self.prefix_len == 0 {
            0
        } else {
            !((1u32 << (32 - self.prefix_len as u32)) - 1)
        };
        let network = Ipv4Addr::from(u32::from(self.addr) & mask);
        format!("{}/{}", network, self.prefix_len)
    }
}

/// One responsive host. A record existing at all means the address answered
/// the reachability probe; every other field is best-effort and may be empty.
#[derive(Debug, Clone, Serialize)]
pub struct HostRecord {
    pub addr: Ipv4Addr,
    #[serde(rename = "rtt_ms", serialize_with = "opt_millis")]
    pub rtt: Option<Duration>,
    pub mac: Option<String>,
    pub vendor: Option<String>,
    pub hostname: Option<String>,
    pub open_ports: Vec<u16>,
}

impl HostRecord {
    pub fn new(addr: Ipv4Addr) -> Self {
        Self {
            addr,
            rtt: None,
            mac: None,
            vendor: None,
            hostname: None,
            open_ports: Vec::new(),
        }
    }
}

/// Aggregated outcome of one sweep, hosts ordered by ascending address.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Network that was swept, in CIDR notation
    pub network: String,
    /// Number of addresses probed
    pub probed: usize,
    #[serde(rename = "elapsed_ms", serialize_with = "millis")]
    pub elapsed: Duration,
    pub hosts: Vec<HostRecord>,
}

impl ScanReport {
    /// Builds a report from unordered worker output.
    pub fn new(network: String, probed: usize, elapsed: Duration, mut hosts: Vec<HostRecord>) -> Self {
        hosts.sort_by_key(|h| u32::from(h.addr));
        Self {
            network,
            probed,
            elapsed,
            hosts,
        }
    }

    /// Number of addresses that answered the reachability probe.
    pub fn responsive(&self) -> usize {
        self.hosts.len()
    }
}

fn opt_millis<S: Serializer>(value: &Option<Duration>, ser: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(d) => ser.serialize_some(&(d.as_millis() as u64)),
        None => ser.serialize_none(),
    }
}

fn millis<S: Serializer>(value: &Duration, ser: S) -> Result<S::Ok, S::Error> {
    ser.serialize_u64(value.as_millis() as u64)
}
