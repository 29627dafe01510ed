use crate::config::ScanConfig;
use crate::errors::ScanError;
use crate::model::InterfaceProfile;
use network_interface::{Addr, NetworkInterface, NetworkInterfaceConfig};
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;
use surge_ping::ping;
use tokio::time::timeout;

/// IPv4 range arithmetic on 32-bit address values
pub mod range {
    use super::*;

    /// Host counts above this require the caller's confirmation before any
    /// probe is dispatched.
    pub const LARGE_RANGE_THRESHOLD: usize = 1024;

    /// Subnet mask for a prefix length, clamped to valid bit counts.
    pub fn subnet_mask(prefix_len: u8) -> u32 {
        if prefix_len == 0 {
            0
        } else if prefix_len >= 32 {
            u32::MAX
        } else {
            !((1u32 << (32 - prefix_len)) - 1)
        }
    }

    /// Number of probe-worthy addresses in a subnet of the given prefix
    /// length. Network and broadcast addresses are not counted; /32 names
    /// exactly one host. /0 and /31 are rejected along with anything
    /// above /32.
    pub fn usable_host_count(prefix_len: u8) -> Result<usize, ScanError> {
        match prefix_len {
            32 => Ok(1),
            1..=30 => Ok(((1u64 << (32 - prefix_len)) - 2) as usize),
            _ => Err(ScanError::InvalidPrefix(prefix_len)),
        }
    }

    /// Expand a base address and prefix length into the ordered list of
    /// host addresses to probe, excluding the network and broadcast
    /// addresses. The base may lie anywhere inside the subnet.
    pub fn expand(base: &str, prefix_len: u8) -> Result<Vec<Ipv4Addr>, ScanError> {
        let addr: Ipv4Addr = base
            .trim()
            .parse()
            .map_err(|_| ScanError::InvalidAddress(base.to_string()))?;
        expand_addr(addr, prefix_len)
    }

    /// See [`expand`]; takes an already parsed address.
    pub fn expand_addr(addr: Ipv4Addr, prefix_len: u8) -> Result<Vec<Ipv4Addr>, ScanError> {
        let count = usable_host_count(prefix_len)?;
        if prefix_len == 32 {
            return Ok(vec![addr]);
        }
        let network = u32::from(addr) & subnet_mask(prefix_len);
        Ok((1..=count as u32)
            .map(|offset| Ipv4Addr::from(network + offset))
            .collect())
    }

    /// Parse `a.b.c.d/len` notation. Only the syntax is checked here;
    /// prefix policy is enforced when the range is expanded.
    pub fn parse_cidr(cidr: &str) -> Result<(Ipv4Addr, u8), ScanError> {
        let (addr_part, len_part) = cidr
            .trim()
            .split_once('/')
            .ok_or_else(|| ScanError::InvalidCidr(cidr.to_string()))?;
        let addr: Ipv4Addr = addr_part
            .parse()
            .map_err(|_| ScanError::InvalidAddress(addr_part.to_string()))?;
        let prefix_len: u8 = len_part
            .parse()
            .map_err(|_| ScanError::InvalidCidr(cidr.to_string()))?;
        Ok((addr, prefix_len))
    }

    /// Normalized CIDR display form: network address plus prefix length.
    pub fn cidr_notation(addr: Ipv4Addr, prefix_len: u8) -> String {
        let network = Ipv4Addr::from(u32::from(addr) & subnet_mask(prefix_len));
        format!("{}/{}", network, prefix_len)
    }
}

/// ICMP reachability probing
pub mod ping {
    use super::*;

    /// Ping one address, retrying up to the configured attempt count.
    /// Returns the round-trip time of the first reply, or None when every
    /// attempt times out or the echo request cannot be sent.
    pub async fn ping_host(addr: Ipv4Addr, config: &ScanConfig) -> Option<Duration> {
        let target_ip: IpAddr = addr.into();
        let per_attempt = Duration::from_millis(config.ping_timeout_ms);
        let payload = [0; 56];
        for _ in 0..config.ping_attempts.max(1) {
            match timeout(per_attempt, ping(target_ip, &payload)).await {
                Ok(Ok((_icmp_packet, rtt))) => return Some(rtt),
                _ => continue,
            }
        }
        None
    }
}

/// Interface enumeration and selection
pub mod interface {
    use super::*;

    /// Name fragments of adapters never offered for auto-selection.
    const EXCLUDED_NAME_PARTS: &[&str] = &[
        "docker",
        "veth",
        "virbr",
        "vmnet",
        "vbox",
        "bluetooth",
        "loopback",
        "tailscale",
    ];

    /// All interfaces eligible for scanning: administratively usable, with
    /// an IPv4 address that is not loopback, link-local or unspecified,
    /// and a contiguous netmask.
    pub fn candidates() -> Result<Vec<InterfaceProfile>, ScanError> {
        let mut found = Vec::new();
        for iface in NetworkInterface::show()? {
            if is_excluded_name(&iface.name) {
                continue;
            }
            for addr in &iface.addr {
                if let Some(profile) = profile_from_addr(&iface.name, addr) {
                    found.push(profile);
                }
            }
        }
        Ok(found)
    }

    /// Resolve an interface by its exact name. Explicit selection bypasses
    /// the name blocklist but the address still has to qualify.
    pub fn profile_by_name(name: &str) -> Result<InterfaceProfile, ScanError> {
        for iface in NetworkInterface::show()? {
            if iface.name != name {
                continue;
            }
            for addr in &iface.addr {
                if let Some(profile) = profile_from_addr(&iface.name, addr) {
                    return Ok(profile);
                }
            }
        }
        Err(ScanError::InterfaceNotFound(name.to_string()))
    }

    fn profile_from_addr(name: &str, addr: &Addr) -> Option<InterfaceProfile> {
        let v4 = match addr {
            Addr::V4(v4) => v4,
            Addr::V6(_) => return None,
        };
        let ip = v4.ip;
        if ip.is_loopback() || ip.is_unspecified() || ip.is_link_local() || ip.is_broadcast() {
            return None;
        }
        let prefix_len = prefix_from_netmask(v4.netmask?)?;
        Some(InterfaceProfile {
            name: name.to_string(),
            description: describe(name),
            addr: ip,
            prefix_len,
        })
    }

    /// Prefix length of a netmask, or None when the mask bits are not
    /// contiguous or the mask is empty.
    pub fn prefix_from_netmask(netmask: Ipv4Addr) -> Option<u8> {
        let mask = u32::from(netmask);
        if mask == 0 || mask.count_ones() != mask.leading_ones() {
            return None;
        }
        Some(mask.count_ones() as u8)
    }

    fn is_excluded_name(name: &str) -> bool {
        let lower = name.to_ascii_lowercase();
        lower == "lo" || lower == "lo0" || EXCLUDED_NAME_PARTS.iter().any(|p| lower.contains(p))
    }

    fn describe(name: &str) -> String {
        let lower = name.to_ascii_lowercase();
        let kind = if lower.starts_with("wl") || lower.contains("wi-fi") || lower.contains("wireless")
        {
            "Wireless LAN adapter"
        } else if lower.starts_with("eth") || lower.starts_with("en") {
            "Ethernet adapter"
        } else if lower.starts_with("tun") || lower.starts_with("tap") || lower.starts_with("wg") {
            "Tunnel adapter"
        } else {
            "Network adapter"
        };
        kind.to_string()
    }
}
