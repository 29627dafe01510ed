use super::ProbeStage;
use crate::config::ScanConfig;
use crate::errors::ScanError;
use crate::model::HostRecord;
use async_trait::async_trait;
use dns_lookup::lookup_addr;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;
use tokio::net::UdpSocket;

/// Host naming: reverse DNS first, NetBIOS node status as the fallback
/// for Windows boxes without PTR records.
pub struct NameStage {
    netbios_wait: Duration,
}

impl NameStage {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            netbios_wait: Duration::from_millis(config.netbios_timeout_ms),
        }
    }
}

#[async_trait]
impl ProbeStage for NameStage {
    fn name(&self) -> &'static str {
        "name"
    }

    async fn enrich(&self, host: &mut HostRecord) -> Result<(), ScanError> {
        if let Some(name) = reverse_dns(host.addr).await {
            host.hostname = Some(name);
            return Ok(());
        }
        host.hostname = netbios_name(host.addr, self.netbios_wait).await;
        Ok(())
    }
}

/// Reverse DNS lookup, run on the blocking pool since the resolver call
/// is synchronous.
pub async fn reverse_dns(addr: Ipv4Addr) -> Option<String> {
    let ip: IpAddr = addr.into();
    let name = tokio::task::spawn_blocking(move || lookup_addr(&ip).ok())
        .await
        .ok()
        .flatten()?;
    // the resolver echoes the address back when there is no PTR record
    (name != addr.to_string()).then_some(name)
}

/// Ask an address for its NetBIOS node status directly over UDP 137.
pub async fn netbios_name(addr: Ipv4Addr, wait: Duration) -> Option<String> {
    let socket = UdpSocket::bind("0.0.0.0:0").await.ok()?;
    let txn_id: u16 = rand::random();
    let query = build_node_status_query(txn_id);
    socket.send_to(&query, (addr, 137)).await.ok()?;
    let mut buf = [0u8; 1024];
    let (len, _peer) = tokio::time::timeout(wait, socket.recv_from(&mut buf))
        .await
        .ok()?
        .ok()?;
    parse_node_status(&buf[..len], txn_id)
}

/// NBSTAT query packet for the wildcard name.
pub fn build_node_status_query(txn_id: u16) -> Vec<u8> {
    let mut packet = Vec::with_capacity(50);
    packet.extend_from_slice(&txn_id.to_be_bytes());
    packet.extend_from_slice(&[0x00, 0x00]); // flags: plain query
    packet.extend_from_slice(&[0x00, 0x01]); // one question
    packet.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
    packet.push(32);
    packet.extend_from_slice(&encoded_wildcard_name());
    packet.push(0);
    packet.extend_from_slice(&[0x00, 0x21]); // NBSTAT
    packet.extend_from_slice(&[0x00, 0x01]); // IN
    packet
}

/// First-level encoding of the wildcard name `*`, NUL padded to 16 bytes,
/// each byte split into two nibbles offset from 'A'.
pub fn encoded_wildcard_name() -> [u8; 32] {
    let mut raw = [0u8; 16];
    raw[0] = b'*';
    let mut encoded = [0u8; 32];
    for (i, b) in raw.iter().enumerate() {
        encoded[2 * i] = b'A' + (b >> 4);
        encoded[2 * i + 1] = b'A' + (b & 0x0F);
    }
    encoded
}

/// Pull the workstation name out of a node status response. Datagrams
/// whose transaction id does not match the query are discarded. Unique
/// names with suffix 0x00 are taken; group names and service entries
/// are not.
pub fn parse_node_status(data: &[u8], txn_id: u16) -> Option<String> {
    if data.len() < 12 || data[0..2] != txn_id.to_be_bytes() {
        return None;
    }
    let questions = u16::from_be_bytes([data[4], data[5]]);
    let answers = u16::from_be_bytes([data[6], data[7]]);
    if answers == 0 {
        return None;
    }
    let mut pos = 12;
    for _ in 0..questions {
        pos = skip_name(data, pos)?;
        pos = pos.checked_add(4)?;
    }
    for _ in 0..answers {
        pos = skip_name(data, pos)?;
        if pos + 10 > data.len() {
            return None;
        }
        let rtype = u16::from_be_bytes([data[pos], data[pos + 1]]);
        let rdlen = u16::from_be_bytes([data[pos + 8], data[pos + 9]]) as usize;
        pos += 10;
        if pos + rdlen > data.len() {
            return None;
        }
        if rtype == 0x0021 {
            return first_unique_name(&data[pos..pos + rdlen]);
        }
        pos += rdlen;
    }
    None
}

fn skip_name(data: &[u8], mut pos: usize) -> Option<usize> {
    loop {
        let len = *data.get(pos)? as usize;
        if len == 0 {
            return Some(pos + 1);
        }
        if len & 0xC0 == 0xC0 {
            return Some(pos + 2);
        }
        pos += len + 1;
    }
}

fn first_unique_name(rdata: &[u8]) -> Option<String> {
    let count = *rdata.first()? as usize;
    let names = rdata.get(1..)?;
    for entry in names.chunks_exact(18).take(count) {
        let suffix = entry[15];
        let flags = u16::from_be_bytes([entry[16], entry[17]]);
        // bit 15 set marks a group name
        if suffix != 0x00 || flags & 0x8000 != 0 {
            continue;
        }
        let name = String::from_utf8_lossy(&entry[..15])
            .trim_end_matches(|c| c == ' ' || c == '\0')
            .to_string();
        if !name.is_empty() && name.chars().all(|c| c.is_ascii() && !c.is_ascii_control()) {
            return Some(name);
        }
    }
    None
}
