use super::ProbeStage;
use crate::config::ScanConfig;
use crate::errors::ScanError;
use crate::model::HostRecord;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Ports tried at once within a single host worker.
const PORT_PROBE_PARALLELISM: usize = 16;

/// TCP connect probe over a fixed port list.
pub struct PortScanStage {
    ports: Vec<u16>,
    connect_timeout: Duration,
}

impl PortScanStage {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            ports: config.ports.clone(),
            connect_timeout: Duration::from_millis(config.tcp_connect_timeout_ms),
        }
    }
}

#[async_trait]
impl ProbeStage for PortScanStage {
    fn name(&self) -> &'static str {
        "ports"
    }

    async fn enrich(&self, host: &mut HostRecord) -> Result<(), ScanError> {
        host.open_ports = scan_ports(host.addr, &self.ports, self.connect_timeout).await;
        Ok(())
    }
}

/// Try a TCP connect against each port, a bounded number in flight.
/// Returns the open ports in ascending order.
pub async fn scan_ports(addr: Ipv4Addr, ports: &[u16], connect_timeout: Duration) -> Vec<u16> {
    let mut open: Vec<u16> = stream::iter(ports.to_vec())
        .map(|port| async move {
            let target = SocketAddr::new(IpAddr::V4(addr), port);
            match timeout(connect_timeout, TcpStream::connect(target)).await {
                Ok(Ok(_stream)) => Some(port),
                _ => None,
            }
        })
        .buffer_unordered(PORT_PROBE_PARALLELISM)
        .filter_map(|result| async move { result })
        .collect()
        .await;
    open.sort_unstable();
    open
}
