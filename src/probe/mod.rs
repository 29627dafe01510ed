use crate::config::ScanConfig;
use crate::errors::ScanError;
use crate::model::HostRecord;
use crate::net::ping::ping_host;
use async_trait::async_trait;
use std::net::Ipv4Addr;

pub mod arp;
pub mod name;
pub mod ports;
pub mod vendor;

/// One enrichment step applied to a responsive host.
///
/// Stages run in order inside a probe worker and fill in what they can;
/// a stage that finds nothing leaves the record as it was. Stage errors
/// never fail the host.
#[async_trait]
pub trait ProbeStage: Send + Sync {
    /// Enrich the record in place with whatever this stage discovers.
    async fn enrich(&self, host: &mut HostRecord) -> Result<(), ScanError>;

    /// Short name used in debug logging.
    fn name(&self) -> &'static str;
}

/// Probe one address end to end: reachability first, then every
/// enrichment stage. An unreachable address yields no record at all.
pub async fn probe_host(
    addr: Ipv4Addr,
    config: &ScanConfig,
    stages: &[Box<dyn ProbeStage>],
) -> Option<HostRecord> {
    let rtt = ping_host(addr, config).await?;
    let mut host = HostRecord::new(addr);
    host.rtt = Some(rtt);
    for stage in stages {
        if let Err(e) = stage.enrich(&mut host).await {
            log::debug!("{} stage skipped for {}: {}", stage.name(), addr, e);
        }
    }
    Some(host)
}
