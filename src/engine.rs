use crate::config::ScanConfig;
use crate::db::oui::VendorResolver;
use crate::errors::ScanError;
use crate::model::{HostRecord, InterfaceProfile, ScanReport};
use crate::net::interface;
use crate::net::range::{self, LARGE_RANGE_THRESHOLD};
use crate::probe::{
    arp::ArpStage, name::NameStage, ports::PortScanStage, vendor::VendorStage, ProbeStage,
};
use futures::stream::{self, StreamExt};
use std::future::Future;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// What to sweep: the auto-selected interface, a named one, or an
/// explicit CIDR range.
#[derive(Debug, Clone)]
pub enum ScanTarget {
    Auto,
    Interface(String),
    Cidr(String),
}

/// How a sweep ended. A declined large-range confirmation is a normal
/// outcome, not an error.
#[derive(Debug)]
pub enum ScanOutcome {
    Completed(ScanReport),
    Declined,
}

/// Caller-supplied decision and progress hooks.
///
/// The defaults make a sweep fully non-interactive: large ranges are
/// accepted, the first candidate interface wins, progress is dropped.
pub trait ScanHooks: Send + Sync {
    /// Called once before dispatch when the expanded range exceeds
    /// [`LARGE_RANGE_THRESHOLD`] hosts. Returning false cancels the sweep.
    fn confirm_large_range(&self, host_count: usize) -> bool {
        let _ = host_count;
        true
    }

    /// Called when several candidate interfaces qualify; returns the index
    /// of the one to use. Out-of-range picks fall back to the first.
    fn choose_interface(&self, candidates: &[InterfaceProfile]) -> usize {
        let _ = candidates;
        0
    }

    /// Called after each probed address with the running completion count.
    fn on_progress(&self, done: usize, total: usize) {
        let _ = (done, total);
    }
}

/// The do-nothing hook set.
pub struct SilentHooks;

impl ScanHooks for SilentHooks {}

/// Single-run sweep coordinator: resolves the target, expands the range,
/// dispatches bounded probe workers and aggregates their records.
pub struct ScanEngine {
    config: ScanConfig,
    target: ScanTarget,
    vendor: VendorResolver,
    stages: Arc<Vec<Box<dyn ProbeStage>>>,
}

impl ScanEngine {
    pub fn new(config: ScanConfig, target: ScanTarget) -> Result<Self, ScanError> {
        config.validate()?;
        let vendor = VendorResolver::open(&config);

        let mut stages: Vec<Box<dyn ProbeStage>> = Vec::new();
        stages.push(Box::new(ArpStage));
        stages.push(Box::new(NameStage::new(&config)));
        if !config.skip_ports && !config.ports.is_empty() {
            stages.push(Box::new(PortScanStage::new(&config)));
        }
        // vendor attribution needs the MAC, so it goes last
        stages.push(Box::new(VendorStage::new(vendor.clone())));

        Ok(Self {
            config,
            target,
            vendor,
            stages: Arc::new(stages),
        })
    }

    /// Run the sweep. The vendor cache is written back on every exit
    /// path, including declines and setup errors.
    pub async fn scan(&self, hooks: &dyn ScanHooks) -> Result<ScanOutcome, ScanError> {
        let outcome = self.run(hooks).await;
        self.vendor.persist().await;
        outcome
    }

    async fn run(&self, hooks: &dyn ScanHooks) -> Result<ScanOutcome, ScanError> {
        let started = Instant::now();
        let (network, base, prefix_len) = self.resolve_target(hooks)?;

        if !self.config.skip_arp_flush {
            crate::probe::arp::flush_table().await;
        }

        let expected = range::usable_host_count(prefix_len)?;
        if expected > LARGE_RANGE_THRESHOLD && !hooks.confirm_large_range(expected) {
            log::info!("sweep of {} ({} hosts) declined", network, expected);
            return Ok(ScanOutcome::Declined);
        }

        let addrs = range::expand_addr(base, prefix_len)?;
        let total = addrs.len();
        log::info!(
            "sweeping {} ({} addresses, {} workers)",
            network,
            total,
            self.config.concurrency
        );

        let done = AtomicUsize::new(0);
        let done = &done;
        let config = &self.config;
        let stages = &self.stages;
        let hosts = dispatch_probes(addrs, self.config.concurrency, |addr| async move {
            let record = crate::probe::probe_host(addr, config, stages.as_slice()).await;
            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            hooks.on_progress(finished, total);
            record
        })
        .await;

        let report = ScanReport::new(network, total, started.elapsed(), hosts);
        log::info!(
            "sweep finished: {}/{} addresses responded in {:.2}s",
            report.responsive(),
            report.probed,
            report.elapsed.as_secs_f64()
        );
        Ok(ScanOutcome::Completed(report))
    }

    fn resolve_target(&self, hooks: &dyn ScanHooks) -> Result<(String, Ipv4Addr, u8), ScanError> {
        match &self.target {
            ScanTarget::Cidr(cidr) => {
                let (addr, prefix_len) = range::parse_cidr(cidr)?;
                range::usable_host_count(prefix_len)?;
                Ok((range::cidr_notation(addr, prefix_len), addr, prefix_len))
            }
            ScanTarget::Interface(name) => {
                let profile = interface::profile_by_name(name)?;
                log::info!("using interface {} ({})", profile.name, profile.cidr());
                Ok((profile.cidr(), profile.addr, profile.prefix_len))
            }
            ScanTarget::Auto => {
                let candidates = interface::candidates()?;
                let profile = match candidates.len() {
                    0 => return Err(ScanError::NoUsableInterface),
                    1 => candidates[0].clone(),
                    _ => {
                        let pick = hooks.choose_interface(&candidates);
                        candidates.get(pick).unwrap_or(&candidates[0]).clone()
                    }
                };
                log::info!("auto-selected interface {} ({})", profile.name, profile.cidr());
                Ok((profile.cidr(), profile.addr, profile.prefix_len))
            }
        }
    }
}

/// Probe every address with at most `limit` workers in flight, dropping
/// addresses whose probe produced no record. Order of the returned
/// records follows completion, not input.
pub async fn dispatch_probes<F, Fut>(
    addrs: Vec<Ipv4Addr>,
    limit: usize,
    probe: F,
) -> Vec<HostRecord>
where
    F: Fn(Ipv4Addr) -> Fut,
    Fut: Future<Output = Option<HostRecord>>,
{
    stream::iter(addrs)
        .map(|addr| probe(addr))
        .buffer_unordered(limit.max(1))
        .filter_map(|record| async move { record })
        .collect()
        .await
}
