//! lansweep - single-run IPv4 LAN discovery sweep
//!
//! This library sweeps a local subnet and reports every responsive host:
//! - CIDR and interface-based range expansion
//! - ICMP reachability with per-host round-trip times
//! - MAC harvesting from the OS neighbor table
//! - Vendor attribution via cache, bundled OUI table and remote API
//! - Reverse DNS naming with a NetBIOS fallback
//! - TCP port probing over configurable port sets

pub mod config;
pub mod constants;
pub mod db;
pub mod engine;
pub mod errors;
pub mod model;
pub mod net;
pub mod probe;
pub mod report;

// Re-export commonly used types for convenience
pub use config::ScanConfig;
pub use db::oui::{RemoteVendorLookup, VendorCache, VendorResolver};
pub use engine::{ScanEngine, ScanHooks, ScanOutcome, ScanTarget, SilentHooks};
pub use errors::ScanError;
pub use model::{HostRecord, InterfaceProfile, ScanReport};
pub use probe::ProbeStage;
