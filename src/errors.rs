use network_interface;
use thiserror::Error;

/// Errors that abort a sweep before or during setup.
///
/// Per-host probe failures (no echo reply, missing ARP entry, unresolved
/// name, closed port) are not errors; they surface as absent fields or
/// absent hosts in the report.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("invalid prefix length /{0}: expected 1-30 or 32")]
    InvalidPrefix(u8),

    #[error("invalid IPv4 address: {0}")]
    InvalidAddress(String),

    #[error("invalid CIDR notation: {0}")]
    InvalidCidr(String),

    #[error("invalid port specification: {0}")]
    InvalidPortSpec(String),

    #[error("concurrency limit {0} out of range 1-1024")]
    InvalidConcurrency(usize),

    #[error("no usable IPv4 interface found")]
    NoUsableInterface,

    #[error("interface '{0}' not found or has no usable IPv4 address")]
    InterfaceNotFound(String),

    #[error("interface enumeration failed: {0}")]
    InterfaceEnumeration(#[from] network_interface::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
