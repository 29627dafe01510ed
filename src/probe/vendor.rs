use super::ProbeStage;
use crate::db::oui::VendorResolver;
use crate::errors::ScanError;
use crate::model::HostRecord;
use async_trait::async_trait;

/// Vendor attribution from the MAC found by the ARP stage; runs after it
/// and does nothing for hosts without a MAC.
pub struct VendorStage {
    resolver: VendorResolver,
}

impl VendorStage {
    pub fn new(resolver: VendorResolver) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl ProbeStage for VendorStage {
    fn name(&self) -> &'static str {
        "vendor"
    }

    async fn enrich(&self, host: &mut HostRecord) -> Result<(), ScanError> {
        if let Some(mac) = host.mac.clone() {
            host.vendor = self.resolver.resolve(&mac).await;
        }
        Ok(())
    }
}
