//! Namespace "Deleted" event handling (§4.4.1).

use std::sync::Arc;

use tracing::{info, instrument, warn};
use zonectl_domain::{ControllerError, ControllerState};

use crate::ports::SdnClient;
use crate::use_cases::acl;

pub struct NamespaceDeletedUseCase {
    sdn: Arc<dyn SdnClient>,
}

impl NamespaceDeletedUseCase {
    pub fn new(sdn: Arc<dyn SdnClient>) -> Self {
        Self { sdn }
    }

    #[instrument(skip(self, state), fields(namespace = %name))]
    pub async fn execute(
        &self,
        state: &mut ControllerState,
        name: &str,
    ) -> Result<(), ControllerError> {
        match state.zones.remove(name) {
            Some(zone) => {
                acl::delete_zone_acls(&self.sdn, &zone).await?;

                for zone_subnet in &zone.subnets {
                    if let Err(err) = self.sdn.delete_subnet(&zone_subnet.subnet_id).await {
                        warn!(namespace = %name, error = %err, "delete_subnet failed, SDN may be ahead of local state");
                    }
                    if let Err(err) = state.pool.free(zone_subnet.block) {
                        warn!(namespace = %name, error = %err, "pool free failed during namespace deletion");
                    }
                }

                self.sdn.delete_zone(&zone.zone_id).await?;
                info!(namespace = %name, zone_id = %zone.zone_id, "zone deleted");
                Ok(())
            }
            None => self.best_effort_delete_untracked(state, name).await,
        }
    }

    /// The namespace was never tracked by this process (e.g. it predates
    /// this controller instance): best-effort cleanup only.
    async fn best_effort_delete_untracked(
        &self,
        state: &ControllerState,
        name: &str,
    ) -> Result<(), ControllerError> {
        let domain_id = state.domain_id.clone();
        match self.sdn.find_zone_by_name(&domain_id, name).await? {
            Some(zone_id) => {
                self.sdn.delete_zone(&zone_id).await?;
                warn!(namespace = %name, zone_id = %zone_id, "deleted untracked zone found on SDN");
                Ok(())
            }
            None => {
                warn!(namespace = %name, "delete for untracked namespace with no matching zone, ignoring");
                Ok(())
            }
        }
    }
}
