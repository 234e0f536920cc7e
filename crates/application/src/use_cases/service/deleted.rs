//! Service "Deleted" event handling (§4.4.3).

use std::sync::Arc;

use tracing::{info, instrument, warn};
use zonectl_domain::{ControllerError, ControllerState};

use crate::ports::SdnClient;

pub struct ServiceDeletedUseCase {
    sdn: Arc<dyn SdnClient>,
}

impl ServiceDeletedUseCase {
    pub fn new(sdn: Arc<dyn SdnClient>) -> Self {
        Self { sdn }
    }

    #[instrument(skip(self, state), fields(namespace = %namespace, service = %name))]
    pub async fn execute(
        &self,
        state: &mut ControllerState,
        namespace: &str,
        name: &str,
    ) -> Result<(), ControllerError> {
        let Some(zone) = state.zone_mut(namespace) else {
            warn!(namespace = %namespace, service = %name, "service deleted for untracked namespace, skipping");
            return Ok(());
        };

        match zone.network_macros.remove(name) {
            Some(macro_id) => {
                self.sdn.delete_network_macro(&macro_id).await?;
                info!(namespace = %namespace, service = %name, macro_id = %macro_id, "network macro deleted");
                Ok(())
            }
            None => {
                warn!(namespace = %namespace, service = %name, "no macro recorded for this service, skipping");
                Ok(())
            }
        }
    }
}
