//! Namespace "Added" event handling (§4.4.1).

use std::sync::Arc;

use tracing::{info, instrument, warn};
use zonectl_domain::{ControllerError, ControllerState, ManagedZone};

use crate::ports::SdnClient;
use crate::use_cases::acl;

pub struct NamespaceAddedUseCase {
    sdn: Arc<dyn SdnClient>,
    subnet_length: u8,
}

impl NamespaceAddedUseCase {
    pub fn new(sdn: Arc<dyn SdnClient>, subnet_length: u8) -> Self {
        Self { sdn, subnet_length }
    }

    #[instrument(skip(self, state), fields(namespace = %name))]
    pub async fn execute(
        &self,
        state: &mut ControllerState,
        name: &str,
    ) -> Result<(), ControllerError> {
        if state.is_tracked(name) {
            return self.reconcile_already_tracked(state, name).await;
        }
        self.create_new_zone(state, name).await
    }

    async fn create_new_zone(
        &self,
        state: &mut ControllerState,
        name: &str,
    ) -> Result<(), ControllerError> {
        let domain_id = state.domain_id.clone();
        let zone_id = self.sdn.create_or_get_zone(&domain_id, name).await?;

        // pool.alloc wants a CIDR mask, subnet_length is host bits (§4.4.1).
        let block = state.pool.alloc(32 - self.subnet_length)?;
        let subnet_name = format!("{name}-0");
        let subnet_id = match self
            .sdn
            .create_or_get_subnet(&zone_id, &subnet_name, block)
            .await
        {
            Ok(id) => id,
            Err(err) => {
                state.pool.free(block)?;
                return Err(err);
            }
        };

        let mut zone = ManagedZone::new(zone_id.clone());
        zone.subnets.push(zonectl_domain::ZoneSubnet {
            subnet_id,
            block,
        });
        state.zones.insert(name.to_string(), zone);

        if name == "default" {
            acl::create_default_zone_acls(&self.sdn, state, name).await?;
        } else {
            acl::create_specific_zone_acls(&self.sdn, state, name).await?;
        }

        info!(namespace = %name, zone_id = %zone_id, "zone created");
        Ok(())
    }

    /// Restart reconciliation: the namespace was already tracked in a
    /// previous process, replaying "Added" must rediscover the existing
    /// zone on the SDN and recreate its ACL entries idempotently.
    async fn reconcile_already_tracked(
        &self,
        state: &mut ControllerState,
        name: &str,
    ) -> Result<(), ControllerError> {
        let domain_id = state.domain_id.clone();
        match self.sdn.find_zone_by_name(&domain_id, name).await? {
            Some(zone_id) => {
                if name == "default" {
                    acl::create_default_zone_acls(&self.sdn, state, name).await?;
                } else {
                    acl::create_specific_zone_acls(&self.sdn, state, name).await?;
                }
                warn!(namespace = %name, zone_id = %zone_id, "namespace already tracked, ACLs re-applied idempotently");
                Ok(())
            }
            None => Err(ControllerError::NotFound(format!(
                "zone for namespace {name} not found on restart reconciliation"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeSdnClient;
    use zonectl_domain::Ipv4Subnet;

    fn state() -> ControllerState {
        let cidr: Ipv4Subnet = "10.128.0.0/14".parse().unwrap();
        ControllerState::new("ent-1", "dom-1", "tmpl-in", "tmpl-eg", cidr)
    }

    #[tokio::test]
    async fn added_namespace_allocates_subnet_and_registers_zone() {
        let sdn = Arc::new(FakeSdnClient::new());
        let use_case = NamespaceAddedUseCase::new(sdn.clone(), 8);
        let mut state = state();

        use_case.execute(&mut state, "alpha").await.unwrap();

        let zone = state.zone("alpha").unwrap();
        assert_eq!(zone.subnets.len(), 1);
        assert_eq!(zone.subnets[0].block.to_string(), "10.128.0.0/24");
        assert!(zone.ingress_acl_entry_id.is_some());
        assert!(zone.egress_acl_entry_id.is_some());
    }

    #[tokio::test]
    async fn replaying_added_twice_is_idempotent() {
        let sdn = Arc::new(FakeSdnClient::new());
        let use_case = NamespaceAddedUseCase::new(sdn.clone(), 8);
        let mut state = state();

        use_case.execute(&mut state, "alpha").await.unwrap();
        let zone_count_before = sdn.zone_count();
        let acl_count_before = sdn.acl_entry_count();

        use_case.execute(&mut state, "alpha").await.unwrap();

        assert_eq!(sdn.zone_count(), zone_count_before);
        assert_eq!(sdn.acl_entry_count(), acl_count_before);
    }

    #[tokio::test]
    async fn default_namespace_gets_priority_one_entries() {
        let sdn = Arc::new(FakeSdnClient::new());
        let use_case = NamespaceAddedUseCase::new(sdn.clone(), 8);
        let mut state = state();

        use_case.execute(&mut state, "default").await.unwrap();

        let zone = state.zone("default").unwrap();
        let ingress_id = zone.ingress_acl_entry_id.clone().unwrap();
        let priority = sdn.acl_entry_priority(&ingress_id).unwrap();
        assert_eq!(priority, 1);
    }

    #[tokio::test]
    async fn specific_zone_gets_sequential_priorities_from_offset() {
        let sdn = Arc::new(FakeSdnClient::new());
        let use_case = NamespaceAddedUseCase::new(sdn.clone(), 8);
        let mut state = state();

        use_case.execute(&mut state, "alpha").await.unwrap();

        let zone = state.zone("alpha").unwrap();
        let ingress_priority = sdn
            .acl_entry_priority(zone.ingress_acl_entry_id.as_ref().unwrap())
            .unwrap();
        let egress_priority = sdn
            .acl_entry_priority(zone.egress_acl_entry_id.as_ref().unwrap())
            .unwrap();
        assert_eq!(ingress_priority, 300);
        assert_eq!(egress_priority, 301);
    }
}
