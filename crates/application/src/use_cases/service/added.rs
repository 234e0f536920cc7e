//! Service "Added" event handling (§4.4.3).

use std::sync::Arc;

use tracing::{info, instrument};
use zonectl_domain::{annotation_keys, ControllerError, ControllerState, ServiceEvent};

use crate::ports::SdnClient;

pub struct ServiceAddedUseCase {
    sdn: Arc<dyn SdnClient>,
}

impl ServiceAddedUseCase {
    pub fn new(sdn: Arc<dyn SdnClient>) -> Self {
        Self { sdn }
    }

    #[instrument(skip(self, state, event), fields(namespace = %event.namespace, service = %event.name))]
    pub async fn execute(
        &self,
        state: &mut ControllerState,
        event: &ServiceEvent,
    ) -> Result<(), ControllerError> {
        let target_group_id = self.resolve_target_macro_group(state, event).await?;

        let macro_name = format!(
            "NetworkMacro for service: {}/{}",
            event.namespace, event.name
        );
        let macro_id = self
            .sdn
            .create_or_get_network_macro(
                &state.enterprise_id,
                &macro_name,
                "IPv4",
                &event.cluster_ip,
                "255.255.255.255",
            )
            .await?;

        if let Some(zone) = state.zone_mut(&event.namespace) {
            zone.network_macros
                .insert(event.name.clone(), macro_id.clone());
        }

        // A conflict here means the macro is already a member: success.
        self.sdn.add_macro_to_group(&target_group_id, &macro_id).await?;

        info!(
            namespace = %event.namespace,
            service = %event.name,
            macro_id = %macro_id,
            group_id = %target_group_id,
            "network macro created and attached to group"
        );
        Ok(())
    }

    /// Precedence order from §4.4.3: `network-macro-group.id` wins,
    /// `network-macro-group.name` is a fallback, then `zone`, then the
    /// event's own tracked namespace.
    async fn resolve_target_macro_group(
        &self,
        state: &ControllerState,
        event: &ServiceEvent,
    ) -> Result<String, ControllerError> {
        if let Some(id) = event
            .nuage_annotations
            .get(annotation_keys::NETWORK_MACRO_GROUP_ID)
        {
            return Ok(id.clone());
        }

        if let Some(name) = event
            .nuage_annotations
            .get(annotation_keys::NETWORK_MACRO_GROUP_NAME)
        {
            return self
                .sdn
                .find_network_macro_group_by_name(&state.enterprise_id, name)
                .await?
                .ok_or_else(|| {
                    ControllerError::AnnotationError(format!(
                        "network-macro-group.name {name} does not resolve to an existing group"
                    ))
                });
        }

        if let Some(zone_name) = event.nuage_annotations.get(annotation_keys::ZONE) {
            if zone_name != &event.namespace || !state.is_tracked(zone_name) {
                return Err(ControllerError::AnnotationError(format!(
                    "zone annotation {zone_name} must name this service's own tracked namespace ({})",
                    event.namespace
                )));
            }
            let zone = state.zone(zone_name).expect("checked tracked above");
            return zone.network_macro_group_id.clone().ok_or_else(|| {
                ControllerError::AnnotationError(format!(
                    "zone {zone_name} has no macro group yet"
                ))
            });
        }

        let zone = state.zone(&event.namespace).ok_or_else(|| {
            ControllerError::AnnotationError(format!(
                "namespace {} is not tracked and no annotation selects a macro group",
                event.namespace
            ))
        })?;
        zone.network_macro_group_id.clone().ok_or_else(|| {
            ControllerError::AnnotationError(format!(
                "namespace {} has no macro group yet",
                event.namespace
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeSdnClient;
    use crate::use_cases::namespace::added::NamespaceAddedUseCase;
    use std::collections::HashMap;
    use zonectl_domain::Ipv4Subnet;

    fn state() -> ControllerState {
        let cidr: Ipv4Subnet = "10.128.0.0/14".parse().unwrap();
        ControllerState::new("ent-1", "dom-1", "tmpl-in", "tmpl-eg", cidr)
    }

    #[tokio::test]
    async fn service_with_no_annotations_joins_own_namespace_group() {
        let sdn = Arc::new(FakeSdnClient::new());
        let mut state = state();
        NamespaceAddedUseCase::new(sdn.clone(), 8)
            .execute(&mut state, "alpha")
            .await
            .unwrap();

        let use_case = ServiceAddedUseCase::new(sdn.clone());
        let event = ServiceEvent::added("alpha", "web", "172.30.1.5", HashMap::new());
        use_case.execute(&mut state, &event).await.unwrap();

        let zone = state.zone("alpha").unwrap();
        let macro_id = zone.network_macros.get("web").unwrap();
        let group_id = zone.network_macro_group_id.clone().unwrap();
        assert!(sdn.group_members_of(&group_id).contains(macro_id));
        assert_eq!(sdn.macro_count(), 1);
    }

    #[tokio::test]
    async fn zone_annotation_mismatched_namespace_fails_without_creating_macro() {
        let sdn = Arc::new(FakeSdnClient::new());
        let mut state = state();
        NamespaceAddedUseCase::new(sdn.clone(), 8)
            .execute(&mut state, "alpha")
            .await
            .unwrap();
        NamespaceAddedUseCase::new(sdn.clone(), 8)
            .execute(&mut state, "beta")
            .await
            .unwrap();

        let use_case = ServiceAddedUseCase::new(sdn.clone());
        let mut annotations = HashMap::new();
        annotations.insert("zone".to_string(), "beta".to_string());
        let event = ServiceEvent::added("alpha", "web", "172.30.1.5", annotations);

        let result = use_case.execute(&mut state, &event).await;
        assert!(matches!(result, Err(ControllerError::AnnotationError(_))));
        assert_eq!(sdn.macro_count(), 0);
    }

    #[tokio::test]
    async fn id_annotation_wins_over_name_annotation() {
        let sdn = Arc::new(FakeSdnClient::new());
        let mut state = state();
        NamespaceAddedUseCase::new(sdn.clone(), 8)
            .execute(&mut state, "alpha")
            .await
            .unwrap();

        let use_case = ServiceAddedUseCase::new(sdn.clone());
        let mut annotations = HashMap::new();
        annotations.insert("network-macro-group.id".to_string(), "explicit-group".to_string());
        annotations.insert(
            "network-macro-group.name".to_string(),
            "does-not-exist".to_string(),
        );
        let event = ServiceEvent::added("alpha", "web", "172.30.1.5", annotations);

        use_case.execute(&mut state, &event).await.unwrap();
        assert!(sdn.group_members_of("explicit-group").len() == 1);
    }
}
