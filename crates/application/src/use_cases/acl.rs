//! ACL policy helpers shared by bootstrap and the namespace-added use case
//! (§4.4.2).

use std::sync::Arc;

use tracing::instrument;
use zonectl_domain::{
    AclAction, AclDirection, AclEntry, ControllerState, EndpointSelector, EtherType,
    ManagedZone, BASELINE_ALLOW_PRIORITY, DEFAULT_ZONE_ACL_PRIORITY, MAX_PRIORITY,
    ZONE_ACL_PRIORITY_OFFSET, ControllerError,
};

use crate::ports::SdnClient;

/// Seeds both baseline entries — intra-zone allow and intra-domain-drop —
/// into one ACL template. Called once per direction at bootstrap for each
/// of the ingress/egress templates (§4.4.2), and safe to call again on
/// restart thanks to create-or-get.
#[instrument(skip(sdn))]
pub async fn seed_baseline_entries(
    sdn: &Arc<dyn SdnClient>,
    template_id: &str,
    direction: AclDirection,
) -> Result<(), ControllerError> {
    let allow = AclEntry {
        priority: BASELINE_ALLOW_PRIORITY,
        action: AclAction::Forward,
        ether_type: EtherType::Ipv4,
        source: EndpointSelector::EndpointZone,
        destination: EndpointSelector::EndpointZone,
    };
    let drop_unmatched = AclEntry {
        priority: MAX_PRIORITY,
        action: AclAction::Drop,
        ether_type: EtherType::Ipv4,
        source: EndpointSelector::Any,
        destination: EndpointSelector::EndpointDomain,
    };
    sdn.create_or_get_acl_entry(template_id, direction, &allow)
        .await?;
    sdn.create_or_get_acl_entry(template_id, direction, &drop_unmatched)
        .await?;
    Ok(())
}

/// The namespace literally named `"default"`: a macro group named
/// `"default"` plus a priority-1 forward pair granting every zone access
/// to services published there.
#[instrument(skip(sdn, state))]
pub async fn create_default_zone_acls(
    sdn: &Arc<dyn SdnClient>,
    state: &mut ControllerState,
    namespace: &str,
) -> Result<(), ControllerError> {
    let group_id = sdn
        .create_or_get_network_macro_group(&state.enterprise_id, "default")
        .await?;

    let entry = AclEntry {
        priority: DEFAULT_ZONE_ACL_PRIORITY,
        action: AclAction::Forward,
        ether_type: EtherType::Ipv4,
        source: EndpointSelector::Any,
        destination: EndpointSelector::NetworkMacroGroup(group_id.clone()),
    };
    let ingress_id = sdn
        .create_or_get_acl_entry(&state.ingress_acl_template_id, AclDirection::Ingress, &entry)
        .await?;
    let egress_id = sdn
        .create_or_get_acl_entry(&state.egress_acl_template_id, AclDirection::Egress, &entry)
        .await?;

    let zone = state
        .zone_mut(namespace)
        .expect("zone must already be registered before ACLs are created");
    zone.network_macro_group_id = Some(group_id);
    zone.ingress_acl_entry_id = Some(ingress_id);
    zone.egress_acl_entry_id = Some(egress_id);
    Ok(())
}

/// Any other namespace: a per-zone macro group `"Service Group For Zone -
/// <name>"` plus a forward pair granting that zone access to its own
/// services, at priorities `300 + allocator.next()`.
#[instrument(skip(sdn, state))]
pub async fn create_specific_zone_acls(
    sdn: &Arc<dyn SdnClient>,
    state: &mut ControllerState,
    namespace: &str,
) -> Result<(), ControllerError> {
    let zone_id = state
        .zone(namespace)
        .expect("zone must already be registered before ACLs are created")
        .zone_id
        .clone();

    let group_name = format!("Service Group For Zone - {namespace}");
    let group_id = sdn
        .create_or_get_network_macro_group(&state.enterprise_id, &group_name)
        .await?;

    let ingress_priority = ZONE_ACL_PRIORITY_OFFSET + state.priorities.next();
    let egress_priority = ZONE_ACL_PRIORITY_OFFSET + state.priorities.next();

    let ingress_entry = AclEntry {
        priority: ingress_priority,
        action: AclAction::Forward,
        ether_type: EtherType::Ipv4,
        source: EndpointSelector::Zone(zone_id),
        destination: EndpointSelector::NetworkMacroGroup(group_id.clone()),
    };
    let egress_entry = AclEntry {
        priority: egress_priority,
        ..ingress_entry.clone()
    };

    let ingress_id = sdn
        .create_or_get_acl_entry(
            &state.ingress_acl_template_id,
            AclDirection::Ingress,
            &ingress_entry,
        )
        .await?;
    let egress_id = sdn
        .create_or_get_acl_entry(
            &state.egress_acl_template_id,
            AclDirection::Egress,
            &egress_entry,
        )
        .await?;

    let zone = state
        .zone_mut(namespace)
        .expect("zone must already be registered before ACLs are created");
    zone.network_macro_group_id = Some(group_id);
    zone.ingress_acl_entry_id = Some(ingress_id);
    zone.egress_acl_entry_id = Some(egress_id);
    Ok(())
}

/// Deletes whichever forward ACL entries [`create_default_zone_acls`] or
/// [`create_specific_zone_acls`] recorded for this zone, and its macro
/// group. Missing entries are not an error — the SDN may already be ahead
/// of local state (§4.4.1's deletion semantics).
pub async fn delete_zone_acls(
    sdn: &Arc<dyn SdnClient>,
    zone: &ManagedZone,
) -> Result<(), ControllerError> {
    if let Some(id) = &zone.ingress_acl_entry_id {
        sdn.delete_acl_entry(id).await?;
    }
    if let Some(id) = &zone.egress_acl_entry_id {
        sdn.delete_acl_entry(id).await?;
    }
    if let Some(group_id) = &zone.network_macro_group_id {
        sdn.delete_network_macro_group(group_id).await?;
    }
    Ok(())
}
