//! The managed-zone record and the controller's global, process-local state.

use std::collections::HashMap;

use crate::acl::AclPriorityAllocator;
use crate::ipv4::Ipv4Subnet;
use crate::pool::SubnetPool;

/// One CIDR block this controller has carved out of the pool on behalf of
/// a zone, and the SDN id under which it was registered.
///
/// Modeled as a list element rather than a single field: only one block is
/// ever allocated per namespace today, but the data model permits more.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneSubnet {
    pub subnet_id: String,
    pub block: Ipv4Subnet,
}

/// A managed zone record: one per namespace this controller owns.
#[derive(Debug, Clone, Default)]
pub struct ManagedZone {
    pub zone_id: String,
    /// Empty between zone creation and the first service that needs a
    /// macro group.
    pub network_macro_group_id: Option<String>,
    /// Service name to SDN network-macro id.
    pub network_macros: HashMap<String, String>,
    pub subnets: Vec<ZoneSubnet>,
    /// SDN ids of this zone's own forward ACL entries (default- or
    /// specific-variant, per §4.4.2), recorded so namespace deletion can
    /// remove exactly the entries this zone owns.
    pub ingress_acl_entry_id: Option<String>,
    pub egress_acl_entry_id: Option<String>,
}

impl ManagedZone {
    pub fn new(zone_id: impl Into<String>) -> Self {
        Self {
            zone_id: zone_id.into(),
            network_macro_group_id: None,
            network_macros: HashMap::new(),
            subnets: Vec::new(),
            ingress_acl_entry_id: None,
            egress_acl_entry_id: None,
        }
    }
}

/// All controller-wide state: created once by bootstrap, owned by the
/// reconciler loop, destroyed on exit. Never persisted, never shared
/// outside the single reconciler task (see §5's concurrency model).
#[derive(Debug)]
pub struct ControllerState {
    pub enterprise_id: String,
    pub domain_id: String,
    pub ingress_acl_template_id: String,
    pub egress_acl_template_id: String,
    pub priorities: AclPriorityAllocator,
    pub pool: SubnetPool,
    pub zones: HashMap<String, ManagedZone>,
}

impl ControllerState {
    pub fn new(
        enterprise_id: impl Into<String>,
        domain_id: impl Into<String>,
        ingress_acl_template_id: impl Into<String>,
        egress_acl_template_id: impl Into<String>,
        cluster_cidr: Ipv4Subnet,
    ) -> Self {
        Self {
            enterprise_id: enterprise_id.into(),
            domain_id: domain_id.into(),
            ingress_acl_template_id: ingress_acl_template_id.into(),
            egress_acl_template_id: egress_acl_template_id.into(),
            priorities: AclPriorityAllocator::new(),
            pool: SubnetPool::seeded(cluster_cidr),
            zones: HashMap::new(),
        }
    }

    pub fn is_tracked(&self, namespace: &str) -> bool {
        self.zones.contains_key(namespace)
    }

    pub fn zone(&self, namespace: &str) -> Option<&ManagedZone> {
        self.zones.get(namespace)
    }

    pub fn zone_mut(&mut self, namespace: &str) -> Option<&mut ManagedZone> {
        self.zones.get_mut(namespace)
    }
}
