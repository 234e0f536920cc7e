//! Input event payloads consumed from the cluster watchers (out of scope
//! collaborators, per §1 — only their wire shape is specified here).

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Added,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceEvent {
    pub kind: EventKind,
    pub name: String,
}

impl NamespaceEvent {
    pub fn added(name: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Added,
            name: name.into(),
        }
    }

    pub fn deleted(name: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Deleted,
            name: name.into(),
        }
    }
}

/// Recognised annotation keys on a service event, resolved in this order
/// of precedence by the service-added use case: `id` wins, `name` is a
/// fallback, then `zone`.
pub mod annotation_keys {
    pub const NETWORK_MACRO_GROUP_ID: &str = "network-macro-group.id";
    pub const NETWORK_MACRO_GROUP_NAME: &str = "network-macro-group.name";
    pub const ZONE: &str = "zone";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEvent {
    pub kind: EventKind,
    pub namespace: String,
    pub name: String,
    pub cluster_ip: String,
    pub nuage_annotations: HashMap<String, String>,
}

impl ServiceEvent {
    pub fn added(
        namespace: impl Into<String>,
        name: impl Into<String>,
        cluster_ip: impl Into<String>,
        nuage_annotations: HashMap<String, String>,
    ) -> Self {
        Self {
            kind: EventKind::Added,
            namespace: namespace.into(),
            name: name.into(),
            cluster_ip: cluster_ip.into(),
            nuage_annotations,
        }
    }

    pub fn deleted(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Deleted,
            namespace: namespace.into(),
            name: name.into(),
            cluster_ip: String::new(),
            nuage_annotations: HashMap::new(),
        }
    }
}
