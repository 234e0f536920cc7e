//! ACL entry value types and the per-process priority allocator (C3).

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Priority of the baseline "allow intra-zone traffic" entry seeded into
/// every default-allow ACL template.
pub const BASELINE_ALLOW_PRIORITY: u64 = 0;

/// Priority of the baseline "drop unmatched intra-domain traffic" entry.
/// Also the maximum legal priority.
pub const MAX_PRIORITY: u64 = 1_000_000_000;

/// Priority of the "default" namespace's forward entries, granting every
/// zone access to services published there.
pub const DEFAULT_ZONE_ACL_PRIORITY: u64 = 1;

/// Offset the reconciler adds to the allocator's next value when minting
/// priorities for a non-default zone's own forward entries, keeping them
/// below the reserved low range.
pub const ZONE_ACL_PRIORITY_OFFSET: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AclDirection {
    Ingress,
    Egress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AclAction {
    Forward,
    Drop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EtherType {
    Ipv4,
}

impl EtherType {
    pub const fn code(self) -> u32 {
        match self {
            EtherType::Ipv4 => 0x0800,
        }
    }
}

/// Endpoint selector used as the source or destination of an ACL entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndpointSelector {
    /// Matches traffic to/from the enclosing endpoint's own zone.
    EndpointZone,
    /// Matches traffic to/from any endpoint in the enclosing domain.
    EndpointDomain,
    /// Matches traffic to/from a specific zone, by SDN id.
    Zone(String),
    /// Matches traffic to/from a specific network macro group, by SDN id.
    NetworkMacroGroup(String),
    /// Matches any source or destination.
    Any,
}

/// An ACL entry as the reconciler builds it, independent of the SDN's wire
/// representation (that translation lives in the infrastructure layer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclEntry {
    pub priority: u64,
    pub action: AclAction,
    pub ether_type: EtherType,
    pub source: EndpointSelector,
    pub destination: EndpointSelector,
}

/// Hands out a per-process, monotonically increasing counter of ACL
/// priorities, starting at 0. Range-agnostic: the reconciler is
/// responsible for adding [`ZONE_ACL_PRIORITY_OFFSET`] where the scheme
/// calls for it. Not persisted across restarts (see Open Questions).
#[derive(Debug, Default)]
pub struct AclPriorityAllocator {
    next: AtomicU64,
}

impl AclPriorityAllocator {
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }

    /// Returns the next unused priority and advances the counter by one.
    pub fn next(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}
