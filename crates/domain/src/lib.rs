//! Network-policy controller domain layer.
//!
//! Pure data types and algorithms: IPv4 subnet arithmetic, the buddy-style
//! subnet pool, ACL entry value types and priority allocator, the managed
//! zone record and global controller state, event payload types, and
//! configuration. No I/O lives here.

pub mod acl;
pub mod config;
pub mod errors;
pub mod events;
pub mod ipv4;
pub mod pool;
pub mod zone;

pub use acl::{
    AclAction, AclDirection, AclEntry, AclPriorityAllocator, EndpointSelector, EtherType,
    BASELINE_ALLOW_PRIORITY, DEFAULT_ZONE_ACL_PRIORITY, MAX_PRIORITY, ZONE_ACL_PRIORITY_OFFSET,
};
pub use config::{CliOverrides, Config, ConfigError};
pub use errors::{ControllerError, Result};
pub use events::{annotation_keys, EventKind, NamespaceEvent, ServiceEvent};
pub use ipv4::{Ipv4Addr, Ipv4Subnet};
pub use pool::SubnetPool;
pub use zone::{ControllerState, ManagedZone, ZoneSubnet};
