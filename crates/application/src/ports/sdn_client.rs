//! The SDN resource client port (C2): typed, idempotent operations over the
//! conflict-returning REST API described in spec §4.2 and §6.
//!
//! Every create operation below is create-or-get: a conflict on the
//! underlying POST must be resolved by a filter-qualified GET on the
//! entity's natural key, never surfaced to the caller as failure. Delete
//! operations treat "already gone" the way the use cases that call them
//! expect (see `crates/application::use_cases`), not here — this trait's
//! contract is simply "ok" or an error.

use async_trait::async_trait;
use zonectl_domain::{AclDirection, AclEntry, ControllerError, Ipv4Subnet};

/// A bootstrap-session identity: the CSP root credentials used to open the
/// very first session before the managed enterprise exists.
#[derive(Debug, Clone)]
pub struct BootstrapCredentials {
    pub organization: String,
    pub user_name: String,
    pub password: String,
}

#[async_trait]
pub trait SdnClient: Send + Sync {
    /// Opens the bootstrap session as CSP root and obtains an API key for
    /// subsequent requests.
    async fn open_bootstrap_session(
        &self,
        credentials: &BootstrapCredentials,
    ) -> Result<(), ControllerError>;

    /// Re-authenticates as the managed enterprise's own admin user,
    /// clearing organization/credential headers from the bootstrap
    /// session first (§4.2).
    async fn login_as_enterprise_admin(
        &self,
        enterprise_id: &str,
        user_name: &str,
        password: &str,
    ) -> Result<(), ControllerError>;

    async fn create_or_get_enterprise(&self, name: &str) -> Result<String, ControllerError>;

    /// Returns the created/found user's id.
    async fn create_or_get_admin_user(
        &self,
        enterprise_id: &str,
        user_name: &str,
        password: &str,
    ) -> Result<String, ControllerError>;

    /// Ensures `user_id` is a member of the enterprise's fixed `ORGADMIN`
    /// admin group (creating the group first if necessary).
    async fn ensure_admin_group_membership(
        &self,
        enterprise_id: &str,
        user_id: &str,
    ) -> Result<(), ControllerError>;

    /// Installs the license at `path`, or verifies one is already present
    /// when `path` is `None`.
    async fn install_license(&self, path: Option<&str>) -> Result<(), ControllerError>;

    async fn create_or_get_domain_template(
        &self,
        enterprise_id: &str,
        name: &str,
    ) -> Result<String, ControllerError>;

    async fn create_or_get_domain(
        &self,
        enterprise_id: &str,
        domain_template_id: &str,
        name: &str,
    ) -> Result<String, ControllerError>;

    /// Creates or gets the ingress/egress ACL template named `name` under
    /// `domain_id`. Does not seed baseline entries — that is the caller's
    /// job via [`SdnClient::create_or_get_acl_entry`].
    async fn create_or_get_acl_template(
        &self,
        domain_id: &str,
        direction: AclDirection,
        name: &str,
    ) -> Result<String, ControllerError>;

    /// Create-or-get for a single ACL entry (natural key: template id +
    /// direction + priority), resolving the Open Question in spec §9 in
    /// favor of full idempotence at the entry level.
    async fn create_or_get_acl_entry(
        &self,
        template_id: &str,
        direction: AclDirection,
        entry: &AclEntry,
    ) -> Result<String, ControllerError>;

    async fn delete_acl_entry(&self, entry_id: &str) -> Result<(), ControllerError>;

    async fn create_or_get_zone(
        &self,
        domain_id: &str,
        name: &str,
    ) -> Result<String, ControllerError>;

    /// Best-effort lookup used by restart reconciliation (§4.4.1) and by
    /// the untracked-delete path; returns `Ok(None)` rather than
    /// `NotFound` when nothing matches.
    async fn find_zone_by_name(
        &self,
        domain_id: &str,
        name: &str,
    ) -> Result<Option<String>, ControllerError>;

    async fn delete_zone(&self, zone_id: &str) -> Result<(), ControllerError>;

    async fn create_or_get_subnet(
        &self,
        zone_id: &str,
        name: &str,
        block: Ipv4Subnet,
    ) -> Result<String, ControllerError>;

    async fn delete_subnet(&self, subnet_id: &str) -> Result<(), ControllerError>;

    async fn create_or_get_network_macro_group(
        &self,
        enterprise_id: &str,
        name: &str,
    ) -> Result<String, ControllerError>;

    /// Same best-effort shape as [`SdnClient::find_zone_by_name`], used
    /// when resolving the `network-macro-group.name` service annotation.
    async fn find_network_macro_group_by_name(
        &self,
        enterprise_id: &str,
        name: &str,
    ) -> Result<Option<String>, ControllerError>;

    async fn delete_network_macro_group(&self, group_id: &str) -> Result<(), ControllerError>;

    /// `ip_type` is always `"IPv4"` per spec; the parameter exists so the
    /// natural key is explicit rather than assumed by the implementation.
    async fn create_or_get_network_macro(
        &self,
        enterprise_id: &str,
        name: &str,
        ip_type: &str,
        address: &str,
        netmask: &str,
    ) -> Result<String, ControllerError>;

    async fn delete_network_macro(&self, macro_id: &str) -> Result<(), ControllerError>;

    /// PUTs `macro_id` into `group_id`'s member list. A conflict (already
    /// a member) is success.
    async fn add_macro_to_group(
        &self,
        group_id: &str,
        macro_id: &str,
    ) -> Result<(), ControllerError>;
}
