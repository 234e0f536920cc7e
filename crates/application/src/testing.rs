//! An in-memory fake of [`SdnClient`], used only by this crate's own unit
//! tests and by the top-level integration tests. Mirrors the teacher's
//! `tests/helpers/mock_repositories.rs` pattern: a hand-written fake behind
//! the port trait, no mocking crate, no live network.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use zonectl_domain::{AclDirection, AclEntry, ControllerError, Ipv4Subnet};

use crate::ports::{BootstrapCredentials, SdnClient};

#[derive(Debug)]
struct AclEntryRecord {
    template_id: String,
    direction: AclDirection,
    entry: AclEntry,
}

#[derive(Default)]
pub struct FakeSdnClient {
    next_id: AtomicU64,

    enterprises: Mutex<HashMap<String, String>>,
    users: Mutex<HashMap<(String, String), String>>,
    admin_group_members: Mutex<HashSet<(String, String)>>,
    license_installed: Mutex<bool>,
    domain_templates: Mutex<HashMap<(String, String), String>>,
    domains: Mutex<HashMap<(String, String), String>>,
    acl_templates: Mutex<HashMap<(String, String), String>>,
    acl_entries: Mutex<HashMap<String, AclEntryRecord>>,
    zones: Mutex<HashMap<(String, String), String>>,
    subnets: Mutex<HashMap<(String, String), String>>,
    macro_groups: Mutex<HashMap<(String, String), String>>,
    macros: Mutex<HashMap<(String, String, String, String, String), String>>,
    group_members: Mutex<HashSet<(String, String)>>,
}

impl FakeSdnClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_id(&self, prefix: &str) -> String {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        format!("{prefix}-{n}")
    }

    pub fn zone_count(&self) -> usize {
        self.zones.lock().unwrap().len()
    }

    pub fn acl_entry_count(&self) -> usize {
        self.acl_entries.lock().unwrap().len()
    }

    pub fn acl_entry_priority(&self, id: &str) -> Option<u64> {
        self.acl_entries
            .lock()
            .unwrap()
            .get(id)
            .map(|r| r.entry.priority)
    }

    pub fn macro_group_count(&self) -> usize {
        self.macro_groups.lock().unwrap().len()
    }

    pub fn macro_count(&self) -> usize {
        self.macros.lock().unwrap().len()
    }

    pub fn group_members_of(&self, group_id: &str) -> Vec<String> {
        self.group_members
            .lock()
            .unwrap()
            .iter()
            .filter(|(g, _)| g == group_id)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

#[async_trait]
impl SdnClient for FakeSdnClient {
    async fn open_bootstrap_session(
        &self,
        _credentials: &BootstrapCredentials,
    ) -> Result<(), ControllerError> {
        Ok(())
    }

    async fn login_as_enterprise_admin(
        &self,
        _enterprise_id: &str,
        _user_name: &str,
        _password: &str,
    ) -> Result<(), ControllerError> {
        Ok(())
    }

    async fn create_or_get_enterprise(&self, name: &str) -> Result<String, ControllerError> {
        let mut enterprises = self.enterprises.lock().unwrap();
        if let Some(id) = enterprises.get(name) {
            return Ok(id.clone());
        }
        let id = self.fresh_id("ent");
        enterprises.insert(name.to_string(), id.clone());
        Ok(id)
    }

    async fn create_or_get_admin_user(
        &self,
        enterprise_id: &str,
        user_name: &str,
        _password: &str,
    ) -> Result<String, ControllerError> {
        let key = (enterprise_id.to_string(), user_name.to_string());
        let mut users = self.users.lock().unwrap();
        if let Some(id) = users.get(&key) {
            return Ok(id.clone());
        }
        let id = self.fresh_id("user");
        users.insert(key, id.clone());
        Ok(id)
    }

    async fn ensure_admin_group_membership(
        &self,
        enterprise_id: &str,
        user_id: &str,
    ) -> Result<(), ControllerError> {
        self.admin_group_members
            .lock()
            .unwrap()
            .insert((enterprise_id.to_string(), user_id.to_string()));
        Ok(())
    }

    async fn install_license(&self, _path: Option<&str>) -> Result<(), ControllerError> {
        *self.license_installed.lock().unwrap() = true;
        Ok(())
    }

    async fn create_or_get_domain_template(
        &self,
        enterprise_id: &str,
        name: &str,
    ) -> Result<String, ControllerError> {
        let key = (enterprise_id.to_string(), name.to_string());
        let mut templates = self.domain_templates.lock().unwrap();
        if let Some(id) = templates.get(&key) {
            return Ok(id.clone());
        }
        let id = self.fresh_id("domtmpl");
        templates.insert(key, id.clone());
        Ok(id)
    }

    async fn create_or_get_domain(
        &self,
        enterprise_id: &str,
        _domain_template_id: &str,
        name: &str,
    ) -> Result<String, ControllerError> {
        let key = (enterprise_id.to_string(), name.to_string());
        let mut domains = self.domains.lock().unwrap();
        if let Some(id) = domains.get(&key) {
            return Ok(id.clone());
        }
        let id = self.fresh_id("dom");
        domains.insert(key, id.clone());
        Ok(id)
    }

    async fn create_or_get_acl_template(
        &self,
        domain_id: &str,
        _direction: AclDirection,
        name: &str,
    ) -> Result<String, ControllerError> {
        let key = (domain_id.to_string(), name.to_string());
        let mut templates = self.acl_templates.lock().unwrap();
        if let Some(id) = templates.get(&key) {
            return Ok(id.clone());
        }
        let id = self.fresh_id("acltmpl");
        templates.insert(key, id.clone());
        Ok(id)
    }

    async fn create_or_get_acl_entry(
        &self,
        template_id: &str,
        direction: AclDirection,
        entry: &AclEntry,
    ) -> Result<String, ControllerError> {
        let mut entries = self.acl_entries.lock().unwrap();
        if let Some((id, _)) = entries.iter().find(|(_, record)| {
            record.template_id == template_id
                && record.direction == direction
                && record.entry.priority == entry.priority
        }) {
            return Ok(id.clone());
        }
        let id = self.fresh_id("aclentry");
        entries.insert(
            id.clone(),
            AclEntryRecord {
                template_id: template_id.to_string(),
                direction,
                entry: entry.clone(),
            },
        );
        Ok(id)
    }

    async fn delete_acl_entry(&self, entry_id: &str) -> Result<(), ControllerError> {
        self.acl_entries.lock().unwrap().remove(entry_id);
        Ok(())
    }

    async fn create_or_get_zone(
        &self,
        domain_id: &str,
        name: &str,
    ) -> Result<String, ControllerError> {
        let key = (domain_id.to_string(), name.to_string());
        let mut zones = self.zones.lock().unwrap();
        if let Some(id) = zones.get(&key) {
            return Ok(id.clone());
        }
        let id = self.fresh_id("zone");
        zones.insert(key, id.clone());
        Ok(id)
    }

    async fn find_zone_by_name(
        &self,
        domain_id: &str,
        name: &str,
    ) -> Result<Option<String>, ControllerError> {
        let key = (domain_id.to_string(), name.to_string());
        Ok(self.zones.lock().unwrap().get(&key).cloned())
    }

    async fn delete_zone(&self, zone_id: &str) -> Result<(), ControllerError> {
        self.zones.lock().unwrap().retain(|_, id| id != zone_id);
        Ok(())
    }

    async fn create_or_get_subnet(
        &self,
        zone_id: &str,
        _name: &str,
        block: Ipv4Subnet,
    ) -> Result<String, ControllerError> {
        let key = (zone_id.to_string(), block.to_string());
        let mut subnets = self.subnets.lock().unwrap();
        if let Some(id) = subnets.get(&key) {
            return Ok(id.clone());
        }
        let id = self.fresh_id("subnet");
        subnets.insert(key, id.clone());
        Ok(id)
    }

    async fn delete_subnet(&self, subnet_id: &str) -> Result<(), ControllerError> {
        self.subnets.lock().unwrap().retain(|_, id| id != subnet_id);
        Ok(())
    }

    async fn create_or_get_network_macro_group(
        &self,
        enterprise_id: &str,
        name: &str,
    ) -> Result<String, ControllerError> {
        let key = (enterprise_id.to_string(), name.to_string());
        let mut groups = self.macro_groups.lock().unwrap();
        if let Some(id) = groups.get(&key) {
            return Ok(id.clone());
        }
        let id = self.fresh_id("macrogroup");
        groups.insert(key, id.clone());
        Ok(id)
    }

    async fn find_network_macro_group_by_name(
        &self,
        enterprise_id: &str,
        name: &str,
    ) -> Result<Option<String>, ControllerError> {
        let key = (enterprise_id.to_string(), name.to_string());
        Ok(self.macro_groups.lock().unwrap().get(&key).cloned())
    }

    async fn delete_network_macro_group(&self, group_id: &str) -> Result<(), ControllerError> {
        self.macro_groups
            .lock()
            .unwrap()
            .retain(|_, id| id != group_id);
        Ok(())
    }

    async fn create_or_get_network_macro(
        &self,
        enterprise_id: &str,
        name: &str,
        ip_type: &str,
        address: &str,
        netmask: &str,
    ) -> Result<String, ControllerError> {
        let key = (
            enterprise_id.to_string(),
            name.to_string(),
            ip_type.to_string(),
            address.to_string(),
            netmask.to_string(),
        );
        let mut macros = self.macros.lock().unwrap();
        if let Some(id) = macros.get(&key) {
            return Ok(id.clone());
        }
        let id = self.fresh_id("macro");
        macros.insert(key, id.clone());
        Ok(id)
    }

    async fn delete_network_macro(&self, macro_id: &str) -> Result<(), ControllerError> {
        self.macros.lock().unwrap().retain(|_, id| id != macro_id);
        self.group_members
            .lock()
            .unwrap()
            .retain(|(_, m)| m != macro_id);
        Ok(())
    }

    async fn add_macro_to_group(
        &self,
        group_id: &str,
        macro_id: &str,
    ) -> Result<(), ControllerError> {
        self.group_members
            .lock()
            .unwrap()
            .insert((group_id.to_string(), macro_id.to_string()));
        Ok(())
    }
}
