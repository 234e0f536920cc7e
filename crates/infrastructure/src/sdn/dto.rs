//! Wire DTOs for the SDN resource client, one per entity in the natural-key
//! table (spec §4.2). Field names follow the camelCase convention the
//! natural-key table itself uses (`userName`, `ipType`, ...).

use serde::{Deserialize, Serialize};
use zonectl_domain::{AclAction, AclDirection, AclEntry, EndpointSelector};

#[derive(Debug, Serialize)]
pub struct EnterpriseCreate<'a> {
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreate<'a> {
    pub user_name: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct AdminGroupCreate {
    pub role: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DomainTemplateCreate<'a> {
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainCreate<'a> {
    pub name: &'a str,
    pub template_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct AclTemplateCreate<'a> {
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AclEntryCreate {
    pub priority: u64,
    pub action: &'static str,
    pub ether_type: String,
    pub protocol: &'static str,
    pub location_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    pub network_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,
}

impl From<&AclEntry> for AclEntryCreate {
    fn from(entry: &AclEntry) -> Self {
        let (location_type, location_id) = selector_fields(&entry.source);
        let (network_type, network_id) = selector_fields(&entry.destination);
        Self {
            priority: entry.priority,
            action: match entry.action {
                AclAction::Forward => "FORWARD",
                AclAction::Drop => "DROP",
            },
            ether_type: format!("0x{:04X}", entry.ether_type.code()),
            protocol: "ANY",
            location_type,
            location_id,
            network_type,
            network_id,
        }
    }
}

/// Maps a domain `EndpointSelector` to the `(type, id)` pair the SDN's ACL
/// entry schema expects for a source or destination endpoint.
fn selector_fields(selector: &EndpointSelector) -> (&'static str, Option<String>) {
    match selector {
        EndpointSelector::EndpointZone => ("ZONE", None),
        EndpointSelector::EndpointDomain => ("DOMAIN", None),
        EndpointSelector::Zone(id) => ("ZONE", Some(id.clone())),
        EndpointSelector::NetworkMacroGroup(id) => ("NETWORK_MACRO_GROUP", Some(id.clone())),
        EndpointSelector::Any => ("ANY", None),
    }
}

#[derive(Debug, Serialize)]
pub struct ZoneCreate<'a> {
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SubnetCreate<'a> {
    pub name: &'a str,
    pub address: String,
    pub netmask: String,
}

#[derive(Debug, Serialize)]
pub struct NetworkMacroGroupCreate<'a> {
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkMacroCreate<'a> {
    pub name: &'a str,
    pub ip_type: &'a str,
    pub address: &'a str,
    pub netmask: &'a str,
}

/// The `me` endpoint response used to complete authentication (spec §4.2's
/// "obtain an API key").
#[derive(Debug, Deserialize)]
pub struct MeResponse {
    #[serde(rename = "APIKey")]
    pub api_key: String,
}

pub(super) const fn acl_template_path(direction: AclDirection) -> &'static str {
    match direction {
        AclDirection::Ingress => "ingressacltemplates",
        AclDirection::Egress => "egressacltemplates",
    }
}

pub(super) const fn acl_entry_path(direction: AclDirection) -> &'static str {
    match direction {
        AclDirection::Ingress => "ingressaclentrytemplates",
        AclDirection::Egress => "egressaclentrytemplates",
    }
}
