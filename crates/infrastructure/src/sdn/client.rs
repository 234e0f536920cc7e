//! `HttpSdnClient`: a `reqwest`-based implementation of the `SdnClient`
//! port over the JSON wire contract described in spec §6.
//!
//! Resources live under `<base>/nuage/api/<version>/...`. List GETs carry a
//! single filter header selecting by equality predicate on one or more
//! natural-key fields; the response is always a JSON array, possibly
//! empty. 201 is "created", 409 means "already exists, go fetch it", 204
//! is a successful delete; anything else is an unexpected status.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use zonectl_application::ports::{BootstrapCredentials, SdnClient};
use zonectl_domain::config::SdnConfig;
use zonectl_domain::{AclDirection, AclEntry, ControllerError, Ipv4Subnet};

use super::dto::{
    acl_entry_path, acl_template_path, AclEntryCreate, AclTemplateCreate, AdminGroupCreate,
    DomainCreate, DomainTemplateCreate, EnterpriseCreate, MeResponse, NetworkMacroCreate,
    NetworkMacroGroupCreate, SubnetCreate, UserCreate, ZoneCreate,
};

const FILTER_HEADER: &str = "X-Nuage-Filter";
const ORGANIZATION_HEADER: &str = "X-Nuage-Organization";

#[derive(Debug, Default)]
struct Session {
    organization: Option<String>,
    authorization: Option<String>,
}

pub struct HttpSdnClient {
    http: reqwest::Client,
    base_url: String,
    version: String,
    session: RwLock<Session>,
}

enum CreateOutcome {
    Created(Value),
    Conflict,
}

impl HttpSdnClient {
    pub fn new(config: &SdnConfig) -> Result<Self, ControllerError> {
        if !config.tls_verify {
            warn!(
                base_url = %config.base_url,
                "SDN TLS certificate verification is disabled (tls_verify=false); \
                 this is a deliberate operational choice for private-cluster \
                 deployments, not a correctness guarantee"
            );
        }

        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(!config.tls_verify)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ControllerError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            version: config.version.clone(),
            session: RwLock::new(Session::default()),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/nuage/api/{}/{}", self.base_url, self.version, path)
    }

    async fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let session = self.session.read().await;
        let mut builder = self.http.request(method, self.url(path));
        if let Some(organization) = session.organization.as_deref() {
            builder = builder.header(ORGANIZATION_HEADER, organization);
        }
        if let Some(authorization) = session.authorization.as_deref() {
            builder = builder.header(reqwest::header::AUTHORIZATION, authorization);
        }
        builder
    }

    fn transport_error(err: reqwest::Error) -> ControllerError {
        ControllerError::Transport(err.to_string())
    }

    fn unexpected_status(operation: &str, status: StatusCode) -> ControllerError {
        ControllerError::UnexpectedStatus {
            operation: operation.to_string(),
            status: status.as_u16(),
        }
    }

    async fn post_create(
        &self,
        operation: &str,
        path: &str,
        payload: &impl Serialize,
    ) -> Result<CreateOutcome, ControllerError> {
        let response = self
            .request(Method::POST, path)
            .await
            .json(payload)
            .send()
            .await
            .map_err(Self::transport_error)?;

        match response.status() {
            StatusCode::CREATED | StatusCode::OK => {
                let body: Vec<Value> = response.json().await.map_err(Self::transport_error)?;
                let created = body
                    .into_iter()
                    .next()
                    .ok_or_else(|| ControllerError::NotFound(operation.to_string()))?;
                Ok(CreateOutcome::Created(created))
            }
            StatusCode::CONFLICT => Ok(CreateOutcome::Conflict),
            other => Err(Self::unexpected_status(operation, other)),
        }
    }

    async fn get_list(
        &self,
        operation: &str,
        path: &str,
        filter: Option<&str>,
    ) -> Result<Vec<Value>, ControllerError> {
        let mut builder = self.request(Method::GET, path).await;
        if let Some(filter) = filter {
            builder = builder.header(FILTER_HEADER, filter);
        }
        let response = builder.send().await.map_err(Self::transport_error)?;
        match response.status() {
            StatusCode::OK => response.json().await.map_err(Self::transport_error),
            other => Err(Self::unexpected_status(operation, other)),
        }
    }

    /// Filtered GET expected to select exactly one object, checked against
    /// `key_field`/`key_value` for the "never silently accept" rule in §4.2.
    async fn get_unique(
        &self,
        operation: &str,
        path: &str,
        filter: &str,
        key_field: &str,
        key_value: &str,
    ) -> Result<Value, ControllerError> {
        let matches = self.get_list(operation, path, Some(filter)).await?;
        let found = matches
            .into_iter()
            .next()
            .ok_or_else(|| ControllerError::NotFound(operation.to_string()))?;
        let got = found.get(key_field).and_then(Value::as_str).unwrap_or("");
        if got != key_value {
            return Err(ControllerError::Mismatch {
                entity: operation.to_string(),
                requested: key_value.to_string(),
                got: got.to_string(),
            });
        }
        Ok(found)
    }

    async fn find_one(
        &self,
        operation: &str,
        path: &str,
        filter: &str,
    ) -> Result<Option<String>, ControllerError> {
        let matches = self.get_list(operation, path, Some(filter)).await?;
        match matches.into_iter().next() {
            Some(value) => Ok(Some(Self::extract_id(&value)?)),
            None => Ok(None),
        }
    }

    fn extract_id(value: &Value) -> Result<String, ControllerError> {
        value
            .get("ID")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ControllerError::Transport("response object missing ID".to_string()))
    }

    /// The create-or-get combinator (§4.2): POST, and on conflict fall back
    /// to the filtered GET keyed on the entity's natural key.
    async fn create_or_get(
        &self,
        operation: &str,
        path: &str,
        payload: &impl Serialize,
        filter: &str,
        key_field: &str,
        key_value: &str,
    ) -> Result<String, ControllerError> {
        match self.post_create(operation, path, payload).await? {
            CreateOutcome::Created(value) => Self::extract_id(&value),
            CreateOutcome::Conflict => {
                let found = self
                    .get_unique(operation, path, filter, key_field, key_value)
                    .await?;
                Self::extract_id(&found)
            }
        }
    }

    /// The cascade/confirm delete helper (§4.2): a *no content* status is
    /// success, anything else is failure. Never retried by the client.
    async fn delete(&self, operation: &str, path: &str) -> Result<(), ControllerError> {
        let response = self
            .request(Method::DELETE, path)
            .await
            .query(&[("responseChoice", "1")])
            .send()
            .await
            .map_err(Self::transport_error)?;
        match response.status() {
            StatusCode::NO_CONTENT => Ok(()),
            other => Err(Self::unexpected_status(operation, other)),
        }
    }

    /// PUTs `ids` onto `path`'s member list. Conflict (already a member) is
    /// treated as success, matching the use cases' "add is idempotent"
    /// expectation (§4.4.3).
    ///
    /// A PUT to a Nuage VSD member-list endpoint *replaces* the whole
    /// collection rather than appending to it, so this is never called
    /// directly with a single new id — see `add_member`.
    async fn put_members(&self, operation: &str, path: &str, ids: &[&str]) -> Result<(), ControllerError> {
        let response = self
            .request(Method::PUT, path)
            .await
            .json(ids)
            .send()
            .await
            .map_err(Self::transport_error)?;
        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT | StatusCode::CONFLICT => Ok(()),
            other => Err(Self::unexpected_status(operation, other)),
        }
    }

    /// Adds `id` to `path`'s member list without evicting whatever is
    /// already there: reads the current members, then PUTs their union
    /// with `id` (§4.4.3).
    async fn add_member(&self, operation: &str, path: &str, id: &str) -> Result<(), ControllerError> {
        let existing = self.get_list(operation, path, None).await?;
        let mut ids: Vec<String> = existing
            .iter()
            .filter_map(|member| member.get("ID").and_then(Value::as_str))
            .map(str::to_string)
            .collect();
        if !ids.iter().any(|existing_id| existing_id == id) {
            ids.push(id.to_string());
        }
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        self.put_members(operation, path, &id_refs).await
    }

    async fn authenticate(
        &self,
        organization: &str,
        user_name: &str,
        password: &str,
    ) -> Result<(), ControllerError> {
        let basic = BASE64.encode(format!("{user_name}:{password}"));
        let response = self
            .http
            .get(self.url("me"))
            .header(ORGANIZATION_HEADER, organization)
            .header(reqwest::header::AUTHORIZATION, format!("XREST {basic}"))
            .send()
            .await
            .map_err(Self::transport_error)?;

        match response.status() {
            StatusCode::OK => {}
            other => return Err(Self::unexpected_status("authenticate", other)),
        }

        let body: Vec<MeResponse> = response.json().await.map_err(Self::transport_error)?;
        let me = body
            .into_iter()
            .next()
            .ok_or_else(|| ControllerError::NotFound("me".to_string()))?;

        let api_key_basic = BASE64.encode(format!("{user_name}:{}", me.api_key));
        let mut session = self.session.write().await;
        session.organization = Some(organization.to_string());
        session.authorization = Some(format!("XREST {api_key_basic}"));
        Ok(())
    }

    fn tag_entry_id(direction: AclDirection, id: String) -> String {
        match direction {
            AclDirection::Ingress => format!("ingress:{id}"),
            AclDirection::Egress => format!("egress:{id}"),
        }
    }

    fn untag_entry_id(tagged: &str) -> Result<(AclDirection, &str), ControllerError> {
        if let Some(rest) = tagged.strip_prefix("ingress:") {
            Ok((AclDirection::Ingress, rest))
        } else if let Some(rest) = tagged.strip_prefix("egress:") {
            Ok((AclDirection::Egress, rest))
        } else {
            Err(ControllerError::Transport(format!(
                "malformed ACL entry id: {tagged}"
            )))
        }
    }
}

fn filter_eq(field: &str, value: &str) -> String {
    format!("{field} == '{value}'")
}

#[async_trait]
impl SdnClient for HttpSdnClient {
    #[instrument(skip(self, credentials))]
    async fn open_bootstrap_session(
        &self,
        credentials: &BootstrapCredentials,
    ) -> Result<(), ControllerError> {
        self.authenticate(
            &credentials.organization,
            &credentials.user_name,
            &credentials.password,
        )
        .await
    }

    #[instrument(skip(self, password))]
    async fn login_as_enterprise_admin(
        &self,
        enterprise_id: &str,
        user_name: &str,
        password: &str,
    ) -> Result<(), ControllerError> {
        {
            let mut session = self.session.write().await;
            session.organization = None;
            session.authorization = None;
        }
        self.authenticate(enterprise_id, user_name, password).await
    }

    #[instrument(skip(self))]
    async fn create_or_get_enterprise(&self, name: &str) -> Result<String, ControllerError> {
        self.create_or_get(
            "create_or_get_enterprise",
            "enterprises",
            &EnterpriseCreate { name },
            &filter_eq("name", name),
            "name",
            name,
        )
        .await
    }

    #[instrument(skip(self, password))]
    async fn create_or_get_admin_user(
        &self,
        enterprise_id: &str,
        user_name: &str,
        password: &str,
    ) -> Result<String, ControllerError> {
        self.create_or_get(
            "create_or_get_admin_user",
            &format!("enterprises/{enterprise_id}/users"),
            &UserCreate { user_name, password },
            &filter_eq("userName", user_name),
            "userName",
            user_name,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn ensure_admin_group_membership(
        &self,
        enterprise_id: &str,
        user_id: &str,
    ) -> Result<(), ControllerError> {
        let group_id = self
            .create_or_get(
                "ensure_admin_group_membership",
                &format!("enterprises/{enterprise_id}/groups"),
                &AdminGroupCreate { role: "ORGADMIN" },
                &filter_eq("role", "ORGADMIN"),
                "role",
                "ORGADMIN",
            )
            .await?;

        self.add_member(
            "ensure_admin_group_membership",
            &format!("groups/{group_id}/users"),
            user_id,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn install_license(&self, path: Option<&str>) -> Result<(), ControllerError> {
        match path {
            Some(path) => {
                #[derive(Serialize)]
                struct LicenseCreate<'a> {
                    license: &'a str,
                }

                let contents = std::fs::read_to_string(path).map_err(|e| {
                    ControllerError::BootstrapFatal(format!(
                        "reading license file {path}: {e}"
                    ))
                })?;

                match self
                    .post_create("install_license", "licenses", &LicenseCreate { license: &contents })
                    .await?
                {
                    CreateOutcome::Created(_) | CreateOutcome::Conflict => Ok(()),
                }
            }
            None => {
                let existing = self.get_list("install_license", "licenses", None).await?;
                if existing.is_empty() {
                    Err(ControllerError::NotFound(
                        "no license installed and no license file configured".to_string(),
                    ))
                } else {
                    debug!("existing license found, skipping install");
                    Ok(())
                }
            }
        }
    }

    #[instrument(skip(self))]
    async fn create_or_get_domain_template(
        &self,
        enterprise_id: &str,
        name: &str,
    ) -> Result<String, ControllerError> {
        self.create_or_get(
            "create_or_get_domain_template",
            &format!("enterprises/{enterprise_id}/domaintemplates"),
            &DomainTemplateCreate { name },
            &filter_eq("name", name),
            "name",
            name,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn create_or_get_domain(
        &self,
        enterprise_id: &str,
        domain_template_id: &str,
        name: &str,
    ) -> Result<String, ControllerError> {
        self.create_or_get(
            "create_or_get_domain",
            &format!("enterprises/{enterprise_id}/domains"),
            &DomainCreate {
                name,
                template_id: domain_template_id,
            },
            &filter_eq("name", name),
            "name",
            name,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn create_or_get_acl_template(
        &self,
        domain_id: &str,
        direction: AclDirection,
        name: &str,
    ) -> Result<String, ControllerError> {
        self.create_or_get(
            "create_or_get_acl_template",
            &format!("domains/{domain_id}/{}", acl_template_path(direction)),
            &AclTemplateCreate { name },
            &filter_eq("name", name),
            "name",
            name,
        )
        .await
    }

    #[instrument(skip(self, entry))]
    async fn create_or_get_acl_entry(
        &self,
        template_id: &str,
        direction: AclDirection,
        entry: &AclEntry,
    ) -> Result<String, ControllerError> {
        let path = format!(
            "{}/{template_id}/{}",
            acl_template_path(direction),
            acl_entry_path(direction)
        );
        let priority = entry.priority.to_string();
        let id = self
            .create_or_get(
                "create_or_get_acl_entry",
                &path,
                &AclEntryCreate::from(entry),
                &filter_eq("priority", &priority),
                "priority",
                &priority,
            )
            .await?;
        Ok(Self::tag_entry_id(direction, id))
    }

    #[instrument(skip(self))]
    async fn delete_acl_entry(&self, entry_id: &str) -> Result<(), ControllerError> {
        let (direction, id) = Self::untag_entry_id(entry_id)?;
        self.delete(
            "delete_acl_entry",
            &format!("{}/{id}", acl_entry_path(direction)),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn create_or_get_zone(
        &self,
        domain_id: &str,
        name: &str,
    ) -> Result<String, ControllerError> {
        self.create_or_get(
            "create_or_get_zone",
            &format!("domains/{domain_id}/zones"),
            &ZoneCreate { name },
            &filter_eq("name", name),
            "name",
            name,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn find_zone_by_name(
        &self,
        domain_id: &str,
        name: &str,
    ) -> Result<Option<String>, ControllerError> {
        self.find_one(
            "find_zone_by_name",
            &format!("domains/{domain_id}/zones"),
            &filter_eq("name", name),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn delete_zone(&self, zone_id: &str) -> Result<(), ControllerError> {
        self.delete("delete_zone", &format!("zones/{zone_id}")).await
    }

    #[instrument(skip(self))]
    async fn create_or_get_subnet(
        &self,
        zone_id: &str,
        name: &str,
        block: Ipv4Subnet,
    ) -> Result<String, ControllerError> {
        let address = block.address().to_string();
        self.create_or_get(
            "create_or_get_subnet",
            &format!("zones/{zone_id}/subnets"),
            &SubnetCreate {
                name,
                address: address.clone(),
                netmask: block.netmask().to_string(),
            },
            &filter_eq("address", &address),
            "address",
            &address,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn delete_subnet(&self, subnet_id: &str) -> Result<(), ControllerError> {
        self.delete("delete_subnet", &format!("subnets/{subnet_id}"))
            .await
    }

    #[instrument(skip(self))]
    async fn create_or_get_network_macro_group(
        &self,
        enterprise_id: &str,
        name: &str,
    ) -> Result<String, ControllerError> {
        self.create_or_get(
            "create_or_get_network_macro_group",
            &format!("enterprises/{enterprise_id}/networkmacrogroups"),
            &NetworkMacroGroupCreate { name },
            &filter_eq("name", name),
            "name",
            name,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn find_network_macro_group_by_name(
        &self,
        enterprise_id: &str,
        name: &str,
    ) -> Result<Option<String>, ControllerError> {
        self.find_one(
            "find_network_macro_group_by_name",
            &format!("enterprises/{enterprise_id}/networkmacrogroups"),
            &filter_eq("name", name),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn delete_network_macro_group(&self, group_id: &str) -> Result<(), ControllerError> {
        self.delete(
            "delete_network_macro_group",
            &format!("networkmacrogroups/{group_id}"),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn create_or_get_network_macro(
        &self,
        enterprise_id: &str,
        name: &str,
        ip_type: &str,
        address: &str,
        netmask: &str,
    ) -> Result<String, ControllerError> {
        // Natural key is the tuple (name, ipType, address, netmask); the
        // filter selects on all four, and since `name` alone is already
        // unique in every call site that actually builds this tuple, the
        // mismatch check against `name` is sufficient.
        let filter = format!(
            "{} and {} and {} and {}",
            filter_eq("name", name),
            filter_eq("ipType", ip_type),
            filter_eq("address", address),
            filter_eq("netmask", netmask),
        );
        self.create_or_get(
            "create_or_get_network_macro",
            &format!("enterprises/{enterprise_id}/enterprisenetworks"),
            &NetworkMacroCreate {
                name,
                ip_type,
                address,
                netmask,
            },
            &filter,
            "name",
            name,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn delete_network_macro(&self, macro_id: &str) -> Result<(), ControllerError> {
        self.delete(
            "delete_network_macro",
            &format!("enterprisenetworks/{macro_id}"),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn add_macro_to_group(
        &self,
        group_id: &str,
        macro_id: &str,
    ) -> Result<(), ControllerError> {
        self.add_member(
            "add_macro_to_group",
            &format!("networkmacrogroups/{group_id}/enterprisenetworks"),
            macro_id,
        )
        .await
    }
}
