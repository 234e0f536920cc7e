//! The one-shot bootstrap sequence (C5, §4.5). Any failure here is fatal
//! to the process — the caller in `crates/cli` exits on `Err`.

use std::sync::Arc;

use tracing::{info, instrument};
use zonectl_domain::{
    AclDirection, ControllerError, ControllerState, CspCredentials, Ipv4Subnet,
};

use crate::ports::{BootstrapCredentials, SdnClient};
use crate::use_cases::acl;

pub struct BootstrapUseCase {
    sdn: Arc<dyn SdnClient>,
}

impl BootstrapUseCase {
    pub fn new(sdn: Arc<dyn SdnClient>) -> Self {
        Self { sdn }
    }

    /// Runs the full sequence described in §4.5 and returns the
    /// fully-populated [`ControllerState`], ready for the reconciler loop.
    #[instrument(skip(self, csp))]
    pub async fn execute(
        &self,
        csp: &CspCredentials,
        enterprise_name: &str,
        domain_template_name: &str,
        domain_name: &str,
        license_file: Option<&str>,
        cluster_cidr: Ipv4Subnet,
    ) -> Result<ControllerState, ControllerError> {
        let bootstrap_creds = BootstrapCredentials {
            organization: csp.organization.clone(),
            user_name: csp.user_name.clone(),
            password: csp.password.clone(),
        };
        self.sdn
            .open_bootstrap_session(&bootstrap_creds)
            .await
            .map_err(fatal)?;

        let enterprise_id = self
            .sdn
            .create_or_get_enterprise(enterprise_name)
            .await
            .map_err(fatal)?;

        let admin_user_id = self
            .sdn
            .create_or_get_admin_user(&enterprise_id, &csp.user_name, &csp.password)
            .await
            .map_err(fatal)?;
        self.sdn
            .ensure_admin_group_membership(&enterprise_id, &admin_user_id)
            .await
            .map_err(fatal)?;

        self.sdn.install_license(license_file).await.map_err(fatal)?;

        self.sdn
            .login_as_enterprise_admin(&enterprise_id, &csp.user_name, &csp.password)
            .await
            .map_err(fatal)?;

        let domain_template_id = self
            .sdn
            .create_or_get_domain_template(&enterprise_id, domain_template_name)
            .await
            .map_err(fatal)?;
        let domain_id = self
            .sdn
            .create_or_get_domain(&enterprise_id, &domain_template_id, domain_name)
            .await
            .map_err(fatal)?;

        let ingress_template_id = self
            .sdn
            .create_or_get_acl_template(&domain_id, AclDirection::Ingress, "default-ingress")
            .await
            .map_err(fatal)?;
        let egress_template_id = self
            .sdn
            .create_or_get_acl_template(&domain_id, AclDirection::Egress, "default-egress")
            .await
            .map_err(fatal)?;

        acl::seed_baseline_entries(&self.sdn, &ingress_template_id, AclDirection::Ingress)
            .await
            .map_err(fatal)?;
        acl::seed_baseline_entries(&self.sdn, &egress_template_id, AclDirection::Egress)
            .await
            .map_err(fatal)?;

        info!(enterprise_id = %enterprise_id, domain_id = %domain_id, "bootstrap complete");

        Ok(ControllerState::new(
            enterprise_id,
            domain_id,
            ingress_template_id,
            egress_template_id,
            cluster_cidr,
        ))
    }
}

fn fatal(err: ControllerError) -> ControllerError {
    ControllerError::BootstrapFatal(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeSdnClient;

    #[tokio::test]
    async fn bootstrap_produces_usable_controller_state() {
        let sdn = Arc::new(FakeSdnClient::new());
        let use_case = BootstrapUseCase::new(sdn.clone());
        let csp = CspCredentials::default();
        let cidr: Ipv4Subnet = "10.128.0.0/14".parse().unwrap();

        let state = use_case
            .execute(&csp, "acme", "acme-template", "acme-domain", None, cidr)
            .await
            .unwrap();

        assert!(!state.enterprise_id.is_empty());
        assert!(!state.domain_id.is_empty());
        assert_eq!(sdn.acl_entry_count(), 4); // 2 baseline entries x 2 directions
    }

    #[tokio::test]
    async fn bootstrap_is_idempotent_across_restarts() {
        let sdn = Arc::new(FakeSdnClient::new());
        let use_case = BootstrapUseCase::new(sdn.clone());
        let csp = CspCredentials::default();
        let cidr: Ipv4Subnet = "10.128.0.0/14".parse().unwrap();

        let first = use_case
            .execute(&csp, "acme", "acme-template", "acme-domain", None, cidr)
            .await
            .unwrap();
        let second = use_case
            .execute(&csp, "acme", "acme-template", "acme-domain", None, cidr)
            .await
            .unwrap();

        assert_eq!(first.enterprise_id, second.enterprise_id);
        assert_eq!(first.domain_id, second.domain_id);
        assert_eq!(sdn.acl_entry_count(), 4);
    }
}
