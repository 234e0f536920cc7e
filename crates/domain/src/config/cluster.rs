use serde::{Deserialize, Serialize};

use crate::ipv4::Ipv4Subnet;

/// The cluster-wide address pool and the per-zone block size carved out of
/// it, per §6.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClusterConfig {
    /// Parsed as `a.b.c.d/m`; seeds the subnet pool at startup.
    pub cidr: String,

    /// CIDR mask length handed to each zone's subnet, in bits. Clamped to
    /// `[0, 32]`; if it would leave fewer than `32 - m` bits for the
    /// cluster mask `m` to address, it is reset to `(32 - m) / 2`.
    pub subnet_length: u8,

    /// Optional path to a license file installed during bootstrap. If
    /// absent, bootstrap only verifies that a license already exists.
    pub license_file: Option<String>,

    /// Name of the SDN enterprise this controller manages.
    #[serde(default = "default_enterprise_name")]
    pub enterprise_name: String,

    /// Domain name within that enterprise.
    #[serde(default = "default_domain_name")]
    pub domain_name: String,
}

fn default_enterprise_name() -> String {
    "kubernetes".to_string()
}

fn default_domain_name() -> String {
    "kubernetes".to_string()
}

impl ClusterConfig {
    /// Parses [`ClusterConfig::cidr`] and returns the effective
    /// `subnetLength` (the number of host bits handed to each zone, *not*
    /// a CIDR mask length), applying the clamp-and-default rule above.
    ///
    /// Per §4.4.1 the pool is actually allocated from with
    /// `pool.Alloc(32 - subnetLength)` — callers must perform that
    /// subtraction themselves to get the CIDR mask `alloc` expects.
    pub fn parsed_cidr_and_subnet_length(
        &self,
    ) -> Result<(Ipv4Subnet, u8), crate::errors::ControllerError> {
        let cidr: Ipv4Subnet = self.cidr.parse()?;
        let cluster_mask = cidr.mask();
        let available_bits = 32u8.saturating_sub(cluster_mask);

        let mut subnet_length = self.subnet_length.min(32);
        if subnet_length > available_bits {
            subnet_length = available_bits / 2;
        }
        Ok((cidr, subnet_length))
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            cidr: "10.128.0.0/14".to_string(),
            subnet_length: 8,
            license_file: None,
            enterprise_name: default_enterprise_name(),
            domain_name: default_domain_name(),
        }
    }
}
