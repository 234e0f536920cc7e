use serde::{Deserialize, Serialize};

/// Connection settings for the SDN resource client (C2).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SdnConfig {
    /// Base URL the client builds every request under, e.g.
    /// `https://vsd.example.com:8443`.
    pub base_url: String,

    /// SDN API version string, used as a path segment
    /// (`<base>/nuage/api/<version>/...`).
    pub version: String,

    /// Request timeout in seconds for every SDN call.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Whether to verify the SDN's TLS certificate. Disabled by default —
    /// an explicit, documented operational choice for private-cluster
    /// deployments, not a blanket guarantee. Flip to `true` whenever the
    /// SDN presents a certificate from a trusted CA.
    #[serde(default)]
    pub tls_verify: bool,
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for SdnConfig {
    fn default() -> Self {
        Self {
            base_url: "https://localhost:8443".to_string(),
            version: "v6".to_string(),
            request_timeout_secs: default_request_timeout_secs(),
            tls_verify: false,
        }
    }
}

/// Initial credentials used to open the bootstrap session as CSP root
/// (§4.5), before the controller re-authenticates as the managed
/// enterprise's own admin user.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CspCredentials {
    pub organization: String,
    pub user_name: String,
    pub password: String,
}

impl Default for CspCredentials {
    fn default() -> Self {
        Self {
            organization: "csp".to_string(),
            user_name: "csproot".to_string(),
            password: "csproot".to_string(),
        }
    }
}
