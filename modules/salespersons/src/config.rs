use serde::{Deserialize, Serialize};

/// Configuration for the salespersons module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SalespersonsConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
    /// When set, every `/salespersons` route requires a matching `x-admin-key`.
    #[serde(default)]
    pub admin_api_key: Option<String>,
    /// External identity provider. Without it, account deletion is reported
    /// as not performed.
    #[serde(default)]
    pub identity_provider: Option<IdentityProviderConfig>,
}

impl Default for SalespersonsConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            admin_api_key: None,
            identity_provider: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityProviderConfig {
    pub base_url: String,
    pub project_id: String,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_page_size() -> u32 {
    50
}

fn default_max_page_size() -> u32 {
    500
}

fn default_timeout_ms() -> u64 {
    5_000
}
