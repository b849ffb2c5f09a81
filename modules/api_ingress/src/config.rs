use serde::{Deserialize, Serialize};

/// HTTP ingress configuration (`modules.api_ingress`)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiIngressConfig {
    #[serde(default = "default_enable_docs")]
    pub enable_docs: bool,
    #[serde(default)]
    pub cors_enabled: bool,
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

impl Default for ApiIngressConfig {
    fn default() -> Self {
        Self {
            enable_docs: default_enable_docs(),
            cors_enabled: false,
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

fn default_enable_docs() -> bool {
    true
}

fn default_body_limit_bytes() -> usize {
    16 * 1024 * 1024
}
