//! Account deletion against the identity provider's REST API.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

use crate::config::IdentityProviderConfig;
use crate::domain::error::DomainError;
use crate::domain::ports::ExternalAuthPort;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteAccountRequest<'a> {
    local_id: &'a str,
}

#[derive(Clone)]
pub struct HttpIdentityClient {
    inner: reqwest::Client,
    delete_url: Url,
    access_token: Option<String>,
}

impl HttpIdentityClient {
    pub fn new(cfg: &IdentityProviderConfig) -> anyhow::Result<Self> {
        let mut base = Url::parse(&cfg.base_url)
            .with_context(|| format!("invalid identity provider url '{}'", cfg.base_url))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let delete_url = base
            .join(&format!("v1/projects/{}/accounts:delete", cfg.project_id))
            .context("build account deletion url")?;
        let inner = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .context("build identity provider http client")?;

        Ok(Self {
            inner,
            delete_url,
            access_token: cfg.access_token.clone(),
        })
    }

    pub fn delete_url(&self) -> &Url {
        &self.delete_url
    }
}

#[async_trait]
impl ExternalAuthPort for HttpIdentityClient {
    #[instrument(name = "salespersons.http.delete_account", skip(self), fields(url = %self.delete_url))]
    async fn delete_account(&self, auth_uid: &str) -> Result<(), DomainError> {
        let mut req = self
            .inner
            .post(self.delete_url.clone())
            .json(&DeleteAccountRequest { local_id: auth_uid });
        if let Some(token) = &self.access_token {
            req = req.bearer_auth(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| DomainError::external_auth(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::external_auth(format!(
                "identity provider returned {status}: {body}"
            )));
        }

        debug!(%status, "identity provider account deleted");
        Ok(())
    }
}
