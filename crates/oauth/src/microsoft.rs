use {
    anyhow::{Result, anyhow},
    async_trait::async_trait,
    base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD},
    rand::RngCore,
    url::Url,
};

use crate::{gate::AuthUrlProvider, types::OAuthProviderConfig};

/// Authorization-URL builder for the Microsoft identity platform.
///
/// Only the authorize link is assembled here; the code exchange against the
/// token endpoint is completed by the external flow, which hands the issued
/// credential back through the gateway's completion callback.
#[derive(Debug, Clone)]
pub struct MicrosoftAuthUrl {
    config: OAuthProviderConfig,
}

impl MicrosoftAuthUrl {
    pub fn new(config: OAuthProviderConfig) -> Self {
        Self { config }
    }
}

/// Generate a random state parameter bound to the requesting agent.
fn generate_state(agent_id: &str) -> String {
    let mut bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut bytes);
    format!("{agent_id}:{}", URL_SAFE_NO_PAD.encode(bytes))
}

#[async_trait]
impl AuthUrlProvider for MicrosoftAuthUrl {
    async fn generate_auth_url(&self, provider: &str, agent_id: &str) -> Result<String> {
        if provider != "microsoft" {
            return Err(anyhow!("unsupported provider: {provider}"));
        }

        let mut url = Url::parse(&self.config.auth_url)?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("response_type", "code")
            .append_pair("response_mode", "query")
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("scope", &self.config.scopes.join(" "))
            .append_pair("state", &generate_state(agent_id));

        Ok(url.into())
    }
}
