use std::sync::Arc;

use {anyhow::Result, async_trait::async_trait, tracing::debug};

use crate::{
    store::TokenStore,
    types::{AuthChallenge, Credential},
};

/// External collaborator that produces provider authorization links.
///
/// Invoked only on a cache miss; the authorization-code exchange behind the
/// returned URL is owned by the provider integration, not by this crate.
#[async_trait]
pub trait AuthUrlProvider: Send + Sync {
    async fn generate_auth_url(&self, provider: &str, agent_id: &str) -> Result<String>;
}

/// Outcome of the authentication check preceding every privileged call.
///
/// A missing credential is a routine result, not an error: every
/// first-time caller lands on the `ChallengeRequired` branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// A credential is cached; proceed using its access token.
    Authenticated(Credential),
    /// No credential cached; the caller should surface this challenge.
    ChallengeRequired(AuthChallenge),
}

/// The authentication-presence check applied before any privileged action.
pub struct AuthGate {
    store: Arc<TokenStore>,
    urls: Arc<dyn AuthUrlProvider>,
    provider: String,
}

impl AuthGate {
    pub fn new(
        store: Arc<TokenStore>,
        urls: Arc<dyn AuthUrlProvider>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            store,
            urls,
            provider: provider.into(),
        }
    }

    pub fn store(&self) -> &Arc<TokenStore> {
        &self.store
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Resolve the agent's authentication state.
    ///
    /// A cache hit performs no I/O. A miss asks the [`AuthUrlProvider`] for
    /// an authorization link; only that generation can fail.
    pub async fn check(&self, agent_id: &str) -> Result<AuthOutcome> {
        if let Some(credential) = self.store.get_token(agent_id) {
            return Ok(AuthOutcome::Authenticated(credential));
        }

        debug!(agent_id, provider = %self.provider, "no cached credential, issuing challenge");
        let url = self.urls.generate_auth_url(&self.provider, agent_id).await?;
        Ok(AuthOutcome::ChallengeRequired(AuthChallenge::for_provider(
            &self.provider,
            url,
        )))
    }
}
