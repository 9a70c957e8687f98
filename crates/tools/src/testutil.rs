//! Shared fixtures for tool tests.

use std::sync::Arc;

use {anyhow::Result, async_trait::async_trait};

use {
    calgraph_graph::GraphClient,
    calgraph_oauth::{AuthGate, AuthUrlProvider, Credential, TokenStore},
};

/// Collaborator stub returning a fixed authorization URL.
pub struct StubUrls;

#[async_trait]
impl AuthUrlProvider for StubUrls {
    async fn generate_auth_url(&self, _provider: &str, _agent_id: &str) -> Result<String> {
        Ok("https://auth-url".into())
    }
}

/// A gate over a fresh store with the stub collaborator.
pub fn gate() -> Arc<AuthGate> {
    Arc::new(AuthGate::new(
        Arc::new(TokenStore::new()),
        Arc::new(StubUrls),
        "microsoft",
    ))
}

/// A graph client pointed at a mockito server.
pub fn graph(server: &mockito::Server) -> GraphClient {
    GraphClient::with_base_url(server.url())
}

/// Store a test credential for `agent_id`.
pub fn authenticate(gate: &AuthGate, agent_id: &str) {
    gate.store()
        .set_token(agent_id, Credential {
            access_token: "test-token".into(),
            refresh_token: "refresh-token".into(),
            expires_in: 3600,
        })
        .expect("valid agent id");
}
