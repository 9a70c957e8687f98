use dashmap::DashMap;

use crate::types::Credential;

/// Errors from [`TokenStore`] boundary validation.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TokenStoreError {
    /// The caller supplied an empty agent id.
    #[error("agent id must not be empty")]
    InvalidAgentId,
}

/// In-memory credential cache, keyed by agent id.
///
/// One instance is constructed at service startup and shared via `Arc`;
/// every operation is an atomic per-key map access, so interleaved calls for
/// different agents never observe each other's entries. Nothing here blocks
/// or performs I/O.
#[derive(Debug, Default)]
pub struct TokenStore {
    tokens: DashMap<String, Credential>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self {
            tokens: DashMap::new(),
        }
    }

    /// Insert or overwrite the credential for an agent.
    ///
    /// Credential contents are not validated; the issuing flow is
    /// responsible for supplying well-formed token material.
    pub fn set_token(
        &self,
        agent_id: &str,
        credential: Credential,
    ) -> Result<(), TokenStoreError> {
        if agent_id.is_empty() {
            return Err(TokenStoreError::InvalidAgentId);
        }
        self.tokens.insert(agent_id.to_string(), credential);
        Ok(())
    }

    /// The stored credential for an agent, or `None` if it has never
    /// authenticated (or was cleared). Never fails for unknown keys.
    pub fn get_token(&self, agent_id: &str) -> Option<Credential> {
        self.tokens.get(agent_id).map(|entry| entry.clone())
    }

    /// Whether a credential is cached for this agent.
    pub fn has_token(&self, agent_id: &str) -> bool {
        self.tokens.contains_key(agent_id)
    }

    /// Number of agents with a cached credential.
    pub fn agent_count(&self) -> usize {
        self.tokens.len()
    }

    /// Remove all entries. Safe to call when already empty.
    pub fn clear(&self) {
        self.tokens.clear();
    }
}
