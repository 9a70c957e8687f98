use {
    secrecy::Secret,
    serde::{Deserialize, Serialize},
};

// ── Credential ───────────────────────────────────────────────────────────────

/// Bearer token material for one authenticated agent.
///
/// Immutable once stored; replacing an agent's credential swaps the whole
/// record. `expires_in` is kept exactly as issued and never compared to
/// wall-clock time; the downstream API is the authority on expiry.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: String,
    /// Validity window in seconds from issuance.
    pub expires_in: u64,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

// ── Provider configuration ───────────────────────────────────────────────────

/// OAuth2 provider endpoints and client registration.
#[derive(Debug, Clone)]
pub struct OAuthProviderConfig {
    pub client_id: String,
    pub client_secret: Option<Secret<String>>,
    pub auth_url: String,
    pub token_url: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

// ── Authentication challenge ─────────────────────────────────────────────────

/// The standardized "please authenticate" payload returned by gated tools
/// when no credential is cached for the calling agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthChallenge {
    pub provider: String,
    pub url: String,
    pub title: String,
    pub logo: String,
    pub content: String,
}

impl AuthChallenge {
    /// Build a challenge with presentation metadata for a known provider.
    pub fn for_provider(provider: &str, url: String) -> Self {
        match provider {
            "microsoft" => Self {
                provider: provider.to_string(),
                url,
                title: "Microsoft Authentication".into(),
                logo: "https://img.icons8.com/color/48/000000/microsoft.png".into(),
                content: "Please authenticate with Microsoft".into(),
            },
            _ => Self {
                provider: provider.to_string(),
                url,
                title: "Authentication Required".into(),
                logo: String::new(),
                content: format!("Please authenticate with {provider}"),
            },
        }
    }
}
