use {secrecy::Secret, std::collections::HashMap};

use crate::types::OAuthProviderConfig;

/// Default OAuth configurations for known providers.
fn builtin_defaults() -> HashMap<String, OAuthProviderConfig> {
    let mut m = HashMap::new();
    m.insert("microsoft".into(), OAuthProviderConfig {
        client_id: String::new(),
        client_secret: None,
        auth_url: "https://login.microsoftonline.com/common/oauth2/v2.0/authorize".into(),
        token_url: "https://login.microsoftonline.com/common/oauth2/v2.0/token".into(),
        redirect_uri: "http://localhost:2022/oauth/microsoft/callback".into(),
        scopes: vec!["Calendars.ReadWrite".into(), "User.Read".into()],
    });
    m
}

/// Load the OAuth config for a provider: built-in defaults overridden
/// field-by-field from `CALGRAPH_OAUTH_{PROVIDER}_*` environment variables.
pub fn load_provider_config(provider: &str) -> Option<OAuthProviderConfig> {
    load_with(provider, |name| std::env::var(name).ok())
}

/// Same as [`load_provider_config`] with an injectable variable lookup,
/// so overrides are testable without mutating process environment.
pub fn load_with(
    provider: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<OAuthProviderConfig> {
    let mut config = builtin_defaults().remove(provider)?;

    let env_prefix = format!(
        "CALGRAPH_OAUTH_{}_",
        provider.to_uppercase().replace('-', "_")
    );
    if let Some(v) = lookup(&format!("{env_prefix}CLIENT_ID")) {
        config.client_id = v;
    }
    if let Some(v) = lookup(&format!("{env_prefix}CLIENT_SECRET")) {
        config.client_secret = Some(Secret::new(v));
    }
    if let Some(v) = lookup(&format!("{env_prefix}AUTH_URL")) {
        config.auth_url = v;
    }
    if let Some(v) = lookup(&format!("{env_prefix}TOKEN_URL")) {
        config.token_url = v;
    }
    if let Some(v) = lookup(&format!("{env_prefix}REDIRECT_URI")) {
        config.redirect_uri = v;
    }

    Some(config)
}
