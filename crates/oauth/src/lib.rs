//! Per-agent OAuth credential caching and authentication gating.
//!
//! Every privileged tool call goes through the same decision: look up the
//! calling agent's credential in the [`TokenStore`]; if absent, hand back an
//! authorization challenge instead of touching the downstream API. The store
//! is memory-resident only; credentials do not survive a restart.

pub mod defaults;
pub mod gate;
pub mod microsoft;
pub mod store;
pub mod types;

pub use {
    defaults::load_provider_config,
    gate::{AuthGate, AuthOutcome, AuthUrlProvider},
    microsoft::MicrosoftAuthUrl,
    store::{TokenStore, TokenStoreError},
    types::{AuthChallenge, Credential, OAuthProviderConfig},
};
