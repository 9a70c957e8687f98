//! HTTP service exposing the calendar tools to the agent platform.
//!
//! Routes: tool discovery and invocation, plus the OAuth completion
//! callback whose only duty is handing the issued credential to the token
//! store. Challenge responses are ordinary 200s: a missing credential is
//! expected, not an error.

pub mod server;
pub mod state;

pub use {
    server::{build_app, start},
    state::AppState,
};
