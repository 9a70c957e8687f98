use std::sync::Arc;

use {
    calgraph_oauth::TokenStore,
    calgraph_tools::{Toolbox, ToolRegistry, outlook_calendar_toolbox},
};

/// Shared service state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ToolRegistry>,
    pub store: Arc<TokenStore>,
    pub toolbox: Toolbox,
    pub version: String,
}

impl AppState {
    pub fn new(registry: Arc<ToolRegistry>, store: Arc<TokenStore>) -> Self {
        Self {
            registry,
            store,
            toolbox: outlook_calendar_toolbox(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
