use std::{net::SocketAddr, sync::Arc};

use {
    anyhow::Context,
    axum::{
        Router,
        extract::{Path, State},
        http::StatusCode,
        response::{IntoResponse, Json},
        routing::{get, post},
    },
    serde::Deserialize,
    serde_json::{Value, json},
    tower_http::cors::{Any, CorsLayer},
    tracing::{info, warn},
};

use {
    calgraph_graph::GraphClient,
    calgraph_oauth::{AuthGate, Credential, MicrosoftAuthUrl, TokenStore, load_provider_config},
    calgraph_tools::{
        AgentInfo, CreateCalendarEventTool, GetCalendarEventsTool, GetCalendarViewTool,
        GetFreeBusyScheduleTool, ToolRegistry,
    },
};

use crate::state::AppState;

// ── Server startup ───────────────────────────────────────────────────────────

/// Build the service router (shared between production startup and tests).
pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/tools", get(list_tools_handler))
        .route("/tools/{id}/invoke", post(invoke_handler))
        .route("/oauth/{provider}/complete", post(oauth_complete_handler))
        .layer(cors)
        .with_state(state)
}

/// Wire the production dependency graph and serve until shutdown.
pub async fn start(bind: &str, port: u16) -> anyhow::Result<()> {
    let config =
        load_provider_config("microsoft").context("no OAuth config for provider 'microsoft'")?;
    if config.client_id.is_empty() {
        warn!("CALGRAPH_OAUTH_MICROSOFT_CLIENT_ID is not set; authorize URLs will be unusable");
    }

    let store = Arc::new(TokenStore::new());
    let gate = Arc::new(AuthGate::new(
        Arc::clone(&store),
        Arc::new(MicrosoftAuthUrl::new(config)),
        "microsoft",
    ));
    let graph = GraphClient::new();

    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(GetCalendarEventsTool::new(
        Arc::clone(&gate),
        graph.clone(),
    )));
    registry.register(Arc::new(CreateCalendarEventTool::new(
        Arc::clone(&gate),
        graph.clone(),
    )));
    registry.register(Arc::new(GetCalendarViewTool::new(
        Arc::clone(&gate),
        graph.clone(),
    )));
    registry.register(Arc::new(GetFreeBusyScheduleTool::new(gate, graph)));

    let state = AppState::new(Arc::new(registry), store);
    let app = build_app(state.clone());

    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        version = %state.version,
        %addr,
        tools = state.registry.len(),
        "calgraph gateway listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

// ── Request shapes ───────────────────────────────────────────────────────────

fn empty_params() -> Value {
    json!({})
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvokeRequest {
    agent_id: String,
    #[serde(default = "empty_params")]
    params: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompleteRequest {
    agent_id: String,
    #[serde(flatten)]
    credential: Credential,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": state.version,
        "tools": state.registry.len(),
        "authenticatedAgents": state.store.agent_count(),
    }))
}

async fn list_tools_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "tools": state.registry.list_schemas(),
        "toolboxes": [state.toolbox],
    }))
}

async fn invoke_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<InvokeRequest>,
) -> impl IntoResponse {
    let Some(tool) = state.registry.get(&id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("tool not found: {id}") })),
        );
    };

    let request_id = uuid::Uuid::new_v4();
    info!(%request_id, tool = %id, agent_id = %request.agent_id, "invoking tool");

    let agent = AgentInfo::new(request.agent_id);
    match tool.execute(&agent, request.params).await {
        Ok(response) => match serde_json::to_value(&response) {
            Ok(value) => (StatusCode::OK, Json(value)),
            Err(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            ),
        },
        Err(e) => {
            warn!(%request_id, tool = %id, error = %e, "tool invocation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        },
    }
}

/// Credential issuance callback: the external OAuth flow finished and hands
/// the tokens over. Storing them is this endpoint's only job.
async fn oauth_complete_handler(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Json(request): Json<CompleteRequest>,
) -> impl IntoResponse {
    match state.store.set_token(&request.agent_id, request.credential) {
        Ok(()) => {
            info!(%provider, agent_id = %request.agent_id, "completed OAuth flow, stored tokens");
            (StatusCode::OK, Json(json!({ "ok": true })))
        },
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": e.to_string() })),
        ),
    }
}
