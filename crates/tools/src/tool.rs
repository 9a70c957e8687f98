use {
    anyhow::Result,
    async_trait::async_trait,
    serde::{Serialize, ser::SerializeStruct},
    serde_json::Value,
};

use calgraph_oauth::AuthChallenge;

/// The agent on whose behalf a tool invocation runs.
#[derive(Debug, Clone)]
pub struct AgentInfo {
    pub id: String,
    pub address: Option<String>,
}

impl AgentInfo {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            address: None,
        }
    }
}

// ── Presentation payloads ────────────────────────────────────────────────────

/// A column descriptor for table rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableColumn {
    pub key: String,
    pub header: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl TableColumn {
    /// A plain text column.
    pub fn text(key: &str, header: &str) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            kind: "text".into(),
        }
    }
}

/// A label/value pair for card rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardField {
    pub label: String,
    pub value: String,
}

impl CardField {
    pub fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// The rendering payload attached to every tool response.
///
/// Serialized for the platform as `{ "type": ..., "uiData": "<json>" }`,
/// with `uiData` a JSON *string*; that nesting is the platform contract.
#[derive(Debug, Clone, PartialEq)]
pub enum UiPayload {
    /// Authentication challenge; the platform renders the login link.
    OAuth2(AuthChallenge),
    Table {
        columns: Vec<TableColumn>,
        rows: Vec<Value>,
    },
    Card {
        title: String,
        content: String,
        fields: Vec<CardField>,
    },
}

impl UiPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::OAuth2(_) => "oauth2",
            Self::Table { .. } => "table",
            Self::Card { .. } => "card",
        }
    }

    fn ui_data(&self) -> serde_json::Result<String> {
        match self {
            Self::OAuth2(challenge) => serde_json::to_string(challenge),
            Self::Table { columns, rows } => serde_json::to_string(&serde_json::json!({
                "columns": columns,
                "rows": rows,
            })),
            Self::Card {
                title,
                content,
                fields,
            } => serde_json::to_string(&serde_json::json!({
                "title": title,
                "content": content,
                "fields": fields,
            })),
        }
    }
}

impl Serialize for UiPayload {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let ui_data = self.ui_data().map_err(serde::ser::Error::custom)?;
        let mut state = serializer.serialize_struct("UiPayload", 2)?;
        state.serialize_field("type", self.kind())?;
        state.serialize_field("uiData", &ui_data)?;
        state.end()
    }
}

/// What a tool hands back to the hosting platform.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResponse {
    pub text: String,
    pub data: Option<Value>,
    pub ui: UiPayload,
}

impl ToolResponse {
    /// The uniform "please authenticate" response produced on a gate miss.
    pub fn challenge(challenge: AuthChallenge) -> Self {
        Self {
            text: "Authentication required".into(),
            data: None,
            ui: UiPayload::OAuth2(challenge),
        }
    }
}

// ── Tool trait ───────────────────────────────────────────────────────────────

/// An agent-callable calendar tool.
#[async_trait]
pub trait CalendarTool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters_schema(&self) -> Value;
    async fn execute(&self, agent: &AgentInfo, params: Value) -> Result<ToolResponse>;
}
