use std::sync::Arc;

use {
    anyhow::{Context, Result},
    async_trait::async_trait,
    serde::{Deserialize, Serialize},
    serde_json::{Value, json},
    tracing::info,
};

use {
    calgraph_graph::{GraphClient, GraphEvent},
    calgraph_oauth::{AuthGate, AuthOutcome},
};

use crate::tool::{AgentInfo, CalendarTool, TableColumn, ToolResponse, UiPayload};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Input {
    start_time: String,
    end_time: String,
}

#[derive(Debug, Serialize)]
struct ViewRow {
    id: String,
    subject: Option<String>,
    start: String,
    end: String,
    location: String,
    status: Option<String>,
}

impl From<GraphEvent> for ViewRow {
    fn from(event: GraphEvent) -> Self {
        Self {
            id: event.id,
            subject: event.subject,
            start: event.start.date_time,
            end: event.end.date_time,
            location: event
                .location
                .map(|l| l.display_name)
                .unwrap_or_else(|| "No location".into()),
            status: event.show_as,
        }
    }
}

/// List events within a time range via the calendarView endpoint, which
/// expands recurring events into their individual occurrences.
pub struct GetCalendarViewTool {
    gate: Arc<AuthGate>,
    graph: GraphClient,
}

impl GetCalendarViewTool {
    pub fn new(gate: Arc<AuthGate>, graph: GraphClient) -> Self {
        Self { gate, graph }
    }
}

#[async_trait]
impl CalendarTool for GetCalendarViewTool {
    fn name(&self) -> &str {
        "get-calendar-view"
    }

    fn description(&self) -> &str {
        "Get calendar events within a specific time range"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "startTime": { "type": "string", "description": "Start time in ISO format" },
                "endTime": { "type": "string", "description": "End time in ISO format" },
            },
            "required": ["startTime", "endTime"],
        })
    }

    async fn execute(&self, agent: &AgentInfo, params: Value) -> Result<ToolResponse> {
        let input: Input = serde_json::from_value(params).context("invalid parameters")?;

        let credential = match self.gate.check(&agent.id).await? {
            AuthOutcome::Authenticated(credential) => credential,
            AuthOutcome::ChallengeRequired(challenge) => {
                return Ok(ToolResponse::challenge(challenge));
            },
        };

        let events = self
            .graph
            .calendar_view(
                &credential.access_token,
                &input.start_time,
                &input.end_time,
            )
            .await?;
        let rows: Vec<ViewRow> = events.into_iter().map(ViewRow::from).collect();
        info!(agent_id = %agent.id, count = rows.len(), "retrieved calendar view");

        let row_values: Vec<Value> = rows
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<_, _>>()?;

        Ok(ToolResponse {
            text: format!("Found {} events in the specified time range", rows.len()),
            data: Some(json!({ "events": row_values })),
            ui: UiPayload::Table {
                columns: vec![
                    TableColumn::text("subject", "Subject"),
                    TableColumn::text("start", "Start Time"),
                    TableColumn::text("end", "End Time"),
                    TableColumn::text("location", "Location"),
                    TableColumn::text("status", "Status"),
                ],
                rows: row_values,
            },
        })
    }
}
