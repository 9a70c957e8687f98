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

/// Upper bound on `$top`; the schema documents it and the handler enforces it.
const MAX_TOP: u32 = 50;

fn default_top() -> u32 {
    10
}

#[derive(Debug, Deserialize)]
struct Input {
    #[serde(default = "default_top")]
    top: u32,
}

#[derive(Debug, Serialize)]
struct EventRow {
    id: String,
    subject: Option<String>,
    start: String,
    end: String,
    location: String,
}

impl From<GraphEvent> for EventRow {
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
        }
    }
}

/// Retrieve upcoming events from the agent's Outlook Calendar.
pub struct GetCalendarEventsTool {
    gate: Arc<AuthGate>,
    graph: GraphClient,
}

impl GetCalendarEventsTool {
    pub fn new(gate: Arc<AuthGate>, graph: GraphClient) -> Self {
        Self { gate, graph }
    }
}

#[async_trait]
impl CalendarTool for GetCalendarEventsTool {
    fn name(&self) -> &str {
        "get-calendar-events"
    }

    fn description(&self) -> &str {
        "Retrieve events from Outlook Calendar"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "top": {
                    "type": "integer",
                    "description": "Number of events to retrieve (max 50)",
                },
            },
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

        let top = input.top.min(MAX_TOP);
        let events = self
            .graph
            .list_events(&credential.access_token, top)
            .await?;
        let rows: Vec<EventRow> = events.into_iter().map(EventRow::from).collect();
        info!(agent_id = %agent.id, count = rows.len(), "retrieved calendar events");

        let row_values: Vec<Value> = rows
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<_, _>>()?;

        Ok(ToolResponse {
            text: format!("Retrieved {} calendar events", rows.len()),
            data: Some(json!({ "events": row_values })),
            ui: UiPayload::Table {
                columns: vec![
                    TableColumn::text("subject", "Subject"),
                    TableColumn::text("start", "Start Time"),
                    TableColumn::text("end", "End Time"),
                    TableColumn::text("location", "Location"),
                ],
                rows: row_values,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;

    fn agent() -> AgentInfo {
        AgentInfo::new("test-agent")
    }

    #[tokio::test]
    async fn test_unauthenticated_returns_challenge_without_calling_graph() {
        let mut server = mockito::Server::new_async().await;
        let graph_mock = server
            .mock("GET", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let tool = GetCalendarEventsTool::new(testutil::gate(), testutil::graph(&server));
        let response = tool
            .execute(&agent(), json!({ "top": 10 }))
            .await
            .unwrap();

        graph_mock.assert_async().await;
        assert_eq!(response.ui.kind(), "oauth2");
        let wire = serde_json::to_value(&response).unwrap();
        let ui_data: Value =
            serde_json::from_str(wire["ui"]["uiData"].as_str().unwrap()).unwrap();
        assert_eq!(ui_data["url"], "https://auth-url");
    }

    #[tokio::test]
    async fn test_authenticated_returns_reshaped_events() {
        let mut server = mockito::Server::new_async().await;
        let graph_mock = server
            .mock("GET", "/me/calendar/events")
            .match_query(mockito::Matcher::UrlEncoded("$top".into(), "10".into()))
            .match_header("authorization", "Bearer test-token")
            .with_status(200)
            .with_body(
                r#"{"value":[{"id":"1","subject":"Test Event",
                    "start":{"dateTime":"2024-01-01T10:00:00Z"},
                    "end":{"dateTime":"2024-01-01T11:00:00Z"},
                    "location":{"displayName":"Test Location"}}]}"#,
            )
            .create_async()
            .await;

        let gate = testutil::gate();
        testutil::authenticate(&gate, "test-agent");

        let tool = GetCalendarEventsTool::new(gate, testutil::graph(&server));
        let response = tool.execute(&agent(), json!({})).await.unwrap();

        graph_mock.assert_async().await;
        assert_eq!(response.text, "Retrieved 1 calendar events");
        assert_eq!(response.ui.kind(), "table");

        let data = response.data.unwrap();
        assert_eq!(data["events"][0]["subject"], "Test Event");
        assert_eq!(data["events"][0]["location"], "Test Location");
    }

    #[tokio::test]
    async fn test_missing_location_falls_back() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/me/calendar/events")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"value":[{"id":"1","subject":"No Room",
                    "start":{"dateTime":"2024-01-01T10:00:00Z"},
                    "end":{"dateTime":"2024-01-01T11:00:00Z"}}]}"#,
            )
            .create_async()
            .await;

        let gate = testutil::gate();
        testutil::authenticate(&gate, "test-agent");

        let tool = GetCalendarEventsTool::new(gate, testutil::graph(&server));
        let response = tool.execute(&agent(), json!({})).await.unwrap();

        let data = response.data.unwrap();
        assert_eq!(data["events"][0]["location"], "No location");
    }

    #[tokio::test]
    async fn test_top_is_clamped_to_maximum() {
        let mut server = mockito::Server::new_async().await;
        let graph_mock = server
            .mock("GET", "/me/calendar/events")
            .match_query(mockito::Matcher::UrlEncoded("$top".into(), "50".into()))
            .with_status(200)
            .with_body(r#"{"value":[]}"#)
            .create_async()
            .await;

        let gate = testutil::gate();
        testutil::authenticate(&gate, "test-agent");

        let tool = GetCalendarEventsTool::new(gate, testutil::graph(&server));
        tool.execute(&agent(), json!({ "top": 500 })).await.unwrap();

        graph_mock.assert_async().await;
    }
}
