use std::sync::Arc;

use {
    anyhow::{Context, Result},
    async_trait::async_trait,
    serde::Deserialize,
    serde_json::{Value, json},
    tracing::info,
};

use {
    calgraph_graph::{DateTimeTimeZone, EventRequest, GraphClient, ItemBody, Location},
    calgraph_oauth::{AuthGate, AuthOutcome},
};

use crate::tool::{AgentInfo, CalendarTool, CardField, ToolResponse, UiPayload};

#[derive(Debug, Deserialize)]
struct Input {
    subject: String,
    start: String,
    end: String,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Create a new event in the agent's Outlook Calendar.
pub struct CreateCalendarEventTool {
    gate: Arc<AuthGate>,
    graph: GraphClient,
}

impl CreateCalendarEventTool {
    pub fn new(gate: Arc<AuthGate>, graph: GraphClient) -> Self {
        Self { gate, graph }
    }
}

#[async_trait]
impl CalendarTool for CreateCalendarEventTool {
    fn name(&self) -> &str {
        "create-calendar-event"
    }

    fn description(&self) -> &str {
        "Create a new event in Outlook Calendar"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "subject": { "type": "string", "description": "Subject of the event" },
                "start": { "type": "string", "description": "Start time in ISO format" },
                "end": { "type": "string", "description": "End time in ISO format" },
                "location": { "type": "string", "description": "Location of the event" },
                "description": { "type": "string", "description": "Description of the event" },
            },
            "required": ["subject", "start", "end"],
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

        let request = EventRequest {
            subject: input.subject.clone(),
            start: DateTimeTimeZone::utc(input.start.clone()),
            end: DateTimeTimeZone::utc(input.end.clone()),
            location: input.location.clone().map(|display_name| Location {
                display_name,
            }),
            body: input.description.map(|content| ItemBody {
                content_type: "text".into(),
                content,
            }),
        };

        let created = self
            .graph
            .create_event(&credential.access_token, &request)
            .await?;
        info!(agent_id = %agent.id, subject = %input.subject, "created calendar event");

        Ok(ToolResponse {
            text: format!("Created calendar event: {}", input.subject),
            data: Some(json!({ "event": created })),
            ui: UiPayload::Card {
                title: "Event Created".into(),
                content: format!("Successfully created event \"{}\"", input.subject),
                fields: vec![
                    CardField::new("Start", input.start),
                    CardField::new("End", input.end),
                    CardField::new(
                        "Location",
                        input.location.unwrap_or_else(|| "No location".into()),
                    ),
                ],
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

    fn input() -> Value {
        json!({
            "subject": "Design Review",
            "start": "2024-01-01T10:00:00",
            "end": "2024-01-01T11:00:00",
            "location": "Room 4",
            "description": "Quarterly review",
        })
    }

    #[tokio::test]
    async fn test_unauthenticated_returns_challenge_without_calling_graph() {
        let mut server = mockito::Server::new_async().await;
        let graph_mock = server
            .mock("POST", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let tool = CreateCalendarEventTool::new(testutil::gate(), testutil::graph(&server));
        let response = tool.execute(&agent(), input()).await.unwrap();

        graph_mock.assert_async().await;
        assert_eq!(response.ui.kind(), "oauth2");
        assert!(response.data.is_none());
    }

    #[tokio::test]
    async fn test_authenticated_posts_event_and_returns_card() {
        let mut server = mockito::Server::new_async().await;
        let graph_mock = server
            .mock("POST", "/me/calendar/events")
            .match_header("authorization", "Bearer test-token")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{
                    "subject": "Design Review",
                    "start": { "dateTime": "2024-01-01T10:00:00", "timeZone": "UTC" },
                    "location": { "displayName": "Room 4" },
                    "body": { "contentType": "text", "content": "Quarterly review" }
                }"#
                .into(),
            ))
            .with_status(201)
            .with_body(r#"{"id":"new-1","subject":"Design Review"}"#)
            .create_async()
            .await;

        let gate = testutil::gate();
        testutil::authenticate(&gate, "test-agent");

        let tool = CreateCalendarEventTool::new(gate, testutil::graph(&server));
        let response = tool.execute(&agent(), input()).await.unwrap();

        graph_mock.assert_async().await;
        assert_eq!(response.text, "Created calendar event: Design Review");
        assert_eq!(response.ui.kind(), "card");
        assert_eq!(response.data.unwrap()["event"]["id"], "new-1");

        match response.ui {
            UiPayload::Card { fields, .. } => {
                assert_eq!(fields[2].value, "Room 4");
            },
            _ => panic!("expected a card payload"),
        }
    }

    #[tokio::test]
    async fn test_optional_fields_default_in_card() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/me/calendar/events")
            .with_status(201)
            .with_body(r#"{"id":"new-2"}"#)
            .create_async()
            .await;

        let gate = testutil::gate();
        testutil::authenticate(&gate, "test-agent");

        let tool = CreateCalendarEventTool::new(gate, testutil::graph(&server));
        let response = tool
            .execute(
                &agent(),
                json!({
                    "subject": "Quick Sync",
                    "start": "2024-01-01T10:00:00",
                    "end": "2024-01-01T10:15:00",
                }),
            )
            .await
            .unwrap();

        match response.ui {
            UiPayload::Card { fields, .. } => {
                assert_eq!(fields[2].label, "Location");
                assert_eq!(fields[2].value, "No location");
            },
            _ => panic!("expected a card payload"),
        }
    }

    #[tokio::test]
    async fn test_missing_required_field_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let gate = testutil::gate();
        testutil::authenticate(&gate, "test-agent");

        let tool = CreateCalendarEventTool::new(gate, testutil::graph(&server));
        let result = tool
            .execute(&agent(), json!({ "subject": "No times" }))
            .await;

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("invalid parameters"));
    }
}
