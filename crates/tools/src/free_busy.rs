use std::sync::Arc;

use {
    anyhow::{Context, Result},
    async_trait::async_trait,
    serde::{Deserialize, Serialize},
    serde_json::{Value, json},
    tracing::info,
};

use {
    calgraph_graph::{
        DateTimeTimeZone, GraphClient, ScheduleInformation, ScheduleRequest, WorkingHours,
    },
    calgraph_oauth::{AuthGate, AuthOutcome},
};

use crate::tool::{AgentInfo, CalendarTool, TableColumn, ToolResponse, UiPayload};

fn default_interval() -> u32 {
    30
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Input {
    /// Email addresses of the mailboxes to check.
    schedules: Vec<String>,
    start_time: String,
    end_time: String,
    #[serde(default = "default_interval")]
    availability_view_interval: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleItemRow {
    status: Option<String>,
    start: String,
    end: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleRow {
    schedule_id: String,
    availability: Option<String>,
    working_hours: Option<WorkingHours>,
    schedule_items: Option<Vec<ScheduleItemRow>>,
}

impl From<ScheduleInformation> for ScheduleRow {
    fn from(info: ScheduleInformation) -> Self {
        Self {
            schedule_id: info.schedule_id,
            availability: info.availability_view,
            working_hours: info.working_hours,
            schedule_items: info.schedule_items.map(|items| {
                items
                    .into_iter()
                    .map(|item| ScheduleItemRow {
                        status: item.status,
                        start: item.start.date_time,
                        end: item.end.date_time,
                    })
                    .collect()
            }),
        }
    }
}

/// Render working hours as `start - end`, with `N/A` for missing bounds.
fn format_working_hours(hours: Option<&WorkingHours>) -> String {
    let start = hours
        .and_then(|h| h.start_time.as_deref())
        .unwrap_or("N/A");
    let end = hours.and_then(|h| h.end_time.as_deref()).unwrap_or("N/A");
    format!("{start} - {end}")
}

/// Query free/busy availability for a set of mailboxes.
pub struct GetFreeBusyScheduleTool {
    gate: Arc<AuthGate>,
    graph: GraphClient,
}

impl GetFreeBusyScheduleTool {
    pub fn new(gate: Arc<AuthGate>, graph: GraphClient) -> Self {
        Self { gate, graph }
    }
}

#[async_trait]
impl CalendarTool for GetFreeBusyScheduleTool {
    fn name(&self) -> &str {
        "get-freebusy-schedule"
    }

    fn description(&self) -> &str {
        "Get free/busy availability information for users in a specified time period"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "schedules": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Email addresses of users to check availability for",
                },
                "startTime": { "type": "string", "description": "Start time in ISO format" },
                "endTime": { "type": "string", "description": "End time in ISO format" },
                "availabilityViewInterval": {
                    "type": "integer",
                    "description": "Duration of time slots in minutes (default: 30)",
                },
            },
            "required": ["schedules", "startTime", "endTime"],
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

        let request = ScheduleRequest {
            schedules: input.schedules.clone(),
            start_time: DateTimeTimeZone::utc(input.start_time),
            end_time: DateTimeTimeZone::utc(input.end_time),
            availability_view_interval: input.availability_view_interval,
        };

        let schedules = self
            .graph
            .get_schedule(&credential.access_token, &request)
            .await?;
        let rows: Vec<ScheduleRow> = schedules.into_iter().map(ScheduleRow::from).collect();
        info!(agent_id = %agent.id, mailboxes = rows.len(), "retrieved free/busy schedule");

        let table_rows: Vec<Value> = rows
            .iter()
            .map(|row| {
                json!({
                    "scheduleId": row.schedule_id,
                    "availability": row.availability,
                    "workingHours": format_working_hours(row.working_hours.as_ref()),
                })
            })
            .collect();
        let data: Vec<Value> = rows
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<_, _>>()?;

        Ok(ToolResponse {
            text: format!("Retrieved availability for {} users", input.schedules.len()),
            data: Some(json!({ "scheduleInfo": data })),
            ui: UiPayload::Table {
                columns: vec![
                    TableColumn::text("scheduleId", "User"),
                    TableColumn::text("availability", "Availability"),
                    TableColumn::text("workingHours", "Working Hours"),
                ],
                rows: table_rows,
            },
        })
    }
}
