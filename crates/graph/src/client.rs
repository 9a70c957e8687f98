use {reqwest::Client, tracing::debug};

use crate::types::{
    Collection, EventRequest, GraphEvent, ScheduleInformation, ScheduleRequest,
};

/// Microsoft Graph API base URL.
const API_BASE: &str = "https://graph.microsoft.com/v1.0";

/// Errors from Graph calls.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GraphError {
    /// Transport or decoding failure.
    #[error("graph request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Graph answered with a non-success status (including an expired or
    /// revoked token; the caller decides whether to re-trigger auth).
    #[error("graph API error: {status} - {body}")]
    Api { status: u16, body: String },
}

/// Thin client over the Graph calendar endpoints.
#[derive(Debug, Clone)]
pub struct GraphClient {
    client: Client,
    base_url: String,
}

impl Default for GraphClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphClient {
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(API_BASE)
    }

    /// Point the client at a different base URL (used by tests).
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// `GET /me/calendar/events?$top={top}`
    pub async fn list_events(
        &self,
        access_token: &str,
        top: u32,
    ) -> Result<Vec<GraphEvent>, GraphError> {
        let url = format!("{}/me/calendar/events", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("$top", top)])
            .bearer_auth(access_token)
            .send()
            .await?;

        let events: Collection<GraphEvent> = Self::decode(response).await?;
        Ok(events.value)
    }

    /// `GET /me/calendar/calendarView?startDateTime=..&endDateTime=..`
    pub async fn calendar_view(
        &self,
        access_token: &str,
        start_time: &str,
        end_time: &str,
    ) -> Result<Vec<GraphEvent>, GraphError> {
        let url = format!("{}/me/calendar/calendarView", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("startDateTime", start_time), ("endDateTime", end_time)])
            .bearer_auth(access_token)
            .send()
            .await?;

        let events: Collection<GraphEvent> = Self::decode(response).await?;
        Ok(events.value)
    }

    /// `POST /me/calendar/events`
    ///
    /// Returns the created event as Graph sent it back.
    pub async fn create_event(
        &self,
        access_token: &str,
        event: &EventRequest,
    ) -> Result<serde_json::Value, GraphError> {
        let url = format!("{}/me/calendar/events", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(event)
            .send()
            .await?;

        Self::decode(response).await
    }

    /// `POST /users/me/calendar/getSchedule`
    pub async fn get_schedule(
        &self,
        access_token: &str,
        request: &ScheduleRequest,
    ) -> Result<Vec<ScheduleInformation>, GraphError> {
        let url = format!("{}/users/me/calendar/getSchedule", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(request)
            .send()
            .await?;

        let schedules: Collection<ScheduleInformation> = Self::decode(response).await?;
        Ok(schedules.value)
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GraphError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "graph API returned an error");
            return Err(GraphError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}
