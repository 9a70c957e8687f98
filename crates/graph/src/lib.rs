//! Minimal Microsoft Graph client for the calendar surface the tools use.
//!
//! One method per endpoint, bearer token supplied per call. The base URL is
//! overridable so tests can point the client at a local mock server.

pub mod client;
pub mod types;

pub use {
    client::{GraphClient, GraphError},
    types::{
        Collection, DateTimeTimeZone, EventRequest, GraphEvent, ItemBody, Location,
        ScheduleInformation, ScheduleItem, ScheduleRequest, WorkingHours,
    },
};
