//! Agent-callable Outlook Calendar tools.
//!
//! Each tool follows the same shape: deserialize input, pass the agent
//! through the authentication gate, issue one Graph call with the cached
//! bearer token, reshape the response into a presentation payload. A missing
//! credential short-circuits into an oauth2 challenge payload instead of an
//! error.

pub mod calendar_view;
pub mod create_event;
pub mod free_busy;
pub mod list_events;
pub mod registry;
pub mod tool;

#[cfg(test)]
pub(crate) mod testutil;

pub use {
    calendar_view::GetCalendarViewTool,
    create_event::CreateCalendarEventTool,
    free_busy::GetFreeBusyScheduleTool,
    list_events::GetCalendarEventsTool,
    registry::{Toolbox, ToolRegistry, outlook_calendar_toolbox},
    tool::{AgentInfo, CalendarTool, CardField, TableColumn, ToolResponse, UiPayload},
};
