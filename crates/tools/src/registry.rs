use std::{collections::HashMap, sync::Arc};

use {serde::Serialize, serde_json::Value};

use crate::tool::CalendarTool;

/// Registry of the tools exposed to the hosting platform.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn CalendarTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register(&mut self, tool: Arc<dyn CalendarTool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn CalendarTool>> {
        self.tools.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn list_schemas(&self) -> Vec<Value> {
        let mut schemas: Vec<Value> = self
            .tools
            .values()
            .map(|t| {
                serde_json::json!({
                    "name": t.name(),
                    "description": t.description(),
                    "parameters": t.parameters_schema(),
                })
            })
            .collect();
        schemas.sort_by_key(|s| s["name"].as_str().map(String::from));
        schemas
    }
}

/// A named grouping of tools, surfaced to the platform for discovery.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Toolbox {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tools: Vec<String>,
    pub recommended_prompt: String,
}

/// The Outlook Calendar toolbox descriptor.
pub fn outlook_calendar_toolbox() -> Toolbox {
    Toolbox {
        id: "outlook-calendar-toolbox".into(),
        name: "Outlook Calendar Toolbox".into(),
        description: "A collection of tools for managing Outlook Calendar events".into(),
        tools: vec![
            "get-calendar-events".into(),
            "create-calendar-event".into(),
            "get-calendar-view".into(),
            "get-freebusy-schedule".into(),
        ],
        recommended_prompt: "Use this toolbox to manage your Outlook Calendar events. You can:\n\
                             - Get a list of upcoming events\n\
                             - Create new calendar events\n\
                             - View events within a specific time range\n\
                             - Check free/busy availability for other users"
            .into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        testutil,
        tool::{AgentInfo, ToolResponse},
    };
    use {anyhow::Result, async_trait::async_trait};

    struct NamedTool(&'static str);

    #[async_trait]
    impl CalendarTool for NamedTool {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "test tool"
        }

        fn parameters_schema(&self) -> Value {
            serde_json::json!({ "type": "object" })
        }

        async fn execute(&self, _agent: &AgentInfo, _params: Value) -> Result<ToolResponse> {
            anyhow::bail!("not invoked in these tests")
        }
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ToolRegistry::new();
        assert!(registry.is_empty());

        registry.register(Arc::new(NamedTool("get-calendar-events")));
        assert_eq!(registry.len(), 1);
        assert!(registry.get("get-calendar-events").is_some());
        assert!(registry.get("unknown-tool").is_none());
    }

    #[test]
    fn test_list_schemas_is_sorted_by_name() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(NamedTool("zz-tool")));
        registry.register(Arc::new(NamedTool("aa-tool")));

        let schemas = registry.list_schemas();
        assert_eq!(schemas[0]["name"], "aa-tool");
        assert_eq!(schemas[1]["name"], "zz-tool");
        assert_eq!(schemas[0]["description"], "test tool");
    }

    #[test]
    fn test_toolbox_lists_all_four_tools() {
        let toolbox = outlook_calendar_toolbox();
        assert_eq!(toolbox.id, "outlook-calendar-toolbox");
        assert_eq!(toolbox.tools.len(), 4);
        assert!(toolbox.tools.contains(&"get-freebusy-schedule".to_string()));

        let wire = serde_json::to_value(&toolbox).unwrap();
        assert!(wire["recommendedPrompt"].as_str().unwrap().contains("Outlook"));
    }

    #[test]
    fn test_toolbox_ids_match_registered_tool_names() {
        let gate = testutil::gate();
        let graph = calgraph_graph::GraphClient::new();

        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(crate::list_events::GetCalendarEventsTool::new(
            Arc::clone(&gate),
            graph.clone(),
        )));
        registry.register(Arc::new(crate::create_event::CreateCalendarEventTool::new(
            Arc::clone(&gate),
            graph.clone(),
        )));
        registry.register(Arc::new(crate::calendar_view::GetCalendarViewTool::new(
            Arc::clone(&gate),
            graph.clone(),
        )));
        registry.register(Arc::new(crate::free_busy::GetFreeBusyScheduleTool::new(
            gate, graph,
        )));

        for id in outlook_calendar_toolbox().tools {
            assert!(registry.get(&id).is_some(), "toolbox lists unknown tool {id}");
        }
    }
}
