//! Tools exposed via Model Context Protocol
//!
//! Provides the `capture_knowledge` descriptor and its `tools/call` handler, which
//! validates the arguments and hands a [`KnowledgeEntry`] to the recorder.

use chrono::Local;
use rust_mcp_sdk::{
    macros,
    schema::{CallToolResult, ContentBlock, TextContent, Tool},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use crate::domain::recorder::{capture_knowledge, Category, KnowledgeEntry};
use crate::{errors::AppError, AppState};

pub const CAPTURE_TOOL_NAME: &str = "capture_knowledge";

/// A decoded `tools/call` request.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub name: String,
    pub arguments: serde_json::Map<String, Value>,
}

#[macros::mcp_tool(
    name = "capture_knowledge",
    description = "PROACTIVELY capture any learned information about the project - architecture, patterns, dependencies, workflows, configurations, or surprising behaviors. This builds automatic documentation."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct CaptureKnowledgeTool {
    /// Type of knowledge being captured
    pub category: String,
    /// Brief topic/title of what was learned
    pub topic: String,
    /// The specific information learned
    pub details: String,
    /// Related files/paths (optional)
    pub files: Option<String>,
}

impl CaptureKnowledgeTool {
    pub fn into_entry(self) -> Result<KnowledgeEntry, AppError> {
        let category = self.category.trim().parse::<Category>()?;
        let topic = required_text("topic", self.topic)?;
        let details = required_text("details", self.details)?;
        let files = self
            .files
            .map(|files| files.trim().to_string())
            .filter(|files| !files.is_empty());

        Ok(KnowledgeEntry {
            category,
            topic,
            details,
            files,
            recorded_at: Local::now(),
        })
    }
}

fn required_text(field: &'static str, value: String) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::bad_request(
            "invalid_arguments",
            format!("{field} must not be empty"),
        ));
    }
    Ok(trimmed.to_string())
}

pub fn build_tools_list() -> Vec<Tool> {
    let mut capture = CaptureKnowledgeTool::tool();
    if let Some(category) = capture
        .input_schema
        .properties
        .as_mut()
        .and_then(|properties| properties.get_mut("category"))
    {
        category.insert("enum".to_string(), json!(Category::names()));
    }
    vec![capture]
}

pub async fn handle_tools_call(state: &AppState, call: &ToolCall) -> Result<Value, AppError> {
    if call.name != CAPTURE_TOOL_NAME {
        return Err(AppError::not_found(
            "tool_not_found",
            format!("Unknown tool: {}", call.name),
            json!({ "name": call.name }),
        ));
    }

    let arguments: CaptureKnowledgeTool =
        serde_json::from_value(Value::Object(call.arguments.clone()))
            .map_err(|err| AppError::bad_request("invalid_arguments", err.to_string()))?;
    let entry = arguments.into_entry()?;

    let confirmation = capture_knowledge(state.knowledge_log.as_ref(), &entry)
        .await
        .map_err(|err| {
            warn!(error = %err, topic = %entry.topic, "knowledge capture failed");
            AppError::internal(format!("Capture failed: {}", err.message()))
        })?;

    serde_json::to_value(CallToolResult {
        content: vec![ContentBlock::from(TextContent::new(confirmation, None, None))],
        is_error: None,
        meta: None,
        structured_content: None,
    })
    .map_err(|err| AppError::internal(format!("failed to serialize tool result: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arguments(category: &str, topic: &str, details: &str) -> CaptureKnowledgeTool {
        CaptureKnowledgeTool {
            category: category.to_string(),
            topic: topic.to_string(),
            details: details.to_string(),
            files: None,
        }
    }

    #[test]
    fn tools_list_describes_capture_schema() {
        let tools = serde_json::to_value(build_tools_list()).expect("tools serialization");

        assert_eq!(tools.as_array().map(Vec::len), Some(1));
        let tool = &tools[0];
        assert_eq!(tool["name"], CAPTURE_TOOL_NAME);
        assert!(tool["description"]
            .as_str()
            .is_some_and(|text| text.contains("capture")));

        let schema = &tool["inputSchema"];
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["category"]["enum"], json!(Category::names()));

        let required = schema["required"].as_array().expect("required list");
        for field in ["category", "topic", "details"] {
            assert!(required.contains(&json!(field)), "{field} must be required");
        }
        assert!(!required.contains(&json!("files")));
        assert!(schema["properties"].get("files").is_some());
    }

    #[test]
    fn into_entry_trims_and_drops_blank_files() {
        let mut tool = arguments(" pattern ", " Retry ", " backoff ");
        tool.files = Some("   ".to_string());

        let entry = tool.into_entry().expect("valid arguments");
        assert_eq!(entry.category, Category::Pattern);
        assert_eq!(entry.topic, "Retry");
        assert_eq!(entry.details, "backoff");
        assert!(entry.files.is_none());
    }

    #[test]
    fn into_entry_rejects_unknown_category() {
        let error = arguments("opinion", "T", "D")
            .into_entry()
            .expect_err("unknown category");
        assert!(error.to_string().contains("bad request"));
    }

    #[test]
    fn into_entry_rejects_blank_details() {
        let error = arguments("config", "T", "  ")
            .into_entry()
            .expect_err("blank details");
        assert_eq!(error.message(), "details must not be empty");
    }
}
