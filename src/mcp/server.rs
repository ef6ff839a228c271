//! The central Model Context Protocol engine
//!
//! Decodes one line into a JSON-RPC envelope, narrows it to a typed [`McpRequest`]
//! and routes it. The caller receives an [`Outcome`] telling it what to write and
//! whether to stop reading.

use rust_mcp_sdk::schema::{
    CallToolRequestParams, Implementation, InitializeResult, ListToolsResult, ProtocolVersion,
    ServerCapabilities, ServerCapabilitiesTools,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::domain::tools::{build_tools_list, handle_tools_call, ToolCall};
use crate::mcp::rpc::{app_error_to_json_rpc, is_json_rpc_error, is_request_id, json_rpc_result};
use crate::{errors::AppError, AppState};

pub const SUPPORTED_PROTOCOL_VERSION: &str = "2024-11-05";

#[derive(Debug, Deserialize)]
struct Envelope {
    jsonrpc: String,
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum McpRequest {
    Initialize,
    ListTools,
    CallTool(ToolCall),
    Shutdown,
    Unknown(String),
}

impl McpRequest {
    pub fn decode(method: &str, params: Option<Value>) -> Result<Self, AppError> {
        if let Some(params) = params.as_ref() {
            if !params.is_object() {
                return Err(AppError::bad_request(
                    "invalid_params",
                    "params must be an object",
                ));
            }
        }

        Ok(match method {
            "initialize" => Self::Initialize,
            "tools/list" => Self::ListTools,
            "tools/call" => {
                let raw_params = params.ok_or_else(|| {
                    AppError::bad_request("missing_params", "tools/call requires params")
                })?;
                let call: CallToolRequestParams = serde_json::from_value(raw_params)
                    .map_err(|err| AppError::bad_request("invalid_params", err.to_string()))?;
                Self::CallTool(ToolCall {
                    name: call.name,
                    arguments: call.arguments.unwrap_or_default(),
                })
            }
            "shutdown" => Self::Shutdown,
            other => Self::Unknown(other.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Respond(Value),
    RespondThenShutdown(Value),
    Shutdown,
    NoResponse,
}

pub async fn handle_line(state: &AppState, line: &str) -> Outcome {
    let payload: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, "ignoring line that is not valid JSON");
            return Outcome::NoResponse;
        }
    };

    if !payload.is_object() {
        warn!("ignoring message that is not a JSON object");
        return Outcome::NoResponse;
    }

    let envelope: Envelope = match serde_json::from_value(payload) {
        Ok(envelope) => envelope,
        Err(err) => {
            warn!(error = %err, "ignoring message that is not a JSON-RPC request");
            return Outcome::NoResponse;
        }
    };

    if envelope.jsonrpc != "2.0" || envelope.method.trim().is_empty() {
        warn!(
            jsonrpc = %envelope.jsonrpc,
            method = %envelope.method,
            "ignoring message with invalid JSON-RPC envelope"
        );
        return Outcome::NoResponse;
    }

    let Some(id) = envelope.id else {
        return handle_notification(&envelope.method);
    };

    if !is_request_id(&id) {
        warn!(id = %id, "ignoring request with invalid id");
        return Outcome::NoResponse;
    }

    let (request, response) = match McpRequest::decode(&envelope.method, envelope.params) {
        Ok(request) => {
            let response = handle_request(state, id.clone(), &request).await;
            (Some(request), response)
        }
        Err(err) => (None, app_error_to_json_rpc(id.clone(), err)),
    };

    let tool = match request.as_ref() {
        Some(McpRequest::CallTool(call)) => call.name.as_str(),
        _ => "-",
    };
    info!(
        method = %envelope.method,
        id = %id,
        tool = %tool,
        outcome = if is_json_rpc_error(&response) { "failure" } else { "success" },
        "mcp request handled"
    );

    match request {
        Some(McpRequest::Shutdown) => Outcome::RespondThenShutdown(response),
        _ => Outcome::Respond(response),
    }
}

fn handle_notification(method: &str) -> Outcome {
    debug!(method = %method, "received notification");
    if method == "shutdown" {
        info!("shutdown notification received");
        return Outcome::Shutdown;
    }
    Outcome::NoResponse
}

pub async fn handle_request(state: &AppState, id: Value, request: &McpRequest) -> Value {
    let result = match request {
        McpRequest::Initialize => initialize_result(),
        McpRequest::ListTools => serde_json::to_value(ListToolsResult {
            meta: None,
            next_cursor: None,
            tools: build_tools_list(),
        })
        .map_err(|err| AppError::internal(format!("failed to serialize tools list: {err}"))),
        McpRequest::CallTool(call) => handle_tools_call(state, call).await,
        McpRequest::Shutdown => Ok(json!({})),
        McpRequest::Unknown(method) => Err(AppError::not_found(
            "method_not_found",
            format!("Method not found: {method}"),
            json!({ "method": method }),
        )),
    };

    match result {
        Ok(result) => json_rpc_result(id, result),
        Err(err) => app_error_to_json_rpc(id, err),
    }
}

fn initialize_result() -> Result<Value, AppError> {
    let initialize_result = InitializeResult {
        server_info: Implementation {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            title: None,
            description: None,
            icons: vec![],
            website_url: None,
        },
        capabilities: ServerCapabilities {
            tools: Some(ServerCapabilitiesTools {
                list_changed: Some(false),
            }),
            resources: None,
            prompts: None,
            ..Default::default()
        },
        protocol_version: ProtocolVersion::V2024_11_05.into(),
        instructions: None,
        meta: None,
    };

    serde_json::to_value(initialize_result)
        .map_err(|err| AppError::internal(format!("failed to serialize initialize result: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_routes_by_method_name() {
        assert_eq!(
            McpRequest::decode("initialize", None).expect("decode"),
            McpRequest::Initialize
        );
        assert_eq!(
            McpRequest::decode("tools/list", Some(json!({}))).expect("decode"),
            McpRequest::ListTools
        );
        assert_eq!(
            McpRequest::decode("shutdown", Some(json!({}))).expect("decode"),
            McpRequest::Shutdown
        );
        assert_eq!(
            McpRequest::decode("invalid/method", None).expect("decode"),
            McpRequest::Unknown("invalid/method".to_string())
        );
    }

    #[test]
    fn decode_validates_tool_call_params() {
        let decoded = McpRequest::decode(
            "tools/call",
            Some(json!({ "name": "capture_knowledge", "arguments": { "topic": "T" } })),
        )
        .expect("decode");
        let McpRequest::CallTool(call) = decoded else {
            panic!("expected tool call");
        };
        assert_eq!(call.name, "capture_knowledge");
        assert_eq!(call.arguments.get("topic"), Some(&json!("T")));

        let missing = McpRequest::decode("tools/call", None).expect_err("missing params");
        assert_eq!(missing.code(), "missing_params");

        let nameless = McpRequest::decode("tools/call", Some(json!({ "arguments": {} })))
            .expect_err("missing name");
        assert_eq!(nameless.code(), "invalid_params");
    }

    #[test]
    fn decode_rejects_non_object_params() {
        let error =
            McpRequest::decode("tools/call", Some(json!([1, 2]))).expect_err("array params");
        assert!(error.to_string().contains("bad request"));
    }

    #[test]
    fn initialize_result_is_fixed_descriptor() {
        let result = initialize_result().expect("initialize result");

        assert_eq!(result["protocolVersion"], SUPPORTED_PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], env!("CARGO_PKG_NAME"));
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
    }
}
