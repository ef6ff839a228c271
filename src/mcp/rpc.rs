//! JSON-RPC protocol representations and formatting utilities
//!
//! Provides standardized mapping of internal AppErrors to valid JSON-RPC payloads.

use rust_mcp_sdk::schema::{
    JsonrpcErrorResponse, JsonrpcResultResponse, RequestId, Result as McpResult, RpcError,
};
use serde_json::{json, Value};

use crate::errors::AppError;

pub mod error_codes {
    pub const INVALID_PARAMS: i32 = -32602;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INTERNAL_ERROR: i32 = -32603;
}

pub fn is_json_rpc_error(value: &Value) -> bool {
    value.get("error").is_some()
}

/// Any JSON number or string correlates a request with its response.
pub fn is_request_id(value: &Value) -> bool {
    value.is_string() || value.is_number()
}

pub fn app_error_to_json_rpc(id: Value, err: AppError) -> Value {
    let data = serde_json::to_value(err.error_data()).ok();
    match err {
        AppError::BadRequest { .. } => {
            json_rpc_error_with_data(id, error_codes::INVALID_PARAMS, "Invalid params", data)
        }
        AppError::NotFound { message, .. } => {
            json_rpc_error_with_data(id, error_codes::METHOD_NOT_FOUND, &message, data)
        }
        AppError::Internal { message, .. } => {
            json_rpc_error(id, error_codes::INTERNAL_ERROR, &message)
        }
    }
}

pub fn json_rpc_error(id: Value, code: i32, message: &str) -> Value {
    json_rpc_error_with_data(id, code, message, None)
}

pub fn json_rpc_error_with_data(
    id: Value,
    code: i32,
    message: &str,
    data: Option<Value>,
) -> Value {
    if let Some(request_id) = value_to_request_id(&id) {
        let response = JsonrpcErrorResponse::new(
            RpcError {
                code: i64::from(code),
                data: data.clone(),
                message: message.to_string(),
            },
            Some(request_id),
        );
        if let Ok(value) = serde_json::to_value(response) {
            return value;
        }
    }

    let mut error = json!({ "code": code, "message": message });
    if let Some(data) = data {
        error["data"] = data;
    }
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": error
    })
}

pub fn json_rpc_result(id: Value, result: Value) -> Value {
    if let Some(request_id) = value_to_request_id(&id) {
        let extra = result.as_object().cloned();
        let response = JsonrpcResultResponse::new(request_id, McpResult { meta: None, extra });
        if let Ok(value) = serde_json::to_value(response) {
            return value;
        }
    }

    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result
    })
}

/// Maps ids the MCP schema can represent; other numbers are echoed verbatim by the callers.
pub fn value_to_request_id(value: &Value) -> Option<RequestId> {
    if let Some(string_id) = value.as_str() {
        return Some(RequestId::String(string_id.to_string()));
    }

    value.as_i64().map(RequestId::Integer)
}
