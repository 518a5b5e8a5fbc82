//! JSON-RPC 2.0 dispatcher for the MCP tool surface
//!
//! One request per call; notifications (no `id`) are executed but never
//! answered.

use crate::error::{codes, ToolError};
use crate::service::UiToolService;
use crate::types::{
    ComponentParams, ModifyRequest, UiChanged, UserParams, ValidateTreeParams,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error};

/// Protocol revision reported by `initialize`
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name reported by `initialize`
pub const SERVER_NAME: &str = "uitree-mcp";

/// URI of the component registry resource
pub const REGISTRY_URI: &str = "components://registry";

/// Method name of change notifications
pub const UI_CHANGED_METHOD: &str = "ui/changed";

/// Incoming request or notification
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol tag, expected `2.0`
    #[serde(default)]
    pub jsonrpc: Option<String>,
    /// Method name
    pub method: String,
    /// Request id; absent for notifications
    #[serde(default)]
    pub id: Option<Value>,
    /// Method parameters
    #[serde(default)]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Check if a response is expected
    #[inline]
    #[must_use]
    pub fn expects_response(&self) -> bool {
        !matches!(self.id, None | Some(Value::Null))
    }
}

/// Successful response envelope
#[must_use]
pub fn json_rpc_response(id: Option<Value>, result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

/// Error response envelope
#[must_use]
pub fn json_rpc_error(id: Option<Value>, code: i64, message: &str, data: Option<Value>) -> Value {
    let mut error = json!({ "code": code, "message": message });
    if let Some(data) = data {
        error["data"] = data;
    }
    json!({ "jsonrpc": "2.0", "id": id, "error": error })
}

/// Wrap a tool payload as MCP text content
#[must_use]
pub fn tool_text_content(payload: &Value) -> Value {
    json!({
        "type": "text",
        "text": serde_json::to_string_pretty(payload).unwrap_or_else(|_| "{}".to_string()),
    })
}

/// `ui/changed` notification for a successful modification
#[must_use]
pub fn ui_changed_notification(event: &UiChanged) -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": UI_CHANGED_METHOD,
        "params": event,
    })
}

/// Tool definitions advertised by `tools/list`
#[must_use]
pub fn tool_definitions() -> Vec<Value> {
    vec![
        json!({
            "name": "get_current_tree",
            "description": "Get the current UI tree for a user",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "userId": {"type": "string", "description": "The user ID to get the tree for"}
                },
                "required": ["userId"]
            }
        }),
        json!({
            "name": "get_component_details",
            "description": "Get detailed information about a specific UI component including props and examples",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "componentName": {
                        "type": "string",
                        "description": "The name of the component (e.g., TaskItem, Container)"
                    }
                },
                "required": ["componentName"]
            }
        }),
        json!({
            "name": "validate_tree",
            "description": "Validate a UI tree structure before applying changes",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "tree": {"type": "object", "description": "The UI tree to validate"}
                },
                "required": ["tree"]
            }
        }),
        json!({
            "name": "modify_ui",
            "description": "Modify the UI tree for a user by applying add, remove, update, or replace operations",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "userId": {"type": "string", "description": "Target user ID"},
                    "operation": {
                        "type": "string",
                        "enum": ["add", "remove", "update", "replace"],
                        "description": "The operation to perform"
                    },
                    "path": {
                        "type": "string",
                        "description": "JSONPath to the target location (e.g., $.children[0], $.children[1].props)"
                    },
                    "component": {
                        "type": "object",
                        "description": "The component tree to add or replace (for add/replace operations)"
                    },
                    "props": {
                        "type": "object",
                        "description": "Props to update (for update operation)"
                    },
                    "expectedVersion": {
                        "type": "integer",
                        "description": "Version the edit is based on; stale versions are rejected"
                    }
                },
                "required": ["userId", "operation", "path"]
            }
        }),
    ]
}

/// Resources advertised by `resources/list`
#[must_use]
pub fn resource_definitions() -> Vec<Value> {
    vec![json!({
        "uri": REGISTRY_URI,
        "name": "Component Registry",
        "description": "List of all available UI components",
        "mimeType": "application/json",
    })]
}

/// Protocol-level failure
#[derive(Debug, Clone, PartialEq)]
struct RpcFailure {
    code: i64,
    message: String,
    data: Option<Value>,
}

impl RpcFailure {
    fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

impl From<ToolError> for RpcFailure {
    fn from(err: ToolError) -> Self {
        if matches!(err, ToolError::Storage(_)) {
            error!(error = %err, "internal failure");
        }
        Self {
            code: err.rpc_code(),
            message: err.to_string(),
            data: Some(err.to_json()),
        }
    }
}

/// Dispatches JSON-RPC requests to a [`UiToolService`]
#[derive(Debug, Clone)]
pub struct McpServer {
    service: UiToolService,
}

impl McpServer {
    /// Create server
    #[must_use]
    pub fn new(service: UiToolService) -> Self {
        Self { service }
    }

    /// Get service
    #[inline]
    #[must_use]
    pub fn service(&self) -> &UiToolService {
        &self.service
    }

    /// Handle one raw line of input
    ///
    /// # Returns
    /// The response to write back, or `None` for notifications.
    pub async fn handle_line(&self, line: &str) -> Option<Value> {
        let raw: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                return Some(json_rpc_error(
                    None,
                    codes::PARSE_ERROR,
                    &format!("Parse error: {e}"),
                    None,
                ))
            }
        };

        let id = raw.get("id").cloned();
        if !raw.is_object() {
            return Some(json_rpc_error(
                None,
                codes::INVALID_REQUEST,
                "Invalid Request: expected an object",
                None,
            ));
        }

        match serde_json::from_value::<JsonRpcRequest>(raw) {
            Ok(request) => self.handle(request).await,
            Err(e) => Some(json_rpc_error(
                id,
                codes::INVALID_REQUEST,
                &format!("Invalid Request: {e}"),
                None,
            )),
        }
    }

    /// Handle a decoded request
    pub async fn handle(&self, request: JsonRpcRequest) -> Option<Value> {
        debug!(method = %request.method, "rpc request");
        let expects_response = request.expects_response();
        let result = self.dispatch(&request.method, request.params).await;

        if !expects_response {
            return None;
        }
        Some(match result {
            Ok(value) => json_rpc_response(request.id, value),
            Err(failure) => {
                json_rpc_error(request.id, failure.code, &failure.message, failure.data)
            }
        })
    }

    async fn dispatch(&self, method: &str, params: Option<Value>) -> Result<Value, RpcFailure> {
        match method {
            "initialize" => Ok(json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {"tools": {}, "resources": {}},
                "serverInfo": {"name": SERVER_NAME, "version": crate::VERSION},
            })),
            "notifications/initialized" | "initialized" | "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": tool_definitions() })),
            "resources/list" => Ok(json!({ "resources": resource_definitions() })),
            "resources/read" => self.read_resource(params.as_ref()),
            "tools/call" => {
                let params = params
                    .as_ref()
                    .and_then(Value::as_object)
                    .ok_or_else(|| RpcFailure::new(codes::INVALID_PARAMS, "params must be an object"))?;
                let name = params.get("name").and_then(Value::as_str).unwrap_or("");
                let args = match params.get("arguments") {
                    None | Some(Value::Null) => json!({}),
                    Some(v) => v.clone(),
                };
                let payload = self.call_tool(name, args).await?;
                Ok(json!({ "content": [tool_text_content(&payload)] }))
            }
            other => Err(RpcFailure::new(
                codes::METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            )),
        }
    }

    fn read_resource(&self, params: Option<&Value>) -> Result<Value, RpcFailure> {
        let uri = params
            .and_then(|p| p.get("uri"))
            .and_then(Value::as_str)
            .ok_or_else(|| RpcFailure::new(codes::INVALID_PARAMS, "uri is required"))?;

        if uri != REGISTRY_URI {
            return Err(RpcFailure::new(
                codes::INVALID_PARAMS,
                format!("Unknown resource: {uri}"),
            ));
        }

        let body = json!({ "components": self.service.list_components(None) });
        Ok(json!({
            "contents": [{
                "uri": uri,
                "mimeType": "application/json",
                "text": serde_json::to_string_pretty(&body).unwrap_or_else(|_| "{}".to_string()),
            }]
        }))
    }

    /// Run a tool by name and return its JSON payload
    ///
    /// # Errors
    /// [`ToolError::Validation`] for unknown tools or malformed arguments,
    /// otherwise whatever the tool itself returns.
    pub async fn call_tool(&self, name: &str, args: Value) -> Result<Value, ToolError> {
        let payload = match name {
            "get_current_tree" => {
                let params: UserParams = parse_args(args)?;
                to_payload(&self.service.get_current_tree(&params.user_id).await?)
            }
            "get_component_details" => {
                let params: ComponentParams = parse_args(args)?;
                to_payload(&self.service.get_component_details(&params.component_name)?)
            }
            "validate_tree" => {
                let params: ValidateTreeParams = parse_args(args)?;
                to_payload(&self.service.validate_tree(&params.tree))
            }
            "modify_ui" => {
                let request: ModifyRequest = parse_args(args)?;
                to_payload(&self.service.modify_ui(request).await?)
            }
            other => return Err(ToolError::Validation(format!("Unknown tool: {other}"))),
        };
        Ok(payload)
    }
}

fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::Validation(format!("invalid arguments: {e}")))
}

fn to_payload<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
