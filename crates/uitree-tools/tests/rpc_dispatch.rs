use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uitree_test_utils::memory_store;
use uitree_tools::{codes, McpServer, ServiceConfig, UiToolService};

async fn server() -> McpServer {
    let store = memory_store(&["alice"]).await;
    McpServer::new(UiToolService::with_default_registry(store, ServiceConfig::new()))
}

async fn call(server: &McpServer, request: Value) -> Value {
    server
        .handle_line(&request.to_string())
        .await
        .expect("request with id must be answered")
}

fn tool_payload(response: &Value) -> Value {
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    serde_json::from_str(text).unwrap()
}

#[tokio::test]
async fn initialize_reports_protocol_and_capabilities() {
    let server = server().await;
    let response = call(&server, json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"})).await;

    assert_eq!(response["id"], 1);
    assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(response["result"]["serverInfo"]["name"], "uitree-mcp");
    assert_eq!(
        response["result"]["capabilities"],
        json!({"tools": {}, "resources": {}})
    );
}

#[tokio::test]
async fn malformed_input() {
    let server = server().await;

    let response = server.handle_line("{not json").await.unwrap();
    assert_eq!(response["error"]["code"], codes::PARSE_ERROR);
    assert_eq!(response["id"], Value::Null);

    let response = server.handle_line("[1, 2]").await.unwrap();
    assert_eq!(response["error"]["code"], codes::INVALID_REQUEST);

    let response = server.handle_line(r#"{"jsonrpc": "2.0", "id": 7}"#).await.unwrap();
    assert_eq!(response["error"]["code"], codes::INVALID_REQUEST);
    assert_eq!(response["id"], 7);
}

#[tokio::test]
async fn unknown_method_and_notifications() {
    let server = server().await;

    let response = call(&server, json!({"jsonrpc": "2.0", "id": "a", "method": "prompts/list"})).await;
    assert_eq!(response["error"]["code"], codes::METHOD_NOT_FOUND);
    assert_eq!(response["error"]["message"], "Method not found: prompts/list");

    let silent = server
        .handle_line(r#"{"jsonrpc": "2.0", "method": "notifications/initialized"}"#)
        .await;
    assert!(silent.is_none());
}

#[tokio::test]
async fn tools_list_has_four_tools() {
    let server = server().await;
    let response = call(&server, json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"})).await;
    assert_eq!(response["result"]["tools"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn tools_call_wraps_payload_as_text() {
    let server = server().await;
    let response = call(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/call",
            "params": {"name": "get_current_tree", "arguments": {"userId": "alice"}}
        }),
    )
    .await;

    assert_eq!(response["result"]["content"][0]["type"], "text");
    let tree = tool_payload(&response);
    assert_eq!(tree["component"], "TodoApp");
    assert_eq!(tree["children"][0]["component"], "TaskInput");
}

#[tokio::test]
async fn modify_ui_through_rpc() {
    let server = server().await;
    let response = call(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 4,
            "method": "tools/call",
            "params": {
                "name": "modify_ui",
                "arguments": {
                    "userId": "alice",
                    "operation": "add",
                    "path": "$.children[1].children[0]",
                    "component": {"component": "TaskItem", "props": {"showPriority": true}}
                }
            }
        }),
    )
    .await;

    let result = tool_payload(&response);
    assert_eq!(result["success"], true);
    assert_eq!(result["version"], 2);
    assert_eq!(result["description"], "Added TaskItem at $.children[1].children[0]");
    assert_eq!(
        result["newTree"]["children"][1]["children"][0]["component"],
        "TaskItem"
    );
}

#[tokio::test]
async fn tool_errors_map_to_codes() {
    let server = server().await;

    let not_found = call(
        &server,
        json!({
            "jsonrpc": "2.0", "id": 5, "method": "tools/call",
            "params": {"name": "get_current_tree", "arguments": {"userId": "ghost"}}
        }),
    )
    .await;
    assert_eq!(not_found["error"]["code"], codes::NOT_FOUND);
    assert_eq!(
        not_found["error"]["data"]["suggestion"],
        "Check that the user exists and the ID is correct"
    );

    let conflict = call(
        &server,
        json!({
            "jsonrpc": "2.0", "id": 6, "method": "tools/call",
            "params": {"name": "modify_ui", "arguments": {
                "userId": "alice", "operation": "remove", "path": "$.children[0]",
                "expectedVersion": 9
            }}
        }),
    )
    .await;
    assert_eq!(conflict["error"]["code"], codes::VERSION_CONFLICT);
    assert_eq!(conflict["error"]["message"], "Version conflict: expected 9, got 1");

    let bad_patch = call(
        &server,
        json!({
            "jsonrpc": "2.0", "id": 7, "method": "tools/call",
            "params": {"name": "modify_ui", "arguments": {
                "userId": "alice", "operation": "add", "path": "$"
            }}
        }),
    )
    .await;
    assert_eq!(bad_patch["error"]["code"], codes::INVALID_PARAMS);

    let unknown_tool = call(
        &server,
        json!({
            "jsonrpc": "2.0", "id": 8, "method": "tools/call",
            "params": {"name": "delete_everything", "arguments": {}}
        }),
    )
    .await;
    assert_eq!(unknown_tool["error"]["code"], codes::INVALID_PARAMS);
    assert_eq!(unknown_tool["error"]["message"], "Unknown tool: delete_everything");
}

#[tokio::test]
async fn validate_tree_returns_report_not_error() {
    let server = server().await;
    let response = call(
        &server,
        json!({
            "jsonrpc": "2.0", "id": 9, "method": "tools/call",
            "params": {"name": "validate_tree", "arguments": {
                "tree": {"component": "Text", "children": [{"component": "Badge"}]}
            }}
        }),
    )
    .await;

    let report = tool_payload(&response);
    assert_eq!(report["valid"], false);
    assert_eq!(report["errors"][0]["path"], "$.children");
}

#[tokio::test]
async fn registry_resource() {
    let server = server().await;

    let listed = call(&server, json!({"jsonrpc": "2.0", "id": 10, "method": "resources/list"})).await;
    assert_eq!(listed["result"]["resources"][0]["uri"], "components://registry");

    let read = call(
        &server,
        json!({
            "jsonrpc": "2.0", "id": 11, "method": "resources/read",
            "params": {"uri": "components://registry"}
        }),
    )
    .await;
    let content = &read["result"]["contents"][0];
    assert_eq!(content["mimeType"], "application/json");
    let body: Value = serde_json::from_str(content["text"].as_str().unwrap()).unwrap();
    assert_eq!(body["components"].as_array().unwrap().len(), 17);

    let unknown = call(
        &server,
        json!({
            "jsonrpc": "2.0", "id": 12, "method": "resources/read",
            "params": {"uri": "components://nothing"}
        }),
    )
    .await;
    assert_eq!(unknown["error"]["code"], codes::INVALID_PARAMS);
}
