//! UI Tree Tools
//!
//! Agent-facing tool operations over the tree engine and the state store.
//!
//! # Overview
//!
//! - **UiToolService**: `get_current_tree`, `get_component_details`,
//!   `validate_tree`, `modify_ui` plus state, history and reset operations
//! - **McpServer**: JSON-RPC 2.0 dispatcher exposing the tools over MCP
//! - **ServiceConfig**: TOML and environment configuration
//! - **ToolError**: not-found / validation / version-conflict taxonomy
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use uitree_core::OperationKind;
//! use uitree_store::{MemoryStateStore, StateStore};
//! use uitree_tools::{ModifyRequest, ServiceConfig, UiToolService};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let store = Arc::new(MemoryStateStore::new());
//! store.initialize("alice").await.unwrap();
//!
//! let service = UiToolService::with_default_registry(store, ServiceConfig::new());
//! let result = service
//!     .modify_ui(ModifyRequest::new("alice", OperationKind::Remove, "$.children[0]"))
//!     .await
//!     .unwrap();
//!
//! assert_eq!(result.version, 2);
//! assert_eq!(result.description, "Removed TaskInput from $.children[0]");
//! # });
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod rpc;
pub mod service;
pub mod types;

// Re-exports
pub use config::{ConfigError, ServiceConfig};
pub use error::{codes, ErrorKind, ToolError};
pub use rpc::{ui_changed_notification, JsonRpcRequest, McpServer};
pub use service::UiToolService;
pub use types::{
    ComponentParams, HistoryResponse, ModifyRequest, ModifyResult, UiChanged, UpdateStateRequest,
    UserParams, ValidateTreeParams,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
