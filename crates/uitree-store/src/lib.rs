//! UI Tree State Store
//!
//! Versioned, per-subject persistence of UI trees.
//!
//! # Overview
//!
//! - **UiState**: `(version, userId, tree, lastModified)` record
//! - **StateStore**: async trait with optimistic-concurrency `save`
//! - **MemoryStateStore**: `DashMap`-backed store for tests and embedding
//! - **FileStateStore**: JSON files under `<root>/users/<subject>/`
//! - **ChangeLog**: per-subject modification history, newest first
//!
//! # Example
//!
//! ```rust
//! use uitree_store::{MemoryStateStore, StateStore, StoreError};
//! use uitree_core::UiTree;
//!
//! # tokio_test_block_on(async {
//! let store = MemoryStateStore::new();
//! let state = store.initialize("alice").await?;
//! assert_eq!(state.version, 1);
//!
//! let saved = store.save("alice", 1, UiTree::new("Container")).await?;
//! assert_eq!(saved.version, 2);
//!
//! // A second writer still holding version 1 loses
//! let err = store.save("alice", 1, UiTree::new("Card")).await.unwrap_err();
//! assert!(err.is_conflict());
//! # Ok::<(), StoreError>(())
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f)
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod file;
pub mod memory;
pub mod state;
pub mod store;

// Re-exports
pub use error::{check_subject, StoreError};
pub use file::FileStateStore;
pub use memory::MemoryStateStore;
pub use state::{default_tree, ChangeLog, UiState, DEFAULT_TRIGGER, INITIAL_VERSION};
pub use store::{StateStore, DEFAULT_MAX_HISTORY};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
