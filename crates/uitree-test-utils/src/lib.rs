//! Testing utilities for the uitree workspace
//!
//! Shared tree fixtures and pre-seeded stores.

#![allow(missing_docs)]

use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use uitree_core::{PropMap, UiTree};
use uitree_store::{FileStateStore, MemoryStateStore, StateStore};

pub fn tree(value: Value) -> UiTree {
    serde_json::from_value(value).unwrap()
}

pub fn props(value: Value) -> PropMap {
    serde_json::from_value(value).unwrap()
}

/// `TodoApp` with `TaskInput` and an empty `TaskList`
pub fn todo_tree() -> UiTree {
    UiTree::new("TodoApp").with_children(vec![
        UiTree::new("TaskInput"),
        UiTree::new("TaskList").with_children(vec![]),
    ])
}

pub fn empty_root() -> UiTree {
    UiTree::new("TodoApp").with_children(vec![])
}

pub async fn memory_store(subjects: &[&str]) -> Arc<MemoryStateStore> {
    let store = MemoryStateStore::new();
    for subject in subjects {
        store.initialize(subject).await.unwrap();
    }
    Arc::new(store)
}

/// Put `subject` at `version` with `tree` by saving repeatedly
pub async fn advance_to(store: &dyn StateStore, subject: &str, version: u64, tree: &UiTree) {
    let mut state = store.initialize(subject).await.unwrap();
    while state.version < version {
        state = store.save(subject, state.version, tree.clone()).await.unwrap();
    }
}

/// File store in a fresh temp dir; keep the `TempDir` alive for the test
pub fn temp_file_store() -> (TempDir, FileStateStore) {
    let dir = TempDir::new().unwrap();
    let store = FileStateStore::new(dir.path());
    (dir, store)
}
