//! UI Tree Core
//!
//! Pure, synchronous building blocks for editing component trees.
//!
//! # Overview
//!
//! - **UiTree**: recursive component description (`component`, `props`, `children`)
//! - **TreePath**: parsed `$.children[N].props.name` location expressions
//! - **ComponentRegistry**: catalog of component types and their prop schemas
//! - **PatchEngine**: add / remove / update / replace against a copy of a tree
//! - **TreeValidator**: structural checks producing a [`ValidationReport`]
//!
//! # Example
//!
//! ```rust
//! use uitree_core::{ComponentRegistry, OperationKind, Patch, PatchEngine, UiTree};
//!
//! let registry = ComponentRegistry::with_defaults();
//! let engine = PatchEngine::new(&registry);
//!
//! let tree = UiTree::new("TodoApp").with_children(vec![]);
//! let patch = Patch::from_parts(OperationKind::Add, "$", Some(UiTree::new("TaskInput")), None).unwrap();
//!
//! let outcome = engine.apply(&tree, &patch).unwrap();
//! assert_eq!(outcome.description, "Added TaskInput to root children");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod catalog;
pub mod patch;
pub mod path;
pub mod registry;
pub mod resolve;
pub mod tree;
pub mod validate;

// Re-exports
pub use patch::{
    OperationKind, Patch, PatchEngine, PatchError, PatchFailure, PatchOperation, PatchOutcome,
    UnknownOperation,
};
pub use path::{PathError, PathSegment, TreePath};
pub use registry::{
    ComponentCategory, ComponentDetails, ComponentExample, ComponentRegistry, ComponentSummary,
    PropDefinition, RegistryError,
};
pub use resolve::{resolve, resolve_node_mut, resolve_parent_mut, Resolved, Target};
pub use tree::{PropMap, UiTree};
pub use validate::{TreeValidator, ValidationIssue, ValidationReport};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for tree editing
    pub use crate::{
        ComponentRegistry, OperationKind, Patch, PatchEngine, PatchError, PropMap, TreePath,
        TreeValidator, UiTree, ValidationReport,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
