//! Tree patch engine
//!
//! A [`Patch`] pairs a parsed [`TreePath`] with one of four operations.
//! [`PatchEngine::apply`] runs it against a copy of the tree and returns the
//! new tree plus a one-line description of what changed. Every failure is
//! reported as a single [`PatchError`] tagged with the operation name.

use crate::path::{PathError, TreePath};
use crate::registry::ComponentRegistry;
use crate::resolve::{resolve_node_mut, resolve_parent_mut};
use crate::tree::{PropMap, UiTree};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use tracing::debug;

/// Kind of edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Insert a component fragment as a child
    Add,
    /// Delete a child
    Remove,
    /// Shallow-merge props into a node
    Update,
    /// Swap a node for a fragment
    Replace,
}

impl OperationKind {
    /// All kinds
    pub const ALL: [Self; 4] = [Self::Add, Self::Remove, Self::Update, Self::Replace];

    /// Lowercase name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Update => "update",
            Self::Replace => "replace",
        }
    }
}

impl Display for OperationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownOperation(s.to_string()))
    }
}

/// Operation name not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown operation: '{0}' (expected add, remove, update or replace)")]
pub struct UnknownOperation(pub String);

/// Operation with its payload
#[derive(Debug, Clone, PartialEq)]
pub enum PatchOperation {
    /// Insert fragment
    Add(UiTree),
    /// Delete the addressed child
    Remove,
    /// Merge props into the addressed node
    Update(PropMap),
    /// Replace the addressed node with fragment
    Replace(UiTree),
}

impl PatchOperation {
    /// Kind of this operation
    #[inline]
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Add(_) => OperationKind::Add,
            Self::Remove => OperationKind::Remove,
            Self::Update(_) => OperationKind::Update,
            Self::Replace(_) => OperationKind::Replace,
        }
    }
}

/// Path-addressed edit against a tree
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    /// Where to apply
    pub path: TreePath,
    /// What to do
    pub operation: PatchOperation,
}

impl Patch {
    /// Create patch
    #[inline]
    #[must_use]
    pub fn new(path: TreePath, operation: PatchOperation) -> Self {
        Self { path, operation }
    }

    /// Build a patch from loose request fields
    ///
    /// # Arguments
    /// * `kind` - Requested operation
    /// * `path` - Unparsed location expression
    /// * `component` - Fragment for add/replace
    /// * `props` - Prop map for update
    ///
    /// Payload fields not used by `kind` are ignored.
    ///
    /// # Errors
    /// - [`PatchFailure::Path`] if `path` does not parse
    /// - [`PatchFailure::MissingPayload`] if the payload `kind` needs is absent
    pub fn from_parts(
        kind: OperationKind,
        path: &str,
        component: Option<UiTree>,
        props: Option<PropMap>,
    ) -> Result<Self, PatchError> {
        let wrap = |failure| PatchError::new(kind, failure);

        let path: TreePath = path.parse().map_err(|e| wrap(PatchFailure::Path(e)))?;
        let missing = |field| wrap(PatchFailure::MissingPayload { field });

        let operation = match kind {
            OperationKind::Add => PatchOperation::Add(component.ok_or_else(|| missing("component"))?),
            OperationKind::Remove => PatchOperation::Remove,
            OperationKind::Update => PatchOperation::Update(props.ok_or_else(|| missing("props"))?),
            OperationKind::Replace => {
                PatchOperation::Replace(component.ok_or_else(|| missing("component"))?)
            }
        };

        Ok(Self::new(path, operation))
    }

    /// Kind of the operation
    #[inline]
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        self.operation.kind()
    }
}

/// Successful patch application
#[derive(Debug, Clone, PartialEq)]
pub struct PatchOutcome {
    /// Tree after the edit
    pub tree: UiTree,
    /// What changed, e.g. `Added TaskFilter to root children`
    pub description: String,
}

/// Applies patches using a component registry for fragment checks
#[derive(Debug, Clone, Copy)]
pub struct PatchEngine<'r> {
    registry: &'r ComponentRegistry,
}

impl<'r> PatchEngine<'r> {
    /// Create engine backed by `registry`
    #[inline]
    #[must_use]
    pub fn new(registry: &'r ComponentRegistry) -> Self {
        Self { registry }
    }

    /// Get the backing registry
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &'r ComponentRegistry {
        self.registry
    }

    /// Apply a patch to a copy of `tree`
    ///
    /// # Returns
    /// The edited copy and its description. `tree` itself is never touched.
    ///
    /// # Errors
    /// [`PatchError`] carrying the operation kind and the underlying
    /// [`PatchFailure`].
    pub fn apply(&self, tree: &UiTree, patch: &Patch) -> Result<PatchOutcome, PatchError> {
        let mut next = tree.clone();
        let description = self.apply_in_place(&mut next, patch)?;
        Ok(PatchOutcome {
            tree: next,
            description,
        })
    }

    /// Apply a patch directly to `tree`
    ///
    /// All checks run before the first write, so `tree` is unchanged when
    /// this returns an error.
    ///
    /// # Errors
    /// Same as [`PatchEngine::apply`].
    pub fn apply_in_place(&self, tree: &mut UiTree, patch: &Patch) -> Result<String, PatchError> {
        let kind = patch.kind();
        debug!(operation = %kind, path = %patch.path, "applying patch");

        let result = match &patch.operation {
            PatchOperation::Add(fragment) => self.add(tree, &patch.path, fragment),
            PatchOperation::Remove => remove(tree, &patch.path),
            PatchOperation::Update(props) => update(tree, &patch.path, props),
            PatchOperation::Replace(fragment) => self.replace(tree, &patch.path, fragment),
        };

        result.map_err(|failure| {
            debug!(operation = %kind, path = %patch.path, error = %failure, "patch rejected");
            PatchError::new(kind, failure)
        })
    }

    fn check_registered(&self, fragment: &UiTree) -> Result<(), PatchFailure> {
        if self.registry.has(&fragment.component) {
            Ok(())
        } else {
            Err(PatchFailure::UnknownComponent(fragment.component.clone()))
        }
    }

    fn add(&self, tree: &mut UiTree, path: &TreePath, fragment: &UiTree) -> Result<String, PatchFailure> {
        self.check_registered(fragment)?;

        if path.is_root() || path.is_root_children() {
            tree.children
                .get_or_insert_with(Vec::new)
                .push(fragment.clone());
            return Ok(format!("Added {} to root children", fragment.component));
        }

        let (parent, index) = resolve_parent_mut(tree, path)?;
        let children = parent.children.get_or_insert_with(Vec::new);
        let at = index.min(children.len());
        children.insert(at, fragment.clone());

        Ok(format!("Added {} at {path}", fragment.component))
    }

    fn replace(
        &self,
        tree: &mut UiTree,
        path: &TreePath,
        fragment: &UiTree,
    ) -> Result<String, PatchFailure> {
        self.check_registered(fragment)?;

        if path.is_root() {
            // Fields absent from the fragment keep their current value
            tree.component.clone_from(&fragment.component);
            if let Some(props) = &fragment.props {
                tree.props = Some(props.clone());
            }
            if let Some(children) = &fragment.children {
                tree.children = Some(children.clone());
            }
            return Ok(format!("Replaced root with {}", fragment.component));
        }

        let slot = child_at(tree, path)?;
        let old = std::mem::replace(slot, fragment.clone());

        Ok(format!(
            "Replaced {} with {} at {path}",
            old.component, fragment.component
        ))
    }
}

fn child_at<'t>(tree: &'t mut UiTree, path: &TreePath) -> Result<&'t mut UiTree, PatchFailure> {
    let (parent, index) = resolve_parent_mut(tree, path)?;
    parent
        .children
        .as_mut()
        .and_then(|children| children.get_mut(index))
        .ok_or_else(|| PatchFailure::NoChild(path.to_string()))
}

fn remove(tree: &mut UiTree, path: &TreePath) -> Result<String, PatchFailure> {
    let (parent, index) = resolve_parent_mut(tree, path)?;
    let children = parent
        .children
        .as_mut()
        .filter(|children| index < children.len())
        .ok_or_else(|| PatchFailure::NoChild(path.to_string()))?;
    let removed = children.remove(index);

    Ok(format!("Removed {} from {path}", removed.component))
}

fn update(tree: &mut UiTree, path: &TreePath, props: &PropMap) -> Result<String, PatchFailure> {
    let node = resolve_node_mut(tree, path)?;
    let existing = node.props.get_or_insert_with(PropMap::new);
    for (key, value) in props {
        existing.insert(key.clone(), value.clone());
    }

    let keys: Vec<&str> = props.keys().map(String::as_str).collect();
    Ok(format!("Updated {} props: {}", node.component, keys.join(", ")))
}

/// Failure of a patch, tagged with the operation that was attempted
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to apply {operation}: {failure}")]
pub struct PatchError {
    operation: OperationKind,
    #[source]
    failure: PatchFailure,
}

impl PatchError {
    /// Create error
    #[inline]
    #[must_use]
    pub fn new(operation: OperationKind, failure: PatchFailure) -> Self {
        Self { operation, failure }
    }

    /// Operation that failed
    #[inline]
    #[must_use]
    pub fn operation(&self) -> OperationKind {
        self.operation
    }

    /// Underlying failure
    #[inline]
    #[must_use]
    pub fn failure(&self) -> &PatchFailure {
        &self.failure
    }
}

/// Why a patch could not be applied
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatchFailure {
    /// Path failed to parse or resolve
    #[error(transparent)]
    Path(#[from] PathError),

    /// Fragment names an unregistered component
    #[error("unknown component: {0}")]
    UnknownComponent(String),

    /// Child slot does not exist
    #[error("no child at {0}")]
    NoChild(String),

    /// Required payload field absent
    #[error("{field} is required")]
    MissingPayload { field: &'static str },
}
