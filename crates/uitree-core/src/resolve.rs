//! Path resolution against a [`UiTree`]
//!
//! Two modes:
//! - [`resolve`]: exact resolution of any path to the addressed value, its
//!   parent container and the final key.
//! - [`resolve_parent_mut`]: for add/remove/replace, splits
//!   `<parent>.children[N]` and returns the parent node mutably plus `N`.

use crate::path::{PathError, PathSegment, TreePath, CHILDREN_FIELD, PROPS_FIELD};
use crate::tree::{PropMap, UiTree};
use serde_json::Value;

/// Value addressed by a path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target<'a> {
    /// A tree node
    Node(&'a UiTree),
    /// A node's child list
    Children(&'a [UiTree]),
    /// A node's prop map
    Props(&'a PropMap),
    /// A node's component name
    Component(&'a str),
    /// A value inside a prop map
    Value(&'a Value),
}

impl<'a> Target<'a> {
    /// The node, if this target is one
    #[inline]
    #[must_use]
    pub fn as_node(&self) -> Option<&'a UiTree> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Short name of the target kind, for error messages
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Node(_) => "node",
            Self::Children(_) => "child list",
            Self::Props(_) => "prop map",
            Self::Component(_) => "component name",
            Self::Value(Value::Object(_)) => "object",
            Self::Value(Value::Array(_)) => "array",
            Self::Value(_) => "scalar",
        }
    }

    /// Copy the target out as a JSON value
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Node(node) => node.to_value(),
            Self::Children(children) => {
                Value::Array(children.iter().map(UiTree::to_value).collect())
            }
            Self::Props(props) => Value::Object((*props).clone()),
            Self::Component(name) => Value::String((*name).to_string()),
            Self::Value(value) => (*value).clone(),
        }
    }
}

/// Result of exact resolution
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<'a> {
    /// The addressed value
    pub target: Target<'a>,
    /// Container the target was reached from (`None` for the root)
    pub parent: Option<Target<'a>>,
    /// Final segment used to reach the target (`None` for the root)
    pub key: Option<PathSegment>,
}

/// Why a single step failed
enum StepFailure {
    Missing,
    OutOfRange(usize),
    NotTraversable(&'static str),
}

fn step<'a>(current: Target<'a>, segment: &PathSegment) -> Result<Target<'a>, StepFailure> {
    match (current, segment) {
        (Target::Node(node), PathSegment::Field(name)) => match name.as_str() {
            "component" => Ok(Target::Component(&node.component)),
            PROPS_FIELD => node.props.as_ref().map(Target::Props).ok_or(StepFailure::Missing),
            CHILDREN_FIELD => node
                .children
                .as_deref()
                .map(Target::Children)
                .ok_or(StepFailure::Missing),
            _ => Err(StepFailure::Missing),
        },
        (Target::Children(children), PathSegment::Index(index)) => children
            .get(*index)
            .map(Target::Node)
            .ok_or(StepFailure::OutOfRange(children.len())),
        (Target::Props(props), PathSegment::Field(name)) => {
            props.get(name).map(Target::Value).ok_or(StepFailure::Missing)
        }
        (Target::Value(Value::Object(map)), PathSegment::Field(name)) => {
            map.get(name).map(Target::Value).ok_or(StepFailure::Missing)
        }
        (Target::Value(Value::Array(items)), PathSegment::Index(index)) => items
            .get(*index)
            .map(Target::Value)
            .ok_or(StepFailure::OutOfRange(items.len())),
        (other, _) => Err(StepFailure::NotTraversable(other.kind())),
    }
}

/// Resolve a path to the value it addresses
///
/// # Errors
/// Returns a [`PathError`] naming the first segment that is missing, out of
/// range, or not reachable from the value before it.
pub fn resolve<'a>(tree: &'a UiTree, path: &TreePath) -> Result<Resolved<'a>, PathError> {
    let mut current = Target::Node(tree);
    let mut parent = None;

    for segment in path.iter() {
        let next = step(current, segment).map_err(|failure| match failure {
            StepFailure::Missing => PathError::Missing {
                path: path.to_string(),
                segment: segment.to_string(),
            },
            StepFailure::OutOfRange(len) => PathError::OutOfRange {
                path: path.to_string(),
                index: match segment {
                    PathSegment::Index(index) => *index,
                    PathSegment::Field(_) => 0,
                },
                len,
            },
            StepFailure::NotTraversable(found) => PathError::NotTraversable {
                path: path.to_string(),
                segment: segment.to_string(),
                found,
            },
        })?;
        parent = Some(current);
        current = next;
    }

    Ok(Resolved {
        target: current,
        parent,
        key: path.last().cloned(),
    })
}

/// Resolve a path that must address a tree node, returning it mutably
///
/// # Errors
/// - resolution errors from [`resolve`]
/// - [`PathError::NotANode`] if the path resolves to something else
pub fn resolve_node_mut<'a>(
    tree: &'a mut UiTree,
    path: &TreePath,
) -> Result<&'a mut UiTree, PathError> {
    match resolve(tree, path)?.target {
        Target::Node(_) => {}
        other => {
            return Err(PathError::NotANode {
                path: path.to_string(),
                found: other.kind(),
            })
        }
    }

    // A path that resolved to a node is a chain of `children[N]` pairs
    let mut current = tree;
    for index in path.indices() {
        current = current
            .children
            .as_mut()
            .and_then(|children| children.get_mut(index))
            .ok_or_else(|| PathError::NotANode {
                path: path.to_string(),
                found: "nothing",
            })?;
    }
    Ok(current)
}

/// Resolve the parent node and child index of a `<parent>.children[N]` path
///
/// The index is not checked against the child list; add accepts any index
/// while remove and replace check it themselves.
///
/// # Errors
/// - [`PathError::NotAChildSlot`] if the path does not end in `children[N]`
/// - [`PathError::InvalidParent`] if the prefix is not a tree node
/// - resolution errors for the prefix
pub fn resolve_parent_mut<'a>(
    tree: &'a mut UiTree,
    path: &TreePath,
) -> Result<(&'a mut UiTree, usize), PathError> {
    let (parent_path, index) = path
        .child_slot()
        .ok_or_else(|| PathError::NotAChildSlot(path.to_string()))?;

    let parent = resolve_node_mut(tree, &parent_path).map_err(|e| match e {
        PathError::NotANode { .. } => PathError::InvalidParent(parent_path.to_string()),
        other => other,
    })?;

    Ok((parent, index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> UiTree {
        serde_json::from_value(json!({
            "component": "TodoApp",
            "props": {"title": "Mine"},
            "children": [
                {"component": "TaskInput"},
                {
                    "component": "TaskList",
                    "props": {"filter": "all", "tags": ["a", "b"]},
                    "children": [{"component": "TaskItem"}]
                }
            ]
        }))
        .unwrap()
    }

    fn path(raw: &str) -> TreePath {
        raw.parse().unwrap()
    }

    #[test]
    fn resolve_root() {
        let tree = sample();
        let resolved = resolve(&tree, &TreePath::root()).unwrap();
        assert_eq!(resolved.target.as_node().unwrap().component, "TodoApp");
        assert!(resolved.parent.is_none());
        assert!(resolved.key.is_none());
    }

    #[test]
    fn resolve_nested_node() {
        let tree = sample();
        let resolved = resolve(&tree, &path("$.children[1].children[0]")).unwrap();
        assert_eq!(resolved.target.as_node().unwrap().component, "TaskItem");
        assert!(matches!(resolved.parent, Some(Target::Children(c)) if c.len() == 1));
        assert_eq!(resolved.key, Some(PathSegment::Index(0)));
    }

    #[test]
    fn resolve_into_props() {
        let tree = sample();
        let resolved = resolve(&tree, &path("$.children[1].props.tags[1]")).unwrap();
        assert_eq!(resolved.target.to_value(), json!("b"));

        let props = resolve(&tree, &path("$.children[1].props")).unwrap();
        assert_eq!(props.target.kind(), "prop map");
    }

    #[test]
    fn resolve_component_name() {
        let tree = sample();
        let resolved = resolve(&tree, &path("$.children[0].component")).unwrap();
        assert_eq!(resolved.target, Target::Component("TaskInput"));
    }

    #[test]
    fn resolve_missing_field() {
        let tree = sample();
        let err = resolve(&tree, &path("$.children[0].props")).unwrap_err();
        assert!(matches!(err, PathError::Missing { segment, .. } if segment == "props"));
    }

    #[test]
    fn resolve_out_of_range() {
        let tree = sample();
        let err = resolve(&tree, &path("$.children[5]")).unwrap_err();
        assert!(matches!(err, PathError::OutOfRange { index: 5, len: 2, .. }));
    }

    #[test]
    fn resolve_not_traversable() {
        let tree = sample();
        let err = resolve(&tree, &path("$.props.title.deeper")).unwrap_err();
        assert!(matches!(err, PathError::NotTraversable { found: "scalar", .. }));
    }

    #[test]
    fn node_mut_rejects_props_target() {
        let mut tree = sample();
        let err = resolve_node_mut(&mut tree, &path("$.props")).unwrap_err();
        assert!(matches!(err, PathError::NotANode { found: "prop map", .. }));
    }

    #[test]
    fn node_mut_walks_children() {
        let mut tree = sample();
        let node = resolve_node_mut(&mut tree, &path("$.children[1].children[0]")).unwrap();
        node.component = "Changed".to_string();
        assert_eq!(tree.children()[1].children()[0].component, "Changed");
    }

    #[test]
    fn parent_of_root_child() {
        let mut tree = sample();
        let (parent, index) = resolve_parent_mut(&mut tree, &path("$.children[7]")).unwrap();
        assert_eq!(parent.component, "TodoApp");
        assert_eq!(index, 7);
    }

    #[test]
    fn parent_requires_child_slot() {
        let mut tree = sample();
        let err = resolve_parent_mut(&mut tree, &path("$.props")).unwrap_err();
        assert_eq!(err, PathError::NotAChildSlot("$.props".to_string()));
    }

    #[test]
    fn parent_must_be_node() {
        let mut tree = sample();
        let err = resolve_parent_mut(&mut tree, &path("$.props.children[0]")).unwrap_err();
        assert_eq!(err, PathError::InvalidParent("$.props".to_string()));
    }
}
