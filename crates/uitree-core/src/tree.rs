//! UI tree nodes
//!
//! Provides [`UiTree`], the recursive description of which components to
//! render and with which props.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Prop bag of a node
///
/// Values stay dynamically typed JSON; names are checked against the
/// registry at validation time.
pub type PropMap = Map<String, Value>;

/// A node in the UI component tree
///
/// `children: None` (absent) is distinct from `Some(vec![])` (empty). Only
/// components registered with `can_have_children` may hold a non-empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiTree {
    /// Component name from the registry
    pub component: String,

    /// Props passed to the component
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<PropMap>,

    /// Nested child components
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<UiTree>>,
}

impl UiTree {
    /// Create a bare node with no props and no children
    #[inline]
    #[must_use]
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            props: None,
            children: None,
        }
    }

    /// Set props
    #[inline]
    #[must_use]
    pub fn with_props(mut self, props: PropMap) -> Self {
        self.props = Some(props);
        self
    }

    /// Set a single prop, creating the map if absent
    #[inline]
    #[must_use]
    pub fn with_prop(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props
            .get_or_insert_with(PropMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Set children
    #[inline]
    #[must_use]
    pub fn with_children(mut self, children: Vec<UiTree>) -> Self {
        self.children = Some(children);
        self
    }

    /// Children as a slice (empty when absent)
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[UiTree] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Look up a prop value
    #[inline]
    #[must_use]
    pub fn prop(&self, name: &str) -> Option<&Value> {
        self.props.as_ref().and_then(|p| p.get(name))
    }

    /// Total number of nodes in this subtree, including self
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(UiTree::node_count).sum::<usize>()
    }

    /// Convert to a raw JSON value
    #[must_use]
    pub fn to_value(&self) -> Value {
        // UiTree only holds strings, maps and JSON values, so this cannot fail
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_fields_are_omitted() {
        let node = UiTree::new("TaskInput");
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value, json!({"component": "TaskInput"}));
    }

    #[test]
    fn empty_children_survive_roundtrip() {
        let node: UiTree = serde_json::from_value(json!({
            "component": "TaskList",
            "children": []
        }))
        .unwrap();
        assert_eq!(node.children, Some(vec![]));
        assert_eq!(node.to_value()["children"], json!([]));
    }

    #[test]
    fn builder_helpers() {
        let node = UiTree::new("TodoApp")
            .with_prop("title", "Mine")
            .with_children(vec![UiTree::new("TaskInput"), UiTree::new("TaskList")]);

        assert_eq!(node.prop("title"), Some(&json!("Mine")));
        assert_eq!(node.children().len(), 2);
        assert_eq!(node.node_count(), 3);
    }

    #[test]
    fn children_slice_defaults_to_empty() {
        assert!(UiTree::new("Divider").children().is_empty());
    }
}
