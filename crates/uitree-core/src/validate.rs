//! Structural validation of UI trees against the registry
//!
//! Trees are checked as raw JSON so that malformed input (missing
//! `component`, props given as an array) is reported instead of failing to
//! deserialize. Results are data: an invalid tree yields a report, never an
//! error.

use crate::path::{CHILDREN_FIELD, PROPS_FIELD};
use crate::registry::{ComponentDetails, ComponentRegistry};
use crate::tree::UiTree;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Suggestion attached to unknown-component issues
pub const UNKNOWN_COMPONENT_HINT: &str = "Check available components using get_component_details";

/// Suggestion attached to disallowed-children issues
pub const CONTAINER_HINT: &str = "Remove children or use a container component";

/// One problem found in a tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    /// Location of the problem, e.g. `$.children[1].props.foo`
    pub path: String,
    /// What is wrong
    pub message: String,
    /// How to fix it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Outcome of validating a tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// `true` iff `errors` is empty
    pub valid: bool,
    /// Issues in traversal order
    pub errors: Vec<ValidationIssue>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<ValidationIssue>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Messages joined with `; `, for one-line error reporting
    #[must_use]
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{} ({})", e.message, e.path))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Validates trees against a component registry
#[derive(Debug, Clone, Copy)]
pub struct TreeValidator<'r> {
    registry: &'r ComponentRegistry,
}

impl<'r> TreeValidator<'r> {
    /// Create validator backed by `registry`
    #[inline]
    #[must_use]
    pub fn new(registry: &'r ComponentRegistry) -> Self {
        Self { registry }
    }

    /// Validate a raw JSON tree
    ///
    /// Unknown components anywhere in the tree are reported first, followed
    /// by depth-first structural issues. The whole tree is always walked.
    #[must_use]
    pub fn validate(&self, tree: &Value) -> ValidationReport {
        let mut errors = Vec::new();
        self.scan_unknown(tree, "$", &mut errors);
        self.check_node(tree, "$", &mut errors);
        ValidationReport::from_errors(errors)
    }

    /// Validate a typed tree
    #[must_use]
    pub fn validate_tree(&self, tree: &UiTree) -> ValidationReport {
        self.validate(&tree.to_value())
    }

    fn scan_unknown(&self, node: &Value, path: &str, errors: &mut Vec<ValidationIssue>) {
        if let Some(Value::String(name)) = node.get("component") {
            if !self.registry.has(name) {
                errors.push(
                    ValidationIssue::new(path, format!("Unknown component \"{name}\" at {path}"))
                        .with_suggestion(UNKNOWN_COMPONENT_HINT),
                );
            }
        }

        if let Some(Value::Array(children)) = node.get(CHILDREN_FIELD) {
            for (i, child) in children.iter().enumerate() {
                self.scan_unknown(child, &format!("{path}.children[{i}]"), errors);
            }
        }
    }

    fn check_node(&self, node: &Value, path: &str, errors: &mut Vec<ValidationIssue>) {
        let Some(Value::String(name)) = node.get("component") else {
            errors.push(ValidationIssue::new(
                path,
                "Node must have a \"component\" string property",
            ));
            return;
        };

        // Unknown components were reported by the scan
        let Some(details) = self.registry.get(name) else {
            return;
        };

        match node.get(PROPS_FIELD) {
            None | Some(Value::Null) => {}
            Some(Value::Object(props)) => {
                check_props(details, props, path, errors);
            }
            Some(_) => errors.push(ValidationIssue::new(
                format!("{path}.props"),
                "Props must be an object",
            )),
        }

        match node.get(CHILDREN_FIELD) {
            None | Some(Value::Null) => {}
            Some(Value::Array(children)) => {
                if !details.can_have_children && !children.is_empty() {
                    errors.push(
                        ValidationIssue::new(
                            format!("{path}.children"),
                            format!("Component {name} cannot have children"),
                        )
                        .with_suggestion(CONTAINER_HINT),
                    );
                } else {
                    for (i, child) in children.iter().enumerate() {
                        self.check_node(child, &format!("{path}.children[{i}]"), errors);
                    }
                }
            }
            Some(_) => errors.push(ValidationIssue::new(
                format!("{path}.children"),
                "Children must be an array",
            )),
        }
    }
}

fn check_props(
    details: &ComponentDetails,
    props: &Map<String, Value>,
    path: &str,
    errors: &mut Vec<ValidationIssue>,
) {
    // Missing required props are allowed; they may be bound at render time
    for key in props.keys().filter(|k| !details.has_prop(k)) {
        errors.push(
            ValidationIssue::new(
                format!("{path}.props.{key}"),
                format!("Unknown prop \"{key}\" for component {}", details.name),
            )
            .with_suggestion(format!("Valid props: {}", details.prop_names().join(", "))),
        );
    }
}
