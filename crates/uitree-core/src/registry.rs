//! Component schema registry
//!
//! Provides [`ComponentRegistry`], the catalog of renderable component types
//! and their prop schemas. Built once, then shared read-only.

use crate::tree::UiTree;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Grouping category of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentCategory {
    /// Containers and separators
    Layout,
    /// Form controls
    Input,
    /// Read-only display
    Display,
    /// Todo-specific widgets
    Todo,
}

impl ComponentCategory {
    /// All categories in catalog order
    pub const ALL: [Self; 4] = [Self::Layout, Self::Input, Self::Display, Self::Todo];

    /// Lowercase name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Layout => "layout",
            Self::Input => "input",
            Self::Display => "display",
            Self::Todo => "todo",
        }
    }
}

impl Display for ComponentCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentCategory {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| RegistryError::UnknownCategory(s.to_string()))
    }
}

/// Declared prop of a component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropDefinition {
    /// Prop name
    pub name: String,
    /// Free-text type description, e.g. `'row' | 'column'`
    #[serde(rename = "type")]
    pub ty: String,
    /// Whether the prop is required at render time
    pub required: bool,
    /// What the prop does
    pub description: String,
    /// Default if not provided
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

impl PropDefinition {
    /// Create an optional prop with no default
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, ty: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            required: false,
            description: description.into(),
            default_value: None,
        }
    }

    /// Mark as required
    #[inline]
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set default value
    #[inline]
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// Sample tree for a component (documentation only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentExample {
    /// What the example shows
    pub description: String,
    /// The sample tree
    pub tree: UiTree,
}

/// Component entry without examples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSummary {
    /// Component identifier (PascalCase)
    pub name: String,
    /// What the component does
    pub description: String,
    /// Grouping category
    pub category: ComponentCategory,
    /// Declared props in display order
    pub props: Vec<PropDefinition>,
    /// Whether the component accepts children
    pub can_have_children: bool,
}

/// Full registry entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDetails {
    /// Component identifier (PascalCase)
    pub name: String,
    /// What the component does
    pub description: String,
    /// Grouping category
    pub category: ComponentCategory,
    /// Whether the component accepts children
    pub can_have_children: bool,
    /// Declared props in display order
    pub props: Vec<PropDefinition>,
    /// Sample trees
    #[serde(default)]
    pub examples: Vec<ComponentExample>,
}

impl ComponentDetails {
    /// Create an entry with no props and no examples
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category: ComponentCategory,
        can_have_children: bool,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            category,
            can_have_children,
            props: Vec::new(),
            examples: Vec::new(),
        }
    }

    /// Set declared props
    #[inline]
    #[must_use]
    pub fn with_props(mut self, props: Vec<PropDefinition>) -> Self {
        self.props = props;
        self
    }

    /// Add an example
    #[inline]
    #[must_use]
    pub fn with_example(mut self, description: impl Into<String>, tree: UiTree) -> Self {
        self.examples.push(ComponentExample {
            description: description.into(),
            tree,
        });
        self
    }

    /// Check whether a prop name is declared
    #[inline]
    #[must_use]
    pub fn has_prop(&self, name: &str) -> bool {
        self.props.iter().any(|p| p.name == name)
    }

    /// Declared prop names in order
    #[must_use]
    pub fn prop_names(&self) -> Vec<&str> {
        self.props.iter().map(|p| p.name.as_str()).collect()
    }

    /// Strip examples
    #[must_use]
    pub fn summary(&self) -> ComponentSummary {
        ComponentSummary {
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category,
            props: self.props.clone(),
            can_have_children: self.can_have_children,
        }
    }
}

/// Catalog of known component types
///
/// Lookup is O(1) by name; iteration follows registration order.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    components: IndexMap<String, ComponentDetails>,
}

impl ComponentRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            components: IndexMap::new(),
        }
    }

    /// Create registry with the built-in todo catalog
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for details in crate::catalog::default_components() {
            registry.register(details);
        }
        registry
    }

    /// Register a component, overwriting any entry with the same name
    pub fn register(&mut self, details: ComponentDetails) {
        self.components.insert(details.name.clone(), details);
    }

    /// Check if component exists
    #[inline]
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Get component details including examples
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ComponentDetails> {
        self.components.get(name)
    }

    /// All components without examples, in registration order
    #[must_use]
    pub fn all(&self) -> Vec<ComponentSummary> {
        self.components.values().map(ComponentDetails::summary).collect()
    }

    /// Components in one category
    #[must_use]
    pub fn by_category(&self, category: ComponentCategory) -> Vec<ComponentSummary> {
        self.components
            .values()
            .filter(|c| c.category == category)
            .map(ComponentDetails::summary)
            .collect()
    }

    /// Check if `child` may be placed under `parent`
    ///
    /// Both must be registered and `parent` must accept children.
    #[must_use]
    pub fn can_be_child_of(&self, child: &str, parent: &str) -> bool {
        self.has(child) && self.get(parent).is_some_and(|p| p.can_have_children)
    }

    /// Registered component names
    #[inline]
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.components.keys().map(String::as_str).collect()
    }

    /// Get number of registered components
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Registry lookup errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Category name not recognised
    #[error("unknown category: '{0}' (expected layout, input, display or todo)")]
    UnknownCategory(String),
}
