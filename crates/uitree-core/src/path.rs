//! Tree paths for addressing nodes and values inside a UI tree
//!
//! Provides [`TreePath`], the parsed form of expressions such as
//! `$.children[1].props.title`. Paths are parsed once per request so that
//! resolution errors can point at the exact failing segment.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Field name that holds a node's child list
pub const CHILDREN_FIELD: &str = "children";

/// Field name that holds a node's props
pub const PROPS_FIELD: &str = "props";

/// One step of a [`TreePath`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// `.name` selector
    Field(String),
    /// `[N]` index, 0-based
    Index(usize),
}

impl PathSegment {
    /// Check whether this is the `children` field selector
    #[inline]
    #[must_use]
    pub fn is_children(&self) -> bool {
        matches!(self, Self::Field(name) if name == CHILDREN_FIELD)
    }
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Location expression anchored at the tree root (`$`)
///
/// # Examples
/// - `$` → root node
/// - `$.children[0]` → first child of the root
/// - `$.children[1].props.title` → the `title` prop of the second child
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TreePath(Vec<PathSegment>);

impl TreePath {
    /// Create path from segments
    #[inline]
    #[must_use]
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }

    /// The root path `$`
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Get number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if path is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check if path addresses the root node
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Check if path is exactly `$.children`
    #[inline]
    #[must_use]
    pub fn is_root_children(&self) -> bool {
        self.0.len() == 1 && self.0[0].is_children()
    }

    /// Get last segment (if not root)
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&PathSegment> {
        self.0.last()
    }

    /// Path of the `index`-th child of the node at this path
    #[inline]
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut new = self.clone();
        new.0.push(PathSegment::Field(CHILDREN_FIELD.to_string()));
        new.0.push(PathSegment::Index(index));
        new
    }

    /// Append a field selector, returning new path
    #[inline]
    #[must_use]
    pub fn field(&self, name: impl Into<String>) -> Self {
        let mut new = self.clone();
        new.0.push(PathSegment::Field(name.into()));
        new
    }

    /// Append an index, returning new path
    #[inline]
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut new = self.clone();
        new.0.push(PathSegment::Index(index));
        new
    }

    /// Split a `<parent>.children[N]` path into the parent path and `N`
    ///
    /// Returns `None` unless the final two segments are `children` and an
    /// index.
    #[must_use]
    pub fn child_slot(&self) -> Option<(Self, usize)> {
        match self.0.as_slice() {
            [prefix @ .., field, PathSegment::Index(index)] if field.is_children() => {
                Some((Self(prefix.to_vec()), *index))
            }
            _ => None,
        }
    }

    /// Index segments in order, root to leaf
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().filter_map(|segment| match segment {
            PathSegment::Index(index) => Some(*index),
            PathSegment::Field(_) => None,
        })
    }

    /// Iterator over segments from root to leaf
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &PathSegment> {
        self.0.iter()
    }
}

impl Display for TreePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.0 {
            match segment {
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl FromStr for TreePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (rest, offset) = match s.strip_prefix('$') {
            Some(rest) => (rest, 1),
            None => (s, 0),
        };

        let mut segments = Vec::new();
        let mut pos = 0;

        // Without the `$` anchor the first segment may be a bare field name
        if offset == 0 && !rest.is_empty() && !rest.starts_with(['.', '[']) {
            pos = parse_field(rest, 0, &mut segments)?;
        }

        while let Some(ch) = rest[pos..].chars().next() {
            match ch {
                '.' => pos = parse_field(rest, pos + 1, &mut segments)?,
                '[' => {
                    let close = rest[pos + 1..]
                        .find(']')
                        .ok_or(PathError::UnclosedBracket {
                            position: offset + pos,
                        })?;
                    let raw = &rest[pos + 1..pos + 1 + close];
                    let index = raw
                        .parse::<usize>()
                        .map_err(|_| PathError::InvalidIndex(raw.to_string()))?;
                    segments.push(PathSegment::Index(index));
                    pos += close + 2;
                }
                other => {
                    return Err(PathError::UnexpectedChar {
                        ch: other,
                        position: offset + pos,
                    })
                }
            }
        }

        Ok(Self(segments))
    }
}

/// Parse a field name starting at `start`, returning the position after it
fn parse_field(input: &str, start: usize, segments: &mut Vec<PathSegment>) -> Result<usize, PathError> {
    let end = input[start..]
        .find(['.', '['])
        .map_or(input.len(), |i| start + i);
    let name = &input[start..end];

    if name.is_empty() {
        return Err(PathError::EmptySegment);
    }
    if name.contains(|c: char| !c.is_alphanumeric() && c != '_') {
        return Err(PathError::InvalidSegment(name.to_string()));
    }

    segments.push(PathSegment::Field(name.to_string()));
    Ok(end)
}

impl From<Vec<PathSegment>> for TreePath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

/// Errors from parsing or resolving tree paths
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Empty segment in path
    #[error("path contains empty segment")]
    EmptySegment,

    /// Invalid segment characters
    #[error("invalid segment: {0} (must be alphanumeric or underscore)")]
    InvalidSegment(String),

    /// `[` without matching `]`
    #[error("unclosed bracket at position {position}")]
    UnclosedBracket { position: usize },

    /// Bracket content is not a decimal index
    #[error("invalid index: '{0}'")]
    InvalidIndex(String),

    /// Character not allowed at this position
    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedChar { ch: char, position: usize },

    /// Segment names a field that does not exist
    #[error("cannot navigate to path: {path} (failed at {segment})")]
    Missing { path: String, segment: String },

    /// Index past the end of a list
    #[error("index {index} out of range at {path} (length {len})")]
    OutOfRange {
        path: String,
        index: usize,
        len: usize,
    },

    /// Current value cannot be walked into with this segment
    #[error("cannot navigate to path: {path} ({segment} is not reachable from a {found})")]
    NotTraversable {
        path: String,
        segment: String,
        found: &'static str,
    },

    /// Path resolves, but not to a tree node
    #[error("no valid node at {path} (found {found})")]
    NotANode { path: String, found: &'static str },

    /// Path does not end in `children[N]`
    #[error("invalid path for add/remove operation: {0}")]
    NotAChildSlot(String),

    /// Parent of a child slot is not a tree node
    #[error("parent at {0} is not a valid UITree node")]
    InvalidParent(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str) -> PathSegment {
        PathSegment::Field(name.to_string())
    }

    #[test]
    fn parse_root() {
        let path: TreePath = "$".parse().unwrap();
        assert!(path.is_root());
        assert_eq!(path.to_string(), "$");
    }

    #[test]
    fn parse_empty_is_root() {
        let path: TreePath = "".parse().unwrap();
        assert!(path.is_root());
    }

    #[test]
    fn parse_nested_child() {
        let path: TreePath = "$.children[1].children[0]".parse().unwrap();
        assert_eq!(
            path.segments(),
            &[
                field("children"),
                PathSegment::Index(1),
                field("children"),
                PathSegment::Index(0)
            ]
        );
    }

    #[test]
    fn parse_props_selector() {
        let path: TreePath = "$.children[1].props.title".parse().unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(path.last(), Some(&field("title")));
    }

    #[test]
    fn parse_without_anchor() {
        let path: TreePath = "children[0]".parse().unwrap();
        assert_eq!(path, TreePath::root().child(0));
    }

    #[test]
    fn parse_root_children() {
        let path: TreePath = "$.children".parse().unwrap();
        assert!(path.is_root_children());
    }

    #[test]
    fn parse_rejects_empty_segment() {
        let result: Result<TreePath, _> = "$..children".parse();
        assert_eq!(result, Err(PathError::EmptySegment));
    }

    #[test]
    fn parse_rejects_invalid_chars() {
        let result: Result<TreePath, _> = "$.chil-dren".parse();
        assert!(matches!(result, Err(PathError::InvalidSegment(_))));
    }

    #[test]
    fn parse_rejects_unclosed_bracket() {
        let result: Result<TreePath, _> = "$.children[0".parse();
        assert!(matches!(result, Err(PathError::UnclosedBracket { .. })));
    }

    #[test]
    fn parse_rejects_negative_index() {
        let result: Result<TreePath, _> = "$.children[-1]".parse();
        assert_eq!(result, Err(PathError::InvalidIndex("-1".to_string())));
    }

    #[test]
    fn parse_rejects_trailing_garbage() {
        let result: Result<TreePath, _> = "$.children[0]x".parse();
        assert!(matches!(
            result,
            Err(PathError::UnexpectedChar { ch: 'x', position: 13 })
        ));
    }

    #[test]
    fn display_roundtrips_canonical_form() {
        let raw = "$.children[2].props.items[0]";
        let path: TreePath = raw.parse().unwrap();
        assert_eq!(path.to_string(), raw);
    }

    #[test]
    fn child_slot_split() {
        let path: TreePath = "$.children[1].children[3]".parse().unwrap();
        let (parent, index) = path.child_slot().unwrap();
        assert_eq!(parent.to_string(), "$.children[1]");
        assert_eq!(index, 3);
    }

    #[test]
    fn child_slot_requires_children_index() {
        let path: TreePath = "$.children[1].props".parse().unwrap();
        assert!(path.child_slot().is_none());
        assert!(TreePath::root().child_slot().is_none());
    }

    #[test]
    fn indices_in_order() {
        let path = TreePath::root().child(2).child(0);
        assert_eq!(path.indices().collect::<Vec<_>>(), vec![2, 0]);
    }
}
