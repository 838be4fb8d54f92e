//! The merged configuration tree.

use std::fmt;

use serde_json::{Map, Value};

/// The single mapping produced by folding every configuration file together.
///
/// Once merging completes nothing about the individual files is
/// recoverable; only the final shape is kept.
///
/// # Examples
///
/// ```
/// use confbind::MergedTree;
/// use serde_json::json;
///
/// let tree = MergedTree::try_from(json!({"server": {"ports": [80, 443]}})).unwrap();
/// assert_eq!(tree.get_path("server.ports.1"), Some(&json!(443)));
/// assert_eq!(tree.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedTree {
    data: Map<String, Value>,
}

impl MergedTree {
    /// Wraps an already merged mapping.
    #[must_use]
    pub fn new(data: Map<String, Value>) -> Self {
        Self { data }
    }

    /// Looks up a top-level key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Looks up a dotted key path such as `database.replicas.0.host`.
    ///
    /// Numeric segments index into sequences.
    #[must_use]
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.data.get(segments.next()?)?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Number of top-level keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the tree has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterates over top-level entries in insertion order.
    pub fn iter(&self) -> serde_json::map::Iter<'_> {
        self.data.iter()
    }

    /// Iterates over top-level keys in insertion order.
    pub fn keys(&self) -> serde_json::map::Keys<'_> {
        self.data.keys()
    }

    /// Borrows the underlying mapping.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Consumes the tree, returning the underlying mapping.
    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.data
    }
}

impl From<Map<String, Value>> for MergedTree {
    fn from(data: Map<String, Value>) -> Self {
        Self::new(data)
    }
}

impl TryFrom<Value> for MergedTree {
    type Error = Value;

    /// Accepts a mapping; any other value is handed back unchanged.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self::new(map)),
            other => Err(other),
        }
    }
}

impl<'a> IntoIterator for &'a MergedTree {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl fmt::Display for MergedTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string_pretty(&self.data).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

/// Short name for the kind of a parsed value, used in error messages.
pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

/// Joins a key path segment onto its parent.
pub(crate) fn child_key(parent: &str, segment: impl fmt::Display) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{parent}.{segment}")
    }
}
