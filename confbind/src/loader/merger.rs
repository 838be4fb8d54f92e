//! Deep merging of configuration trees.
//!
//! Mappings merge key by key, everything else is replaced by the
//! overriding file. Sequences can opt into append semantics with an
//! include-default marker string.

use serde_json::map::Entry;
use serde_json::{Map, Value};

/// Marker strings that switch a sequence from replace to append semantics.
///
/// # Examples
///
/// ```
/// use confbind::IncludeDefault;
///
/// let single = IncludeDefault::from("__INCLUDE_DEFAULT__");
/// assert!(single.is_marker("__INCLUDE_DEFAULT__"));
///
/// let several = IncludeDefault::from(vec!["+defaults", "..."]);
/// assert!(several.is_marker("..."));
/// assert!(!IncludeDefault::Disabled.is_marker("..."));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IncludeDefault {
    /// Sequences are always replaced.
    #[default]
    Disabled,
    /// A single marker string.
    Marker(String),
    /// Any of several marker strings.
    Markers(Vec<String>),
}

impl IncludeDefault {
    /// The configured markers.
    #[must_use]
    pub fn markers(&self) -> &[String] {
        match self {
            Self::Disabled => &[],
            Self::Marker(marker) => std::slice::from_ref(marker),
            Self::Markers(markers) => markers,
        }
    }

    /// Whether `candidate` is one of the configured markers.
    #[must_use]
    pub fn is_marker(&self, candidate: &str) -> bool {
        self.markers().iter().any(|marker| marker == candidate)
    }

    /// Whether `sequence` holds any marker.
    #[must_use]
    pub fn contains_marker(&self, sequence: &[Value]) -> bool {
        sequence
            .iter()
            .any(|item| matches!(item, Value::String(s) if self.is_marker(s)))
    }

    /// Removes every occurrence of every marker from `sequence`.
    ///
    /// Returns whether anything was removed.
    pub fn strip(&self, sequence: &mut Vec<Value>) -> bool {
        if matches!(self, Self::Disabled) {
            return false;
        }

        let before = sequence.len();
        sequence.retain(|item| !matches!(item, Value::String(s) if self.is_marker(s)));
        sequence.len() != before
    }
}

impl From<&str> for IncludeDefault {
    fn from(marker: &str) -> Self {
        Self::Marker(marker.to_string())
    }
}

impl From<String> for IncludeDefault {
    fn from(marker: String) -> Self {
        Self::Marker(marker)
    }
}

impl From<Vec<String>> for IncludeDefault {
    fn from(markers: Vec<String>) -> Self {
        match markers.len() {
            0 => Self::Disabled,
            _ => Self::Markers(markers),
        }
    }
}

impl From<Vec<&str>> for IncludeDefault {
    fn from(markers: Vec<&str>) -> Self {
        markers
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>()
            .into()
    }
}

impl<T: Into<IncludeDefault>> From<Option<T>> for IncludeDefault {
    fn from(markers: Option<T>) -> Self {
        markers.map_or(Self::Disabled, Into::into)
    }
}

/// Merges configuration trees according to the override rules.
///
/// # Examples
///
/// ```
/// use confbind::{ConfigMerger, IncludeDefault};
/// use serde_json::json;
///
/// let merger = ConfigMerger::new(IncludeDefault::from("__INCLUDE_DEFAULT__"));
/// let base = json!({"hosts": ["a", "b"], "port": 80})
///     .as_object()
///     .unwrap()
///     .clone();
/// let update = json!({"hosts": ["__INCLUDE_DEFAULT__", "c"], "port": 8080})
///     .as_object()
///     .unwrap()
///     .clone();
///
/// let merged = merger.merge(vec![base, update]);
/// assert_eq!(merged["hosts"], json!(["a", "b", "c"]));
/// assert_eq!(merged["port"], json!(8080));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigMerger {
    include_default: IncludeDefault,
}

impl ConfigMerger {
    /// Creates a merger with the given include-default markers.
    #[must_use]
    pub fn new(include_default: IncludeDefault) -> Self {
        Self { include_default }
    }

    /// The configured include-default markers.
    #[must_use]
    pub fn include_default(&self) -> &IncludeDefault {
        &self.include_default
    }

    /// Merge `update` into `original` (update overwrites original).
    ///
    /// # Merging Rules
    ///
    /// - Keys missing from `original`: inserted
    /// - Mapping over mapping: merged recursively
    /// - Sequence over sequence: appended when either contains a marker,
    ///   replaced otherwise. Markers are removed from the original only; the
    ///   update's markers are carried over so a later layer appends again.
    /// - Anything else: replaced
    pub fn recursive_update(&self, original: &mut Map<String, Value>, update: Map<String, Value>) {
        for (key, value) in update {
            match original.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(value);
                }
                Entry::Occupied(mut slot) => self.merge_value(slot.get_mut(), value),
            }
        }
    }

    fn merge_value(&self, existing: &mut Value, update: Value) {
        match (existing, update) {
            (Value::Object(base), Value::Object(overlay)) => self.recursive_update(base, overlay),
            (Value::Array(base), Value::Array(overlay)) => {
                let base_marked = self.include_default.strip(base);
                if base_marked || self.include_default.contains_marker(&overlay) {
                    base.extend(overlay);
                } else {
                    *base = overlay;
                }
            }
            (existing, update) => *existing = update,
        }
    }

    /// Fold several trees together, first to last.
    ///
    /// Markers left anywhere in the result are stripped afterwards.
    #[must_use]
    pub fn merge(&self, trees: Vec<Map<String, Value>>) -> Map<String, Value> {
        let mut trees = trees.into_iter();
        let mut result = trees.next().unwrap_or_default();

        for tree in trees {
            self.recursive_update(&mut result, tree);
        }

        self.strip_leftover_markers(&mut result);
        result
    }

    /// Removes markers that never took part in an append.
    pub fn strip_leftover_markers(&self, tree: &mut Map<String, Value>) {
        if matches!(self.include_default, IncludeDefault::Disabled) {
            return;
        }
        for value in tree.values_mut() {
            self.strip_value(value);
        }
    }

    fn strip_value(&self, value: &mut Value) {
        match value {
            Value::Object(map) => self.strip_leftover_markers(map),
            Value::Array(items) => {
                self.include_default.strip(items);
                for item in items {
                    self.strip_value(item);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MARKER: &str = "__INCLUDE_DEFAULT__";

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected a mapping, got {other}"),
        }
    }

    fn merged(merger: &ConfigMerger, base: Value, update: Value) -> Value {
        let mut base = map(base);
        merger.recursive_update(&mut base, map(update));
        Value::Object(base)
    }

    #[test]
    fn test_merge_inserts_new_keys() {
        let result = merged(&ConfigMerger::default(), json!({"a": 1}), json!({"b": 2}));
        assert_eq!(result, json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_merge_overwrites_scalars() {
        let result = merged(
            &ConfigMerger::default(),
            json!({"name": "old", "port": 1}),
            json!({"name": "new"}),
        );
        assert_eq!(result, json!({"name": "new", "port": 1}));
    }

    #[test]
    fn test_nested_deep_merge() {
        let result = merged(
            &ConfigMerger::default(),
            json!({"level1": {"level2": {"a": 1, "b": 2}}}),
            json!({"level1": {"level2": {"b": 3, "c": 4}}}),
        );
        assert_eq!(result, json!({"level1": {"level2": {"a": 1, "b": 3, "c": 4}}}));
    }

    #[test]
    fn test_type_mismatch_replaces() {
        let result = merged(
            &ConfigMerger::default(),
            json!({"db": {"host": "x"}, "hosts": ["a"]}),
            json!({"db": "sqlite://memory", "hosts": {"primary": "b"}}),
        );
        assert_eq!(result, json!({"db": "sqlite://memory", "hosts": {"primary": "b"}}));
    }

    #[test]
    fn test_lists_replace_without_markers() {
        let merger = ConfigMerger::new(IncludeDefault::from(MARKER));
        let result = merged(&merger, json!({"l": ["a", "b"]}), json!({"l": ["c"]}));
        assert_eq!(result, json!({"l": ["c"]}));
    }

    #[test]
    fn test_marker_in_override_appends_and_is_carried() {
        let merger = ConfigMerger::new(IncludeDefault::from(MARKER));
        let result = merged(
            &merger,
            json!({"l": ["a", "b"]}),
            json!({"l": [MARKER, "c"]}),
        );
        assert_eq!(result, json!({"l": ["a", "b", MARKER, "c"]}));
    }

    #[test]
    fn test_marker_in_base_appends() {
        let merger = ConfigMerger::new(IncludeDefault::from(MARKER));
        let result = merged(
            &merger,
            json!({"l": ["a", MARKER, "b", MARKER]}),
            json!({"l": ["c"]}),
        );
        assert_eq!(result, json!({"l": ["a", "b", "c"]}));
    }

    #[test]
    fn test_marker_ignored_when_not_configured() {
        let result = merged(
            &ConfigMerger::default(),
            json!({"l": ["a", "b"]}),
            json!({"l": [MARKER, "c"]}),
        );
        assert_eq!(result, json!({"l": [MARKER, "c"]}));
    }

    #[test]
    fn test_any_of_several_markers() {
        let merger = ConfigMerger::new(IncludeDefault::from(vec!["+base", "+defaults"]));
        let result = merged(
            &merger,
            json!({"l": ["+base", "a"]}),
            json!({"l": ["+defaults", "b", "+base"]}),
        );
        assert_eq!(result, json!({"l": ["a", "+defaults", "b", "+base"]}));
    }

    #[test]
    fn test_marker_against_non_list_replaces() {
        let merger = ConfigMerger::new(IncludeDefault::from(MARKER));
        let result = merged(&merger, json!({"l": [MARKER, "a"]}), json!({"l": "scalar"}));
        assert_eq!(result, json!({"l": "scalar"}));
    }

    #[test]
    fn test_merge_folds_in_order() {
        let merger = ConfigMerger::default();
        let result = merger.merge(vec![
            map(json!({"timeout": 100, "cache": {"mode": "off"}})),
            map(json!({"timeout": 200})),
            map(json!({"cache": {"mode": "on"}})),
            map(json!({"timeout": 50})),
        ]);
        assert_eq!(Value::Object(result), json!({"timeout": 50, "cache": {"mode": "on"}}));
    }

    #[test]
    fn test_merge_strips_leftover_markers() {
        let merger = ConfigMerger::new(IncludeDefault::from(MARKER));
        let result = merger.merge(vec![
            map(json!({"plugins": [MARKER, "core"], "nested": {"l": [[MARKER, 1]]}})),
            map(json!({"other": true})),
        ]);
        assert_eq!(
            Value::Object(result),
            json!({"plugins": ["core"], "nested": {"l": [[1]]}, "other": true})
        );
    }

    #[test]
    fn test_marker_chain_appends_every_layer() {
        let merger = ConfigMerger::new(IncludeDefault::from("+"));
        let result = merger.merge(vec![
            map(json!({"l": ["+", "a"]})),
            map(json!({"l": ["+", "b"]})),
            map(json!({"l": ["c"]})),
        ]);
        assert_eq!(Value::Object(result), json!({"l": ["a", "b", "c"]}));
    }

    #[test]
    fn test_marker_chain_override_then_append() {
        let merger = ConfigMerger::new(IncludeDefault::from(MARKER));
        let result = merger.merge(vec![
            map(json!({"l": ["a"]})),
            map(json!({"l": [MARKER, "b"]})),
            map(json!({"l": [MARKER, "c"]})),
            map(json!({"m": ["x"]})),
        ]);
        assert_eq!(Value::Object(result), json!({"l": ["a", "b", "c"], "m": ["x"]}));
    }

    #[test]
    fn test_merge_of_nothing_is_empty() {
        assert!(ConfigMerger::default().merge(Vec::new()).is_empty());
    }

    #[test]
    fn test_include_default_conversions() {
        assert_eq!(IncludeDefault::from(None::<&str>), IncludeDefault::Disabled);
        assert_eq!(IncludeDefault::from(Vec::<String>::new()), IncludeDefault::Disabled);
        assert_eq!(
            IncludeDefault::from(Some("x")),
            IncludeDefault::Marker("x".to_string())
        );
        assert!(IncludeDefault::Disabled.markers().is_empty());
    }
}
