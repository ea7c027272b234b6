//! Translation trees and dotted-key lookup.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// A parsed translation document.
///
/// Wraps the raw JSON value so that child order follows the source file
/// (`serde_json` is built with `preserve_order`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TranslationTree(Value);

impl TranslationTree {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The tree stored for a document that failed to load.
    pub fn empty() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn parse(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content).map(Self)
    }

    pub fn root(&self) -> &Value {
        &self.0
    }

    pub fn lookup(&self, key: &DottedKey) -> Option<&Value> {
        lookup(&self.0, key)
    }

    pub fn contains(&self, key: &DottedKey) -> bool {
        self.lookup(key).is_some()
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        match &self.0 {
            Value::Object(map) => map.len(),
            Value::Array(arr) => arr.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A `.`-joined path into a [`TranslationTree`].
///
/// The empty key addresses the root of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct DottedKey(String);

impl DottedKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn root() -> Self {
        Self(String::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments; the root key has none.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        let key = self.0.as_str();
        (!key.is_empty())
            .then(|| key.split('.'))
            .into_iter()
            .flatten()
    }

    pub fn last_segment(&self) -> Option<&str> {
        self.segments().last()
    }
}

impl fmt::Display for DottedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DottedKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// Walk `key` through `value`.
///
/// Objects are indexed by name and arrays by decimal index. Returns `None` as
/// soon as a segment is absent or the current node is a scalar.
pub fn lookup<'a>(value: &'a Value, key: &DottedKey) -> Option<&'a Value> {
    key.segments().try_fold(value, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(arr) => segment.parse::<usize>().ok().and_then(|i| arr.get(i)),
        _ => None,
    })
}

pub fn is_container(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

/// Direct children of a container node, in source order.
pub fn children(value: &Value) -> Vec<(String, &Value)> {
    match value {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Value::Array(arr) => arr
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => Vec::new(),
    }
}

/// Display form of a resolved node.
///
/// Strings are shown verbatim, other scalars as their JSON text and
/// subtrees as compact JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Object(_) | Value::Array(_) => value.to_string(),
    }
}
