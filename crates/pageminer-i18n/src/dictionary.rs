//! Nested translation dictionaries backed by a parsed JSON tree.

use serde_json::{Map, Value};
use thiserror::Error;

/// Reasons a retrieved document cannot become a dictionary.
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// The body was not valid JSON.
    #[error("dictionary document is not valid json")]
    Parse {
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
    /// The JSON root was not an object.
    #[error("dictionary root is not an object")]
    NotAnObject,
}

/// Immutable key tree for one locale; leaves are strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dictionary {
    root: Map<String, Value>,
}

impl Dictionary {
    /// Parse a dictionary from raw JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DictionaryError`] when the body is not a JSON object.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DictionaryError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|source| DictionaryError::Parse { source })?;
        Self::from_value(value)
    }

    /// Wrap an already parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`DictionaryError::NotAnObject`] for non-object roots.
    pub fn from_value(value: Value) -> Result<Self, DictionaryError> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(DictionaryError::NotAnObject),
        }
    }

    /// Walk a dotted path (`meta.og.title`) to a string leaf.
    ///
    /// Any missing segment, or a final node that is not a string, yields `None`.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&str> {
        let mut segments = path.split('.');
        let mut node = self.root.get(segments.next()?)?;
        for segment in segments {
            node = node.as_object()?.get(segment)?;
        }
        node.as_str()
    }

    /// Dotted paths of every string leaf, sorted.
    #[must_use]
    pub fn leaf_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        collect_leaves(&self.root, "", &mut keys);
        keys.sort();
        keys
    }

    /// Leaf keys present in `reference` that this dictionary cannot resolve.
    #[must_use]
    pub fn missing_from(&self, reference: &Self) -> Vec<String> {
        reference
            .leaf_keys()
            .into_iter()
            .filter(|key| self.lookup(key).is_none())
            .collect()
    }

    /// Whether the dictionary has no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

fn collect_leaves(map: &Map<String, Value>, prefix: &str, out: &mut Vec<String>) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::String(_) => out.push(path),
            Value::Object(nested) => collect_leaves(nested, &path, out),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Dictionary {
        Dictionary::from_value(json!({
            "meta": {
                "title": "Hello",
                "og": { "title": "OG Hello" },
                "rtl": false
            },
            "nav": { "home": "Home" },
            "count": 3
        }))
        .expect("object root")
    }

    #[test]
    fn lookup_walks_nested_segments() {
        let dict = sample();
        assert_eq!(dict.lookup("meta.title"), Some("Hello"));
        assert_eq!(dict.lookup("meta.og.title"), Some("OG Hello"));
        assert_eq!(dict.lookup("nav.home"), Some("Home"));
    }

    #[test]
    fn lookup_fails_on_missing_or_non_string_nodes() {
        let dict = sample();
        assert_eq!(dict.lookup("meta.subtitle"), None);
        assert_eq!(dict.lookup("meta"), None);
        assert_eq!(dict.lookup("meta.rtl"), None);
        assert_eq!(dict.lookup("count"), None);
        assert_eq!(dict.lookup("nav.home.extra"), None);
        assert_eq!(dict.lookup(""), None);
    }

    #[test]
    fn rejects_non_object_documents() {
        assert!(matches!(
            Dictionary::from_slice(b"[1, 2]"),
            Err(DictionaryError::NotAnObject)
        ));
        assert!(matches!(
            Dictionary::from_slice(b"{not json"),
            Err(DictionaryError::Parse { .. })
        ));
        assert!(Dictionary::from_slice(b"{}").expect("empty object").is_empty());
    }

    #[test]
    fn leaf_keys_and_missing_keys() {
        let reference = sample();
        assert_eq!(
            reference.leaf_keys(),
            vec!["meta.og.title", "meta.title", "nav.home"]
        );

        let partial = Dictionary::from_value(json!({"meta": {"title": "Bonjour"}}))
            .expect("object root");
        assert_eq!(
            partial.missing_from(&reference),
            vec!["meta.og.title", "nav.home"]
        );
    }
}
