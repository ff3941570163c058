//! Dot-path access into decoded JSON response bodies.

use serde_json::Value;

/// A decoded JSON document with dot-separated path lookup.
///
/// # Example
///
/// ```
/// use api_client::api::Values;
///
/// let values = Values::from_slice(br#"{"a": {"a1": {"a2": 1}}, "b": [{"b2": 2}]}"#).unwrap();
///
/// assert_eq!(values.get("a.a1.a2"), Some(&serde_json::json!(1)));
/// assert_eq!(values.get("b.0.b2"), Some(&serde_json::json!(2)));
/// assert_eq!(values.get("a.missing"), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Values {
    root: Value,
}

impl Values {
    /// Wraps an already decoded value.
    #[must_use]
    pub const fn new(root: Value) -> Self {
        Self { root }
    }

    /// Decodes a JSON response body.
    ///
    /// # Errors
    ///
    /// Returns the decoder error if `bytes` is not valid JSON.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes).map(Self::new)
    }

    /// Looks up a nested value by dot-separated path.
    ///
    /// Each segment indexes an object by key, or an array by decimal
    /// position. An empty path returns the root. Any miss returns `None`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        if path.is_empty() {
            return Some(&self.root);
        }

        path.split('.')
            .try_fold(&self.root, |current, segment| match current {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            })
    }

    /// Returns the root value.
    #[must_use]
    pub const fn root(&self) -> &Value {
        &self.root
    }

    /// Consumes the wrapper, returning the root value.
    #[must_use]
    pub fn into_inner(self) -> Value {
        self.root
    }
}

impl From<Value> for Values {
    fn from(root: Value) -> Self {
        Self::new(root)
    }
}
