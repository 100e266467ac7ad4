//! Data bindings for a template.
//!
//! [`Data`] is a string-keyed map of JSON values. A template owns its own copy,
//! so data bound to one template (or partial) is never visible to another.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::RenderError;

/// Data bound into a template's scope.
///
/// ```rust
/// use serde::Serialize;
/// use tagsmith::Data;
///
/// #[derive(Serialize)]
/// struct Page { title: String }
///
/// let data = Data::from_serialize(&Page { title: "Home".into() }).unwrap();
/// assert_eq!(data.get("title"), Some(&serde_json::json!("Home")));
///
/// let data = Data::new().with("count", 3);
/// assert_eq!(data.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Data {
    values: Map<String, Value>,
    /// First serialization failure seen by [`Data::with`].
    error: Option<String>,
}

impl Data {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes `value` into bindings.
    ///
    /// `value` must serialize to a map (a struct or map type), or to unit,
    /// which binds nothing.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, RenderError> {
        match serde_json::to_value(value)? {
            Value::Object(values) => Ok(Self::from(values)),
            Value::Null => Ok(Self::new()),
            other => Err(RenderError::Serialization(format!(
                "template data must serialize to a map, got {}",
                kind_of(&other)
            ))),
        }
    }

    /// Adds a binding.
    ///
    /// A value that fails to serialize is not bound. The first such failure is
    /// kept and reported by [`Template::new`](crate::Template::new); use
    /// [`try_with`](Self::try_with) to see it right away.
    pub fn with(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Err(err) = self.insert(key, value) {
            self.error.get_or_insert_with(|| err.to_string());
        }
        self
    }

    /// Adds a binding, failing if `value` does not serialize.
    pub fn try_with(
        mut self,
        key: impl Into<String>,
        value: impl Serialize,
    ) -> Result<Self, RenderError> {
        self.insert(key, value)?;
        Ok(self)
    }

    /// Adds a binding in place, replacing any previous value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Serialize,
    ) -> Result<(), RenderError> {
        let key = key.into();
        let value = serde_json::to_value(value)
            .map_err(|err| RenderError::Serialization(format!("{}: {}", key, err)))?;
        self.values.insert(key, value);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fails with the first error recorded by [`Data::with`].
    pub(crate) fn check(&self) -> Result<(), RenderError> {
        match &self.error {
            Some(err) => Err(RenderError::Serialization(err.clone())),
            None => Ok(()),
        }
    }

    /// Returns the keys that appear in `reserved`, sorted.
    pub(crate) fn conflicts(&self, reserved: &[&str]) -> Vec<String> {
        let mut keys: Vec<String> = self
            .keys()
            .filter(|key| reserved.contains(key))
            .map(str::to_string)
            .collect();
        keys.sort();
        keys
    }
}

impl From<Map<String, Value>> for Data {
    fn from(values: Map<String, Value>) -> Self {
        Self {
            values,
            error: None,
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Data {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self::from(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v))
                .collect::<Map<String, Value>>(),
        )
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a map",
    }
}
