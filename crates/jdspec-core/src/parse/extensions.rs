use indexmap::IndexMap;
use indexmap::map::Iter;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Go field name the scanner leaks onto properties and parameters.
pub const X_GO_NAME: &str = "x-go-name";

/// Go package path the scanner leaks onto definitions.
pub const X_GO_PACKAGE: &str = "x-go-package";

/// Open-ended bag of `x-` vendor fields attached to a spec element.
///
/// It is flattened into its owner, so it also carries any keyword the owner
/// does not model explicitly; those pass through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Extensions(IndexMap<String, Value>);

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Value of `key` if it is present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Remove `key`, keeping the order of the remaining entries. Absent keys are a no-op.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Extensions {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
