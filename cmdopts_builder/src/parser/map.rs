use crate::model::{Value, ValueError};
use crate::prelude::ValueType;

/// The ordered multimap produced by a parse.
///
/// Entries are kept in the order the parse consumed them, and repeated keys accumulate rather than overwrite.
/// The per-key count is meaningful: occurrence constraints are checked against it.
///
/// A map may be handed to the next parse as its seed, which allows for layered configuration
/// (ex: defaults, then a config file, then the command line).
/// The seed itself is never mutated by a parse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableMap {
    entries: Vec<(String, Value)>,
}

impl VariableMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.entries.push((key.into(), value));
    }

    /// The number of values stored for `key`.
    pub fn count(&self, key: &str) -> usize {
        self.entries.iter().filter(|(k, _)| k == key).count()
    }

    /// Whether any value is stored for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// The first value stored for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    /// The most recent value stored for `key`.
    pub fn get_last(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    /// All the values stored for `key`, in insertion order.
    pub fn get_all(&self, key: &str) -> Vec<&Value> {
        self.entries
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, value)| value)
            .collect()
    }

    /// The most recent value for `key`, read as `T`.
    ///
    /// The most recent value wins, so a command line layer overrides the layers seeded before it.
    pub fn value_of<T: ValueType>(&self, key: &str) -> Result<T, ValueError> {
        let value = self.get_last(key).ok_or_else(|| ValueError::Missing {
            key: key.to_string(),
        })?;
        read(key, value)
    }

    /// Every value for `key`, read as `T`.
    /// An absent key is an empty `Vec`.
    pub fn values_of<T: ValueType>(&self, key: &str) -> Result<Vec<T>, ValueError> {
        self.get_all(key)
            .into_iter()
            .map(|value| read(key, value))
            .collect()
    }

    /// Iterate all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, value)| (k.as_str(), value))
    }

    /// The distinct keys, in order of first insertion.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::default();

        for (key, _) in &self.entries {
            if !keys.contains(&key.as_str()) {
                keys.push(key.as_str());
            }
        }

        keys
    }

    /// The total number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn read<T: ValueType>(key: &str, value: &Value) -> Result<T, ValueError> {
    T::from_value(value).ok_or_else(|| ValueError::Mismatch {
        key: key.to_string(),
        expected: std::any::type_name::<T>(),
        actual: value.variant_name(),
    })
}

impl Extend<(String, Value)> for VariableMap {
    fn extend<I: IntoIterator<Item = (String, Value)>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl FromIterator<(String, Value)> for VariableMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for VariableMap {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
