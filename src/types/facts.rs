use std::fmt;

use super::Value;

/// Ordered, mutable mapping from fact names to [`Value`]s.
///
/// Facts form the variable scope visible to rule conditions and actions.
/// Insertion order is preserved; replacing an existing fact keeps its
/// original position.
#[derive(Debug, Clone, Default)]
pub struct Facts {
    entries: Vec<(String, Value)>,
}

impl Facts {
    /// Create an empty facts scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fact, builder-style. Replaces any existing fact with the same name.
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.put(name, value);
        self
    }

    /// Add or replace a fact (mutable reference version).
    pub fn put(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Look up a fact by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Remove a fact, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let idx = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(idx).1)
    }

    /// Iterate facts in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Value)> for Facts {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut facts = Facts::new();
        for (name, value) in iter {
            facts.put(name, value);
        }
        facts
    }
}

impl fmt::Display for Facts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name} = {value}")?;
        }
        write!(f, "]")
    }
}
