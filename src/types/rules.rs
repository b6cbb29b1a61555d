use std::fmt;

use super::rule::Rule;

/// An ordered set of top-level rules, kept sorted ascending by priority.
///
/// Ties are broken by registration order (stable sort). Duplicate names
/// are permitted but discouraged.
#[derive(Debug, Clone, Default)]
pub struct Rules {
    rules: Vec<Rule>,
}

impl Rules {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule, keeping the collection sorted by priority.
    pub fn register(&mut self, rule: Rule) {
        self.rules.push(rule);
        self.rules.sort_by_key(Rule::priority);
    }

    /// Remove the first rule with the given name, returning it if found.
    pub fn unregister(&mut self, name: &str) -> Option<Rule> {
        let idx = self.rules.iter().position(|r| r.name() == name)?;
        Some(self.rules.remove(idx))
    }

    /// Iterate rules in ascending priority order.
    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn clear(&mut self) {
        self.rules.clear();
    }
}

impl FromIterator<Rule> for Rules {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        let mut rules = Rules::new();
        for rule in iter {
            rules.register(rule);
        }
        rules
    }
}

impl IntoIterator for Rules {
    type Item = Rule;
    type IntoIter = std::vec::IntoIter<Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.into_iter()
    }
}

impl<'a> IntoIterator for &'a Rules {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl fmt::Display for Rules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rules({} rules)", self.rules.len())
    }
}
