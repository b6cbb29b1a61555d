use super::{ReadError, RuleDefinitionReader, RuleDescriptor};

/// Reads rule definitions from JSON.
///
/// A parse unit is either a top-level array of definitions or a single
/// definition object.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRuleReader;

impl JsonRuleReader {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl RuleDefinitionReader for JsonRuleReader {
    fn read(&self, source: &str) -> Result<Vec<RuleDescriptor>, ReadError> {
        let root: serde_json::Value = serde_json::from_str(source)?;
        match root {
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(|item| serde_json::from_value(item).map_err(ReadError::from))
                .collect(),
            other => Ok(vec![serde_json::from_value(other)?]),
        }
    }
}
