use serde::Deserialize;

use super::{ReadError, RuleDefinitionReader, RuleDescriptor};

/// Reads rule definitions from YAML.
///
/// A parse unit is a stream: `---`-separated documents each holding one
/// definition, or a document holding a top-level sequence of
/// definitions. Empty documents are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlRuleReader;

impl YamlRuleReader {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl RuleDefinitionReader for YamlRuleReader {
    fn read(&self, source: &str) -> Result<Vec<RuleDescriptor>, ReadError> {
        let mut descriptors = Vec::new();
        for document in serde_yaml::Deserializer::from_str(source) {
            let value = serde_yaml::Value::deserialize(document)?;
            match value {
                serde_yaml::Value::Null => {}
                serde_yaml::Value::Sequence(items) => {
                    for item in items {
                        descriptors.push(serde_yaml::from_value(item)?);
                    }
                }
                other => descriptors.push(serde_yaml::from_value(other)?),
            }
        }
        Ok(descriptors)
    }
}
