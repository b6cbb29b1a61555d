mod descriptor;
mod json;
mod yaml;

pub use descriptor::RuleDescriptor;
pub use json::JsonRuleReader;
pub use yaml::YamlRuleReader;

use thiserror::Error;

/// Errors produced when parsing rule definition text.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("malformed JSON rule definition: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed YAML rule definition: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Parses a textual source into rule descriptors.
///
/// One parse unit may yield multiple sibling definitions; readers
/// preserve encounter order.
pub trait RuleDefinitionReader {
    /// # Errors
    ///
    /// Returns [`ReadError`] if the source is not well-formed in the
    /// reader's format or a definition is missing its `name`.
    fn read(&self, source: &str) -> Result<Vec<RuleDescriptor>, ReadError>;
}
