mod builder;
mod error;
mod facts;
mod rule;
mod rules;
mod value;

pub use builder::RuleBuilder;
pub use error::RuleDefinitionError;
pub use facts::Facts;
pub use rule::{GroupKind, Rule, DEFAULT_PRIORITY};
pub use rules::Rules;
pub use value::Value;
