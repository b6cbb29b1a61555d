mod engine;
mod error;
mod eval;
mod factory;
mod reader;
mod types;
mod validate;

pub use engine::{EngineParams, RulesEngine};
pub use error::DeclaruleError;
pub use eval::{BoundExpr, EvalError, Evaluator, ExprEvaluator};
pub use factory::RuleFactory;
pub use reader::{
    JsonRuleReader, ReadError, RuleDefinitionReader, RuleDescriptor, YamlRuleReader,
};
pub use types::{
    Facts, GroupKind, Rule, RuleBuilder, RuleDefinitionError, Rules, Value, DEFAULT_PRIORITY,
};
pub use validate::validate_descriptor;
