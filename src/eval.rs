use std::fmt;
use std::sync::Arc;

use evalexpr::{
    eval_boolean_with_context, eval_with_context_mut, ContextWithMutableVariables,
    HashMapContext, IterateVariablesContext,
};
use thiserror::Error;

use crate::types::{Facts, Value};

/// Error raised when a bound expression is evaluated against facts.
///
/// Expression text is never checked at construction time; a malformed
/// expression or a reference to an undefined fact surfaces here, on the
/// first evaluation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("failed to evaluate expression '{expression}': {message}")]
pub struct EvalError {
    pub expression: String,
    pub message: String,
}

impl EvalError {
    pub(crate) fn new(expression: impl Into<String>, message: impl fmt::Display) -> Self {
        Self {
            expression: expression.into(),
            message: message.to_string(),
        }
    }
}

/// Evaluates textual expressions against a [`Facts`] scope.
///
/// Conditions produce a boolean; actions mutate the facts as a side
/// effect. Implementations must be usable from multiple threads, since
/// one evaluator instance is shared by every rule a factory builds.
pub trait Evaluator: Send + Sync {
    /// Evaluate a condition expression, resolving facts as named variables.
    fn eval_condition(&self, expression: &str, facts: &Facts) -> Result<bool, EvalError>;

    /// Execute an action expression for its side effects on the facts.
    fn eval_action(&self, expression: &str, facts: &mut Facts) -> Result<(), EvalError>;
}

/// Default [`Evaluator`] backed by the `evalexpr` expression language.
///
/// Supports arithmetic, comparison and logical operators plus variable
/// assignment in actions (e.g. `adult = true`). Assigned variables are
/// written back into the facts after the action runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExprEvaluator;

impl ExprEvaluator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn context_from(facts: &Facts) -> Result<HashMapContext, EvalError> {
        let mut context = HashMapContext::new();
        for (name, value) in facts.iter() {
            context
                .set_value(name.to_owned(), to_eval_value(value))
                .map_err(|e| EvalError::new(name, e))?;
        }
        Ok(context)
    }
}

impl Evaluator for ExprEvaluator {
    fn eval_condition(&self, expression: &str, facts: &Facts) -> Result<bool, EvalError> {
        let context = Self::context_from(facts)?;
        eval_boolean_with_context(expression, &context)
            .map_err(|e| EvalError::new(expression, e))
    }

    fn eval_action(&self, expression: &str, facts: &mut Facts) -> Result<(), EvalError> {
        let mut context = Self::context_from(facts)?;
        eval_with_context_mut(expression, &mut context)
            .map_err(|e| EvalError::new(expression, e))?;
        for (name, value) in context.iter_variables() {
            // Tuples and empty values have no fact representation.
            if let Some(value) = from_eval_value(value) {
                facts.put(name, value);
            }
        }
        Ok(())
    }
}

fn to_eval_value(value: &Value) -> evalexpr::Value {
    match value {
        Value::Int(v) => evalexpr::Value::Int(*v),
        Value::Float(v) => evalexpr::Value::Float(*v),
        Value::Bool(v) => evalexpr::Value::Boolean(*v),
        Value::String(v) => evalexpr::Value::String(v.clone()),
    }
}

fn from_eval_value(value: evalexpr::Value) -> Option<Value> {
    match value {
        evalexpr::Value::Int(v) => Some(Value::Int(v)),
        evalexpr::Value::Float(v) => Some(Value::Float(v)),
        evalexpr::Value::Boolean(v) => Some(Value::Bool(v)),
        evalexpr::Value::String(v) => Some(Value::String(v)),
        evalexpr::Value::Tuple(_) | evalexpr::Value::Empty => None,
    }
}

/// An expression handle lazily bound to a shared evaluator.
///
/// The text is stored verbatim and evaluated on demand against the facts
/// supplied at call time, once per engine cycle.
#[derive(Clone)]
pub struct BoundExpr {
    text: String,
    evaluator: Arc<dyn Evaluator>,
}

impl BoundExpr {
    pub(crate) fn new(text: impl Into<String>, evaluator: Arc<dyn Evaluator>) -> Self {
        Self {
            text: text.into(),
            evaluator,
        }
    }

    /// The expression text as written in the rule definition.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn eval_bool(&self, facts: &Facts) -> Result<bool, EvalError> {
        self.evaluator.eval_condition(&self.text, facts)
    }

    pub(crate) fn run(&self, facts: &mut Facts) -> Result<(), EvalError> {
        self.evaluator.eval_action(&self.text, facts)
    }
}

impl fmt::Debug for BoundExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundExpr")
            .field("text", &self.text)
            .finish_non_exhaustive()
    }
}
