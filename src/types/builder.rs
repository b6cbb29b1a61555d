use std::sync::Arc;

use crate::eval::{BoundExpr, Evaluator};
use crate::validate::{validate_shape, RuleShape};

use super::error::RuleDefinitionError;
use super::rule::{Rule, DEFAULT_PRIORITY};

/// Fluent builder for basic rules defined in code rather than from a
/// textual definition.
///
/// Expressions given to [`when`](Self::when) and [`then`](Self::then)
/// go through the same evaluator as descriptor-built rules and are only
/// evaluated when the rule runs.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use declarule::{ExprEvaluator, RuleBuilder};
///
/// let rule = RuleBuilder::new(Arc::new(ExprEvaluator::new()))
///     .name("adult rule")
///     .description("when age is greater than 18, then mark as adult")
///     .priority(1)
///     .when("age > 18")
///     .then("adult = true")
///     .build()
///     .unwrap();
/// assert_eq!(rule.priority(), 1);
/// ```
pub struct RuleBuilder {
    name: String,
    description: String,
    priority: i32,
    condition: Option<String>,
    actions: Vec<String>,
    evaluator: Arc<dyn Evaluator>,
}

impl RuleBuilder {
    #[must_use]
    pub fn new(evaluator: Arc<dyn Evaluator>) -> Self {
        Self {
            name: "rule".to_owned(),
            description: String::new(),
            priority: DEFAULT_PRIORITY,
            condition: None,
            actions: Vec::new(),
            evaluator,
        }
    }

    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_owned();
        self
    }

    #[must_use]
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set the condition expression.
    #[must_use]
    pub fn when(mut self, expression: &str) -> Self {
        self.condition = Some(expression.to_owned());
        self
    }

    /// Append an action expression. May be called multiple times; actions
    /// fire in the order they were added.
    #[must_use]
    pub fn then(mut self, expression: &str) -> Self {
        self.actions.push(expression.to_owned());
        self
    }

    /// Build the rule, validating it through the same shape checks as
    /// the descriptor path.
    ///
    /// # Errors
    ///
    /// Returns [`RuleDefinitionError::MissingCondition`] or
    /// [`RuleDefinitionError::MissingActions`] if `when`/`then` were
    /// never called.
    pub fn build(self) -> Result<Rule, RuleDefinitionError> {
        validate_shape(&RuleShape {
            name: &self.name,
            has_condition: self.condition.is_some(),
            has_actions: !self.actions.is_empty(),
            composite_type: None,
            composing_count: 0,
        })?;
        let Some(condition) = self.condition else {
            return Err(RuleDefinitionError::MissingCondition { rule: self.name });
        };
        let condition = BoundExpr::new(condition, self.evaluator.clone());
        let actions = self
            .actions
            .into_iter()
            .map(|a| BoundExpr::new(a, self.evaluator.clone()))
            .collect();
        Ok(Rule::basic(
            self.name,
            self.description,
            self.priority,
            condition,
            actions,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::ExprEvaluator;
    use crate::types::{Facts, Value};

    fn builder() -> RuleBuilder {
        RuleBuilder::new(Arc::new(ExprEvaluator::new()))
    }

    #[test]
    fn builds_a_working_rule() {
        let rule = builder()
            .name("adult rule")
            .description("when age is greater than 18, then mark as adult")
            .priority(1)
            .when("age > 18")
            .then("adult = true")
            .build()
            .unwrap();

        assert_eq!(rule.name(), "adult rule");
        assert_eq!(rule.priority(), 1);
        assert!(!rule.is_composite());

        let mut facts = Facts::new().with("age", 19_i64);
        assert_eq!(rule.evaluate(&facts), Ok(true));
        rule.execute(&mut facts).unwrap();
        assert_eq!(facts.get("adult"), Some(&Value::Bool(true)));
    }

    #[test]
    fn defaults() {
        let rule = builder().when("true").then("x = 1").build().unwrap();
        assert_eq!(rule.name(), "rule");
        assert_eq!(rule.description(), "");
        assert_eq!(rule.priority(), DEFAULT_PRIORITY);
    }

    #[test]
    fn multiple_actions_fire_in_order() {
        let rule = builder()
            .when("true")
            .then("x = 1")
            .then("x = x + 1")
            .build()
            .unwrap();
        let mut facts = Facts::new();
        rule.execute(&mut facts).unwrap();
        assert_eq!(facts.get("x"), Some(&Value::Int(2)));
    }

    #[test]
    fn missing_condition_fails() {
        let err = builder().name("bad").then("x = 1").build().unwrap_err();
        assert_eq!(err, RuleDefinitionError::MissingCondition { rule: "bad".into() });
    }

    #[test]
    fn missing_actions_fails() {
        let err = builder().name("bad").when("true").build().unwrap_err();
        assert_eq!(err, RuleDefinitionError::MissingActions { rule: "bad".into() });
    }
}
