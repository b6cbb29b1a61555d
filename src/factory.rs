use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::error::DeclaruleError;
use crate::eval::{BoundExpr, Evaluator};
use crate::reader::{RuleDefinitionReader, RuleDescriptor};
use crate::types::{Rule, RuleDefinitionError, Rules, DEFAULT_PRIORITY};
use crate::validate;

/// Builds executable [`Rule`]s from textual rule definitions.
///
/// The factory holds an immutable reader and a shared evaluator and no
/// mutable state between calls, so one instance can serve any number of
/// construction calls concurrently.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use declarule::{ExprEvaluator, RuleFactory, YamlRuleReader};
///
/// let factory = RuleFactory::new(YamlRuleReader::new(), Arc::new(ExprEvaluator::new()));
/// let rule = factory
///     .create_rule("{name: adult rule, priority: 1, condition: \"age > 18\", actions: [\"adult = true\"]}")
///     .unwrap();
/// assert_eq!(rule.name(), "adult rule");
/// ```
pub struct RuleFactory<R> {
    reader: R,
    evaluator: Arc<dyn Evaluator>,
}

impl<R: RuleDefinitionReader> RuleFactory<R> {
    pub fn new(reader: R, evaluator: Arc<dyn Evaluator>) -> Self {
        Self { reader, evaluator }
    }

    /// Build one rule from the first definition in the source.
    ///
    /// # Errors
    ///
    /// Returns [`DeclaruleError`] on a read failure, a validation
    /// failure anywhere in the definition tree, or an empty source.
    pub fn create_rule(&self, source: &str) -> Result<Rule, DeclaruleError> {
        let descriptors = self.reader.read(source)?;
        let first = descriptors
            .into_iter()
            .next()
            .ok_or(DeclaruleError::NoDefinitions)?;
        Ok(self.build(&first)?)
    }

    /// Build an ordered rule collection from every definition in the
    /// source.
    ///
    /// Definitions are constructed in encounter order, then the
    /// collection's priority sort applies. Any failure aborts the whole
    /// call; no partial collection is returned.
    ///
    /// # Errors
    ///
    /// Returns [`DeclaruleError`] on a read or validation failure.
    pub fn create_rules(&self, source: &str) -> Result<Rules, DeclaruleError> {
        let descriptors = self.reader.read(source)?;
        let mut rules = Rules::new();
        for descriptor in &descriptors {
            rules.register(self.build(descriptor)?);
        }
        Ok(rules)
    }

    /// Read a file and build one rule from its first definition.
    ///
    /// # Errors
    ///
    /// Returns [`DeclaruleError`] on I/O, read, or validation failure.
    pub fn create_rule_from_file(&self, path: impl AsRef<Path>) -> Result<Rule, DeclaruleError> {
        let source = fs::read_to_string(path)?;
        self.create_rule(&source)
    }

    /// Read a file and build a rule collection from its definitions.
    ///
    /// # Errors
    ///
    /// Returns [`DeclaruleError`] on I/O, read, or validation failure.
    pub fn create_rules_from_file(&self, path: impl AsRef<Path>) -> Result<Rules, DeclaruleError> {
        let source = fs::read_to_string(path)?;
        self.create_rules(&source)
    }

    /// Validate a descriptor and build the rule it describes, recursing
    /// depth-first into composing rules.
    fn build(&self, descriptor: &RuleDescriptor) -> Result<Rule, RuleDefinitionError> {
        let group = validate::validate_descriptor(descriptor)?;
        let priority = descriptor.priority.unwrap_or(DEFAULT_PRIORITY);

        match group {
            None => {
                let Some(condition_text) = descriptor.condition.as_deref() else {
                    return Err(RuleDefinitionError::MissingCondition {
                        rule: descriptor.name.clone(),
                    });
                };
                let condition = BoundExpr::new(condition_text, self.evaluator.clone());
                let actions = descriptor
                    .actions
                    .iter()
                    .map(|a| BoundExpr::new(a, self.evaluator.clone()))
                    .collect();
                debug!(rule = %descriptor.name, priority, "built rule from definition");
                Ok(Rule::basic(
                    &descriptor.name,
                    &descriptor.description,
                    priority,
                    condition,
                    actions,
                ))
            }
            Some(group) => {
                let mut children = Vec::with_capacity(descriptor.composing_rules.len());
                for child in &descriptor.composing_rules {
                    children.push(self.build(child)?);
                }
                let rule = Rule::composite(
                    group,
                    &descriptor.name,
                    &descriptor.description,
                    priority,
                    children,
                )?;
                let rule = match descriptor.trigger.as_deref() {
                    Some(trigger) => rule.trigger(trigger)?,
                    None => rule,
                };
                debug!(
                    rule = %descriptor.name,
                    group = %group,
                    composing = descriptor.composing_rules.len(),
                    "built composite rule group from definition"
                );
                Ok(rule)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::ExprEvaluator;
    use crate::reader::{JsonRuleReader, YamlRuleReader};
    use crate::types::GroupKind;

    fn yaml_factory() -> RuleFactory<YamlRuleReader> {
        RuleFactory::new(YamlRuleReader::new(), Arc::new(ExprEvaluator::new()))
    }

    #[test]
    fn create_rule_takes_first_definition() {
        let factory = yaml_factory();
        let rule = factory
            .create_rule(
                "name: first\ncondition: \"true\"\nactions: [\"x = 1\"]\n---\nname: second\ncondition: \"true\"\nactions: [\"y = 1\"]\n",
            )
            .unwrap();
        assert_eq!(rule.name(), "first");
    }

    #[test]
    fn create_rule_on_empty_source_fails() {
        let factory = yaml_factory();
        let err = factory.create_rule("").unwrap_err();
        assert!(matches!(err, DeclaruleError::NoDefinitions));
    }

    #[test]
    fn missing_priority_defaults_to_lowest_precedence() {
        let factory = yaml_factory();
        let rule = factory
            .create_rule("name: r\ncondition: \"true\"\nactions: [\"x = 1\"]\n")
            .unwrap();
        assert_eq!(rule.priority(), DEFAULT_PRIORITY);
    }

    #[test]
    fn validation_failure_aborts_whole_create_rules_call() {
        let factory = RuleFactory::new(JsonRuleReader::new(), Arc::new(ExprEvaluator::new()));
        let source = r#"[
            {"name": "good", "condition": "true", "actions": ["x = 1"]},
            {"name": "bad", "compositeRuleType": "UnitRuleGroup", "composingRules": []}
        ]"#;
        let err = factory.create_rules(source).unwrap_err();
        assert_eq!(
            err.to_string(),
            "composite rules must have composing rules specified"
        );
    }

    #[test]
    fn nested_composite_is_built_recursively() {
        let factory = yaml_factory();
        let source = "\
name: outer
priority: 1
compositeRuleType: ConditionalRuleGroup
composingRules:
  - name: gate
    priority: 1
    condition: \"open\"
    actions: [\"gated = true\"]
  - name: inner group
    priority: 2
    compositeRuleType: UnitRuleGroup
    composingRules:
      - name: leaf
        condition: \"x > 0\"
        actions: [\"leaf = true\"]
";
        let rule = factory.create_rule(source).unwrap();
        assert_eq!(rule.group_kind(), Some(GroupKind::Conditional));
        let inner = &rule.composing_rules()[1];
        assert_eq!(inner.name(), "inner group");
        assert_eq!(inner.group_kind(), Some(GroupKind::Unit));
        assert_eq!(inner.composing_rules()[0].name(), "leaf");
    }

    #[test]
    fn unknown_trigger_in_definition_fails() {
        let factory = yaml_factory();
        let source = "\
name: cascade
compositeRuleType: ConditionalRuleGroup
trigger: nope
composingRules:
  - name: a
    condition: \"true\"
    actions: [\"x = 1\"]
";
        let err = factory.create_rule(source).unwrap_err();
        assert_eq!(
            err.to_string(),
            "composite rule 'cascade' has no composing rule named 'nope'"
        );
    }
}
