use tracing::{debug, warn};

use crate::eval::EvalError;
use crate::types::{Facts, Rules};

/// Tuning parameters for [`RulesEngine`].
#[derive(Debug, Clone, Copy)]
pub struct EngineParams {
    /// Stop the cycle after the first rule that fires.
    pub skip_on_first_applied_rule: bool,
    /// Abort the cycle, returning the error, when a rule fails to
    /// evaluate or execute. When false, failures are logged and the
    /// cycle continues with the remaining rules.
    pub skip_on_first_failed_rule: bool,
    /// Stop the cycle at the first rule whose condition does not hold.
    pub skip_on_first_non_triggered_rule: bool,
    /// Rules with a priority above this value are not evaluated.
    pub priority_threshold: i32,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            skip_on_first_applied_rule: false,
            skip_on_first_failed_rule: false,
            skip_on_first_non_triggered_rule: false,
            priority_threshold: i32::MAX,
        }
    }
}

/// Fires rules against facts, one cycle at a time.
///
/// A cycle walks the collection in ascending priority order, evaluates
/// each rule's condition against the facts and executes the actions of
/// the rules whose condition holds. The engine owns the per-rule error
/// policy; composite groups themselves stay fail-fast internally.
#[derive(Debug, Clone, Default)]
pub struct RulesEngine {
    params: EngineParams,
}

impl RulesEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_params(params: EngineParams) -> Self {
        Self { params }
    }

    #[must_use]
    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    /// Run one evaluation cycle.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError`] only when
    /// [`skip_on_first_failed_rule`](EngineParams::skip_on_first_failed_rule)
    /// is set; otherwise failures are logged and the cycle continues.
    pub fn fire(&self, rules: &Rules, facts: &mut Facts) -> Result<(), EvalError> {
        for rule in rules {
            if rule.priority() > self.params.priority_threshold {
                debug!(
                    rule = %rule.name(),
                    priority = rule.priority(),
                    threshold = self.params.priority_threshold,
                    "priority threshold reached, stopping cycle"
                );
                break;
            }
            match rule.evaluate(facts) {
                Ok(true) => {
                    debug!(rule = %rule.name(), "rule triggered");
                    match rule.execute(facts) {
                        Ok(()) => {
                            debug!(rule = %rule.name(), "rule applied");
                            if self.params.skip_on_first_applied_rule {
                                break;
                            }
                        }
                        Err(err) => {
                            warn!(rule = %rule.name(), error = %err, "rule execution failed");
                            if self.params.skip_on_first_failed_rule {
                                return Err(err);
                            }
                        }
                    }
                }
                Ok(false) => {
                    debug!(rule = %rule.name(), "rule not triggered");
                    if self.params.skip_on_first_non_triggered_rule {
                        break;
                    }
                }
                Err(err) => {
                    warn!(
                        rule = %rule.name(),
                        error = %err,
                        "condition evaluation failed, treating rule as not triggered"
                    );
                    if self.params.skip_on_first_failed_rule {
                        return Err(err);
                    }
                    if self.params.skip_on_first_non_triggered_rule {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    /// Evaluate every rule's condition without firing any actions.
    ///
    /// Returns `(name, triggered)` pairs in priority order; a rule whose
    /// condition fails to evaluate reports as not triggered.
    #[must_use]
    pub fn check(&self, rules: &Rules, facts: &Facts) -> Vec<(String, bool)> {
        rules
            .iter()
            .map(|rule| {
                let triggered = rule.evaluate(facts).unwrap_or_else(|err| {
                    warn!(rule = %rule.name(), error = %err, "condition evaluation failed");
                    false
                });
                (rule.name().to_owned(), triggered)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::eval::ExprEvaluator;
    use crate::types::{Rule, RuleBuilder, Value};

    fn rule(name: &str, priority: i32, condition: &str, action: &str) -> Rule {
        RuleBuilder::new(Arc::new(ExprEvaluator::new()))
            .name(name)
            .priority(priority)
            .when(condition)
            .then(action)
            .build()
            .unwrap()
    }

    fn rules(items: Vec<Rule>) -> Rules {
        items.into_iter().collect()
    }

    #[test]
    fn fires_in_priority_order() {
        let rules = rules(vec![
            rule("second", 2, "true", "order = order + \"b\""),
            rule("first", 1, "true", "order = order + \"a\""),
        ]);
        let mut facts = Facts::new().with("order", "");
        RulesEngine::new().fire(&rules, &mut facts).unwrap();
        assert_eq!(facts.get("order"), Some(&Value::String("ab".into())));
    }

    #[test]
    fn non_triggered_rules_do_not_fire() {
        let rules = rules(vec![
            rule("yes", 1, "x > 0", "fired_yes = true"),
            rule("no", 2, "x < 0", "fired_no = true"),
        ]);
        let mut facts = Facts::new().with("x", 1_i64);
        RulesEngine::new().fire(&rules, &mut facts).unwrap();
        assert_eq!(facts.get("fired_yes"), Some(&Value::Bool(true)));
        assert_eq!(facts.get("fired_no"), None);
    }

    #[test]
    fn skip_on_first_applied_rule() {
        let engine = RulesEngine::with_params(EngineParams {
            skip_on_first_applied_rule: true,
            ..EngineParams::default()
        });
        let rules = rules(vec![
            rule("a", 1, "true", "fired_a = true"),
            rule("b", 2, "true", "fired_b = true"),
        ]);
        let mut facts = Facts::new();
        engine.fire(&rules, &mut facts).unwrap();
        assert_eq!(facts.get("fired_a"), Some(&Value::Bool(true)));
        assert_eq!(facts.get("fired_b"), None);
    }

    #[test]
    fn skip_on_first_non_triggered_rule() {
        let engine = RulesEngine::with_params(EngineParams {
            skip_on_first_non_triggered_rule: true,
            ..EngineParams::default()
        });
        let rules = rules(vec![
            rule("blocker", 1, "false", "fired_blocker = true"),
            rule("after", 2, "true", "fired_after = true"),
        ]);
        let mut facts = Facts::new();
        engine.fire(&rules, &mut facts).unwrap();
        assert_eq!(facts.get("fired_after"), None);
    }

    #[test]
    fn priority_threshold_stops_cycle() {
        let engine = RulesEngine::with_params(EngineParams {
            priority_threshold: 5,
            ..EngineParams::default()
        });
        let rules = rules(vec![
            rule("in_range", 1, "true", "fired_in = true"),
            rule("beyond", 10, "true", "fired_beyond = true"),
        ]);
        let mut facts = Facts::new();
        engine.fire(&rules, &mut facts).unwrap();
        assert_eq!(facts.get("fired_in"), Some(&Value::Bool(true)));
        assert_eq!(facts.get("fired_beyond"), None);
    }

    #[test]
    fn evaluation_failure_continues_by_default() {
        let rules = rules(vec![
            rule("broken", 1, "undefined_fact > 0", "fired_broken = true"),
            rule("fine", 2, "true", "fired_fine = true"),
        ]);
        let mut facts = Facts::new();
        RulesEngine::new().fire(&rules, &mut facts).unwrap();
        assert_eq!(facts.get("fired_broken"), None);
        assert_eq!(facts.get("fired_fine"), Some(&Value::Bool(true)));
    }

    #[test]
    fn evaluation_failure_aborts_with_skip_on_first_failed() {
        let engine = RulesEngine::with_params(EngineParams {
            skip_on_first_failed_rule: true,
            ..EngineParams::default()
        });
        let rules = rules(vec![
            rule("broken", 1, "undefined_fact > 0", "x = 1"),
            rule("fine", 2, "true", "fired_fine = true"),
        ]);
        let mut facts = Facts::new();
        assert!(engine.fire(&rules, &mut facts).is_err());
        assert_eq!(facts.get("fired_fine"), None);
    }

    #[test]
    fn check_reports_without_firing() {
        let rules = rules(vec![
            rule("yes", 1, "x > 0", "fired = true"),
            rule("no", 2, "x < 0", "fired = true"),
        ]);
        let facts = Facts::new().with("x", 1_i64);
        let report = RulesEngine::new().check(&rules, &facts);
        assert_eq!(
            report,
            vec![("yes".to_owned(), true), ("no".to_owned(), false)]
        );
    }
}
