use thiserror::Error;

/// Structural validation and construction errors for rule definitions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleDefinitionError {
    #[error("invalid composite rule type '{found}', must be one of [UnitRuleGroup, ConditionalRuleGroup, ActivationRuleGroup]")]
    InvalidCompositeRuleType { found: String },

    #[error("composite rules must have composing rules specified")]
    MissingComposingRules,

    #[error("non-composite rules cannot have composing rules")]
    UnexpectedComposingRules,

    #[error("rule '{rule}' has no condition")]
    MissingCondition { rule: String },

    #[error("rule '{rule}' has no actions")]
    MissingActions { rule: String },

    #[error("composite rule '{rule}' has no composing rule named '{trigger}'")]
    UnknownTrigger { rule: String, trigger: String },

    #[error("a trigger can only be designated on a conditional rule group (rule '{rule}')")]
    TriggerNotSupported { rule: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_composite_rule_type_message() {
        let err = RuleDefinitionError::InvalidCompositeRuleType {
            found: "MajorityRuleGroup".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid composite rule type 'MajorityRuleGroup', must be one of \
             [UnitRuleGroup, ConditionalRuleGroup, ActivationRuleGroup]"
        );
    }

    #[test]
    fn missing_composing_rules_message() {
        assert_eq!(
            RuleDefinitionError::MissingComposingRules.to_string(),
            "composite rules must have composing rules specified"
        );
    }

    #[test]
    fn unexpected_composing_rules_message() {
        assert_eq!(
            RuleDefinitionError::UnexpectedComposingRules.to_string(),
            "non-composite rules cannot have composing rules"
        );
    }

    #[test]
    fn missing_condition_message() {
        let err = RuleDefinitionError::MissingCondition {
            rule: "adult rule".into(),
        };
        assert_eq!(err.to_string(), "rule 'adult rule' has no condition");
    }

    #[test]
    fn unknown_trigger_message() {
        let err = RuleDefinitionError::UnknownTrigger {
            rule: "cascade".into(),
            trigger: "missing".into(),
        };
        assert_eq!(
            err.to_string(),
            "composite rule 'cascade' has no composing rule named 'missing'"
        );
    }
}
