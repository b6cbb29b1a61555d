use serde::Deserialize;

use crate::validate::RuleShape;

/// Parse-time representation of one rule definition, produced by a
/// [`RuleDefinitionReader`](super::RuleDefinitionReader) and consumed
/// exactly once by the factory.
///
/// Condition and action texts are opaque strings handed verbatim to the
/// expression evaluator; nothing about them is checked at parse time.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleDescriptor {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Absent means lowest precedence
    /// ([`DEFAULT_PRIORITY`](crate::DEFAULT_PRIORITY)).
    #[serde(default)]
    pub priority: Option<i32>,

    /// Required unless the definition is composite.
    #[serde(default)]
    pub condition: Option<String>,

    /// Required and non-empty unless the definition is composite.
    #[serde(default)]
    pub actions: Vec<String>,

    /// One of `UnitRuleGroup`, `ConditionalRuleGroup`,
    /// `ActivationRuleGroup`.
    #[serde(default, rename = "compositeRuleType")]
    pub composite_rule_type: Option<String>,

    /// Nested definitions; required and non-empty iff
    /// `compositeRuleType` is present. `rules` is accepted as an alias.
    #[serde(default, rename = "composingRules", alias = "rules")]
    pub composing_rules: Vec<RuleDescriptor>,

    /// Name of the composing rule that gates a conditional group.
    /// Defaults to the composing rule with the highest precedence.
    #[serde(default)]
    pub trigger: Option<String>,
}

impl RuleDescriptor {
    #[must_use]
    pub fn is_composite(&self) -> bool {
        self.composite_rule_type.is_some()
    }

    pub(crate) fn shape(&self) -> RuleShape<'_> {
        RuleShape {
            name: &self.name,
            has_condition: self.condition.is_some(),
            has_actions: !self.actions.is_empty(),
            composite_type: self.composite_rule_type.as_deref(),
            composing_count: self.composing_rules.len(),
        }
    }
}
