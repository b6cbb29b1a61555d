use std::fmt;
use std::str::FromStr;

use crate::eval::{BoundExpr, EvalError};

use super::error::RuleDefinitionError;
use super::facts::Facts;

/// Priority assigned when a rule definition does not declare one.
/// Lower values fire first, so this is the lowest possible precedence.
pub const DEFAULT_PRIORITY: i32 = i32::MAX;

/// The three composite rule group semantics. Closed set; any other
/// group name in a rule definition is rejected at validation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// AND-gate: the group holds iff every child holds, and all children fire.
    Unit,
    /// Cascade: a single trigger child gates the group; the remaining
    /// children then fire independently per their own conditions.
    Conditional,
    /// Mutual exclusion: the group holds if any child holds, and only
    /// the highest-precedence matching child fires.
    Activation,
}

impl GroupKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GroupKind::Unit => "UnitRuleGroup",
            GroupKind::Conditional => "ConditionalRuleGroup",
            GroupKind::Activation => "ActivationRuleGroup",
        }
    }
}

impl FromStr for GroupKind {
    type Err = RuleDefinitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UnitRuleGroup" => Ok(GroupKind::Unit),
            "ConditionalRuleGroup" => Ok(GroupKind::Conditional),
            "ActivationRuleGroup" => Ok(GroupKind::Activation),
            other => Err(RuleDefinitionError::InvalidCompositeRuleType {
                found: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named rule: either a basic condition/actions pair, or a composite
/// group owning child rules.
///
/// Rules are created from textual definitions via
/// [`RuleFactory`](crate::RuleFactory), or programmatically via
/// [`RuleBuilder`](super::builder::RuleBuilder) and [`Rule::composite`].
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    description: String,
    priority: i32,
    kind: RuleKind,
}

#[derive(Debug, Clone)]
pub(crate) enum RuleKind {
    Basic {
        condition: BoundExpr,
        actions: Vec<BoundExpr>,
    },
    Composite {
        group: GroupKind,
        /// Children sorted ascending by priority, stable on ties.
        children: Vec<Rule>,
        /// Index of the designated trigger child (conditional groups only).
        /// Defaults to the first child in priority order.
        trigger: Option<usize>,
    },
}

impl Rule {
    pub(crate) fn basic(
        name: impl Into<String>,
        description: impl Into<String>,
        priority: i32,
        condition: BoundExpr,
        actions: Vec<BoundExpr>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            priority,
            kind: RuleKind::Basic { condition, actions },
        }
    }

    /// Construct a composite rule group owning the given children.
    ///
    /// Children are reordered ascending by priority (stable on ties).
    /// The group's own name, description and priority are independent
    /// metadata, never derived from the children.
    ///
    /// # Errors
    ///
    /// Returns [`RuleDefinitionError::MissingComposingRules`] if
    /// `children` is empty.
    pub fn composite(
        group: GroupKind,
        name: impl Into<String>,
        description: impl Into<String>,
        priority: i32,
        mut children: Vec<Rule>,
    ) -> Result<Self, RuleDefinitionError> {
        if children.is_empty() {
            return Err(RuleDefinitionError::MissingComposingRules);
        }
        children.sort_by_key(Rule::priority);
        Ok(Self {
            name: name.into(),
            description: description.into(),
            priority,
            kind: RuleKind::Composite {
                group,
                children,
                trigger: None,
            },
        })
    }

    /// Designate a composing rule as the trigger of a conditional group.
    ///
    /// # Errors
    ///
    /// Returns [`RuleDefinitionError::TriggerNotSupported`] if this rule
    /// is not a conditional group, or
    /// [`RuleDefinitionError::UnknownTrigger`] if no child has the given
    /// name.
    pub fn trigger(mut self, trigger_name: &str) -> Result<Self, RuleDefinitionError> {
        match &mut self.kind {
            RuleKind::Composite {
                group: GroupKind::Conditional,
                children,
                trigger,
            } => {
                let idx = children
                    .iter()
                    .position(|c| c.name == trigger_name)
                    .ok_or_else(|| RuleDefinitionError::UnknownTrigger {
                        rule: self.name.clone(),
                        trigger: trigger_name.to_owned(),
                    })?;
                *trigger = Some(idx);
                Ok(self)
            }
            _ => Err(RuleDefinitionError::TriggerNotSupported {
                rule: self.name.clone(),
            }),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Whether this rule is a composite rule group.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        matches!(self.kind, RuleKind::Composite { .. })
    }

    /// The group kind, if this rule is composite.
    #[must_use]
    pub fn group_kind(&self) -> Option<GroupKind> {
        match &self.kind {
            RuleKind::Composite { group, .. } => Some(*group),
            RuleKind::Basic { .. } => None,
        }
    }

    /// Composing rules in priority order. Empty for basic rules.
    #[must_use]
    pub fn composing_rules(&self) -> &[Rule] {
        match &self.kind {
            RuleKind::Composite { children, .. } => children,
            RuleKind::Basic { .. } => &[],
        }
    }

    /// Evaluate this rule's condition against the given facts.
    ///
    /// For composite groups the condition is synthesized from the
    /// children: all of them (unit), the trigger alone (conditional), or
    /// any of them (activation). A child evaluation error propagates
    /// immediately without evaluating siblings.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError`] if a bound condition expression fails.
    pub fn evaluate(&self, facts: &Facts) -> Result<bool, EvalError> {
        match &self.kind {
            RuleKind::Basic { condition, .. } => condition.eval_bool(facts),
            RuleKind::Composite {
                group, children, trigger,
            } => match group {
                GroupKind::Unit => {
                    for child in children {
                        if !child.evaluate(facts)? {
                            return Ok(false);
                        }
                    }
                    Ok(true)
                }
                GroupKind::Conditional => children[trigger.unwrap_or(0)].evaluate(facts),
                GroupKind::Activation => {
                    for child in children {
                        if child.evaluate(facts)? {
                            return Ok(true);
                        }
                    }
                    Ok(false)
                }
            },
        }
    }

    /// Fire this rule's actions against the given facts.
    ///
    /// The engine is expected to call [`evaluate`](Self::evaluate) first
    /// and only execute rules whose condition held; a basic rule does
    /// not re-check its condition here. Composite groups fire per their
    /// semantics: unit groups execute every child in priority order,
    /// conditional groups execute the trigger and then each remaining
    /// child that independently holds, activation groups execute only
    /// the first child in priority order that holds.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError`] if an action or a child condition fails;
    /// remaining children are not executed.
    pub fn execute(&self, facts: &mut Facts) -> Result<(), EvalError> {
        match &self.kind {
            RuleKind::Basic { actions, .. } => {
                for action in actions {
                    action.run(facts)?;
                }
                Ok(())
            }
            RuleKind::Composite {
                group, children, trigger,
            } => match group {
                GroupKind::Unit => {
                    for child in children {
                        child.execute(facts)?;
                    }
                    Ok(())
                }
                GroupKind::Conditional => {
                    let trigger_idx = trigger.unwrap_or(0);
                    children[trigger_idx].execute(facts)?;
                    for (idx, child) in children.iter().enumerate() {
                        if idx != trigger_idx && child.evaluate(facts)? {
                            child.execute(facts)?;
                        }
                    }
                    Ok(())
                }
                GroupKind::Activation => {
                    for child in children {
                        if child.evaluate(facts)? {
                            return child.execute(facts);
                        }
                    }
                    Ok(())
                }
            },
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            RuleKind::Basic { .. } => write!(f, "{} (priority {})", self.name, self.priority),
            RuleKind::Composite { group, children, .. } => write!(
                f,
                "{} ({}, {} composing rules, priority {})",
                self.name,
                group,
                children.len(),
                self.priority
            ),
        }
    }
}
