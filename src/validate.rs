use std::str::FromStr;

use crate::reader::RuleDescriptor;
use crate::types::{GroupKind, RuleDefinitionError};

/// Format-agnostic view of one rule definition, used for structural
/// validation. Both the descriptor path and the programmatic builder
/// adapt into this shape, so the invariants are stated once.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RuleShape<'a> {
    pub name: &'a str,
    pub has_condition: bool,
    pub has_actions: bool,
    pub composite_type: Option<&'a str>,
    pub composing_count: usize,
}

/// Check a rule shape against the structural invariants, failing on the
/// first violation. Returns the parsed group kind for composite shapes.
pub(crate) fn validate_shape(
    shape: &RuleShape<'_>,
) -> Result<Option<GroupKind>, RuleDefinitionError> {
    match shape.composite_type {
        Some(tag) => {
            let kind = GroupKind::from_str(tag)?;
            if shape.composing_count == 0 {
                return Err(RuleDefinitionError::MissingComposingRules);
            }
            Ok(Some(kind))
        }
        None => {
            if shape.composing_count > 0 {
                return Err(RuleDefinitionError::UnexpectedComposingRules);
            }
            if !shape.has_condition {
                return Err(RuleDefinitionError::MissingCondition {
                    rule: shape.name.to_owned(),
                });
            }
            if !shape.has_actions {
                return Err(RuleDefinitionError::MissingActions {
                    rule: shape.name.to_owned(),
                });
            }
            Ok(None)
        }
    }
}

/// Validate a rule descriptor before construction.
///
/// Pure check with no side effects; composing-rule descriptors are
/// validated by the factory as it recurses into them.
///
/// # Errors
///
/// Returns the first violated [`RuleDefinitionError`].
pub fn validate_descriptor(
    descriptor: &RuleDescriptor,
) -> Result<Option<GroupKind>, RuleDefinitionError> {
    validate_shape(&descriptor.shape())
}
