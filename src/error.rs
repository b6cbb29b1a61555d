use thiserror::Error;

use crate::reader::ReadError;
use crate::types::RuleDefinitionError;

/// Unified error type covering definition reading, validation,
/// construction and I/O.
///
/// Returned by the [`RuleFactory`](crate::RuleFactory) entry points.
#[derive(Debug, Error)]
pub enum DeclaruleError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Definition(#[from] RuleDefinitionError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("no rule definitions found in source")]
    NoDefinitions,
}
