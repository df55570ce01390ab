//! Error types for tree construction and synthesis

use crate::aspect::Violation;
use thiserror::Error;

/// Errors raised while building the construct tree
#[derive(Debug, Error)]
pub enum CoreError {
    /// A sibling with the same local id already exists
    #[error("duplicate child id '{id}' under '{parent_path}'")]
    DuplicateChildId { parent_path: String, id: String },

    /// Local ids must be non-empty and must not contain path separators
    #[error("invalid construct id '{id}': must be non-empty and must not contain '/'")]
    InvalidId { id: String },

    /// Resource nodes are leaves; children can only hang off constructs
    #[error("cannot add a child to resource node '{parent_path}'")]
    ChildOfResource { parent_path: String },
}

/// Errors raised by `App::synth`
#[derive(Debug, Error)]
pub enum SynthError {
    /// One or more aspects recorded errors; no partial assembly is produced
    #[error("synthesis failed with {} policy violation(s)", .0.len())]
    PolicyViolations(Vec<Violation>),

    #[error(transparent)]
    Core(#[from] CoreError),
}
