//! Sequence state errors.

use crate::error::{CraftError, ErrorSeverity};

/// An operation that would break a plan or step-sequencer invariant.
///
/// The rejected mutation never happens; the sequence is left untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateViolation {
    /// The formula is in its empty default state and cannot be applied.
    #[error("formula at index {index} is not initialized")]
    FormulaUninitialized { index: usize },

    #[error("sequence is empty")]
    EmptySequence,

    #[error("index {index} is out of bounds (len: {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Every slot has already been stepped through.
    #[error("step {step} is past the end of a {len}-slot plan")]
    PastEnd { step: usize, len: usize },

    #[error("slot {index} was already completed")]
    AlreadyCompleted { index: usize },

    /// Slots before the cursor are immutable.
    #[error("cannot replace slot {index} behind the cursor at step {step}")]
    ReplaceBeforeStep { index: usize, step: usize },

    /// The last slot holds executed work.
    #[error("cannot remove completed slot {index}")]
    RemoveCompleted { index: usize },

    #[error("cannot remove slot {index} behind the cursor at step {step}")]
    RemoveBehindCursor { index: usize, step: usize },
}

impl CraftError for StateViolation {
    fn severity(&self) -> ErrorSeverity {
        use StateViolation::*;
        match self {
            FormulaUninitialized { .. } => ErrorSeverity::Internal,
            EmptySequence
            | IndexOutOfBounds { .. }
            | PastEnd { .. }
            | AlreadyCompleted { .. }
            | ReplaceBeforeStep { .. }
            | RemoveCompleted { .. }
            | RemoveBehindCursor { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use StateViolation::*;
        match self {
            FormulaUninitialized { .. } => "STATE_FORMULA_UNINITIALIZED",
            EmptySequence => "STATE_EMPTY_SEQUENCE",
            IndexOutOfBounds { .. } => "STATE_INDEX_OUT_OF_BOUNDS",
            PastEnd { .. } => "STATE_PAST_END",
            AlreadyCompleted { .. } => "STATE_ALREADY_COMPLETED",
            ReplaceBeforeStep { .. } => "STATE_REPLACE_BEFORE_STEP",
            RemoveCompleted { .. } => "STATE_REMOVE_COMPLETED",
            RemoveBehindCursor { .. } => "STATE_REMOVE_BEHIND_CURSOR",
        }
    }
}
