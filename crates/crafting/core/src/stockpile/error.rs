//! Stockpile errors.

use crate::error::{CraftError, ErrorSeverity};

/// A rejected stockpile operation. The stockpile is left unchanged.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LedgerViolation {
    #[error("resource '{name}' is not tracked by this stockpile")]
    UnknownResource { name: String },

    /// `increase` takes an absolute target that must not be below the current value.
    #[error("cannot increase '{name}' to {requested}: current quantity is {current}")]
    IncreaseBelowCurrent {
        name: String,
        current: u32,
        requested: u32,
    },

    /// `decrease` takes an absolute target that must not exceed the current value.
    #[error("cannot decrease '{name}' to {requested}: current quantity is {current}")]
    DecreaseAboveCurrent {
        name: String,
        current: u32,
        requested: u32,
    },

    #[error("insufficient '{name}': {available} available, {required} required")]
    Insufficient {
        name: String,
        available: u32,
        required: u64,
    },

    #[error("quantity of '{name}' would overflow")]
    Overflow { name: String },

    #[error("resource '{name}' listed more than once")]
    DuplicateResource { name: String },

    #[error("none of the requested resources has a positive quantity")]
    NothingToSplit,

    /// A stockpile always tracks at least one resource.
    #[error("operation would leave the stockpile without resources")]
    WouldEmpty,
}

impl CraftError for LedgerViolation {
    fn severity(&self) -> ErrorSeverity {
        use LedgerViolation::*;
        match self {
            Insufficient { .. } => ErrorSeverity::Recoverable,
            Overflow { .. } => ErrorSeverity::Internal,
            UnknownResource { .. }
            | IncreaseBelowCurrent { .. }
            | DecreaseAboveCurrent { .. }
            | DuplicateResource { .. }
            | NothingToSplit
            | WouldEmpty => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use LedgerViolation::*;
        match self {
            UnknownResource { .. } => "LEDGER_UNKNOWN_RESOURCE",
            IncreaseBelowCurrent { .. } => "LEDGER_INCREASE_BELOW_CURRENT",
            DecreaseAboveCurrent { .. } => "LEDGER_DECREASE_ABOVE_CURRENT",
            Insufficient { .. } => "LEDGER_INSUFFICIENT",
            Overflow { .. } => "LEDGER_OVERFLOW",
            DuplicateResource { .. } => "LEDGER_DUPLICATE_RESOURCE",
            NothingToSplit => "LEDGER_NOTHING_TO_SPLIT",
            WouldEmpty => "LEDGER_WOULD_EMPTY",
        }
    }
}
