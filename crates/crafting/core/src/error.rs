//! Common error infrastructure for crafting-core.
//!
//! Each failure class has its own enum:
//!
//! - [`ConstructionError`]: a value could not be built (never partially constructed)
//! - [`StateViolation`](crate::plan::StateViolation): an operation would break a
//!   sequence or formula invariant
//! - [`LedgerViolation`](crate::stockpile::LedgerViolation): a stockpile operation
//!   was rejected
//!
//! [`ExecuteError`] wraps the latter two for operations that touch both a
//! sequence and a stockpile. [`BatchError`] additionally carries the partial
//! report of a gated batch that stopped early.

use crate::formula::ListSide;
use crate::plan::{BatchReport, StateViolation};
use crate::stockpile::LedgerViolation;

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Retrying later (e.g. after restocking) may succeed.
    Recoverable,

    /// Invalid input, should not retry without changes.
    Validation,

    /// Unexpected state inconsistency. Indicates a caller bug.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all crafting-core errors.
///
/// - All error enums implement this trait
/// - `Display`/`Error` come from `thiserror`
/// - Severity is classified by recoverability, not impact
pub trait CraftError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for the error variant, useful in tests and metrics.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Errors raised while constructing formulas, plans, and stockpiles.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstructionError {
    /// A resource name was empty or contained only whitespace.
    #[error("{side} resource name at index {index} is empty or whitespace")]
    BlankResourceName { side: ListSide, index: usize },

    /// Paired name and quantity lists had different lengths.
    #[error("{side} names ({names}) and quantities ({quantities}) differ in length")]
    LengthMismatch {
        side: ListSide,
        names: usize,
        quantities: usize,
    },

    /// A formula needs at least one input or output.
    #[error("formula has neither inputs nor outputs")]
    EmptyFormula,

    /// A resource name outside any formula list or stockpile was blank.
    #[error("resource name is empty or whitespace")]
    BlankName,

    #[error("proficiency level {level} exceeds maximum {max}")]
    ProficiencyOutOfRange { level: u8, max: u8 },

    #[error("plan must contain at least one formula")]
    EmptyPlan,

    /// The starting cursor does not point at an existing slot.
    #[error("initial step {step} is invalid for a plan of {len} formulas")]
    InvalidInitialStep { step: usize, len: usize },

    #[error("{states} slot states supplied for {len} formulas")]
    SlotStateMismatch { states: usize, len: usize },

    #[error("stockpile must contain at least one resource")]
    EmptyStockpile,

    /// A stockpile was seeded with a blank resource name.
    #[error("stockpile resource name is empty or whitespace")]
    BlankStockpileName,
}

impl CraftError for ConstructionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use ConstructionError::*;
        match self {
            BlankResourceName { .. } => "CONSTRUCT_BLANK_RESOURCE_NAME",
            LengthMismatch { .. } => "CONSTRUCT_LENGTH_MISMATCH",
            EmptyFormula => "CONSTRUCT_EMPTY_FORMULA",
            BlankName => "CONSTRUCT_BLANK_NAME",
            ProficiencyOutOfRange { .. } => "CONSTRUCT_PROFICIENCY_OUT_OF_RANGE",
            EmptyPlan => "CONSTRUCT_EMPTY_PLAN",
            InvalidInitialStep { .. } => "CONSTRUCT_INVALID_INITIAL_STEP",
            SlotStateMismatch { .. } => "CONSTRUCT_SLOT_STATE_MISMATCH",
            EmptyStockpile => "CONSTRUCT_EMPTY_STOCKPILE",
            BlankStockpileName => "CONSTRUCT_BLANK_STOCKPILE_NAME",
        }
    }
}

/// Errors surfaced by operations that drive a sequence against a stockpile.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecuteError {
    #[error("sequence operation failed: {0}")]
    State(#[from] StateViolation),

    #[error("stockpile operation failed: {0}")]
    Ledger(#[from] LedgerViolation),
}

impl CraftError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            ExecuteError::State(error) => error.severity(),
            ExecuteError::Ledger(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ExecuteError::State(error) => error.error_code(),
            ExecuteError::Ledger(error) => error.error_code(),
        }
    }
}

/// A ledger-gated batch that stopped partway.
///
/// `report` lists the slots applied and settled before the failing one; those
/// stay applied.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("batch stopped after {} applied slots: {source}", .report.applied.len())]
pub struct BatchError {
    pub report: BatchReport,
    pub source: ExecuteError,
}

impl BatchError {
    pub(crate) fn new(report: BatchReport, source: impl Into<ExecuteError>) -> Self {
        Self {
            report,
            source: source.into(),
        }
    }
}

impl CraftError for BatchError {
    fn severity(&self) -> ErrorSeverity {
        self.source.severity()
    }

    fn error_code(&self) -> &'static str {
        self.source.error_code()
    }
}
