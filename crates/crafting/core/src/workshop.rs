//! A sequence bundled with the stockpile it draws from.

use crate::env::CraftEnv;
use crate::error::{BatchError, ExecuteError};
use crate::formula::{ApplyOutcome, Formula};
use crate::plan::{BatchReport, ExecutablePlan, FormulaSequence, StateViolation};
use crate::stockpile::{LedgerViolation, Stockpile};

/// Owns one formula sequence and one stockpile.
///
/// Sequence operations forward to `S`, ledger operations to the stockpile.
#[derive(Debug)]
pub struct Workshop<S: FormulaSequence> {
    sequence: S,
    stockpile: Stockpile,
}

impl<S: FormulaSequence> Workshop<S> {
    pub fn new(sequence: S, stockpile: Stockpile) -> Self {
        Self {
            sequence,
            stockpile,
        }
    }

    pub fn sequence(&self) -> &S {
        &self.sequence
    }

    pub fn stockpile(&self) -> &Stockpile {
        &self.stockpile
    }

    pub fn into_parts(self) -> (S, Stockpile) {
        (self.sequence, self.stockpile)
    }

    pub fn push(&mut self, formula: Formula) {
        self.sequence.push(formula);
    }

    pub fn remove_last(&mut self) -> Result<Formula, StateViolation> {
        self.sequence.remove_last()
    }

    pub fn replace(&mut self, index: usize, formula: Formula) -> Result<Formula, StateViolation> {
        self.sequence.replace(index, formula)
    }

    pub fn apply(&mut self, env: &CraftEnv<'_>) -> Result<Vec<ApplyOutcome>, StateViolation> {
        self.sequence.apply(env)
    }

    pub fn increase(&mut self, name: &str, target: u32) -> Result<bool, LedgerViolation> {
        self.stockpile.increase(name, target)
    }

    pub fn decrease(&mut self, name: &str, target: u32) -> Result<bool, LedgerViolation> {
        self.stockpile.decrease(name, target)
    }

    pub fn restock(&mut self) {
        self.stockpile.restock();
    }
}

impl Workshop<ExecutablePlan> {
    pub fn apply_next(&mut self, env: &CraftEnv<'_>) -> Result<ApplyOutcome, ExecuteError> {
        Ok(self.sequence.apply_next(env)?)
    }

    /// Runs a gated batch against the workshop's own stockpile.
    pub fn apply_with_stockpile(
        &mut self,
        env: &CraftEnv<'_>,
    ) -> Result<BatchReport, BatchError> {
        self.sequence.apply_with_stockpile(env, &mut self.stockpile)
    }
}
