//! Plans: ordered, owned sequences of formulas.
//!
//! [`Plan`] is the plain container. [`ExecutablePlan`] wraps a plan with a
//! cursor and per-slot completion so each formula runs at most once. Both
//! expose the container surface through [`FormulaSequence`].

mod error;
mod executable;

pub use error::StateViolation;
pub use executable::{BatchReport, ExecutablePlan, SlotState};

use crate::config::CraftingConfig;
use crate::env::CraftEnv;
use crate::error::ConstructionError;
use crate::formula::{ApplyOutcome, Formula};

/// Container operations shared by every formula sequence.
///
/// Implementors decide what `apply` means: a plain plan applies every
/// formula, a step sequencer applies only the next pending one.
pub trait FormulaSequence {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: usize) -> Option<&Formula>;

    /// Appends a formula at the end.
    fn push(&mut self, formula: Formula);

    /// Removes and returns the last formula.
    fn remove_last(&mut self) -> Result<Formula, StateViolation>;

    /// Replaces the formula at `index`, returning the previous one.
    fn replace(&mut self, index: usize, formula: Formula) -> Result<Formula, StateViolation>;

    fn apply(&mut self, env: &CraftEnv<'_>) -> Result<Vec<ApplyOutcome>, StateViolation>;
}

/// Ordered sequence of formulas with doubling growth.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plan {
    formulas: Vec<Formula>,
}

impl Plan {
    /// # Errors
    ///
    /// `ConstructionError::EmptyPlan` if `formulas` is empty.
    pub fn new(formulas: Vec<Formula>) -> Result<Self, ConstructionError> {
        if formulas.is_empty() {
            return Err(ConstructionError::EmptyPlan);
        }
        Ok(Self { formulas })
    }

    /// Moves the plan out, leaving `self` empty and reusable.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    pub fn capacity(&self) -> usize {
        self.formulas.capacity()
    }

    pub fn formulas(&self) -> &[Formula] {
        &self.formulas
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Formula> {
        self.formulas.iter()
    }

    pub fn into_formulas(self) -> Vec<Formula> {
        self.formulas
    }

    /// Applies every formula in order.
    ///
    /// All slots are checked before any is applied, so a failure leaves every
    /// formula untouched.
    ///
    /// # Errors
    ///
    /// - `EmptySequence` if the plan has no formulas
    /// - `FormulaUninitialized` if any slot holds an empty formula
    pub fn apply_all(&mut self, env: &CraftEnv<'_>) -> Result<Vec<ApplyOutcome>, StateViolation> {
        if self.formulas.is_empty() {
            return Err(StateViolation::EmptySequence);
        }
        if let Some(index) = self.formulas.iter().position(|f| !f.is_initialized()) {
            return Err(StateViolation::FormulaUninitialized { index });
        }

        self.formulas
            .iter_mut()
            .enumerate()
            .map(|(slot, formula)| formula.apply_in_slot(env, slot))
            .collect()
    }

    pub(crate) fn formula_mut(&mut self, index: usize) -> Option<&mut Formula> {
        self.formulas.get_mut(index)
    }

    fn bounds_check(&self, index: usize) -> Result<(), StateViolation> {
        if index >= self.formulas.len() {
            return Err(StateViolation::IndexOutOfBounds {
                index,
                len: self.formulas.len(),
            });
        }
        Ok(())
    }
}

impl Default for Plan {
    fn default() -> Self {
        Self {
            formulas: Vec::with_capacity(CraftingConfig::DEFAULT_PLAN_CAPACITY),
        }
    }
}

impl FormulaSequence for Plan {
    fn len(&self) -> usize {
        self.formulas.len()
    }

    fn get(&self, index: usize) -> Option<&Formula> {
        self.formulas.get(index)
    }

    fn push(&mut self, formula: Formula) {
        if self.formulas.len() == self.formulas.capacity() {
            let additional = self.formulas.capacity().max(1);
            self.formulas.reserve_exact(additional);
        }
        self.formulas.push(formula);
    }

    fn remove_last(&mut self) -> Result<Formula, StateViolation> {
        self.formulas.pop().ok_or(StateViolation::EmptySequence)
    }

    fn replace(&mut self, index: usize, formula: Formula) -> Result<Formula, StateViolation> {
        self.bounds_check(index)?;
        Ok(std::mem::replace(&mut self.formulas[index], formula))
    }

    fn apply(&mut self, env: &CraftEnv<'_>) -> Result<Vec<ApplyOutcome>, StateViolation> {
        self.apply_all(env)
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a Formula;
    type IntoIter = std::slice::Iter<'a, Formula>;

    fn into_iter(self) -> Self::IntoIter {
        self.formulas.iter()
    }
}
