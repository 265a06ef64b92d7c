//! Step sequencer over a [`Plan`].
//!
//! The cursor (`step`) names the next slot to apply and never moves backward.
//! Slots behind the cursor are frozen: they cannot be replaced, and the last
//! slot cannot be removed once the cursor has passed it.

use super::{FormulaSequence, Plan, StateViolation};
use crate::env::CraftEnv;
use crate::error::{BatchError, ConstructionError};
use crate::formula::{ApplyOutcome, Formula};
use crate::stockpile::{LedgerViolation, Stockpile};

/// Execution state of one plan slot.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SlotState {
    #[default]
    Pending,
    Completed,
}

/// Result of one ledger-gated batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Applied slots with their outcomes, in slot order.
    pub applied: Vec<(usize, ApplyOutcome)>,
    /// Slots whose inputs the stockpile could not cover.
    pub skipped: Vec<usize>,
}

impl BatchReport {
    pub fn applied_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.applied.iter().map(|(slot, _)| *slot)
    }
}

/// A plan applied one slot at a time.
///
/// Deserialization re-checks the cursor and slot-state invariants.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "ExecutablePlanParts")
)]
pub struct ExecutablePlan {
    plan: Plan,
    step: usize,
    slots: Vec<SlotState>,
}

/// Unchecked wire form of [`ExecutablePlan`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct ExecutablePlanParts {
    plan: Plan,
    step: usize,
    slots: Vec<SlotState>,
}

#[cfg(feature = "serde")]
impl TryFrom<ExecutablePlanParts> for ExecutablePlan {
    type Error = ConstructionError;

    fn try_from(parts: ExecutablePlanParts) -> Result<Self, Self::Error> {
        Self::from_parts(parts.plan, parts.step, parts.slots)
    }
}

impl ExecutablePlan {
    /// Wraps `formulas` with every slot pending.
    ///
    /// # Errors
    ///
    /// `InvalidInitialStep` if `current_step` does not index a formula,
    /// which includes every step for an empty list.
    pub fn new(formulas: Vec<Formula>, current_step: usize) -> Result<Self, ConstructionError> {
        let states = vec![SlotState::Pending; formulas.len()];
        Self::with_slot_states(formulas, current_step, states)
    }

    /// Wraps `formulas` with explicitly seeded slot states.
    ///
    /// # Errors
    ///
    /// - `InvalidInitialStep` if `current_step` does not index a formula
    /// - `SlotStateMismatch` if `states` and `formulas` differ in length
    pub fn with_slot_states(
        formulas: Vec<Formula>,
        current_step: usize,
        states: Vec<SlotState>,
    ) -> Result<Self, ConstructionError> {
        let len = formulas.len();
        if current_step >= len {
            return Err(ConstructionError::InvalidInitialStep {
                step: current_step,
                len,
            });
        }
        if states.len() != len {
            return Err(ConstructionError::SlotStateMismatch {
                states: states.len(),
                len,
            });
        }

        Ok(Self {
            plan: Plan::new(formulas)?,
            step: current_step,
            slots: states,
        })
    }

    /// Reassembles a sequencer from saved state.
    ///
    /// Unlike construction this accepts a finished cursor (`step == len`) and
    /// an empty plan, both of which a live sequencer can reach.
    pub(crate) fn from_parts(
        plan: Plan,
        step: usize,
        slots: Vec<SlotState>,
    ) -> Result<Self, ConstructionError> {
        let len = plan.len();
        if slots.len() != len {
            return Err(ConstructionError::SlotStateMismatch {
                states: slots.len(),
                len,
            });
        }
        if step > len {
            return Err(ConstructionError::InvalidInitialStep { step, len });
        }
        Ok(Self { plan, step, slots })
    }

    /// Index of the next slot `apply_next` will run.
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn slot_state(&self, index: usize) -> Option<SlotState> {
        self.slots.get(index).copied()
    }

    pub fn slot_states(&self) -> &[SlotState] {
        &self.slots
    }

    /// True once the cursor has passed the last slot.
    pub fn is_finished(&self) -> bool {
        self.step >= self.plan.len()
    }

    /// Number of slots from the cursor to the end.
    pub fn remaining(&self) -> usize {
        self.plan.len().saturating_sub(self.step)
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// Moves the sequencer out, leaving `self` empty and reusable.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Applies the slot at the cursor, marks it completed and advances.
    ///
    /// # Errors
    ///
    /// - `PastEnd` if every slot has been stepped through
    /// - `AlreadyCompleted` if the slot at the cursor was seeded as completed
    /// - `FormulaUninitialized` if the slot holds an empty formula
    pub fn apply_next(&mut self, env: &CraftEnv<'_>) -> Result<ApplyOutcome, StateViolation> {
        let step = self.step;
        let len = self.plan.len();
        if step >= len {
            return Err(StateViolation::PastEnd { step, len });
        }
        let (Some(state), Some(formula)) = (self.slots.get_mut(step), self.plan.formula_mut(step))
        else {
            return Err(StateViolation::IndexOutOfBounds { index: step, len });
        };
        if *state == SlotState::Completed {
            return Err(StateViolation::AlreadyCompleted { index: step });
        }

        let outcome = formula.apply_in_slot(env, step)?;

        *state = SlotState::Completed;
        self.step += 1;

        tracing::debug!(slot = step, next = self.step, len, "plan step completed");
        Ok(outcome)
    }

    /// Applies every slot whose inputs the stockpile can cover.
    ///
    /// Each applied slot debits its inputs and credits its nominal outputs,
    /// creating output resources the stockpile has not seen before. Slots the
    /// stockpile cannot cover are skipped. The cursor and slot states are not
    /// touched, so a batch can be run repeatedly.
    ///
    /// # Errors
    ///
    /// Failures carry the report of the slots settled before them.
    ///
    /// - `State(FormulaUninitialized)` if any slot holds an empty formula;
    ///   checked before anything is applied
    /// - `Ledger(Overflow)` if crediting a slot's outputs would overflow; that
    ///   slot is neither applied nor settled, earlier slots stay applied
    pub fn apply_with_stockpile(
        &mut self,
        env: &CraftEnv<'_>,
        stockpile: &mut Stockpile,
    ) -> Result<BatchReport, BatchError> {
        if let Some(index) = self.plan.iter().position(|f| !f.is_initialized()) {
            return Err(BatchError::new(
                BatchReport::default(),
                StateViolation::FormulaUninitialized { index },
            ));
        }

        let mut report = BatchReport::default();
        for slot in 0..self.plan.len() {
            let Some(formula) = self.plan.formula_mut(slot) else {
                break;
            };

            let settlement = match stockpile.settle(formula.inputs(), formula.outputs()) {
                Ok(settlement) => settlement,
                Err(LedgerViolation::Insufficient {
                    name,
                    available,
                    required,
                }) => {
                    tracing::debug!(
                        slot,
                        resource = %name,
                        available,
                        required,
                        "plan slot skipped: insufficient stock"
                    );
                    report.skipped.push(slot);
                    continue;
                }
                Err(violation) => {
                    tracing::debug!(slot, error = %violation, "stockpile batch stopped");
                    return Err(BatchError::new(report, violation));
                }
            };

            let outcome = match formula.apply_in_slot(env, slot) {
                Ok(outcome) => outcome,
                Err(violation) => return Err(BatchError::new(report, violation)),
            };
            stockpile.commit(settlement);
            report.applied.push((slot, outcome));
        }

        tracing::debug!(
            applied = report.applied.len(),
            skipped = report.skipped.len(),
            "stockpile batch finished"
        );
        Ok(report)
    }
}

impl FormulaSequence for ExecutablePlan {
    fn len(&self) -> usize {
        self.plan.len()
    }

    fn get(&self, index: usize) -> Option<&Formula> {
        self.plan.get(index)
    }

    fn push(&mut self, formula: Formula) {
        self.plan.push(formula);
        self.slots.push(SlotState::Pending);
    }

    fn remove_last(&mut self) -> Result<Formula, StateViolation> {
        let Some(last) = self.plan.len().checked_sub(1) else {
            return Err(StateViolation::EmptySequence);
        };
        if last < self.step {
            return Err(match self.slots.get(last) {
                Some(SlotState::Completed) => StateViolation::RemoveCompleted { index: last },
                _ => StateViolation::RemoveBehindCursor {
                    index: last,
                    step: self.step,
                },
            });
        }

        self.slots.pop();
        self.plan.remove_last()
    }

    fn replace(&mut self, index: usize, formula: Formula) -> Result<Formula, StateViolation> {
        if index < self.step {
            return Err(StateViolation::ReplaceBeforeStep {
                index,
                step: self.step,
            });
        }
        match self.slots.get(index) {
            None => Err(StateViolation::IndexOutOfBounds {
                index,
                len: self.plan.len(),
            }),
            Some(SlotState::Completed) => Err(StateViolation::AlreadyCompleted { index }),
            Some(SlotState::Pending) => self.plan.replace(index, formula),
        }
    }

    /// Applies only the slot at the cursor.
    fn apply(&mut self, env: &CraftEnv<'_>) -> Result<Vec<ApplyOutcome>, StateViolation> {
        self.apply_next(env).map(|outcome| vec![outcome])
    }
}
