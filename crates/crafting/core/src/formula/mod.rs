//! Formulas: one conversion rule from input resources to output resources.
//!
//! Applying a formula draws one value, maps it onto an [`OutcomeTier`] using
//! the formula's proficiency, and rewrites the result vector from the nominal
//! output quantities. The input and output lists never change after
//! construction.
//!
//! ```ignore
//! let mut smelt = Formula::new(
//!     ResourceList::new(ListSide::Input, [("Ore", 2), ("Coal", 1)])?,
//!     ResourceList::new(ListSide::Output, [("Iron", 10)])?,
//!     Proficiency::MIN,
//! )?;
//! let outcome = smelt.resolve(Draw::from_hundredths(30), &config)?;
//! assert_eq!(smelt.result(), &[7]);
//! ```

mod resource;

pub use resource::{ListSide, ResourceList, ResourceName, ResourceQuantity};

use crate::config::{CraftingConfig, FailurePolicy};
use crate::env::CraftEnv;
use crate::error::ConstructionError;
use crate::outcome::{Draw, OutcomeModifiers, OutcomeTier, Proficiency, TierFlags};
use crate::plan::StateViolation;

/// What happened during one application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub draw: Draw,
    /// Tier whose rule rewrote the result vector, `None` if the draw matched nothing.
    pub tier: Option<OutcomeTier>,
    pub matched: TierFlags,
    pub proficiency_before: Proficiency,
    pub proficiency_after: Proficiency,
}

impl ApplyOutcome {
    pub fn proficiency_grew(&self) -> bool {
        self.proficiency_after > self.proficiency_before
    }
}

/// A resource conversion rule with a probabilistic outcome.
///
/// `Default` is the empty state a formula is left in after [`Formula::take`];
/// it cannot be applied until replaced by a constructed formula.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Formula {
    inputs: ResourceList,
    outputs: ResourceList,
    proficiency: Proficiency,
    result: Vec<u32>,
    applications: u32,
}

impl Formula {
    /// Creates a formula whose result vector starts zeroed.
    ///
    /// # Errors
    ///
    /// `EmptyFormula` if both lists are empty.
    pub fn new(
        inputs: ResourceList,
        outputs: ResourceList,
        proficiency: Proficiency,
    ) -> Result<Self, ConstructionError> {
        if inputs.is_empty() && outputs.is_empty() {
            return Err(ConstructionError::EmptyFormula);
        }
        let result = vec![0; outputs.len()];
        Ok(Self {
            inputs,
            outputs,
            proficiency,
            result,
            applications: 0,
        })
    }

    /// Builds a formula from parallel name/quantity lists and a raw level.
    ///
    /// # Errors
    ///
    /// - `BlankResourceName` if any name is empty or whitespace
    /// - `LengthMismatch` if a name list and its quantity list differ in length
    /// - `ProficiencyOutOfRange` if `proficiency > 5`
    /// - `EmptyFormula` if both name lists are empty
    pub fn from_parallel<I: AsRef<str>, O: AsRef<str>>(
        input_names: &[I],
        input_quantities: &[u32],
        output_names: &[O],
        output_quantities: &[u32],
        proficiency: u8,
    ) -> Result<Self, ConstructionError> {
        let inputs = ResourceList::from_parallel(ListSide::Input, input_names, input_quantities)?;
        let outputs =
            ResourceList::from_parallel(ListSide::Output, output_names, output_quantities)?;
        let proficiency = Proficiency::new(proficiency)?;
        Self::new(inputs, outputs, proficiency)
    }

    /// Moves the formula out, leaving `self` empty and reusable.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    pub fn inputs(&self) -> &ResourceList {
        &self.inputs
    }

    pub fn outputs(&self) -> &ResourceList {
        &self.outputs
    }

    /// Result quantities of the most recent application, one per output.
    pub fn result(&self) -> &[u32] {
        &self.result
    }

    pub fn proficiency(&self) -> Proficiency {
        self.proficiency
    }

    pub fn applications(&self) -> u32 {
        self.applications
    }

    pub fn modifiers(&self) -> OutcomeModifiers {
        OutcomeModifiers::for_level(self.proficiency)
    }

    /// False for the empty default state; constructed formulas always pass.
    pub fn is_initialized(&self) -> bool {
        !(self.inputs.is_empty() && self.outputs.is_empty())
            && self.result.len() == self.outputs.len()
    }

    /// Applies the formula as a standalone unit (slot 0).
    ///
    /// # Errors
    ///
    /// `StateViolation::FormulaUninitialized` for an empty formula.
    pub fn apply(&mut self, env: &CraftEnv<'_>) -> Result<ApplyOutcome, StateViolation> {
        self.apply_in_slot(env, 0)
    }

    /// Applies the formula occupying `slot` of a plan.
    ///
    /// The slot feeds the seed so formulas sharing a base seed draw independently.
    ///
    /// # Errors
    ///
    /// `StateViolation::FormulaUninitialized` for an empty formula.
    pub fn apply_in_slot(
        &mut self,
        env: &CraftEnv<'_>,
        slot: usize,
    ) -> Result<ApplyOutcome, StateViolation> {
        self.ensure_initialized(slot)?;
        let seed_slot = u32::try_from(slot).unwrap_or(u32::MAX);
        let draw = env.draw(u64::from(self.applications), seed_slot);
        Ok(self.settle_draw(draw, env.config()))
    }

    /// Applies the formula with an explicit draw instead of an RNG roll.
    ///
    /// # Errors
    ///
    /// `StateViolation::FormulaUninitialized` for an empty formula.
    pub fn resolve(
        &mut self,
        draw: Draw,
        config: &CraftingConfig,
    ) -> Result<ApplyOutcome, StateViolation> {
        self.ensure_initialized(0)?;
        Ok(self.settle_draw(draw, config))
    }

    fn ensure_initialized(&self, slot: usize) -> Result<(), StateViolation> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(StateViolation::FormulaUninitialized { index: slot })
        }
    }

    fn settle_draw(&mut self, draw: Draw, config: &CraftingConfig) -> ApplyOutcome {
        let proficiency_before = self.proficiency;
        let tiers = self.modifiers().resolve(draw, config.tier_resolution);

        if let Some(tier) = tiers.tier {
            self.write_result(tier, config.failure_policy);
        }

        self.applications = self.applications.saturating_add(1);
        if config.growth_interval > 0 && self.applications % config.growth_interval == 0 {
            self.proficiency = self.proficiency.grown();
        }

        tracing::debug!(
            draw = %draw,
            tier = ?tiers.tier,
            matched = ?tiers.matched,
            proficiency = %self.proficiency,
            "formula applied"
        );

        ApplyOutcome {
            draw,
            tier: tiers.tier,
            matched: tiers.matched,
            proficiency_before,
            proficiency_after: self.proficiency,
        }
    }

    fn write_result(&mut self, tier: OutcomeTier, failure_policy: FailurePolicy) {
        match (tier, failure_policy) {
            (OutcomeTier::Failure, FailurePolicy::FirstCell) => {
                if let Some(first) = self.result.first_mut() {
                    *first = 0;
                }
            }
            (OutcomeTier::Failure, FailurePolicy::AllCells) => self.result.fill(0),
            (tier, _) => {
                for (cell, quantity) in self.result.iter_mut().zip(self.outputs.quantities()) {
                    *cell = tier.scale(quantity);
                }
            }
        }
    }
}
