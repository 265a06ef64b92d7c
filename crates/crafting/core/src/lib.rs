//! Probabilistic resource crafting: formulas, plans, and the stockpile they draw from.
//!
//! A [`Formula`] converts input resources into output resources; each
//! application draws one value, maps it onto an [`OutcomeTier`] through the
//! formula's [`Proficiency`], and rewrites the formula's result vector. A
//! [`Plan`] owns an ordered list of formulas and an [`ExecutablePlan`] steps
//! through one, applying each slot at most once. The [`Stockpile`] is the
//! resource ledger a plan can be settled against.
//!
//! Randomness and tunables reach the crate only through [`CraftEnv`], so
//! every run is reproducible from its base seed.
pub mod config;
pub mod env;
pub mod error;
pub mod formula;
pub mod outcome;
pub mod plan;
pub mod stockpile;
pub mod workshop;

pub use config::{CraftingConfig, FailurePolicy, TierResolution};
pub use env::{CraftEnv, PcgRng, RngOracle, compute_seed};
pub use error::{BatchError, ConstructionError, CraftError, ErrorSeverity, ExecuteError};
pub use formula::{ApplyOutcome, Formula, ListSide, ResourceList, ResourceName, ResourceQuantity};
pub use outcome::{Draw, OutcomeModifiers, OutcomeTier, Proficiency, TierFlags, TierMatch};
pub use plan::{BatchReport, ExecutablePlan, FormulaSequence, Plan, SlotState, StateViolation};
pub use stockpile::{LedgerViolation, Stockpile};
pub use workshop::Workshop;
