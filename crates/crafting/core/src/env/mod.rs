//! Read-only collaborators for formula application.
//!
//! [`CraftEnv`] bundles the random source, the tunables, and the base seed so
//! formulas and plans can be applied without hard coupling to a concrete RNG.
mod rng;

pub use rng::{PcgRng, RngOracle, compute_seed};

use crate::config::CraftingConfig;
use crate::outcome::Draw;

/// Aggregates the oracles an application needs.
#[derive(Clone, Copy)]
pub struct CraftEnv<'a> {
    rng: &'a dyn RngOracle,
    config: &'a CraftingConfig,
    base_seed: u64,
}

impl<'a> CraftEnv<'a> {
    pub fn new(rng: &'a dyn RngOracle, config: &'a CraftingConfig, base_seed: u64) -> Self {
        Self {
            rng,
            config,
            base_seed,
        }
    }

    pub fn rng(&self) -> &'a dyn RngOracle {
        self.rng
    }

    pub fn config(&self) -> &'a CraftingConfig {
        self.config
    }

    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Draws the value for the `nonce`-th application of the formula in `slot`.
    pub fn draw(&self, nonce: u64, slot: u32) -> Draw {
        self.rng.roll_draw(compute_seed(self.base_seed, nonce, slot))
    }
}

impl core::fmt::Debug for CraftEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CraftEnv")
            .field("config", self.config)
            .field("base_seed", &self.base_seed)
            .finish_non_exhaustive()
    }
}
