/// How a draw is mapped onto outcome tiers.
///
/// `Overlapping` keeps the historical four independent range tests where the
/// last matching test wins and a draw may match nothing at all. `Partitioned`
/// builds a cumulative table and always selects exactly one tier.
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
pub enum TierResolution {
    #[default]
    Overlapping,
    Partitioned,
}

/// Which result cells a failed application clears.
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
pub enum FailurePolicy {
    /// Only the first result cell is zeroed; later cells keep their last value.
    #[default]
    FirstCell,
    /// Every result cell is zeroed.
    AllCells,
}

/// Crafting configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CraftingConfig {
    /// Number of applications between proficiency increments.
    pub growth_interval: u32,
    /// Tier lookup strategy used by [`crate::Formula::resolve`].
    pub tier_resolution: TierResolution,
    /// Result-vector handling on a failed application.
    pub failure_policy: FailurePolicy,
}

impl CraftingConfig {
    // ===== compile-time constants =====
    /// Highest proficiency level a formula can reach.
    pub const MAX_PROFICIENCY: u8 = 5;
    /// Initial capacity of an empty plan.
    pub const DEFAULT_PLAN_CAPACITY: usize = 2;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_GROWTH_INTERVAL: u32 = 5;

    pub fn new() -> Self {
        Self {
            growth_interval: Self::DEFAULT_GROWTH_INTERVAL,
            tier_resolution: TierResolution::default(),
            failure_policy: FailurePolicy::default(),
        }
    }

    /// A zero interval disables proficiency growth.
    pub fn with_growth_interval(mut self, growth_interval: u32) -> Self {
        self.growth_interval = growth_interval;
        self
    }

    pub fn with_tier_resolution(mut self, tier_resolution: TierResolution) -> Self {
        self.tier_resolution = tier_resolution;
        self
    }

    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }
}

impl Default for CraftingConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_historical_behaviour() {
        let config = CraftingConfig::default();
        assert_eq!(config.growth_interval, 5);
        assert_eq!(config.tier_resolution, TierResolution::Overlapping);
        assert_eq!(config.failure_policy, FailurePolicy::FirstCell);
    }

    #[test]
    fn policies_parse_from_snake_case() {
        assert_eq!(
            "partitioned".parse::<TierResolution>(),
            Ok(TierResolution::Partitioned)
        );
        assert_eq!("ALL_CELLS".parse::<FailurePolicy>(), Ok(FailurePolicy::AllCells));
        assert_eq!(FailurePolicy::FirstCell.as_ref(), "first_cell");
    }
}
