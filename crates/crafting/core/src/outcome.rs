//! Outcome model: proficiency level → tier chances → selected tier.
//!
//! All chances are kept in integer hundredths (percent points) so that tier
//! selection is exact and reproducible; [`OutcomeModifiers::as_probabilities`]
//! converts to `f64` for display.
//!
//! Base chances at level 0 are Failure 25, Partial 20, Bonus 5, Normal 50.
//! Every proficiency point moves 5 points out of both Failure and Partial and
//! into both Bonus and Normal. The result is not renormalized, so at level 5
//! Failure is 0 and Partial is -5.

use bitflags::bitflags;

use crate::config::{CraftingConfig, TierResolution};
use crate::error::ConstructionError;

/// Proficiency level in `0..=5`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Proficiency(u8);

impl Proficiency {
    pub const MIN: Self = Self(0);
    pub const MAX: Self = Self(CraftingConfig::MAX_PROFICIENCY);

    /// # Errors
    ///
    /// Returns `ConstructionError::ProficiencyOutOfRange` above level 5.
    pub fn new(level: u8) -> Result<Self, ConstructionError> {
        if level > Self::MAX.0 {
            return Err(ConstructionError::ProficiencyOutOfRange {
                level,
                max: Self::MAX.0,
            });
        }
        Ok(Self(level))
    }

    #[inline]
    pub const fn level(self) -> u8 {
        self.0
    }

    pub const fn is_max(self) -> bool {
        self.0 >= Self::MAX.0
    }

    /// Next level up, saturating at the maximum.
    #[must_use]
    pub const fn grown(self) -> Self {
        if self.is_max() { self } else { Self(self.0 + 1) }
    }
}

impl core::fmt::Display for Proficiency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// A random draw in `[0, 1]`, stored as hundredths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Draw(u8);

impl Draw {
    pub const ONE: Self = Self(100);

    /// Values above 100 are clamped.
    pub const fn from_hundredths(hundredths: u8) -> Self {
        if hundredths > 100 {
            Self(100)
        } else {
            Self(hundredths)
        }
    }

    /// Rounds a unit-interval value to two decimals.
    pub fn from_unit(value: f64) -> Self {
        let scaled = (value * 100.0).round();
        if scaled.is_nan() || scaled <= 0.0 {
            Self(0)
        } else if scaled >= 100.0 {
            Self::ONE
        } else {
            Self(scaled as u8)
        }
    }

    #[inline]
    pub const fn hundredths(self) -> u8 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl core::fmt::Display for Draw {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Outcome tier of a single application.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum OutcomeTier {
    Failure,
    /// Three quarters of nominal output, rounded down.
    Partial,
    /// Nominal output plus ten percent, rounded up.
    Bonus,
    Normal,
}

impl OutcomeTier {
    pub const ALL: [OutcomeTier; 4] = [Self::Failure, Self::Partial, Self::Bonus, Self::Normal];

    pub const fn flag(self) -> TierFlags {
        match self {
            Self::Failure => TierFlags::FAILURE,
            Self::Partial => TierFlags::PARTIAL,
            Self::Bonus => TierFlags::BONUS,
            Self::Normal => TierFlags::NORMAL,
        }
    }

    /// Scales a nominal output quantity for this tier.
    pub fn scale(self, quantity: u32) -> u32 {
        let quantity = u64::from(quantity);
        let scaled = match self {
            Self::Failure => 0,
            Self::Partial => quantity * 3 / 4,
            Self::Bonus => (quantity * 11).div_ceil(10),
            Self::Normal => quantity,
        };
        u32::try_from(scaled).unwrap_or(u32::MAX)
    }
}

bitflags! {
    /// Set of tiers whose range test matched a draw.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct TierFlags: u8 {
        const FAILURE = 1 << 0;
        const PARTIAL = 1 << 1;
        const BONUS   = 1 << 2;
        const NORMAL  = 1 << 3;
    }
}

/// Tier chances for one proficiency level, in hundredths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutcomeModifiers {
    pub failure: i32,
    pub partial: i32,
    pub bonus: i32,
    pub normal: i32,
}

impl OutcomeModifiers {
    pub const BASE: Self = Self {
        failure: 25,
        partial: 20,
        bonus: 5,
        normal: 50,
    };

    /// Points moved per proficiency level, per channel.
    pub const SHIFT_PER_LEVEL: i32 = 5;

    pub fn for_level(level: Proficiency) -> Self {
        let shift = i32::from(level.level()) * Self::SHIFT_PER_LEVEL;
        Self {
            failure: Self::BASE.failure - shift,
            partial: Self::BASE.partial - shift,
            bonus: Self::BASE.bonus + shift,
            normal: Self::BASE.normal + shift,
        }
    }

    pub const fn failure_or_partial(&self) -> i32 {
        self.failure + self.partial
    }

    pub const fn bonus_or_normal(&self) -> i32 {
        self.bonus + self.normal
    }

    /// Sum of all four chances. Only 100 at level 0.
    pub const fn total(&self) -> i32 {
        self.failure + self.partial + self.bonus + self.normal
    }

    /// `(failure, partial, bonus, normal)` as fractions of one.
    pub fn as_probabilities(&self) -> (f64, f64, f64, f64) {
        (
            f64::from(self.failure) / 100.0,
            f64::from(self.partial) / 100.0,
            f64::from(self.bonus) / 100.0,
            f64::from(self.normal) / 100.0,
        )
    }

    pub fn resolve(&self, draw: Draw, resolution: TierResolution) -> TierMatch {
        match resolution {
            TierResolution::Overlapping => self.resolve_overlapping(draw),
            TierResolution::Partitioned => self.resolve_partitioned(draw),
        }
    }

    /// Four independent open-interval tests; the last one that matches wins.
    fn resolve_overlapping(&self, draw: Draw) -> TierMatch {
        let r = i32::from(draw.hundredths());
        let f = self.failure;
        let p = self.partial;
        let b = self.bonus;
        let n = self.normal;

        let tests = [
            (OutcomeTier::Failure, r < f),
            (OutcomeTier::Partial, f < r && r < f + p),
            // upper bound is the Normal chance alone, kept as historically defined
            (OutcomeTier::Bonus, f + p < r && r < n),
            (OutcomeTier::Normal, f + b + p < r && r < 100),
        ];

        let mut matched = TierMatch::default();
        for (tier, hit) in tests {
            if hit {
                matched.matched |= tier.flag();
                matched.tier = Some(tier);
            }
        }
        matched
    }

    /// Cumulative lookup over chances clamped at zero; always selects a tier.
    fn resolve_partitioned(&self, draw: Draw) -> TierMatch {
        let r = i32::from(draw.hundredths());
        let mut upper = 0;
        let bands = [
            (OutcomeTier::Failure, self.failure),
            (OutcomeTier::Partial, self.partial),
            (OutcomeTier::Bonus, self.bonus),
        ];
        for (tier, chance) in bands {
            upper += chance.max(0);
            if r < upper {
                return TierMatch::single(tier);
            }
        }
        TierMatch::single(OutcomeTier::Normal)
    }
}

/// Result of mapping one draw onto the tier table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TierMatch {
    /// Tier whose rule is applied, `None` when no test matched.
    pub tier: Option<OutcomeTier>,
    /// Every tier whose test matched.
    pub matched: TierFlags,
}

impl TierMatch {
    fn single(tier: OutcomeTier) -> Self {
        Self {
            tier: Some(tier),
            matched: tier.flag(),
        }
    }

    /// True when more than one range test matched the draw.
    pub fn is_ambiguous(&self) -> bool {
        self.matched.bits().count_ones() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(l: u8) -> Proficiency {
        Proficiency::new(l).unwrap()
    }

    #[test]
    fn channel_pairs_shift_ten_points_per_level() {
        for l in 0..=5u8 {
            let modifiers = OutcomeModifiers::for_level(level(l));
            let shift = 10 * i32::from(l);
            assert_eq!(modifiers.failure_or_partial(), 45 - shift);
            assert_eq!(modifiers.bonus_or_normal(), 55 + shift);
        }
    }

    #[test]
    fn level_zero_sums_to_one_hundred() {
        assert_eq!(OutcomeModifiers::for_level(Proficiency::MIN).total(), 100);
        assert_eq!(OutcomeModifiers::for_level(level(3)).total(), 100);
        let (f, p, b, n) = OutcomeModifiers::BASE.as_probabilities();
        assert!((f - 0.25).abs() < 1e-9);
        assert!((p - 0.20).abs() < 1e-9);
        assert!((b - 0.05).abs() < 1e-9);
        assert!((n - 0.50).abs() < 1e-9);
    }

    #[test]
    fn proficiency_rejects_levels_above_five() {
        assert!(Proficiency::new(5).is_ok());
        assert_eq!(
            Proficiency::new(6),
            Err(ConstructionError::ProficiencyOutOfRange { level: 6, max: 5 })
        );
        assert_eq!(Proficiency::MAX.grown(), Proficiency::MAX);
        assert_eq!(level(2).grown(), level(3));
    }

    #[test]
    fn overlapping_matches_level_zero_ranges() {
        let modifiers = OutcomeModifiers::for_level(Proficiency::MIN);
        let tier = |h| {
            modifiers
                .resolve(Draw::from_hundredths(h), TierResolution::Overlapping)
                .tier
        };

        assert_eq!(tier(10), Some(OutcomeTier::Failure));
        assert_eq!(tier(30), Some(OutcomeTier::Partial));
        assert_eq!(tier(47), Some(OutcomeTier::Bonus));
        assert_eq!(tier(60), Some(OutcomeTier::Normal));
        assert_eq!(tier(95), Some(OutcomeTier::Normal));
        // boundaries are open on both sides
        assert_eq!(tier(25), None);
        assert_eq!(tier(45), None);
        assert_eq!(tier(50), None);
        assert_eq!(tier(100), None);
    }

    #[test]
    fn overlapping_can_match_several_tiers_at_higher_levels() {
        // L3: F=10 P=5 B=20 N=65 → Bonus covers (15, 65), Normal covers (35, 100)
        let modifiers = OutcomeModifiers::for_level(level(3));
        let result = modifiers.resolve(Draw::from_hundredths(50), TierResolution::Overlapping);

        assert!(result.is_ambiguous());
        assert_eq!(result.matched, TierFlags::BONUS | TierFlags::NORMAL);
        assert_eq!(result.tier, Some(OutcomeTier::Normal));
    }

    #[test]
    fn partitioned_always_selects_exactly_one_tier() {
        for l in 0..=5u8 {
            let modifiers = OutcomeModifiers::for_level(level(l));
            for h in 0..=100u8 {
                let result = modifiers.resolve(Draw::from_hundredths(h), TierResolution::Partitioned);
                assert!(result.tier.is_some());
                assert!(!result.is_ambiguous());
            }
        }
    }

    #[test]
    fn partitioned_clamps_negative_chances() {
        // L5: F=0 P=-5 B=30 N=75 → Bonus [0, 30), Normal beyond
        let modifiers = OutcomeModifiers::for_level(Proficiency::MAX);
        let tier = |h| {
            modifiers
                .resolve(Draw::from_hundredths(h), TierResolution::Partitioned)
                .tier
        };
        assert_eq!(tier(0), Some(OutcomeTier::Bonus));
        assert_eq!(tier(29), Some(OutcomeTier::Bonus));
        assert_eq!(tier(30), Some(OutcomeTier::Normal));
    }

    #[test]
    fn tier_scaling_uses_exact_rounding() {
        assert_eq!(OutcomeTier::Partial.scale(10), 7);
        assert_eq!(OutcomeTier::Bonus.scale(10), 11);
        assert_eq!(OutcomeTier::Bonus.scale(3), 4);
        assert_eq!(OutcomeTier::Normal.scale(10), 10);
        assert_eq!(OutcomeTier::Failure.scale(10), 0);
        assert_eq!(OutcomeTier::Bonus.scale(u32::MAX), u32::MAX);
    }

    #[test]
    fn draws_round_to_two_decimals() {
        assert_eq!(Draw::from_unit(0.304).hundredths(), 30);
        assert_eq!(Draw::from_unit(0.996).hundredths(), 100);
        assert_eq!(Draw::from_hundredths(250), Draw::ONE);
        assert_eq!(Draw::from_hundredths(7).to_string(), "0.07");
    }
}
