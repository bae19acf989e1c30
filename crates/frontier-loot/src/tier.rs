//! Reward tier lookup and per-tier reward tables.
//!
//! Walked distance maps onto a tier through fixed breakpoints:
//!
//! | Distance (m) | Tier |
//! |--------------|------|
//! | `[0, 200)` | none |
//! | `[200, 500)` | bronze |
//! | `[500, 1000)` | silver |
//! | `[1000, 2000)` | gold |
//! | `[2000, inf)` | diamond |
//!
//! Each tier carries an item count and three band probabilities. The bands
//! are read in basis points (0..10000) by the roller; see
//! [`TierRewards::band_thresholds`] for how partial and oversized sums are
//! handled.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use frontier_types::RewardTier;

/// Distance at which bronze starts, in meters.
pub const BRONZE_MIN_M: f64 = 200.0;
/// Distance at which silver starts, in meters.
pub const SILVER_MIN_M: f64 = 500.0;
/// Distance at which gold starts, in meters.
pub const GOLD_MIN_M: f64 = 1000.0;
/// Distance at which diamond starts, in meters.
pub const DIAMOND_MIN_M: f64 = 2000.0;

/// Denominator for band probabilities.
pub const BASIS_POINTS: u32 = 10_000;

/// Tier earned by walking `distance_m` meters.
///
/// Total over all inputs: negative distances and NaN map to
/// [`RewardTier::None`].
pub fn tier_for(distance_m: f64) -> RewardTier {
    if distance_m >= DIAMOND_MIN_M {
        RewardTier::Diamond
    } else if distance_m >= GOLD_MIN_M {
        RewardTier::Gold
    } else if distance_m >= SILVER_MIN_M {
        RewardTier::Silver
    } else if distance_m >= BRONZE_MIN_M {
        RewardTier::Bronze
    } else {
        RewardTier::None
    }
}

/// Tier rolled when scavenging a POI of the given danger level.
///
/// Riskier sites pay better: 1 bronze, 2 silver, 3 gold, 4 and 5 diamond.
pub const fn tier_for_danger(danger_level: u8) -> RewardTier {
    match danger_level {
        0 | 1 => RewardTier::Bronze,
        2 => RewardTier::Silver,
        3 => RewardTier::Gold,
        _ => RewardTier::Diamond,
    }
}

/// Item count and band probabilities for one tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierRewards {
    /// Number of items a roll produces.
    pub item_count: u32,
    /// Probability of the common band.
    pub common: Decimal,
    /// Probability of the rare band.
    pub rare: Decimal,
    /// Probability of the epic band.
    pub epic: Decimal,
}

impl TierRewards {
    /// A tier that yields nothing.
    pub const EMPTY: Self = Self {
        item_count: 0,
        common: Decimal::ZERO,
        rare: Decimal::ZERO,
        epic: Decimal::ZERO,
    };

    /// Rare and epic band widths in basis points, as `(rare, epic)`.
    ///
    /// Each probability is clamped into `[0, 1]`. If the three bands sum to
    /// more than 1.0 they are scaled down proportionally. Any mass left below
    /// 1.0 belongs to the common band, so the common width is always
    /// `BASIS_POINTS - rare - epic`.
    pub fn band_thresholds(&self) -> (u32, u32) {
        let common = to_basis_points(self.common);
        let rare = to_basis_points(self.rare);
        let epic = to_basis_points(self.epic);
        let total = common.saturating_add(rare).saturating_add(epic);

        if total <= BASIS_POINTS {
            return (rare, epic);
        }
        (scale_down(rare, total), scale_down(epic, total))
    }

    /// Sum of the three probabilities as configured, before normalization.
    pub fn probability_sum(&self) -> Decimal {
        self.common
            .checked_add(self.rare)
            .and_then(|s| s.checked_add(self.epic))
            .unwrap_or(Decimal::MAX)
    }
}

/// Convert a probability into basis points, clamped to `0..=10000`.
fn to_basis_points(p: Decimal) -> u32 {
    let clamped = p.clamp(Decimal::ZERO, Decimal::ONE);
    clamped
        .checked_mul(Decimal::from(BASIS_POINTS))
        .and_then(|scaled| scaled.trunc().to_u32())
        .unwrap_or(0)
        .min(BASIS_POINTS)
}

/// `part * BASIS_POINTS / total`, in u64 to avoid overflow.
fn scale_down(part: u32, total: u32) -> u32 {
    u64::from(part)
        .checked_mul(u64::from(BASIS_POINTS))
        .and_then(|n| n.checked_div(u64::from(total)))
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0)
}

/// Reward tables for every earning tier.
///
/// [`RewardTier::None`] is fixed at zero items and is not configurable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardTable {
    /// Bronze tier rewards.
    #[serde(default = "default_bronze")]
    pub bronze: TierRewards,
    /// Silver tier rewards.
    #[serde(default = "default_silver")]
    pub silver: TierRewards,
    /// Gold tier rewards.
    #[serde(default = "default_gold")]
    pub gold: TierRewards,
    /// Diamond tier rewards.
    #[serde(default = "default_diamond")]
    pub diamond: TierRewards,
}

impl RewardTable {
    /// Rewards for `tier`.
    pub const fn rewards_for(&self, tier: RewardTier) -> &TierRewards {
        match tier {
            RewardTier::None => &TierRewards::EMPTY,
            RewardTier::Bronze => &self.bronze,
            RewardTier::Silver => &self.silver,
            RewardTier::Gold => &self.gold,
            RewardTier::Diamond => &self.diamond,
        }
    }
}

impl Default for RewardTable {
    fn default() -> Self {
        Self {
            bronze: default_bronze(),
            silver: default_silver(),
            gold: default_gold(),
            diamond: default_diamond(),
        }
    }
}

/// Build a tier entry from per-10000 integers.
const fn rewards(item_count: u32, common: u32, rare: u32, epic: u32) -> TierRewards {
    TierRewards {
        item_count,
        common: Decimal::from_parts(common, 0, 0, false, 4),
        rare: Decimal::from_parts(rare, 0, 0, false, 4),
        epic: Decimal::from_parts(epic, 0, 0, false, 4),
    }
}

const fn default_bronze() -> TierRewards {
    rewards(1, 9000, 1000, 0)
}

const fn default_silver() -> TierRewards {
    rewards(2, 7000, 2500, 500)
}

const fn default_gold() -> TierRewards {
    rewards(3, 5000, 3500, 1500)
}

const fn default_diamond() -> TierRewards {
    rewards(5, 3000, 4000, 3000)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn exact_breakpoints() {
        assert_eq!(tier_for(0.0), RewardTier::None);
        assert_eq!(tier_for(199.0), RewardTier::None);
        assert_eq!(tier_for(199.999), RewardTier::None);
        assert_eq!(tier_for(200.0), RewardTier::Bronze);
        assert_eq!(tier_for(499.9), RewardTier::Bronze);
        assert_eq!(tier_for(500.0), RewardTier::Silver);
        assert_eq!(tier_for(1000.0), RewardTier::Gold);
        assert_eq!(tier_for(1999.0), RewardTier::Gold);
        assert_eq!(tier_for(2000.0), RewardTier::Diamond);
        assert_eq!(tier_for(1.0e9), RewardTier::Diamond);
    }

    #[test]
    fn negative_and_nan_are_none() {
        assert_eq!(tier_for(-5.0), RewardTier::None);
        assert_eq!(tier_for(f64::NAN), RewardTier::None);
    }

    #[test]
    fn tier_is_monotonic_in_distance() {
        let mut previous = RewardTier::None;
        for step in 0..3000_u32 {
            let tier = tier_for(f64::from(step));
            assert!(tier >= previous, "tier dropped at {step} m");
            previous = tier;
        }
    }

    #[test]
    fn danger_maps_to_tier() {
        assert_eq!(tier_for_danger(1), RewardTier::Bronze);
        assert_eq!(tier_for_danger(2), RewardTier::Silver);
        assert_eq!(tier_for_danger(3), RewardTier::Gold);
        assert_eq!(tier_for_danger(4), RewardTier::Diamond);
        assert_eq!(tier_for_danger(5), RewardTier::Diamond);
    }

    #[test]
    fn default_table_sums_to_one() {
        let table = RewardTable::default();
        assert_eq!(table.diamond.common, dec!(0.30));
        assert_eq!(table.diamond.rare, dec!(0.40));
        assert_eq!(table.diamond.epic, dec!(0.30));
        for tier in [
            RewardTier::Bronze,
            RewardTier::Silver,
            RewardTier::Gold,
            RewardTier::Diamond,
        ] {
            assert_eq!(table.rewards_for(tier).probability_sum(), Decimal::ONE);
        }
        assert_eq!(table.rewards_for(RewardTier::None).item_count, 0);
    }

    #[test]
    fn thresholds_for_exact_distribution() {
        let table = RewardTable::default();
        assert_eq!(table.diamond.band_thresholds(), (4000, 3000));
        assert_eq!(table.bronze.band_thresholds(), (1000, 0));
    }

    #[test]
    fn partial_sum_leaves_residual_to_common() {
        let partial = TierRewards {
            item_count: 1,
            common: dec!(0.2),
            rare: dec!(0.1),
            epic: dec!(0.1),
        };
        // Common effectively gets 0.8.
        assert_eq!(partial.band_thresholds(), (1000, 1000));
    }

    #[test]
    fn oversized_sum_is_renormalized() {
        let oversized = TierRewards {
            item_count: 1,
            common: dec!(1.0),
            rare: dec!(0.5),
            epic: dec!(0.5),
        };
        assert_eq!(oversized.band_thresholds(), (2500, 2500));
    }

    #[test]
    fn out_of_range_probabilities_are_clamped() {
        let odd = TierRewards {
            item_count: 1,
            common: dec!(-1),
            rare: dec!(0),
            epic: dec!(7),
        };
        assert_eq!(odd.band_thresholds(), (0, 10_000));
    }

    #[test]
    fn table_parses_from_yaml_with_defaults() {
        let yaml = "gold:\n  item_count: 4\n  common: 0.4\n  rare: 0.4\n  epic: 0.2\n";
        let table: RewardTable = serde_yml::from_str(yaml).unwrap_or_default();
        assert_eq!(table.gold.item_count, 4);
        assert_eq!(table.bronze, RewardTable::default().bronze);
    }
}
