//! Scavenge loot roller.
//!
//! A roll produces exactly `item_count` items for the tier. Each item
//! independently lands in a rarity band, then a concrete item id is drawn
//! uniformly from that band's candidates in the [`RarityTable`].
//!
//! The roller is a pure function of its inputs and the RNG, so tests seed a
//! `SmallRng` for reproducible results.

use std::collections::BTreeMap;

use rand::Rng;

use frontier_types::{ItemDefinition, ItemId, ObtainedItem, Rarity, RewardTier};

use crate::tier::{BASIS_POINTS, RewardTable, TierRewards};

/// Candidate item ids per rarity band.
///
/// Built from the item catalog or supplied directly when a context wires
/// specific loot (e.g. a hospital only drops medical items).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RarityTable {
    bands: BTreeMap<Rarity, Vec<ItemId>>,
}

impl RarityTable {
    /// Create an empty table.
    pub const fn new() -> Self {
        Self {
            bands: BTreeMap::new(),
        }
    }

    /// File every catalog item under its own rarity.
    pub fn from_catalog<'a>(definitions: impl IntoIterator<Item = &'a ItemDefinition>) -> Self {
        let mut table = Self::new();
        for def in definitions {
            table.insert(def.rarity, def.id.clone());
        }
        table
    }

    /// Add a candidate to a band. Duplicates are ignored.
    pub fn insert(&mut self, rarity: Rarity, item: ItemId) {
        let band = self.bands.entry(rarity).or_default();
        if let Err(pos) = band.binary_search(&item) {
            band.insert(pos, item);
        }
    }

    /// Candidates in a band, sorted by id.
    pub fn candidates(&self, rarity: Rarity) -> &[ItemId] {
        match self.bands.get(&rarity) {
            Some(band) => band,
            None => &[],
        }
    }

    /// Whether every band is empty.
    pub fn is_empty(&self) -> bool {
        self.bands.values().all(Vec::is_empty)
    }

    /// Draw an item for `rarity`.
    ///
    /// An empty band falls back to the next lower band, then to any
    /// non-empty band. Returns the band actually used alongside the item, or
    /// `None` if the table is empty.
    pub fn pick(&self, rarity: Rarity, rng: &mut impl Rng) -> Option<(Rarity, &ItemId)> {
        let band = fallback_order(rarity)
            .into_iter()
            .find(|r| !self.candidates(*r).is_empty())?;
        let candidates = self.candidates(band);
        let idx = rng.random_range(0..candidates.len());
        candidates.get(idx).map(|item| (band, item))
    }
}

/// Requested band first, then lower bands, then higher ones.
const fn fallback_order(rarity: Rarity) -> [Rarity; 3] {
    match rarity {
        Rarity::Epic => [Rarity::Epic, Rarity::Rare, Rarity::Common],
        Rarity::Rare => [Rarity::Rare, Rarity::Common, Rarity::Epic],
        Rarity::Common => [Rarity::Common, Rarity::Rare, Rarity::Epic],
    }
}

/// Roll which band a single item lands in.
pub fn roll_band(rewards: &TierRewards, rng: &mut impl Rng) -> Rarity {
    let (rare, epic) = rewards.band_thresholds();
    let roll: u32 = rng.random_range(0..BASIS_POINTS);
    if roll < epic {
        Rarity::Epic
    } else if roll < epic.saturating_add(rare) {
        Rarity::Rare
    } else {
        Rarity::Common
    }
}

/// Roll the loot for `tier`.
///
/// Returns exactly the tier's item count (none for [`RewardTier::None`]),
/// one unit per entry. The only way to get fewer is an empty rarity table,
/// which yields nothing.
pub fn roll(
    tier: RewardTier,
    table: &RewardTable,
    rarity_table: &RarityTable,
    rng: &mut impl Rng,
) -> Vec<ObtainedItem> {
    let rewards = table.rewards_for(tier);
    if rarity_table.is_empty() {
        return Vec::new();
    }

    (0..rewards.item_count)
        .filter_map(|_| {
            let band = roll_band(rewards, rng);
            rarity_table
                .pick(band, rng)
                .map(|(rarity, item_id)| ObtainedItem {
                    item_id: item_id.clone(),
                    quantity: 1,
                    quality: None,
                    rarity,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rust_decimal::Decimal;

    use super::*;

    fn sample_table() -> RarityTable {
        let mut table = RarityTable::new();
        table.insert(Rarity::Common, ItemId::from("water_bottle"));
        table.insert(Rarity::Common, ItemId::from("canned_food"));
        table.insert(Rarity::Rare, ItemId::from("bandage"));
        table.insert(Rarity::Epic, ItemId::from("first_aid_kit"));
        table
    }

    #[test]
    fn none_tier_rolls_nothing() {
        let mut rng = SmallRng::seed_from_u64(1);
        let items = roll(
            RewardTier::None,
            &RewardTable::default(),
            &sample_table(),
            &mut rng,
        );
        assert!(items.is_empty());
    }

    #[test]
    fn every_tier_rolls_its_item_count() {
        let table = RewardTable::default();
        let rarity = sample_table();
        let mut rng = SmallRng::seed_from_u64(7);
        for tier in RewardTier::ALL {
            for _ in 0..50 {
                let items = roll(tier, &table, &rarity, &mut rng);
                let expected = usize::try_from(table.rewards_for(tier).item_count).unwrap_or(0);
                assert_eq!(items.len(), expected, "tier {tier:?}");
                assert!(items.iter().all(|i| i.quantity == 1));
            }
        }
    }

    #[test]
    fn same_seed_same_loot() {
        let table = RewardTable::default();
        let rarity = sample_table();
        let a = roll(
            RewardTier::Diamond,
            &table,
            &rarity,
            &mut SmallRng::seed_from_u64(99),
        );
        let b = roll(
            RewardTier::Diamond,
            &table,
            &rarity,
            &mut SmallRng::seed_from_u64(99),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn empty_rarity_table_yields_nothing() {
        let mut rng = SmallRng::seed_from_u64(3);
        let items = roll(
            RewardTier::Diamond,
            &RewardTable::default(),
            &RarityTable::new(),
            &mut rng,
        );
        assert!(items.is_empty());
    }

    #[test]
    fn all_epic_tier_only_yields_epic() {
        let mut table = RewardTable::default();
        table.gold = TierRewards {
            item_count: 10,
            common: Decimal::ZERO,
            rare: Decimal::ZERO,
            epic: Decimal::ONE,
        };
        let mut rng = SmallRng::seed_from_u64(11);
        let items = roll(RewardTier::Gold, &table, &sample_table(), &mut rng);
        assert_eq!(items.len(), 10);
        assert!(items.iter().all(|i| i.rarity == Rarity::Epic));
        assert!(items.iter().all(|i| i.item_id.as_str() == "first_aid_kit"));
    }

    #[test]
    fn zero_probabilities_fall_back_to_common() {
        let zero = TierRewards {
            item_count: 1,
            common: Decimal::ZERO,
            rare: Decimal::ZERO,
            epic: Decimal::ZERO,
        };
        let mut rng = SmallRng::seed_from_u64(5);
        for _ in 0..100 {
            assert_eq!(roll_band(&zero, &mut rng), Rarity::Common);
        }
    }

    #[test]
    fn empty_band_falls_back_to_lower_band() {
        let mut table = RarityTable::new();
        table.insert(Rarity::Common, ItemId::from("scrap_metal"));
        let mut rng = SmallRng::seed_from_u64(2);
        let picked = table.pick(Rarity::Epic, &mut rng);
        assert_eq!(
            picked.map(|(r, i)| (r, i.as_str())),
            Some((Rarity::Common, "scrap_metal"))
        );
    }

    #[test]
    fn empty_lower_bands_fall_back_upward() {
        let mut table = RarityTable::new();
        table.insert(Rarity::Epic, ItemId::from("rifle"));
        let mut rng = SmallRng::seed_from_u64(2);
        let picked = table.pick(Rarity::Common, &mut rng);
        assert_eq!(picked.map(|(r, _)| r), Some(Rarity::Epic));
    }

    #[test]
    fn band_frequencies_follow_probabilities() {
        let rewards = RewardTable::default().diamond;
        let mut rng = SmallRng::seed_from_u64(2024);
        let mut counts: BTreeMap<Rarity, u32> = BTreeMap::new();
        for _ in 0..20_000 {
            *counts.entry(roll_band(&rewards, &mut rng)).or_insert(0) += 1;
        }
        // 30/40/30 split with generous tolerance.
        let common = counts.get(&Rarity::Common).copied().unwrap_or(0);
        let rare = counts.get(&Rarity::Rare).copied().unwrap_or(0);
        let epic = counts.get(&Rarity::Epic).copied().unwrap_or(0);
        assert!((5_400..=6_600).contains(&common), "common {common}");
        assert!((7_400..=8_600).contains(&rare), "rare {rare}");
        assert!((5_400..=6_600).contains(&epic), "epic {epic}");
    }

    #[test]
    fn insert_deduplicates_and_sorts() {
        let mut table = RarityTable::new();
        table.insert(Rarity::Rare, ItemId::from("rope"));
        table.insert(Rarity::Rare, ItemId::from("battery"));
        table.insert(Rarity::Rare, ItemId::from("rope"));
        let ids: Vec<&str> = table
            .candidates(Rarity::Rare)
            .iter()
            .map(ItemId::as_str)
            .collect();
        assert_eq!(ids, vec!["battery", "rope"]);
        assert!(table.candidates(Rarity::Epic).is_empty());
    }
}
