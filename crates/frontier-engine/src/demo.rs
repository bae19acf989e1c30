//! Scripted session replayed by the demo binary.
//!
//! One player claims a square around a park, builds a camp, walks north
//! past two shops, scavenges what they found and trades part of the haul
//! to a neighbour who received a supply drop by mail.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use frontier_core::{ClaimTracker, Explorer, ExplorationSummary, GameConfig, scavenge_poi};
use frontier_geo::poi::{self, new_poi};
use frontier_geo::{TerritoryRegistry, nearby_pois};
use frontier_inventory::{InventoryService, ItemCatalog, MailItem};
use frontier_loot::RarityTable;
use frontier_trade::{AcceptTradeResponse, OfferRequest, TradeMarket};
use frontier_types::{
    Coordinate, LocationFix, ObtainedItem, PoiType, PointOfInterest, SubscriptionTier, Territory,
    TradeItem, UserId,
};

use crate::error::EngineError;

/// What the scripted session produced.
#[derive(Debug)]
pub struct DemoReport {
    /// The claimed territory.
    pub territory: Territory,
    /// Result of the walk.
    pub exploration: ExplorationSummary,
    /// Items scavenged from discovered POIs.
    pub scavenged: Vec<ObtainedItem>,
    /// Response to the neighbour's accept.
    pub accepted: AcceptTradeResponse,
    /// Response to a late second accept of the same offer.
    pub rejected: AcceptTradeResponse,
}

const PARK: [(f64, f64); 4] = [
    (31.230, 121.470),
    (31.230, 121.475),
    (31.235, 121.475),
    (31.235, 121.470),
];

fn shops() -> Vec<PointOfInterest> {
    vec![
        new_poi("Corner pharmacy", PoiType::Pharmacy, Coordinate::new(31.2362, 121.4702), 2),
        new_poi("FreshMart", PoiType::Supermarket, Coordinate::new(31.2392, 121.4699), 4),
        new_poi("Old depot", PoiType::Factory, Coordinate::new(31.260, 121.500), 5),
    ]
}

fn later(at: DateTime<Utc>, by: Duration) -> Result<DateTime<Utc>, EngineError> {
    at.checked_add_signed(by).ok_or_else(|| EngineError::Script {
        message: format!("clock overflow past {at}"),
    })
}

/// Replay the session starting at `start`.
#[allow(clippy::too_many_lines)]
pub async fn run(
    config: &GameConfig,
    start: DateTime<Utc>,
    rng: &mut impl Rng,
) -> Result<DemoReport, EngineError> {
    let catalog = Arc::new(ItemCatalog::starter());
    let rarity = RarityTable::from_catalog(catalog.iter());
    let inventories = Arc::new(InventoryService::new(
        Arc::clone(&catalog),
        config.inventory.clone(),
    ));
    let market = TradeMarket::new(Arc::clone(&inventories), config.trade.clone());

    let player = UserId::new();
    let neighbour = UserId::new();
    let latecomer = UserId::new();
    inventories.open_inventory(player, SubscriptionTier::Free).await;
    inventories.open_inventory(neighbour, SubscriptionTier::Plus).await;
    inventories.open_inventory(latecomer, SubscriptionTier::Free).await;

    // Claim the park.
    let mut tracker = ClaimTracker::new(player, start, config.exploration.min_fix_spacing_m);
    for (lat, lon) in PARK {
        tracker.add_point(Coordinate::new(lat, lon));
    }
    let territory = tracker.complete("Park camp", start, &config.territory)?;
    let mut registry = TerritoryRegistry::new();
    registry.insert(territory.clone());

    let camp = Coordinate::new(31.2325, 121.4725);
    frontier_core::validate_placement(&territory, player, camp)?;
    tracing::info!(territory = %territory.id, "camp placed");
    let outside = Coordinate::new(31.240, 121.472);
    if let Err(err) = frontier_core::validate_placement(&territory, player, outside) {
        tracing::info!(error = %err, "placement outside the park refused");
    }

    // Walk north from the park at about 1.9 m/s.
    let mut pois = shops();
    let mut explorer = Explorer::new(config.exploration.clone());
    explorer.start(start)?;
    let mut clock = start;
    for step in 0..=11 {
        clock = later(start, Duration::minutes(i64::from(step)))?;
        let fix = LocationFix {
            coordinate: Coordinate::new(31.2350 + f64::from(step) * 0.001, 121.4700),
            timestamp: clock,
        };
        explorer.record_fix(fix, &mut pois)?;
        if step == 5 {
            // A GPS jump a few kilometres away; the session drops it.
            let jump = LocationFix {
                coordinate: Coordinate::new(31.300, 121.470),
                timestamp: later(clock, Duration::seconds(5))?,
            };
            explorer.record_fix(jump, &mut pois)?;
        }
    }
    let exploration = explorer.finish(clock, &config.rewards, &rarity, rng)?;
    let delivered = inventories.apply_loot(player, &exploration.rewards).await?;
    tracing::info!(
        claimed = delivered.claimed_count,
        remaining = delivered.remaining_count,
        "walk reward delivered"
    );

    // Scavenge whatever was discovered, visiting each site.
    let mut scavenged = Vec::new();
    for site in pois.iter_mut().filter(|p| poi::can_scavenge(p)) {
        let at = site.coordinate;
        clock = later(clock, Duration::minutes(2))?;
        let loot = scavenge_poi(
            site,
            at,
            clock,
            &config.exploration,
            &config.rewards,
            &rarity,
            rng,
        )?;
        inventories.apply_loot(player, &loot).await?;
        scavenged.extend(loot);
    }
    let last_fix = Coordinate::new(31.2460, 121.4700);
    for (site, distance_m) in nearby_pois(last_fix, &pois, 2_000.0) {
        tracing::debug!(poi = %site.name, distance_m, status = ?site.status, "nearby");
    }

    let weight = inventories.total_weight(player).await?;
    let slots = inventories.item_type_count(player).await?;
    tracing::info!(user = %player, %weight, slots, "player inventory");

    // The neighbour receives a supply drop.
    let supplies = [MailItem::new("water_bottle", 12), MailItem::new("canned_food", 6)];
    inventories.claim_mail(neighbour, &supplies).await?;
    inventories.claim_mail(latecomer, &supplies).await?;

    // Trade the first looted item for water.
    let haul = inventories.snapshot(player).await?;
    let first = haul.stacks().first().ok_or_else(|| EngineError::Script {
        message: String::from("walk produced no loot to trade"),
    })?;
    let offer = market
        .create_offer(
            player,
            OfferRequest {
                offering_items: vec![TradeItem {
                    item_id: first.item_id.clone(),
                    quantity: 1,
                    quality: first.quality,
                }],
                requesting_items: vec![TradeItem::new("water_bottle", 4)],
                validity_hours: None,
                message: Some(String::from("need water for the next walk")),
            },
            clock,
        )
        .await?;

    clock = later(clock, Duration::minutes(30))?;
    let result = market.accept_offer(offer.id, neighbour, clock).await;
    let accepted = AcceptTradeResponse::from_result(offer.id.into_inner(), &result);
    let record = result?;

    let second = market.accept_offer(offer.id, latecomer, clock).await;
    let rejected = AcceptTradeResponse::from_result(offer.id.into_inner(), &second);

    market
        .rate_trade(record.id, neighbour, 5, Some(String::from("quick swap")))
        .await?;
    market.rate_trade(record.id, player, 4, None).await?;

    let expired = market.sweep_expired(later(clock, Duration::days(8))?).await;
    tracing::info!(
        territories = registry.len(),
        expired = expired.len(),
        history = market.history_for(player).await.len(),
        "session complete"
    );

    Ok(DemoReport {
        territory,
        exploration,
        scavenged,
        accepted,
        rejected,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use frontier_types::RewardTier;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[tokio::test]
    async fn scripted_session_completes() {
        let config = GameConfig::default();
        let mut rng = SmallRng::seed_from_u64(11);
        let start = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        let report = run(&config, start, &mut rng).await.unwrap();

        assert_eq!(report.territory.point_count, 4);
        // 11 steps of ~111 m
        assert_eq!(report.exploration.tier, RewardTier::Gold);
        assert_eq!(report.exploration.rejected_fixes, 1);
        assert_eq!(report.exploration.discovered.len(), 2);
        // silver pharmacy (2) + diamond supermarket (5)
        assert_eq!(report.scavenged.len(), 7);
        assert!(report.accepted.success);
        assert!(!report.rejected.success);
        assert_eq!(report.rejected.error.as_deref(), Some("invalid_offer_state"));
    }
}
