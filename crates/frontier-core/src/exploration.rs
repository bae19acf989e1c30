//! Exploration sessions.
//!
//! A session turns a stream of location fixes into walked distance and POI
//! discoveries, then pays out loot by distance tier when it ends.
//!
//! ```text
//! Idle --start--> Exploring --finish--> Completed --reset--> Idle
//!                                       Completed --start--> Exploring
//! ```
//!
//! Fixes are filtered before they count: one too close to the previous
//! accepted fix is ignored (GPS jitter), one implying an implausible speed
//! is rejected and counted.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use frontier_geo::{distance_meters, poi, within_radius};
use frontier_loot::{RarityTable, RewardTable, roll, tier_for, tier_for_danger};
use frontier_types::{
    Coordinate, LocationFix, ObtainedItem, PoiId, PointOfInterest, PoiStatus, RewardTier,
};

use crate::config::ExplorationConfig;
use crate::error::ExplorationError;

/// A running session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorationSession {
    /// When the session started.
    pub started_at: DateTime<Utc>,
    /// Last fix that counted toward distance.
    pub last_fix: Option<LocationFix>,
    /// Accumulated great-circle distance in meters.
    pub distance_m: f64,
    /// Fixes that counted.
    pub accepted_fixes: u32,
    /// Fixes dropped for implausible speed or going back in time.
    pub rejected_fixes: u32,
    /// POIs discovered during this session, in order.
    pub discovered: Vec<PoiId>,
}

impl ExplorationSession {
    const fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            last_fix: None,
            distance_m: 0.0,
            accepted_fixes: 0,
            rejected_fixes: 0,
            discovered: Vec::new(),
        }
    }
}

/// Result of a finished session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorationSummary {
    /// When the session started.
    pub started_at: DateTime<Utc>,
    /// When it finished.
    pub finished_at: DateTime<Utc>,
    /// Walked distance in meters.
    pub distance_m: f64,
    /// Tier earned by the distance.
    pub tier: RewardTier,
    /// Loot rolled for the tier.
    pub rewards: Vec<ObtainedItem>,
    /// POIs discovered on the way.
    pub discovered: Vec<PoiId>,
    /// Fixes rejected during the session.
    pub rejected_fixes: u32,
}

/// Where the explorer is in its lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum ExplorationState {
    /// No session.
    #[default]
    Idle,
    /// A session is collecting fixes.
    Exploring(ExplorationSession),
    /// The last session's result, until reset or a new start.
    Completed(ExplorationSummary),
}

/// What happened to one location fix.
#[derive(Debug, Clone, PartialEq)]
pub enum FixOutcome {
    /// The fix counted. Lists POIs it newly discovered.
    Accepted {
        /// Distance added by this fix.
        added_m: f64,
        /// Newly discovered POIs.
        discovered: Vec<PoiId>,
    },
    /// Too close to the previous fix to count.
    Ignored,
    /// Implausible movement; counted in `rejected_fixes`.
    Rejected {
        /// Speed implied by the fix, if time moved forward.
        speed_mps: Option<f64>,
    },
}

/// Drives one player's [`ExplorationState`].
#[derive(Debug, Clone)]
pub struct Explorer {
    config: ExplorationConfig,
    state: ExplorationState,
}

impl Explorer {
    /// An idle explorer.
    pub const fn new(config: ExplorationConfig) -> Self {
        Self {
            config,
            state: ExplorationState::Idle,
        }
    }

    /// Current state.
    pub const fn state(&self) -> &ExplorationState {
        &self.state
    }

    /// Whether a session is running.
    pub const fn is_exploring(&self) -> bool {
        matches!(self.state, ExplorationState::Exploring(_))
    }

    /// Start a new session.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), ExplorationError> {
        if self.is_exploring() {
            return Err(ExplorationError::AlreadyExploring);
        }
        self.state = ExplorationState::Exploring(ExplorationSession::new(now));
        tracing::info!(started_at = %now, "exploration started");
        Ok(())
    }

    /// Feed one location fix. `pois` are checked for discovery and updated
    /// in place.
    pub fn record_fix(
        &mut self,
        fix: LocationFix,
        pois: &mut [PointOfInterest],
    ) -> Result<FixOutcome, ExplorationError> {
        let ExplorationState::Exploring(session) = &mut self.state else {
            return Err(ExplorationError::NotExploring);
        };

        let added_m = match session.last_fix {
            None => 0.0,
            Some(last) => {
                let step = distance_meters(last.coordinate, fix.coordinate);
                if step < self.config.min_fix_spacing_m {
                    tracing::debug!(step_m = step, "fix ignored: below spacing");
                    return Ok(FixOutcome::Ignored);
                }
                let elapsed_ms = fix
                    .timestamp
                    .signed_duration_since(last.timestamp)
                    .num_milliseconds();
                if elapsed_ms <= 0 {
                    session.rejected_fixes = session.rejected_fixes.saturating_add(1);
                    tracing::debug!(step_m = step, "fix rejected: not after previous fix");
                    return Ok(FixOutcome::Rejected { speed_mps: None });
                }
                #[allow(clippy::cast_precision_loss)]
                let speed = step / (elapsed_ms as f64 / 1000.0);
                if speed > self.config.max_speed_mps {
                    session.rejected_fixes = session.rejected_fixes.saturating_add(1);
                    tracing::debug!(speed_mps = speed, "fix rejected: too fast");
                    return Ok(FixOutcome::Rejected {
                        speed_mps: Some(speed),
                    });
                }
                step
            }
        };

        session.distance_m += added_m;
        session.last_fix = Some(fix);
        session.accepted_fixes = session.accepted_fixes.saturating_add(1);

        let radius = self.config.poi_trigger_radius_m;
        let mut discovered = Vec::new();
        for site in pois.iter_mut() {
            if site.status == PoiStatus::Undiscovered
                && within_radius(fix.coordinate, site.coordinate, radius)
                && poi::discover(site)
            {
                discovered.push(site.id);
            }
        }
        session.discovered.extend(discovered.iter().copied());

        Ok(FixOutcome::Accepted {
            added_m,
            discovered,
        })
    }

    /// End the session and roll its reward.
    pub fn finish(
        &mut self,
        now: DateTime<Utc>,
        table: &RewardTable,
        rarity: &RarityTable,
        rng: &mut impl Rng,
    ) -> Result<ExplorationSummary, ExplorationError> {
        let ExplorationState::Exploring(session) = &self.state else {
            return Err(ExplorationError::NotExploring);
        };

        let tier = tier_for(session.distance_m);
        let rewards = roll(tier, table, rarity, rng);
        let summary = ExplorationSummary {
            started_at: session.started_at,
            finished_at: now,
            distance_m: session.distance_m,
            tier,
            rewards,
            discovered: session.discovered.clone(),
            rejected_fixes: session.rejected_fixes,
        };
        tracing::info!(
            distance_m = summary.distance_m,
            ?tier,
            items = summary.rewards.len(),
            discovered = summary.discovered.len(),
            "exploration finished"
        );
        self.state = ExplorationState::Completed(summary.clone());
        Ok(summary)
    }

    /// Drop any session or summary and go idle.
    pub fn reset(&mut self) {
        self.state = ExplorationState::Idle;
    }
}

/// Scavenge a POI the player is standing at.
///
/// The reward tier comes from the POI's danger level. On success the POI
/// is marked looted.
pub fn scavenge_poi(
    site: &mut PointOfInterest,
    player: Coordinate,
    now: DateTime<Utc>,
    config: &ExplorationConfig,
    table: &RewardTable,
    rarity: &RarityTable,
    rng: &mut impl Rng,
) -> Result<Vec<ObtainedItem>, ExplorationError> {
    let distance_m = distance_meters(player, site.coordinate);
    if distance_m > config.poi_trigger_radius_m {
        return Err(ExplorationError::TooFarFromPoi {
            poi: site.id,
            distance_m,
            radius_m: config.poi_trigger_radius_m,
        });
    }
    if !poi::can_scavenge(site) {
        return Err(ExplorationError::NotScavengeable {
            poi: site.id,
            status: site.status,
        });
    }

    let tier = tier_for_danger(site.danger_level);
    let loot = roll(tier, table, rarity, rng);
    poi::mark_looted(site, now)?;
    tracing::info!(poi = %site.id, ?tier, items = loot.len(), "poi scavenged");
    Ok(loot)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;
    use frontier_geo::poi::new_poi;
    use frontier_inventory::ItemCatalog;
    use frontier_types::PoiType;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    /// Roughly 111 m per 0.001 degree of latitude.
    fn fix(lat_offset_milli: i32, secs: i64) -> LocationFix {
        LocationFix {
            coordinate: Coordinate::new(31.230 + f64::from(lat_offset_milli) / 1000.0, 121.470),
            timestamp: t0() + Duration::seconds(secs),
        }
    }

    fn rarity() -> RarityTable {
        RarityTable::from_catalog(ItemCatalog::starter().iter())
    }

    #[test]
    fn lifecycle_transitions() {
        let mut explorer = Explorer::new(ExplorationConfig::default());
        assert!(matches!(
            explorer.record_fix(fix(0, 0), &mut []),
            Err(ExplorationError::NotExploring)
        ));
        explorer.start(t0()).unwrap();
        assert!(matches!(explorer.start(t0()), Err(ExplorationError::AlreadyExploring)));

        let mut rng = SmallRng::seed_from_u64(1);
        explorer
            .finish(t0(), &RewardTable::default(), &rarity(), &mut rng)
            .unwrap();
        assert!(matches!(explorer.state(), ExplorationState::Completed(_)));
        explorer.start(t0()).unwrap();
        explorer.reset();
        assert_eq!(explorer.state(), &ExplorationState::Idle);
    }

    #[test]
    fn distance_accumulates_and_jitter_is_ignored() {
        let mut explorer = Explorer::new(ExplorationConfig::default());
        explorer.start(t0()).unwrap();
        explorer.record_fix(fix(0, 0), &mut []).unwrap();
        // ~111 m in 60 s
        let outcome = explorer.record_fix(fix(1, 60), &mut []).unwrap();
        assert!(matches!(outcome, FixOutcome::Accepted { added_m, .. } if added_m > 100.0));

        let jitter = LocationFix {
            coordinate: Coordinate::new(31.231_01, 121.470),
            timestamp: t0() + Duration::seconds(70),
        };
        assert_eq!(explorer.record_fix(jitter, &mut []).unwrap(), FixOutcome::Ignored);

        let ExplorationState::Exploring(session) = explorer.state() else {
            panic!("not exploring");
        };
        assert_eq!(session.accepted_fixes, 2);
        assert!((session.distance_m - 111.2).abs() < 1.0);
    }

    #[test]
    fn teleports_are_rejected() {
        let mut explorer = Explorer::new(ExplorationConfig::default());
        explorer.start(t0()).unwrap();
        explorer.record_fix(fix(0, 0), &mut []).unwrap();
        // ~1.1 km in 10 s
        let outcome = explorer.record_fix(fix(10, 10), &mut []).unwrap();
        assert!(matches!(outcome, FixOutcome::Rejected { speed_mps: Some(s) } if s > 100.0));
        // same instant
        let outcome = explorer.record_fix(fix(1, 0), &mut []).unwrap();
        assert_eq!(outcome, FixOutcome::Rejected { speed_mps: None });

        let ExplorationState::Exploring(session) = explorer.state() else {
            panic!("not exploring");
        };
        assert_eq!(session.rejected_fixes, 2);
        assert!(session.distance_m.abs() < f64::EPSILON);
    }

    #[test]
    fn nearby_pois_are_discovered_once() {
        let mut pois = vec![
            new_poi("Pharmacy", PoiType::Pharmacy, Coordinate::new(31.2301, 121.470), 2),
            new_poi("Depot", PoiType::Factory, Coordinate::new(31.240, 121.470), 4),
        ];
        let mut explorer = Explorer::new(ExplorationConfig::default());
        explorer.start(t0()).unwrap();

        let outcome = explorer.record_fix(fix(0, 0), &mut pois).unwrap();
        assert_eq!(
            outcome,
            FixOutcome::Accepted {
                added_m: 0.0,
                discovered: vec![pois[0].id]
            }
        );
        assert_eq!(pois[0].status, PoiStatus::Discovered);
        assert_eq!(pois[1].status, PoiStatus::Undiscovered);

        // walk away and back: no second discovery
        explorer.record_fix(fix(1, 60), &mut pois).unwrap();
        let back = explorer.record_fix(fix(0, 120), &mut pois).unwrap();
        assert!(matches!(back, FixOutcome::Accepted { discovered, .. } if discovered.is_empty()));
    }

    #[test]
    fn finish_rolls_by_distance_tier() {
        let mut explorer = Explorer::new(ExplorationConfig::default());
        explorer.start(t0()).unwrap();
        // 6 steps of ~111 m, one per minute: ~667 m, silver
        for step in 0..=6 {
            explorer
                .record_fix(fix(step, i64::from(step) * 60), &mut [])
                .unwrap();
        }
        let mut rng = SmallRng::seed_from_u64(7);
        let summary = explorer
            .finish(t0() + Duration::minutes(6), &RewardTable::default(), &rarity(), &mut rng)
            .unwrap();
        assert_eq!(summary.tier, RewardTier::Silver);
        assert_eq!(summary.rewards.len(), 2);
    }

    #[test]
    fn short_walk_earns_nothing() {
        let mut explorer = Explorer::new(ExplorationConfig::default());
        explorer.start(t0()).unwrap();
        explorer.record_fix(fix(0, 0), &mut []).unwrap();
        explorer.record_fix(fix(1, 60), &mut []).unwrap();
        let mut rng = SmallRng::seed_from_u64(7);
        let summary = explorer
            .finish(t0(), &RewardTable::default(), &rarity(), &mut rng)
            .unwrap();
        assert_eq!(summary.tier, RewardTier::None);
        assert!(summary.rewards.is_empty());
    }

    #[test]
    fn scavenge_requires_presence_and_status() {
        let config = ExplorationConfig::default();
        let table = RewardTable::default();
        let rarity = rarity();
        let mut rng = SmallRng::seed_from_u64(3);
        let here = Coordinate::new(31.230, 121.470);
        let mut site = new_poi("Clinic", PoiType::Hospital, here, 3);

        assert!(matches!(
            scavenge_poi(&mut site, here, t0(), &config, &table, &rarity, &mut rng),
            Err(ExplorationError::NotScavengeable { status: PoiStatus::Undiscovered, .. })
        ));
        poi::discover(&mut site);

        let far = Coordinate::new(31.240, 121.470);
        assert!(matches!(
            scavenge_poi(&mut site, far, t0(), &config, &table, &rarity, &mut rng),
            Err(ExplorationError::TooFarFromPoi { .. })
        ));

        let loot = scavenge_poi(&mut site, here, t0(), &config, &table, &rarity, &mut rng).unwrap();
        // danger 3 is gold: three items
        assert_eq!(loot.len(), 3);
        assert_eq!(site.status, PoiStatus::Looted);
        assert_eq!(site.last_looted_at, Some(t0()));

        assert!(matches!(
            scavenge_poi(&mut site, here, t0(), &config, &table, &rarity, &mut rng),
            Err(ExplorationError::NotScavengeable { status: PoiStatus::Looted, .. })
        ));
    }
}
