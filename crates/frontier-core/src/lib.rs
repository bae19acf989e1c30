//! Game rules that tie the Frontier crates together.
//!
//! - [`config`] -- [`GameConfig`] loaded from YAML
//! - [`exploration`] -- Walk sessions, POI discovery, scavenging
//! - [`claim`] -- Claim walks that become territories
//! - [`building`] -- Placement checks against territory ownership and bounds

pub mod building;
pub mod claim;
pub mod config;
pub mod error;
pub mod exploration;

pub use building::validate_placement;
pub use claim::ClaimTracker;
pub use config::{ConfigError, ExplorationConfig, GameConfig, LoggingConfig};
pub use error::{BuildingError, ExplorationError};
pub use exploration::{
    ExplorationSession, ExplorationState, ExplorationSummary, Explorer, FixOutcome, scavenge_poi,
};
