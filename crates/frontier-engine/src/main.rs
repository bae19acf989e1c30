//! Demo binary for Frontier.
//!
//! Loads `frontier-config.yaml` (or defaults), installs logging, and
//! replays a scripted session through the real services: claim, build,
//! explore, scavenge, trade.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `frontier-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Validate configuration
//! 4. Seed the loot RNG (`FRONTIER_SEED` or OS entropy)
//! 5. Run the scripted session and print the accept responses

mod demo;
mod error;

use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use frontier_core::{GameConfig, LoggingConfig};

use crate::error::EngineError;

/// Application entry point for the demo.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config().context("loading frontier-config.yaml")?;
    init_logging(&config.logging);
    info!("frontier-engine starting");

    config.validate().context("validating configuration")?;
    info!(
        poi_trigger_radius_m = config.exploration.poi_trigger_radius_m,
        max_speed_mps = config.exploration.max_speed_mps,
        free_capacity = config.inventory.free_capacity,
        max_expiry_hours = config.trade.max_expiry_hours,
        "Configuration loaded"
    );

    let seed = std::env::var("FRONTIER_SEED")
        .ok()
        .and_then(|raw| raw.parse::<u64>().ok());
    let mut rng = match seed {
        Some(seed) => {
            info!(seed, "using fixed loot seed");
            SmallRng::seed_from_u64(seed)
        }
        None => SmallRng::from_os_rng(),
    };

    let report = demo::run(&config, Utc::now(), &mut rng)
        .await
        .context("scripted session failed")?;

    info!(
        territory = %report.territory.name,
        area_m2 = report.territory.area_m2,
        distance_m = report.exploration.distance_m,
        tier = ?report.exploration.tier,
        walk_items = report.exploration.rewards.len(),
        scavenged_items = report.scavenged.len(),
        "Session finished"
    );
    println!("{}", serde_json::to_string_pretty(&report.accepted)?);
    println!("{}", serde_json::to_string_pretty(&report.rejected)?);
    Ok(())
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));
    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

/// Load `frontier-config.yaml` from the working directory, or defaults if
/// it is absent.
fn load_config() -> Result<GameConfig, EngineError> {
    let config_path = Path::new("frontier-config.yaml");
    if config_path.exists() {
        Ok(GameConfig::from_file(config_path)?)
    } else {
        Ok(GameConfig::default())
    }
}
