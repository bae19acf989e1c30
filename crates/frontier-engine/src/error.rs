//! Error types for the demo binary.
//!
//! [`EngineError`] wraps every subsystem error the scripted session can
//! hit, so each step can propagate with `?`.

/// Top-level error for the demo binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: frontier_core::ConfigError,
    },

    /// Territory or POI handling failed.
    #[error("geo error: {source}")]
    Geo {
        /// The underlying geo error.
        #[from]
        source: frontier_geo::GeoError,
    },

    /// Building placement was refused.
    #[error("building error: {source}")]
    Building {
        /// The underlying placement error.
        #[from]
        source: frontier_core::BuildingError,
    },

    /// The exploration session failed.
    #[error("exploration error: {source}")]
    Exploration {
        /// The underlying exploration error.
        #[from]
        source: frontier_core::ExplorationError,
    },

    /// An inventory operation failed.
    #[error("inventory error: {source}")]
    Inventory {
        /// The underlying inventory error.
        #[from]
        source: frontier_inventory::InventoryError,
    },

    /// A trade operation failed.
    #[error("trade error: {source}")]
    Trade {
        /// The underlying trade error.
        #[from]
        source: frontier_trade::TradeError,
    },

    /// The script expected something the session did not produce.
    #[error("script error: {message}")]
    Script {
        /// What went wrong.
        message: String,
    },
}
