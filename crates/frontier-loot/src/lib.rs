//! Reward tiers and loot rolling for Frontier.
//!
//! Both components are pure: no I/O, no logging, no shared state. Callers
//! pass in the RNG, which keeps rolls reproducible under test.
//!
//! # Modules
//!
//! - [`tier`] -- Distance-to-tier breakpoints and per-tier reward tables.
//! - [`roller`] -- Band rolls and item selection through a [`RarityTable`].

pub mod roller;
pub mod tier;

// Re-export primary types at crate root.
pub use roller::{RarityTable, roll, roll_band};
pub use tier::{RewardTable, TierRewards, tier_for, tier_for_danger};
