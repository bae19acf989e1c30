//! Item catalog and inventory reconciliation for Frontier.
//!
//! - [`catalog`] -- Static item definitions and stack limits
//! - [`inventory`] -- Per-user stacks: partial add, atomic remove, weight
//! - [`mailbox`] -- Claiming attachments with a claimed/remaining split
//! - [`service`] -- Per-user locked inventories and ordered pair locking

pub mod catalog;
pub mod error;
pub mod inventory;
pub mod mailbox;
pub mod service;

pub use catalog::ItemCatalog;
pub use error::InventoryError;
pub use inventory::{Inventory, ItemShortfall};
pub use mailbox::{ClaimResult, MailItem, claim_mail};
pub use service::{InventoryConfig, InventoryService};
