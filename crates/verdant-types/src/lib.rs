//! Shared type definitions for the Verdant farming engine.
//!
//! This crate is the single source of truth for all types used across the
//! Verdant workspace. Types defined here flow downstream to `TypeScript`
//! via `ts-rs` for the front end.
//!
//! # Modules
//!
//! - [`ids`] -- Typed identifiers: locally minted intent IDs and
//!   ledger-assigned farm correlation keys
//! - [`enums`] -- Growth stages, intent kinds, and seed varieties
//! - [`structs`] -- Local plot/progress state and authoritative ledger
//!   records
//! - [`intent`] -- Transaction intents and contract call descriptors
//! - [`units`] -- Checked conversion between ledger wire units and
//!   display units

pub mod enums;
pub mod ids;
pub mod intent;
pub mod structs;
pub mod units;

// Re-export all public types at crate root for convenience.
pub use enums::{GrowthStage, IntentKind, SeedKind};
pub use ids::{FarmId, IntentId};
pub use intent::{CallDescriptor, CallPayload, TransactionIntent};
pub use structs::{GameProgress, LedgerFarm, LedgerUser, Plot};
pub use units::{RAW_PER_TOKEN, TOKEN_DECIMALS, display_to_raw, raw_to_display, seconds_to_ms};
