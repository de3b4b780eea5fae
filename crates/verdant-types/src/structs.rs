//! Core entity structs for the Verdant farming engine.
//!
//! [`Plot`] and [`GameProgress`] are the locally owned optimistic state.
//! [`LedgerFarm`] and [`LedgerUser`] mirror the authoritative on-chain
//! records exactly as the contract reports them (integer smallest units,
//! epoch seconds); conversion to display precision happens in the
//! reconciler, never here.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{GrowthStage, SeedKind};
use crate::ids::FarmId;

// ---------------------------------------------------------------------------
// Plot
// ---------------------------------------------------------------------------

/// One of the fixed local staking slots.
///
/// A plot starts empty, becomes planted after a confirmed stake (or via
/// ledger hydration at session start), and becomes empty again only after
/// a confirmed harvest. `growth_stage` and `ready` are derived fields
/// recomputed by the growth scheduler and overwritten by reconciliation;
/// everything else changes only through confirmed actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Plot {
    /// Whether value is currently committed to this slot.
    pub planted: bool,
    /// Committed stake in display precision (whole tokens).
    #[ts(as = "String")]
    pub stake_amount: Decimal,
    /// Epoch milliseconds when the stake was planted.
    pub plant_time_ms: i64,
    /// Epoch milliseconds of the maturity deadline.
    pub harvest_time_ms: i64,
    /// Derived growth phase, ordinal 0 through 4.
    pub growth_stage: GrowthStage,
    /// Whether the plot is mature and harvestable. Implies `planted` and
    /// `growth_stage == Mature`.
    pub ready: bool,
    /// Ledger-side active flag, copied on reconciliation.
    pub active: bool,
    /// Ledger-side harvested flag, copied on reconciliation.
    pub harvested: bool,
    /// Correlation key tying this slot to a ledger farm. Stable for the
    /// plot's lifetime until harvest completes.
    pub farm_id: Option<FarmId>,
    /// The token variety planted here, if any.
    pub seed: Option<SeedKind>,
}

impl Plot {
    /// Create an empty, unplanted plot.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Reset the plot to empty after a confirmed harvest, clearing the
    /// farm correlation key.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether the plot is planted and still maturing.
    pub const fn is_growing(&self) -> bool {
        self.planted && !self.ready && !self.harvested
    }

    /// Remaining growth time in milliseconds at `now_ms`, zero once the
    /// deadline has passed or nothing is planted.
    pub const fn remaining_ms(&self, now_ms: i64) -> i64 {
        if !self.planted {
            return 0;
        }
        let remaining = self.harvest_time_ms.saturating_sub(now_ms);
        if remaining < 0 { 0 } else { remaining }
    }

    /// Check the readiness invariant: `ready` implies planted and mature.
    pub const fn readiness_consistent(&self) -> bool {
        !self.ready || (self.planted && self.growth_stage.is_mature())
    }
}

// ---------------------------------------------------------------------------
// GameProgress
// ---------------------------------------------------------------------------

/// The player's session progression: experience, level, and token balance.
///
/// Mutated only by the reward engine and by ledger hydration. `level` is a
/// pure, monotonic non-decreasing function of `experience` and never moves
/// backwards within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameProgress {
    /// Accumulated experience points.
    pub experience: u64,
    /// Current level, starting at 1.
    pub level: u32,
    /// Spendable token balance in display precision.
    #[ts(as = "String")]
    pub token_balance: Decimal,
}

impl GameProgress {
    /// Create starting progress: level 1, no experience, the given
    /// starting balance.
    pub const fn starting(token_balance: Decimal) -> Self {
        Self {
            experience: 0,
            level: 1,
            token_balance,
        }
    }
}

impl Default for GameProgress {
    fn default() -> Self {
        Self::starting(Decimal::ZERO)
    }
}

// ---------------------------------------------------------------------------
// Ledger records (authoritative, externally owned)
// ---------------------------------------------------------------------------

/// A farm record exactly as the ledger contract reports it.
///
/// Amounts are integer smallest units (18 decimals); times are epoch
/// seconds. These records are only ever read -- local fields derived from
/// them are overwritten wholesale on each reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LedgerFarm {
    /// Ledger-assigned correlation key.
    pub farm_id: FarmId,
    /// Staked amount in smallest units.
    pub staked_amount_raw: u128,
    /// Plant time in epoch seconds.
    pub plant_time_s: i64,
    /// Maturity deadline in epoch seconds.
    pub harvest_time_s: i64,
    /// The contract's own stage ordinal. Carried for completeness; the
    /// engine derives the local stage from `growth_progress` instead.
    pub growth_stage: u8,
    /// Growth progress percentage, 0 through 100.
    pub growth_progress: u8,
    /// Whether the farm is live on the ledger.
    pub active: bool,
    /// Whether the farm has already been harvested on the ledger.
    pub harvested: bool,
}

impl LedgerFarm {
    /// Whether this record should drive a local plot: live and not yet
    /// collected.
    pub const fn is_live(&self) -> bool {
        self.active && !self.harvested
    }
}

/// The per-address user aggregate exactly as the ledger reports it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LedgerUser {
    /// Lifetime experience in ledger units.
    pub total_xp: u128,
    /// Ledger-computed level.
    pub level: u64,
    /// Number of completed harvests.
    pub total_harvests: u64,
    /// Lifetime staked amount in smallest units.
    pub total_staked_raw: u128,
    /// Lifetime rewards in smallest units.
    pub total_rewards_raw: u128,
}
