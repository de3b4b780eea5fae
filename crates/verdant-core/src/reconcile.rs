//! Ledger reconciliation: merging authoritative chain data into local
//! plot state.
//!
//! The ledger is the source of truth for stake amounts and timers. Each
//! reconciliation pass overwrites the matched plots' fields wholesale --
//! this is a state-data refresh, not a lifecycle transition. Ledger
//! `growth_progress` takes precedence over the locally computed
//! clock-based stage and readiness.
//!
//! Two deliberate asymmetries:
//!
//! - Farms absent from a batch leave their local slots untouched.
//!   Reconciliation never implicitly clears a plot; only a confirmed
//!   harvest empties one.
//! - A conversion that fails (overflowing amount, out-of-range time)
//!   retains the last valid local value for that field instead of
//!   propagating a garbage state.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use verdant_types::{
    FarmId, GameProgress, GrowthStage, LedgerFarm, LedgerUser, raw_to_display, seconds_to_ms,
};

use crate::growth::stage_for_percent;
use crate::store::PlotStateStore;

/// Counters describing one reconciliation pass, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Farms matched to a plot by correlation key.
    pub matched: usize,
    /// Farms hydrated into a previously free slot.
    pub hydrated: usize,
    /// Farms skipped: inactive, already harvested, or no free slot.
    pub skipped: usize,
}

/// Merge a batch of ledger farms into the local plot array.
///
/// Each live farm is located by correlation key, or placed into the first
/// free slot if the key is not yet assigned locally (session-start
/// hydration and freshly confirmed stakes). Located plots have their
/// stake, timers, stage, and readiness overwritten from the ledger
/// record. A farm in `harvestable` is marked mature and ready regardless
/// of its reported progress.
///
/// The plot with an intent in flight is frozen: a batch landing while a
/// transaction is pending neither overwrites that plot nor binds a new
/// farm to it. Its record is deferred to the next refresh.
pub fn reconcile_farms(
    store: &mut PlotStateStore,
    batch: &[LedgerFarm],
    harvestable: &BTreeSet<FarmId>,
) -> ReconcileSummary {
    let mut summary = ReconcileSummary::default();
    let frozen = store.frozen_plot();

    for farm in batch {
        if !farm.is_live() {
            summary.skipped = summary.skipped.saturating_add(1);
            continue;
        }

        // Match by correlation key first; then adopt a freshly planted
        // plot that is still awaiting its key; then hydrate a free slot.
        // The adoption lookups skip the frozen plot themselves.
        let located = store.find_by_farm_id(farm.farm_id);
        if located.is_some() && located == frozen {
            debug!(farm_id = %farm.farm_id, "plot has an intent in flight, deferring record");
            summary.skipped = summary.skipped.saturating_add(1);
            continue;
        }
        let index = located
            .or_else(|| store.first_uncorrelated_planted())
            .or_else(|| store.first_free_slot());

        match (located, index) {
            (Some(_), _) => summary.matched = summary.matched.saturating_add(1),
            (None, Some(_)) => summary.hydrated = summary.hydrated.saturating_add(1),
            (None, None) => {
                warn!(farm_id = %farm.farm_id, "no free plot for ledger farm, skipping");
                summary.skipped = summary.skipped.saturating_add(1);
            }
        }

        if let Some(index) = index {
            overwrite_plot(store, index, farm, harvestable.contains(&farm.farm_id));
        }
    }

    debug!(
        matched = summary.matched,
        hydrated = summary.hydrated,
        skipped = summary.skipped,
        "ledger farm reconciliation complete"
    );
    summary
}

/// Overwrite one plot from its ledger record.
fn overwrite_plot(
    store: &mut PlotStateStore,
    index: usize,
    farm: &LedgerFarm,
    harvest_ready: bool,
) {
    if let Err(error) = store.assign_farm_id(index, farm.farm_id) {
        warn!(farm_id = %farm.farm_id, %error, "farm correlation conflict, skipping record");
        return;
    }
    let Ok(plot) = store.plot_mut(index) else {
        return;
    };

    plot.planted = true;
    plot.active = farm.active;
    plot.harvested = farm.harvested;

    match raw_to_display(farm.staked_amount_raw) {
        Some(amount) => plot.stake_amount = amount,
        None => warn!(farm_id = %farm.farm_id, "staked amount overflow, retaining local value"),
    }
    match (seconds_to_ms(farm.plant_time_s), seconds_to_ms(farm.harvest_time_s)) {
        (Some(plant_ms), Some(harvest_ms)) => {
            plot.plant_time_ms = plant_ms;
            plot.harvest_time_ms = harvest_ms;
        }
        _ => warn!(farm_id = %farm.farm_id, "farm timestamps out of range, retaining local timers"),
    }

    // Ledger progress takes precedence over the clock-derived values,
    // and the ledger's harvestable set over both.
    let (stage, ready) = if harvest_ready {
        (GrowthStage::Mature, true)
    } else {
        stage_for_percent(farm.growth_progress)
    };
    plot.growth_stage = stage;
    plot.ready = ready;
}

/// Overwrite session progress from the ledger's user aggregate.
///
/// `total_xp` maps to experience, `level` to level, and `total_rewards`
/// to the token balance. Any field that fails conversion retains its last
/// valid local value.
pub fn reconcile_user(progress: &mut GameProgress, user: &LedgerUser) {
    match u64::try_from(user.total_xp) {
        Ok(experience) => progress.experience = experience,
        Err(_) => warn!("ledger total_xp out of range, retaining local experience"),
    }
    match u32::try_from(user.level) {
        Ok(level) if level >= 1 => progress.level = level,
        _ => warn!(level = user.level, "ledger level out of range, retaining local level"),
    }
    match raw_to_display(user.total_rewards_raw) {
        Some(balance) => progress.token_balance = balance,
        None => warn!("ledger rewards overflow, retaining local balance"),
    }
}
