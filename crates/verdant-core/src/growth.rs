//! Growth scheduling: deriving stage and readiness from elapsed time.
//!
//! The scheduler runs on a fixed wall-clock interval and recomputes the
//! two derived fields -- `growth_stage` and `ready` -- for every planted,
//! unharvested plot. Both are pure functions of
//! `(now, plant_time, harvest_time)`; nothing else on the plot is touched
//! and no transaction is ever triggered from here.
//!
//! Stage thresholds over normalized progress:
//!
//! ```text
//! progress < 0.33          -> Sprout  (1)
//! 0.33 <= progress < 0.66  -> Growing (2)
//! 0.66 <= progress < 1.0   -> Budding (3)
//! progress >= 1.0          -> Mature  (4), ready
//! ```
//!
//! A degenerate window (`harvest_time <= plant_time`) is immediately
//! mature. Within a single growth cycle the stage is monotonic: a tick
//! never lowers a stage already reached. A cycle resets only through a
//! fresh plant or a stack's timer shortening; reconciliation may overwrite
//! the fields independently because ledger truth takes precedence.

use chrono::Utc;
use rust_decimal::Decimal;

use verdant_types::{GrowthStage, Plot};

/// Progress below which a plot is in [`GrowthStage::Sprout`].
const SPROUT_BELOW: Decimal = Decimal::from_parts(33, 0, 0, false, 2);

/// Progress below which a plot is in [`GrowthStage::Growing`].
const GROWING_BELOW: Decimal = Decimal::from_parts(66, 0, 0, false, 2);

/// Current wall-clock time in epoch milliseconds.
///
/// All derivations take `now_ms` explicitly; this is the single place the
/// engine reads the clock.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Normalized growth progress in `[0, 1]` at `now_ms`.
///
/// A degenerate window (`harvest_ms <= plant_ms`) counts as complete.
pub fn growth_progress(now_ms: i64, plant_ms: i64, harvest_ms: i64) -> Decimal {
    let total = harvest_ms.saturating_sub(plant_ms);
    if total <= 0 {
        return Decimal::ONE;
    }
    let elapsed = now_ms.saturating_sub(plant_ms);
    if elapsed <= 0 {
        return Decimal::ZERO;
    }
    if elapsed >= total {
        return Decimal::ONE;
    }
    Decimal::from(elapsed)
        .checked_div(Decimal::from(total))
        .unwrap_or(Decimal::ONE)
}

/// Map normalized progress to `(stage, ready)`.
pub fn stage_for_progress(progress: Decimal) -> (GrowthStage, bool) {
    if progress < SPROUT_BELOW {
        (GrowthStage::Sprout, false)
    } else if progress < GROWING_BELOW {
        (GrowthStage::Growing, false)
    } else if progress < Decimal::ONE {
        (GrowthStage::Budding, false)
    } else {
        (GrowthStage::Mature, true)
    }
}

/// Map a ledger `growth_progress` percentage (0 through 100) to
/// `(stage, ready)` using the same thresholds as the clock path.
pub fn stage_for_percent(percent: u8) -> (GrowthStage, bool) {
    let clamped = percent.min(100);
    stage_for_progress(Decimal::new(i64::from(clamped), 2))
}

/// Recompute the derived fields of a single plot at `now_ms`.
///
/// No-op for empty or harvested plots. The stage never moves backwards
/// within a cycle, and `ready`, once set, stays set until the cycle ends.
pub fn advance_plot(plot: &mut Plot, now_ms: i64) {
    if !plot.planted || plot.harvested {
        return;
    }
    let progress = growth_progress(now_ms, plot.plant_time_ms, plot.harvest_time_ms);
    let (stage, ready) = stage_for_progress(progress);
    if stage > plot.growth_stage {
        plot.growth_stage = stage;
    }
    if ready {
        plot.ready = true;
    }
}

/// One scheduler pass over all plots.
///
/// `frozen` names the plot with an outstanding transaction intent, if any;
/// its derived fields are left untouched so the tick cannot race the
/// optimistic view of an in-flight harvest.
pub fn run_tick(plots: &mut [Plot], now_ms: i64, frozen: Option<usize>) {
    for (index, plot) in plots.iter_mut().enumerate() {
        if Some(index) == frozen {
            continue;
        }
        advance_plot(plot, now_ms);
    }
}
