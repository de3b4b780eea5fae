//! Stacking: adding stake to an already-growing plot.
//!
//! Stacking reuses the plot's existing ledger farm -- the intent targets
//! `stakeInto(farmId)` -- and, as an incentive for consolidating stakes,
//! shortens the remaining growth duration by a configured fraction. The
//! shortening is floored so repeated stacking approaches but never crosses
//! the configured minimum remaining duration, and it never lengthens a
//! plot that is already inside the floor.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use verdant_types::{CallDescriptor, CallPayload, IntentKind, Plot, TransactionIntent};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::stake::{ValidatedStake, validate_stake};

/// Build a `stakeInto(farmId)` intent for the growing plot at
/// `plot_index`.
///
/// Preconditions: the plot is planted, not yet ready, and holds a ledger
/// correlation key.
///
/// # Errors
///
/// Returns [`GameError::NoCorrelation`] when any precondition fails (the
/// request is a no-op -- no intent is built), or
/// [`GameError::InvalidAmount`] for a bad amount.
pub fn build_stack_intent(
    plot: &Plot,
    plot_index: usize,
    input: &str,
    config: &GameConfig,
) -> Result<(TransactionIntent, ValidatedStake), GameError> {
    if !plot.is_growing() {
        return Err(GameError::NoCorrelation { plot: plot_index });
    }
    let farm_id = plot
        .farm_id
        .ok_or(GameError::NoCorrelation { plot: plot_index })?;
    let validated = validate_stake(input, config)?;
    let intent = TransactionIntent::new(
        IntentKind::StackStake,
        plot_index,
        vec![CallDescriptor {
            target: config.staking.contract_address.clone(),
            payload: CallPayload::StakeInto { farm_id },
            value_raw: validated.value_raw,
        }],
    );
    Ok((intent, validated))
}

/// Apply the optimistic stack to a plot: add the stake and shorten the
/// remaining growth duration.
///
/// The new remaining duration is
/// `max(remaining * (1 - reduction_factor), min_remaining_ms)`, and never
/// exceeds the current remaining duration -- a plot already inside the
/// floor keeps its (shorter) deadline. Only `harvest_time_ms` moves;
/// `plant_time_ms` is untouched, so elapsed progress is preserved.
///
/// # Errors
///
/// Returns [`GameError::AmountOverflow`] if the stake addition overflows.
pub fn apply_stack(
    plot: &mut Plot,
    amount: Decimal,
    now_ms: i64,
    config: &GameConfig,
) -> Result<(), GameError> {
    plot.stake_amount = plot
        .stake_amount
        .checked_add(amount)
        .ok_or(GameError::AmountOverflow)?;

    let remaining = plot.remaining_ms(now_ms);
    let shortened = shortened_remaining_ms(remaining, config);
    plot.harvest_time_ms = now_ms.saturating_add(shortened);
    Ok(())
}

/// Compute the shortened remaining duration for one stack.
fn shortened_remaining_ms(remaining_ms: i64, config: &GameConfig) -> i64 {
    let keep_factor = Decimal::ONE.saturating_sub(config.stacking.reduction_factor);
    let reduced = Decimal::from(remaining_ms)
        .checked_mul(keep_factor)
        .and_then(|d| d.floor().to_i64())
        .unwrap_or(remaining_ms);
    reduced.max(config.stacking.min_remaining_ms).min(remaining_ms)
}
