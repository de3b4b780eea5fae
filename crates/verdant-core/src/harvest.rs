//! Harvesting: validating readiness, describing the `harvest(farmId)`
//! call, and settling a confirmed collection.
//!
//! Building the intent mutates nothing. The plot resets to empty -- and
//! the reward is credited -- only in [`settle_harvest`], which the session
//! runs when the external executor reports success.

use verdant_types::{CallDescriptor, CallPayload, GameProgress, IntentKind, Plot, TransactionIntent};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::reward::{self, RewardOutcome};

/// Build a `harvest(farmId)` intent for the plot at `plot_index`.
///
/// # Errors
///
/// Returns [`GameError::NotReady`] if the plot has not matured, or
/// [`GameError::NoCorrelation`] if it has no ledger farm. Either way no
/// intent is built and no plot field changes.
pub fn build_harvest_intent(
    plot: &Plot,
    plot_index: usize,
    config: &GameConfig,
) -> Result<TransactionIntent, GameError> {
    if !plot.ready {
        return Err(GameError::NotReady { plot: plot_index });
    }
    let farm_id = plot
        .farm_id
        .ok_or(GameError::NoCorrelation { plot: plot_index })?;
    Ok(TransactionIntent::new(
        IntentKind::Harvest,
        plot_index,
        vec![CallDescriptor {
            target: config.staking.contract_address.clone(),
            payload: CallPayload::Harvest { farm_id },
            value_raw: 0,
        }],
    ))
}

/// Settle a confirmed harvest: credit the reward, run the level check,
/// and reset the plot to empty with its correlation key cleared.
///
/// # Errors
///
/// Returns [`GameError::AmountOverflow`] if the reward credit overflows;
/// the plot is left unreset so the settlement can be retried.
pub fn settle_harvest(
    plot: &mut Plot,
    progress: &mut GameProgress,
    config: &GameConfig,
) -> Result<RewardOutcome, GameError> {
    let outcome = reward::apply_harvest_reward(progress, plot.stake_amount, &config.rewards)?;
    plot.reset();
    Ok(outcome)
}
