//! Stake intent building: validating a proposed amount and describing the
//! `stake()` call.
//!
//! Building an intent never mutates plot state -- it only prepares a
//! [`TransactionIntent`] for the external executor. Building twice from
//! identical input yields the same call value (the intent id is local
//! bookkeeping). The plant itself is applied separately once the
//! executor confirms.

use rust_decimal::Decimal;

use verdant_types::{
    CallDescriptor, CallPayload, IntentKind, Plot, SeedKind, TransactionIntent, display_to_raw,
};

use crate::config::GameConfig;
use crate::error::GameError;

/// A stake amount that passed validation, in both precisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedStake {
    /// Display-precision amount.
    pub amount: Decimal,
    /// The same amount in smallest units, ready for the call's value.
    pub value_raw: u128,
}

/// Validate a proposed stake amount.
///
/// # Errors
///
/// Returns [`GameError::InvalidAmount`] if the input does not parse as a
/// finite decimal, is not strictly positive, is below the configured
/// minimum, or cannot be represented in smallest units.
pub fn validate_stake(input: &str, config: &GameConfig) -> Result<ValidatedStake, GameError> {
    let rejected = || GameError::InvalidAmount {
        input: input.to_owned(),
    };

    let amount: Decimal = input.trim().parse().map_err(|_| rejected())?;
    if amount <= Decimal::ZERO || amount < config.staking.min_stake {
        return Err(rejected());
    }
    let value_raw = display_to_raw(amount).ok_or_else(rejected)?;
    Ok(ValidatedStake { amount, value_raw })
}

/// Build a `stake()` intent for the plot at `plot_index`.
///
/// # Errors
///
/// Returns [`GameError::InvalidAmount`] per [`validate_stake`].
pub fn build_stake_intent(
    input: &str,
    plot_index: usize,
    config: &GameConfig,
) -> Result<(TransactionIntent, ValidatedStake), GameError> {
    let validated = validate_stake(input, config)?;
    let intent = TransactionIntent::new(
        IntentKind::Stake,
        plot_index,
        vec![CallDescriptor {
            target: config.staking.contract_address.clone(),
            payload: CallPayload::Stake,
            value_raw: validated.value_raw,
        }],
    );
    Ok((intent, validated))
}

/// Apply a confirmed plant to a plot: committed stake, timers from the
/// seed's growth window, stage 1.
///
/// The farm correlation key stays unassigned -- it is ledger-owned and
/// arrives with the first reconciliation that matches this plot.
pub fn apply_plant(plot: &mut Plot, seed: SeedKind, amount: Decimal, now_ms: i64) {
    plot.planted = true;
    plot.stake_amount = amount;
    plot.plant_time_ms = now_ms;
    plot.harvest_time_ms = now_ms.saturating_add(seed.growth_ms());
    plot.growth_stage = verdant_types::GrowthStage::Sprout;
    plot.ready = false;
    plot.active = true;
    plot.harvested = false;
    plot.seed = Some(seed);
}

#[cfg(test)]
mod tests {
    use verdant_types::RAW_PER_TOKEN;

    use super::*;

    fn config() -> GameConfig {
        GameConfig::default()
    }

    #[test]
    fn whole_token_amount_validates() {
        let validated = validate_stake("1", &config());
        assert_eq!(
            validated,
            Ok(ValidatedStake {
                amount: Decimal::ONE,
                value_raw: RAW_PER_TOKEN,
            })
        );
    }

    #[test]
    fn fractional_amount_validates() {
        let validated = validate_stake("0.25", &config());
        assert_eq!(validated.map(|v| v.value_raw), Ok(250_000_000_000_000_000));
    }

    #[test]
    fn garbage_zero_and_negative_inputs_rejected() {
        for input in ["", "abc", "NaN", "0", "-1", "1e", "0.0"] {
            assert!(
                matches!(
                    validate_stake(input, &config()),
                    Err(GameError::InvalidAmount { .. })
                ),
                "input {input:?} should be rejected"
            );
        }
    }

    #[test]
    fn below_minimum_rejected() {
        let mut config = config();
        config.staking.min_stake = Decimal::ONE;
        assert!(matches!(
            validate_stake("0.5", &config),
            Err(GameError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn building_is_idempotent_in_call_value() {
        let config = config();
        let shape = |input: &str| {
            build_stake_intent(input, 4, &config)
                .ok()
                .map(|(intent, _)| (intent.kind, intent.plot_index, intent.calls))
        };
        let a = shape("2.5");
        let b = shape("2.5");
        assert!(a.is_some());
        assert_eq!(a, b);
    }

    #[test]
    fn building_does_not_touch_plot_state() {
        let plot = Plot::empty();
        let before = plot.clone();
        let _ = build_stake_intent("1", 0, &config());
        assert_eq!(plot, before);
    }

    #[test]
    fn confirmed_plant_sets_timers_and_stage() {
        let mut plot = Plot::empty();
        apply_plant(&mut plot, SeedKind::Base, Decimal::ONE, 100_000);
        assert!(plot.planted);
        assert_eq!(plot.plant_time_ms, 100_000);
        assert_eq!(plot.harvest_time_ms, 130_000);
        assert_eq!(plot.growth_stage, verdant_types::GrowthStage::Sprout);
        assert_eq!(plot.farm_id, None);
        assert_eq!(plot.seed, Some(SeedKind::Base));
    }
}
