//! Unit conversion between ledger wire formats and local display formats.
//!
//! The ledger reports amounts as integer smallest units with 18 decimals
//! and times as epoch seconds. Locally the engine works in display-precision
//! [`Decimal`] tokens and epoch milliseconds. Every conversion here is
//! checked: overflow or precision loss yields `None` rather than a silently
//! wrong number, and the reconciler falls back to the last valid value.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Number of decimals in the ledger's smallest unit.
pub const TOKEN_DECIMALS: u32 = 18;

/// Smallest units per whole display token (`10^18`).
pub const RAW_PER_TOKEN: u128 = 1_000_000_000_000_000_000;

/// Convert a raw smallest-unit amount to display precision.
///
/// Returns `None` if the value exceeds [`Decimal`]'s 96-bit mantissa
/// (amounts above roughly `7.9e10` whole tokens).
pub fn raw_to_display(raw: u128) -> Option<Decimal> {
    let signed = i128::try_from(raw).ok()?;
    Decimal::try_from_i128_with_scale(signed, TOKEN_DECIMALS)
        .ok()
        .map(|amount| amount.normalize())
}

/// Convert a display-precision amount to raw smallest units.
///
/// Returns `None` for negative amounts, amounts with more than 18
/// fractional decimals (sub-unit precision loss), or amounts too large for
/// the multiplication.
pub fn display_to_raw(amount: Decimal) -> Option<u128> {
    if amount.is_sign_negative() {
        return None;
    }
    let scaled = amount.checked_mul(Decimal::from(RAW_PER_TOKEN))?;
    if !scaled.fract().is_zero() {
        return None;
    }
    scaled.to_u128()
}

/// Convert epoch seconds to epoch milliseconds, checked.
pub const fn seconds_to_ms(seconds: i64) -> Option<i64> {
    seconds.checked_mul(1_000)
}

/// Convert epoch milliseconds to epoch seconds, truncating toward zero.
pub const fn ms_to_seconds(ms: i64) -> i64 {
    ms / 1_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_token_round_trips() {
        let display = raw_to_display(RAW_PER_TOKEN);
        assert_eq!(display, Some(Decimal::ONE));
        assert_eq!(display_to_raw(Decimal::ONE), Some(RAW_PER_TOKEN));
    }

    #[test]
    fn smallest_unit_converts() {
        let display = raw_to_display(1);
        assert_eq!(display, Some(Decimal::new(1, TOKEN_DECIMALS)));
        assert_eq!(display_to_raw(Decimal::new(1, TOKEN_DECIMALS)), Some(1));
    }

    #[test]
    fn fractional_half_token() {
        // 0.5 tokens = 5 * 10^17 smallest units.
        assert_eq!(display_to_raw(Decimal::new(5, 1)), Some(RAW_PER_TOKEN / 2));
    }

    #[test]
    fn negative_amount_rejected() {
        assert_eq!(display_to_raw(Decimal::new(-1, 0)), None);
    }

    #[test]
    fn sub_unit_precision_rejected() {
        // 19 fractional decimals cannot be represented in smallest units.
        let too_fine = Decimal::new(1, 19);
        assert_eq!(display_to_raw(too_fine), None);
    }

    #[test]
    fn oversized_raw_rejected() {
        assert_eq!(raw_to_display(u128::MAX), None);
    }

    #[test]
    fn time_conversions() {
        assert_eq!(seconds_to_ms(30), Some(30_000));
        assert_eq!(ms_to_seconds(30_999), 30);
        assert_eq!(seconds_to_ms(i64::MAX), None);
    }
}
