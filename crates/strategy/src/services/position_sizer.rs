use common::EngineError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Whole-share quantity for `cash * cash_at_risk` at `price`.
///
/// Rounds half away from zero, so the result is 0 exactly when
/// `cash * cash_at_risk < price / 2`. Negative cash sizes to 0. A quote that
/// sizes beyond what a share count can hold is insufficient data for the tick.
pub fn size(cash: Decimal, price: Decimal, cash_at_risk: Decimal) -> Result<u64, EngineError> {
    if price <= Decimal::ZERO {
        return Err(EngineError::Configuration(format!(
            "cannot size a position at non-positive price {}",
            price
        )));
    }

    let out_of_range = || {
        EngineError::InsufficientData(format!(
            "position size for cash {} at price {} is out of range",
            cash, price
        ))
    };

    let shares = cash
        .checked_mul(cash_at_risk)
        .and_then(|allocation| allocation.checked_div(price))
        .ok_or_else(out_of_range)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    if shares <= Decimal::ZERO {
        return Ok(0);
    }
    shares.to_u64().ok_or_else(out_of_range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_half_of_ten_thousand_at_fifty() {
        assert_eq!(size(dec!(10000), dec!(50), dec!(0.5)).unwrap(), 100);
    }

    #[test]
    fn test_rounds_to_nearest_share() {
        // 1000 * 0.5 / 30 = 16.67
        assert_eq!(size(dec!(1000), dec!(30), dec!(0.5)).unwrap(), 17);
        // 1000 * 0.5 / 300 = 1.67
        assert_eq!(size(dec!(1000), dec!(300), dec!(0.5)).unwrap(), 2);
        // 1000 * 0.5 / 450 = 1.11
        assert_eq!(size(dec!(1000), dec!(450), dec!(0.5)).unwrap(), 1);
    }

    #[test]
    fn test_zero_exactly_below_half_a_share() {
        // allocation 24.99 vs half price 25
        assert_eq!(size(dec!(49.98), dec!(50), dec!(0.5)).unwrap(), 0);
        // allocation 25 == half price rounds up
        assert_eq!(size(dec!(50), dec!(50), dec!(0.5)).unwrap(), 1);
        assert_eq!(size(dec!(0), dec!(50), dec!(0.5)).unwrap(), 0);
    }

    #[test]
    fn test_full_cash_at_risk() {
        assert_eq!(size(dec!(475.31), dec!(475.31), Decimal::ONE).unwrap(), 1);
    }

    #[test]
    fn test_negative_cash_sizes_to_zero() {
        assert_eq!(size(dec!(-5000), dec!(50), dec!(0.5)).unwrap(), 0);
    }

    #[test]
    fn test_sub_penny_price_overflow_is_an_error() {
        let res = size(dec!(1e12), dec!(0.0000000000000000001), dec!(0.5));
        assert!(matches!(res, Err(EngineError::InsufficientData(_))));
    }

    #[test]
    fn test_share_count_beyond_u64_is_an_error() {
        let res = size(dec!(1e20), Decimal::ONE, Decimal::ONE);
        assert!(matches!(res, Err(EngineError::InsufficientData(_))));
        assert_eq!(size(dec!(1e18), Decimal::ONE, Decimal::ONE).unwrap(), 1_000_000_000_000_000_000);
    }

    #[test]
    fn test_non_positive_price_is_rejected() {
        for price in [Decimal::ZERO, dec!(-1)] {
            assert!(matches!(
                size(dec!(10000), price, dec!(0.5)),
                Err(EngineError::Configuration(_))
            ));
        }
    }
}
