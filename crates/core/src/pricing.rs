//! Line-item price normalization.
//!
//! Order and invoice items store two-decimal amounts. Incoming values are
//! truncated toward zero to cents and must stay strictly positive.

use std::str::FromStr;

use crm_shared::AppError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Decimal places kept for every stored amount.
pub const PRICE_SCALE: u32 = 2;

/// How a price adjustment is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentType {
    /// Absolute amount.
    Dollar,
    /// Percentage of the original price.
    Percentage,
}

impl AdjustmentType {
    /// Returns the column value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dollar => "dollar",
            Self::Percentage => "percentage",
        }
    }
}

impl FromStr for AdjustmentType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dollar" => Ok(Self::Dollar),
            "percentage" => Ok(Self::Percentage),
            other => Err(AppError::Validation(format!(
                "adjustment_type '{other}' must be dollar or percentage"
            ))),
        }
    }
}

/// Truncates an amount to cents.
#[must_use]
pub fn round_down(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::ToZero)
}

/// Truncates an amount to cents and requires it to be positive.
///
/// # Errors
///
/// Returns `AppError::Validation` naming `field` if the truncated amount is not
/// greater than zero.
pub fn positive_price(field: &str, value: Decimal) -> Result<Decimal, AppError> {
    let rounded = round_down(value);
    if rounded > Decimal::ZERO {
        Ok(rounded)
    } else {
        Err(AppError::Validation(format!("{field} must be greater than 0")))
    }
}

/// Truncates an optional amount, see [`positive_price`].
///
/// # Errors
///
/// Returns `AppError::Validation` if a present amount is not positive.
pub fn optional_positive_price(
    field: &str,
    value: Option<Decimal>,
) -> Result<Option<Decimal>, AppError> {
    value.map(|v| positive_price(field, v)).transpose()
}

/// Truncates a list price, which may be zero but never negative.
///
/// # Errors
///
/// Returns `AppError::Validation` naming `field` if the amount is negative.
pub fn list_price(field: &str, value: Decimal) -> Result<Decimal, AppError> {
    let rounded = round_down(value);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        Err(AppError::Validation(format!("{field} must not be negative")))
    } else {
        Ok(rounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(10.999), dec!(10.99))]
    #[case(dec!(10.991), dec!(10.99))]
    #[case(dec!(10), dec!(10))]
    #[case(dec!(0.019), dec!(0.01))]
    fn test_round_down(#[case] input: Decimal, #[case] expected: Decimal) {
        assert_eq!(round_down(input), expected);
    }

    #[test]
    fn test_positive_price_rejects_amounts_truncated_to_zero() {
        assert!(matches!(
            positive_price("original_price", dec!(0.004)),
            Err(AppError::Validation(msg)) if msg.starts_with("original_price")
        ));
        assert!(positive_price("original_price", dec!(-1)).is_err());
    }

    #[test]
    fn test_optional_positive_price() {
        assert_eq!(optional_positive_price("price_adjustment", None).unwrap(), None);
        assert_eq!(
            optional_positive_price("price_adjustment", Some(dec!(2.555))).unwrap(),
            Some(dec!(2.55))
        );
    }

    #[test]
    fn test_list_price_allows_zero() {
        assert_eq!(list_price("price", dec!(0)).unwrap(), dec!(0));
        assert!(list_price("price", dec!(-0.5)).is_err());
    }

    #[test]
    fn test_adjustment_type_parsing() {
        assert_eq!("dollar".parse::<AdjustmentType>().unwrap(), AdjustmentType::Dollar);
        assert_eq!(
            serde_json::from_str::<AdjustmentType>(r#""percentage""#).unwrap(),
            AdjustmentType::Percentage
        );
        assert!("euro".parse::<AdjustmentType>().is_err());
    }

    proptest! {
        #[test]
        fn prop_round_down_never_increases(mantissa in 0i64..1_000_000_000, scale in 0u32..8) {
            let value = Decimal::new(mantissa, scale);
            let rounded = round_down(value);
            prop_assert!(rounded <= value);
            prop_assert!(value - rounded < dec!(0.01));
            prop_assert!(rounded.scale() <= PRICE_SCALE);
        }
    }
}
