//! Price fields shared by order items and invoice items.

use crm_core::{
    patch::{self, Change},
    pricing::{self, AdjustmentType},
};
use crm_shared::AppResult;
use rust_decimal::Decimal;

/// Validated prices of a new line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinePrice {
    /// Truncated, strictly positive list price.
    pub original_price: Decimal,
    /// How the adjustment applies.
    pub adjustment_type: Option<String>,
    /// Truncated, strictly positive adjustment.
    pub price_adjustment: Option<Decimal>,
}

impl LinePrice {
    /// Truncates both amounts to cents and checks they are positive.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` naming the offending field.
    pub fn new(
        original_price: Decimal,
        adjustment_type: Option<AdjustmentType>,
        price_adjustment: Option<Decimal>,
    ) -> AppResult<Self> {
        Ok(Self {
            original_price: pricing::positive_price("original_price", original_price)?,
            adjustment_type: adjustment_type.map(|t| t.as_str().to_string()),
            price_adjustment: pricing::optional_positive_price("price_adjustment", price_adjustment)?,
        })
    }
}

/// Patched prices of a line item.
#[derive(Debug)]
pub struct LinePriceChange {
    /// New list price.
    pub original_price: Change<Decimal>,
    /// New adjustment type.
    pub adjustment_type: Change<String>,
    /// New adjustment.
    pub price_adjustment: Change<Decimal>,
}

impl LinePriceChange {
    /// Validates the amounts that are being set.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` naming the offending field.
    pub fn new(
        original_price: Option<Decimal>,
        adjustment_type: Option<AdjustmentType>,
        price_adjustment: Option<Decimal>,
    ) -> AppResult<Self> {
        Ok(Self {
            original_price: patch::value(pricing::optional_positive_price(
                "original_price",
                original_price,
            )?),
            adjustment_type: patch::value(adjustment_type.map(|t| t.as_str().to_string())),
            price_adjustment: patch::value(pricing::optional_positive_price(
                "price_adjustment",
                price_adjustment,
            )?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_line_price_truncates() {
        let price = LinePrice::new(dec!(19.999), Some(AdjustmentType::Percentage), Some(dec!(5.005)))
            .unwrap();
        assert_eq!(price.original_price, dec!(19.99));
        assert_eq!(price.adjustment_type.as_deref(), Some("percentage"));
        assert_eq!(price.price_adjustment, Some(dec!(5.00)));
    }

    #[test]
    fn test_change_keeps_omitted_amounts() {
        let change = LinePriceChange::new(None, None, Some(dec!(1.239))).unwrap();
        assert!(change.original_price.is_keep());
        assert!(change.adjustment_type.is_keep());
        assert_eq!(change.price_adjustment, Change::Set(dec!(1.23)));
    }

    #[test]
    fn test_zero_adjustment_is_rejected() {
        assert!(LinePriceChange::new(None, None, Some(dec!(0.001))).is_err());
    }
}
