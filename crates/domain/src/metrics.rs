use std::fmt::{Display, Formatter};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inventory level classification derived from stock and alert threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// No units left.
    Out,
    /// At or below the alert threshold.
    Low,
    /// Above the alert threshold.
    High,
}

impl StockStatus {
    /// Returns a stable transport value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Out => "out",
            Self::Low => "low",
            Self::High => "high",
        }
    }
}

impl Display for StockStatus {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Classifies a stock level against its alert threshold.
///
/// A product exactly at its threshold is `Low`.
#[must_use]
pub fn stock_status(stock: u32, alert_threshold: u32) -> StockStatus {
    if stock == 0 {
        StockStatus::Out
    } else if stock <= alert_threshold {
        StockStatus::Low
    } else {
        StockStatus::High
    }
}

/// Computes `purchase_cost * (1 + margin_percent / 100)` in the store currency.
///
/// Saturates at `Decimal::MAX` instead of overflowing.
#[must_use]
pub fn sale_price(purchase_cost: Decimal, margin_percent: Decimal) -> Decimal {
    let multiplier = margin_percent
        .checked_div(Decimal::ONE_HUNDRED)
        .and_then(|ratio| ratio.checked_add(Decimal::ONE));

    multiplier
        .and_then(|multiplier| purchase_cost.checked_mul(multiplier))
        .unwrap_or(Decimal::MAX)
}
