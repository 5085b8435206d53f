use std::str::FromStr;

use backoffice_core::AppError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::metrics::{StockStatus, sale_price, stock_status};

/// Length of an IPTV subscription sold from inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubscriptionDuration {
    /// Seven days.
    #[serde(rename = "1_week")]
    OneWeek,
    /// One month.
    #[serde(rename = "1_month")]
    OneMonth,
    /// Three months.
    #[serde(rename = "3_months")]
    ThreeMonths,
    /// Six months.
    #[serde(rename = "6_months")]
    SixMonths,
    /// Twelve months.
    #[serde(rename = "12_months")]
    TwelveMonths,
}

impl SubscriptionDuration {
    /// Returns a stable storage value for this duration.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneWeek => "1_week",
            Self::OneMonth => "1_month",
            Self::ThreeMonths => "3_months",
            Self::SixMonths => "6_months",
            Self::TwelveMonths => "12_months",
        }
    }

    /// Returns the duration expressed in months.
    ///
    /// One week counts as a quarter month; every other duration is whole months.
    #[must_use]
    pub fn months(&self) -> Decimal {
        match self {
            Self::OneWeek => Decimal::new(25, 2),
            Self::OneMonth => Decimal::ONE,
            Self::ThreeMonths => Decimal::from(3),
            Self::SixMonths => Decimal::from(6),
            Self::TwelveMonths => Decimal::from(12),
        }
    }
}

impl FromStr for SubscriptionDuration {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "1_week" => Ok(Self::OneWeek),
            "1_month" => Ok(Self::OneMonth),
            "3_months" => Ok(Self::ThreeMonths),
            "6_months" => Ok(Self::SixMonths),
            "12_months" => Ok(Self::TwelveMonths),
            _ => Err(AppError::Validation(format!(
                "unknown subscription duration '{value}'"
            ))),
        }
    }
}

/// Subscription product held in inventory.
///
/// Stock level and pricing inputs are stored; status and sale price are
/// derived on every read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Store-assigned identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Provider or package category.
    pub category: String,
    /// Subscription length.
    pub duration: SubscriptionDuration,
    /// Units available for sale.
    pub stock: u32,
    /// Stock level at or below which the product is flagged.
    pub alert_threshold: u32,
    /// Unit purchase cost in the store currency.
    pub purchase_cost: Decimal,
    /// Margin applied on top of the purchase cost, in percent.
    pub margin_percent: Decimal,
    /// Creation timestamp assigned by the store.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Returns the inventory level classification.
    #[must_use]
    pub fn stock_status(&self) -> StockStatus {
        stock_status(self.stock, self.alert_threshold)
    }

    /// Returns the margin-based unit sale price.
    #[must_use]
    pub fn sale_price(&self) -> Decimal {
        sale_price(self.purchase_cost, self.margin_percent)
    }

    /// Returns the subscription length in months.
    #[must_use]
    pub fn duration_months(&self) -> Decimal {
        self.duration.months()
    }
}
