//! Pricing value types
//!
//! Every type here is an immutable value produced or consumed by a single
//! pricing computation. Money is carried as [`Decimal`] and serialized as a
//! JSON number.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Currency amounts are reported with this many decimal places.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// VAT rate applied when the caller does not supply one.
pub const DEFAULT_VAT_PERCENT: Decimal = Decimal::from_parts(24, 0, 0, false, 0);

/// Round a currency amount to cents, half away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Which price column of every priceable unit participates in a total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingPeriod {
    #[default]
    Monthly,
    Yearly,
}

impl BillingPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Pick the value belonging to this period.
    pub fn select<T>(self, monthly: T, yearly: T) -> T {
        match self {
            Self::Monthly => monthly,
            Self::Yearly => yearly,
        }
    }
}

impl std::fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillingPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "monthly" | "month" => Ok(Self::Monthly),
            "yearly" | "year" | "annual" => Ok(Self::Yearly),
            other => Err(format!(
                "unknown billing period '{}', expected 'monthly' or 'yearly'",
                other
            )),
        }
    }
}

/// Monthly/yearly price pair of a plan tier, an extra-store slot or a plugin.
///
/// Both prices absent is the "free/unset" case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceableUnit {
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price_monthly: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price_yearly: Option<Decimal>,
}

impl PriceableUnit {
    pub fn new(price_monthly: Option<Decimal>, price_yearly: Option<Decimal>) -> Self {
        Self {
            price_monthly,
            price_yearly,
        }
    }

    pub fn price_for(&self, period: BillingPeriod) -> Option<Decimal> {
        period.select(self.price_monthly, self.price_yearly)
    }
}

/// Plan prices as consumed by the total calculator.
///
/// The extra-store columns are optional: plans that cannot be extended
/// simply leave them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlanPricing {
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price_monthly: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price_yearly: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub extra_store_price_monthly: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub extra_store_price_yearly: Option<Decimal>,
}

impl PlanPricing {
    pub fn price_for(&self, period: BillingPeriod) -> Option<Decimal> {
        period.select(self.price_monthly, self.price_yearly)
    }

    pub fn extra_store_price_for(&self, period: BillingPeriod) -> Option<Decimal> {
        period.select(self.extra_store_price_monthly, self.extra_store_price_yearly)
    }

    pub fn tier(&self) -> PriceableUnit {
        PriceableUnit::new(self.price_monthly, self.price_yearly)
    }

    pub fn extra_store_slot(&self) -> PriceableUnit {
        PriceableUnit::new(self.extra_store_price_monthly, self.extra_store_price_yearly)
    }
}

/// Display facts derived from a monthly/yearly price pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedPricing {
    /// Caller's monthly price, untouched.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub monthly: Option<Decimal>,
    /// Caller's yearly price, untouched.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub yearly: Option<Decimal>,
    /// `yearly / 12` in cents; `None` without a yearly price.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub display_monthly_from_yearly: Option<Decimal>,
    /// Whole percent by which yearly billing undercuts `monthly * 12`;
    /// `None` unless both prices are present.
    pub yearly_discount_percent: Option<i64>,
}

/// Subtotal / VAT / total of one subscription preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalBreakdown {
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    /// Echo of the rate that was applied.
    #[serde(with = "rust_decimal::serde::float")]
    pub vat_percent: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub vat_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// Everything the total calculator needs for one subscription.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TotalCalculationInput {
    pub plan: PlanPricing,
    pub billing_period: BillingPeriod,
    /// Stores beyond the plan's allowance; values `<= 0` add nothing.
    #[serde(default)]
    pub extra_stores: i32,
    #[serde(default)]
    pub plugins: Vec<PriceableUnit>,
    /// Falls back to [`DEFAULT_VAT_PERCENT`].
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub vat_percent: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(v: &str) -> Decimal {
        v.parse().unwrap()
    }

    #[test]
    fn round_money_is_half_away_from_zero() {
        assert_eq!(round_money(dec("1.005")), dec("1.01"));
        assert_eq!(round_money(dec("-1.005")), dec("-1.01"));
        assert_eq!(round_money(dec("2.344")), dec("2.34"));
    }

    #[test]
    fn default_vat_is_24() {
        assert_eq!(DEFAULT_VAT_PERCENT, Decimal::from(24));
    }

    #[test]
    fn billing_period_selects_column() {
        let plan = PlanPricing {
            price_monthly: Some(dec("50.0")),
            price_yearly: Some(dec("500.0")),
            extra_store_price_monthly: Some(dec("10.0")),
            extra_store_price_yearly: None,
        };
        assert_eq!(plan.price_for(BillingPeriod::Monthly), Some(dec("50.0")));
        assert_eq!(plan.price_for(BillingPeriod::Yearly), Some(dec("500.0")));
        assert_eq!(plan.extra_store_price_for(BillingPeriod::Yearly), None);
        assert_eq!(plan.extra_store_slot().price_monthly, Some(dec("10.0")));
    }

    #[test]
    fn billing_period_parse_and_display() {
        assert_eq!("monthly".parse::<BillingPeriod>(), Ok(BillingPeriod::Monthly));
        assert_eq!("Yearly".parse::<BillingPeriod>(), Ok(BillingPeriod::Yearly));
        assert!("weekly".parse::<BillingPeriod>().is_err());
        assert_eq!(BillingPeriod::Yearly.to_string(), "yearly");
    }

    #[test]
    fn calculation_input_accepts_json_numbers() {
        let input: TotalCalculationInput = serde_json::from_value(serde_json::json!({
            "plan": { "price_monthly": 50, "price_yearly": 500.5 },
            "billing_period": "yearly",
            "plugins": [{ "price_monthly": 15 }]
        }))
        .unwrap();

        assert_eq!(input.billing_period, BillingPeriod::Yearly);
        assert_eq!(input.plan.price_yearly, Some(dec("500.5")));
        assert_eq!(input.plan.extra_store_price_monthly, None);
        assert_eq!(input.extra_stores, 0);
        assert_eq!(input.plugins[0].price_yearly, None);
        assert_eq!(input.vat_percent, None);
    }

    #[test]
    fn breakdown_serializes_money_as_numbers() {
        let breakdown = TotalBreakdown {
            subtotal: dec("90.0"),
            vat_percent: dec("24.0"),
            vat_amount: dec("21.6"),
            total: dec("111.6"),
        };
        let json = serde_json::to_value(breakdown).unwrap();
        assert_eq!(json["vat_amount"], serde_json::json!(21.6));
        assert_eq!(json["total"], serde_json::json!(111.6));
    }
}
