//! Pricing DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::application::services::{Quote, QuoteLine, QuoteLineKind, QuoteRequest};
use crate::domain::{BillingPeriod, DerivedPricing, TotalBreakdown};

/// Billing period selected at checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BillingPeriodDto {
    Monthly,
    Yearly,
}

impl From<BillingPeriodDto> for BillingPeriod {
    fn from(p: BillingPeriodDto) -> Self {
        match p {
            BillingPeriodDto::Monthly => BillingPeriod::Monthly,
            BillingPeriodDto::Yearly => BillingPeriod::Yearly,
        }
    }
}

impl From<BillingPeriod> for BillingPeriodDto {
    fn from(p: BillingPeriod) -> Self {
        match p {
            BillingPeriod::Monthly => BillingPeriodDto::Monthly,
            BillingPeriod::Yearly => BillingPeriodDto::Yearly,
        }
    }
}

/// Subscription quote request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct QuoteRequestDto {
    #[validate(length(min = 1, max = 64, message = "plan_id is required"))]
    pub plan_id: String,
    pub billing_period: BillingPeriodDto,
    /// Stores beyond the plan's allowance
    #[serde(default)]
    #[validate(range(min = 0, max = 1000, message = "extra_stores must be between 0 and 1000"))]
    pub extra_stores: i32,
    #[serde(default)]
    #[validate(length(max = 50, message = "at most 50 plugins per quote"))]
    pub plugin_ids: Vec<String>,
    /// VAT override in percent, within `0..=100`; the configured default
    /// applies when omitted
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>, example = 24)]
    pub vat_percent: Option<Decimal>,
}

impl From<QuoteRequestDto> for QuoteRequest {
    fn from(req: QuoteRequestDto) -> Self {
        Self {
            plan_id: req.plan_id,
            billing_period: req.billing_period.into(),
            extra_stores: req.extra_stores,
            plugin_ids: req.plugin_ids,
            vat_percent: req.vat_percent,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BreakdownResponse {
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub vat_percent: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub vat_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total: Decimal,
}

impl From<TotalBreakdown> for BreakdownResponse {
    fn from(b: TotalBreakdown) -> Self {
        Self {
            subtotal: b.subtotal,
            vat_percent: b.vat_percent,
            vat_amount: b.vat_amount,
            total: b.total,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuoteLineResponse {
    /// `plan`, `extra_stores`, `plugin` or `rounding_adjustment`
    pub kind: String,
    pub reference_id: String,
    pub description: String,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub amount: Decimal,
}

impl From<QuoteLine> for QuoteLineResponse {
    fn from(l: QuoteLine) -> Self {
        let kind = match l.kind {
            QuoteLineKind::Plan => "plan",
            QuoteLineKind::ExtraStores => "extra_stores",
            QuoteLineKind::Plugin => "plugin",
            QuoteLineKind::RoundingAdjustment => "rounding_adjustment",
        };
        Self {
            kind: kind.to_string(),
            reference_id: l.reference_id,
            description: l.description,
            quantity: l.quantity,
            unit_price: l.unit_price,
            amount: l.amount,
        }
    }
}

/// Subscription price preview (not an invoice)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuoteResponse {
    pub quote_id: Uuid,
    pub plan_id: String,
    pub billing_period: BillingPeriodDto,
    pub currency: String,
    pub lines: Vec<QuoteLineResponse>,
    pub breakdown: BreakdownResponse,
    /// e.g. `111.60 EUR`
    pub formatted_total: String,
    /// Always `true`: billing recomputes the charged amount
    pub preview_only: bool,
    pub generated_at: DateTime<Utc>,
}

impl From<Quote> for QuoteResponse {
    fn from(q: Quote) -> Self {
        Self {
            formatted_total: format_money(q.breakdown.total, &q.currency),
            quote_id: q.quote_id,
            plan_id: q.plan_id,
            billing_period: q.billing_period.into(),
            currency: q.currency,
            lines: q.lines.into_iter().map(Into::into).collect(),
            breakdown: q.breakdown.into(),
            preview_only: q.preview_only,
            generated_at: q.generated_at,
        }
    }
}

/// Raw price pair to normalize
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NormalizeRequest {
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>, example = 100)]
    pub price_monthly: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>, example = 1000)]
    pub price_yearly: Option<Decimal>,
}

/// Display pricing derived from a monthly/yearly pair
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DerivedPricingResponse {
    #[serde(with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub monthly: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub yearly: Option<Decimal>,
    /// `yearly / 12`, two decimals
    #[serde(with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub display_monthly_from_yearly: Option<Decimal>,
    /// Whole percent saved by paying yearly
    pub yearly_discount_percent: Option<i64>,
}

impl From<DerivedPricing> for DerivedPricingResponse {
    fn from(d: DerivedPricing) -> Self {
        Self {
            monthly: d.monthly,
            yearly: d.yearly,
            display_monthly_from_yearly: d.display_monthly_from_yearly,
            yearly_discount_percent: d.yearly_discount_percent,
        }
    }
}

/// `amount` with exactly two decimals followed by the currency code.
pub fn format_money(amount: Decimal, currency: &str) -> String {
    let mut shown = amount;
    shown.rescale(2);
    format!("{} {}", shown, currency)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_money_pads_to_cents() {
        assert_eq!(format_money(Decimal::from(90), "EUR"), "90.00 EUR");
        assert_eq!(format_money("111.6".parse().unwrap(), "EUR"), "111.60 EUR");
    }

    #[test]
    fn quote_request_defaults() {
        let req: QuoteRequestDto = serde_json::from_value(serde_json::json!({
            "plan_id": "starter",
            "billing_period": "yearly"
        }))
        .unwrap();

        assert!(req.validate().is_ok());
        let req: QuoteRequest = req.into();
        assert_eq!(req.billing_period, BillingPeriod::Yearly);
        assert_eq!(req.extra_stores, 0);
        assert!(req.plugin_ids.is_empty());
        assert_eq!(req.vat_percent, None);
    }

    #[test]
    fn negative_extra_stores_fail_validation() {
        let req: QuoteRequestDto = serde_json::from_value(serde_json::json!({
            "plan_id": "starter",
            "billing_period": "monthly",
            "extra_stores": -1
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn unknown_billing_period_is_rejected() {
        let res: Result<QuoteRequestDto, _> = serde_json::from_value(serde_json::json!({
            "plan_id": "starter",
            "billing_period": "weekly"
        }));
        assert!(res.is_err());
    }
}
