//! Subscription total calculation
//!
//! Preview figures for the checkout screen. The billing backend recomputes
//! the authoritative charge; nothing here is persisted or invoiced.

use rust_decimal::Decimal;

use super::model::{
    round_money, BillingPeriod, PriceableUnit, TotalBreakdown, TotalCalculationInput,
    DEFAULT_VAT_PERCENT,
};

/// Compute subtotal, VAT and total for a plan, extra stores and plugins.
///
/// Sums are kept at full precision and only the returned fields are rounded
/// to cents. Inputs are not validated: negative prices flow through the
/// arithmetic, and `extra_stores <= 0` contributes nothing without reading the
/// plan's extra-store prices. A missing price for the selected period counts
/// as zero. Arithmetic saturates at the `Decimal` range instead of
/// overflowing, so the result is always defined.
pub fn calculate_total(input: &TotalCalculationInput) -> TotalBreakdown {
    let period = input.billing_period;

    let mut subtotal = input.plan.price_for(period).unwrap_or(Decimal::ZERO);

    if input.extra_stores > 0 {
        let per_store = input
            .plan
            .extra_store_price_for(period)
            .unwrap_or(Decimal::ZERO);
        subtotal = subtotal.saturating_add(per_store.saturating_mul(Decimal::from(input.extra_stores)));
    }

    subtotal = subtotal.saturating_add(plugins_subtotal(&input.plugins, period));

    let vat_percent = input.vat_percent.unwrap_or(DEFAULT_VAT_PERCENT);
    let vat_amount = round_money(vat_amount_of(subtotal, vat_percent));
    let total = round_money(subtotal.saturating_add(vat_amount));

    TotalBreakdown {
        subtotal: round_money(subtotal),
        vat_percent,
        vat_amount,
        total,
    }
}

/// Unrounded sum of every plugin's price for `period`.
pub fn plugins_subtotal(plugins: &[PriceableUnit], period: BillingPeriod) -> Decimal {
    plugins
        .iter()
        .filter_map(|plugin| plugin.price_for(period))
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// `subtotal * vat_percent / 100`.
///
/// Divides first when the product would leave the `Decimal` range, and
/// saturates when even that does not fit.
fn vat_amount_of(subtotal: Decimal, vat_percent: Decimal) -> Decimal {
    match subtotal.checked_mul(vat_percent) {
        Some(product) => product / Decimal::ONE_HUNDRED,
        None => (subtotal / Decimal::ONE_HUNDRED).saturating_mul(vat_percent),
    }
}
