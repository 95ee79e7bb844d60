//! Monthly/yearly price normalization for catalog display

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::model::{round_money, DerivedPricing};

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Derive display pricing ("X/month, billed Y/year, Z% off") from a raw
/// monthly/yearly price pair.
///
/// A price that is `None` or zero counts as absent. Returns `None` when both
/// are absent. `monthly` and `yearly` are passed through exactly as given.
///
/// `yearly_discount_percent` is also `None` when the discount cannot be
/// represented: `monthly * 12` exceeds the `Decimal` range, or the whole
/// percent does not fit an `i64`. Catalog validation rejects such pairs, so
/// this only shows up for raw prices passed to the normalize endpoint.
pub fn normalize_pricing(monthly: Option<Decimal>, yearly: Option<Decimal>) -> Option<DerivedPricing> {
    let present_monthly = monthly.filter(|p| !p.is_zero());
    let present_yearly = yearly.filter(|p| !p.is_zero());

    if present_monthly.is_none() && present_yearly.is_none() {
        return None;
    }

    let display_monthly_from_yearly = present_yearly.map(|y| round_money(y / MONTHS_PER_YEAR));

    let yearly_discount_percent = match (present_monthly, present_yearly) {
        (Some(m), Some(y)) => yearly_discount_percent(m, y),
        _ => None,
    };

    Some(DerivedPricing {
        monthly,
        yearly,
        display_monthly_from_yearly,
        yearly_discount_percent,
    })
}

/// `round((1 - yearly / (monthly * 12)) * 100)`, half away from zero.
///
/// Negative when yearly billing costs more than twelve months. `None` on
/// overflow.
fn yearly_discount_percent(monthly: Decimal, yearly: Decimal) -> Option<i64> {
    let annualized = monthly.checked_mul(MONTHS_PER_YEAR)?;
    let ratio = yearly.checked_div(annualized)?;
    let percent = (Decimal::ONE - ratio).checked_mul(Decimal::ONE_HUNDRED)?;

    percent
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}
