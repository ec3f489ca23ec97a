//! Squared-deviation score of a projected portfolio against target weights.

use std::collections::BTreeSet;

use rust_decimal::Decimal;

use crate::portfolio::{AmountMap, PortfolioSnapshot};

/// Scores a projected portfolio by the sum of squared differences between
/// each country's share of the total and its target fraction.
///
/// Countries are the union of the target keys and the snapshot's countries;
/// a missing target counts as zero and so does a missing holding. An empty
/// portfolio has a zero ratio everywhere. The result is never negative and is
/// zero only when every ratio matches its target exactly.
pub fn calculate_error(targets: &AmountMap, future: &PortfolioSnapshot) -> Decimal {
    let countries: BTreeSet<&String> = targets.keys().chain(future.by_country.keys()).collect();

    countries
        .into_iter()
        .map(|country| {
            let target = targets.get(country).copied().unwrap_or(Decimal::ZERO);
            let deviation = future.ratio_of(country).saturating_sub(target);
            deviation.saturating_mul(deviation)
        })
        .fold(Decimal::ZERO, Decimal::saturating_add)
}
