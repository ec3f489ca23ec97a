//! Portfolio valuation domain models.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Amount (or fraction) keyed by fund or country name.
pub type AmountMap = HashMap<String, Decimal>;

/// Fund name -> (country name -> weight fraction).
pub type CompositionMap = HashMap<String, AmountMap>;

/// Holdings of a portfolio aggregated by country.
///
/// When built by the valuation calculator from compositions summing to 1,
/// the values of `by_country` sum to `total_asset`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub total_asset: Decimal,
    pub by_country: AmountMap,
}

impl PortfolioSnapshot {
    /// Amount held in a country; zero when the country is absent.
    pub fn amount_in(&self, country: &str) -> Decimal {
        self.by_country
            .get(country)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Share of the total held in a country, as a fraction.
    /// Returns zero for an empty portfolio and saturates on overflow.
    pub fn ratio_of(&self, country: &str) -> Decimal {
        if self.total_asset > Decimal::ZERO {
            self.amount_in(country)
                .checked_div(self.total_asset)
                .unwrap_or(Decimal::MAX)
        } else {
            Decimal::ZERO
        }
    }

    /// Sum of all country amounts.
    pub fn country_total(&self) -> Decimal {
        self.by_country
            .values()
            .fold(Decimal::ZERO, |acc, amount| acc.saturating_add(*amount))
    }
}
