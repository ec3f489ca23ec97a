use crate::portfolio::valuation::{AmountMap, CompositionMap, PortfolioSnapshot};

use log::trace;
use rust_decimal::Decimal;
use std::collections::BTreeSet;

/// Calculates the current holdings by country from per-fund asset amounts.
///
/// Each fund's asset amount is added to the total and spread across countries
/// according to the fund's composition. A fund without an asset entry counts
/// as zero; a country missing from a composition receives nothing from that
/// fund. Composition sums are not checked here. Sums saturate at
/// `Decimal::MAX` instead of overflowing.
///
/// # Arguments
///
/// * `funds` - Funds to value, in evaluation order.
/// * `assets` - Current asset amount per fund.
/// * `compositions` - Country weight fractions per fund.
///
pub fn calculate_current_portfolio(
    funds: &[String],
    assets: &AmountMap,
    compositions: &CompositionMap,
) -> PortfolioSnapshot {
    let mut portfolio = PortfolioSnapshot::default();

    for fund in funds {
        let asset = assets.get(fund).copied().unwrap_or(Decimal::ZERO);
        portfolio.total_asset = portfolio.total_asset.saturating_add(asset);
        add_by_composition(&mut portfolio, fund, asset, compositions);
    }

    trace!(
        "Current portfolio valued at {} across {} countries",
        portfolio.total_asset,
        portfolio.by_country.len()
    );
    portfolio
}

/// Projects the portfolio after the recurring and discretionary contributions.
///
/// The total grows by the recurring contribution plus the sum of the
/// discretionary allocation. Country amounts start from the current snapshot
/// and receive each fund's recurring share (`recurring_contribution *
/// recurring_allocation[fund]`) and discretionary amount, spread by the fund's
/// composition.
pub fn calculate_future_portfolio(
    current: &PortfolioSnapshot,
    recurring_contribution: Decimal,
    recurring_allocation: &AmountMap,
    discretionary_allocation: &AmountMap,
    compositions: &CompositionMap,
) -> PortfolioSnapshot {
    let discretionary_total = discretionary_allocation
        .values()
        .fold(Decimal::ZERO, |acc, amount| acc.saturating_add(*amount));

    let mut future = PortfolioSnapshot {
        total_asset: current
            .total_asset
            .saturating_add(recurring_contribution)
            .saturating_add(discretionary_total),
        by_country: current.by_country.clone(),
    };

    // Sorted so the accumulation order does not depend on hash order
    let funds: BTreeSet<&String> = recurring_allocation
        .keys()
        .chain(discretionary_allocation.keys())
        .collect();

    for fund in funds {
        let recurring_fraction = recurring_allocation
            .get(fund)
            .copied()
            .unwrap_or(Decimal::ZERO);
        let recurring_amount = recurring_contribution.saturating_mul(recurring_fraction);
        let discretionary_amount = discretionary_allocation
            .get(fund)
            .copied()
            .unwrap_or(Decimal::ZERO);

        add_by_composition(&mut future, fund, recurring_amount, compositions);
        add_by_composition(&mut future, fund, discretionary_amount, compositions);
    }

    future
}

/// Spreads `amount` of `fund` across countries. Does not touch the total.
fn add_by_composition(
    portfolio: &mut PortfolioSnapshot,
    fund: &str,
    amount: Decimal,
    compositions: &CompositionMap,
) {
    let Some(composition) = compositions.get(fund) else {
        return;
    };
    for (country, fraction) in composition {
        let held = portfolio
            .by_country
            .entry(country.clone())
            .or_insert(Decimal::ZERO);
        *held = held.saturating_add(amount.saturating_mul(*fraction));
    }
}
