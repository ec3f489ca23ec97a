use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::rebalance_model::{CountryBreakdown, FundProposal, PortfolioBreakdown, RebalanceResult};
use super::rebalance_traits::RebalanceServiceTrait;
use crate::constants::{DEFAULT_STEP_AMOUNT, DISPLAY_DECIMAL_PRECISION};
use crate::errors::Result;
use crate::inputs::{evaluate_amount, CalculationInput};
use crate::optimizer::{calculate_error, optimize_allocation, Allocation, AllocationStrategy};
use crate::portfolio::valuation::{calculate_current_portfolio, calculate_future_portfolio};
use crate::portfolio::{AmountMap, PortfolioSnapshot};

/// Service running the valuation and optimizer pipeline over input bundles.
///
/// Holds no state besides the step used when a bundle does not set its own.
pub struct RebalanceService {
    default_step: Decimal,
}

impl RebalanceService {
    /// Creates a new RebalanceService instance
    pub fn new(default_step: Decimal) -> Self {
        Self { default_step }
    }
}

impl Default for RebalanceService {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_AMOUNT)
    }
}

impl RebalanceServiceTrait for RebalanceService {
    fn calculate(&self, input: CalculationInput) -> Result<RebalanceResult> {
        let validated = input.to_fractions(self.default_step)?;
        let priority_fund = validated.priority_fund.as_deref();
        debug!(
            "Calculating rebalance for {} funds, {} countries, growth {}",
            validated.funds.len(),
            validated.countries.len(),
            validated.growth_investment
        );

        let current = calculate_current_portfolio(
            &validated.funds,
            &validated.assets,
            &validated.compositions,
        );
        let ctx = validated.context(&current);
        let strategy = AllocationStrategy::select(&validated.funds, priority_fund);
        let allocation = optimize_allocation(&ctx, validated.growth_investment, priority_fund);

        let future = calculate_future_portfolio(
            &current,
            validated.recurring_investment,
            &validated.recurring_allocation,
            &allocation,
            &validated.compositions,
        );
        let error = calculate_error(&validated.targets, &future);

        Ok(RebalanceResult {
            strategy,
            current: breakdown(&current, &validated.countries, &validated.targets),
            future: breakdown(&future, &validated.countries, &validated.targets),
            proposal: proposal(&allocation, &validated.funds, validated.growth_investment),
            allocation,
            error,
        })
    }

    fn template(&self) -> CalculationInput {
        CalculationInput::template()
    }

    fn evaluate_amount(&self, expression: &str) -> Result<Decimal> {
        let amount = evaluate_amount(expression)?;
        debug!("Evaluated amount '{}' to {}", expression, amount);
        Ok(amount)
    }

    fn add_fund(&self, input: CalculationInput, name: &str) -> Result<CalculationInput> {
        debug!("Adding fund '{}'", name);
        Ok(input.with_fund_added(name)?.with_residuals_filled())
    }

    fn rename_fund(
        &self,
        input: CalculationInput,
        old_name: &str,
        new_name: &str,
    ) -> Result<CalculationInput> {
        debug!("Renaming fund '{}' to '{}'", old_name, new_name);
        input.with_fund_renamed(old_name, new_name)
    }

    fn remove_fund(&self, input: CalculationInput, name: &str) -> Result<CalculationInput> {
        debug!("Removing fund '{}'", name);
        input.with_fund_removed(name)
    }

    fn add_country(&self, input: CalculationInput, name: &str) -> Result<CalculationInput> {
        debug!("Adding country '{}'", name);
        Ok(input.with_country_added(name)?.with_residuals_filled())
    }

    fn remove_country(&self, input: CalculationInput, name: &str) -> Result<CalculationInput> {
        debug!("Removing country '{}'", name);
        Ok(input.with_country_removed(name)?.with_residuals_filled())
    }
}

/// Display rows per country, in `countries` order. `targets` are fractions.
fn breakdown(
    snapshot: &PortfolioSnapshot,
    countries: &[String],
    targets: &AmountMap,
) -> PortfolioBreakdown {
    let rows = countries
        .iter()
        .map(|country| {
            let ratio = snapshot.ratio_of(country) * dec!(100);
            let target = targets.get(country).copied().unwrap_or(Decimal::ZERO) * dec!(100);
            CountryBreakdown {
                country: country.clone(),
                amount: snapshot.amount_in(country).round_dp(DISPLAY_DECIMAL_PRECISION),
                ratio: ratio.round_dp(DISPLAY_DECIMAL_PRECISION),
                target: target.round_dp(DISPLAY_DECIMAL_PRECISION),
                difference: (ratio - target).round_dp(DISPLAY_DECIMAL_PRECISION),
            }
        })
        .collect();

    PortfolioBreakdown {
        total_asset: snapshot.total_asset.round_dp(DISPLAY_DECIMAL_PRECISION),
        rows,
    }
}

fn proposal(allocation: &Allocation, funds: &[String], growth: Decimal) -> Vec<FundProposal> {
    funds
        .iter()
        .map(|fund| {
            let amount = allocation.get(fund).copied().unwrap_or(Decimal::ZERO);
            let share = if growth > Decimal::ZERO {
                amount / growth * dec!(100)
            } else {
                Decimal::ZERO
            };
            FundProposal {
                fund: fund.clone(),
                amount: amount.round_dp(DISPLAY_DECIMAL_PRECISION),
                share: share.round_dp(DISPLAY_DECIMAL_PRECISION),
            }
        })
        .collect()
}
