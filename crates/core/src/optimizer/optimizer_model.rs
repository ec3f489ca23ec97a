//! Optimizer models: per-run context and strategy selection.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error_metric::calculate_error;
use super::greedy::greedy_allocation;
use super::priority::priority_allocation;
use crate::portfolio::valuation::calculate_future_portfolio;
use crate::portfolio::{AmountMap, CompositionMap, PortfolioSnapshot};

/// Discretionary amount per fund.
pub type Allocation = AmountMap;

/// Immutable inputs shared by every candidate evaluation of one optimizer run.
#[derive(Debug, Clone, Copy)]
pub struct OptimizationContext<'a> {
    /// Funds in evaluation order. Earlier funds win ties.
    pub funds: &'a [String],
    pub current: &'a PortfolioSnapshot,
    /// Target weight fraction per country
    pub targets: &'a AmountMap,
    pub compositions: &'a CompositionMap,
    pub recurring_contribution: Decimal,
    /// Fraction of the recurring contribution going to each fund
    pub recurring_allocation: &'a AmountMap,
    /// Quantization of each optimizer move, in currency units
    pub step_amount: Decimal,
}

impl OptimizationContext<'_> {
    /// Error of the portfolio projected with `allocation` as the
    /// discretionary split.
    pub fn projected_error(&self, allocation: &Allocation) -> Decimal {
        let future = calculate_future_portfolio(
            self.current,
            self.recurring_contribution,
            self.recurring_allocation,
            allocation,
            self.compositions,
        );
        calculate_error(self.targets, &future)
    }

    /// An allocation with zero for every fund.
    pub fn zero_allocation(&self) -> Allocation {
        self.funds
            .iter()
            .map(|fund| (fund.clone(), Decimal::ZERO))
            .collect()
    }
}

/// How the discretionary contribution is searched for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "priorityFund", rename_all = "camelCase")]
pub enum AllocationStrategy {
    /// Place one step at a time into whichever fund lowers the error most.
    Greedy,
    /// Start with everything in the named fund and move steps out of it only
    /// while that lowers the error.
    PriorityBiased(String),
}

impl AllocationStrategy {
    /// Picks the priority-biased strategy when `priority_fund` names one of
    /// `funds`, otherwise the greedy one.
    pub fn select(funds: &[String], priority_fund: Option<&str>) -> Self {
        match priority_fund.map(str::trim) {
            Some(name) if !name.is_empty() && funds.iter().any(|f| f == name) => {
                AllocationStrategy::PriorityBiased(name.to_string())
            }
            _ => AllocationStrategy::Greedy,
        }
    }

    /// Splits `budget` across the context's funds.
    ///
    /// A non-positive budget or an empty fund list yields a zero allocation
    /// for every fund regardless of strategy.
    pub fn allocate(&self, ctx: &OptimizationContext<'_>, budget: Decimal) -> Allocation {
        if budget <= Decimal::ZERO || ctx.funds.is_empty() {
            return ctx.zero_allocation();
        }
        match self {
            AllocationStrategy::Greedy => greedy_allocation(ctx, budget),
            AllocationStrategy::PriorityBiased(fund) => priority_allocation(ctx, budget, fund),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationStrategy::Greedy => "greedy",
            AllocationStrategy::PriorityBiased(_) => "priority_biased",
        }
    }
}
