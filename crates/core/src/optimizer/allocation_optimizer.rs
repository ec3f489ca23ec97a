use log::debug;
use rust_decimal::Decimal;

use super::optimizer_model::{Allocation, AllocationStrategy, OptimizationContext};

/// Splits the discretionary `budget` across the context's funds so that the
/// projected portfolio is as close as possible to the target weights.
///
/// Uses the priority-biased strategy when `priority_fund` names a fund of the
/// context, the greedy strategy otherwise. Never fails: a non-positive budget
/// or an empty fund list yields a zero allocation.
pub fn optimize_allocation(
    ctx: &OptimizationContext<'_>,
    budget: Decimal,
    priority_fund: Option<&str>,
) -> Allocation {
    let strategy = AllocationStrategy::select(ctx.funds, priority_fund);
    debug!(
        "Optimizing {} across {} funds with {} strategy (step {})",
        budget,
        ctx.funds.len(),
        strategy.as_str(),
        ctx.step_amount
    );

    let allocation = strategy.allocate(ctx, budget);

    debug!(
        "Optimization finished: allocated {} with error {}",
        allocation.values().copied().sum::<Decimal>(),
        ctx.projected_error(&allocation)
    );
    allocation
}
