use log::{debug, trace};
use rust_decimal::Decimal;

use super::optimizer_model::{Allocation, OptimizationContext};

/// Places the budget one step at a time into the fund whose extra step gives
/// the lowest projected error, then hands any sub-step remainder to the single
/// best fund.
pub(super) fn greedy_allocation(ctx: &OptimizationContext<'_>, budget: Decimal) -> Allocation {
    let mut allocation = ctx.zero_allocation();
    let step = ctx.step_amount;
    let mut remaining = budget;
    let mut steps = 0usize;

    if step > Decimal::ZERO {
        while remaining >= step {
            let Some((fund, error)) = best_placement(ctx, &allocation, step) else {
                break;
            };
            trace!("Placing {} into {} (error {})", step, fund, error);
            *allocation.entry(fund.to_string()).or_insert(Decimal::ZERO) += step;
            remaining -= step;
            steps += 1;
        }
    }

    if remaining > Decimal::ZERO {
        if let Some((fund, _)) = best_placement(ctx, &allocation, remaining) {
            *allocation.entry(fund.to_string()).or_insert(Decimal::ZERO) += remaining;
            steps += 1;
        }
    }

    debug!("Greedy run placed {} steps", steps);
    allocation
}

/// Evaluates adding `amount` to each fund in turn and returns the fund with
/// the strictly lowest error. The first fund wins ties.
fn best_placement<'a>(
    ctx: &OptimizationContext<'a>,
    allocation: &Allocation,
    amount: Decimal,
) -> Option<(&'a str, Decimal)> {
    let mut best: Option<(&'a str, Decimal)> = None;

    for fund in ctx.funds {
        let mut candidate = allocation.clone();
        *candidate.entry(fund.clone()).or_insert(Decimal::ZERO) += amount;
        let error = ctx.projected_error(&candidate);

        if best.map_or(true, |(_, min_error)| error < min_error) {
            best = Some((fund.as_str(), error));
        }
    }

    best
}
