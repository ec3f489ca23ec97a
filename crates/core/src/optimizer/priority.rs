use log::{debug, trace};
use rust_decimal::Decimal;

use super::optimizer_model::{Allocation, OptimizationContext};

/// Starts with the whole budget in `priority_fund` and moves it out one step
/// at a time, each time to the fund that lowers the error the most, until no
/// move improves on the current allocation. A final sub-step remainder is
/// moved only if that also improves the error.
///
/// The priority fund always holds exactly the amount still to move, so a
/// transfer never overdraws it.
pub(super) fn priority_allocation(
    ctx: &OptimizationContext<'_>,
    budget: Decimal,
    priority_fund: &str,
) -> Allocation {
    let mut allocation = ctx.zero_allocation();
    allocation.insert(priority_fund.to_string(), budget);

    let step = ctx.step_amount;
    let mut amount_to_move = budget;
    let mut steps = 0usize;

    if step > Decimal::ZERO {
        while amount_to_move >= step {
            let Some(moved) = best_transfer(ctx, &allocation, priority_fund, step) else {
                break;
            };
            allocation = moved;
            amount_to_move -= step;
            steps += 1;
        }
    }

    let is_remainder = step <= Decimal::ZERO || amount_to_move < step;
    if amount_to_move > Decimal::ZERO && is_remainder {
        if let Some(moved) = best_transfer(ctx, &allocation, priority_fund, amount_to_move) {
            allocation = moved;
            steps += 1;
        }
    }

    debug!(
        "Priority-biased run moved {} steps out of {}",
        steps, priority_fund
    );
    allocation
}

/// Tries moving `amount` from the priority fund to every other fund and
/// returns the resulting allocation with the lowest error, provided it is
/// strictly lower than the error before the move.
///
/// Returns `None` when the priority fund holds less than `amount`.
fn best_transfer(
    ctx: &OptimizationContext<'_>,
    allocation: &Allocation,
    priority_fund: &str,
    amount: Decimal,
) -> Option<Allocation> {
    if amount <= Decimal::ZERO || balance_of(allocation, priority_fund) < amount {
        return None;
    }

    let mut min_error = ctx.projected_error(allocation);
    let mut best: Option<Allocation> = None;

    for fund in ctx.funds.iter().filter(|f| f.as_str() != priority_fund) {
        let mut candidate = allocation.clone();
        *candidate
            .entry(priority_fund.to_string())
            .or_insert(Decimal::ZERO) -= amount;
        *candidate.entry(fund.clone()).or_insert(Decimal::ZERO) += amount;

        let error = ctx.projected_error(&candidate);
        if error < min_error {
            trace!("Moving {} from {} to {} (error {})", amount, priority_fund, fund, error);
            min_error = error;
            best = Some(candidate);
        }
    }

    best
}

fn balance_of(allocation: &Allocation, fund: &str) -> Decimal {
    allocation.get(fund).copied().unwrap_or(Decimal::ZERO)
}
