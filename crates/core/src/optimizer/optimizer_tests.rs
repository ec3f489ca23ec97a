//! Unit tests for the contribution optimizer.

use super::*;
use crate::portfolio::valuation::calculate_current_portfolio;
use crate::portfolio::{AmountMap, CompositionMap, PortfolioSnapshot};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ============================================================================
// Fixtures
// ============================================================================

/// Two single-country funds: "A" is 100% X, "B" is 100% Y.
struct TwoFundFixture {
    funds: Vec<String>,
    compositions: CompositionMap,
    targets: AmountMap,
    current: PortfolioSnapshot,
    recurring_allocation: AmountMap,
    recurring_contribution: Decimal,
    step_amount: Decimal,
}

impl TwoFundFixture {
    fn new(target_x: Decimal) -> Self {
        let mut compositions = CompositionMap::new();
        compositions.insert("A".to_string(), map(&[("X", dec!(1))]));
        compositions.insert("B".to_string(), map(&[("Y", dec!(1))]));
        Self {
            funds: vec!["A".to_string(), "B".to_string()],
            compositions,
            targets: map(&[("X", target_x), ("Y", dec!(1) - target_x)]),
            current: PortfolioSnapshot::default(),
            recurring_allocation: AmountMap::new(),
            recurring_contribution: Decimal::ZERO,
            step_amount: dec!(100),
        }
    }

    fn with_assets(mut self, a: Decimal, b: Decimal) -> Self {
        self.current = calculate_current_portfolio(
            &self.funds,
            &map(&[("A", a), ("B", b)]),
            &self.compositions,
        );
        self
    }

    fn with_recurring(mut self, amount: Decimal, into_a: Decimal) -> Self {
        self.recurring_contribution = amount;
        self.recurring_allocation = map(&[("A", into_a), ("B", dec!(1) - into_a)]);
        self
    }

    fn with_step(mut self, step: Decimal) -> Self {
        self.step_amount = step;
        self
    }

    fn ctx(&self) -> OptimizationContext<'_> {
        OptimizationContext {
            funds: &self.funds,
            current: &self.current,
            targets: &self.targets,
            compositions: &self.compositions,
            recurring_contribution: self.recurring_contribution,
            recurring_allocation: &self.recurring_allocation,
            step_amount: self.step_amount,
        }
    }
}

fn map(entries: &[(&str, Decimal)]) -> AmountMap {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), *v))
        .collect()
}

fn total(allocation: &Allocation) -> Decimal {
    allocation.values().copied().sum()
}

// ============================================================================
// Strategy selection
// ============================================================================

#[test]
fn test_select_priority_when_fund_is_known() {
    let funds = vec!["A".to_string(), "B".to_string()];

    assert_eq!(
        AllocationStrategy::select(&funds, Some("B")),
        AllocationStrategy::PriorityBiased("B".to_string())
    );
    assert_eq!(
        AllocationStrategy::select(&funds, Some("  A ")),
        AllocationStrategy::PriorityBiased("A".to_string())
    );
}

#[test]
fn test_select_greedy_for_missing_or_unknown_fund() {
    let funds = vec!["A".to_string(), "B".to_string()];

    assert_eq!(AllocationStrategy::select(&funds, None), AllocationStrategy::Greedy);
    assert_eq!(AllocationStrategy::select(&funds, Some("")), AllocationStrategy::Greedy);
    assert_eq!(AllocationStrategy::select(&funds, Some("C")), AllocationStrategy::Greedy);
}

// ============================================================================
// Degenerate inputs
// ============================================================================

#[test]
fn test_zero_budget_returns_zero_for_every_fund() {
    let fixture = TwoFundFixture::new(dec!(0.5));

    for priority in [None, Some("A")] {
        let allocation = optimize_allocation(&fixture.ctx(), Decimal::ZERO, priority);
        assert_eq!(allocation.len(), 2);
        assert!(allocation.values().all(|v| v.is_zero()));
    }
}

#[test]
fn test_negative_budget_returns_zero_allocation() {
    let fixture = TwoFundFixture::new(dec!(0.5));

    let allocation = optimize_allocation(&fixture.ctx(), dec!(-500), None);

    assert_eq!(total(&allocation), Decimal::ZERO);
}

#[test]
fn test_no_funds_returns_empty_allocation() {
    let fixture = TwoFundFixture::new(dec!(0.5));
    let ctx = OptimizationContext {
        funds: &[],
        ..fixture.ctx()
    };

    assert!(optimize_allocation(&ctx, dec!(1000), None).is_empty());
}

#[test]
fn test_single_fund_receives_entire_budget() {
    let mut fixture = TwoFundFixture::new(dec!(0.2));
    fixture.funds = vec!["A".to_string()];

    let allocation = optimize_allocation(&fixture.ctx(), dec!(1234), None);

    assert_eq!(allocation.get("A"), Some(&dec!(1234)));
}

// ============================================================================
// Greedy strategy
// ============================================================================

#[test]
fn test_greedy_splits_evenly_for_even_target() {
    let fixture = TwoFundFixture::new(dec!(0.5));

    let allocation = optimize_allocation(&fixture.ctx(), dec!(1000), None);

    assert_eq!(allocation.get("A"), Some(&dec!(500)));
    assert_eq!(allocation.get("B"), Some(&dec!(500)));
}

#[test]
fn test_greedy_fills_underweight_fund_first() {
    let fixture = TwoFundFixture::new(dec!(0.5)).with_assets(dec!(800), Decimal::ZERO);

    let allocation = optimize_allocation(&fixture.ctx(), dec!(600), None);

    assert_eq!(allocation.get("A"), Some(&Decimal::ZERO));
    assert_eq!(allocation.get("B"), Some(&dec!(600)));
}

#[test]
fn test_greedy_accounts_for_recurring_contribution() {
    let fixture = TwoFundFixture::new(dec!(0.5)).with_recurring(dec!(1000), dec!(1));

    let allocation = optimize_allocation(&fixture.ctx(), dec!(1000), None);

    assert_eq!(allocation.get("A"), Some(&Decimal::ZERO));
    assert_eq!(allocation.get("B"), Some(&dec!(1000)));
}

#[test]
fn test_greedy_assigns_sub_step_remainder() {
    let fixture = TwoFundFixture::new(dec!(0.5));

    let allocation = optimize_allocation(&fixture.ctx(), dec!(1050), None);

    assert_eq!(total(&allocation), dec!(1050));
    // After 500/500 both funds tie, so the remainder goes to the first one
    assert_eq!(allocation.get("A"), Some(&dec!(550)));
    assert_eq!(allocation.get("B"), Some(&dec!(500)));
}

#[test]
fn test_greedy_with_non_positive_step_places_whole_budget_once() {
    let fixture = TwoFundFixture::new(dec!(0.3)).with_step(Decimal::ZERO);

    let allocation = optimize_allocation(&fixture.ctx(), dec!(1000), None);

    // A alone: 0.49 + 0.49; B alone: 0.09 + 0.09
    assert_eq!(allocation.get("B"), Some(&dec!(1000)));
    assert_eq!(total(&allocation), dec!(1000));
}

#[test]
fn test_unknown_priority_fund_matches_greedy() {
    let fixture = TwoFundFixture::new(dec!(0.3)).with_assets(dec!(200), dec!(900));

    let greedy = optimize_allocation(&fixture.ctx(), dec!(2500), None);
    let fallback = optimize_allocation(&fixture.ctx(), dec!(2500), Some("Missing"));

    assert_eq!(greedy, fallback);
}

#[test]
fn test_optimizer_is_deterministic() {
    let fixture = TwoFundFixture::new(dec!(0.37))
        .with_assets(dec!(1234), dec!(4321))
        .with_recurring(dec!(3000), dec!(0.4));

    for priority in [None, Some("B")] {
        let first = optimize_allocation(&fixture.ctx(), dec!(7777), priority);
        let second = optimize_allocation(&fixture.ctx(), dec!(7777), priority);
        assert_eq!(first, second);
    }
}

// ============================================================================
// Priority-biased strategy
// ============================================================================

#[test]
fn test_priority_moves_steps_out_while_error_improves() {
    let fixture = TwoFundFixture::new(dec!(0.3));

    let allocation = optimize_allocation(&fixture.ctx(), dec!(1000), Some("A"));

    assert_eq!(allocation.get("A"), Some(&dec!(300)));
    assert_eq!(allocation.get("B"), Some(&dec!(700)));
}

#[test]
fn test_priority_keeps_budget_when_already_optimal() {
    let fixture = TwoFundFixture::new(dec!(1));

    let allocation = optimize_allocation(&fixture.ctx(), dec!(1000), Some("A"));

    assert_eq!(allocation.get("A"), Some(&dec!(1000)));
    assert_eq!(allocation.get("B"), Some(&Decimal::ZERO));
}

#[test]
fn test_priority_moves_remainder_when_it_improves() {
    let fixture = TwoFundFixture::new(Decimal::ZERO);

    let allocation = optimize_allocation(&fixture.ctx(), dec!(1050), Some("A"));

    assert_eq!(allocation.get("A"), Some(&Decimal::ZERO));
    assert_eq!(allocation.get("B"), Some(&dec!(1050)));
}

#[test]
fn test_priority_leaves_remainder_when_move_does_not_help() {
    let fixture = TwoFundFixture::new(dec!(0.3));

    // Best whole-step split stops at A=350 with 350 still "to move"
    let allocation = optimize_allocation(&fixture.ctx(), dec!(1050), Some("A"));

    assert_eq!(allocation.get("A"), Some(&dec!(350)));
    assert_eq!(allocation.get("B"), Some(&dec!(700)));
    assert_eq!(total(&allocation), dec!(1050));
}

#[test]
fn test_priority_differs_from_greedy_on_ties() {
    // Greedy alternates from A; priority on B keeps the tie in B's favour
    let fixture = TwoFundFixture::new(dec!(0.5));

    let allocation = optimize_allocation(&fixture.ctx(), dec!(1000), Some("B"));

    assert_eq!(allocation.get("A"), Some(&dec!(500)));
    assert_eq!(allocation.get("B"), Some(&dec!(500)));
}

#[test]
fn test_priority_never_goes_negative() {
    // Step does not divide the budget; the remainder must not overdraw A
    let fixture = TwoFundFixture::new(Decimal::ZERO).with_step(dec!(30));

    let allocation = optimize_allocation(&fixture.ctx(), dec!(100), Some("A"));

    assert!(allocation.values().all(|v| *v >= Decimal::ZERO));
    assert_eq!(allocation.get("B"), Some(&dec!(100)));
    assert_eq!(total(&allocation), dec!(100));
}

#[test]
fn test_projected_error_of_result_not_above_zero_allocation_baseline() {
    let fixture = TwoFundFixture::new(dec!(0.42)).with_assets(dec!(5000), dec!(100));
    let ctx = fixture.ctx();

    let allocation = optimize_allocation(&ctx, dec!(3000), None);
    let all_in_a: Allocation = map(&[("A", dec!(3000)), ("B", Decimal::ZERO)]);

    assert!(ctx.projected_error(&allocation) <= ctx.projected_error(&all_in_a));
}
