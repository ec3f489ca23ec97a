//! Starter input bundle offered to a new user.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::CalculationInput;
use crate::constants::{OTHER_COUNTRY, PERCENT_INPUT_PRECISION};
use crate::portfolio::{AmountMap, CompositionMap};

// Country weights in percent; the residual country is derived
const TEMPLATE_FUNDS: &[(&str, [Decimal; 4])] = &[
    (
        "eMAXIS Slim All Country",
        [dec!(4.7), dec!(64.1), dec!(10.0), dec!(10.5)],
    ),
    (
        "iFreeNEXT FANG+ Index",
        [dec!(0), dec!(100.0), dec!(0), dec!(0)],
    ),
    (
        "eMAXIS Slim Emerging Markets Equity",
        [dec!(0), dec!(0), dec!(0), dec!(100.0)],
    ),
    (
        "SBI V Developed Markets ex-US Equity",
        [dec!(20.7), dec!(0), dec!(40.0), dec!(5.0)],
    ),
    (
        "SBI V Global Small Cap ex-US Equity",
        [dec!(13.2), dec!(0), dec!(15.0), dec!(23.8)],
    ),
];

const TEMPLATE_COUNTRIES: [&str; 4] = ["Japan", "US", "Europe", "Emerging"];

impl CalculationInput {
    /// The default five-fund bundle: sample compositions, targets spread
    /// evenly over the named countries and the recurring contribution split
    /// evenly across funds. Holdings and contributions start at zero.
    pub fn template() -> Self {
        let funds: Vec<String> = TEMPLATE_FUNDS
            .iter()
            .map(|(name, _)| name.to_string())
            .collect();
        let countries: Vec<String> = TEMPLATE_COUNTRIES
            .iter()
            .map(|c| c.to_string())
            .chain(std::iter::once(OTHER_COUNTRY.to_string()))
            .collect();

        let compositions: CompositionMap = TEMPLATE_FUNDS
            .iter()
            .map(|(name, weights)| {
                let row: AmountMap = TEMPLATE_COUNTRIES
                    .iter()
                    .zip(weights.iter())
                    .map(|(country, weight)| (country.to_string(), *weight))
                    .collect();
                (name.to_string(), row)
            })
            .collect();

        let even_target = (dec!(100) / Decimal::from(TEMPLATE_COUNTRIES.len()))
            .round_dp(PERCENT_INPUT_PRECISION);
        let targets: AmountMap = TEMPLATE_COUNTRIES
            .iter()
            .map(|country| (country.to_string(), even_target))
            .collect();

        let even_share =
            (dec!(100) / Decimal::from(funds.len())).round_dp(PERCENT_INPUT_PRECISION);
        let recurring_allocation: AmountMap =
            funds.iter().map(|fund| (fund.clone(), even_share)).collect();
        let assets: AmountMap = funds
            .iter()
            .map(|fund| (fund.clone(), Decimal::ZERO))
            .collect();

        CalculationInput {
            funds,
            countries,
            assets,
            compositions,
            targets,
            recurring_investment: Decimal::ZERO,
            recurring_allocation,
            growth_investment: Decimal::ZERO,
            priority_fund: None,
            step_amount: None,
        }
        .with_residuals_filled()
    }
}
