//! Input bundle models.

use std::collections::HashSet;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_AMOUNT, MAX_OPTIMIZER_STEPS, PERCENT_SUM_TOLERANCE};
use crate::errors::ValidationError;
use crate::optimizer::OptimizationContext;
use crate::portfolio::{AmountMap, CompositionMap, PortfolioSnapshot};
use crate::{Error, Result};

/// Everything one calculation needs, as entered by the user.
///
/// Compositions, targets and the recurring allocation are percentages
/// (0-100). Funds and countries are ordered; the order decides tie-breaks in
/// the optimizer and the row order of results.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalculationInput {
    pub funds: Vec<String>,
    pub countries: Vec<String>,
    /// Current holding per fund, in currency units
    #[serde(default)]
    pub assets: AmountMap,
    /// Fund -> country -> percent
    #[serde(default)]
    pub compositions: CompositionMap,
    /// Country -> target percent
    #[serde(default)]
    pub targets: AmountMap,
    /// Periodic contribution split by `recurring_allocation`
    #[serde(default)]
    pub recurring_investment: Decimal,
    /// Fund -> percent of the recurring contribution
    #[serde(default)]
    pub recurring_allocation: AmountMap,
    /// Discretionary contribution to optimize
    #[serde(default)]
    pub growth_investment: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_fund: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_amount: Option<Decimal>,
}

/// A validated input bundle with every percentage converted to a fraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInput {
    pub funds: Vec<String>,
    pub countries: Vec<String>,
    pub assets: AmountMap,
    pub compositions: CompositionMap,
    pub targets: AmountMap,
    pub recurring_investment: Decimal,
    pub recurring_allocation: AmountMap,
    pub growth_investment: Decimal,
    pub priority_fund: Option<String>,
    pub step_amount: Decimal,
}

impl ValidatedInput {
    /// Optimizer context for this input valued against `current`.
    pub fn context<'a>(&'a self, current: &'a PortfolioSnapshot) -> OptimizationContext<'a> {
        OptimizationContext {
            funds: &self.funds,
            current,
            targets: &self.targets,
            compositions: &self.compositions,
            recurring_contribution: self.recurring_investment,
            recurring_allocation: &self.recurring_allocation,
            step_amount: self.step_amount,
        }
    }
}

impl CalculationInput {
    /// Checks names, amounts and that every percentage row sums to 100.
    ///
    /// Every amount must lie in `0..=MAX_AMOUNT`, and so must holdings plus
    /// both contributions together.
    ///
    /// A priority fund that is not in `funds` is accepted; the optimizer
    /// ignores it.
    pub fn validate(&self) -> Result<()> {
        validate_names("Fund", &self.funds)?;
        validate_names("Country", &self.countries)?;

        for fund in &self.funds {
            let row = self.compositions.get(fund);
            let total = sum_over(row, &self.countries);
            check_percentage_sum(&format!("Composition of '{}'", fund), total)?;
        }

        check_percentage_sum("Target allocation", sum_over(Some(&self.targets), &self.countries))?;
        check_percentage_sum(
            "Recurring allocation",
            sum_over(Some(&self.recurring_allocation), &self.funds),
        )?;

        for fund in &self.funds {
            if let Some(asset) = self.assets.get(fund) {
                check_amount(&format!("Asset of '{}'", fund), *asset)?;
            }
        }
        check_amount("Recurring investment", self.recurring_investment)?;
        check_amount("Growth investment", self.growth_investment)?;
        let combined = sum_over(Some(&self.assets), &self.funds)
            .saturating_add(self.recurring_investment)
            .saturating_add(self.growth_investment);
        check_amount("Total of holdings and contributions", combined)?;

        if let Some(step) = self.step_amount {
            if step <= Decimal::ZERO {
                return Err(Error::Validation(ValidationError::InvalidInput(format!(
                    "Step amount must be positive (got {})",
                    step
                ))));
            }
        }

        Ok(())
    }

    /// Validates the bundle and converts percentages to fractions.
    ///
    /// Only entries for listed funds and countries are carried over.
    /// `default_step` applies when the bundle does not set its own step. The
    /// growth investment may span at most `MAX_OPTIMIZER_STEPS` steps.
    pub fn to_fractions(&self, default_step: Decimal) -> Result<ValidatedInput> {
        self.validate()?;
        let step_amount = self.step_amount.unwrap_or(default_step);
        check_step_count(self.growth_investment, step_amount)?;

        let compositions: CompositionMap = self
            .funds
            .iter()
            .map(|fund| {
                let row = self.compositions.get(fund);
                let fractions = self
                    .countries
                    .iter()
                    .map(|country| (country.clone(), percent_to_fraction(lookup(row, country))))
                    .collect();
                (fund.clone(), fractions)
            })
            .collect();

        Ok(ValidatedInput {
            funds: self.funds.clone(),
            countries: self.countries.clone(),
            assets: restrict(&self.assets, &self.funds, |v| v),
            compositions,
            targets: restrict(&self.targets, &self.countries, percent_to_fraction),
            recurring_investment: self.recurring_investment,
            recurring_allocation: restrict(
                &self.recurring_allocation,
                &self.funds,
                percent_to_fraction,
            ),
            growth_investment: self.growth_investment,
            priority_fund: self.priority_fund.clone(),
            step_amount,
        })
    }
}

fn validate_names(kind: &str, names: &[String]) -> Result<()> {
    if names.is_empty() {
        return Err(Error::Validation(ValidationError::MissingField(format!(
            "{}s",
            kind.to_lowercase()
        ))));
    }
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "{} name cannot be empty",
                kind
            ))));
        }
        if !seen.insert(name.as_str()) {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "{} '{}' is listed more than once",
                kind, name
            ))));
        }
    }
    Ok(())
}

fn check_percentage_sum(subject: &str, total: Decimal) -> Result<()> {
    if total.saturating_sub(dec!(100)).abs() > PERCENT_SUM_TOLERANCE {
        return Err(Error::Validation(ValidationError::PercentageSum {
            subject: subject.to_string(),
            total: total.round_dp(1),
        }));
    }
    Ok(())
}

fn check_amount(field: &str, value: Decimal) -> Result<()> {
    if value < Decimal::ZERO {
        return Err(Error::Validation(ValidationError::NegativeAmount {
            field: field.to_string(),
            value,
        }));
    }
    if value > MAX_AMOUNT {
        return Err(Error::Validation(ValidationError::AmountTooLarge {
            field: field.to_string(),
            value,
            limit: MAX_AMOUNT,
        }));
    }
    Ok(())
}

fn check_step_count(budget: Decimal, step: Decimal) -> Result<()> {
    if step <= Decimal::ZERO {
        return Ok(());
    }
    let steps = budget.checked_div(step);
    if steps.map_or(true, |steps| steps > MAX_OPTIMIZER_STEPS) {
        return Err(Error::Validation(ValidationError::TooManySteps {
            budget,
            step,
            limit: MAX_OPTIMIZER_STEPS,
        }));
    }
    Ok(())
}

fn lookup(row: Option<&AmountMap>, key: &str) -> Decimal {
    row.and_then(|r| r.get(key))
        .copied()
        .unwrap_or(Decimal::ZERO)
}

fn sum_over(row: Option<&AmountMap>, keys: &[String]) -> Decimal {
    keys.iter()
        .map(|key| lookup(row, key))
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

fn restrict(
    source: &AmountMap,
    keys: &[String],
    convert: impl Fn(Decimal) -> Decimal,
) -> AmountMap {
    keys.iter()
        .map(|key| (key.clone(), convert(lookup(Some(source), key))))
        .collect()
}

fn percent_to_fraction(percent: Decimal) -> Decimal {
    percent / dec!(100)
}
