//! Operations producing an edited copy of an input bundle.
//!
//! Funds and countries are never mutated in place: every operation returns a
//! new `CalculationInput` with all per-fund and per-country entries kept in
//! step with the name lists.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::CalculationInput;
use crate::constants::{OTHER_COUNTRY, PERCENT_INPUT_PRECISION};
use crate::errors::ValidationError;
use crate::portfolio::AmountMap;
use crate::{Error, Result};

/// Percentage left for the residual country: 100 minus every other listed
/// country's value, rounded to one decimal.
pub fn derive_residual(row: &AmountMap, countries: &[String]) -> Decimal {
    let assigned = countries
        .iter()
        .filter(|country| country.as_str() != OTHER_COUNTRY)
        .map(|country| row.get(country).copied().unwrap_or(Decimal::ZERO))
        .fold(Decimal::ZERO, Decimal::saturating_add);
    dec!(100)
        .saturating_sub(assigned)
        .round_dp(PERCENT_INPUT_PRECISION)
}

impl CalculationInput {
    /// Fills the residual country of every composition row and of the
    /// targets. No-op when the residual country is not listed.
    pub fn with_residuals_filled(&self) -> Self {
        let mut next = self.clone();
        if !next.countries.iter().any(|c| c == OTHER_COUNTRY) {
            return next;
        }

        for fund in &next.funds {
            let row = next.compositions.entry(fund.clone()).or_default();
            let residual = derive_residual(row, &next.countries);
            row.insert(OTHER_COUNTRY.to_string(), residual);
        }
        let residual = derive_residual(&next.targets, &next.countries);
        next.targets.insert(OTHER_COUNTRY.to_string(), residual);
        next
    }

    /// Appends a fund with no holdings, no composition and no recurring share.
    pub fn with_fund_added(&self, name: &str) -> Result<Self> {
        let name = name.trim();
        ensure_new_name("Fund", name, &self.funds)?;

        let mut next = self.clone();
        next.funds.push(name.to_string());
        next.assets.insert(name.to_string(), Decimal::ZERO);
        next.compositions.insert(name.to_string(), AmountMap::new());
        next.recurring_allocation
            .insert(name.to_string(), Decimal::ZERO);
        Ok(next)
    }

    /// Renames a fund, carrying over its holdings, composition, recurring
    /// share and priority flag.
    pub fn with_fund_renamed(&self, old_name: &str, new_name: &str) -> Result<Self> {
        let new_name = new_name.trim();
        let index = self
            .funds
            .iter()
            .position(|f| f == old_name)
            .ok_or_else(|| Error::FundNotFound(old_name.to_string()))?;
        ensure_new_name("Fund", new_name, &self.funds)?;

        let mut next = self.clone();
        next.funds[index] = new_name.to_string();
        rekey(&mut next.assets, old_name, new_name);
        rekey(&mut next.recurring_allocation, old_name, new_name);
        if let Some(row) = next.compositions.remove(old_name) {
            next.compositions.insert(new_name.to_string(), row);
        }
        if next.priority_fund.as_deref() == Some(old_name) {
            next.priority_fund = Some(new_name.to_string());
        }
        Ok(next)
    }

    /// Removes a fund and everything keyed by it. Clears the priority fund
    /// when it was the removed one.
    pub fn with_fund_removed(&self, name: &str) -> Result<Self> {
        if !self.funds.iter().any(|f| f == name) {
            return Err(Error::FundNotFound(name.to_string()));
        }

        let mut next = self.clone();
        next.funds.retain(|f| f != name);
        next.assets.remove(name);
        next.compositions.remove(name);
        next.recurring_allocation.remove(name);
        if next.priority_fund.as_deref() == Some(name) {
            next.priority_fund = None;
        }
        Ok(next)
    }

    /// Adds a country just before the residual country (or at the end when
    /// there is none). The residual name itself is reserved.
    pub fn with_country_added(&self, name: &str) -> Result<Self> {
        let name = name.trim();
        if name == OTHER_COUNTRY {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "'{}' is reserved for the residual country",
                OTHER_COUNTRY
            ))));
        }
        ensure_new_name("Country", name, &self.countries)?;

        let mut next = self.clone();
        let position = next
            .countries
            .iter()
            .position(|c| c == OTHER_COUNTRY)
            .unwrap_or(next.countries.len());
        next.countries.insert(position, name.to_string());
        Ok(next)
    }

    /// Removes a country from the list, every composition row and the
    /// targets. The residual country cannot be removed and at least two
    /// countries must remain.
    pub fn with_country_removed(&self, name: &str) -> Result<Self> {
        if name == OTHER_COUNTRY {
            return Err(Error::ConstraintViolation(format!(
                "The residual country '{}' cannot be removed",
                OTHER_COUNTRY
            )));
        }
        if !self.countries.iter().any(|c| c == name) {
            return Err(Error::CountryNotFound(name.to_string()));
        }
        if self.countries.len() <= 2 {
            return Err(Error::ConstraintViolation(
                "At least two countries are required".to_string(),
            ));
        }

        let mut next = self.clone();
        next.countries.retain(|c| c != name);
        for row in next.compositions.values_mut() {
            row.remove(name);
        }
        next.targets.remove(name);
        Ok(next)
    }
}

fn ensure_new_name(kind: &str, name: &str, existing: &[String]) -> Result<()> {
    if name.is_empty() {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "{} name cannot be empty",
            kind
        ))));
    }
    if existing.iter().any(|e| e == name) {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "{} '{}' already exists",
            kind, name
        ))));
    }
    Ok(())
}

fn rekey(map: &mut AmountMap, old_key: &str, new_key: &str) {
    if let Some(value) = map.remove(old_key) {
        map.insert(new_key.to_string(), value);
    }
}
