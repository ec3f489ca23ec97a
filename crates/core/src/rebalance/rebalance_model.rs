//! Rebalance result models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::optimizer::{Allocation, AllocationStrategy};

/// One country row of a portfolio breakdown. Ratios are percentages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CountryBreakdown {
    pub country: String,
    pub amount: Decimal,
    pub ratio: Decimal,
    pub target: Decimal,
    /// `ratio - target`, in percentage points
    pub difference: Decimal,
}

/// A portfolio broken down by country in display form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioBreakdown {
    pub total_asset: Decimal,
    pub rows: Vec<CountryBreakdown>,
}

impl PortfolioBreakdown {
    pub fn row(&self, country: &str) -> Option<&CountryBreakdown> {
        self.rows.iter().find(|row| row.country == country)
    }
}

/// Proposed discretionary purchase of one fund.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FundProposal {
    pub fund: String,
    pub amount: Decimal,
    /// Percentage of the growth investment
    pub share: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RebalanceResult {
    pub strategy: AllocationStrategy,
    pub current: PortfolioBreakdown,
    pub future: PortfolioBreakdown,
    /// Rows in fund order
    pub proposal: Vec<FundProposal>,
    /// Unrounded optimizer output
    pub allocation: Allocation,
    /// Error metric of the future portfolio
    pub error: Decimal,
}
