//! Portfolio module - country-level valuation of fund holdings.

pub mod valuation;

pub use valuation::{AmountMap, CompositionMap, PortfolioSnapshot};
