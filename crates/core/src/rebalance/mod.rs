//! Rebalance module - end-to-end calculation over a user input bundle.

mod rebalance_model;
mod rebalance_service;
mod rebalance_traits;


pub use rebalance_model::{CountryBreakdown, FundProposal, PortfolioBreakdown, RebalanceResult};
pub use rebalance_service::RebalanceService;
pub use rebalance_traits::RebalanceServiceTrait;
