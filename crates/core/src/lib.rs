//! Rebalancer Core - valuation, error metric and contribution optimizer.
//!
//! This crate contains the pure calculation logic for proposing how a new
//! contribution should be split across funds so that the projected portfolio
//! tracks a set of target country weights. It owns no state between calls;
//! every entry point takes its inputs explicitly and returns new values.

pub mod constants;
pub mod errors;
pub mod inputs;
pub mod optimizer;
pub mod portfolio;
pub mod rebalance;

// Re-export the calculation entry points
pub use optimizer::{calculate_error, optimize_allocation, AllocationStrategy};
pub use portfolio::valuation::{calculate_current_portfolio, calculate_future_portfolio};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
