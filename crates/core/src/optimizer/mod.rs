//! Contribution optimizer - error metric, allocation strategies and entry point.

mod allocation_optimizer;
mod error_metric;
mod greedy;
mod optimizer_model;
mod priority;

pub use allocation_optimizer::optimize_allocation;
pub use error_metric::calculate_error;
pub use optimizer_model::{Allocation, AllocationStrategy, OptimizationContext};

#[cfg(test)]
mod optimizer_tests;
