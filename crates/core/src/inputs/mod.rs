//! Calculation inputs - the per-run bundle, its validation and edit operations.

mod inputs_edit;
mod inputs_expression;
mod inputs_model;
mod inputs_template;

pub use inputs_edit::derive_residual;
pub use inputs_expression::evaluate_amount;
pub use inputs_model::{CalculationInput, ValidatedInput};
