use rust_decimal::Decimal;

use crate::errors::Result;
use crate::inputs::CalculationInput;
use crate::rebalance::rebalance_model::RebalanceResult;

/// Trait for rebalance service operations
pub trait RebalanceServiceTrait: Send + Sync {
    /// Validates the bundle, values it and proposes a split of the growth
    /// investment.
    fn calculate(&self, input: CalculationInput) -> Result<RebalanceResult>;

    fn template(&self) -> CalculationInput;

    /// Evaluates an arithmetic amount entry such as `10000*12`, floored.
    fn evaluate_amount(&self, expression: &str) -> Result<Decimal>;

    fn add_fund(&self, input: CalculationInput, name: &str) -> Result<CalculationInput>;
    fn rename_fund(
        &self,
        input: CalculationInput,
        old_name: &str,
        new_name: &str,
    ) -> Result<CalculationInput>;
    fn remove_fund(&self, input: CalculationInput, name: &str) -> Result<CalculationInput>;
    fn add_country(&self, input: CalculationInput, name: &str) -> Result<CalculationInput>;
    fn remove_country(&self, input: CalculationInput, name: &str) -> Result<CalculationInput>;
}
