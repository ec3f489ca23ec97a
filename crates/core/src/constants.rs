use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Name of the residual country bucket whose weight is derived from the others
pub const OTHER_COUNTRY: &str = "Other";

/// Default granularity of each optimizer move, in currency units
pub const DEFAULT_STEP_AMOUNT: Decimal = dec!(100);

/// Allowed deviation from 100 when validating percentage rows
pub const PERCENT_SUM_TOLERANCE: Decimal = dec!(0.1);

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Decimal precision used when pre-filling percentage inputs
pub const PERCENT_INPUT_PRECISION: u32 = 1;

/// Largest accepted holding or contribution, and cap on their combined total
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// Largest number of optimizer steps one calculation may take
pub const MAX_OPTIMIZER_STEPS: Decimal = dec!(10000);
