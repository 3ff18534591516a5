//! Variance Calculator
//!
//! Pure comparison of counted against expected quantity.

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use rust_decimal_macros::dec;

use crate::domain::cycle_count::errors::CycleCountError;
use crate::domain::cycle_count::value_objects::Variance;
use crate::domain::shared::Money;

/// Computes line variances. Stateless.
pub struct VarianceCalculator;

impl VarianceCalculator {
    /// Decimal places kept on variance percentages.
    pub const PERCENT_SCALE: u32 = 2;

    /// Compare a count against the books.
    ///
    /// With nothing expected the percentage is pinned to 100 when stock was
    /// found and 0 when none was, instead of dividing by zero.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the quantity or value of the variance
    /// cannot be represented.
    pub fn compute(expected: i64, counted: i64, unit_cost: Money) -> Result<Variance, CycleCountError> {
        let quantity = counted
            .checked_sub(expected)
            .ok_or_else(|| out_of_range(expected, counted))?;
        let value = unit_cost
            .checked_mul_quantity(quantity)
            .ok_or_else(|| out_of_range(expected, counted))?;

        let percent = if expected > 0 {
            (Decimal::from(quantity) / Decimal::from(expected) * dec!(100))
                .round_dp_with_strategy(Self::PERCENT_SCALE, RoundingStrategy::MidpointAwayFromZero)
        } else if counted > 0 {
            dec!(100)
        } else {
            Decimal::ZERO
        };

        Ok(Variance {
            quantity,
            percent,
            value,
        })
    }
}

fn out_of_range(expected: i64, counted: i64) -> CycleCountError {
    CycleCountError::validation(
        "counted_quantity",
        format!("variance of {counted} against expected {expected} is out of range"),
    )
}
