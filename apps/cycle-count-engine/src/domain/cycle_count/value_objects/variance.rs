//! Variance between book and counted quantity.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::Money;

/// Result of comparing a counted quantity against the book quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variance {
    /// `counted - expected`. Positive is overage, negative is shrinkage.
    pub quantity: i64,
    /// Variance relative to the expected quantity, in percent.
    pub percent: Decimal,
    /// Signed monetary impact at the cost basis used.
    pub value: Money,
}

impl Variance {
    /// Returns true if the count matched the books.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.quantity == 0
    }

    /// Returns true if more stock was found than booked.
    #[must_use]
    pub const fn is_overage(&self) -> bool {
        self.quantity > 0
    }

    /// Returns true if less stock was found than booked.
    #[must_use]
    pub const fn is_shrinkage(&self) -> bool {
        self.quantity < 0
    }
}
