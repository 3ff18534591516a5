//! Stock Ledger Port (Driven Port)
//!
//! The platform keeps stock three ways: a per-product total, a per-location
//! quantity and an append-only movement log. This port hides all three behind
//! reads plus one atomic "apply deltas and append movements" call.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::cycle_count::errors::CycleCountError;
use crate::domain::shared::{LocationId, Money, ProductId, TenantId};
use crate::domain::stock_ledger::{AdjustmentBatch, AdjustmentReceipt, LocationStockLine};

/// Stock ledger errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// Product has no ledger record for the tenant.
    #[error("Product not found in ledger: {product_id}")]
    ProductNotFound {
        /// Missing product.
        product_id: ProductId,
    },

    /// Product has no quantity record at the location.
    #[error("No stock record for product {product_id} at location {location_id}")]
    LocationStockNotFound {
        /// Product.
        product_id: ProductId,
        /// Location.
        location_id: LocationId,
    },

    /// Ledger transaction could not commit.
    #[error("Ledger transaction failed: {message}")]
    TransactionFailed {
        /// Error message.
        message: String,
    },

    /// Ledger could not be reached.
    #[error("Ledger unavailable: {message}")]
    Unavailable {
        /// Error message.
        message: String,
    },
}

impl LedgerError {
    /// Map a failed read to the engine error.
    #[must_use]
    pub fn into_read_error(self) -> CycleCountError {
        match self {
            Self::ProductNotFound { product_id } => {
                CycleCountError::not_found("Product", product_id)
            }
            Self::LocationStockNotFound {
                product_id,
                location_id,
            } => CycleCountError::not_found("LocationStock", format!("{product_id}@{location_id}")),
            Self::TransactionFailed { .. } | Self::Unavailable { .. } => CycleCountError::Storage {
                message: self.to_string(),
            },
        }
    }
}

/// A failed write never leaves anything applied.
impl From<LedgerError> for CycleCountError {
    fn from(err: LedgerError) -> Self {
        Self::LedgerTransaction {
            message: err.to_string(),
        }
    }
}

/// Port for the stock ledger.
#[async_trait]
pub trait StockLedgerPort: Send + Sync {
    /// Book quantities of every product stocked at a location.
    ///
    /// # Errors
    ///
    /// Returns error if the ledger cannot be read.
    async fn location_snapshot(
        &self,
        tenant_id: &TenantId,
        location_id: &LocationId,
    ) -> Result<Vec<LocationStockLine>, LedgerError>;

    /// Current cost basis of the given products.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` if a product is unknown to the tenant.
    async fn unit_costs(
        &self,
        tenant_id: &TenantId,
        product_ids: &[ProductId],
    ) -> Result<HashMap<ProductId, Money>, LedgerError>;

    /// Apply every adjustment of the batch in one transaction: product total,
    /// location quantity and one `CYCLE_COUNT` movement per line.
    ///
    /// Lines applied by an earlier call are skipped and reported in
    /// [`AdjustmentReceipt::already_applied_lines`].
    ///
    /// # Errors
    ///
    /// Returns error if anything fails; nothing is applied in that case.
    async fn apply_adjustments(
        &self,
        batch: &AdjustmentBatch,
    ) -> Result<AdjustmentReceipt, LedgerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_failures_become_ledger_transaction_errors() {
        let err: CycleCountError = LedgerError::TransactionFailed {
            message: "serialization failure".to_string(),
        }
        .into();
        assert!(matches!(err, CycleCountError::LedgerTransaction { .. }));
        assert!(err.is_retryable());
    }

    #[test]
    fn read_failures_keep_not_found() {
        let err = LedgerError::ProductNotFound {
            product_id: ProductId::new("p-9"),
        }
        .into_read_error();
        assert_eq!(err, CycleCountError::not_found("Product", "p-9"));
    }
}
