//! Ledger adjustments and the movement log entries they produce.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::{
    LineId, LocationId, MovementId, ProductId, TenantId, Timestamp, UserId,
};

/// Kind of stock movement.
///
/// The platform ledger knows many movement kinds (receipts, sales, transfers);
/// this engine only ever writes cycle count corrections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum MovementType {
    /// Correction produced by a verified cycle count.
    CycleCount,
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CycleCount => write!(f, "CYCLE_COUNT"),
        }
    }
}

/// Immutable movement log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovement {
    /// Movement identifier.
    pub id: MovementId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Product whose stock moved.
    pub product_id: ProductId,
    /// Location whose stock moved.
    pub location_id: LocationId,
    /// Movement kind.
    pub movement_type: MovementType,
    /// Signed quantity delta.
    pub quantity: i64,
    /// Count line this movement was produced from (idempotency key).
    pub source_line_id: LineId,
    /// Human-readable reference (session code).
    pub reference: String,
    /// Audit justification.
    pub notes: String,
    /// User who applied the adjustment.
    pub user_id: UserId,
    /// When the movement was appended.
    pub created_at: Timestamp,
}

/// A single signed correction derived from a verified count line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerAdjustment {
    /// Count line the correction comes from.
    pub line_id: LineId,
    /// Product to correct.
    pub product_id: ProductId,
    /// Signed delta (counted - expected).
    pub delta: i64,
    /// Quantity the books showed when the count started.
    pub expected_quantity: i64,
    /// Quantity physically counted.
    pub counted_quantity: i64,
}

impl LedgerAdjustment {
    /// Audit justification recorded on the movement entry.
    #[must_use]
    pub fn justification(&self, session_code: &str) -> String {
        format!(
            "Cycle count adjustment: {session_code}. Expected: {}, Counted: {}",
            self.expected_quantity, self.counted_quantity
        )
    }
}

/// All corrections of one session invocation, applied as one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentBatch {
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Location the session counted.
    pub location_id: LocationId,
    /// Session code, embedded in every movement.
    pub session_code: String,
    /// User applying the adjustment.
    pub actor: UserId,
    /// Corrections to apply.
    pub adjustments: Vec<LedgerAdjustment>,
}

impl AdjustmentBatch {
    /// Returns true if there is nothing to apply.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adjustments.is_empty()
    }

    /// Net quantity change across the batch.
    #[must_use]
    pub fn net_delta(&self) -> i64 {
        self.adjustments.iter().map(|a| a.delta).sum()
    }
}

/// Outcome of applying a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentReceipt {
    /// Movements appended by this call.
    pub movements: Vec<MovementId>,
    /// Lines applied by this call.
    pub applied_lines: Vec<LineId>,
    /// Lines the ledger had already applied on an earlier call.
    pub already_applied_lines: Vec<LineId>,
}

impl AdjustmentReceipt {
    /// Every line that is now reflected in the ledger.
    pub fn settled_lines(&self) -> impl Iterator<Item = &LineId> {
        self.applied_lines
            .iter()
            .chain(self.already_applied_lines.iter())
    }
}
