//! Count line: one product to count within a session.

use serde::{Deserialize, Serialize};

use crate::domain::cycle_count::errors::CycleCountError;
use crate::domain::cycle_count::services::VarianceCalculator;
use crate::domain::cycle_count::value_objects::{LineStatus, Variance};
use crate::domain::shared::{LineId, Money, ProductId, Timestamp};
use crate::domain::stock_ledger::{AbcClass, LedgerAdjustment, LocationStockLine};

/// A counted (or to-be-counted) product within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountLine {
    id: LineId,
    product_id: ProductId,
    abc_class: Option<AbcClass>,
    /// Book quantity frozen when the session started.
    expected_quantity: i64,
    counted_quantity: Option<i64>,
    variance: Option<Variance>,
    /// Cost basis the variance value was computed with.
    unit_cost: Option<Money>,
    status: LineStatus,
    counted_at: Option<Timestamp>,
    notes: Option<String>,
}

impl CountLine {
    /// Create a pending line from a snapshot entry.
    #[must_use]
    pub fn from_snapshot(line: &LocationStockLine) -> Self {
        Self {
            id: LineId::generate(),
            product_id: line.product_id.clone(),
            abc_class: line.abc_class,
            expected_quantity: line.quantity,
            counted_quantity: None,
            variance: None,
            unit_cost: None,
            status: LineStatus::Pending,
            counted_at: None,
            notes: None,
        }
    }

    /// Get the line ID.
    #[must_use]
    pub const fn id(&self) -> &LineId {
        &self.id
    }

    /// Get the product ID.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Get the ABC class captured at start.
    #[must_use]
    pub const fn abc_class(&self) -> Option<AbcClass> {
        self.abc_class
    }

    /// Get the expected (book) quantity.
    #[must_use]
    pub const fn expected_quantity(&self) -> i64 {
        self.expected_quantity
    }

    /// Get the counted quantity, if recorded.
    #[must_use]
    pub const fn counted_quantity(&self) -> Option<i64> {
        self.counted_quantity
    }

    /// Get the variance, once the session is completed.
    #[must_use]
    pub const fn variance(&self) -> Option<Variance> {
        self.variance
    }

    /// Get the cost basis frozen at completion.
    #[must_use]
    pub const fn unit_cost(&self) -> Option<Money> {
        self.unit_cost
    }

    /// Get the line status.
    #[must_use]
    pub const fn status(&self) -> LineStatus {
        self.status
    }

    /// Get when the count was last recorded.
    #[must_use]
    pub const fn counted_at(&self) -> Option<Timestamp> {
        self.counted_at
    }

    /// Get the counter's notes.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Check whether a count has been recorded.
    #[must_use]
    pub fn is_counted(&self) -> bool {
        self.status != LineStatus::Pending
    }

    /// Check whether the variance still has to reach the ledger.
    #[must_use]
    pub fn needs_adjustment(&self) -> bool {
        self.status != LineStatus::Adjusted && self.variance.is_some_and(|v| !v.is_zero())
    }

    /// Record a physical count. Omitted notes keep the previous ones.
    ///
    /// A count older than the one already recorded loses; returns whether
    /// this count was kept.
    pub(super) fn record(&mut self, counted: i64, notes: Option<String>, at: Timestamp) -> bool {
        if self.counted_at.is_some_and(|previous| previous > at) {
            return false;
        }
        self.counted_quantity = Some(counted);
        self.counted_at = Some(at);
        if notes.is_some() {
            self.notes = notes;
        }
        self.status = LineStatus::Counted;
        true
    }

    /// Variance this line would settle at. `None` on an uncounted line.
    pub(super) fn evaluate(&self, unit_cost: Money) -> Result<Option<Variance>, CycleCountError> {
        self.counted_quantity
            .map(|counted| VarianceCalculator::compute(self.expected_quantity, counted, unit_cost))
            .transpose()
    }

    /// Freeze a variance from `evaluate` together with its cost basis.
    pub(super) fn settle(&mut self, variance: Variance, unit_cost: Money) {
        self.variance = Some(variance);
        self.unit_cost = Some(unit_cost);
    }

    /// Ledger correction for this line, if one is still owed.
    #[must_use]
    pub fn pending_adjustment(&self) -> Option<LedgerAdjustment> {
        if !self.needs_adjustment() {
            return None;
        }
        let variance = self.variance?;
        let counted = self.counted_quantity?;
        Some(LedgerAdjustment {
            line_id: self.id.clone(),
            product_id: self.product_id.clone(),
            delta: variance.quantity,
            expected_quantity: self.expected_quantity,
            counted_quantity: counted,
        })
    }

    pub(super) const fn mark_adjusted(&mut self) {
        self.status = LineStatus::Adjusted;
    }
}
