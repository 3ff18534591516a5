//! In-memory stock ledger.
//!
//! Holds the three stock representations (product totals, location
//! quantities, movement log) behind one mutex, so a batch is validated and
//! applied without any reader seeing half of it.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::application::ports::{LedgerError, StockLedgerPort};
use crate::domain::shared::{LineId, LocationId, Money, MovementId, ProductId, TenantId, Timestamp};
use crate::domain::stock_ledger::{
    AbcClass, AdjustmentBatch, AdjustmentReceipt, LocationStockLine, MovementType, StockMovement,
};

#[derive(Debug, Clone)]
struct ProductRecord {
    quantity: i64,
    unit_cost: Money,
    abc_class: Option<AbcClass>,
}

#[derive(Debug, Default)]
struct LedgerState {
    products: HashMap<(TenantId, ProductId), ProductRecord>,
    locations: BTreeMap<(TenantId, LocationId, ProductId), i64>,
    movements: Vec<StockMovement>,
    applied_lines: HashMap<(TenantId, LineId), MovementId>,
    fail_next: Option<String>,
}

/// In-memory implementation of `StockLedgerPort`.
#[derive(Debug, Default)]
pub struct InMemoryStockLedger {
    state: Mutex<LedgerState>,
}

impl InMemoryStockLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stock a product at a location. The product total grows by the
    /// location quantity; cost and class are overwritten.
    pub fn seed(&self, tenant_id: impl Into<TenantId>, line: LocationStockLine) {
        let tenant_id = tenant_id.into();
        let mut state = self.lock();

        let product = state
            .products
            .entry((tenant_id.clone(), line.product_id.clone()))
            .or_insert(ProductRecord {
                quantity: 0,
                unit_cost: line.unit_cost,
                abc_class: line.abc_class,
            });
        product.quantity += line.quantity;
        product.unit_cost = line.unit_cost;
        product.abc_class = line.abc_class;

        *state
            .locations
            .entry((tenant_id, line.location_id, line.product_id))
            .or_insert(0) += line.quantity;
    }

    /// Change a product's cost basis.
    pub fn set_unit_cost(&self, tenant_id: &TenantId, product_id: &ProductId, unit_cost: Money) {
        let mut state = self.lock();
        if let Some(product) = state
            .products
            .get_mut(&(tenant_id.clone(), product_id.clone()))
        {
            product.unit_cost = unit_cost;
        }
    }

    /// Make the next `apply_adjustments` call fail without applying anything.
    pub fn fail_next_apply(&self, message: impl Into<String>) {
        self.lock().fail_next = Some(message.into());
    }

    /// Product total across locations.
    #[must_use]
    pub fn product_quantity(&self, tenant_id: &TenantId, product_id: &ProductId) -> Option<i64> {
        self.lock()
            .products
            .get(&(tenant_id.clone(), product_id.clone()))
            .map(|p| p.quantity)
    }

    /// Quantity at one location.
    #[must_use]
    pub fn location_quantity(
        &self,
        tenant_id: &TenantId,
        location_id: &LocationId,
        product_id: &ProductId,
    ) -> Option<i64> {
        self.lock()
            .locations
            .get(&(tenant_id.clone(), location_id.clone(), product_id.clone()))
            .copied()
    }

    /// Movement log of a tenant, oldest first.
    #[must_use]
    pub fn movements(&self, tenant_id: &TenantId) -> Vec<StockMovement> {
        self.lock()
            .movements
            .iter()
            .filter(|m| &m.tenant_id == tenant_id)
            .cloned()
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl StockLedgerPort for InMemoryStockLedger {
    async fn location_snapshot(
        &self,
        tenant_id: &TenantId,
        location_id: &LocationId,
    ) -> Result<Vec<LocationStockLine>, LedgerError> {
        let state = self.lock();
        state
            .locations
            .iter()
            .filter(|((t, l, _), _)| t == tenant_id && l == location_id)
            .map(|((_, _, product_id), quantity)| {
                let product = state
                    .products
                    .get(&(tenant_id.clone(), product_id.clone()))
                    .ok_or_else(|| LedgerError::ProductNotFound {
                        product_id: product_id.clone(),
                    })?;
                Ok(LocationStockLine::new(
                    product_id.clone(),
                    location_id.clone(),
                    *quantity,
                    product.abc_class,
                    product.unit_cost,
                ))
            })
            .collect()
    }

    async fn unit_costs(
        &self,
        tenant_id: &TenantId,
        product_ids: &[ProductId],
    ) -> Result<HashMap<ProductId, Money>, LedgerError> {
        let state = self.lock();
        product_ids
            .iter()
            .map(|product_id| {
                state
                    .products
                    .get(&(tenant_id.clone(), product_id.clone()))
                    .map(|p| (product_id.clone(), p.unit_cost))
                    .ok_or_else(|| LedgerError::ProductNotFound {
                        product_id: product_id.clone(),
                    })
            })
            .collect()
    }

    async fn apply_adjustments(
        &self,
        batch: &AdjustmentBatch,
    ) -> Result<AdjustmentReceipt, LedgerError> {
        let mut state = self.lock();

        if let Some(message) = state.fail_next.take() {
            return Err(LedgerError::TransactionFailed { message });
        }

        let tenant_id = &batch.tenant_id;
        let mut receipt = AdjustmentReceipt::default();
        let mut seen = HashSet::new();
        let mut to_apply = Vec::new();

        // Validate everything before touching anything.
        for adjustment in &batch.adjustments {
            if !seen.insert(&adjustment.line_id) {
                continue;
            }
            if state
                .applied_lines
                .contains_key(&(tenant_id.clone(), adjustment.line_id.clone()))
            {
                receipt.already_applied_lines.push(adjustment.line_id.clone());
                continue;
            }

            let product_key = (tenant_id.clone(), adjustment.product_id.clone());
            let product = state
                .products
                .get(&product_key)
                .ok_or_else(|| LedgerError::ProductNotFound {
                    product_id: adjustment.product_id.clone(),
                })?;
            let location_key = (
                tenant_id.clone(),
                batch.location_id.clone(),
                adjustment.product_id.clone(),
            );
            let at_location = state.locations.get(&location_key).copied().ok_or_else(|| {
                LedgerError::LocationStockNotFound {
                    product_id: adjustment.product_id.clone(),
                    location_id: batch.location_id.clone(),
                }
            })?;

            let overflow = || LedgerError::TransactionFailed {
                message: format!("quantity overflow for product {}", adjustment.product_id),
            };
            product
                .quantity
                .checked_add(adjustment.delta)
                .ok_or_else(overflow)?;
            at_location
                .checked_add(adjustment.delta)
                .ok_or_else(overflow)?;

            to_apply.push((adjustment, product_key, location_key));
        }

        let now = Timestamp::now();
        for (adjustment, product_key, location_key) in to_apply {
            if let Some(product) = state.products.get_mut(&product_key) {
                product.quantity += adjustment.delta;
            }
            if let Some(quantity) = state.locations.get_mut(&location_key) {
                *quantity += adjustment.delta;
            }

            let movement = StockMovement {
                id: MovementId::generate(),
                tenant_id: tenant_id.clone(),
                product_id: adjustment.product_id.clone(),
                location_id: batch.location_id.clone(),
                movement_type: MovementType::CycleCount,
                quantity: adjustment.delta,
                source_line_id: adjustment.line_id.clone(),
                reference: batch.session_code.clone(),
                notes: adjustment.justification(&batch.session_code),
                user_id: batch.actor.clone(),
                created_at: now,
            };
            state.applied_lines.insert(
                (tenant_id.clone(), adjustment.line_id.clone()),
                movement.id.clone(),
            );
            receipt.movements.push(movement.id.clone());
            receipt.applied_lines.push(adjustment.line_id.clone());
            state.movements.push(movement);
        }

        tracing::debug!(
            tenant_id = %tenant_id,
            reference = batch.session_code.as_str(),
            applied = receipt.applied_lines.len(),
            skipped = receipt.already_applied_lines.len(),
            "Applied ledger adjustments"
        );

        Ok(receipt)
    }
}
