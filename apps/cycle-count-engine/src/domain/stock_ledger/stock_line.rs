//! Location stock snapshot line.

use serde::{Deserialize, Serialize};

use super::AbcClass;
use crate::domain::shared::{LocationId, Money, ProductId};

/// One product's book-of-record quantity at one location, joined with the
/// product attributes the sampler and variance calculator need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationStockLine {
    /// Product.
    pub product_id: ProductId,
    /// Location the quantity is held at.
    pub location_id: LocationId,
    /// Book quantity at the location.
    pub quantity: i64,
    /// Product value classification, if assigned.
    pub abc_class: Option<AbcClass>,
    /// Current cost basis of the product.
    pub unit_cost: Money,
}

impl LocationStockLine {
    /// Create a snapshot line.
    #[must_use]
    pub fn new(
        product_id: impl Into<ProductId>,
        location_id: impl Into<LocationId>,
        quantity: i64,
        abc_class: Option<AbcClass>,
        unit_cost: Money,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            location_id: location_id.into(),
            quantity,
            abc_class,
            unit_cost,
        }
    }
}
