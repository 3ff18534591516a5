//! Stock Ledger Types
//!
//! The ledger itself is owned by the wider platform; these are the shapes the
//! reconciliation engine reads from it and writes to it:
//!
//! - [`LocationStockLine`]: one product's book quantity at a location
//! - [`LedgerAdjustment`] / [`AdjustmentBatch`]: signed deltas to apply atomically
//! - [`StockMovement`]: the append-only audit entry produced per applied delta

mod abc_class;
mod movement;
mod stock_line;

pub use abc_class::{AbcClass, ParseAbcClassError};
pub use movement::{
    AdjustmentBatch, AdjustmentReceipt, LedgerAdjustment, MovementType, StockMovement,
};
pub use stock_line::LocationStockLine;
