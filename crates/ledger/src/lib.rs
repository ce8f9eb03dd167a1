//! `depot-ledger` — the stock-movement ledger.
//!
//! Movements are an append-only log; a product's stock counter is only ever
//! changed by planning a movement through [`engine::plan_movement`] and
//! committing both writes atomically (the store's job).

pub mod engine;
pub mod movement;

pub use engine::{
    adjustment, plan_movement, StockChange, ADJUSTMENT_NOTE, INITIAL_STOCK_NOTE,
};
pub use movement::{Movement, MovementFilter, MovementKind};
