//! `depot-catalog` — manufacturer and product domain types.
//!
//! Pure types and validation; persistence lives in `depot-store`.

pub mod manufacturer;
pub mod product;

pub use manufacturer::Manufacturer;
pub use product::{Product, ProductFilter, StockBand};
