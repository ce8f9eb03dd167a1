use core::str::FromStr;

use serde::{Deserialize, Serialize};

use depot_core::{DomainError, DomainResult, ManufacturerId, ProductId};

use crate::manufacturer::validated_name;

/// A tracked product.
///
/// `stock` is a denormalized running total. It is only ever mutated through
/// the ledger engine, which keeps it equal to the net sum of the product's
/// movements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub manufacturer_id: ManufacturerId,
    pub stock: i64,
}

impl Product {
    /// Validate and construct a product. Names are trimmed and must be
    /// non-blank; stock must not be negative.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        manufacturer_id: ManufacturerId,
        stock: i64,
    ) -> DomainResult<Self> {
        let name = name.into();
        let name = validated_name(&name)?;
        if stock < 0 {
            return Err(DomainError::validation("stock cannot be negative"));
        }
        Ok(Self {
            id,
            name,
            manufacturer_id,
            stock,
        })
    }
}

/// Coarse stock classification used by the product list filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockBand {
    Low,
    Medium,
    High,
}

impl StockBand {
    /// Band boundaries: low < 5, 5 <= medium <= 20, high > 20.
    pub fn of(stock: i64) -> Self {
        if stock < 5 {
            StockBand::Low
        } else if stock <= 20 {
            StockBand::Medium
        } else {
            StockBand::High
        }
    }

    pub fn contains(self, stock: i64) -> bool {
        Self::of(stock) == self
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StockBand::Low => "low",
            StockBand::Medium => "medium",
            StockBand::High => "high",
        }
    }
}

impl FromStr for StockBand {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(StockBand::Low),
            "medium" => Ok(StockBand::Medium),
            "high" => Ok(StockBand::High),
            other => Err(DomainError::validation(format!(
                "unknown stock band '{other}': expected low, medium or high"
            ))),
        }
    }
}

/// Filter for product listings. All criteria are optional and conjunctive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    /// Case-insensitive substring match on the product name.
    pub name_contains: Option<String>,
    pub manufacturer_id: Option<ManufacturerId>,
    pub stock_band: Option<StockBand>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(needle) = &self.name_contains {
            if !product
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        if let Some(manufacturer_id) = self.manufacturer_id {
            if product.manufacturer_id != manufacturer_id {
                return false;
            }
        }
        if let Some(band) = self.stock_band {
            if !band.contains(product.stock) {
                return false;
            }
        }
        true
    }
}
