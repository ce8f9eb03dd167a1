use serde::{Deserialize, Serialize};

use depot_core::{DomainError, DomainResult, ManufacturerId};

/// A manufacturer of tracked products.
///
/// Deletion does not cascade: products keep their manufacturer reference and
/// read paths render a placeholder name for a dangling one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manufacturer {
    pub id: ManufacturerId,
    pub name: String,
}

impl Manufacturer {
    /// Validate and construct a manufacturer. Names are trimmed and must be
    /// non-blank.
    pub fn new(id: ManufacturerId, name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        let name = validated_name(&name)?;
        Ok(Self { id, name })
    }
}

/// Validate a manufacturer (or product) display name, returning the trimmed
/// form.
pub fn validated_name(name: &str) -> DomainResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    Ok(trimmed.to_string())
}
