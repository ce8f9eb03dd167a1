use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use depot_core::{DomainError, ManufacturerId, MovementId, ProductId};

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Entry,
    Exit,
}

impl MovementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MovementKind::Entry => "entry",
            MovementKind::Exit => "exit",
        }
    }
}

impl FromStr for MovementKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entry" => Ok(MovementKind::Entry),
            "exit" => Ok(MovementKind::Exit),
            other => Err(DomainError::validation(format!(
                "unknown movement kind '{other}': expected entry or exit"
            ))),
        }
    }
}

/// One immutable ledger record.
///
/// There is no update or delete operation anywhere in the system; the log is
/// append-only and `occurred_at` descending is the canonical read order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub id: MovementId,
    pub product_id: ProductId,
    pub kind: MovementKind,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Filter for movement report listings. All criteria are optional and
/// conjunctive; the manufacturer criterion applies to the product the
/// movement belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovementFilter {
    pub from: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub product_id: Option<ProductId>,
    pub manufacturer_id: Option<ManufacturerId>,
    pub kind: Option<MovementKind>,
}

impl MovementFilter {
    /// Check the criteria that can be answered from the movement alone.
    /// The manufacturer criterion needs the product row and is applied by
    /// the store.
    pub fn matches_movement(&self, movement: &Movement) -> bool {
        if let Some(from) = self.from {
            if movement.occurred_at < from {
                return false;
            }
        }
        if let Some(until) = self.until {
            if movement.occurred_at > until {
                return false;
            }
        }
        if let Some(product_id) = self.product_id {
            if movement.product_id != product_id {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if movement.kind != kind {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn movement_at(ts: DateTime<Utc>) -> Movement {
        Movement {
            id: MovementId::new(),
            product_id: ProductId::new(),
            kind: MovementKind::Exit,
            quantity: 1,
            occurred_at: ts,
            notes: None,
        }
    }

    #[test]
    fn kind_round_trips_through_str() {
        assert_eq!("entry".parse::<MovementKind>().unwrap(), MovementKind::Entry);
        assert_eq!(MovementKind::Exit.as_str(), "exit");
        assert!("inbound".parse::<MovementKind>().is_err());
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap();
        let m = movement_at(ts);

        let filter = MovementFilter {
            from: Some(ts),
            until: Some(ts),
            ..Default::default()
        };
        assert!(filter.matches_movement(&m));

        let later = MovementFilter {
            from: Some(ts + chrono::Duration::seconds(1)),
            ..Default::default()
        };
        assert!(!later.matches_movement(&m));
    }
}
