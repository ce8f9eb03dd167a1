//! Full-database backup snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use depot_catalog::{Manufacturer, Product};
use depot_ledger::Movement;

/// Format tag stamped into every snapshot.
pub const BACKUP_VERSION: &str = "1.0";

/// Snapshot of all three relations, serialized as JSON for download.
///
/// Consumed externally; nothing in the service reads it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupSnapshot {
    pub version: String,
    pub date: DateTime<Utc>,
    pub manufacturers: Vec<Manufacturer>,
    pub products: Vec<Product>,
    pub movements: Vec<Movement>,
}
