use thiserror::Error;

/// Storage-level error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The addressed record does not exist.
    #[error("not found")]
    NotFound,

    /// A conditional write lost a race; the caller may retry with a fresh
    /// read.
    #[error("concurrent update detected: {0}")]
    Concurrency(String),

    /// The database rejected the write (unique/check constraint).
    #[error("constraint violated: {0}")]
    Constraint(String),

    /// Connection, pool or protocol failure.
    #[error("database error: {0}")]
    Database(String),
}
