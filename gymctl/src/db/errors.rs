use thiserror::Error;

/// Unified error type for store operations that application code can handle
#[derive(Error, Debug)]
pub enum DbError {
    /// Entity not found by the given identifier
    #[error("Entity not found")]
    NotFound,

    /// Unique constraint violation
    #[error("Unique constraint violation")]
    UniqueViolation {
        table: &'static str,
        /// The conflicting value that caused the violation
        conflicting_value: String,
    },

    /// A row references another row that does not exist
    #[error("Foreign key constraint violation")]
    ForeignKeyViolation { table: &'static str, message: String },

    /// Catch-all for non-recoverable errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Type alias for store operation results
pub type Result<T> = std::result::Result<T, DbError>;
