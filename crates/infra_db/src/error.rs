//! Database error types
//!
//! This module defines the error types that can occur during database operations,
//! providing meaningful error messages and proper error chaining.

use sqlx::error::ErrorKind;
use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur during database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish a database connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Entity not found in database
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check or not-null constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Database file locked by another writer past the busy timeout
    #[error("Database busy: {0}")]
    Busy(String),

    /// One record of a batch failed; the whole batch was rolled back
    #[error("Batch write failed at record '{id}': {message}")]
    BatchRecordFailed { id: String, message: String },

    /// Transaction error
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Schema creation error
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Stored value could not be converted to its domain type
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Pool exhaustion - no available connections
    #[error("Connection pool exhausted")]
    PoolExhausted,
}

impl DatabaseError {
    /// Creates a not found error for a specific entity type and identifier
    ///
    /// # Example
    ///
    /// ```rust
    /// use infra_db::DatabaseError;
    ///
    /// let error = DatabaseError::not_found("Claim", "5c1b...");
    /// assert!(error.to_string().contains("Claim"));
    /// ```
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound(format!("{} with id '{}' not found", entity, id))
    }

    /// Checks if this error indicates a record was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound(_))
    }

    /// Checks if this error is a constraint violation
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DatabaseError::DuplicateEntry(_)
                | DatabaseError::ForeignKeyViolation(_)
                | DatabaseError::ConstraintViolation(_)
        )
    }

    /// Checks if this error is a connection-related issue
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted | DatabaseError::Busy(_)
        )
    }

    /// Maps this error onto the domain port error type
    pub fn into_port_error(self, entity: &str, id: impl std::fmt::Display) -> PortError {
        if self.is_not_found() {
            return PortError::not_found(entity, id);
        }
        if self.is_connection_error() {
            return PortError::connection(self.to_string());
        }
        if self.is_constraint_violation() {
            return PortError::conflict(self.to_string());
        }
        let message = self.to_string();
        PortError::internal_with_source(message, self)
    }
}

/// Maps SQLx errors onto DatabaseError variants using SQLite result codes
///
/// https://www.sqlite.org/rescode.html
impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::Io(e) => DatabaseError::ConnectionFailed(e.to_string()),
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                DatabaseError::SerializationError(error.to_string())
            }
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                match db_err.kind() {
                    ErrorKind::UniqueViolation => DatabaseError::DuplicateEntry(message),
                    ErrorKind::ForeignKeyViolation => DatabaseError::ForeignKeyViolation(message),
                    ErrorKind::CheckViolation | ErrorKind::NotNullViolation => {
                        DatabaseError::ConstraintViolation(message)
                    }
                    _ if is_busy_code(db_err.code().as_deref()) => DatabaseError::Busy(message),
                    _ => DatabaseError::QueryFailed(message),
                }
            }
            _ => DatabaseError::QueryFailed(error.to_string()),
        }
    }
}

/// SQLITE_BUSY or SQLITE_LOCKED, including their extended codes
/// (`SQLITE_BUSY_SNAPSHOT`, `SQLITE_LOCKED_SHAREDCACHE`, ...)
fn is_busy_code(code: Option<&str>) -> bool {
    const SQLITE_BUSY: i32 = 5;
    const SQLITE_LOCKED: i32 = 6;

    code.and_then(|c| c.parse::<i32>().ok())
        .map(|c| matches!(c & 0xff, SQLITE_BUSY | SQLITE_LOCKED))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_port_not_found() {
        let err = DatabaseError::not_found("Claim", "abc").into_port_error("Claim", "abc");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_busy_maps_to_transient_port_error() {
        let err = DatabaseError::Busy("database is locked".to_string()).into_port_error("Claim", "abc");
        assert!(err.is_transient());
    }

    #[test]
    fn test_busy_codes_include_extended_variants() {
        for code in ["5", "6", "261", "517", "262", "773"] {
            assert!(is_busy_code(Some(code)), "code {code}");
        }
        for code in ["1", "19", "2067", "1555", "SQLITE_BUSY"] {
            assert!(!is_busy_code(Some(code)), "code {code}");
        }
        assert!(!is_busy_code(None));
    }

    #[test]
    fn test_row_not_found_conversion() {
        let err = DatabaseError::from(sqlx::Error::RowNotFound);
        assert!(err.is_not_found());
    }

    #[test]
    fn test_pool_timeout_is_connection_error() {
        let err = DatabaseError::from(sqlx::Error::PoolTimedOut);
        assert!(err.is_connection_error());
    }

    #[test]
    fn test_batch_error_names_record() {
        let err = DatabaseError::BatchRecordFailed {
            id: "claim-7".to_string(),
            message: "disk I/O error".to_string(),
        };
        assert!(err.to_string().contains("claim-7"));
    }
}
