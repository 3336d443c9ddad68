//! Store error definitions.

use thiserror::Error;

/// Errors surfaced by a [`Store`](crate::store::Store) operation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The table could not complete the requested operation.
    #[error("{operation} failed on table '{table}': {reason}")]
    OperationFailed {
        operation: &'static str,
        table: String,
        reason: String,
    },
}

impl StoreError {
    pub fn operation_failed(
        operation: &'static str,
        table: &str,
        reason: impl std::fmt::Display,
    ) -> Self {
        StoreError::OperationFailed {
            operation,
            table: table.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Name of the operation that failed, for logs and metrics labels.
    pub fn operation(&self) -> &'static str {
        match self {
            StoreError::OperationFailed { operation, .. } => operation,
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_reason() {
        let err = StoreError::operation_failed("put_item", "VisitorCounter", "disk full");
        assert_eq!(
            err.to_string(),
            "put_item failed on table 'VisitorCounter': disk full"
        );
        assert_eq!(err.operation(), "put_item");
    }
}
