//! Errors raised by the game history store.

use derive_more::{Display, Error};
use diesel::result::Error as QueryError;
use tracing::instrument;

/// Failure reported by the SQLite history store.
///
/// Carries the call site that raised it so a log line points at the failing
/// query rather than at the conversion.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("History store failed: {message} ({file}:{line})")]
pub struct DbError {
    /// What went wrong, in words fit for the status line.
    pub message: String,
    /// Source file of the call site.
    pub file: &'static str,
    /// Line of the call site.
    pub line: u32,
}

impl DbError {
    /// Builds an error stamped with the caller's location.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let caller = std::panic::Location::caller();
        Self {
            message: message.into(),
            file: caller.file(),
            line: caller.line(),
        }
    }
}

impl From<QueryError> for DbError {
    #[track_caller]
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::DatabaseError(kind, info) => {
                Self::new(format!("Rejected by database ({:?}): {}", kind, info.message()))
            }
            other => Self::new(format!("Query failed: {}", other)),
        }
    }
}

impl From<diesel::ConnectionError> for DbError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(format!("Cannot open history database: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::DatabaseErrorKind;

    #[test]
    fn test_new_points_at_call_site() {
        let line = line!() + 1;
        let err = DbError::new("history file is locked");
        assert_eq!(err.file, file!());
        assert_eq!(err.line, line);
        assert_eq!(
            err.to_string(),
            format!("History store failed: history file is locked ({}:{})", file!(), line)
        );
    }

    #[test]
    fn test_missing_row_is_a_query_failure() {
        let err: DbError = QueryError::NotFound.into();
        assert!(err.message.starts_with("Query failed: "));
        assert_eq!(err.file, file!());
    }

    #[test]
    fn test_constraint_failure_names_the_rule() {
        let err: DbError = QueryError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("UNIQUE constraint failed: games.id".to_string()),
        )
        .into();
        assert_eq!(
            err.message,
            "Rejected by database (UniqueViolation): UNIQUE constraint failed: games.id"
        );
    }
}
