use formline_core::error::CoreError;

/// Application-level error type.
///
/// Wraps [`CoreError`] for domain errors and carries database failures.
/// Constraint violations that have a domain meaning (duplicate username,
/// dangling foreign key) are classified into `CoreError` variants so
/// callers can show a specific message; everything else stays a raw
/// database error.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `formline-core`. Internal failures with
    /// no domain meaning (a hashing error, say) use
    /// [`CoreError::Internal`].
    #[error(transparent)]
    Core(CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

/// Convenience type alias for service return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        AppError::Core(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            // PostgreSQL unique violation: 23505. Our unique constraints
            // are all named with a `uq_` prefix.
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return AppError::Core(CoreError::Conflict(format!(
                        "Duplicate value violates unique constraint: {constraint}"
                    )));
                }
            }
            // Foreign-key violation: 23503 (e.g. a decision against a
            // form that was never persisted).
            if db_err.code().as_deref() == Some("23503") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                return AppError::Core(CoreError::Validation(format!(
                    "Referenced row does not exist: {constraint}"
                )));
            }
        }
        AppError::Database(err)
    }
}
