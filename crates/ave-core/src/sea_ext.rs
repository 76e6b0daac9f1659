use sea_orm::{DbErr, SqlErr};

/// Classify storage errors that callers surface as-is instead of wrapping.
pub trait DbErrExt {
    /// The driver message when the error is a unique or foreign-key
    /// constraint rejection.
    fn constraint_violation(&self) -> Option<String>;
}

impl DbErrExt for DbErr {
    fn constraint_violation(&self) -> Option<String> {
        match self.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(message))
            | Some(SqlErr::ForeignKeyConstraintViolation(message)) => Some(message),
            _ => None,
        }
    }
}
