use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use tracing::{debug, error};

/// Error types for the store layer
#[derive(Error, Debug)]
pub enum StoreError {
    /// A write violated a schema constraint (NOT NULL, UNIQUE, CHECK, ...).
    /// The store state is unchanged.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Any other failure reported by the database driver
    #[error("Database error: {0}")]
    Database(DbErr),
}

impl StoreError {
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, StoreError::ConstraintViolation(_))
    }
}

// SQLite reports NOT NULL and CHECK failures only through the message text,
// so they are matched there after the typed UNIQUE/FK classification.
impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(message))
            | Some(SqlErr::ForeignKeyConstraintViolation(message)) => {
                debug!("Constraint violation: {}", message);
                return StoreError::ConstraintViolation(message);
            }
            _ => {}
        }

        let message = err.to_string();
        if message.contains("constraint failed") {
            debug!("Constraint violation: {}", message);
            StoreError::ConstraintViolation(message)
        } else {
            error!(?err, "Database error");
            StoreError::Database(err)
        }
    }
}

/// Type alias for Result with StoreError
pub type Result<T> = std::result::Result<T, StoreError>;
