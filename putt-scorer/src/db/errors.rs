use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Query execution error: {0}")]
    QueryError(#[from] sqlx::Error),

    #[error("Transaction error: {0}")]
    TransactionError(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl DatabaseError {
    /// Unique constraint violation, e.g. a gift code that was claimed between check and insert
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::QueryError(e) => e
                .as_database_error()
                .is_some_and(|db_error| db_error.code().as_deref() == Some("23505")),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, DatabaseError>;
