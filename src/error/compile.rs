use super::IdentifierError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Clone)]
pub enum CompileError {
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(#[from] IdentifierError),

    #[error("empty table name")]
    EmptyTableName,

    #[error("table not found: {0}")]
    TableNotFound(String),

    #[error("unknown sort column: {0}")]
    UnknownSortColumn(String),

    #[error("vector search column not found: {0}")]
    InvalidVectorColumn(String),

    #[error("vector search needs a non-empty embedding")]
    EmptyVector,
}

impl CompileError {
    /// Errors caused by the request rather than by the database.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CompileError::InvalidIdentifier(_)
                | CompileError::EmptyTableName
                | CompileError::TableNotFound(_)
                | CompileError::UnknownSortColumn(_)
                | CompileError::InvalidVectorColumn(_)
                | CompileError::EmptyVector
        )
    }
}
