use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum IdentifierError {
    #[error("empty identifier")]
    Empty,

    #[error("invalid identifier: {0:?}")]
    Invalid(String),
}
