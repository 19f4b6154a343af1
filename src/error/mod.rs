pub mod compile;
pub mod ident;
pub mod sync;

pub use compile::CompileError;
pub use ident::IdentifierError;
pub use sync::SyncError;

#[derive(Debug)]
pub enum Error {
    Identifier(IdentifierError),
    Compile(CompileError),
    Sync(SyncError),
    #[cfg(feature = "postgres")]
    Database(sqlx::Error),
    Decode(String),
}

impl Error {
    /// Returns true for failures the caller should report as a bad request.
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Identifier(_) => true,
            Error::Compile(e) => e.is_client_error(),
            _ => false,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Identifier(e) => write!(f, "identifier error: {}", e),
            Error::Compile(e) => write!(f, "compile error: {}", e),
            Error::Sync(e) => write!(f, "sync error: {}", e),
            #[cfg(feature = "postgres")]
            Error::Database(e) => write!(f, "database error: {}", e),
            Error::Decode(msg) => write!(f, "row decode error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Identifier(e) => Some(e),
            Error::Compile(e) => Some(e),
            Error::Sync(e) => Some(e),
            #[cfg(feature = "postgres")]
            Error::Database(e) => Some(e),
            Error::Decode(_) => None,
        }
    }
}

impl From<IdentifierError> for Error {
    fn from(err: IdentifierError) -> Self {
        Error::Identifier(err)
    }
}

impl From<CompileError> for Error {
    fn from(err: CompileError) -> Self {
        Error::Compile(err)
    }
}

impl From<SyncError> for Error {
    fn from(err: SyncError) -> Self {
        Error::Sync(err)
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::Database(err)
    }
}
