use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("failed to insert relation {key}: {source}")]
    Insert {
        key: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to delete relation {id}: {source}")]
    Delete {
        id: i64,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("malformed catalog row for table {table}: {reason}")]
    MalformedRow { table: String, reason: String },
}
