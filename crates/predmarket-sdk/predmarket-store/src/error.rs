use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("connection error: {0}")]
    Connection(#[from] diesel::ConnectionError),

    #[error("migration error: {0}")]
    Migration(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("SDK error: {0}")]
    Sdk(String),

    #[error("market not found: {0}")]
    NotFound(String),

    #[error("market {0} is already resolved")]
    AlreadyResolved(String),

    #[error("outcome {index} is not a labelled outcome of a market with {count} outcomes")]
    InvalidOutcome { index: usize, count: usize },
}

impl From<predmarket_sdk::Error> for StoreError {
    fn from(e: predmarket_sdk::Error) -> Self {
        StoreError::Sdk(e.to_string())
    }
}
