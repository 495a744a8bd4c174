use thiserror::Error;

pub type PlannerResult<T> = Result<T, PlannerError>;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Segment store error: {0}")]
    Store(String),

    #[error("Segment store not initialized: {0}")]
    StoreNotInitialized(String),

    #[error("Segment dataset error: {0}")]
    Dataset(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
