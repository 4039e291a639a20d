use thiserror::Error;

#[derive(Error, Debug)]
pub enum TripdeskError {
    #[error("Unknown record type: {0}")]
    UnknownType(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, TripdeskError>;
