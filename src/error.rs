use thiserror::Error;

use crate::oracle::SimError;

#[derive(Error, Debug)]
pub enum BrawlboardError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid Permutation: {0}")]
    InvalidPermutation(String),

    #[error("Snapshot Validation Error: {0}")]
    Snapshot(String),

    #[error(transparent)]
    Sim(#[from] SimError),
}

pub type BbResult<T> = Result<T, BrawlboardError>;
