pub mod board;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod optimizer;
pub mod oracle;
pub mod worker;

pub use error::{BbResult, BrawlboardError};
