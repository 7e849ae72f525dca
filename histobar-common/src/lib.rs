pub mod config;
pub use config::{BucketingConfig, Config, DisplayConfig, OutOfRangePolicy, ParallelConfig, Strategy, WidthMode};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistobarError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid bucket count {0}: must be greater than zero")]
    InvalidBucketCount(i64),
    #[error("too many buckets: {count} (at most {limit})")]
    TooManyBuckets { count: i64, limit: i64 },
    #[error("invalid bucket range: max ({max}) must be greater than min ({min})")]
    InvalidRange { min: i64, max: i64 },
    #[error("bucket index {index} out of range for {bucket_count} buckets")]
    OutOfRangeBucket { index: usize, bucket_count: usize },
    #[error("malformed {what}: {token:?}")]
    MalformedInput { what: &'static str, token: String },
    #[error("input ended while reading {what}")]
    UnexpectedEof { what: &'static str },
    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, HistobarError>;
