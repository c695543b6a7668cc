use std::{
    num::ParseIntError,
    path::PathBuf,
};
use thiserror::Error;

pub type CombineResult<T> = std::result::Result<T, CombineError>;

#[derive(Debug, Error)]
pub enum CombineError {
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    ParseInt(#[from] ParseIntError),
    #[error("Malformed record: expected at least {expected} tab-delimited fields, found {found}")]
    MalformedRecord { expected: usize, found: usize },
    #[error("Cannot aggregate allele depths with differing allele counts: {values:?}")]
    AlleleCountMismatch { values: Vec<String> },
    #[error("Invalid depth value '{value}': expected a non-negative integer")]
    InvalidDepth { value: String },
    #[error("Unable to infer the variant caller of {} from its meta lines", path.display())]
    UnknownCaller { path: PathBuf },
    #[error("Invalid gzip header: {}", path.display())]
    InvalidGzipHeader { path: PathBuf },
}

impl CombineError {
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

#[macro_export]
macro_rules! combine_error {
    ($($arg:tt)*) => {
        $crate::error::CombineError::message(format!($($arg)*))
    };
}
