use std::io;
use thiserror::Error;

/// Errors produced while constructing or serializing tag headers.
#[derive(Error, Debug)]
pub enum HeaderError {
    #[error("invalid header name for {expected} line: {found:?}")]
    InvalidName { expected: &'static str, found: String },

    #[error("invalid header value: {reason}")]
    InvalidValue { reason: String },

    #[error("expected headers of type {expected}, found {found:?}")]
    TypeMismatch { expected: &'static str, found: String },

    // tokio_util::codec::Encoder requires its error to convert from io::Error
    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl HeaderError {
    pub fn invalid_name<S: ToString>(expected: &'static str, found: S) -> Self {
        Self::InvalidName { expected, found: found.to_string() }
    }

    pub fn invalid_value<S: ToString>(str: S) -> Self {
        Self::InvalidValue { reason: str.to_string() }
    }

    pub fn type_mismatch<S: ToString>(expected: &'static str, found: S) -> Self {
        Self::TypeMismatch { expected, found: found.to_string() }
    }
}
