//! Error types for checkpoint operations.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::checkpoint::ValidationError;
use crate::encoding::CodecError;

/// Errors returned by [`CheckpointStore`](crate::store::CheckpointStore) operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller violated a precondition (empty or malformed name, etc.).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The checkpoint path has an extension no codec understands.
    #[error("illegal markup extension '{ext}' for {}", .path.display())]
    UnsupportedFormat { path: PathBuf, ext: String },

    /// No checkpoint file exists for the environment.
    #[error("environment '{name}' could not be found ({})", .path.display())]
    NotFound { name: String, path: PathBuf },

    /// Reading, encoding, creating directories or writing failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The bytes do not decode as a checkpoint document.
    #[error("could not read checkpoint file {}: {source}", .path.display())]
    MalformedDocument {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    /// The document decodes but does not match the checkpoint schema.
    #[error("checkpoint file {} is invalid: {source}", .path.display())]
    SchemaViolation {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },
}

/// Coarse classification of an [`Error`], for callers that only branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    UnsupportedFormat,
    NotFound,
    Io,
    MalformedDocument,
    SchemaViolation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidArgument => write!(f, "invalid_argument"),
            ErrorKind::UnsupportedFormat => write!(f, "unsupported_format"),
            ErrorKind::NotFound => write!(f, "not_found"),
            ErrorKind::Io => write!(f, "io"),
            ErrorKind::MalformedDocument => write!(f, "malformed_document"),
            ErrorKind::SchemaViolation => write!(f, "schema_violation"),
        }
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Error::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Io { .. } => ErrorKind::Io,
            Error::MalformedDocument { .. } => ErrorKind::MalformedDocument,
            Error::SchemaViolation { .. } => ErrorKind::SchemaViolation,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        let err = Error::UnsupportedFormat {
            path: PathBuf::from("env/prod.xml"),
            ext: ".xml".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
        assert!(err.to_string().contains("'.xml'"));

        let err = Error::io("env/prod.json", io::Error::other("disk full"));
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("disk full"));
    }
}
