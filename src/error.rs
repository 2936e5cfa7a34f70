// Error kinds surfaced by the classifier and the record store

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BmiError {
    /// Empty or whitespace-only name
    #[error("name must not be empty")]
    InvalidName,

    /// Weight or height is not a positive, finite number
    #[error("invalid {field}: {reason}")]
    InvalidMeasurement { field: &'static str, reason: String },

    /// Backing file could not be read or written
    #[error("I/O failure on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backing file is readable but a row does not fit the schema
    #[error("malformed data in {path:?}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

pub type Result<T> = std::result::Result<T, BmiError>;

impl BmiError {
    pub(crate) fn measurement(field: &'static str, reason: impl Into<String>) -> Self {
        BmiError::InvalidMeasurement {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        BmiError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// csv wraps I/O errors too; keep those under `Io` so callers see one kind
    pub(crate) fn from_csv(path: &Path, err: csv::Error) -> Self {
        if err.is_io_error() {
            return BmiError::io(path, std::io::Error::from(err));
        }
        BmiError::Malformed {
            path: path.to_path_buf(),
            source: err,
        }
    }
}
