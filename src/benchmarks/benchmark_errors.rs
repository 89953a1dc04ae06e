//! Error types for benchmark operations.

use std::error::Error;
use std::fmt;

use crate::errors::DenseLayerError;

#[derive(Debug)]
pub enum BenchmarkError {
    ConfigParseError {
        path: String,
        source: serde_json::Error,
    },
    ConfigValidationError {
        field: String,
        message: String,
    },
    IoError {
        source: std::io::Error,
    },
    InvalidIterationCount {
        field: String,
        value: u32,
    },
    DenseLayer {
        source: DenseLayerError,
    },
}

impl fmt::Display for BenchmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BenchmarkError::ConfigParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse configuration file '{}': {}",
                    path, source
                )
            }
            BenchmarkError::ConfigValidationError { field, message } => {
                write!(
                    f,
                    "Configuration validation error for field '{}': {}",
                    field, message
                )
            }
            BenchmarkError::IoError { source } => {
                write!(f, "IO error: {}", source)
            }
            BenchmarkError::InvalidIterationCount { field, value } => {
                write!(
                    f,
                    "Invalid value for '{}': {}. Must be greater than 0",
                    field, value
                )
            }
            BenchmarkError::DenseLayer { source } => {
                write!(f, "Dense layer error: {}", source)
            }
        }
    }
}

impl Error for BenchmarkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BenchmarkError::ConfigParseError { source, .. } => Some(source),
            BenchmarkError::IoError { source } => Some(source),
            BenchmarkError::DenseLayer { source } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BenchmarkError {
    fn from(error: std::io::Error) -> Self {
        BenchmarkError::IoError { source: error }
    }
}

impl From<DenseLayerError> for BenchmarkError {
    fn from(error: DenseLayerError) -> Self {
        BenchmarkError::DenseLayer { source: error }
    }
}

pub type BenchmarkResult<T> = Result<T, BenchmarkError>;
