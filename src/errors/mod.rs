//! Error types for the dense layer benchmark library.
//!
//! Every fallible operation in the library returns [`DenseLayerError`]. The
//! external adapters wrap the errors of the library they call so the caller
//! never has to depend on `ndarray` or `candle` error types directly.

mod dense_layer_error;

pub use dense_layer_error::DenseLayerError;

/// Result type alias for operations that may fail with dense layer errors.
pub type DenseLayerResult<T> = std::result::Result<T, DenseLayerError>;
