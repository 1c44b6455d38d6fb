//! Defines [`CallError`], the error returned by every function entry point.

use thiserror::Error;

use crate::error::GeoExactError;

/// A failed call: the function name, the text of every input when the algorithm itself
/// failed, and the underlying error.
#[derive(Error, Debug)]
#[error("Error during execution of {function}: {source}")]
pub struct CallError {
    pub function: String,
    pub inputs: Vec<String>,
    #[source]
    pub source: GeoExactError,
}

impl CallError {
    /// A failure outside the algorithm, reported without input diagnostics.
    pub fn new(function: impl Into<String>, source: GeoExactError) -> Self {
        Self {
            function: function.into(),
            inputs: vec![],
            source,
        }
    }
}

/// Result type of function entry points.
pub type CallResult<T> = std::result::Result<T, CallError>;
