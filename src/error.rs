//! Defines [`GeoExactError`], representing all errors returned by this crate.

use std::fmt::Debug;
use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GeoExactError {
    /// Malformed bytes or text were handed to a reader.
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// The geometry type has no counterpart in the target model.
    #[error("Unsupported geometry type: {0}")]
    UnsupportedGeometryType(String),

    /// An algorithm rejected its input.
    #[error("Algorithm error: {0}")]
    Algorithm(String),

    /// A reference handle whose owning scope was torn down.
    #[error("Unable to access deleted geometry (handle {0})")]
    StaleHandle(u64),

    /// A structural rule of the source geometry was broken, e.g. a non-polygon face in a
    /// polyhedral surface.
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    /// Incorrect argument passed at the call boundary.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// NaN and infinities have no exact representation.
    #[error("Non-finite coordinate: {0}")]
    NonFiniteCoordinate(f64),

    /// Geometry nesting exceeded the configured limit.
    #[error("Geometry nesting deeper than {0} levels")]
    NestingTooDeep(usize),

    /// Whenever a count or length does not fit the persisted integer width.
    #[error("Overflow")]
    Overflow,

    /// The reference pool lock was poisoned by a panicking thread.
    #[error("Reference pool lock poisoned")]
    PoolPoisoned,

    /// [std::io::Error]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// [serde_json::Error]
    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
}

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, GeoExactError>;
