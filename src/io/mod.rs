//! Readers and writers for the persisted and textual forms of both models.

pub mod binary;
pub mod serialized;
pub mod wkt;
