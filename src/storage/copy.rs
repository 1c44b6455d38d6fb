use std::sync::Arc;

use crate::convert::Converter;
use crate::error::Result;
use crate::exact::PreparedGeometry;
use crate::io::serialized::{read_geometry, to_bytes};
use crate::io::wkt::write_simple;
use crate::simple::SfGeometry;
use crate::storage::PersistenceStrategy;

/// Model A geometry in its native byte encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SerializedGeometry(Vec<u8>);

impl SerializedGeometry {
    pub fn from_simple(geom: &SfGeometry) -> Result<Self> {
        Ok(Self(to_bytes(geom)?))
    }

    /// Wrap bytes without validating them. Validation happens on decode.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn to_simple(&self, max_depth: usize) -> Result<SfGeometry> {
        read_geometry(&self.0, max_depth)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// Stores geometries as Model A bytes, converting on every crossing.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyStrategy {
    converter: Converter,
}

impl CopyStrategy {
    pub fn new(converter: Converter) -> Self {
        Self { converter }
    }
}

impl PersistenceStrategy for CopyStrategy {
    type Token = SerializedGeometry;

    fn encode(&self, prepared: PreparedGeometry) -> Result<SerializedGeometry> {
        let simple = self
            .converter
            .to_simple(&prepared.geometry, false, prepared.srid)?;
        SerializedGeometry::from_simple(&simple)
    }

    fn decode(&self, token: &SerializedGeometry) -> Result<Arc<PreparedGeometry>> {
        let simple = token.to_simple(self.converter.max_depth())?;
        let geometry = self.converter.to_exact(&simple)?;
        Ok(Arc::new(PreparedGeometry::new(geometry, simple.srid())))
    }

    fn as_text(&self, token: &SerializedGeometry, precision: i32) -> Result<String> {
        let simple = token.to_simple(self.converter.max_depth())?;
        Ok(write_simple(&simple, precision))
    }
}
