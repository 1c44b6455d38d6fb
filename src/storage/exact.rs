use std::sync::Arc;

use crate::error::Result;
use crate::exact::PreparedGeometry;
use crate::io::binary::{read_prepared, to_exact_bytes};
use crate::io::wkt::write_exact;
use crate::storage::PersistenceStrategy;

/// A prepared geometry in the exact binary layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExactBlob(Vec<u8>);

impl ExactBlob {
    /// Wrap bytes without validating them. Validation happens on decode.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// Stores geometries losslessly, SRID included.
#[derive(Debug, Clone, Copy)]
pub struct ExactStrategy {
    max_depth: usize,
}

impl ExactStrategy {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl Default for ExactStrategy {
    fn default() -> Self {
        Self::new(64)
    }
}

impl PersistenceStrategy for ExactStrategy {
    type Token = ExactBlob;

    fn encode(&self, prepared: PreparedGeometry) -> Result<ExactBlob> {
        Ok(ExactBlob(to_exact_bytes(&prepared)?))
    }

    fn decode(&self, token: &ExactBlob) -> Result<Arc<PreparedGeometry>> {
        Ok(Arc::new(read_prepared(&token.0, self.max_depth)?))
    }

    fn as_text(&self, token: &ExactBlob, precision: i32) -> Result<String> {
        let prepared = read_prepared(&token.0, self.max_depth)?;
        Ok(write_exact(&prepared.geometry, prepared.srid, precision))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::convert::to_exact;
    use crate::exact::{scalar_from_int, Coord, Geometry, Point};
    use num_rational::BigRational;
    use crate::test::exact::two_shell_solid;
    use crate::test::simple::tin;

    #[test]
    fn solid_keeps_both_shells() {
        let strategy = ExactStrategy::default();
        let prepared = PreparedGeometry::new(two_shell_solid(), 2154);
        let back = strategy.decode(&strategy.encode(prepared.clone()).unwrap()).unwrap();
        assert_eq!(*back, prepared);
    }

    #[test]
    fn triangle_z_is_exact() {
        let Ok(Geometry::TriangulatedSurface(surface)) = to_exact(&tin()) else {
            panic!("tin fixture should convert");
        };
        let triangle = surface.triangles()[0].clone();
        let strategy = ExactStrategy::default();
        let back = strategy
            .decode(&strategy.encode(PreparedGeometry::new(triangle, 0)).unwrap())
            .unwrap();
        let Geometry::Triangle(t) = &back.geometry else {
            panic!("expected a triangle");
        };
        let vertices = t.vertices().unwrap();
        assert_eq!(vertices[2].z, Some(scalar_from_int(1)));
    }

    #[test]
    fn text_forms() {
        let strategy = ExactStrategy::default();
        let token = strategy
            .encode(PreparedGeometry::new(
                Point::new(Coord::new_2d(
                    BigRational::new(1.into(), 3.into()),
                    scalar_from_int(3),
                )),
                4326,
            ))
            .unwrap();
        assert_eq!(strategy.as_text(&token, -1).unwrap(), "SRID=4326;POINT(1/3 3)");
        assert_eq!(strategy.as_text(&token, 2).unwrap(), "SRID=4326;POINT(0.33 3)");
    }
}
