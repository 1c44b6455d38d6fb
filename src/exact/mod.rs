//! Model B: computational geometry with exact rational coordinates.
//!
//! Model B stores no spatial reference; [`PreparedGeometry`] pairs a geometry with the
//! SRID it travels with.

mod coord;
mod geometry;
mod kind;

pub use coord::{scalar_from_f64, scalar_from_int, scalar_to_f64, Coord, Scalar};
pub use geometry::{
    CollectionKind, Geometry, GeometryCollection, GeometryTrait, LineString, Point, Polygon,
    PolyhedralSurface, Solid, Triangle, TriangulatedSurface,
};
pub use kind::GeometryKind;

/// A Model B geometry together with its SRID. This is the unit persisted by every
/// [`PersistenceStrategy`][crate::storage::PersistenceStrategy].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreparedGeometry {
    pub geometry: Geometry,
    pub srid: i32,
}

impl PreparedGeometry {
    pub fn new(geometry: impl Into<Geometry>, srid: i32) -> Self {
        Self {
            geometry: geometry.into(),
            srid,
        }
    }
}
