//! Model A: simple-features geometries backed by flat `f64` point arrays.
//!
//! Every geometry carries an SRID. Members of collections carry
//! [`SRID_UNKNOWN`]. Solids are polyhedral surfaces with the `solid` flag set.

mod dimension;
mod point_array;

pub use dimension::Dimension;
pub use point_array::{Point4D, PointArray};

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The SRID of a geometry with no spatial reference.
pub const SRID_UNKNOWN: i32 = 0;

/// Model A type ids, as stored in the native byte encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum SfType {
    Point = 1,
    LineString = 2,
    Polygon = 3,
    MultiPoint = 4,
    MultiLineString = 5,
    MultiPolygon = 6,
    GeometryCollection = 7,
    CircularString = 8,
    CompoundCurve = 9,
    CurvePolygon = 10,
    MultiCurve = 11,
    MultiSurface = 12,
    PolyhedralSurface = 13,
    Triangle = 14,
    Tin = 15,
}

impl SfType {
    pub fn name(&self) -> &'static str {
        match self {
            SfType::Point => "Point",
            SfType::LineString => "LineString",
            SfType::Polygon => "Polygon",
            SfType::MultiPoint => "MultiPoint",
            SfType::MultiLineString => "MultiLineString",
            SfType::MultiPolygon => "MultiPolygon",
            SfType::GeometryCollection => "GeometryCollection",
            SfType::CircularString => "CircularString",
            SfType::CompoundCurve => "CompoundCurve",
            SfType::CurvePolygon => "CurvePolygon",
            SfType::MultiCurve => "MultiCurve",
            SfType::MultiSurface => "MultiSurface",
            SfType::PolyhedralSurface => "PolyhedralSurface",
            SfType::Triangle => "Triangle",
            SfType::Tin => "Tin",
        }
    }

    /// Whether geometries of this type are [`SfCollection`]s.
    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            SfType::MultiPoint
                | SfType::MultiLineString
                | SfType::MultiPolygon
                | SfType::GeometryCollection
                | SfType::CompoundCurve
                | SfType::CurvePolygon
                | SfType::MultiCurve
                | SfType::MultiSurface
                | SfType::PolyhedralSurface
                | SfType::Tin
        )
    }
}

/// A point. Empty when `points` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct SfPoint {
    pub srid: i32,
    pub dim: Dimension,
    pub points: Option<PointArray>,
}

/// A linestring or circular string. Empty when `points` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct SfLineString {
    pub srid: i32,
    pub dim: Dimension,
    pub points: Option<PointArray>,
}

/// A triangle stored as a closed ring of four points. Empty when `points` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct SfTriangle {
    pub srid: i32,
    pub dim: Dimension,
    pub points: Option<PointArray>,
}

/// A polygon. `rings[0]` is the exterior ring, the rest are holes.
#[derive(Debug, Clone, PartialEq)]
pub struct SfPolygon {
    pub srid: i32,
    pub dim: Dimension,
    pub rings: Vec<PointArray>,
}

/// Any multi-part geometry, including polyhedral surfaces and TINs.
#[derive(Debug, Clone, PartialEq)]
pub struct SfCollection {
    pub srid: i32,
    pub type_id: SfType,
    pub dim: Dimension,
    /// Only meaningful for [`SfType::PolyhedralSurface`].
    pub solid: bool,
    pub geoms: Vec<SfGeometry>,
}

impl SfCollection {
    pub fn new(type_id: SfType, srid: i32, dim: Dimension) -> Self {
        Self {
            srid,
            type_id,
            dim,
            solid: false,
            geoms: vec![],
        }
    }
}

/// A Model A geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum SfGeometry {
    Point(SfPoint),
    LineString(SfLineString),
    CircularString(SfLineString),
    Polygon(SfPolygon),
    Triangle(SfTriangle),
    Collection(SfCollection),
}

impl SfGeometry {
    pub fn type_id(&self) -> SfType {
        match self {
            SfGeometry::Point(_) => SfType::Point,
            SfGeometry::LineString(_) => SfType::LineString,
            SfGeometry::CircularString(_) => SfType::CircularString,
            SfGeometry::Polygon(_) => SfType::Polygon,
            SfGeometry::Triangle(_) => SfType::Triangle,
            SfGeometry::Collection(c) => c.type_id,
        }
    }

    pub fn srid(&self) -> i32 {
        match self {
            SfGeometry::Point(g) => g.srid,
            SfGeometry::LineString(g) | SfGeometry::CircularString(g) => g.srid,
            SfGeometry::Polygon(g) => g.srid,
            SfGeometry::Triangle(g) => g.srid,
            SfGeometry::Collection(g) => g.srid,
        }
    }

    pub fn set_srid(&mut self, srid: i32) {
        match self {
            SfGeometry::Point(g) => g.srid = srid,
            SfGeometry::LineString(g) | SfGeometry::CircularString(g) => g.srid = srid,
            SfGeometry::Polygon(g) => g.srid = srid,
            SfGeometry::Triangle(g) => g.srid = srid,
            SfGeometry::Collection(g) => g.srid = srid,
        }
    }

    pub fn dim(&self) -> Dimension {
        match self {
            SfGeometry::Point(g) => g.dim,
            SfGeometry::LineString(g) | SfGeometry::CircularString(g) => g.dim,
            SfGeometry::Polygon(g) => g.dim,
            SfGeometry::Triangle(g) => g.dim,
            SfGeometry::Collection(g) => g.dim,
        }
    }

    pub fn has_z(&self) -> bool {
        self.dim().has_z()
    }

    /// Whether this is a polyhedral surface flagged as a solid.
    pub fn is_solid(&self) -> bool {
        matches!(self, SfGeometry::Collection(c) if c.solid)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            SfGeometry::Point(g) => g.points.as_ref().map_or(true, |p| p.is_empty()),
            SfGeometry::LineString(g) | SfGeometry::CircularString(g) => {
                g.points.as_ref().map_or(true, |p| p.is_empty())
            }
            SfGeometry::Triangle(g) => g.points.as_ref().map_or(true, |p| p.is_empty()),
            SfGeometry::Polygon(g) => g.rings.is_empty(),
            SfGeometry::Collection(g) => g.geoms.is_empty(),
        }
    }

    /// An empty geometry of the given type.
    pub fn empty(type_id: SfType, srid: i32, dim: Dimension) -> Self {
        match type_id {
            SfType::Point => SfGeometry::Point(SfPoint {
                srid,
                dim,
                points: None,
            }),
            SfType::LineString => SfGeometry::LineString(SfLineString {
                srid,
                dim,
                points: None,
            }),
            SfType::CircularString => SfGeometry::CircularString(SfLineString {
                srid,
                dim,
                points: None,
            }),
            SfType::Triangle => SfGeometry::Triangle(SfTriangle {
                srid,
                dim,
                points: None,
            }),
            SfType::Polygon => SfGeometry::Polygon(SfPolygon {
                srid,
                dim,
                rings: vec![],
            }),
            collection => SfGeometry::Collection(SfCollection::new(collection, srid, dim)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_keeps_type() {
        for id in 1..=15u8 {
            let ty = SfType::try_from(id).unwrap();
            let g = SfGeometry::empty(ty, 4326, Dimension::XYZ);
            assert_eq!(g.type_id(), ty);
            assert!(g.is_empty());
            assert!(g.has_z());
            assert_eq!(g.srid(), 4326);
            assert_eq!(matches!(g, SfGeometry::Collection(_)), ty.is_collection());
        }
    }

    #[test]
    fn unknown_type_id() {
        assert!(SfType::try_from(0u8).is_err());
        assert!(SfType::try_from(16u8).is_err());
    }
}
