use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Model B type ids.
///
/// Ids 8 through 14 name curved or abstract types with no concrete Model B struct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum GeometryKind {
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
    Curve = 13,
    Surface = 14,
    PolyhedralSurface = 15,
    TriangulatedSurface = 16,
    Triangle = 17,
    Solid = 101,
    MultiSolid = 102,
}

impl GeometryKind {
    pub fn name(&self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::MultiPolygon => "MultiPolygon",
            GeometryKind::GeometryCollection => "GeometryCollection",
            GeometryKind::CircularString => "CircularString",
            GeometryKind::CompoundCurve => "CompoundCurve",
            GeometryKind::CurvePolygon => "CurvePolygon",
            GeometryKind::MultiCurve => "MultiCurve",
            GeometryKind::MultiSurface => "MultiSurface",
            GeometryKind::Curve => "Curve",
            GeometryKind::Surface => "Surface",
            GeometryKind::PolyhedralSurface => "PolyhedralSurface",
            GeometryKind::TriangulatedSurface => "TriangulatedSurface",
            GeometryKind::Triangle => "Triangle",
            GeometryKind::Solid => "Solid",
            GeometryKind::MultiSolid => "MultiSolid",
        }
    }

    /// Every kind, in id order.
    pub fn all() -> impl Iterator<Item = GeometryKind> {
        (0..=u8::MAX).filter_map(|id| GeometryKind::try_from(id).ok())
    }
}
