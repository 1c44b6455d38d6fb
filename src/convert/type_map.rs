//! Total mappings between Model A type ids and Model B kinds.
//!
//! Every id of either model appears in exactly one match arm. `None` means the type has
//! no counterpart and conversion must fail.

use crate::exact::GeometryKind;
use crate::simple::SfType;

/// The Model B kind a Model A type converts to. A polyhedral surface with the `solid`
/// flag becomes a [`GeometryKind::Solid`].
pub fn exact_kind_of(type_id: SfType, solid: bool) -> Option<GeometryKind> {
    match type_id {
        SfType::Point => Some(GeometryKind::Point),
        SfType::LineString => Some(GeometryKind::LineString),
        SfType::Polygon => Some(GeometryKind::Polygon),
        SfType::MultiPoint => Some(GeometryKind::MultiPoint),
        SfType::MultiLineString => Some(GeometryKind::MultiLineString),
        SfType::MultiPolygon => Some(GeometryKind::MultiPolygon),
        SfType::GeometryCollection => Some(GeometryKind::GeometryCollection),
        SfType::PolyhedralSurface if solid => Some(GeometryKind::Solid),
        SfType::PolyhedralSurface => Some(GeometryKind::PolyhedralSurface),
        SfType::Triangle => Some(GeometryKind::Triangle),
        SfType::Tin => Some(GeometryKind::TriangulatedSurface),
        SfType::CircularString
        | SfType::CompoundCurve
        | SfType::CurvePolygon
        | SfType::MultiCurve
        | SfType::MultiSurface => None,
    }
}

/// The Model A type a Model B kind converts to, plus the `solid` flag to set on it.
pub fn simple_type_of(kind: GeometryKind) -> Option<(SfType, bool)> {
    match kind {
        GeometryKind::Point => Some((SfType::Point, false)),
        GeometryKind::LineString => Some((SfType::LineString, false)),
        GeometryKind::Polygon => Some((SfType::Polygon, false)),
        GeometryKind::MultiPoint => Some((SfType::MultiPoint, false)),
        GeometryKind::MultiLineString => Some((SfType::MultiLineString, false)),
        GeometryKind::MultiPolygon => Some((SfType::MultiPolygon, false)),
        GeometryKind::GeometryCollection => Some((SfType::GeometryCollection, false)),
        GeometryKind::PolyhedralSurface => Some((SfType::PolyhedralSurface, false)),
        GeometryKind::TriangulatedSurface => Some((SfType::Tin, false)),
        GeometryKind::Triangle => Some((SfType::Triangle, false)),
        GeometryKind::Solid => Some((SfType::PolyhedralSurface, true)),
        GeometryKind::MultiSolid => Some((SfType::GeometryCollection, false)),
        GeometryKind::CircularString
        | GeometryKind::CompoundCurve
        | GeometryKind::CurvePolygon
        | GeometryKind::MultiCurve
        | GeometryKind::MultiSurface
        | GeometryKind::Curve
        | GeometryKind::Surface => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::exact::Geometry;

    #[test]
    fn concrete_kinds_have_a_simple_type() {
        for kind in GeometryKind::all() {
            assert_eq!(
                simple_type_of(kind).is_some(),
                Geometry::empty(kind).is_some(),
                "{}",
                kind.name()
            );
        }
    }

    #[test]
    fn simple_types_round_trip_through_kinds() {
        for id in 1..=15u8 {
            let ty = SfType::try_from(id).unwrap();
            for solid in [false, true] {
                let Some(kind) = exact_kind_of(ty, solid) else {
                    continue;
                };
                let (back, back_solid) = simple_type_of(kind).unwrap();
                assert_eq!(back, ty);
                assert_eq!(back_solid, solid && ty == SfType::PolyhedralSurface);
            }
        }
    }

    #[test]
    fn curves_are_unsupported() {
        assert!(exact_kind_of(SfType::CircularString, false).is_none());
        assert!(exact_kind_of(SfType::MultiSurface, false).is_none());
        assert!(simple_type_of(GeometryKind::Curve).is_none());
    }
}
