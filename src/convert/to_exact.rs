//! Model A → Model B.

use log::trace;

use crate::convert::type_map::exact_kind_of;
use crate::convert::Converter;
use crate::error::{GeoExactError, Result};
use crate::exact::{
    CollectionKind, Coord, Geometry, GeometryCollection, GeometryKind, LineString, Point,
    Polygon, PolyhedralSurface, Solid, Triangle, TriangulatedSurface,
};
use crate::simple::{
    Point4D, PointArray, SfCollection, SfGeometry, SfLineString, SfPoint, SfPolygon, SfTriangle,
};

fn to_exact_coord(point: Point4D, has_z: bool) -> Result<Coord> {
    Coord::try_from_f64(point.x, point.y, has_z.then_some(point.z))
}

fn to_exact_coords(points: &PointArray) -> Result<Vec<Coord>> {
    let has_z = points.dim().has_z();
    points.iter().map(|p| to_exact_coord(p, has_z)).collect()
}

pub(crate) fn to_exact_point(geom: &SfPoint) -> Result<Point> {
    let Some(points) = &geom.points else {
        return Ok(Point::empty());
    };
    match points.get(0) {
        Some(p) => Ok(Point::new(to_exact_coord(p, points.dim().has_z())?)),
        None => Ok(Point::empty()),
    }
}

pub(crate) fn to_exact_line_string(geom: &SfLineString) -> Result<LineString> {
    match &geom.points {
        Some(points) => Ok(LineString::new(to_exact_coords(points)?)),
        None => Ok(LineString::empty()),
    }
}

/// Keeps the first three vertices; the fourth, ring-closing one is dropped.
pub(crate) fn to_exact_triangle(geom: &SfTriangle) -> Result<Triangle> {
    let Some(points) = geom.points.as_ref().filter(|p| !p.is_empty()) else {
        return Ok(Triangle::empty());
    };
    if points.len() < 3 {
        return Err(GeoExactError::ContractViolation(format!(
            "Triangle needs at least 3 points, got {}",
            points.len()
        )));
    }
    let mut coords = to_exact_coords(points)?.into_iter();
    match (coords.next(), coords.next(), coords.next()) {
        (Some(a), Some(b), Some(c)) => Ok(Triangle::new(a, b, c)),
        _ => Err(GeoExactError::ContractViolation(
            "Triangle needs at least 3 points".to_string(),
        )),
    }
}

pub(crate) fn to_exact_polygon(geom: &SfPolygon) -> Result<Polygon> {
    let mut rings = geom.rings.iter();
    let Some(exterior) = rings.next() else {
        return Ok(Polygon::empty());
    };
    let mut polygon = Polygon::from_exterior_ring(LineString::new(to_exact_coords(exterior)?));
    for ring in rings {
        polygon.add_interior_ring(LineString::new(to_exact_coords(ring)?))?;
    }
    Ok(polygon)
}

fn polygon_face(geom: &SfGeometry) -> Result<Polygon> {
    match geom {
        SfGeometry::Polygon(p) => to_exact_polygon(p),
        other => Err(GeoExactError::ContractViolation(format!(
            "PolyhedralSurface face must be a Polygon, got {}",
            other.type_id().name()
        ))),
    }
}

fn triangle_face(geom: &SfGeometry) -> Result<Triangle> {
    match geom {
        SfGeometry::Triangle(t) => to_exact_triangle(t),
        other => Err(GeoExactError::ContractViolation(format!(
            "Tin face must be a Triangle, got {}",
            other.type_id().name()
        ))),
    }
}

impl Converter {
    /// Convert a Model A geometry into a Model B geometry.
    ///
    /// The SRID is not part of Model B and is ignored here. Curved types fail with
    /// [`GeoExactError::UnsupportedGeometryType`].
    pub fn to_exact(&self, geom: &SfGeometry) -> Result<Geometry> {
        self.to_exact_at(geom, 0)
    }

    fn to_exact_at(&self, geom: &SfGeometry, depth: usize) -> Result<Geometry> {
        if depth > self.max_depth {
            return Err(GeoExactError::NestingTooDeep(self.max_depth));
        }
        trace!("to_exact {} at depth {depth}", geom.type_id().name());

        let geometry: Geometry = match geom {
            SfGeometry::Point(g) => to_exact_point(g)?.into(),
            SfGeometry::LineString(g) => to_exact_line_string(g)?.into(),
            SfGeometry::Polygon(g) => to_exact_polygon(g)?.into(),
            SfGeometry::Triangle(g) => to_exact_triangle(g)?.into(),
            SfGeometry::CircularString(_) => return Err(unsupported(geom)),
            SfGeometry::Collection(g) => self.to_exact_collection(g, depth)?,
        };
        Ok(geometry)
    }

    fn to_exact_collection(&self, geom: &SfCollection, depth: usize) -> Result<Geometry> {
        let kind = exact_kind_of(geom.type_id, geom.solid)
            .ok_or_else(|| GeoExactError::UnsupportedGeometryType(geom.type_id.name().into()))?;

        let collection_kind = match kind {
            GeometryKind::PolyhedralSurface => {
                let faces = geom.geoms.iter().map(polygon_face).collect::<Result<_>>()?;
                return Ok(PolyhedralSurface::new(faces).into());
            }
            GeometryKind::Solid => {
                let faces: Vec<_> = geom.geoms.iter().map(polygon_face).collect::<Result<_>>()?;
                if faces.is_empty() {
                    return Ok(Solid::empty().into());
                }
                return Ok(Solid::from_exterior_shell(PolyhedralSurface::new(faces)).into());
            }
            GeometryKind::TriangulatedSurface => {
                let faces = geom.geoms.iter().map(triangle_face).collect::<Result<_>>()?;
                return Ok(TriangulatedSurface::new(faces).into());
            }
            GeometryKind::MultiPoint => CollectionKind::MultiPoint,
            GeometryKind::MultiLineString => CollectionKind::MultiLineString,
            GeometryKind::MultiPolygon => CollectionKind::MultiPolygon,
            GeometryKind::GeometryCollection => CollectionKind::GeometryCollection,
            other => {
                return Err(GeoExactError::UnsupportedGeometryType(
                    other.name().to_string(),
                ))
            }
        };

        let mut collection = GeometryCollection::new(collection_kind);
        for member in &geom.geoms {
            collection.add_geometry(self.to_exact_at(member, depth + 1)?)?;
        }
        Ok(collection.into())
    }
}

fn unsupported(geom: &SfGeometry) -> GeoExactError {
    GeoExactError::UnsupportedGeometryType(geom.type_id().name().to_string())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::exact::GeometryTrait;
    use crate::simple::{Dimension, SfType};
    use crate::test::simple::{polygon_with_hole, tin};

    #[test]
    fn polygon_rings_in_order() {
        let g = Converter::default().to_exact(&polygon_with_hole()).unwrap();
        let Geometry::Polygon(p) = g else {
            panic!("expected polygon")
        };
        assert_eq!(p.num_interior_rings(), 1);
        assert_eq!(p.exterior_ring().unwrap().num_points(), 5);
        assert_eq!(p.interior_rings()[0].coords()[1], Coord::from_ints(2, 1, None));
        assert!(!p.is_3d());
    }

    #[test]
    fn triangle_drops_closing_point() {
        let g = Converter::default().to_exact(&tin()).unwrap();
        let Geometry::TriangulatedSurface(t) = g else {
            panic!("expected tin")
        };
        assert_eq!(t.num_triangles(), 2);
        assert_eq!(t.triangles()[0].vertices().unwrap()[2], Coord::from_ints(0, 1, Some(1)));
    }

    #[test]
    fn short_triangle_is_contract_violation() {
        let tri = SfGeometry::Triangle(SfTriangle {
            srid: 0,
            dim: Dimension::XY,
            points: Some(PointArray::from_points(
                Dimension::XY,
                [Point4D::new_2d(0., 0.), Point4D::new_2d(1., 0.)],
            )),
        });
        let err = Converter::default().to_exact(&tri).unwrap_err();
        assert!(matches!(err, GeoExactError::ContractViolation(_)));
    }

    #[test]
    fn non_polygon_face_is_contract_violation() {
        let mut surface = SfCollection::new(SfType::PolyhedralSurface, 0, Dimension::XYZ);
        surface
            .geoms
            .push(SfGeometry::empty(SfType::LineString, 0, Dimension::XYZ));
        let err = Converter::default()
            .to_exact(&SfGeometry::Collection(surface))
            .unwrap_err();
        assert!(matches!(err, GeoExactError::ContractViolation(_)));
    }

    #[test]
    fn curves_are_unsupported() {
        for ty in [
            SfType::CircularString,
            SfType::CompoundCurve,
            SfType::CurvePolygon,
            SfType::MultiCurve,
            SfType::MultiSurface,
        ] {
            let err = Converter::default()
                .to_exact(&SfGeometry::empty(ty, 0, Dimension::XY))
                .unwrap_err();
            match err {
                GeoExactError::UnsupportedGeometryType(name) => assert_eq!(name, ty.name()),
                other => panic!("unexpected {other}"),
            }
        }
    }

    #[test]
    fn nan_rejected() {
        let p = SfGeometry::Point(SfPoint {
            srid: 0,
            dim: Dimension::XY,
            points: Some(PointArray::from_points(
                Dimension::XY,
                [Point4D::new_2d(f64::NAN, 0.)],
            )),
        });
        assert!(matches!(
            Converter::default().to_exact(&p),
            Err(GeoExactError::NonFiniteCoordinate(_))
        ));
    }

    #[test]
    fn nesting_limit() {
        let mut g = SfGeometry::empty(SfType::Point, 0, Dimension::XY);
        for _ in 0..5 {
            let mut c = SfCollection::new(SfType::GeometryCollection, 0, Dimension::XY);
            c.geoms.push(g);
            g = SfGeometry::Collection(c);
        }
        assert!(Converter::new(5).to_exact(&g).is_ok());
        assert!(matches!(
            Converter::new(4).to_exact(&g),
            Err(GeoExactError::NestingTooDeep(4))
        ));
    }
}
