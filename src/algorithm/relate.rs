//! Planar relationships between two geometries, computed on their XY projection.

use geo::{BooleanOps, EuclideanDistance, Intersects};

use crate::algorithm::geo_interop::{
    line_from_geo, multi_polygon_from_geo, point_from_geo, polygonal, primitives, Primitive,
};
use crate::error::Result;
use crate::exact::{CollectionKind, Geometry, GeometryCollection, GeometryTrait};

fn primitive_intersects(a: &Primitive, b: &Primitive) -> bool {
    use Primitive::*;
    match (a, b) {
        (Point(a), Point(b)) => a.intersects(b),
        (Point(a), Line(b)) => a.intersects(b),
        (Point(a), Area(b)) => a.intersects(b),
        (Line(a), Point(b)) => a.intersects(b),
        (Line(a), Line(b)) => a.intersects(b),
        (Line(a), Area(b)) => a.intersects(b),
        (Area(a), Point(b)) => a.intersects(b),
        (Area(a), Line(b)) => a.intersects(b),
        (Area(a), Area(b)) => a.intersects(b),
    }
}

fn primitive_distance(a: &Primitive, b: &Primitive) -> f64 {
    use Primitive::*;
    match (a, b) {
        (Point(a), Point(b)) => a.euclidean_distance(b),
        (Point(a), Line(b)) => a.euclidean_distance(b),
        (Point(a), Area(b)) => a.euclidean_distance(b),
        (Line(a), Point(b)) => a.euclidean_distance(b),
        (Line(a), Line(b)) => a.euclidean_distance(b),
        (Line(a), Area(b)) => a.euclidean_distance(b),
        (Area(a), Point(b)) => a.euclidean_distance(b),
        (Area(a), Line(b)) => a.euclidean_distance(b),
        (Area(a), Area(b)) => a.euclidean_distance(b),
    }
}

fn decompose(geom: &Geometry) -> Vec<Primitive> {
    let mut parts = vec![];
    primitives(geom, &mut parts);
    parts
}

/// Whether the two geometries share at least one point. Empty geometries intersect
/// nothing.
pub fn intersects(a: &Geometry, b: &Geometry) -> bool {
    let (a, b) = (decompose(a), decompose(b));
    a.iter()
        .any(|pa| b.iter().any(|pb| primitive_intersects(pa, pb)))
}

/// Minimum planar distance between the two geometries, or infinity when either is empty.
pub fn distance(a: &Geometry, b: &Geometry) -> f64 {
    let (a, b) = (decompose(a), decompose(b));
    a.iter()
        .flat_map(|pa| b.iter().map(move |pb| primitive_distance(pa, pb)))
        .fold(f64::INFINITY, f64::min)
}

/// Adds to `out` the points of `parts` touching `others` and the pieces of `parts`'
/// lines inside the polygons of `others`.
fn gather(parts: &[Primitive], others: &[Primitive], out: &mut GeometryCollection) -> Result<()> {
    let areas = geo::MultiPolygon::new(
        others
            .iter()
            .filter_map(|p| match p {
                Primitive::Area(polygon) => Some(polygon.clone()),
                _ => None,
            })
            .collect(),
    );
    for part in parts {
        match part {
            Primitive::Point(p) => {
                if others.iter().any(|o| primitive_intersects(part, o)) {
                    out.add_geometry(point_from_geo(*p)?.into())?;
                }
            }
            Primitive::Line(line) => {
                let clipped = areas.clip(&geo::MultiLineString::new(vec![line.clone()]), false);
                for piece in clipped.iter() {
                    out.add_geometry(line_from_geo(piece)?.into())?;
                }
            }
            Primitive::Area(_) => {}
        }
    }
    Ok(())
}

/// Planar intersection.
///
/// Two polygonal inputs give a polygon or multi polygon. Otherwise the result is a
/// geometry collection of the points of either input lying on the other and the parts
/// of its lines inside the other's polygons. Line/line crossings are not reported.
pub fn intersection(a: &Geometry, b: &Geometry) -> Result<Geometry> {
    if let (Some(pa), Some(pb)) = (polygonal(a), polygonal(b)) {
        if !a.is_empty() && !b.is_empty() {
            return multi_polygon_from_geo(&pa.intersection(&pb));
        }
    }

    let mut out = GeometryCollection::new(CollectionKind::GeometryCollection);
    let (parts_a, parts_b) = (decompose(a), decompose(b));
    gather(&parts_a, &parts_b, &mut out)?;
    gather(&parts_b, &parts_a, &mut out)?;
    Ok(out.into())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::algorithm::Area;
    use crate::exact::{LineString, Point, Polygon};
    use crate::test::exact::{c2, square};
    use approx::assert_relative_eq;

    fn shifted_square(size: i64, dx: i64) -> Polygon {
        Polygon::from_exterior_ring(LineString::new(vec![
            c2(dx, 0),
            c2(dx + size, 0),
            c2(dx + size, size),
            c2(dx, size),
            c2(dx, 0),
        ]))
    }

    #[test]
    fn predicates() {
        let a: Geometry = square(2).into();
        assert!(intersects(&a, &Point::new(c2(1, 1)).into()));
        assert!(!intersects(&a, &Point::new(c2(5, 5)).into()));
        assert!(!intersects(&a, &Point::empty().into()));
        assert!(intersects(&a, &shifted_square(2, 2).into()));
    }

    #[test]
    fn distances() {
        let a: Geometry = square(2).into();
        assert_relative_eq!(distance(&a, &shifted_square(1, 5).into()), 3.);
        assert_eq!(distance(&a, &Point::new(c2(1, 1)).into()), 0.);
        assert_eq!(distance(&a, &Point::empty().into()), f64::INFINITY);
    }

    #[test]
    fn polygon_intersection() {
        let result = intersection(&square(2).into(), &shifted_square(2, 1).into()).unwrap();
        assert!(matches!(result, Geometry::Polygon(_)));
        assert_relative_eq!(result.area().unwrap(), 2.);
    }

    #[test]
    fn mixed_intersection() {
        let line = LineString::new(vec![c2(-1, 1), c2(3, 1)]);
        let result = intersection(&line.into(), &square(2).into()).unwrap();
        let Geometry::Collection(c) = result else {
            panic!("expected a collection");
        };
        assert_eq!(c.len(), 1);
        let Geometry::LineString(piece) = &c.geometries()[0] else {
            panic!("expected a line");
        };
        let mut xs: Vec<f64> = piece.coords().iter().map(|c| c.to_f64().0).collect();
        xs.sort_by(f64::total_cmp);
        assert_eq!(xs.len(), 2);
        assert_relative_eq!(xs[0], 0.);
        assert_relative_eq!(xs[1], 2.);

        let inside = intersection(&Point::new(c2(1, 1)).into(), &square(2).into()).unwrap();
        assert_eq!(inside.num_coords(), 1);
    }
}
