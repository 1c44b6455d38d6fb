//! Minkowski sums and the buffers built on them.

use std::f64::consts::FRAC_PI_2;

use geo::{BooleanOps, ConvexHull};
use itertools::Itertools;

use crate::algorithm::geo_interop::{multi_polygon_from_geo, primitives, Primitive};
use crate::algorithm::triangulate::triangulate_2d;
use crate::error::{GeoExactError, Result};
use crate::exact::{
    CollectionKind, Coord, Geometry, GeometryCollection, GeometryTrait, LineString, Polygon,
};

type Piece = Vec<geo::Coord<f64>>;

/// Largest segment count per quarter circle accepted by [`buffer`] and [`offset_polygon`].
pub const MAX_SEGMENTS: u32 = 1024;

/// Convex pieces covering `geom`, as vertex lists.
fn convex_pieces(geom: &Geometry) -> Result<Vec<Piece>> {
    let tin = triangulate_2d(geom).map_err(|_| {
        GeoExactError::Algorithm(format!(
            "minkowski_sum expects a polygonal second argument, got {}",
            geom.geometry_kind().name()
        ))
    })?;
    Ok(tin
        .triangles()
        .iter()
        .filter_map(|t| t.vertices())
        .map(|vertices| vertices.iter().map(Coord::to_geo).collect())
        .collect())
}

/// Convex hull of `piece` swept along the points of `path`.
fn swept(piece: &Piece, path: &[geo::Coord<f64>]) -> geo::Polygon<f64> {
    let points: geo::MultiPoint<f64> = path
        .iter()
        .cartesian_product(piece)
        .map(|(p, v)| geo::Point::from(*p + *v))
        .collect();
    points.convex_hull()
}

fn sum_pieces(a: &[Primitive], pieces: &[Piece]) -> geo::MultiPolygon<f64> {
    let mut parts: Vec<geo::Polygon<f64>> = vec![];
    for part in a {
        match part {
            Primitive::Point(p) => parts.extend(pieces.iter().map(|piece| swept(piece, &[p.0]))),
            Primitive::Line(line) => {
                for segment in line.lines() {
                    parts.extend(pieces.iter().map(|piece| swept(piece, &[segment.start, segment.end])));
                }
            }
            Primitive::Area(polygon) => {
                // the area translated by one vertex of the kernel, plus its swept boundary
                if let Some(offset) = pieces.first().and_then(|p| p.first()) {
                    let mut moved = polygon.clone();
                    geo::MapCoordsInPlace::map_coords_in_place(&mut moved, |c| c + *offset);
                    parts.push(moved);
                }
                for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
                    for segment in ring.lines() {
                        parts.extend(
                            pieces
                                .iter()
                                .map(|piece| swept(piece, &[segment.start, segment.end])),
                        );
                    }
                }
            }
        }
    }
    parts
        .into_iter()
        .fold(geo::MultiPolygon::new(vec![]), |acc, polygon| {
            acc.union(&geo::MultiPolygon::new(vec![polygon]))
        })
}

/// Planar Minkowski sum of any geometry with a polygonal kernel.
///
/// The kernel is triangulated and each convex piece is swept along the first geometry.
/// The result is a polygon when it is connected, otherwise a multi polygon.
pub fn minkowski_sum(a: &Geometry, kernel: &Geometry) -> Result<Geometry> {
    let pieces = convex_pieces(kernel)?;
    let mut parts = vec![];
    primitives(a, &mut parts);
    if parts.is_empty() || pieces.is_empty() {
        return Ok(GeometryCollection::new(CollectionKind::MultiPolygon).into());
    }
    multi_polygon_from_geo(&sum_pieces(&parts, &pieces))
}

/// Regular polygon inscribed in a circle, with `segments` edges per quarter turn.
fn circle(radius: f64, segments: u32) -> Result<Polygon> {
    let n = 4 * segments as usize;
    let ring = (0..=n)
        .map(|i| {
            let angle = (i % n) as f64 * FRAC_PI_2 / segments as f64;
            Coord::try_from_f64(radius * angle.cos(), radius * angle.sin(), None)
        })
        .collect::<Result<_>>()?;
    Ok(Polygon::from_exterior_ring(LineString::new(ring)))
}

fn check_radius(operation: &str, radius: f64, segments: i32) -> Result<u32> {
    if !radius.is_finite() || radius < 0. {
        return Err(GeoExactError::Algorithm(format!(
            "{operation} radius must be a non-negative number, got {radius}"
        )));
    }
    match u32::try_from(segments) {
        Ok(s) if (1..=MAX_SEGMENTS).contains(&s) => Ok(s),
        _ => Err(GeoExactError::Algorithm(format!(
            "{operation} needs between 1 and {MAX_SEGMENTS} segments per quarter circle, got {segments}"
        ))),
    }
}

/// Approximate buffer: the Minkowski sum with a `segments`-per-quarter circle. A zero
/// radius returns the input unchanged.
pub fn buffer(geom: &Geometry, radius: f64, segments: i32) -> Result<Geometry> {
    let segments = check_radius("buffer", radius, segments)?;
    if radius == 0. {
        return Ok(geom.clone());
    }
    minkowski_sum(geom, &circle(radius, segments)?.into())
}

/// Outward offset of a polygonal geometry. Always returns a multi polygon.
pub fn offset_polygon(geom: &Geometry, radius: f64, segments: i32) -> Result<Geometry> {
    let segments = check_radius("offset_polygon", radius, segments)?;
    let polygonal = match geom {
        Geometry::Polygon(_) => true,
        Geometry::Collection(c) => c.kind() == CollectionKind::MultiPolygon,
        _ => false,
    };
    if !polygonal {
        return Err(GeoExactError::Algorithm(format!(
            "offset_polygon expects a polygon or multi polygon, got {}",
            geom.geometry_kind().name()
        )));
    }
    let result = if radius == 0. {
        geom.clone()
    } else {
        minkowski_sum(geom, &circle(radius, segments)?.into())?
    };
    Ok(match result {
        Geometry::Polygon(p) => {
            let mut multi = GeometryCollection::new(CollectionKind::MultiPolygon);
            if !p.is_empty() {
                multi.add_geometry(p.into())?;
            }
            multi.into()
        }
        other => other,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::algorithm::Area;
    use crate::exact::Point;
    use crate::test::exact::{c2, square};
    use approx::assert_relative_eq;

    #[test]
    fn square_plus_square() {
        let result = minkowski_sum(&square(2).into(), &square(1).into()).unwrap();
        assert!(matches!(result, Geometry::Polygon(_)));
        assert_relative_eq!(result.area().unwrap(), 9., epsilon = 1e-9);
    }

    #[test]
    fn point_plus_kernel_is_translated_kernel() {
        let result = minkowski_sum(&Point::new(c2(5, 5)).into(), &square(1).into()).unwrap();
        assert_relative_eq!(result.area().unwrap(), 1., epsilon = 1e-9);
        assert!(crate::algorithm::intersects(&result, &Point::new(c2(6, 6)).into()));
    }

    #[test]
    fn point_buffer_is_circle() {
        let result = buffer(&Point::new(c2(0, 0)).into(), 1., 8).unwrap();
        // 32-gon inscribed in the unit circle
        let expected = 16. * (std::f64::consts::PI / 16.).sin();
        assert_relative_eq!(result.area().unwrap(), expected, epsilon = 1e-6);
    }

    #[test]
    fn bad_arguments() {
        let g: Geometry = square(1).into();
        assert!(buffer(&g, -1., 8).is_err());
        assert!(buffer(&g, 1., 0).is_err());
        assert!(minkowski_sum(&g, &Point::new(c2(0, 0)).into()).is_err());
        assert!(offset_polygon(&Point::new(c2(0, 0)).into(), 1., 8).is_err());
    }

    #[test]
    fn segment_count_is_capped() {
        let g: Geometry = Point::new(c2(0, 0)).into();
        assert_eq!(check_radius("buffer", 1., MAX_SEGMENTS as i32).unwrap(), MAX_SEGMENTS);
        let err = buffer(&g, 1., i32::MAX).unwrap_err();
        assert!(matches!(err, GeoExactError::Algorithm(_)));
        assert!(offset_polygon(&square(1).into(), 1., MAX_SEGMENTS as i32 + 1).is_err());
    }

    #[test]
    fn offset_grows_area() {
        let result = offset_polygon(&square(2).into(), 1., 8).unwrap();
        let Geometry::Collection(c) = &result else {
            panic!("expected a multi polygon");
        };
        assert_eq!(c.kind(), CollectionKind::MultiPolygon);
        assert!(result.area().unwrap() > 4. + 8. + 3.);
    }
}
