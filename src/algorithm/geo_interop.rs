//! Bridges between exact geometries and `geo` floating point geometries.
//!
//! Only the XY plane crosses over; Z is dropped on the way to `geo` and absent on the way
//! back.

use crate::error::Result;
use crate::exact::{
    CollectionKind, Coord, Geometry, GeometryCollection, LineString, Point, Polygon, Triangle,
};

/// The 2D building blocks every exact geometry decomposes into.
#[derive(Debug, Clone)]
pub(crate) enum Primitive {
    Point(geo::Point<f64>),
    Line(geo::LineString<f64>),
    Area(geo::Polygon<f64>),
}

pub(crate) fn line_to_geo(line: &LineString) -> geo::LineString<f64> {
    geo::LineString::new(line.coords().iter().map(Coord::to_geo).collect())
}

pub(crate) fn polygon_to_geo(polygon: &Polygon) -> geo::Polygon<f64> {
    let exterior = polygon
        .exterior_ring()
        .map(line_to_geo)
        .unwrap_or_else(|| geo::LineString::new(vec![]));
    let interiors = polygon.interior_rings().iter().map(line_to_geo).collect();
    geo::Polygon::new(exterior, interiors)
}

fn triangle_to_geo(triangle: &Triangle) -> Option<geo::Polygon<f64>> {
    let [a, b, c] = triangle.vertices()?;
    Some(geo::Polygon::new(
        geo::LineString::new(vec![a.to_geo(), b.to_geo(), c.to_geo(), a.to_geo()]),
        vec![],
    ))
}

fn push_polygon(polygon: &Polygon, out: &mut Vec<Primitive>) {
    if polygon.exterior_ring().is_some() {
        out.push(Primitive::Area(polygon_to_geo(polygon)));
    }
}

/// Flattens `geom` into its non-empty 2D primitives. Surface and solid faces become
/// areas.
pub(crate) fn primitives(geom: &Geometry, out: &mut Vec<Primitive>) {
    match geom {
        Geometry::Point(p) => {
            if let Some(c) = p.coord() {
                out.push(Primitive::Point(c.to_geo().into()));
            }
        }
        Geometry::LineString(l) => {
            if l.num_points() > 0 {
                out.push(Primitive::Line(line_to_geo(l)));
            }
        }
        Geometry::Polygon(p) => push_polygon(p, out),
        Geometry::Triangle(t) => out.extend(triangle_to_geo(t).map(Primitive::Area)),
        Geometry::PolyhedralSurface(s) => s.polygons().iter().for_each(|p| push_polygon(p, out)),
        Geometry::TriangulatedSurface(t) => out.extend(
            t.triangles()
                .iter()
                .filter_map(triangle_to_geo)
                .map(Primitive::Area),
        ),
        Geometry::Solid(s) => s
            .shells()
            .iter()
            .flat_map(|shell| shell.polygons())
            .for_each(|p| push_polygon(p, out)),
        Geometry::Collection(c) => c.geometries().iter().for_each(|g| primitives(g, out)),
    }
}

/// The polygonal part of `geom` as a `geo` multi polygon, or `None` when `geom` holds
/// points or lines.
pub(crate) fn polygonal(geom: &Geometry) -> Option<geo::MultiPolygon<f64>> {
    let mut parts = vec![];
    primitives(geom, &mut parts);
    parts
        .into_iter()
        .map(|p| match p {
            Primitive::Area(polygon) => Some(polygon),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()
        .map(geo::MultiPolygon::new)
}

pub(crate) fn coord_from_geo(c: geo::Coord<f64>) -> Result<Coord> {
    Coord::try_from_f64(c.x, c.y, None)
}

pub(crate) fn line_from_geo(line: &geo::LineString<f64>) -> Result<LineString> {
    Ok(LineString::new(
        line.coords()
            .map(|c| coord_from_geo(*c))
            .collect::<Result<_>>()?,
    ))
}

pub(crate) fn polygon_from_geo(polygon: &geo::Polygon<f64>) -> Result<Polygon> {
    if polygon.exterior().0.is_empty() {
        return Ok(Polygon::empty());
    }
    let mut out = Polygon::from_exterior_ring(line_from_geo(polygon.exterior())?);
    for ring in polygon.interiors() {
        out.add_interior_ring(line_from_geo(ring)?)?;
    }
    Ok(out)
}

/// A single polygon stays a polygon; anything else becomes a multi polygon.
pub(crate) fn multi_polygon_from_geo(mp: &geo::MultiPolygon<f64>) -> Result<Geometry> {
    if let [polygon] = mp.0.as_slice() {
        return Ok(polygon_from_geo(polygon)?.into());
    }
    let mut out = GeometryCollection::new(CollectionKind::MultiPolygon);
    for polygon in mp.iter() {
        out.add_geometry(polygon_from_geo(polygon)?.into())?;
    }
    Ok(out.into())
}

pub(crate) fn point_from_geo(p: geo::Point<f64>) -> Result<Point> {
    Ok(Point::new(coord_from_geo(p.0)?))
}
