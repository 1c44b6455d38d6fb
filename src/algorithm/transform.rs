use num_bigint::BigInt;

use crate::error::{GeoExactError, Result};
use crate::exact::{
    CollectionKind, Coord, Geometry, GeometryCollection, GeometryTrait, LineString, Point,
    PolyhedralSurface, Polygon, Scalar, Solid, Triangle, TriangulatedSurface,
};

fn map_line(line: &LineString, f: &impl Fn(&Coord) -> Coord) -> LineString {
    LineString::new(line.coords().iter().map(f).collect())
}

fn map_polygon(polygon: &Polygon, f: &impl Fn(&Coord) -> Coord) -> Result<Polygon> {
    let mut rings = polygon.rings().iter().map(|r| map_line(r, f));
    let Some(exterior) = rings.next() else {
        return Ok(Polygon::empty());
    };
    let mut out = Polygon::from_exterior_ring(exterior);
    for ring in rings {
        out.add_interior_ring(ring)?;
    }
    Ok(out)
}

fn map_triangle(triangle: &Triangle, f: &impl Fn(&Coord) -> Coord) -> Triangle {
    match triangle.vertices() {
        Some([a, b, c]) => Triangle::new(f(a), f(b), f(c)),
        None => Triangle::empty(),
    }
}

fn map_surface(surface: &PolyhedralSurface, f: &impl Fn(&Coord) -> Coord) -> Result<PolyhedralSurface> {
    Ok(PolyhedralSurface::new(
        surface
            .polygons()
            .iter()
            .map(|p| map_polygon(p, f))
            .collect::<Result<_>>()?,
    ))
}

/// Rebuild `geom` with every coordinate replaced by `f(coordinate)`.
pub(crate) fn map_coords(geom: &Geometry, f: &impl Fn(&Coord) -> Coord) -> Result<Geometry> {
    Ok(match geom {
        Geometry::Point(p) => match p.coord() {
            Some(c) => Point::new(f(c)).into(),
            None => Point::empty().into(),
        },
        Geometry::LineString(l) => map_line(l, f).into(),
        Geometry::Polygon(p) => map_polygon(p, f)?.into(),
        Geometry::Triangle(t) => map_triangle(t, f).into(),
        Geometry::PolyhedralSurface(s) => map_surface(s, f)?.into(),
        Geometry::TriangulatedSurface(t) => TriangulatedSurface::new(
            t.triangles().iter().map(|t| map_triangle(t, f)).collect(),
        )
        .into(),
        Geometry::Solid(s) => {
            let mut shells = s.shells().iter().map(|shell| map_surface(shell, f));
            match shells.next() {
                Some(exterior) => {
                    let mut solid = Solid::from_exterior_shell(exterior?);
                    for shell in shells {
                        solid.add_interior_shell(shell?)?;
                    }
                    solid.into()
                }
                None => Solid::empty().into(),
            }
        }
        Geometry::Collection(c) => {
            let mut out = GeometryCollection::new(c.kind());
            for member in c.geometries() {
                out.add_geometry(map_coords(member, f)?)?;
            }
            out.into()
        }
    })
}

/// Snap every ordinate to the nearest multiple of `1 / scale`, halves away from zero.
pub fn round(geom: &Geometry, scale: i32) -> Result<Geometry> {
    if scale <= 0 {
        return Err(GeoExactError::Algorithm(format!(
            "round needs a positive scale, got {scale}"
        )));
    }
    let scale = Scalar::from_integer(BigInt::from(scale));
    let snap = |v: &Scalar| (v * &scale).round() / &scale;
    map_coords(geom, &|c: &Coord| Coord {
        x: snap(&c.x),
        y: snap(&c.y),
        z: c.z.as_ref().map(snap),
    })
}

/// Turn a polyhedral surface into a solid bounded by it. Solids pass through.
pub fn make_solid(geom: &Geometry) -> Result<Geometry> {
    match geom {
        Geometry::PolyhedralSurface(s) if s.is_empty() => Ok(Solid::empty().into()),
        Geometry::PolyhedralSurface(s) => Ok(Solid::from_exterior_shell(s.clone()).into()),
        Geometry::Solid(_) => Ok(geom.clone()),
        other => Err(GeoExactError::Algorithm(format!(
            "make_solid expects a polyhedral surface, got {}",
            other.geometry_kind().name()
        ))),
    }
}

pub fn copy(geom: &Geometry) -> Geometry {
    geom.clone()
}

fn extract_into(geom: &Geometry, kind: CollectionKind, out: &mut GeometryCollection) -> Result<()> {
    match (geom, kind) {
        (Geometry::Point(_), CollectionKind::MultiPoint)
        | (Geometry::LineString(_), CollectionKind::MultiLineString)
        | (Geometry::Polygon(_), CollectionKind::MultiPolygon) => {
            if !geom.is_empty() {
                out.add_geometry(geom.clone())?;
            }
        }
        (Geometry::Triangle(t), CollectionKind::MultiPolygon) => {
            if !t.is_empty() {
                out.add_geometry(t.to_polygon().into())?;
            }
        }
        (Geometry::Collection(c), _) => {
            for member in c.geometries() {
                extract_into(member, kind, out)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Gather the members of one dimension: 1 points, 2 lines, 3 polygons (triangles
/// included) into the matching multi geometry. Surfaces and solids are skipped.
pub fn collection_extract(geom: &Geometry, type_id: i32) -> Result<Geometry> {
    let kind = match type_id {
        1 => CollectionKind::MultiPoint,
        2 => CollectionKind::MultiLineString,
        3 => CollectionKind::MultiPolygon,
        other => {
            return Err(GeoExactError::Algorithm(format!(
                "collection_extract type must be 1, 2 or 3, got {other}"
            )))
        }
    };
    let mut out = GeometryCollection::new(kind);
    extract_into(geom, kind, &mut out)?;
    Ok(out.into())
}
