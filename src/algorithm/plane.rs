//! Exact plane and orientation tests.

use num_traits::{Signed, Zero};

use crate::error::{GeoExactError, Result};
use crate::exact::{
    Coord, Geometry, GeometryCollection, GeometryTrait, LineString, PolyhedralSurface, Polygon,
    Scalar, Triangle, TriangulatedSurface,
};

/// A 3D vector of exact scalars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Vector3 {
    pub x: Scalar,
    pub y: Scalar,
    pub z: Scalar,
}

impl Vector3 {
    fn from_coord(c: &Coord) -> Self {
        Self {
            x: c.x.clone(),
            y: c.y.clone(),
            z: c.z_or_zero(),
        }
    }

    fn sub(&self, other: &Self) -> Self {
        Self {
            x: &self.x - &other.x,
            y: &self.y - &other.y,
            z: &self.z - &other.z,
        }
    }

    fn cross(&self, other: &Self) -> Self {
        Self {
            x: &self.y * &other.z - &self.z * &other.y,
            y: &self.z * &other.x - &self.x * &other.z,
            z: &self.x * &other.y - &self.y * &other.x,
        }
    }

    fn dot(&self, other: &Self) -> Scalar {
        &self.x * &other.x + &self.y * &other.y + &self.z * &other.z
    }

    fn is_zero(&self) -> bool {
        self.x.is_zero() && self.y.is_zero() && self.z.is_zero()
    }
}

/// Newell's normal of a ring. Its length is twice the ring area and it points up for a
/// counter-clockwise ring seen from above. The ring need not be closed.
pub(crate) fn newell_normal(coords: &[Coord]) -> Vector3 {
    let mut normal = Vector3 {
        x: Scalar::zero(),
        y: Scalar::zero(),
        z: Scalar::zero(),
    };
    let n = coords.len();
    for i in 0..n {
        let a = Vector3::from_coord(&coords[i]);
        let b = Vector3::from_coord(&coords[(i + 1) % n]);
        normal.x += (&a.y - &b.y) * (&a.z + &b.z);
        normal.y += (&a.z - &b.z) * (&a.x + &b.x);
        normal.z += (&a.x - &b.x) * (&a.y + &b.y);
    }
    normal
}

fn polygon_of(geom: &Geometry, operation: &str) -> Result<Polygon> {
    match geom {
        Geometry::Polygon(p) => Ok(p.clone()),
        Geometry::Triangle(t) => Ok(t.to_polygon()),
        other => Err(GeoExactError::Algorithm(format!(
            "{operation} expects a polygon, got {}",
            other.geometry_kind().name()
        ))),
    }
}

/// Whether every vertex of a polygon lies in one plane. Degenerate polygons, whose
/// vertices are all collinear, have no plane.
pub fn has_plane(geom: &Geometry) -> Result<bool> {
    let polygon = polygon_of(geom, "has_plane")?;
    let points: Vec<Vector3> = polygon
        .rings()
        .iter()
        .flat_map(|r| r.coords())
        .map(Vector3::from_coord)
        .collect();
    let Some(origin) = points.first() else {
        return Ok(false);
    };
    let edges: Vec<Vector3> = points[1..]
        .iter()
        .map(|p| p.sub(origin))
        .filter(|e| !e.is_zero())
        .collect();
    let Some(u) = edges.first() else {
        return Ok(false);
    };
    let Some(normal) = edges[1..].iter().map(|e| u.cross(e)).find(|n| !n.is_zero()) else {
        return Ok(false);
    };
    Ok(points.iter().all(|p| normal.dot(&p.sub(origin)).is_zero()))
}

/// Whether the exterior ring of a polygon is counter-clockwise seen from above.
pub fn pointing_up(geom: &Geometry) -> Result<bool> {
    let polygon = polygon_of(geom, "pointing_up")?;
    let Some(exterior) = polygon.exterior_ring() else {
        return Ok(false);
    };
    Ok(newell_normal(exterior.coords()).z.is_positive())
}

fn reversed(ring: &LineString) -> LineString {
    LineString::new(ring.coords().iter().rev().cloned().collect())
}

fn orient_up(polygon: &Polygon) -> Result<Polygon> {
    let Some(exterior) = polygon.exterior_ring() else {
        return Ok(Polygon::empty());
    };
    let mut out = if newell_normal(exterior.coords()).z.is_negative() {
        Polygon::from_exterior_ring(reversed(exterior))
    } else {
        Polygon::from_exterior_ring(exterior.clone())
    };
    for hole in polygon.interior_rings() {
        if newell_normal(hole.coords()).z.is_positive() {
            out.add_interior_ring(reversed(hole))?;
        } else {
            out.add_interior_ring(hole.clone())?;
        }
    }
    Ok(out)
}

fn orient_triangle_up(triangle: &Triangle) -> Triangle {
    match triangle.vertices() {
        Some([a, b, c]) if newell_normal(&[a.clone(), b.clone(), c.clone()]).z.is_negative() => {
            Triangle::new(a.clone(), c.clone(), b.clone())
        }
        _ => triangle.clone(),
    }
}

/// Orient every polygonal face so its normal points up: exterior rings
/// counter-clockwise, holes clockwise. Solids keep their outward orientation and are
/// returned unchanged, as are points and lines.
pub fn force_z_up(geom: &Geometry) -> Result<Geometry> {
    Ok(match geom {
        Geometry::Polygon(p) => orient_up(p)?.into(),
        Geometry::Triangle(t) => orient_triangle_up(t).into(),
        Geometry::PolyhedralSurface(s) => PolyhedralSurface::new(
            s.polygons()
                .iter()
                .map(orient_up)
                .collect::<Result<_>>()?,
        )
        .into(),
        Geometry::TriangulatedSurface(t) => {
            TriangulatedSurface::new(t.triangles().iter().map(orient_triangle_up).collect()).into()
        }
        Geometry::Collection(c) => {
            let mut out = GeometryCollection::new(c.kind());
            for member in c.geometries() {
                out.add_geometry(force_z_up(member)?)?;
            }
            out.into()
        }
        Geometry::Point(_) | Geometry::LineString(_) | Geometry::Solid(_) => geom.clone(),
    })
}
