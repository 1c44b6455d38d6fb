use geo::Area as _;
use num_traits::ToPrimitive;

use crate::algorithm::geo_interop::{polygon_to_geo, primitives, Primitive};
use crate::algorithm::plane::{newell_normal, Vector3};
use crate::error::{GeoExactError, Result};
use crate::exact::{Geometry, GeometryTrait, LineString, Polygon};

/// Planar and 3D area of a geometry.
///
/// Points and lines have zero area. Volumes have no planar area, so `area` fails on
/// solids; `area3d` sums the area of every shell face.
pub trait Area {
    /// Unsigned area of the XY projection.
    fn area(&self) -> Result<f64>;

    /// Unsigned area measured in the plane of each face.
    fn area3d(&self) -> Result<f64>;
}

fn ring_area3d(ring: &LineString) -> f64 {
    let Vector3 { x, y, z } = newell_normal(ring.coords());
    let squared = x.clone() * x + y.clone() * y + z.clone() * z;
    // |n| is twice the ring area
    squared.to_f64().unwrap_or(f64::NAN).sqrt() / 2.
}

fn polygon_area3d(polygon: &Polygon) -> f64 {
    let Some(exterior) = polygon.exterior_ring() else {
        return 0.;
    };
    polygon
        .interior_rings()
        .iter()
        .fold(ring_area3d(exterior), |area, hole| area - ring_area3d(hole))
}

impl Area for Geometry {
    fn area(&self) -> Result<f64> {
        match self {
            Geometry::Solid(_) => Err(GeoExactError::Algorithm(
                "area is not defined for a solid, use area3d".to_string(),
            )),
            Geometry::Collection(c) => c.geometries().iter().map(|g| g.area()).sum(),
            _ => {
                let mut parts = vec![];
                primitives(self, &mut parts);
                Ok(parts
                    .iter()
                    .map(|p| match p {
                        Primitive::Area(polygon) => polygon.unsigned_area(),
                        _ => 0.,
                    })
                    .sum())
            }
        }
    }

    fn area3d(&self) -> Result<f64> {
        let area = match self {
            Geometry::Point(_) | Geometry::LineString(_) => 0.,
            Geometry::Polygon(p) => polygon_area3d(p),
            Geometry::Triangle(t) => polygon_area3d(&t.to_polygon()),
            Geometry::PolyhedralSurface(s) => s.polygons().iter().map(polygon_area3d).sum(),
            Geometry::TriangulatedSurface(t) => t
                .triangles()
                .iter()
                .map(|t| polygon_area3d(&t.to_polygon()))
                .sum(),
            Geometry::Solid(s) => s
                .shells()
                .iter()
                .flat_map(|shell| shell.polygons())
                .map(polygon_area3d)
                .sum(),
            Geometry::Collection(c) => {
                return c.geometries().iter().map(|g| g.area3d()).sum();
            }
        };
        if area.is_nan() {
            return Err(GeoExactError::Algorithm(format!(
                "area of {} overflows a double",
                self.geometry_kind().name()
            )));
        }
        Ok(area.max(0.))
    }
}

/// Planar area of one polygon, exterior minus holes.
pub fn polygon_area(polygon: &Polygon) -> f64 {
    if polygon.is_empty() {
        return 0.;
    }
    polygon_to_geo(polygon).unsigned_area()
}
