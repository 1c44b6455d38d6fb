//! Model B → Model A.

use log::{trace, warn};

use crate::convert::type_map::simple_type_of;
use crate::convert::Converter;
use crate::error::{GeoExactError, Result};
use crate::exact::{
    scalar_to_f64, Coord, Geometry, GeometryCollection, GeometryTrait, LineString, Point,
    Polygon, PolyhedralSurface, Solid, Triangle, TriangulatedSurface,
};
use crate::simple::{
    Dimension, Point4D, PointArray, SfCollection, SfGeometry, SfLineString, SfPoint, SfPolygon,
    SfTriangle, SfType, SRID_UNKNOWN,
};

fn to_point4d(coord: &Coord, want3d: bool) -> Point4D {
    let z = match (&coord.z, want3d) {
        (Some(z), true) => scalar_to_f64(z),
        _ => 0.0,
    };
    Point4D::new_3d(scalar_to_f64(&coord.x), scalar_to_f64(&coord.y), z)
}

fn to_point_array<'a>(coords: impl ExactSizeIterator<Item = &'a Coord>, dim: Dimension) -> PointArray {
    let mut array = PointArray::with_capacity(dim, coords.len());
    coords.for_each(|c| array.push(to_point4d(c, dim.has_z())));
    array
}

fn dim_for(want3d: bool) -> Dimension {
    Dimension::from_flags(want3d, false)
}

pub(crate) fn to_simple_point(geom: &Point, want3d: bool, srid: i32) -> SfPoint {
    let dim = dim_for(want3d);
    SfPoint {
        srid,
        dim,
        points: geom.coord().map(|c| to_point_array(std::iter::once(c), dim)),
    }
}

pub(crate) fn to_simple_line_string(geom: &LineString, want3d: bool, srid: i32) -> SfLineString {
    let dim = dim_for(want3d);
    SfLineString {
        srid,
        dim,
        points: (!geom.is_empty()).then(|| to_point_array(geom.coords().iter(), dim)),
    }
}

/// Written as a closed ring of four points.
pub(crate) fn to_simple_triangle(geom: &Triangle, want3d: bool, srid: i32) -> SfTriangle {
    let dim = dim_for(want3d);
    SfTriangle {
        srid,
        dim,
        points: geom
            .vertices()
            .map(|v| to_point_array([&v[0], &v[1], &v[2], &v[0]].into_iter(), dim)),
    }
}

pub(crate) fn to_simple_polygon(geom: &Polygon, want3d: bool, srid: i32) -> SfPolygon {
    let dim = dim_for(want3d);
    SfPolygon {
        srid,
        dim,
        rings: geom
            .rings()
            .iter()
            .map(|ring| to_point_array(ring.coords().iter(), dim))
            .collect(),
    }
}

impl Converter {
    /// Convert a Model B geometry into a Model A geometry carrying `srid`.
    ///
    /// Point arrays get a Z ordinate when `force_3d` is set or when the geometry has any
    /// 3D vertex. Collection members are converted with the same `force_3d` and carry
    /// [`SRID_UNKNOWN`].
    ///
    /// A [`Solid`] becomes a polyhedral surface flagged as solid holding the faces of
    /// every shell. Interior shells are not marked and cannot be told apart afterwards.
    pub fn to_simple(&self, geom: &Geometry, force_3d: bool, srid: i32) -> Result<SfGeometry> {
        self.to_simple_at(geom, force_3d, srid, 0)
    }

    fn to_simple_at(
        &self,
        geom: &Geometry,
        force_3d: bool,
        srid: i32,
        depth: usize,
    ) -> Result<SfGeometry> {
        if depth > self.max_depth {
            return Err(GeoExactError::NestingTooDeep(self.max_depth));
        }
        let want3d = force_3d || geom.is_3d();
        trace!(
            "to_simple {} at depth {depth} (want3d: {want3d})",
            geom.geometry_kind().name()
        );

        let out = match geom {
            Geometry::Point(g) => SfGeometry::Point(to_simple_point(g, want3d, srid)),
            Geometry::LineString(g) => {
                SfGeometry::LineString(to_simple_line_string(g, want3d, srid))
            }
            Geometry::Triangle(g) => SfGeometry::Triangle(to_simple_triangle(g, want3d, srid)),
            Geometry::Polygon(g) => SfGeometry::Polygon(to_simple_polygon(g, want3d, srid)),
            Geometry::Collection(g) => self.to_simple_collection(g, force_3d, want3d, srid, depth)?,
            Geometry::PolyhedralSurface(g) => {
                SfGeometry::Collection(to_simple_surface(g, force_3d, want3d, srid))
            }
            Geometry::TriangulatedSurface(g) => {
                SfGeometry::Collection(to_simple_tin(g, force_3d, want3d, srid))
            }
            Geometry::Solid(g) => SfGeometry::Collection(to_simple_solid(g, want3d, srid)),
        };
        Ok(out)
    }

    fn to_simple_collection(
        &self,
        geom: &GeometryCollection,
        force_3d: bool,
        want3d: bool,
        srid: i32,
        depth: usize,
    ) -> Result<SfGeometry> {
        let kind = geom.geometry_kind();
        let (type_id, solid) = simple_type_of(kind)
            .ok_or_else(|| GeoExactError::UnsupportedGeometryType(kind.name().to_string()))?;
        let mut out = SfCollection::new(type_id, srid, dim_for(want3d));
        out.solid = solid;
        for member in geom.geometries() {
            out.geoms
                .push(self.to_simple_at(member, force_3d, SRID_UNKNOWN, depth + 1)?);
        }
        Ok(SfGeometry::Collection(out))
    }
}

fn polygon_faces<'a>(
    faces: impl Iterator<Item = &'a Polygon>,
    force_3d: bool,
) -> Vec<SfGeometry> {
    faces
        .map(|f| {
            SfGeometry::Polygon(to_simple_polygon(
                f,
                force_3d || f.is_3d(),
                SRID_UNKNOWN,
            ))
        })
        .collect()
}

fn to_simple_surface(
    geom: &PolyhedralSurface,
    force_3d: bool,
    want3d: bool,
    srid: i32,
) -> SfCollection {
    let mut out = SfCollection::new(SfType::PolyhedralSurface, srid, dim_for(want3d));
    out.geoms = polygon_faces(geom.polygons().iter(), force_3d);
    out
}

fn to_simple_tin(
    geom: &TriangulatedSurface,
    force_3d: bool,
    want3d: bool,
    srid: i32,
) -> SfCollection {
    let mut out = SfCollection::new(SfType::Tin, srid, dim_for(want3d));
    out.geoms = geom
        .triangles()
        .iter()
        .map(|t| {
            SfGeometry::Triangle(to_simple_triangle(
                t,
                force_3d || t.is_3d(),
                SRID_UNKNOWN,
            ))
        })
        .collect();
    out
}

/// Faces of every shell, always 3D, in one flat list.
fn to_simple_solid(geom: &Solid, want3d: bool, srid: i32) -> SfCollection {
    if geom.num_shells() > 1 {
        warn!(
            "merging {} interior shells into the exterior shell",
            geom.num_shells() - 1
        );
    }
    let faces = polygon_faces(geom.shells().iter().flat_map(|s| s.polygons()), true);
    let dim = dim_for(want3d || !faces.is_empty());
    let mut out = SfCollection::new(SfType::PolyhedralSurface, srid, dim);
    out.solid = true;
    out.geoms = faces;
    out
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::exact::CollectionKind;
    use crate::test::exact::{tetrahedron, two_shell_solid};

    #[test]
    fn empty_line_string_forced_3d() {
        let out = Converter::default()
            .to_simple(&LineString::empty().into(), true, 0)
            .unwrap();
        assert_eq!(out.type_id(), SfType::LineString);
        assert!(out.is_empty());
        assert!(out.has_z());
    }

    #[test]
    fn triangle_is_ring_closed() {
        let tri = Triangle::new(
            Coord::from_ints(0, 0, Some(0)),
            Coord::from_ints(1, 0, Some(0)),
            Coord::from_ints(0, 1, Some(1)),
        );
        let SfGeometry::Triangle(out) = Converter::default().to_simple(&tri.into(), false, 7).unwrap() else {
            panic!("expected triangle")
        };
        let points = out.points.unwrap();
        assert_eq!(points.len(), 4);
        assert_eq!(points.get(0), points.get(3));
        assert_eq!(points.get(2).unwrap().z, 1.0);
        assert_eq!(out.srid, 7);
    }

    #[test]
    fn members_recompute_3d() {
        let mut gc = GeometryCollection::new(CollectionKind::GeometryCollection);
        gc.add_geometry(Point::new(Coord::from_ints(1, 2, None)).into())
            .unwrap();
        gc.add_geometry(Point::new(Coord::from_ints(1, 2, Some(3))).into())
            .unwrap();
        gc.add_geometry(Point::empty().into()).unwrap();

        let SfGeometry::Collection(out) = Converter::default().to_simple(&gc.into(), false, 4326).unwrap() else {
            panic!("expected collection")
        };
        assert!(out.dim.has_z());
        assert!(!out.geoms[0].has_z());
        assert!(out.geoms[1].has_z());
        // empty members are kept
        assert_eq!(out.geoms.len(), 3);
        assert!(out.geoms[2].is_empty());
        assert!(out.geoms.iter().all(|g| g.srid() == SRID_UNKNOWN));
    }

    #[test]
    fn solid_faces_are_flattened() {
        let solid = two_shell_solid();
        let total_faces: usize = solid.shells().iter().map(|s| s.num_polygons()).sum();
        let SfGeometry::Collection(out) = Converter::default().to_simple(&solid.into(), false, 0).unwrap() else {
            panic!("expected collection")
        };
        assert!(out.solid);
        assert_eq!(out.type_id, SfType::PolyhedralSurface);
        assert_eq!(out.geoms.len(), total_faces);
        assert!(out.geoms.iter().all(|g| g.has_z()));
    }

    #[test]
    fn polyhedral_surface_keeps_faces() {
        let SfGeometry::Collection(out) = Converter::default()
            .to_simple(&tetrahedron().into(), false, 0)
            .unwrap()
        else {
            panic!("expected collection")
        };
        assert!(!out.solid);
        assert_eq!(out.geoms.len(), 4);
    }
}
