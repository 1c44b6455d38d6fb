use crate::error::{GeoExactError, Result};
use crate::exact::{Coord, Geometry, GeometryTrait, Polygon, Triangle, TriangulatedSurface};

/// Drops the closing point of a closed ring.
fn open_ring(coords: &[Coord]) -> &[Coord] {
    match coords {
        [first, .., last] if first == last => &coords[..coords.len() - 1],
        _ => coords,
    }
}

fn triangulate_polygon(polygon: &Polygon, out: &mut Vec<Triangle>) -> Result<()> {
    let mut vertices: Vec<&Coord> = vec![];
    let mut flat = vec![];
    let mut holes = vec![];
    for (i, ring) in polygon.rings().iter().enumerate() {
        let coords = open_ring(ring.coords());
        if coords.is_empty() {
            continue;
        }
        if i > 0 {
            holes.push(vertices.len());
        }
        for c in coords {
            let (x, y, _) = c.to_f64();
            flat.push(x);
            flat.push(y);
            vertices.push(c);
        }
    }
    if vertices.len() < 3 {
        return Ok(());
    }

    let indices = earcutr::earcut(&flat, &holes, 2)
        .map_err(|e| GeoExactError::Algorithm(format!("triangulation failed: {e:?}")))?;
    // triangles index the exact vertices, so no precision is lost
    out.extend(indices.chunks_exact(3).map(|t| {
        Triangle::new(
            vertices[t[0]].clone(),
            vertices[t[1]].clone(),
            vertices[t[2]].clone(),
        )
    }));
    Ok(())
}

fn collect_triangles(geom: &Geometry, out: &mut Vec<Triangle>) -> Result<()> {
    match geom {
        Geometry::Polygon(p) => triangulate_polygon(p, out),
        Geometry::Triangle(t) => {
            if !t.is_empty() {
                out.push(t.clone());
            }
            Ok(())
        }
        Geometry::PolyhedralSurface(s) => s
            .polygons()
            .iter()
            .try_for_each(|p| triangulate_polygon(p, out)),
        Geometry::TriangulatedSurface(t) => {
            out.extend(t.triangles().iter().filter(|t| !t.is_empty()).cloned());
            Ok(())
        }
        Geometry::Collection(c) => c
            .geometries()
            .iter()
            .try_for_each(|g| collect_triangles(g, out)),
        other => Err(GeoExactError::Algorithm(format!(
            "triangulate2d expects polygonal input, got {}",
            other.geometry_kind().name()
        ))),
    }
}

/// Triangulate the polygonal parts of a geometry in the XY plane.
///
/// The triangles reuse the input vertices, Z included.
pub fn triangulate_2d(geom: &Geometry) -> Result<TriangulatedSurface> {
    let mut triangles = vec![];
    collect_triangles(geom, &mut triangles)?;
    Ok(TriangulatedSurface::new(triangles))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::algorithm::Area;
    use crate::exact::{LineString, Point};
    use crate::test::exact::{c2, square, tetrahedron};
    use approx::assert_relative_eq;

    #[test]
    fn square_gives_two_triangles() {
        let tin = triangulate_2d(&square(2).into()).unwrap();
        assert_eq!(tin.num_triangles(), 2);
        assert_relative_eq!(Geometry::from(tin).area().unwrap(), 4.);
    }

    #[test]
    fn holes_are_respected() {
        let mut polygon = square(10);
        polygon
            .add_interior_ring(LineString::new(vec![
                c2(1, 1),
                c2(2, 1),
                c2(2, 2),
                c2(1, 2),
                c2(1, 1),
            ]))
            .unwrap();
        let tin = triangulate_2d(&polygon.into()).unwrap();
        assert_relative_eq!(Geometry::from(tin).area().unwrap(), 99.);
    }

    #[test]
    fn vertices_keep_z() {
        let tin = triangulate_2d(&tetrahedron().into()).unwrap();
        assert!(tin.triangles().iter().all(|t| t.is_3d()));
    }

    #[test]
    fn rejects_points() {
        assert!(triangulate_2d(&Point::new(c2(0, 0)).into()).is_err());
    }
}
