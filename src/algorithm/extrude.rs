use crate::error::{GeoExactError, Result};
use crate::exact::{
    scalar_from_f64, CollectionKind, Coord, Geometry, GeometryCollection, GeometryTrait,
    LineString, Point, PolyhedralSurface, Polygon, Scalar, Solid,
};

struct Extruder {
    dx: Scalar,
    dy: Scalar,
    dz: Scalar,
}

impl Extruder {
    fn base(c: &Coord) -> Coord {
        Coord::new_3d(c.x.clone(), c.y.clone(), c.z_or_zero())
    }

    fn top(&self, c: &Coord) -> Coord {
        Coord::new_3d(&c.x + &self.dx, &c.y + &self.dy, c.z_or_zero() + &self.dz)
    }

    fn point(&self, point: &Point) -> LineString {
        match point.coord() {
            Some(c) => LineString::new(vec![Self::base(c), self.top(c)]),
            None => LineString::empty(),
        }
    }

    /// One quad per segment of `line`.
    fn walls(&self, line: &LineString) -> impl Iterator<Item = Polygon> + '_ {
        let coords = line.coords().to_vec();
        (1..coords.len()).map(move |i| {
            let (a, b) = (&coords[i - 1], &coords[i]);
            Polygon::from_exterior_ring(LineString::new(vec![
                Self::base(a),
                Self::base(b),
                self.top(b),
                self.top(a),
                Self::base(a),
            ]))
        })
    }

    fn line_string(&self, line: &LineString) -> PolyhedralSurface {
        PolyhedralSurface::new(self.walls(line).collect())
    }

    fn polygon(&self, polygon: &Polygon) -> Result<Solid> {
        if polygon.is_empty() {
            return Ok(Solid::empty());
        }
        let mut faces = vec![];
        // bottom faces away from the extrusion, so its rings are reversed
        let mut rings = polygon.rings().iter().map(|ring| {
            LineString::new(ring.coords().iter().rev().map(Self::base).collect())
        });
        if let Some(exterior) = rings.next() {
            let mut bottom = Polygon::from_exterior_ring(exterior);
            for hole in rings {
                bottom.add_interior_ring(hole)?;
            }
            faces.push(bottom);
        }

        let mut top_rings = polygon
            .rings()
            .iter()
            .map(|ring| LineString::new(ring.coords().iter().map(|c| self.top(c)).collect()));
        if let Some(exterior) = top_rings.next() {
            let mut top = Polygon::from_exterior_ring(exterior);
            for hole in top_rings {
                top.add_interior_ring(hole)?;
            }
            faces.push(top);
        }

        for ring in polygon.rings() {
            faces.extend(self.walls(ring));
        }
        Ok(Solid::from_exterior_shell(PolyhedralSurface::new(faces)))
    }

    fn collection(&self, kind: CollectionKind, members: Vec<Geometry>) -> Result<Geometry> {
        let mut out = GeometryCollection::new(kind);
        for member in members {
            out.add_geometry(member)?;
        }
        Ok(out.into())
    }

    fn geometry(&self, geom: &Geometry) -> Result<Geometry> {
        Ok(match geom {
            Geometry::Point(p) => self.point(p).into(),
            Geometry::LineString(l) => self.line_string(l).into(),
            Geometry::Polygon(p) => self.polygon(p)?.into(),
            Geometry::Triangle(t) => self.polygon(&t.to_polygon())?.into(),
            Geometry::PolyhedralSurface(s) => self.collection(
                CollectionKind::MultiSolid,
                s.polygons()
                    .iter()
                    .map(|p| self.polygon(p).map(Geometry::from))
                    .collect::<Result<_>>()?,
            )?,
            Geometry::TriangulatedSurface(t) => self.collection(
                CollectionKind::MultiSolid,
                t.triangles()
                    .iter()
                    .map(|t| self.polygon(&t.to_polygon()).map(Geometry::from))
                    .collect::<Result<_>>()?,
            )?,
            Geometry::Collection(c) => {
                let kind = match c.kind() {
                    CollectionKind::MultiPoint => CollectionKind::MultiLineString,
                    CollectionKind::MultiPolygon => CollectionKind::MultiSolid,
                    CollectionKind::MultiLineString | CollectionKind::GeometryCollection => {
                        CollectionKind::GeometryCollection
                    }
                    CollectionKind::MultiSolid => return Err(cannot_extrude(geom)),
                };
                let members = c
                    .geometries()
                    .iter()
                    .map(|g| self.geometry(g))
                    .collect::<Result<Vec<_>>>()?;
                if c.kind() == CollectionKind::MultiLineString {
                    // the walls of every line form one surface
                    let faces = members
                        .into_iter()
                        .flat_map(|m| match m {
                            Geometry::PolyhedralSurface(s) => s.polygons().to_vec(),
                            _ => vec![],
                        })
                        .collect();
                    return Ok(PolyhedralSurface::new(faces).into());
                }
                self.collection(kind, members)?
            }
            Geometry::Solid(_) => return Err(cannot_extrude(geom)),
        })
    }
}

fn cannot_extrude(geom: &Geometry) -> GeoExactError {
    GeoExactError::Algorithm(format!(
        "cannot extrude a {}",
        geom.geometry_kind().name()
    ))
}

/// Sweep a geometry along `(dx, dy, dz)`.
///
/// Points become lines, lines become polyhedral surfaces and polygons become solids.
/// Multi geometries map member by member; each face of a surface becomes its own solid.
/// The result is always 3D. Volumes cannot be extruded.
pub fn extrude(geom: &Geometry, dx: f64, dy: f64, dz: f64) -> Result<Geometry> {
    let extruder = Extruder {
        dx: scalar_from_f64(dx)?,
        dy: scalar_from_f64(dy)?,
        dz: scalar_from_f64(dz)?,
    };
    extruder.geometry(geom)
}
