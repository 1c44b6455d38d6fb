use crate::exact::{
    CollectionKind, Coord, Geometry, GeometryTrait, Polygon, PolyhedralSurface, Solid, Triangle,
};
use crate::io::wkt::reader::Tag;
use crate::io::wkt::writer::format_scalar;
use crate::simple::SRID_UNKNOWN;

fn tag_of(geom: &Geometry) -> Tag {
    match geom {
        Geometry::Point(_) => Tag::Point,
        Geometry::LineString(_) => Tag::LineString,
        Geometry::Polygon(_) => Tag::Polygon,
        Geometry::Triangle(_) => Tag::Triangle,
        Geometry::PolyhedralSurface(_) => Tag::PolyhedralSurface,
        Geometry::TriangulatedSurface(_) => Tag::Tin,
        Geometry::Solid(_) => Tag::Solid,
        Geometry::Collection(c) => match c.kind() {
            CollectionKind::MultiPoint => Tag::MultiPoint,
            CollectionKind::MultiLineString => Tag::MultiLineString,
            CollectionKind::MultiPolygon => Tag::MultiPolygon,
            CollectionKind::MultiSolid => Tag::MultiSolid,
            CollectionKind::GeometryCollection => Tag::GeometryCollection,
        },
    }
}

struct Writer {
    out: String,
    precision: i32,
}

impl Writer {
    fn coord(&mut self, c: &Coord, has_z: bool) {
        self.out.push_str(&format_scalar(&c.x, self.precision));
        self.out.push(' ');
        self.out.push_str(&format_scalar(&c.y, self.precision));
        if has_z {
            self.out.push(' ');
            self.out.push_str(&format_scalar(&c.z_or_zero(), self.precision));
        }
    }

    fn coord_list<'a>(&mut self, coords: impl IntoIterator<Item = &'a Coord>, has_z: bool) {
        self.out.push('(');
        for (i, c) in coords.into_iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.coord(c, has_z);
        }
        self.out.push(')');
    }

    /// Writes `(items)` or `EMPTY` for an empty list.
    fn list<T>(&mut self, items: &[T], mut item: impl FnMut(&mut Self, &T)) {
        if items.is_empty() {
            self.out.push_str("EMPTY");
            return;
        }
        self.out.push('(');
        for (i, it) in items.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            item(self, it);
        }
        self.out.push(')');
    }

    fn polygon(&mut self, polygon: &Polygon, has_z: bool) {
        self.list(polygon.rings(), |w, ring| w.coord_list(ring.coords(), has_z));
    }

    fn triangle(&mut self, triangle: &Triangle, has_z: bool) {
        match triangle.vertices() {
            Some([a, b, c]) => {
                self.out.push('(');
                self.coord_list([a, b, c, a], has_z);
                self.out.push(')');
            }
            None => self.out.push_str("EMPTY"),
        }
    }

    fn surface(&mut self, surface: &PolyhedralSurface, has_z: bool) {
        self.list(surface.polygons(), |w, p| w.polygon(p, has_z));
    }

    fn solid(&mut self, solid: &Solid, has_z: bool) {
        if solid.is_empty() {
            self.out.push_str("EMPTY");
            return;
        }
        self.list(solid.shells(), |w, s| w.surface(s, has_z));
    }

    fn body(&mut self, geom: &Geometry, has_z: bool) {
        match geom {
            Geometry::Point(p) => match p.coord() {
                Some(c) => self.coord_list([c], has_z),
                None => self.out.push_str("EMPTY"),
            },
            Geometry::LineString(l) if l.is_empty() => self.out.push_str("EMPTY"),
            Geometry::LineString(l) => self.coord_list(l.coords(), has_z),
            Geometry::Polygon(p) => self.polygon(p, has_z),
            Geometry::Triangle(t) => self.triangle(t, has_z),
            Geometry::PolyhedralSurface(s) => self.surface(s, has_z),
            Geometry::TriangulatedSurface(t) => self.list(t.triangles(), |w, t| w.triangle(t, has_z)),
            Geometry::Solid(s) => self.solid(s, has_z),
            Geometry::Collection(c) => {
                let implicit = tag_of(geom).implicit_member().map(|(tag, _)| tag);
                self.list(c.geometries(), |w, member| {
                    if implicit == Some(tag_of(member)) {
                        w.body(member, has_z);
                    } else {
                        w.tagged(member);
                    }
                });
            }
        }
    }

    fn tagged(&mut self, geom: &Geometry) {
        let has_z = geom.is_3d();
        self.out.push_str(tag_of(geom).keyword());
        if has_z {
            self.out.push_str(" Z");
        }
        if geom.is_empty() {
            self.out.push_str(" EMPTY");
            return;
        }
        if has_z {
            self.out.push(' ');
        }
        self.body(geom, has_z);
    }
}

/// Write a Model B geometry as extended WKT.
///
/// With a negative `precision` every ordinate is written exactly, as an integer or as
/// `num/den`. Otherwise ordinates are rounded to `precision` decimals.
pub fn write_exact(geom: &Geometry, srid: i32, precision: i32) -> String {
    let mut writer = Writer {
        out: String::new(),
        precision,
    };
    if srid != SRID_UNKNOWN {
        writer.out.push_str(&format!("SRID={srid};"));
    }
    writer.tagged(geom);
    writer.out
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::exact::{LineString, Point, PreparedGeometry};
    use crate::io::wkt::reader::exact::read_exact;
    use crate::test::exact::{square, tetrahedron, two_shell_solid};
    use num_rational::BigRational;

    #[test]
    fn fractions_are_exact() {
        let p = Point::new(Coord::new_2d(
            BigRational::new(1.into(), 3.into()),
            BigRational::from_integer((-2).into()),
        ));
        assert_eq!(write_exact(&p.clone().into(), 0, -1), "POINT(1/3 -2)");
        assert_eq!(write_exact(&p.into(), 4326, 3), "SRID=4326;POINT(0.333 -2)");
    }

    #[test]
    fn text_round_trip() {
        for g in [
            Geometry::from(square(4)),
            tetrahedron().into(),
            two_shell_solid().into(),
            LineString::empty().into(),
        ] {
            let text = write_exact(&g, 3857, -1);
            assert_eq!(read_exact(&text, 8).unwrap(), PreparedGeometry::new(g, 3857), "{text}");
        }
    }

    #[test]
    fn solid_text() {
        let text = write_exact(&two_shell_solid().into(), 0, -1);
        assert!(text.starts_with("SOLID Z (((("));
        assert!(text.contains("))),(((1 1 1,"));
    }
}
