use itertools::Itertools;

use crate::io::wkt::reader::Tag;
use crate::io::wkt::writer::format_f64;
use crate::simple::{Dimension, PointArray, SfGeometry, SfType, SRID_UNKNOWN};

fn tag_of(geom: &SfGeometry) -> Tag {
    match geom.type_id() {
        SfType::Point => Tag::Point,
        SfType::LineString => Tag::LineString,
        SfType::CircularString => Tag::CircularString,
        SfType::Polygon => Tag::Polygon,
        SfType::Triangle => Tag::Triangle,
        SfType::MultiPoint => Tag::MultiPoint,
        SfType::MultiLineString => Tag::MultiLineString,
        SfType::MultiPolygon => Tag::MultiPolygon,
        SfType::GeometryCollection => Tag::GeometryCollection,
        SfType::CompoundCurve => Tag::CompoundCurve,
        SfType::CurvePolygon => Tag::CurvePolygon,
        SfType::MultiCurve => Tag::MultiCurve,
        SfType::MultiSurface => Tag::MultiSurface,
        SfType::PolyhedralSurface if geom.is_solid() => Tag::Solid,
        SfType::PolyhedralSurface => Tag::PolyhedralSurface,
        SfType::Tin => Tag::Tin,
    }
}

fn write_coords(out: &mut String, points: Option<&PointArray>, dim: Dimension, precision: i32) {
    let text = points
        .into_iter()
        .flat_map(|p| p.iter())
        .map(|p| {
            let mut ordinates = vec![p.x, p.y];
            if dim.has_z() {
                ordinates.push(p.z);
            }
            if dim.has_m() {
                ordinates.push(p.m);
            }
            ordinates
                .into_iter()
                .map(|v| format_f64(v, precision))
                .join(" ")
        })
        .join(",");
    out.push('(');
    out.push_str(&text);
    out.push(')');
}

fn write_member(out: &mut String, parent: Tag, member: &SfGeometry, precision: i32) {
    let implicit = parent
        .implicit_member()
        .is_some_and(|(tag, _)| tag == tag_of(member));
    if !implicit {
        write_tagged(out, member, precision);
    } else if member.is_empty() {
        out.push_str("EMPTY");
    } else {
        write_body(out, member, precision);
    }
}

fn write_body(out: &mut String, geom: &SfGeometry, precision: i32) {
    let dim = geom.dim();
    match geom {
        SfGeometry::Point(g) => write_coords(out, g.points.as_ref(), dim, precision),
        SfGeometry::LineString(g) | SfGeometry::CircularString(g) => {
            write_coords(out, g.points.as_ref(), dim, precision)
        }
        SfGeometry::Triangle(g) => {
            out.push('(');
            write_coords(out, g.points.as_ref(), dim, precision);
            out.push(')');
        }
        SfGeometry::Polygon(g) => {
            out.push('(');
            for (i, ring) in g.rings.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_coords(out, Some(ring), dim, precision);
            }
            out.push(')');
        }
        SfGeometry::Collection(g) => {
            let tag = tag_of(geom);
            // a solid is written as a single shell
            let (open, close, member_parent) = if g.solid {
                ("((", "))", Tag::PolyhedralSurface)
            } else {
                ("(", ")", tag)
            };
            out.push_str(open);
            for (i, member) in g.geoms.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_member(out, member_parent, member, precision);
            }
            out.push_str(close);
        }
    }
}

fn write_tagged(out: &mut String, geom: &SfGeometry, precision: i32) {
    let marker = geom.dim().wkt_marker();
    out.push_str(tag_of(geom).keyword());
    out.push_str(marker);
    if geom.is_empty() {
        out.push_str(" EMPTY");
        return;
    }
    if !marker.is_empty() {
        out.push(' ');
    }
    write_body(out, geom, precision);
}

/// Write a Model A geometry as extended WKT with at most `precision` decimals.
///
/// The `SRID=<n>;` prefix is omitted for [`SRID_UNKNOWN`]. A solid polyhedral surface is
/// written as `SOLID` with one shell.
pub fn write_simple(geom: &SfGeometry, precision: i32) -> String {
    let mut out = String::new();
    if geom.srid() != SRID_UNKNOWN {
        out.push_str(&format!("SRID={};", geom.srid()));
    }
    write_tagged(&mut out, geom, precision);
    out
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::io::wkt::reader::simple::read_simple;
    use crate::test::simple::{polygon_with_hole, solid_cube, tin};

    #[test]
    fn polygon_text() {
        assert_eq!(
            write_simple(&polygon_with_hole(), 15),
            "SRID=4326;POLYGON((0 0,10 0,10 10,0 10,0 0),(1 1,2 1,2 2,1 2,1 1))"
        );
    }

    #[test]
    fn markers_and_empties() {
        assert_eq!(
            write_simple(&SfGeometry::empty(SfType::LineString, 0, Dimension::XYZ), 15),
            "LINESTRING Z EMPTY"
        );
        assert_eq!(
            write_simple(&tin(), 15),
            "TIN Z (((0 0 0,1 0 0,0 1 1,0 0 0)),((1 0 0,1 1 1,0 1 1,1 0 0)))"
        );
    }

    #[test]
    fn text_round_trip() {
        for g in [polygon_with_hole(), tin(), solid_cube()] {
            let text = write_simple(&g, 15);
            assert_eq!(read_simple(&text, 8).unwrap(), g, "{text}");
        }
    }

    #[test]
    fn empty_members() {
        let g = read_simple("MULTIPOINT(EMPTY,(1 2))", 8).unwrap();
        assert_eq!(write_simple(&g, 15), "MULTIPOINT(EMPTY,(1 2))");
        let g = read_simple("GEOMETRYCOLLECTION(POINT EMPTY,TIN EMPTY)", 8).unwrap();
        assert_eq!(
            write_simple(&g, 15),
            "GEOMETRYCOLLECTION(POINT EMPTY,TIN EMPTY)"
        );
    }
}
