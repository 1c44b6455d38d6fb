use crate::error::{GeoExactError, Result};
use crate::io::wkt::reader::{parse, Body, Node, RawCoord, Tag};
use crate::simple::{
    Dimension, Point4D, PointArray, SfCollection, SfGeometry, SfLineString, SfPoint, SfPolygon,
    SfTriangle, SfType, SRID_UNKNOWN,
};

fn parse_f64(text: &str) -> Result<f64> {
    if text.contains('/') {
        return Err(GeoExactError::Deserialization(format!(
            "WKT: rational number {text} needs an exact geometry type"
        )));
    }
    let value = lexical_core::parse::<f64>(text.as_bytes())
        .map_err(|e| GeoExactError::Deserialization(format!("WKT: invalid number {text}: {e}")))?;
    if !value.is_finite() {
        return Err(GeoExactError::Deserialization(format!(
            "WKT: number {text} is out of range"
        )));
    }
    Ok(value)
}

fn to_point(coord: &RawCoord<'_>, dim: Dimension) -> Result<Point4D> {
    let mut values = coord.iter().map(|s| parse_f64(s));
    let mut next = || {
        values
            .next()
            .unwrap_or_else(|| Err(GeoExactError::Deserialization("WKT: missing ordinate".into())))
    };
    let mut p = Point4D::new_2d(next()?, next()?);
    match dim {
        Dimension::XY => {}
        Dimension::XYZ => p.z = next()?,
        Dimension::XYM => p.m = next()?,
        Dimension::XYZM => {
            p.z = next()?;
            p.m = next()?;
        }
    }
    Ok(p)
}

fn to_point_array(coords: &[RawCoord<'_>], dim: Dimension) -> Result<PointArray> {
    let mut array = PointArray::with_capacity(dim, coords.len());
    for c in coords {
        array.push(to_point(c, dim)?);
    }
    Ok(array)
}

fn single_ring<'a, 'b>(
    rings: &'b [Vec<RawCoord<'a>>],
    tag: Tag,
) -> Result<&'b [RawCoord<'a>]> {
    match rings {
        [ring] => Ok(ring.as_slice()),
        _ => Err(GeoExactError::Deserialization(format!(
            "WKT: {} takes exactly one ring",
            tag.keyword()
        ))),
    }
}

fn members<'n, 'a>(node: &'n Node<'a>) -> &'n [Node<'a>] {
    match &node.body {
        Body::Members(m) => m,
        _ => &[],
    }
}

fn node_to_simple(node: &Node<'_>, srid: i32) -> Result<SfGeometry> {
    let dim = node.dim;

    let geom = match (node.tag, &node.body) {
        (Tag::Point, Body::Coords(c)) => SfGeometry::Point(SfPoint {
            srid,
            dim,
            points: Some(to_point_array(c, dim)?),
        }),
        (Tag::LineString, Body::Coords(c)) => SfGeometry::LineString(SfLineString {
            srid,
            dim,
            points: Some(to_point_array(c, dim)?),
        }),
        (Tag::CircularString, Body::Coords(c)) => SfGeometry::CircularString(SfLineString {
            srid,
            dim,
            points: Some(to_point_array(c, dim)?),
        }),
        (Tag::Triangle, Body::Rings(r)) => SfGeometry::Triangle(SfTriangle {
            srid,
            dim,
            points: Some(to_point_array(single_ring(r, Tag::Triangle)?, dim)?),
        }),
        (Tag::Polygon, Body::Rings(r)) => SfGeometry::Polygon(SfPolygon {
            srid,
            dim,
            rings: r
                .iter()
                .map(|ring| to_point_array(ring, dim))
                .collect::<Result<_>>()?,
        }),
        (Tag::Solid, _) => {
            // every face of every shell, in one surface
            let mut out = SfCollection::new(SfType::PolyhedralSurface, srid, dim);
            out.solid = true;
            for shell in members(node) {
                for face in members(shell) {
                    out.geoms.push(node_to_simple(face, SRID_UNKNOWN)?);
                }
            }
            SfGeometry::Collection(out)
        }
        (tag, Body::Empty | Body::Members(_)) => {
            let type_id = simple_type_of_tag(tag);
            if matches!(node.body, Body::Empty) || !type_id.is_collection() {
                return Ok(SfGeometry::empty(type_id, srid, dim));
            }
            let mut out = SfCollection::new(type_id, srid, dim);
            for member in members(node) {
                out.geoms.push(node_to_simple(member, SRID_UNKNOWN)?);
            }
            SfGeometry::Collection(out)
        }
        (tag, _) => {
            return Err(GeoExactError::Deserialization(format!(
                "WKT: malformed {} body",
                tag.keyword()
            )))
        }
    };
    Ok(geom)
}

fn simple_type_of_tag(tag: Tag) -> SfType {
    match tag {
        Tag::Point => SfType::Point,
        Tag::LineString => SfType::LineString,
        Tag::CircularString => SfType::CircularString,
        Tag::Polygon => SfType::Polygon,
        Tag::Triangle => SfType::Triangle,
        Tag::MultiPoint => SfType::MultiPoint,
        Tag::MultiLineString => SfType::MultiLineString,
        Tag::MultiPolygon => SfType::MultiPolygon,
        Tag::GeometryCollection | Tag::MultiSolid => SfType::GeometryCollection,
        Tag::CompoundCurve => SfType::CompoundCurve,
        Tag::CurvePolygon => SfType::CurvePolygon,
        Tag::MultiCurve => SfType::MultiCurve,
        Tag::MultiSurface => SfType::MultiSurface,
        Tag::PolyhedralSurface | Tag::Solid => SfType::PolyhedralSurface,
        Tag::Tin => SfType::Tin,
    }
}

/// Parse extended WKT into a Model A geometry.
///
/// `SOLID` becomes a polyhedral surface flagged as solid and `MULTISOLID` a geometry
/// collection of those. Ordinates must be finite decimal numbers.
pub fn read_simple(s: &str, max_depth: usize) -> Result<SfGeometry> {
    let doc = parse(s, max_depth)?;
    node_to_simple(&doc.root, doc.srid.unwrap_or(SRID_UNKNOWN))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::simple::{polygon_with_hole, tin};

    #[test]
    fn polygon_with_srid() {
        let g = read_simple(
            "SRID=4326;POLYGON((0 0,10 0,10 10,0 10,0 0),(1 1,2 1,2 2,1 2,1 1))",
            8,
        )
        .unwrap();
        assert_eq!(g, polygon_with_hole());
    }

    #[test]
    fn rejects_rational_and_overflowing_numbers() {
        for wkt in ["POINT(1/0 2)", "POINT(1/3 2)", "POINT(1e999999 2)", "POINT(2 -1e400)"] {
            let err = read_simple(wkt, 8).unwrap_err();
            assert!(matches!(err, GeoExactError::Deserialization(_)), "{wkt}: {err}");
        }
    }

    #[test]
    fn tin_z() {
        let g = read_simple(
            "TIN Z (((0 0 0,1 0 0,0 1 1,0 0 0)),((1 0 0,1 1 1,0 1 1,1 0 0)))",
            8,
        )
        .unwrap();
        assert_eq!(g, tin());
    }

    #[test]
    fn empties() {
        let g = read_simple("LINESTRING Z EMPTY", 8).unwrap();
        assert_eq!(g.type_id(), SfType::LineString);
        assert!(g.is_empty());
        assert!(g.has_z());

        let g = read_simple("SOLID EMPTY", 8).unwrap();
        assert!(g.is_solid());
        assert!(g.is_empty());
    }

    #[test]
    fn decimal_and_exponent() {
        let SfGeometry::Point(p) = read_simple("POINT(0.25 2.5e1)", 8).unwrap() else {
            panic!("expected point")
        };
        let p = p.points.unwrap().get(0).unwrap();
        assert_eq!(p.x, 0.25);
        assert_eq!(p.y, 25.0);
    }

    #[test]
    fn curves_are_read() {
        let g = read_simple(
            "COMPOUNDCURVE(CIRCULARSTRING(0 0,1 1,1 0),(1 0,0 1))",
            8,
        )
        .unwrap();
        let SfGeometry::Collection(c) = g else {
            panic!("expected collection")
        };
        assert_eq!(c.type_id, SfType::CompoundCurve);
        assert_eq!(c.geoms[0].type_id(), SfType::CircularString);
        assert_eq!(c.geoms[1].type_id(), SfType::LineString);
    }
}
