use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;

use crate::error::{GeoExactError, Result};
use crate::exact::{
    CollectionKind, Coord, Geometry, GeometryCollection, LineString, Point, Polygon,
    PolyhedralSurface, PreparedGeometry, Scalar, Solid, Triangle, TriangulatedSurface,
};
use crate::io::wkt::reader::{parse, Body, Node, RawCoord, Tag};
use crate::simple::SRID_UNKNOWN;

/// Largest decimal exponent accepted in exact text.
const MAX_EXPONENT: i64 = 4096;

fn number_error(text: &str) -> GeoExactError {
    GeoExactError::Deserialization(format!("WKT: invalid exact number {text}"))
}

fn parse_int(text: &str) -> Result<BigInt> {
    BigInt::from_str(text).map_err(|_| number_error(text))
}

/// Parse `num/den`, a decimal, or scientific notation into the exact value it denotes.
pub(crate) fn parse_scalar(text: &str) -> Result<Scalar> {
    if let Some((num, den)) = text.split_once('/') {
        let den = parse_int(den)?;
        if den.is_zero() {
            return Err(number_error(text));
        }
        return Ok(BigRational::new(parse_int(num)?, den));
    }

    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(i) => (
            &text[..i],
            text[i + 1..]
                .parse::<i64>()
                .map_err(|_| number_error(text))?,
        ),
        None => (text, 0),
    };
    if exponent.abs() > MAX_EXPONENT {
        return Err(number_error(text));
    }
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if !frac_part.bytes().all(|b| b.is_ascii_digit())
        || (int_part.trim_start_matches(['-', '+']).is_empty() && frac_part.is_empty())
    {
        return Err(number_error(text));
    }
    let digits = if matches!(int_part, "" | "-" | "+") {
        format!("{int_part}0{frac_part}")
    } else {
        format!("{int_part}{frac_part}")
    };
    let digits = parse_int(&digits)?;
    let scale = exponent - frac_part.len() as i64;
    let power = num_traits::pow(BigInt::from(10), scale.unsigned_abs() as usize);
    if scale >= 0 {
        Ok(BigRational::from_integer(digits * power))
    } else {
        Ok(BigRational::new(digits, power))
    }
}

fn to_coord(coord: &RawCoord<'_>, node: &Node<'_>) -> Result<Coord> {
    let has_z = node.dim.has_z();
    match coord.as_slice() {
        [x, y, rest @ ..] => Ok(Coord {
            x: parse_scalar(x)?,
            y: parse_scalar(y)?,
            z: match (has_z, rest.first()) {
                (true, Some(z)) => Some(parse_scalar(z)?),
                _ => None,
            },
        }),
        _ => Err(GeoExactError::Deserialization(
            "WKT: coordinate needs at least two ordinates".into(),
        )),
    }
}

fn to_coords(coords: &[RawCoord<'_>], node: &Node<'_>) -> Result<Vec<Coord>> {
    coords.iter().map(|c| to_coord(c, node)).collect()
}

fn members<'n, 'a>(node: &'n Node<'a>) -> &'n [Node<'a>] {
    match &node.body {
        Body::Members(m) => m,
        _ => &[],
    }
}

fn malformed(node: &Node<'_>) -> GeoExactError {
    GeoExactError::Deserialization(format!("WKT: malformed {} body", node.tag.keyword()))
}

fn to_polygon(node: &Node<'_>) -> Result<Polygon> {
    match &node.body {
        Body::Empty => Ok(Polygon::empty()),
        Body::Rings(rings) => {
            let mut rings = rings.iter();
            let Some(exterior) = rings.next() else {
                return Ok(Polygon::empty());
            };
            let mut polygon = Polygon::from_exterior_ring(LineString::new(to_coords(exterior, node)?));
            for ring in rings {
                polygon.add_interior_ring(LineString::new(to_coords(ring, node)?))?;
            }
            Ok(polygon)
        }
        _ => Err(malformed(node)),
    }
}

fn to_triangle(node: &Node<'_>) -> Result<Triangle> {
    match &node.body {
        Body::Empty => Ok(Triangle::empty()),
        Body::Rings(rings) if rings.len() == 1 => {
            let mut coords = to_coords(&rings[0], node)?.into_iter();
            match (coords.next(), coords.next(), coords.next()) {
                (Some(a), Some(b), Some(c)) => Ok(Triangle::new(a, b, c)),
                _ => Err(GeoExactError::ContractViolation(
                    "Triangle needs at least 3 points".to_string(),
                )),
            }
        }
        _ => Err(malformed(node)),
    }
}

fn to_surface(node: &Node<'_>) -> Result<PolyhedralSurface> {
    Ok(PolyhedralSurface::new(
        members(node).iter().map(to_polygon).collect::<Result<_>>()?,
    ))
}

fn to_solid(node: &Node<'_>) -> Result<Solid> {
    let mut shells = members(node).iter().map(to_surface);
    let Some(exterior) = shells.next() else {
        return Ok(Solid::empty());
    };
    let mut solid = Solid::from_exterior_shell(exterior?);
    for shell in shells {
        solid.add_interior_shell(shell?)?;
    }
    Ok(solid)
}

fn node_to_exact(node: &Node<'_>) -> Result<Geometry> {
    let collection_kind = match node.tag {
        Tag::Point => {
            return match &node.body {
                Body::Empty => Ok(Point::empty().into()),
                Body::Coords(c) if c.len() == 1 => Ok(Point::new(to_coord(&c[0], node)?).into()),
                _ => Err(malformed(node)),
            }
        }
        Tag::LineString => {
            return match &node.body {
                Body::Empty => Ok(LineString::empty().into()),
                Body::Coords(c) => Ok(LineString::new(to_coords(c, node)?).into()),
                _ => Err(malformed(node)),
            }
        }
        Tag::Polygon => return Ok(to_polygon(node)?.into()),
        Tag::Triangle => return Ok(to_triangle(node)?.into()),
        Tag::PolyhedralSurface => return Ok(to_surface(node)?.into()),
        Tag::Tin => {
            let triangles = members(node).iter().map(to_triangle).collect::<Result<_>>()?;
            return Ok(TriangulatedSurface::new(triangles).into());
        }
        Tag::Solid => return Ok(to_solid(node)?.into()),
        Tag::MultiPoint => CollectionKind::MultiPoint,
        Tag::MultiLineString => CollectionKind::MultiLineString,
        Tag::MultiPolygon => CollectionKind::MultiPolygon,
        Tag::MultiSolid => CollectionKind::MultiSolid,
        Tag::GeometryCollection => CollectionKind::GeometryCollection,
        Tag::CircularString
        | Tag::CompoundCurve
        | Tag::CurvePolygon
        | Tag::MultiCurve
        | Tag::MultiSurface => {
            return Err(GeoExactError::UnsupportedGeometryType(
                node.tag.keyword().to_string(),
            ))
        }
    };

    let mut collection = GeometryCollection::new(collection_kind);
    for member in members(node) {
        collection.add_geometry(node_to_exact(member)?)?;
    }
    Ok(collection.into())
}

/// Parse extended WKT into a Model B geometry with its SRID.
///
/// Numbers are read exactly: `1/3`, `0.1` and `1e-3` all keep their decimal value. M
/// ordinates are dropped. Curved types fail with
/// [`GeoExactError::UnsupportedGeometryType`].
pub fn read_exact(s: &str, max_depth: usize) -> Result<PreparedGeometry> {
    let doc = parse(s, max_depth)?;
    Ok(PreparedGeometry {
        geometry: node_to_exact(&doc.root)?,
        srid: doc.srid.unwrap_or(SRID_UNKNOWN),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::exact::{scalar_from_int, GeometryKind, GeometryTrait};

    fn ratio(n: i64, d: i64) -> Scalar {
        BigRational::new(n.into(), d.into())
    }

    #[test]
    fn exact_numbers() {
        assert_eq!(parse_scalar("1/3").unwrap(), ratio(1, 3));
        assert_eq!(parse_scalar("0.1").unwrap(), ratio(1, 10));
        assert_eq!(parse_scalar("-2.5e-1").unwrap(), ratio(-1, 4));
        assert_eq!(parse_scalar("12E2").unwrap(), scalar_from_int(1200));
        assert_eq!(parse_scalar(".5").unwrap(), ratio(1, 2));
        assert_eq!(parse_scalar("-.5").unwrap(), ratio(-1, 2));
        assert_eq!(parse_scalar("3.").unwrap(), scalar_from_int(3));
        for bad in ["1/0", "1e99999", "1.2.3", "--1", "e5", "-", "1/2/3"] {
            assert!(parse_scalar(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn triangle_keeps_exact_z() {
        let g = read_exact("SRID=2154;TRIANGLE Z ((0 0 0,1 0 0,0 1 1,0 0 0))", 8).unwrap();
        assert_eq!(g.srid, 2154);
        let Geometry::Triangle(t) = g.geometry else {
            panic!("expected triangle")
        };
        assert_eq!(t.vertices().unwrap()[2].z, Some(scalar_from_int(1)));
    }

    #[test]
    fn solid_with_cavity() {
        let g = read_exact(
            "SOLID Z ((((0 0 0,0 3 0,3 3 0,3 0 0,0 0 0))),(((1 1 1,1 2 1,2 2 1,2 1 1,1 1 1))))",
            8,
        )
        .unwrap();
        let Geometry::Solid(s) = g.geometry else {
            panic!("expected solid")
        };
        assert_eq!(s.num_shells(), 2);
        assert_eq!(s.shells()[1].num_polygons(), 1);
    }

    #[test]
    fn m_is_dropped() {
        let g = read_exact("POINT ZM (1 2 3 4)", 8).unwrap();
        let Geometry::Point(p) = g.geometry else {
            panic!("expected point")
        };
        assert_eq!(p.coord().unwrap().z, Some(scalar_from_int(3)));
        let g = read_exact("POINT M (1 2 3)", 8).unwrap();
        assert!(!g.geometry.is_3d());
    }

    #[test]
    fn typed_and_empty_collections() {
        let g = read_exact("MULTISOLID EMPTY", 8).unwrap();
        assert_eq!(g.geometry.geometry_kind(), GeometryKind::MultiSolid);
        assert!(g.geometry.is_empty());

        let g = read_exact("GEOMETRYCOLLECTION(POINT(1 2),TIN EMPTY)", 8).unwrap();
        let Geometry::Collection(c) = g.geometry else {
            panic!("expected collection")
        };
        assert_eq!(c.geometries()[1].geometry_kind(), GeometryKind::TriangulatedSurface);
    }

    #[test]
    fn curves_unsupported() {
        assert!(matches!(
            read_exact("CIRCULARSTRING(0 0,1 1,2 0)", 8),
            Err(GeoExactError::UnsupportedGeometryType(_))
        ));
    }
}
