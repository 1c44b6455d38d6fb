//! Extended WKT parsing shared by both models.
//!
//! Text is first parsed into a model-neutral [`Node`] tree that keeps every number as
//! its source text. [`simple`] and [`exact`] then interpret the numbers as `f64` or as
//! exact rationals.

pub(crate) mod exact;
pub(crate) mod simple;

use crate::error::{GeoExactError, Result};
use crate::simple::Dimension;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tag {
    Point,
    LineString,
    CircularString,
    Polygon,
    Triangle,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
    CompoundCurve,
    CurvePolygon,
    MultiCurve,
    MultiSurface,
    PolyhedralSurface,
    Tin,
    Solid,
    MultiSolid,
}

impl Tag {
    fn from_word(word: &str) -> Option<Self> {
        let tag = match word.to_ascii_uppercase().as_str() {
            "POINT" => Tag::Point,
            "LINESTRING" => Tag::LineString,
            "CIRCULARSTRING" => Tag::CircularString,
            "POLYGON" => Tag::Polygon,
            "TRIANGLE" => Tag::Triangle,
            "MULTIPOINT" => Tag::MultiPoint,
            "MULTILINESTRING" => Tag::MultiLineString,
            "MULTIPOLYGON" => Tag::MultiPolygon,
            "GEOMETRYCOLLECTION" => Tag::GeometryCollection,
            "COMPOUNDCURVE" => Tag::CompoundCurve,
            "CURVEPOLYGON" => Tag::CurvePolygon,
            "MULTICURVE" => Tag::MultiCurve,
            "MULTISURFACE" => Tag::MultiSurface,
            "POLYHEDRALSURFACE" => Tag::PolyhedralSurface,
            "TIN" => Tag::Tin,
            "SOLID" => Tag::Solid,
            "MULTISOLID" => Tag::MultiSolid,
            _ => return None,
        };
        Some(tag)
    }

    pub(crate) fn keyword(&self) -> &'static str {
        match self {
            Tag::Point => "POINT",
            Tag::LineString => "LINESTRING",
            Tag::CircularString => "CIRCULARSTRING",
            Tag::Polygon => "POLYGON",
            Tag::Triangle => "TRIANGLE",
            Tag::MultiPoint => "MULTIPOINT",
            Tag::MultiLineString => "MULTILINESTRING",
            Tag::MultiPolygon => "MULTIPOLYGON",
            Tag::GeometryCollection => "GEOMETRYCOLLECTION",
            Tag::CompoundCurve => "COMPOUNDCURVE",
            Tag::CurvePolygon => "CURVEPOLYGON",
            Tag::MultiCurve => "MULTICURVE",
            Tag::MultiSurface => "MULTISURFACE",
            Tag::PolyhedralSurface => "POLYHEDRALSURFACE",
            Tag::Tin => "TIN",
            Tag::Solid => "SOLID",
            Tag::MultiSolid => "MULTISOLID",
        }
    }

    /// The member type written without a tag inside this collection, and whether
    /// tagged members are accepted as well.
    pub(crate) fn implicit_member(&self) -> Option<(Tag, bool)> {
        match self {
            Tag::MultiPoint => Some((Tag::Point, false)),
            Tag::MultiLineString => Some((Tag::LineString, false)),
            Tag::MultiPolygon | Tag::PolyhedralSurface => Some((Tag::Polygon, false)),
            Tag::Tin => Some((Tag::Triangle, false)),
            Tag::Solid => Some((Tag::PolyhedralSurface, false)),
            Tag::MultiSolid => Some((Tag::Solid, false)),
            Tag::CompoundCurve | Tag::CurvePolygon | Tag::MultiCurve => {
                Some((Tag::LineString, true))
            }
            Tag::MultiSurface => Some((Tag::Polygon, true)),
            Tag::Point
            | Tag::LineString
            | Tag::CircularString
            | Tag::Polygon
            | Tag::Triangle
            | Tag::GeometryCollection => None,
        }
    }
}

/// The ordinates of one position, as written.
pub(crate) type RawCoord<'a> = Vec<&'a str>;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Body<'a> {
    Empty,
    Coords(Vec<RawCoord<'a>>),
    Rings(Vec<Vec<RawCoord<'a>>>),
    Members(Vec<Node<'a>>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Node<'a> {
    pub tag: Tag,
    pub dim: Dimension,
    pub body: Body<'a>,
    tagged: bool,
}

/// A parsed EWKT document.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Document<'a> {
    pub srid: Option<i32>,
    pub root: Node<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token<'a> {
    Word(&'a str),
    Number(&'a str),
    LParen,
    RParen,
    Comma,
}

fn wkt_error(msg: impl Into<String>) -> GeoExactError {
    GeoExactError::Deserialization(format!("WKT: {}", msg.into()))
}

fn tokenize(s: &str) -> Result<Vec<Token<'_>>> {
    let bytes = s.as_bytes();
    let mut tokens = vec![];
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'(' => tokens.push(Token::LParen),
            b')' => tokens.push(Token::RParen),
            b',' => tokens.push(Token::Comma),
            b if b.is_ascii_whitespace() => {}
            b if b.is_ascii_alphabetic() => {
                let start = i;
                while i + 1 < bytes.len() && bytes[i + 1].is_ascii_alphabetic() {
                    i += 1;
                }
                tokens.push(Token::Word(&s[start..=i]));
            }
            b if b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.') => {
                let start = i;
                while i + 1 < bytes.len()
                    && (bytes[i + 1].is_ascii_digit()
                        || matches!(bytes[i + 1], b'.' | b'e' | b'E' | b'+' | b'-' | b'/'))
                {
                    i += 1;
                }
                tokens.push(Token::Number(&s[start..=i]));
            }
            _ => {
                let c = s[i..].chars().next().unwrap_or(char::REPLACEMENT_CHARACTER);
                return Err(wkt_error(format!(
                    "unexpected character {c:?} at offset {i}"
                )));
            }
        }
        i += 1;
    }
    Ok(tokens)
}

/// Split an optional `SRID=<n>;` prefix from the geometry text.
fn split_srid(s: &str) -> Result<(Option<i32>, &str)> {
    let trimmed = s.trim_start();
    if trimmed.len() >= 5 && trimmed[..5].eq_ignore_ascii_case("SRID=") {
        let (prefix, rest) = trimmed
            .split_once(';')
            .ok_or_else(|| wkt_error("SRID prefix without ';'"))?;
        let srid = prefix[5..]
            .trim()
            .parse::<i32>()
            .map_err(|e| wkt_error(format!("invalid SRID: {e}")))?;
        Ok((Some(srid), rest))
    } else {
        Ok((None, trimmed))
    }
}

fn dim_from_marker(word: &str) -> Option<Dimension> {
    match word.to_ascii_uppercase().as_str() {
        "Z" => Some(Dimension::XYZ),
        "M" => Some(Dimension::XYM),
        "ZM" => Some(Dimension::XYZM),
        _ => None,
    }
}

/// A tag word, optionally with the dimension marker glued on, e.g. `POINTZ`.
fn split_tag_word(word: &str) -> Option<(Tag, Option<Dimension>)> {
    if let Some(tag) = Tag::from_word(word) {
        return Some((tag, None));
    }
    ["ZM", "Z", "M"].into_iter().find_map(|suffix| {
        let len = word.len().checked_sub(suffix.len())?;
        if !word[len..].eq_ignore_ascii_case(suffix) {
            return None;
        }
        Some((Tag::from_word(&word[..len])?, dim_from_marker(suffix)))
    })
}

fn dim_from_count(count: usize, marker: Option<Dimension>) -> Option<Dimension> {
    match (count, marker) {
        (n, Some(dim)) if n == dim.size() => Some(dim),
        (_, Some(_)) => None,
        (2, None) => Some(Dimension::XY),
        (3, None) => Some(Dimension::XYZ),
        (4, None) => Some(Dimension::XYZM),
        _ => None,
    }
}

struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Result<Token<'a>> {
        let token = self
            .peek()
            .ok_or_else(|| wkt_error("unexpected end of input"))?;
        self.pos += 1;
        Ok(token)
    }

    fn expect(&mut self, expected: Token<'static>) -> Result<()> {
        let token = self.next()?;
        if token != expected {
            return Err(wkt_error(format!("expected {expected:?}, found {token:?}")));
        }
        Ok(())
    }

    fn peek_empty(&self) -> bool {
        matches!(self.peek(), Some(Token::Word(w)) if w.eq_ignore_ascii_case("EMPTY"))
    }

    /// Parses `TAG [Z|M|ZM] (EMPTY | body)`.
    fn parse_tagged(&mut self, depth: usize, inherited: Option<Dimension>) -> Result<Node<'a>> {
        if depth > self.max_depth {
            return Err(GeoExactError::NestingTooDeep(self.max_depth));
        }
        let word = match self.next()? {
            Token::Word(w) => w,
            other => return Err(wkt_error(format!("expected geometry tag, found {other:?}"))),
        };
        let (tag, mut marker) =
            split_tag_word(word).ok_or_else(|| wkt_error(format!("unknown tag {word}")))?;
        if marker.is_none() {
            if let Some(Token::Word(w)) = self.peek() {
                if let Some(dim) = dim_from_marker(w) {
                    marker = Some(dim);
                    self.pos += 1;
                }
            }
        }
        let mut dim = marker.or(inherited);
        let explicit = dim;
        let mut node = self.parse_body(tag, depth, &mut dim, explicit)?;
        node.tagged = true;
        let dim = dim.unwrap_or_default();
        fix_dims(&mut node, dim);
        Ok(node)
    }

    fn parse_coord(&mut self, dim: &mut Option<Dimension>) -> Result<RawCoord<'a>> {
        let mut coord = vec![];
        while let Some(Token::Number(n)) = self.peek() {
            coord.push(n);
            self.pos += 1;
        }
        match dim {
            Some(d) if d.size() == coord.len() => {}
            Some(d) => {
                return Err(wkt_error(format!(
                    "expected {} ordinates, found {}",
                    d.size(),
                    coord.len()
                )))
            }
            None => {
                *dim = Some(dim_from_count(coord.len(), None).ok_or_else(|| {
                    wkt_error(format!("invalid ordinate count {}", coord.len()))
                })?)
            }
        }
        Ok(coord)
    }

    /// `( coord {, coord} )`
    fn parse_coord_list(&mut self, dim: &mut Option<Dimension>) -> Result<Vec<RawCoord<'a>>> {
        self.expect(Token::LParen)?;
        let mut coords = vec![self.parse_coord(dim)?];
        while self.peek() == Some(Token::Comma) {
            self.pos += 1;
            coords.push(self.parse_coord(dim)?);
        }
        self.expect(Token::RParen)?;
        Ok(coords)
    }

    /// `( coord_list {, coord_list} )`
    fn parse_rings(&mut self, dim: &mut Option<Dimension>) -> Result<Vec<Vec<RawCoord<'a>>>> {
        self.expect(Token::LParen)?;
        let mut rings = vec![self.parse_coord_list(dim)?];
        while self.peek() == Some(Token::Comma) {
            self.pos += 1;
            rings.push(self.parse_coord_list(dim)?);
        }
        self.expect(Token::RParen)?;
        Ok(rings)
    }

    fn parse_body(
        &mut self,
        tag: Tag,
        depth: usize,
        dim: &mut Option<Dimension>,
        explicit: Option<Dimension>,
    ) -> Result<Node<'a>> {
        let node = |body| Node {
            tag,
            dim: Dimension::XY,
            body,
            tagged: false,
        };
        if self.peek_empty() {
            self.pos += 1;
            return Ok(node(Body::Empty));
        }
        let body = match tag {
            Tag::Point => {
                self.expect(Token::LParen)?;
                let coord = self.parse_coord(dim)?;
                self.expect(Token::RParen)?;
                Body::Coords(vec![coord])
            }
            Tag::LineString | Tag::CircularString => Body::Coords(self.parse_coord_list(dim)?),
            Tag::Polygon | Tag::Triangle => Body::Rings(self.parse_rings(dim)?),
            Tag::GeometryCollection => {
                self.expect(Token::LParen)?;
                let mut members = vec![self.parse_tagged(depth + 1, explicit)?];
                while self.peek() == Some(Token::Comma) {
                    self.pos += 1;
                    members.push(self.parse_tagged(depth + 1, explicit)?);
                }
                self.expect(Token::RParen)?;
                if dim.is_none() {
                    *dim = members.first().map(|m| m.dim);
                }
                Body::Members(members)
            }
            collection => {
                let (member_tag, allow_tagged) = collection
                    .implicit_member()
                    .ok_or_else(|| wkt_error(format!("{} has no members", tag.keyword())))?;
                self.expect(Token::LParen)?;
                let mut members = vec![];
                loop {
                    members.push(self.parse_member(
                        member_tag,
                        allow_tagged,
                        depth + 1,
                        dim,
                        explicit,
                    )?);
                    if self.peek() != Some(Token::Comma) {
                        break;
                    }
                    self.pos += 1;
                }
                self.expect(Token::RParen)?;
                Body::Members(members)
            }
        };
        Ok(node(body))
    }

    fn parse_member(
        &mut self,
        member_tag: Tag,
        allow_tagged: bool,
        depth: usize,
        dim: &mut Option<Dimension>,
        explicit: Option<Dimension>,
    ) -> Result<Node<'a>> {
        if depth > self.max_depth {
            return Err(GeoExactError::NestingTooDeep(self.max_depth));
        }
        match self.peek() {
            Some(Token::Word(w)) if !w.eq_ignore_ascii_case("EMPTY") => {
                if !allow_tagged {
                    return Err(wkt_error(format!("unexpected tag {w}")));
                }
                let member = self.parse_tagged(depth, explicit.or(*dim))?;
                if dim.is_none() {
                    *dim = Some(member.dim);
                }
                Ok(member)
            }
            // bare coordinates inside MULTIPOINT(1 2, 3 4)
            Some(Token::Number(_)) if member_tag == Tag::Point => Ok(Node {
                tag: Tag::Point,
                dim: Dimension::XY,
                body: Body::Coords(vec![self.parse_coord(dim)?]),
                tagged: false,
            }),
            _ => self.parse_body(member_tag, depth, dim, explicit),
        }
    }

    fn finish(&self) -> Result<()> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(wkt_error(format!("trailing token {token:?}"))),
        }
    }
}

/// Give implicit members the dimension of the node that owns them.
fn fix_dims(node: &mut Node<'_>, dim: Dimension) {
    node.dim = dim;
    if let Body::Members(members) = &mut node.body {
        members
            .iter_mut()
            .filter(|m| !m.tagged)
            .for_each(|m| fix_dims(m, dim));
    }
}

/// Parse EWKT text into a model-neutral document.
pub(crate) fn parse(s: &str, max_depth: usize) -> Result<Document<'_>> {
    let (srid, body) = split_srid(s)?;
    let mut parser = Parser {
        tokens: tokenize(body)?,
        pos: 0,
        max_depth,
    };
    let root = parser.parse_tagged(0, None)?;
    parser.finish()?;
    Ok(Document { srid, root })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn srid_and_marker() {
        let doc = parse("SRID=4326;POINT Z (1 2 3)", 8).unwrap();
        assert_eq!(doc.srid, Some(4326));
        assert_eq!(doc.root.tag, Tag::Point);
        assert_eq!(doc.root.dim, Dimension::XYZ);
        assert_eq!(doc.root.body, Body::Coords(vec![vec!["1", "2", "3"]]));
    }

    #[test]
    fn glued_marker_and_case() {
        let doc = parse("linestringm(1 2 3, 4 5 6)", 8).unwrap();
        assert_eq!(doc.root.tag, Tag::LineString);
        assert_eq!(doc.root.dim, Dimension::XYM);
    }

    #[test]
    fn non_ascii_character_reported_whole() {
        let err = parse("POINT(1 2é)", 8).unwrap_err();
        assert!(matches!(err, GeoExactError::Deserialization(_)));
        assert!(err.to_string().contains("'é' at offset 9"), "{err}");
    }

    #[test]
    fn dimension_inferred_from_first_coord() {
        let doc = parse("MULTIPOINT(EMPTY, (1 2 3))", 8).unwrap();
        assert_eq!(doc.root.dim, Dimension::XYZ);
        let Body::Members(members) = &doc.root.body else {
            panic!("expected members")
        };
        assert_eq!(members[0].body, Body::Empty);
        assert_eq!(members[0].dim, Dimension::XYZ);
        assert!(parse("LINESTRING(1 2, 1 2 3)", 8).is_err());
    }

    #[test]
    fn bare_multipoint_coords() {
        let doc = parse("MULTIPOINT(1 2, 3 4)", 8).unwrap();
        let Body::Members(members) = &doc.root.body else {
            panic!("expected members")
        };
        assert_eq!(members.len(), 2);
        assert_eq!(members[1].body, Body::Coords(vec![vec!["3", "4"]]));
    }

    #[test]
    fn solid_shells() {
        let doc = parse(
            "SOLID Z ((((0 0 0,0 1 0,1 0 0,0 0 0)),((0 0 0,1 0 0,0 0 1,0 0 0))),(((0 0 0,0 0 1,0 1 0,0 0 0))))",
            8,
        )
        .unwrap();
        let Body::Members(shells) = &doc.root.body else {
            panic!("expected shells")
        };
        assert_eq!(shells.len(), 2);
        assert_eq!(shells[0].tag, Tag::PolyhedralSurface);
        let Body::Members(faces) = &shells[0].body else {
            panic!("expected faces")
        };
        assert_eq!(faces.len(), 2);
    }

    #[test]
    fn collection_members_keep_their_own_dimension() {
        let doc = parse("GEOMETRYCOLLECTION(POINT(1 2),POINT Z (1 2 3))", 8).unwrap();
        let Body::Members(members) = &doc.root.body else {
            panic!("expected members")
        };
        assert_eq!(members[0].dim, Dimension::XY);
        assert_eq!(members[1].dim, Dimension::XYZ);
    }

    #[test]
    fn malformed() {
        for text in [
            "",
            "POINT",
            "POINT(1)",
            "POINT(1 2",
            "POINT(1 2) x",
            "SRID=abc;POINT(1 2)",
            "MULTIPOINT(LINESTRING(1 2,3 4))",
            "POLYGON((1 2,3 4)) POINT(1 2)",
            "CIRCLE(1 2)",
        ] {
            assert!(parse(text, 8).is_err(), "{text}");
        }
    }

    #[test]
    fn depth_limit() {
        let text = "GEOMETRYCOLLECTION(GEOMETRYCOLLECTION(GEOMETRYCOLLECTION(POINT(1 2))))";
        assert!(parse(text, 3).is_ok());
        assert!(matches!(
            parse(text, 2),
            Err(GeoExactError::NestingTooDeep(2))
        ));
    }
}
