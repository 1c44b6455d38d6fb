use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use num_bigint::{BigInt, BigUint, Sign};
use num_rational::BigRational;
use num_traits::Zero;

use crate::error::{GeoExactError, Result};
use crate::exact::{
    CollectionKind, Coord, Geometry, GeometryCollection, GeometryKind, LineString, Point, Polygon,
    PolyhedralSurface, PreparedGeometry, Scalar, Solid, Triangle, TriangulatedSurface,
};
use crate::io::binary::{MAGIC, VERSION};

fn invalid(msg: impl Into<String>) -> GeoExactError {
    GeoExactError::Deserialization(msg.into())
}

struct Reader<'a> {
    cursor: Cursor<&'a [u8]>,
    max_depth: usize,
}

impl<'a> Reader<'a> {
    fn remaining(&self) -> usize {
        let len = self.cursor.get_ref().len() as u64;
        len.saturating_sub(self.cursor.position()) as usize
    }

    /// A length prefix, checked against the bytes left assuming `min_size` bytes per item.
    fn read_len(&mut self, min_size: usize) -> Result<usize> {
        let len = self.cursor.read_u32::<LittleEndian>()? as usize;
        if len.saturating_mul(min_size) > self.remaining() {
            return Err(invalid(format!(
                "length {len} exceeds the remaining {} bytes",
                self.remaining()
            )));
        }
        Ok(len)
    }

    fn read_bytes(&mut self) -> Result<Vec<u8>> {
        let len = self.read_len(1)?;
        let mut buf = vec![0; len];
        self.cursor.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn read_scalar(&mut self) -> Result<Scalar> {
        let numer = BigInt::from_signed_bytes_le(&self.read_bytes()?);
        let denom = BigUint::from_bytes_le(&self.read_bytes()?);
        if denom.is_zero() {
            return Err(invalid("zero denominator"));
        }
        Ok(BigRational::new(numer, BigInt::from_biguint(Sign::Plus, denom)))
    }

    fn read_coord(&mut self) -> Result<Coord> {
        let dim = self.cursor.read_u8()?;
        let x = self.read_scalar()?;
        let y = self.read_scalar()?;
        let z = match dim {
            2 => None,
            3 => Some(self.read_scalar()?),
            other => return Err(invalid(format!("invalid coordinate dimension {other}"))),
        };
        Ok(Coord { x, y, z })
    }

    fn read_flag(&mut self) -> Result<bool> {
        match self.cursor.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(invalid(format!("invalid presence flag {other}"))),
        }
    }

    fn read_line_string(&mut self) -> Result<LineString> {
        let n = self.read_len(MIN_COORD_SIZE)?;
        let coords = (0..n).map(|_| self.read_coord()).collect::<Result<_>>()?;
        Ok(LineString::new(coords))
    }

    fn read_polygon(&mut self) -> Result<Polygon> {
        let n = self.read_len(4)?;
        let mut rings = (0..n).map(|_| self.read_line_string());
        let Some(exterior) = rings.next() else {
            return Ok(Polygon::empty());
        };
        let mut polygon = Polygon::from_exterior_ring(exterior?);
        for ring in rings {
            polygon.add_interior_ring(ring?)?;
        }
        Ok(polygon)
    }

    fn read_triangle(&mut self) -> Result<Triangle> {
        if !self.read_flag()? {
            return Ok(Triangle::empty());
        }
        Ok(Triangle::new(
            self.read_coord()?,
            self.read_coord()?,
            self.read_coord()?,
        ))
    }

    fn read_surface(&mut self) -> Result<PolyhedralSurface> {
        let n = self.read_len(4)?;
        let polygons = (0..n).map(|_| self.read_polygon()).collect::<Result<_>>()?;
        Ok(PolyhedralSurface::new(polygons))
    }

    fn read_document(&mut self) -> Result<PreparedGeometry> {
        let len = self.cursor.read_u32::<LittleEndian>()? as usize;
        if len != self.remaining() {
            return Err(invalid(format!(
                "blob announces {len} bytes, {} present",
                self.remaining()
            )));
        }
        let mut magic = [0u8; 3];
        self.cursor.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(invalid("not an exact geometry blob"));
        }
        let version = self.cursor.read_u8()?;
        if version != VERSION {
            return Err(invalid(format!("unsupported blob version {version}")));
        }
        let srid = self.cursor.read_i32::<LittleEndian>()?;
        let geometry = self.read_geometry(0)?;
        if self.remaining() != 0 {
            return Err(invalid(format!(
                "{} trailing bytes after geometry",
                self.remaining()
            )));
        }
        Ok(PreparedGeometry { geometry, srid })
    }

    fn read_geometry(&mut self, depth: usize) -> Result<Geometry> {
        if depth > self.max_depth {
            return Err(GeoExactError::NestingTooDeep(self.max_depth));
        }
        let id = self.cursor.read_u8()?;
        let kind = GeometryKind::try_from(id)
            .map_err(|_| invalid(format!("unknown geometry kind {id}")))?;

        let collection_kind = match kind {
            GeometryKind::Point => {
                if !self.read_flag()? {
                    return Ok(Point::empty().into());
                }
                return Ok(Point::new(self.read_coord()?).into());
            }
            GeometryKind::LineString => return Ok(self.read_line_string()?.into()),
            GeometryKind::Polygon => return Ok(self.read_polygon()?.into()),
            GeometryKind::Triangle => return Ok(self.read_triangle()?.into()),
            GeometryKind::PolyhedralSurface => return Ok(self.read_surface()?.into()),
            GeometryKind::TriangulatedSurface => {
                let n = self.read_len(1)?;
                let triangles = (0..n)
                    .map(|_| self.read_triangle())
                    .collect::<Result<_>>()?;
                return Ok(TriangulatedSurface::new(triangles).into());
            }
            GeometryKind::Solid => {
                let n = self.read_len(4)?;
                let mut shells = (0..n).map(|_| self.read_surface());
                let Some(exterior) = shells.next() else {
                    return Ok(Solid::empty().into());
                };
                let mut solid = Solid::from_exterior_shell(exterior?);
                for shell in shells {
                    solid.add_interior_shell(shell?)?;
                }
                return Ok(solid.into());
            }
            GeometryKind::MultiPoint => CollectionKind::MultiPoint,
            GeometryKind::MultiLineString => CollectionKind::MultiLineString,
            GeometryKind::MultiPolygon => CollectionKind::MultiPolygon,
            GeometryKind::MultiSolid => CollectionKind::MultiSolid,
            GeometryKind::GeometryCollection => CollectionKind::GeometryCollection,
            other => return Err(GeoExactError::UnsupportedGeometryType(other.name().into())),
        };

        let n = self.read_len(2)?;
        let mut collection = GeometryCollection::new(collection_kind);
        for _ in 0..n {
            let member = self.read_geometry(depth + 1)?;
            collection
                .add_geometry(member)
                .map_err(|e| invalid(e.to_string()))?;
        }
        Ok(collection.into())
    }
}

/// Smallest encoding of one coordinate: dimension byte and two empty scalars.
const MIN_COORD_SIZE: usize = 1 + 2 * 8;

/// Parse a prepared geometry from the exact binary layout.
pub fn read_prepared(buf: &[u8], max_depth: usize) -> Result<PreparedGeometry> {
    let mut reader = Reader {
        cursor: Cursor::new(buf),
        max_depth,
    };
    reader.read_document().map_err(|e| match e {
        GeoExactError::IOError(e) => invalid(format!("truncated exact blob: {e}")),
        other => other,
    })
}
