use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{GeoExactError, Result};
use crate::io::serialized::{FLAG_M, FLAG_SOLID, FLAG_Z, HEADER_SIZE};
use crate::simple::{
    Dimension, Point4D, PointArray, SfCollection, SfGeometry, SfLineString, SfPoint, SfPolygon,
    SfTriangle, SfType, SRID_UNKNOWN,
};

struct Reader<'a> {
    cursor: Cursor<&'a [u8]>,
    max_depth: usize,
}

impl<'a> Reader<'a> {
    fn remaining(&self) -> usize {
        let len = self.cursor.get_ref().len() as u64;
        len.saturating_sub(self.cursor.position()) as usize
    }

    /// Reads a count and checks that `count * min_size` bytes are still available.
    fn read_count(&mut self, min_size: usize) -> Result<usize> {
        let count = self.cursor.read_u32::<LittleEndian>()? as usize;
        if count.saturating_mul(min_size) > self.remaining() {
            return Err(GeoExactError::Deserialization(format!(
                "count {count} exceeds the remaining {} bytes",
                self.remaining()
            )));
        }
        Ok(count)
    }

    fn read_coords(&mut self, count: usize, dim: Dimension) -> Result<PointArray> {
        let mut points = PointArray::with_capacity(dim, count);
        for _ in 0..count {
            let mut p = Point4D::new_2d(
                self.cursor.read_f64::<LittleEndian>()?,
                self.cursor.read_f64::<LittleEndian>()?,
            );
            if dim.has_z() {
                p.z = self.cursor.read_f64::<LittleEndian>()?;
            }
            if dim.has_m() {
                p.m = self.cursor.read_f64::<LittleEndian>()?;
            }
            points.push(p);
        }
        Ok(points)
    }

    fn read_point_array(&mut self, dim: Dimension) -> Result<Option<PointArray>> {
        let count = self.read_count(dim.size() * 8)?;
        if count == 0 {
            return Ok(None);
        }
        Ok(Some(self.read_coords(count, dim)?))
    }

    fn read_body(&mut self, srid: i32, depth: usize) -> Result<SfGeometry> {
        if depth > self.max_depth {
            return Err(GeoExactError::NestingTooDeep(self.max_depth));
        }
        let type_word = self.cursor.read_u32::<LittleEndian>()?;
        let type_id = SfType::try_from((type_word & 0xff) as u8).map_err(|_| {
            GeoExactError::Deserialization(format!("unknown type id {}", type_word & 0xff))
        })?;
        let flags = ((type_word >> 8) & 0xff) as u8;
        let dim = Dimension::from_flags(flags & FLAG_Z != 0, flags & FLAG_M != 0);

        let geom = match type_id {
            SfType::Point => {
                let points = self.read_point_array(dim)?;
                if points.as_ref().is_some_and(|p| p.len() > 1) {
                    return Err(GeoExactError::Deserialization(
                        "point with more than one position".to_string(),
                    ));
                }
                SfGeometry::Point(SfPoint { srid, dim, points })
            }
            SfType::LineString => SfGeometry::LineString(SfLineString {
                srid,
                dim,
                points: self.read_point_array(dim)?,
            }),
            SfType::CircularString => SfGeometry::CircularString(SfLineString {
                srid,
                dim,
                points: self.read_point_array(dim)?,
            }),
            SfType::Triangle => SfGeometry::Triangle(SfTriangle {
                srid,
                dim,
                points: self.read_point_array(dim)?,
            }),
            SfType::Polygon => {
                let num_rings = self.read_count(4)?;
                let counts = (0..num_rings)
                    .map(|_| self.read_count(0))
                    .collect::<Result<Vec<_>>>()?;
                if num_rings % 2 == 1 {
                    self.cursor.read_u32::<LittleEndian>()?;
                }
                let stride = dim.size() * 8;
                let needed = counts
                    .iter()
                    .try_fold(0usize, |acc, n| acc.checked_add(n.checked_mul(stride)?));
                if needed.map_or(true, |n| n > self.remaining()) {
                    return Err(GeoExactError::Deserialization(
                        "polygon rings exceed the buffer".to_string(),
                    ));
                }
                let rings = counts
                    .into_iter()
                    .map(|n| self.read_coords(n, dim))
                    .collect::<Result<_>>()?;
                SfGeometry::Polygon(SfPolygon { srid, dim, rings })
            }
            collection => {
                let count = self.read_count(8)?;
                let mut out = SfCollection::new(collection, srid, dim);
                out.solid = flags & FLAG_SOLID != 0;
                for _ in 0..count {
                    out.geoms.push(self.read_body(SRID_UNKNOWN, depth + 1)?);
                }
                SfGeometry::Collection(out)
            }
        };
        Ok(geom)
    }
}

fn sign_extend_srid(raw: u32) -> i32 {
    if raw & 0x0010_0000 != 0 {
        (raw | 0xFFE0_0000) as i32
    } else {
        raw as i32
    }
}

/// Parse a geometry from the native Model A byte layout.
pub fn read_geometry(buf: &[u8], max_depth: usize) -> Result<SfGeometry> {
    if buf.len() < HEADER_SIZE {
        return Err(GeoExactError::Deserialization(format!(
            "serialized geometry needs at least {HEADER_SIZE} bytes, got {}",
            buf.len()
        )));
    }
    let mut reader = Reader {
        cursor: Cursor::new(buf),
        max_depth,
    };
    let size = reader.cursor.read_u32::<LittleEndian>()? as usize;
    if size != buf.len() {
        return Err(GeoExactError::Deserialization(format!(
            "header announces {size} bytes, buffer holds {}",
            buf.len()
        )));
    }
    let srid = sign_extend_srid(reader.cursor.read_u24::<LittleEndian>()?);
    let _flags = reader.cursor.read_u8()?;

    let geom = reader.read_body(srid, 0).map_err(|e| match e {
        GeoExactError::IOError(e) => {
            GeoExactError::Deserialization(format!("truncated geometry: {e}"))
        }
        other => other,
    })?;
    if reader.remaining() != 0 {
        return Err(GeoExactError::Deserialization(format!(
            "{} trailing bytes after geometry",
            reader.remaining()
        )));
    }
    Ok(geom)
}
