use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::error::{GeoExactError, Result};
use crate::io::serialized::{FLAG_M, FLAG_SOLID, FLAG_Z, HEADER_SIZE, SRID_MAX, SRID_MIN};
use crate::simple::{Dimension, PointArray, SfGeometry};

/// The flag byte of a geometry: Z, M and solid bits.
pub fn geometry_flags(geom: &SfGeometry) -> u8 {
    let dim = geom.dim();
    let mut flags = 0;
    if dim.has_z() {
        flags |= FLAG_Z;
    }
    if dim.has_m() {
        flags |= FLAG_M;
    }
    if geom.is_solid() {
        flags |= FLAG_SOLID;
    }
    flags
}

fn write_count(writer: &mut impl Write, count: usize) -> Result<()> {
    let count = u32::try_from(count).map_err(|_| GeoExactError::Overflow)?;
    writer.write_u32::<LittleEndian>(count)?;
    Ok(())
}

fn write_coords(writer: &mut impl Write, points: &PointArray, dim: Dimension) -> Result<()> {
    for p in points.iter() {
        writer.write_f64::<LittleEndian>(p.x)?;
        writer.write_f64::<LittleEndian>(p.y)?;
        if dim.has_z() {
            writer.write_f64::<LittleEndian>(p.z)?;
        }
        if dim.has_m() {
            writer.write_f64::<LittleEndian>(p.m)?;
        }
    }
    Ok(())
}

fn write_point_array(
    writer: &mut impl Write,
    points: Option<&PointArray>,
    dim: Dimension,
) -> Result<()> {
    match points {
        Some(points) => {
            write_count(writer, points.len())?;
            write_coords(writer, points, dim)
        }
        None => write_count(writer, 0),
    }
}

fn write_body(writer: &mut impl Write, geom: &SfGeometry) -> Result<()> {
    let type_id: u8 = geom.type_id().into();
    let type_word = u32::from(type_id) | (u32::from(geometry_flags(geom)) << 8);
    writer.write_u32::<LittleEndian>(type_word)?;

    match geom {
        SfGeometry::Point(g) => write_point_array(writer, g.points.as_ref(), g.dim),
        SfGeometry::LineString(g) | SfGeometry::CircularString(g) => {
            write_point_array(writer, g.points.as_ref(), g.dim)
        }
        SfGeometry::Triangle(g) => write_point_array(writer, g.points.as_ref(), g.dim),
        SfGeometry::Polygon(g) => {
            write_count(writer, g.rings.len())?;
            for ring in &g.rings {
                write_count(writer, ring.len())?;
            }
            // keep the coordinates 8-byte aligned
            if g.rings.len() % 2 == 1 {
                writer.write_u32::<LittleEndian>(0)?;
            }
            for ring in &g.rings {
                write_coords(writer, ring, g.dim)?;
            }
            Ok(())
        }
        SfGeometry::Collection(g) => {
            write_count(writer, g.geoms.len())?;
            for member in &g.geoms {
                write_body(writer, member)?;
            }
            Ok(())
        }
    }
}

/// Write a geometry in the native Model A byte layout.
///
/// The header holds the total length, the SRID packed into 21 signed bits and the flag
/// byte of the top-level geometry.
pub fn write_geometry<W: Write>(mut writer: W, geom: &SfGeometry) -> Result<()> {
    let srid = geom.srid();
    if !(SRID_MIN..=SRID_MAX).contains(&srid) {
        return Err(GeoExactError::InvalidArgument(format!(
            "SRID {srid} does not fit the serialized header"
        )));
    }

    let mut body = vec![];
    write_body(&mut body, geom)?;
    let size = u32::try_from(HEADER_SIZE + body.len()).map_err(|_| GeoExactError::Overflow)?;

    writer.write_u32::<LittleEndian>(size)?;
    writer.write_u24::<LittleEndian>((srid as u32) & 0x001F_FFFF)?;
    writer.write_u8(geometry_flags(geom))?;
    writer.write_all(&body)?;
    Ok(())
}

/// The native Model A encoding of a geometry as a new buffer.
pub fn to_bytes(geom: &SfGeometry) -> Result<Vec<u8>> {
    let mut buf = vec![];
    write_geometry(&mut buf, geom)?;
    Ok(buf)
}
