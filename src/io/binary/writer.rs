use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::error::{GeoExactError, Result};
use crate::exact::{
    Coord, Geometry, GeometryTrait, LineString, Polygon, PolyhedralSurface, PreparedGeometry,
    Scalar, Triangle,
};
use crate::io::binary::{MAGIC, VERSION};

fn write_len(writer: &mut impl Write, len: usize) -> Result<()> {
    let len = u32::try_from(len).map_err(|_| GeoExactError::Overflow)?;
    writer.write_u32::<LittleEndian>(len)?;
    Ok(())
}

fn write_bytes(writer: &mut impl Write, bytes: &[u8]) -> Result<()> {
    write_len(writer, bytes.len())?;
    writer.write_all(bytes)?;
    Ok(())
}

fn write_scalar(writer: &mut impl Write, value: &Scalar) -> Result<()> {
    write_bytes(writer, &value.numer().to_signed_bytes_le())?;
    write_bytes(writer, &value.denom().to_bytes_le().1)
}

fn write_coord(writer: &mut impl Write, coord: &Coord) -> Result<()> {
    writer.write_u8(if coord.is_3d() { 3 } else { 2 })?;
    write_scalar(writer, &coord.x)?;
    write_scalar(writer, &coord.y)?;
    if let Some(z) = &coord.z {
        write_scalar(writer, z)?;
    }
    Ok(())
}

fn write_line_string(writer: &mut impl Write, line: &LineString) -> Result<()> {
    write_len(writer, line.num_points())?;
    line.coords().iter().try_for_each(|c| write_coord(writer, c))
}

fn write_polygon(writer: &mut impl Write, polygon: &Polygon) -> Result<()> {
    write_len(writer, polygon.rings().len())?;
    polygon
        .rings()
        .iter()
        .try_for_each(|r| write_line_string(writer, r))
}

fn write_triangle(writer: &mut impl Write, triangle: &Triangle) -> Result<()> {
    match triangle.vertices() {
        Some(vertices) => {
            writer.write_u8(1)?;
            vertices.iter().try_for_each(|c| write_coord(writer, c))
        }
        None => Ok(writer.write_u8(0)?),
    }
}

fn write_surface(writer: &mut impl Write, surface: &PolyhedralSurface) -> Result<()> {
    write_len(writer, surface.num_polygons())?;
    surface
        .polygons()
        .iter()
        .try_for_each(|p| write_polygon(writer, p))
}

fn write_body(writer: &mut impl Write, geom: &Geometry) -> Result<()> {
    writer.write_u8(geom.geometry_kind().into())?;
    match geom {
        Geometry::Point(p) => match p.coord() {
            Some(c) => {
                writer.write_u8(1)?;
                write_coord(writer, c)
            }
            None => Ok(writer.write_u8(0)?),
        },
        Geometry::LineString(l) => write_line_string(writer, l),
        Geometry::Polygon(p) => write_polygon(writer, p),
        Geometry::Triangle(t) => write_triangle(writer, t),
        Geometry::PolyhedralSurface(s) => write_surface(writer, s),
        Geometry::TriangulatedSurface(t) => {
            write_len(writer, t.num_triangles())?;
            t.triangles()
                .iter()
                .try_for_each(|t| write_triangle(writer, t))
        }
        Geometry::Solid(s) => {
            write_len(writer, s.num_shells())?;
            s.shells().iter().try_for_each(|s| write_surface(writer, s))
        }
        Geometry::Collection(c) => {
            write_len(writer, c.len())?;
            c.geometries()
                .iter()
                .try_for_each(|g| write_body(writer, g))
        }
    }
}

/// Write a prepared geometry in the exact binary layout.
pub fn write_prepared<W: Write>(mut writer: W, prepared: &PreparedGeometry) -> Result<()> {
    let mut payload = Vec::from(MAGIC);
    payload.write_u8(VERSION)?;
    payload.write_i32::<LittleEndian>(prepared.srid)?;
    write_body(&mut payload, &prepared.geometry)?;

    write_len(&mut writer, payload.len())?;
    writer.write_all(&payload)?;
    Ok(())
}

/// The exact binary encoding of a prepared geometry as a new buffer.
pub fn to_exact_bytes(prepared: &PreparedGeometry) -> Result<Vec<u8>> {
    let mut buf = vec![];
    write_prepared(&mut buf, prepared)?;
    Ok(buf)
}
