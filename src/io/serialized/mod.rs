//! The native Model A byte layout.
//!
//! ```text
//! header  u32 total size | 3 bytes SRID (21-bit signed) | u8 flags
//! body    u32 type word (type id | flags << 8) | u32 count | payload
//! ```
//!
//! All integers and doubles are little-endian. Polygon bodies list every ring's point
//! count before the coordinates, padded to 8 bytes.

mod reader;
mod writer;

pub use reader::read_geometry;
pub use writer::{geometry_flags, to_bytes, write_geometry};

pub const FLAG_Z: u8 = 0x01;
pub const FLAG_M: u8 = 0x02;
pub const FLAG_SOLID: u8 = 0x20;

pub(crate) const HEADER_SIZE: usize = 8;
pub(crate) const SRID_MIN: i32 = -(1 << 20);
pub(crate) const SRID_MAX: i32 = (1 << 20) - 1;

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::GeoExactError;
    use crate::simple::{Dimension, Point4D, PointArray, SfGeometry, SfPoint, SfType};
    use crate::test::simple::{polygon_with_hole, solid_cube, tin};

    #[test]
    fn geometries_survive_encoding() {
        for g in [polygon_with_hole(), tin(), solid_cube()] {
            let buf = to_bytes(&g).unwrap();
            assert_eq!(read_geometry(&buf, 64).unwrap(), g);
        }
    }

    #[test]
    fn header_layout() {
        let buf = to_bytes(&polygon_with_hole()).unwrap();
        assert_eq!(buf.len(), u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize);
        assert_eq!(&buf[4..7], &[0xE6, 0x10, 0x00]);
        assert_eq!(buf[7], 0);

        let cube = to_bytes(&solid_cube()).unwrap();
        assert_eq!(cube[7], FLAG_Z | FLAG_SOLID);
    }

    #[test]
    fn negative_srid() {
        let mut g = SfGeometry::empty(SfType::Point, 0, Dimension::XYM);
        g.set_srid(-1);
        let back = read_geometry(&to_bytes(&g).unwrap(), 64).unwrap();
        assert_eq!(back, g);
        g.set_srid(SRID_MAX + 1);
        assert!(to_bytes(&g).is_err());
    }

    #[test]
    fn m_ordinate_kept() {
        let g = SfGeometry::Point(SfPoint {
            srid: 3857,
            dim: Dimension::XYZM,
            points: Some(PointArray::from_points(
                Dimension::XYZM,
                [Point4D {
                    x: 1.,
                    y: 2.,
                    z: 3.,
                    m: 4.,
                }],
            )),
        });
        assert_eq!(read_geometry(&to_bytes(&g).unwrap(), 64).unwrap(), g);
    }

    #[test]
    fn truncated_input() {
        let buf = to_bytes(&tin()).unwrap();
        assert!(matches!(
            read_geometry(&buf[..buf.len() - 8], 64),
            Err(GeoExactError::Deserialization(_))
        ));

        // a consistent size field over a short body
        let mut short = buf[..buf.len() - 8].to_vec();
        let len = (short.len() as u32).to_le_bytes();
        short[..4].copy_from_slice(&len);
        assert!(matches!(
            read_geometry(&short, 64),
            Err(GeoExactError::Deserialization(_))
        ));
    }

    #[test]
    fn unknown_type_id() {
        let mut buf = to_bytes(&polygon_with_hole()).unwrap();
        buf[8] = 99;
        assert!(matches!(
            read_geometry(&buf, 64),
            Err(GeoExactError::Deserialization(_))
        ));
    }
}
