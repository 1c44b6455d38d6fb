//! Structural conversion between Model A ([`crate::simple`]) and Model B
//! ([`crate::exact`]).

mod to_exact;
mod to_simple;
pub mod type_map;

use crate::error::Result;
use crate::exact::Geometry;
use crate::simple::SfGeometry;

/// Recursive converter between the two models, bounded by a nesting limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Converter {
    max_depth: usize,
}

impl Converter {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(64)
    }
}

/// Convert a Model A geometry to Model B with the default nesting limit.
pub fn to_exact(geom: &SfGeometry) -> Result<Geometry> {
    Converter::default().to_exact(geom)
}

/// Convert a Model B geometry to Model A with the default nesting limit.
pub fn to_simple(geom: &Geometry, force_3d: bool, srid: i32) -> Result<SfGeometry> {
    Converter::default().to_simple(geom, force_3d, srid)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::exact::{GeometryKind, GeometryTrait};
    use crate::simple::{Dimension, SfType};
    use crate::test::exact::two_shell_solid;
    use crate::test::simple::{
        line_string_z, multi_line_string, multi_point_with_empty, multi_polygon,
        nested_collection, point, polygon_with_hole, solid_cube, tin,
    };

    #[test]
    fn polygon_with_hole_round_trip() {
        let g = polygon_with_hole();
        let back = to_simple(&to_exact(&g).unwrap(), g.has_z(), g.srid()).unwrap();
        assert_eq!(back, g);
        assert_eq!(back.srid(), 4326);
        assert!(!back.has_z());
    }

    #[test]
    fn representable_geometries_round_trip() {
        for g in [
            point(),
            line_string_z(),
            polygon_with_hole(),
            multi_point_with_empty(),
            multi_line_string(),
            multi_polygon(),
            nested_collection(),
            tin(),
            solid_cube(),
        ] {
            let back = to_simple(&to_exact(&g).unwrap(), g.has_z(), g.srid()).unwrap();
            assert_eq!(back, g, "{:?} did not survive", g.type_id());
        }
    }

    #[test]
    fn empties_keep_their_type() {
        for id in 1..=15u8 {
            let ty = SfType::try_from(id).unwrap();
            for dim in [Dimension::XY, Dimension::XYZ] {
                let g = SfGeometry::empty(ty, 0, dim);
                let Ok(exact) = to_exact(&g) else {
                    continue;
                };
                assert!(exact.is_empty());
                let back = to_simple(&exact, dim.has_z(), 0).unwrap();
                assert_eq!(back.type_id(), ty);
                assert!(back.is_empty());
                assert_eq!(back.has_z(), dim.has_z());
            }
        }
        for kind in GeometryKind::all() {
            let Some(g) = Geometry::empty(kind) else {
                continue;
            };
            let simple = to_simple(&g, false, 0).unwrap();
            let back = to_exact(&simple).unwrap();
            // MultiSolid has no Model A type of its own
            if kind == GeometryKind::MultiSolid {
                assert_eq!(back.geometry_kind(), GeometryKind::GeometryCollection);
            } else {
                assert_eq!(back.geometry_kind(), kind);
            }
            assert!(back.is_empty());
        }
    }

    #[test]
    fn force_3d_never_yields_2d() {
        for g in [polygon_with_hole(), tin(), solid_cube()] {
            let exact = to_exact(&g).unwrap();
            assert!(to_simple(&exact, true, 0).unwrap().has_z());
            assert_eq!(to_simple(&exact, false, 0).unwrap().has_z(), exact.is_3d());
        }
    }

    #[test]
    fn solid_interior_shells_are_lost() {
        let solid = two_shell_solid();
        assert_eq!(solid.num_shells(), 2);
        let faces: usize = solid.shells().iter().map(|s| s.num_polygons()).sum();

        let simple = to_simple(&solid.into(), false, 0).unwrap();
        let Geometry::Solid(back) = to_exact(&simple).unwrap() else {
            panic!("expected solid")
        };
        assert_eq!(back.num_shells(), 1);
        assert_eq!(back.shells()[0].num_polygons(), faces);
    }
}
