//! Algorithms on exact geometries, as exposed by the [function layer][crate::function].
//!
//! Measures, predicates and boolean operations run on the XY projection through the
//! [`geo`] crate. Transforms that only move or regroup vertices (rounding, extrusion,
//! orientation, convex hull, triangulation) stay exact.

mod area;
mod extrude;
pub(crate) mod geo_interop;
mod hull;
mod minkowski;
mod plane;
mod relate;
mod transform;
mod triangulate;

pub use area::{polygon_area, Area};
pub use extrude::extrude;
pub use hull::convex_hull;
pub use minkowski::{buffer, minkowski_sum, offset_polygon, MAX_SEGMENTS};
pub use plane::{force_z_up, has_plane, pointing_up};
pub use relate::{distance, intersection, intersects};
pub use transform::{collection_extract, copy, make_solid, round};
pub use triangulate::triangulate_2d;
