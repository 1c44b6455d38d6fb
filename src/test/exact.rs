use crate::exact::{Coord, LineString, Polygon, PolyhedralSurface, Solid};

pub(crate) fn c(x: i64, y: i64, z: i64) -> Coord {
    Coord::from_ints(x, y, Some(z))
}

pub(crate) fn c2(x: i64, y: i64) -> Coord {
    Coord::from_ints(x, y, None)
}

fn face(coords: &[Coord]) -> Polygon {
    let mut ring = coords.to_vec();
    ring.push(coords[0].clone());
    Polygon::from_exterior_ring(LineString::new(ring))
}

/// An axis-aligned 2D square with a corner at the origin.
pub(crate) fn square(size: i64) -> Polygon {
    face(&[c2(0, 0), c2(size, 0), c2(size, size), c2(0, size)])
}

/// A tetrahedron with its right angle at the origin.
pub(crate) fn tetrahedron() -> PolyhedralSurface {
    PolyhedralSurface::new(vec![
        face(&[c(0, 0, 0), c(0, 1, 0), c(1, 0, 0)]),
        face(&[c(0, 0, 0), c(1, 0, 0), c(0, 0, 1)]),
        face(&[c(0, 0, 0), c(0, 0, 1), c(0, 1, 0)]),
        face(&[c(1, 0, 0), c(0, 1, 0), c(0, 0, 1)]),
    ])
}

fn cube_shell(lo: i64, hi: i64) -> PolyhedralSurface {
    PolyhedralSurface::new(vec![
        face(&[c(lo, lo, lo), c(lo, hi, lo), c(hi, hi, lo), c(hi, lo, lo)]),
        face(&[c(lo, lo, hi), c(hi, lo, hi), c(hi, hi, hi), c(lo, hi, hi)]),
        face(&[c(lo, lo, lo), c(hi, lo, lo), c(hi, lo, hi), c(lo, lo, hi)]),
        face(&[c(hi, lo, lo), c(hi, hi, lo), c(hi, hi, hi), c(hi, lo, hi)]),
        face(&[c(hi, hi, lo), c(lo, hi, lo), c(lo, hi, hi), c(hi, hi, hi)]),
        face(&[c(lo, hi, lo), c(lo, lo, lo), c(lo, lo, hi), c(lo, hi, hi)]),
    ])
}

/// A 3x3x3 cube with a 1x1x1 cavity.
pub(crate) fn two_shell_solid() -> Solid {
    let mut solid = Solid::from_exterior_shell(cube_shell(0, 3));
    solid
        .add_interior_shell(cube_shell(1, 2))
        .expect("exterior shell present");
    solid
}
