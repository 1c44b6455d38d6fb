use itertools::Itertools;
use num_traits::Signed;

use crate::exact::{
    CollectionKind, Coord, Geometry, GeometryCollection, GeometryTrait, LineString, Point,
    Polygon, Scalar,
};

fn cross(o: &Coord, a: &Coord, b: &Coord) -> Scalar {
    (&a.x - &o.x) * (&b.y - &o.y) - (&a.y - &o.y) * (&b.x - &o.x)
}

/// Monotone chain over sorted, distinct points. Returns the lower or upper half of the
/// hull, endpoints included.
fn half_hull<'a>(points: impl Iterator<Item = &'a Coord>) -> Vec<Coord> {
    let mut chain: Vec<Coord> = vec![];
    for p in points {
        while let [.., o, a] = chain.as_slice() {
            if cross(o, a, p).is_positive() {
                break;
            }
            chain.pop();
        }
        chain.push(p.clone());
    }
    chain
}

/// Exact planar convex hull.
///
/// Returns an empty geometry collection for an empty input, a point when all vertices
/// coincide, a line string when they are collinear and a counter-clockwise polygon
/// otherwise. Z is dropped.
pub fn convex_hull(geom: &Geometry) -> Geometry {
    let mut points = vec![];
    geom.visit_coords(&mut |c: &Coord| points.push(Coord::new_2d(c.x.clone(), c.y.clone())));
    let points = points
        .into_iter()
        .sorted_by(|a, b| a.x.cmp(&b.x).then_with(|| a.y.cmp(&b.y)))
        .dedup()
        .collect_vec();

    match points.as_slice() {
        [] => return GeometryCollection::new(CollectionKind::GeometryCollection).into(),
        [p] => return Point::new(p.clone()).into(),
        _ => {}
    }

    let mut lower = half_hull(points.iter());
    let mut upper = half_hull(points.iter().rev());
    if lower.len() == 2 && upper.len() == 2 {
        return LineString::new(lower).into();
    }
    lower.pop();
    upper.pop();
    lower.append(&mut upper);
    let first = lower[0].clone();
    lower.push(first);
    Polygon::from_exterior_ring(LineString::new(lower)).into()
}
