use crate::error::{GeoExactError, Result};
use crate::exact::{Coord, GeometryKind};

/// Behavior shared by every Model B geometry.
pub trait GeometryTrait {
    fn geometry_kind(&self) -> GeometryKind;

    fn is_empty(&self) -> bool;

    /// Calls `f` on every vertex, depth first, in storage order.
    fn visit_coords<'a>(&'a self, f: &mut dyn FnMut(&'a Coord));

    /// A geometry is 3D when any of its vertices has a Z ordinate.
    fn is_3d(&self) -> bool {
        let mut found = false;
        self.visit_coords(&mut |c: &Coord| found |= c.is_3d());
        found
    }

    fn num_coords(&self) -> usize {
        let mut n = 0;
        self.visit_coords(&mut |_: &Coord| n += 1);
        n
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Point {
    coord: Option<Coord>,
}

impl Point {
    pub fn new(coord: Coord) -> Self {
        Self { coord: Some(coord) }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn coord(&self) -> Option<&Coord> {
        self.coord.as_ref()
    }
}

impl GeometryTrait for Point {
    fn geometry_kind(&self) -> GeometryKind {
        GeometryKind::Point
    }

    fn is_empty(&self) -> bool {
        self.coord.is_none()
    }

    fn visit_coords<'a>(&'a self, f: &mut dyn FnMut(&'a Coord)) {
        self.coord.iter().for_each(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct LineString {
    coords: Vec<Coord>,
}

impl LineString {
    pub fn new(coords: Vec<Coord>) -> Self {
        Self { coords }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    pub fn num_points(&self) -> usize {
        self.coords.len()
    }

    pub fn add_point(&mut self, coord: Coord) {
        self.coords.push(coord)
    }

    pub fn into_coords(self) -> Vec<Coord> {
        self.coords
    }
}

impl GeometryTrait for LineString {
    fn geometry_kind(&self) -> GeometryKind {
        GeometryKind::LineString
    }

    fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    fn visit_coords<'a>(&'a self, f: &mut dyn FnMut(&'a Coord)) {
        self.coords.iter().for_each(f)
    }
}

/// A polygon with an exterior ring and ordered interior rings. Empty when it has no rings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Polygon {
    rings: Vec<LineString>,
}

impl Polygon {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_exterior_ring(ring: LineString) -> Self {
        Self { rings: vec![ring] }
    }

    /// Append a hole. The polygon takes ownership of the ring.
    pub fn add_interior_ring(&mut self, ring: LineString) -> Result<()> {
        if self.rings.is_empty() {
            return Err(GeoExactError::ContractViolation(
                "Cannot add an interior ring to an empty polygon".to_string(),
            ));
        }
        self.rings.push(ring);
        Ok(())
    }

    pub fn exterior_ring(&self) -> Option<&LineString> {
        self.rings.first()
    }

    pub fn interior_rings(&self) -> &[LineString] {
        self.rings.get(1..).unwrap_or_default()
    }

    /// Exterior ring first, then the holes.
    pub fn rings(&self) -> &[LineString] {
        &self.rings
    }

    pub fn num_interior_rings(&self) -> usize {
        self.rings.len().saturating_sub(1)
    }
}

impl GeometryTrait for Polygon {
    fn geometry_kind(&self) -> GeometryKind {
        GeometryKind::Polygon
    }

    fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    fn visit_coords<'a>(&'a self, f: &mut dyn FnMut(&'a Coord)) {
        self.rings.iter().for_each(|r| r.visit_coords(f))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Triangle {
    vertices: Option<[Coord; 3]>,
}

impl Triangle {
    pub fn new(a: Coord, b: Coord, c: Coord) -> Self {
        Self {
            vertices: Some([a, b, c]),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> Option<&[Coord; 3]> {
        self.vertices.as_ref()
    }

    /// The triangle as a closed four-point ring.
    pub fn to_polygon(&self) -> Polygon {
        match &self.vertices {
            Some([a, b, c]) => Polygon::from_exterior_ring(LineString::new(vec![
                a.clone(),
                b.clone(),
                c.clone(),
                a.clone(),
            ])),
            None => Polygon::empty(),
        }
    }
}

impl GeometryTrait for Triangle {
    fn geometry_kind(&self) -> GeometryKind {
        GeometryKind::Triangle
    }

    fn is_empty(&self) -> bool {
        self.vertices.is_none()
    }

    fn visit_coords<'a>(&'a self, f: &mut dyn FnMut(&'a Coord)) {
        self.vertices.iter().flatten().for_each(f)
    }
}

/// The flavour of a [`GeometryCollection`], which decides which members it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    MultiSolid,
    GeometryCollection,
}

impl CollectionKind {
    pub fn geometry_kind(&self) -> GeometryKind {
        match self {
            CollectionKind::MultiPoint => GeometryKind::MultiPoint,
            CollectionKind::MultiLineString => GeometryKind::MultiLineString,
            CollectionKind::MultiPolygon => GeometryKind::MultiPolygon,
            CollectionKind::MultiSolid => GeometryKind::MultiSolid,
            CollectionKind::GeometryCollection => GeometryKind::GeometryCollection,
        }
    }

    /// The member kind a typed collection requires, `None` for a heterogeneous one.
    pub fn member_kind(&self) -> Option<GeometryKind> {
        match self {
            CollectionKind::MultiPoint => Some(GeometryKind::Point),
            CollectionKind::MultiLineString => Some(GeometryKind::LineString),
            CollectionKind::MultiPolygon => Some(GeometryKind::Polygon),
            CollectionKind::MultiSolid => Some(GeometryKind::Solid),
            CollectionKind::GeometryCollection => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeometryCollection {
    kind: CollectionKind,
    geometries: Vec<Geometry>,
}

impl GeometryCollection {
    pub fn new(kind: CollectionKind) -> Self {
        Self {
            kind,
            geometries: vec![],
        }
    }

    /// Append a member, taking ownership of it.
    ///
    /// Typed collections reject members of the wrong kind.
    pub fn add_geometry(&mut self, geometry: Geometry) -> Result<()> {
        if let Some(expected) = self.kind.member_kind() {
            if geometry.geometry_kind() != expected {
                return Err(GeoExactError::ContractViolation(format!(
                    "{} cannot hold a {}",
                    self.kind.geometry_kind().name(),
                    geometry.geometry_kind().name()
                )));
            }
        }
        self.geometries.push(geometry);
        Ok(())
    }

    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    pub fn geometries(&self) -> &[Geometry] {
        &self.geometries
    }

    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn into_geometries(self) -> Vec<Geometry> {
        self.geometries
    }
}

impl GeometryTrait for GeometryCollection {
    fn geometry_kind(&self) -> GeometryKind {
        self.kind.geometry_kind()
    }

    fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    fn visit_coords<'a>(&'a self, f: &mut dyn FnMut(&'a Coord)) {
        self.geometries.iter().for_each(|g| g.visit_coords(f))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PolyhedralSurface {
    polygons: Vec<Polygon>,
}

impl PolyhedralSurface {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn add_polygon(&mut self, polygon: Polygon) {
        self.polygons.push(polygon)
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn num_polygons(&self) -> usize {
        self.polygons.len()
    }
}

impl GeometryTrait for PolyhedralSurface {
    fn geometry_kind(&self) -> GeometryKind {
        GeometryKind::PolyhedralSurface
    }

    fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    fn visit_coords<'a>(&'a self, f: &mut dyn FnMut(&'a Coord)) {
        self.polygons.iter().for_each(|p| p.visit_coords(f))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TriangulatedSurface {
    triangles: Vec<Triangle>,
}

impl TriangulatedSurface {
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle)
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }
}

impl GeometryTrait for TriangulatedSurface {
    fn geometry_kind(&self) -> GeometryKind {
        GeometryKind::TriangulatedSurface
    }

    fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    fn visit_coords<'a>(&'a self, f: &mut dyn FnMut(&'a Coord)) {
        self.triangles.iter().for_each(|t| t.visit_coords(f))
    }
}

/// A volume bounded by shells. Shell 0 is the exterior, the others are cavities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Solid {
    shells: Vec<PolyhedralSurface>,
}

impl Solid {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_exterior_shell(shell: PolyhedralSurface) -> Self {
        Self {
            shells: vec![shell],
        }
    }

    pub fn add_interior_shell(&mut self, shell: PolyhedralSurface) -> Result<()> {
        if self.shells.is_empty() {
            return Err(GeoExactError::ContractViolation(
                "Cannot add an interior shell to an empty solid".to_string(),
            ));
        }
        self.shells.push(shell);
        Ok(())
    }

    pub fn exterior_shell(&self) -> Option<&PolyhedralSurface> {
        self.shells.first()
    }

    pub fn shells(&self) -> &[PolyhedralSurface] {
        &self.shells
    }

    pub fn num_shells(&self) -> usize {
        self.shells.len()
    }
}

impl GeometryTrait for Solid {
    fn geometry_kind(&self) -> GeometryKind {
        GeometryKind::Solid
    }

    fn is_empty(&self) -> bool {
        self.shells.iter().all(|s| s.is_empty())
    }

    fn visit_coords<'a>(&'a self, f: &mut dyn FnMut(&'a Coord)) {
        self.shells.iter().for_each(|s| s.visit_coords(f))
    }
}

/// A Model B geometry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    Polygon(Polygon),
    Triangle(Triangle),
    Collection(GeometryCollection),
    PolyhedralSurface(PolyhedralSurface),
    TriangulatedSurface(TriangulatedSurface),
    Solid(Solid),
}

impl Geometry {
    /// An empty geometry of a concrete kind, `None` for kinds without a struct.
    pub fn empty(kind: GeometryKind) -> Option<Self> {
        let geom: Geometry = match kind {
            GeometryKind::Point => Point::empty().into(),
            GeometryKind::LineString => LineString::empty().into(),
            GeometryKind::Polygon => Polygon::empty().into(),
            GeometryKind::Triangle => Triangle::empty().into(),
            GeometryKind::MultiPoint => GeometryCollection::new(CollectionKind::MultiPoint).into(),
            GeometryKind::MultiLineString => {
                GeometryCollection::new(CollectionKind::MultiLineString).into()
            }
            GeometryKind::MultiPolygon => {
                GeometryCollection::new(CollectionKind::MultiPolygon).into()
            }
            GeometryKind::MultiSolid => GeometryCollection::new(CollectionKind::MultiSolid).into(),
            GeometryKind::GeometryCollection => {
                GeometryCollection::new(CollectionKind::GeometryCollection).into()
            }
            GeometryKind::PolyhedralSurface => PolyhedralSurface::empty().into(),
            GeometryKind::TriangulatedSurface => TriangulatedSurface::empty().into(),
            GeometryKind::Solid => Solid::empty().into(),
            GeometryKind::CircularString
            | GeometryKind::CompoundCurve
            | GeometryKind::CurvePolygon
            | GeometryKind::MultiCurve
            | GeometryKind::MultiSurface
            | GeometryKind::Curve
            | GeometryKind::Surface => return None,
        };
        Some(geom)
    }

    fn inner(&self) -> &dyn GeometryTrait {
        match self {
            Geometry::Point(g) => g,
            Geometry::LineString(g) => g,
            Geometry::Polygon(g) => g,
            Geometry::Triangle(g) => g,
            Geometry::Collection(g) => g,
            Geometry::PolyhedralSurface(g) => g,
            Geometry::TriangulatedSurface(g) => g,
            Geometry::Solid(g) => g,
        }
    }
}

impl GeometryTrait for Geometry {
    fn geometry_kind(&self) -> GeometryKind {
        self.inner().geometry_kind()
    }

    fn is_empty(&self) -> bool {
        self.inner().is_empty()
    }

    fn visit_coords<'a>(&'a self, f: &mut dyn FnMut(&'a Coord)) {
        self.inner().visit_coords(f)
    }
}

impl From<Point> for Geometry {
    fn from(value: Point) -> Self {
        Geometry::Point(value)
    }
}

impl From<LineString> for Geometry {
    fn from(value: LineString) -> Self {
        Geometry::LineString(value)
    }
}

impl From<Polygon> for Geometry {
    fn from(value: Polygon) -> Self {
        Geometry::Polygon(value)
    }
}

impl From<Triangle> for Geometry {
    fn from(value: Triangle) -> Self {
        Geometry::Triangle(value)
    }
}

impl From<GeometryCollection> for Geometry {
    fn from(value: GeometryCollection) -> Self {
        Geometry::Collection(value)
    }
}

impl From<PolyhedralSurface> for Geometry {
    fn from(value: PolyhedralSurface) -> Self {
        Geometry::PolyhedralSurface(value)
    }
}

impl From<TriangulatedSurface> for Geometry {
    fn from(value: TriangulatedSurface) -> Self {
        Geometry::TriangulatedSurface(value)
    }
}

impl From<Solid> for Geometry {
    fn from(value: Solid) -> Self {
        Geometry::Solid(value)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn typed_collection_rejects_wrong_member() {
        let mut mp = GeometryCollection::new(CollectionKind::MultiPoint);
        mp.add_geometry(Point::empty().into()).unwrap();
        let err = mp.add_geometry(LineString::empty().into()).unwrap_err();
        assert!(matches!(err, GeoExactError::ContractViolation(_)));
        assert_eq!(mp.len(), 1);

        let mut gc = GeometryCollection::new(CollectionKind::GeometryCollection);
        gc.add_geometry(Solid::empty().into()).unwrap();
        gc.add_geometry(Point::empty().into()).unwrap();
        assert_eq!(gc.len(), 2);
    }

    #[test]
    fn is_3d_looks_at_any_vertex() {
        let ls = LineString::new(vec![
            Coord::from_ints(0, 0, None),
            Coord::from_ints(1, 1, Some(2)),
        ]);
        assert!(ls.is_3d());
        assert!(!LineString::empty().is_3d());
        assert_eq!(ls.num_coords(), 2);
    }

    #[test]
    fn empty_for_every_concrete_kind() {
        for kind in GeometryKind::all() {
            if let Some(g) = Geometry::empty(kind) {
                assert_eq!(g.geometry_kind(), kind);
                assert!(g.is_empty());
            }
        }
    }

    #[test]
    fn interior_ring_needs_exterior() {
        let mut p = Polygon::empty();
        assert!(p.add_interior_ring(LineString::empty()).is_err());
    }
}
