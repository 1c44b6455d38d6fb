use crate::simple::Dimension;

/// A single Model A position. Ordinates absent from the owning array read as `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point4D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub m: f64,
}

impl Point4D {
    pub fn new_2d(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Default::default()
        }
    }

    pub fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            ..Default::default()
        }
    }
}

/// An interleaved, fixed-stride buffer of `f64` coordinates.
///
/// The stride is given by the array's own [`Dimension`], so two arrays inside the same
/// geometry may disagree about Z and M.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointArray {
    dim: Dimension,
    coords: Vec<f64>,
}

impl PointArray {
    pub fn new(dim: Dimension) -> Self {
        Self {
            dim,
            coords: vec![],
        }
    }

    pub fn with_capacity(dim: Dimension, capacity: usize) -> Self {
        Self {
            dim,
            coords: Vec::with_capacity(capacity * dim.size()),
        }
    }

    /// Build an array from points, keeping only the ordinates `dim` stores.
    pub fn from_points(dim: Dimension, points: impl IntoIterator<Item = Point4D>) -> Self {
        let mut array = Self::new(dim);
        points.into_iter().for_each(|p| array.push(p));
        array
    }

    /// Wrap an already interleaved buffer.
    ///
    /// Returns `None` when the buffer length is not a multiple of the stride.
    pub fn from_interleaved(dim: Dimension, coords: Vec<f64>) -> Option<Self> {
        (coords.len() % dim.size() == 0).then_some(Self { dim, coords })
    }

    pub fn dim(&self) -> Dimension {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.coords.len() / self.dim.size()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn push(&mut self, point: Point4D) {
        self.coords.push(point.x);
        self.coords.push(point.y);
        match self.dim {
            Dimension::XY => {}
            Dimension::XYZ => self.coords.push(point.z),
            Dimension::XYM => self.coords.push(point.m),
            Dimension::XYZM => {
                self.coords.push(point.z);
                self.coords.push(point.m);
            }
        }
    }

    pub fn get(&self, i: usize) -> Option<Point4D> {
        let stride = self.dim.size();
        let c = self.coords.get(i * stride..(i + 1) * stride)?;
        let mut point = Point4D::new_2d(c[0], c[1]);
        match self.dim {
            Dimension::XY => {}
            Dimension::XYZ => point.z = c[2],
            Dimension::XYM => point.m = c[2],
            Dimension::XYZM => {
                point.z = c[2];
                point.m = c[3];
            }
        }
        Some(point)
    }

    pub fn iter(&self) -> impl Iterator<Item = Point4D> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }

    /// The raw interleaved buffer.
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn stride_follows_dimension() {
        let arr = PointArray::from_points(
            Dimension::XYM,
            [Point4D {
                x: 1.,
                y: 2.,
                z: 3.,
                m: 4.,
            }],
        );
        assert_eq!(arr.coords(), &[1., 2., 4.]);
        let p = arr.get(0).unwrap();
        assert_eq!(p.z, 0.);
        assert_eq!(p.m, 4.);
        assert!(arr.get(1).is_none());
    }

    #[test]
    fn rejects_ragged_buffer() {
        assert!(PointArray::from_interleaved(Dimension::XYZ, vec![0., 1.]).is_none());
        let arr = PointArray::from_interleaved(Dimension::XYZ, vec![0., 1., 2.]).unwrap();
        assert_eq!(arr.len(), 1);
    }
}
