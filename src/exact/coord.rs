use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{ToPrimitive, Zero};

use crate::error::{GeoExactError, Result};

/// An exact coordinate ordinate.
pub type Scalar = BigRational;

/// Convert a finite `f64` into the exact rational it denotes.
pub fn scalar_from_f64(value: f64) -> Result<Scalar> {
    if !value.is_finite() {
        return Err(GeoExactError::NonFiniteCoordinate(value));
    }
    BigRational::from_float(value).ok_or(GeoExactError::NonFiniteCoordinate(value))
}

/// The nearest `f64` to an exact scalar.
pub fn scalar_to_f64(value: &Scalar) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

pub fn scalar_from_int(value: i64) -> Scalar {
    BigRational::from_integer(BigInt::from(value))
}

/// An exact position with optional Z. Model B has no M ordinate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coord {
    pub x: Scalar,
    pub y: Scalar,
    pub z: Option<Scalar>,
}

impl Coord {
    pub fn new_2d(x: Scalar, y: Scalar) -> Self {
        Self { x, y, z: None }
    }

    pub fn new_3d(x: Scalar, y: Scalar, z: Scalar) -> Self {
        Self { x, y, z: Some(z) }
    }

    /// Convenience constructor for integer-valued coordinates.
    pub fn from_ints(x: i64, y: i64, z: Option<i64>) -> Self {
        Self {
            x: scalar_from_int(x),
            y: scalar_from_int(y),
            z: z.map(scalar_from_int),
        }
    }

    pub fn try_from_f64(x: f64, y: f64, z: Option<f64>) -> Result<Self> {
        Ok(Self {
            x: scalar_from_f64(x)?,
            y: scalar_from_f64(y)?,
            z: z.map(scalar_from_f64).transpose()?,
        })
    }

    pub fn is_3d(&self) -> bool {
        self.z.is_some()
    }

    /// The Z ordinate, or zero for 2D coordinates.
    pub fn z_or_zero(&self) -> Scalar {
        self.z.clone().unwrap_or_else(Scalar::zero)
    }

    pub fn to_f64(&self) -> (f64, f64, Option<f64>) {
        (
            scalar_to_f64(&self.x),
            scalar_to_f64(&self.y),
            self.z.as_ref().map(scalar_to_f64),
        )
    }

    pub fn to_geo(&self) -> geo::Coord<f64> {
        geo::coord! { x: scalar_to_f64(&self.x), y: scalar_to_f64(&self.y) }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn f64_is_exact() {
        let s = scalar_from_f64(0.1).unwrap();
        // 0.1 is not representable, so the exact value has a power-of-two denominator
        assert_ne!(s, BigRational::new(1.into(), 10.into()));
        assert_eq!(scalar_to_f64(&s), 0.1);
    }

    #[test]
    fn non_finite_rejected() {
        assert!(matches!(
            scalar_from_f64(f64::NAN),
            Err(GeoExactError::NonFiniteCoordinate(_))
        ));
        assert!(Coord::try_from_f64(0., f64::INFINITY, None).is_err());
    }
}
