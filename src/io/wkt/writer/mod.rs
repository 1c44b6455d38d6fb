pub(crate) mod exact;
pub(crate) mod simple;

use num_traits::One;

use crate::exact::{scalar_to_f64, Scalar};

/// Format a double with at most `precision` decimals and no trailing zeros.
///
/// A negative precision writes the shortest text that reads back to the same value.
pub(crate) fn format_f64(value: f64, precision: i32) -> String {
    let mut s = if precision < 0 {
        format!("{value}")
    } else {
        let s = format!("{value:.*}", precision as usize);
        if s.contains('.') {
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            s
        }
    };
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

/// Format an exact scalar. A negative precision writes `num/den`, or the bare integer
/// when the denominator is one.
pub(crate) fn format_scalar(value: &Scalar, precision: i32) -> String {
    if precision >= 0 {
        return format_f64(scalar_to_f64(value), precision);
    }
    if value.denom().is_one() {
        value.numer().to_string()
    } else {
        format!("{}/{}", value.numer(), value.denom())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use num_rational::BigRational;

    #[test]
    fn doubles() {
        assert_eq!(format_f64(1.5, 3), "1.5");
        assert_eq!(format_f64(2.0, 15), "2");
        assert_eq!(format_f64(-0.0001, 2), "0");
        assert_eq!(format_f64(1.0 / 3.0, 4), "0.3333");
        assert_eq!(format_f64(0.1, -1), "0.1");
        assert_eq!(format_f64(1234.0, 0), "1234");
    }

    #[test]
    fn scalars() {
        let third = BigRational::new(1.into(), 3.into());
        assert_eq!(format_scalar(&third, -1), "1/3");
        assert_eq!(format_scalar(&third, 2), "0.33");
        let neg = BigRational::new((-6).into(), 3.into());
        assert_eq!(format_scalar(&neg, -1), "-2");
    }
}
