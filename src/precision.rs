// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Construction of arbitrary-precision reals, and an estimate of how
//! many bits a region needs.
//!
//! Every real in a render is built at one working precision.  `FBig`
//! arithmetic produces results at the larger of its operands'
//! precisions, so as long as the constants we introduce (zero, pixel
//! indices, the plane dimensions) carry the working precision, nothing
//! in the iteration quietly drops bits.

use std::convert::TryFrom;

use dashu_base::Approximation;
use dashu_float::round::mode::Zero;
use dashu_float::{DBig, FBig};

use crate::error::Error;

/// The arbitrary-precision real used throughout: binary base,
/// truncating rounding.
pub type Real = FBig;

/// Narrowest precision the command line will accept; anything less is
/// worse than plain `f64`.
pub const MIN_PRECISION: usize = 53;

/// Margin for rounding error accumulated by the arithmetic itself.
const SAFETY_BITS: usize = 64;

/// Scaling step used when a value is too small (or large) for `f64`.
const SCALE_BITS: i32 = 512;

/// Zero at the given precision.  `FBig::ZERO` has unlimited precision,
/// which `FBig` refuses to divide with, so it always gets one assigned.
pub fn zero(precision: usize) -> Real {
    FBig::ZERO.with_precision(precision).value()
}

/// Converts an integer (a pixel index or a plane dimension) into a real
/// at the given precision.  Pixel counts sit far below 2^53, where the
/// conversion through `f64` is exact.
pub fn integer(n: usize, precision: usize) -> Real {
    if n == 0 {
        return zero(precision);
    }
    match FBig::try_from(n as f64) {
        Ok(value) => value.with_precision(precision).value(),
        Err(_) => zero(precision),
    }
}

/// Parses a decimal string ("-0.75", "4", "1.5e-300") directly into a
/// binary real of the given precision, without a detour through `f64`.
pub fn parse_real(text: &str, precision: usize) -> Result<Real, Error> {
    let decimal = text
        .trim()
        .parse::<DBig>()
        .map_err(|_| Error::InvalidNumber(text.to_string()))?;
    let binary = match decimal.with_base_and_precision::<2>(precision) {
        Approximation::Exact(v) => v,
        Approximation::Inexact(v, _) => v,
    };
    Ok(binary.with_rounding::<Zero>())
}

/// Approximate log2 of |value|.  Values outside the `f64` exponent
/// range are rescaled by powers of two (exact in binary) until they
/// fit.  Zero gives negative infinity.
pub fn log2_magnitude(value: &Real) -> f64 {
    if *value == Real::ZERO {
        return std::f64::NEG_INFINITY;
    }
    let up = pow2(SCALE_BITS, value.precision());
    let down = pow2(-SCALE_BITS, value.precision());
    // scaled == value * 2^shift
    let mut scaled = value.clone();
    let mut shift = 0.0;
    loop {
        let approx = scaled.to_f64().value().abs();
        if approx.is_infinite() {
            scaled = &scaled * &down;
            shift -= f64::from(SCALE_BITS);
        } else if approx > 0.0 {
            return approx.log2() - shift;
        } else {
            scaled = &scaled * &up;
            shift += f64::from(SCALE_BITS);
        }
    }
}

fn pow2(bits: i32, precision: usize) -> Real {
    match FBig::try_from(2.0_f64.powi(bits)) {
        Ok(value) => value.with_precision(precision.max(MIN_PRECISION)).value(),
        Err(_) => zero(precision),
    }
}

/// Estimates the working precision a render of the given region needs.
///
/// The bits come from three places: distinguishing adjacent pixels at
/// the coordinate magnitude of the region (`log2(M / delta)`), error
/// amplification over the iterations (`log2(max_iterations)`), and a
/// fixed safety margin.  The result is rounded up to a power of two and
/// never less than 64.
pub fn required_precision(
    x_min: &Real,
    y_min: &Real,
    x_span: &Real,
    width: usize,
    height: usize,
    max_iterations: usize,
) -> usize {
    let width = width.max(1) as f64;
    let height = height.max(1) as f64;

    let log2_span = log2_magnitude(x_span);
    let log2_delta = log2_span - width.log2();

    // M bounds |corner| for every corner; the extra bit covers the sum.
    let log2_y_span = log2_span + (height / width).log2();
    let log2_m = log2_magnitude(x_min)
        .max(log2_magnitude(y_min))
        .max(log2_span)
        .max(log2_y_span)
        + 1.0;

    let ratio_bits = (log2_m - log2_delta).ceil().max(0.0) as usize;
    let iteration_bits = if max_iterations > 1 {
        (max_iterations as f64).log2().ceil() as usize
    } else {
        0
    };

    (ratio_bits + iteration_bits + SAFETY_BITS)
        .next_power_of_two()
        .max(64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_decimals() {
        let r = parse_real("-0.75", 128).unwrap();
        assert_eq!(r.to_f64().value(), -0.75);
        assert_eq!(r.precision(), 128);
    }

    #[test]
    fn parses_values_beyond_f64() {
        let tiny = parse_real("1e-500", 2048).unwrap();
        assert_eq!(tiny.to_f64().value(), 0.0);
        assert!(tiny > zero(2048));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(
            parse_real("one", 128),
            Err(Error::InvalidNumber("one".to_string()))
        );
    }

    #[test]
    fn integers_are_exact() {
        assert_eq!(integer(0, 128).to_f64().value(), 0.0);
        assert_eq!(integer(1000, 128).to_f64().value(), 1000.0);
        assert_eq!(integer(7, 256).precision(), 256);
    }

    #[test]
    fn log2_of_ordinary_values() {
        assert!((log2_magnitude(&integer(8, 64)) - 3.0).abs() < 1e-9);
        assert!((log2_magnitude(&parse_real("-0.25", 64).unwrap()) + 2.0).abs() < 1e-9);
        assert_eq!(log2_magnitude(&zero(64)), std::f64::NEG_INFINITY);
    }

    #[test]
    fn log2_below_f64_range() {
        let tiny = parse_real("1e-500", 64).unwrap();
        let expected = -500.0 * 10f64.log2();
        assert!((log2_magnitude(&tiny) - expected).abs() < 1e-6);
    }

    #[test]
    fn log2_above_f64_range() {
        let huge = parse_real("-1e1000", 64).unwrap();
        let expected = 1000.0 * 10f64.log2();
        assert!((log2_magnitude(&huge) - expected).abs() < 1e-6);
    }

    #[test]
    fn log2_of_unlimited_precision_values() {
        assert_eq!(log2_magnitude(&Real::ZERO), std::f64::NEG_INFINITY);
        assert_eq!(log2_magnitude(&Real::ONE), 0.0);
    }

    #[test]
    fn default_view_needs_modest_precision() {
        let bits = required_precision(
            &integer(2, 64),
            &integer(2, 64),
            &integer(4, 64),
            1000,
            1000,
            512,
        );
        assert_eq!(bits, 128);
    }

    #[test]
    fn precision_grows_with_zoom() {
        let x = parse_real("-0.75", 64).unwrap();
        let y = parse_real("0.1", 64).unwrap();
        let shallow = required_precision(&x, &y, &integer(4, 64), 800, 600, 500);
        let deep = required_precision(&x, &y, &parse_real("1e-500", 64).unwrap(), 800, 600, 500);
        assert!(deep > shallow);
        assert!(deep >= 1024 && deep <= 4096);
        assert!(deep.is_power_of_two());
    }

    #[test]
    fn precision_covers_huge_bounds() {
        let far = parse_real("1e1000", 64).unwrap();
        let bits = required_precision(&far, &far, &integer(1, 64), 800, 600, 500);
        assert_eq!(bits, 4096);
    }
}
