// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A complex number built from two arbitrary-precision reals, carrying
//! just the operations the escape-time iteration needs.
use num::Complex;

use crate::precision::{self, Real};

/// Squared escape radius.  Once |z| reaches 2 the orbit of z^2 + c is
/// guaranteed to diverge.
pub const ESCAPE_RADIUS_SQR: f64 = 4.0;

/// A point on the complex plane, or an iterate of one, with both parts
/// held at arbitrary precision.  `Clone` gives an independent copy, which
/// is what the iteration needs before it starts mutating a value.
#[derive(Clone, Debug, PartialEq)]
pub struct BigComplex {
    /// Real part.
    pub re: Real,
    /// Imaginary part.
    pub im: Real,
}

impl BigComplex {
    /// Builds a complex number from its two parts.
    pub fn new(re: Real, im: Real) -> Self {
        BigComplex { re, im }
    }

    /// The origin, at the given precision.
    pub fn zero(precision: usize) -> Self {
        BigComplex {
            re: precision::zero(precision),
            im: precision::zero(precision),
        }
    }

    /// The precision, in bits, of the wider of the two parts.
    pub fn precision(&self) -> usize {
        self.re.precision().max(self.im.precision())
    }

    /// Replaces z with z^2 + c in place and hands z back for chaining:
    ///
    ///   re' = re^2 - im^2 + c.re
    ///   im' = 2 re im + c.im
    pub fn square_and_increment(&mut self, c: &BigComplex) -> &mut Self {
        let re_re = &self.re * &self.re;
        let im_im = &self.im * &self.im;
        let re_im = &self.re * &self.im;
        self.re = &(&re_re - &im_im) + &c.re;
        self.im = &(&re_im + &re_im) + &c.im;
        self
    }

    /// True once |z|^2 >= 4.
    ///
    /// The comparison runs on `f64` approximations of the two parts.
    /// The threshold is exact and only its order of magnitude matters,
    /// so the working precision is wasted here.  Parts too large for
    /// `f64` become infinite and still compare as escaped.
    pub fn has_escaped(&self) -> bool {
        self.to_f64().norm_sqr() >= ESCAPE_RADIUS_SQR
    }

    /// Nearest `f64` approximation.
    pub fn to_f64(&self) -> Complex<f64> {
        Complex::new(self.re.to_f64().value(), self.im.to_f64().value())
    }
}
