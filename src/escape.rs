// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time test for a single point.

use crate::complex::BigComplex;

/// Outcome of iterating a single point.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Escape {
    /// The iterate reached the escape radius on this (1-based) iteration.
    Escaped(usize),
    /// The iterate stayed inside the escape radius for every iteration
    /// allowed; the point is presumed to be in the set.
    Bounded,
}

impl Escape {
    /// The escape iteration, if there was one.
    pub fn iterations(self) -> Option<usize> {
        match self {
            Escape::Escaped(i) => Some(i),
            Escape::Bounded => None,
        }
    }
}

/// Iterates z -> z^2 + c for at most `max_iterations` steps and reports
/// the step on which z escaped, if it did.
///
/// Without a Julia constant this is the Mandelbrot iteration: z starts
/// at the origin and the point is c.  With one, the point is the
/// starting z and the constant is c.  The working iterate is a private
/// copy, so neither argument is touched.
pub fn evaluate(point: &BigComplex, max_iterations: usize, julia: Option<&BigComplex>) -> Escape {
    let (mut z, c) = match julia {
        None => (BigComplex::zero(point.precision()), point),
        Some(julia) => (point.clone(), julia),
    };

    for i in 1..=max_iterations {
        if z.square_and_increment(c).has_escaped() {
            return Escape::Escaped(i);
        }
    }
    Escape::Bounded
}
