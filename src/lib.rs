#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Deep-zoom Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points c on the complex plane for
//! which repeatedly squaring z and adding c, starting from zero, never
//! runs off to infinity.  Rendering it means counting, for every pixel,
//! how many squarings it takes before |z| passes 2.  The count is the
//! number used to shade the image; points that never pass 2 within the
//! iteration limit are "inside".
//!
//! Swap the roles around (start z at the pixel, add the same fixed
//! constant everywhere) and you get the Julia set for that constant.
//!
//! Ordinary `f64` runs out of bits after a zoom of about 10^15, when
//! neighbouring pixels collapse onto the same floating point value.
//! Here every coordinate and every iterate is an arbitrary-precision
//! real, so a region can be as small as the precision allows.

extern crate crossbeam;
extern crate dashu_base;
extern crate dashu_float;
extern crate failure;
extern crate itertools;
extern crate log;
extern crate num;
extern crate num_cpus;

pub mod complex;
pub mod error;
pub mod escape;
pub mod intensity;
pub mod planes;
pub mod precision;
pub mod render;

pub use complex::BigComplex;
pub use error::Error;
pub use escape::{evaluate, Escape};
pub use intensity::intensities;
pub use planes::{Pixel, PlaneMapper};
pub use precision::Real;
pub use render::{evaluate_plane, normalize, PlaneRenderer, Progress, Silent};
