// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors raised while setting up or running a render.
use failure::Fail;

/// Everything that can go wrong between parsing a region and handing
/// back a finished grid.  All of these are caller errors or a crashed
/// worker; the arithmetic itself cannot fail.
#[derive(Debug, Fail, PartialEq)]
pub enum Error {
    /// The integral plane has no pixels in it.
    #[fail(display = "image size {}x{} has no pixels", width, height)]
    EmptyPlane {
        /// Requested width in pixels.
        width: usize,
        /// Requested height in pixels.
        height: usize,
    },

    /// The width of the region on the complex plane is zero or negative.
    #[fail(display = "the span of the region must be greater than zero")]
    NonPositiveSpan,

    /// An iteration cap of zero cannot classify anything.
    #[fail(display = "the iteration count must be at least 1")]
    NoIterations,

    /// A threaded render was asked to run on no threads.
    #[fail(display = "the thread count must be at least 1")]
    NoThreads,

    /// A decimal string could not be read as a real number.
    #[fail(display = "could not parse '{}' as a number", _0)]
    InvalidNumber(String),

    /// One of the render workers panicked before finishing its rows.
    #[fail(display = "a render worker panicked")]
    WorkerPanicked,
}
