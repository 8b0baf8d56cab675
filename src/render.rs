// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Evaluates every pixel of a plane and turns the results into a grid
//! of iteration counts.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use itertools::iproduct;
use log::{debug, trace};

use crate::complex::BigComplex;
use crate::error::Error;
use crate::escape::{evaluate, Escape};
use crate::planes::{Pixel, PlaneMapper};
use crate::precision::Real;

type RowQueue<'a> = Arc<Mutex<std::iter::Enumerate<std::slice::ChunksMut<'a, Escape>>>>;

/// Receives a notification each time a row of the plane is finished.
/// Rows finish in whatever order the workers get to them; `done` counts
/// how many have finished so far, out of `total`.
pub trait Progress: Sync {
    /// Called once per completed row.
    fn row_complete(&self, done: usize, total: usize);
}

impl<F> Progress for F
where
    F: Fn(usize, usize) + Sync,
{
    fn row_complete(&self, done: usize, total: usize) {
        self(done, total)
    }
}

/// A progress sink that ignores everything.
pub struct Silent;

impl Progress for Silent {
    fn row_complete(&self, _done: usize, _total: usize) {}
}

/// Takes a plane, an iteration cap and an optional Julia constant, and
/// produces the escape-time grid for that plane.
pub struct PlaneRenderer {
    plane: PlaneMapper,
    max_iterations: usize,
    julia: Option<BigComplex>,
}

impl PlaneRenderer {
    /// Requires a mapped plane, the number of iterations to allow each
    /// point, and, for a Julia set, the constant to add on every step.
    pub fn new(
        plane: PlaneMapper,
        max_iterations: usize,
        julia: Option<BigComplex>,
    ) -> Result<Self, Error> {
        if max_iterations == 0 {
            return Err(Error::NoIterations);
        }
        Ok(PlaneRenderer {
            plane,
            max_iterations,
            julia,
        })
    }

    /// The plane this renderer covers.
    pub fn plane(&self) -> &PlaneMapper {
        &self.plane
    }

    fn render_pixel(&self, pixel: &Pixel) -> Escape {
        let point = self.plane.pixel_to_point(pixel);
        evaluate(&point, self.max_iterations, self.julia.as_ref())
    }

    /// Fills one row of the grid.  The imaginary coordinate is shared by
    /// the whole row, so it is only computed once.
    fn render_row(&self, row: usize, cells: &mut [Escape]) {
        let y = self.plane.imaginary_for_row(row);
        for (column, cell) in cells.iter_mut().enumerate() {
            let point = BigComplex::new(self.plane.real_for_column(column), y.clone());
            *cell = evaluate(&point, self.max_iterations, self.julia.as_ref());
        }
    }

    /// The single-threaded render.  Same contract as `render`, on the
    /// calling thread.
    pub fn render_single(&self, progress: &dyn Progress) -> Vec<usize> {
        let (width, height) = (self.plane.width(), self.plane.height());
        let mut escapes = vec![Escape::Bounded; self.plane.len()];
        for (row, column) in iproduct!(0..height, 0..width) {
            let pixel = Pixel(column, row);
            escapes[self.plane.offset(&pixel)] = self.render_pixel(&pixel);
            if column + 1 == width {
                progress.row_complete(row + 1, height);
            }
        }
        normalize(&escapes)
    }

    /// The multi-threaded render.  `threads` workers (never more than
    /// there are rows) take rows off a shared queue until it runs dry.
    /// Each row is a disjoint slice of the grid handed to exactly one
    /// worker, so the grid itself needs no lock.  Normalization starts
    /// only after every worker has been joined.
    pub fn render(&self, threads: usize, progress: &dyn Progress) -> Result<Vec<usize>, Error> {
        if threads == 0 {
            return Err(Error::NoThreads);
        }
        let (width, height) = (self.plane.width(), self.plane.height());
        let workers = threads.min(height);
        debug!(
            "rendering {}x{} at {} bits, {} iterations, {} workers",
            width,
            height,
            self.plane.precision(),
            self.max_iterations,
            workers
        );

        let mut escapes = vec![Escape::Bounded; self.plane.len()];
        let completed = AtomicUsize::new(0);
        crossbeam::scope(|spawner| {
            let rows: RowQueue = Arc::new(Mutex::new(escapes.chunks_mut(width).enumerate()));
            for worker in 0..workers {
                let rows = rows.clone();
                let completed = &completed;
                spawner.spawn(move |_| {
                    let mut rendered = 0;
                    loop {
                        let row = match rows.lock() {
                            Ok(mut rows) => rows.next(),
                            Err(_) => None,
                        };
                        match row {
                            Some((row, cells)) => {
                                self.render_row(row, cells);
                                rendered += 1;
                                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                                trace!("worker {} finished row {}", worker, row);
                                progress.row_complete(done, height);
                            }
                            None => {
                                break;
                            }
                        }
                    }
                    debug!("worker {} done after {} rows", worker, rendered);
                });
            }
        })
        .map_err(|_| Error::WorkerPanicked)?;

        Ok(normalize(&escapes))
    }
}

/// Replaces every `Bounded` cell with one more than the largest escape
/// count in the grid (or 1 when nothing escaped), so that "never
/// escaped" is the single largest value in the result.
pub fn normalize(escapes: &[Escape]) -> Vec<usize> {
    let sentinel = escapes
        .iter()
        .filter_map(|e| e.iterations())
        .max()
        .unwrap_or(0)
        + 1;
    escapes
        .iter()
        .map(|e| e.iterations().unwrap_or(sentinel))
        .collect()
}

/// Computes the normalized escape-time grid for a region in one call:
/// `width * height` counts, row-major, with row 0 at the top of the
/// region.  Uses one worker per available CPU.
pub fn evaluate_plane(
    x_min: Real,
    y_min: Real,
    x_span: Real,
    width: usize,
    height: usize,
    max_iterations: usize,
    julia: Option<(Real, Real)>,
) -> Result<Vec<usize>, Error> {
    let plane = PlaneMapper::new(x_min, y_min, x_span, width, height)?;
    let julia = julia.map(|(re, im)| BigComplex::new(re, im));
    PlaneRenderer::new(plane, max_iterations, julia)?.render(num_cpus::get(), &Silent)
}
