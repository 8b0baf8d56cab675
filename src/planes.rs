// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0 in
//! its upper-left corner, and a rectangle on the complex plane given by
//! its lower-left corner and its width.
use crate::complex::BigComplex;
use crate::error::Error;
use crate::precision::{self, Real, MIN_PRECISION};

/// Describes the column, row of a pixel on the integral plane.  Row 0 is
/// the top of the image.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Contains the definitions of two planes: an integral cartesian plane
/// of `width` x `height` pixels, and a region of the complex plane whose
/// lower-left corner is (`x_min`, `y_min`) and whose width is `x_span`.
/// The height of the region follows from the aspect ratio of the image,
/// so pixels are square.
#[derive(Debug)]
pub struct PlaneMapper {
    x_min: Real,
    y_min: Real,
    x_span: Real,
    y_span: Real,
    width: usize,
    height: usize,
    precision: usize,
    // The plane dimensions as reals, kept at the working precision.
    real_width: Real,
    real_height: Real,
}

impl PlaneMapper {
    /// Constructor.  The working precision of the mapper is the widest
    /// precision among the three bounds, and never less than
    /// `MIN_PRECISION`; the dimensions and every coordinate it produces
    /// are built at that precision.  Bounds with unlimited precision,
    /// such as `Real::ONE`, take the floor.
    pub fn new(
        x_min: Real,
        y_min: Real,
        x_span: Real,
        width: usize,
        height: usize,
    ) -> Result<PlaneMapper, Error> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyPlane { width, height });
        }

        let precision = x_min
            .precision()
            .max(y_min.precision())
            .max(x_span.precision())
            .max(MIN_PRECISION);

        if x_span <= precision::zero(precision) {
            return Err(Error::NonPositiveSpan);
        }

        let real_width = precision::integer(width, precision);
        let real_height = precision::integer(height, precision);
        let y_span = &(&x_span * &real_height) / &real_width;

        Ok(PlaneMapper {
            x_min,
            y_min,
            x_span,
            y_span,
            width,
            height,
            precision,
            real_width,
            real_height,
        })
    }

    /// The total number of points in the integral grid.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Describes that the integral plane is of a size.  A constructed
    /// mapper is never empty.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width of the integral plane, in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the integral plane, in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Working precision, in bits.
    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Height of the region on the complex plane.
    pub fn y_span(&self) -> &Real {
        &self.y_span
    }

    /// The imaginary coordinate shared by every pixel in `row`.  Row 0
    /// is the top edge of the region, the last row sits on `y_min`.
    ///
    /// # Panics
    ///
    /// Panics if `row` is not less than the height of the plane.
    pub fn imaginary_for_row(&self, row: usize) -> Real {
        assert!(row < self.height, "row {} outside a plane of height {}", row, self.height);
        let steps = precision::integer(self.height - row - 1, self.precision);
        &(&(&steps * &self.y_span) / &self.real_height) + &self.y_min
    }

    /// The real coordinate shared by every pixel in `column`.  Column 0
    /// is the left edge of the region.
    pub fn real_for_column(&self, column: usize) -> Real {
        let steps = precision::integer(column, self.precision);
        &(&(&steps * &self.x_span) / &self.real_width) + &self.x_min
    }

    /// Given a pixel on the integral cartesian plane, map it to the
    /// corresponding point on the complex plane.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> BigComplex {
        BigComplex::new(self.real_for_column(pixel.0), self.imaginary_for_row(pixel.1))
    }

    /// The linear offset of a pixel from the root of a row-major buffer.
    pub fn offset(&self, pixel: &Pixel) -> usize {
        pixel.1 * self.width + pixel.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::precision::parse_real;
    use num::Complex;

    fn real(s: &str) -> Real {
        parse_real(s, 128).unwrap()
    }

    fn mapper(x_min: &str, y_min: &str, x_span: &str, width: usize, height: usize) -> PlaneMapper {
        PlaneMapper::new(real(x_min), real(y_min), real(x_span), width, height).unwrap()
    }

    #[test]
    fn planemapper_fails_on_empty_plane() {
        let pm = PlaneMapper::new(real("-2"), real("-2"), real("4"), 0, 4);
        assert_eq!(pm.unwrap_err(), Error::EmptyPlane { width: 0, height: 4 });
        let pm = PlaneMapper::new(real("-2"), real("-2"), real("4"), 4, 0);
        assert_eq!(pm.unwrap_err(), Error::EmptyPlane { width: 4, height: 0 });
    }

    #[test]
    fn planemapper_fails_on_bad_span() {
        let pm = PlaneMapper::new(real("-2"), real("-2"), real("0"), 4, 4);
        assert_eq!(pm.unwrap_err(), Error::NonPositiveSpan);
        let pm = PlaneMapper::new(real("-2"), real("-2"), real("-1"), 4, 4);
        assert_eq!(pm.unwrap_err(), Error::NonPositiveSpan);
    }

    #[test]
    fn planemapper_passes_on_good_shape() {
        let pm = mapper("-2", "-2", "4", 4, 4);
        assert_eq!(pm.len(), 16);
        assert!(!pm.is_empty());
        assert_eq!(pm.precision(), 128);
    }

    #[test]
    fn y_span_keeps_pixels_square() {
        let pm = mapper("-2", "-1", "4", 800, 400);
        assert_eq!(pm.y_span().to_f64().value(), 2.0);
    }

    #[test]
    fn row_zero_is_the_top() {
        let pm = mapper("-2", "-2", "4", 4, 4);
        assert_eq!(pm.imaginary_for_row(0).to_f64().value(), 1.0);
        assert_eq!(pm.imaginary_for_row(1).to_f64().value(), 0.0);
        assert_eq!(pm.imaginary_for_row(3).to_f64().value(), -2.0);
    }

    #[test]
    fn column_zero_is_the_left() {
        let pm = mapper("-2", "-2", "4", 4, 4);
        assert_eq!(pm.real_for_column(0).to_f64().value(), -2.0);
        assert_eq!(pm.real_for_column(2).to_f64().value(), 0.0);
        assert_eq!(pm.real_for_column(3).to_f64().value(), 1.0);
    }

    #[test]
    fn pixel_to_points_on_mixed_planes() {
        let pm = mapper("-2", "-2", "6", 3, 3);
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)).to_f64(), Complex::new(-2.0, 2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(1, 1)).to_f64(), Complex::new(0.0, 0.0));
        assert_eq!(pm.pixel_to_point(&Pixel(2, 2)).to_f64(), Complex::new(2.0, -2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(2, 0)).to_f64(), Complex::new(2.0, 2.0));
    }

    #[test]
    fn pixel_to_point_on_positive_planes() {
        let pm = mapper("0", "0", "5", 5, 5);
        assert_eq!(pm.pixel_to_point(&Pixel(0, 4)).to_f64(), Complex::new(0.0, 0.0));
        assert_eq!(pm.pixel_to_point(&Pixel(2, 2)).to_f64(), Complex::new(2.0, 2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(4, 0)).to_f64(), Complex::new(4.0, 4.0));
    }

    #[test]
    fn offsets_are_row_major() {
        let pm = mapper("-2", "-2", "4", 5, 3);
        assert_eq!(pm.offset(&Pixel(0, 0)), 0);
        assert_eq!(pm.offset(&Pixel(4, 0)), 4);
        assert_eq!(pm.offset(&Pixel(0, 1)), 5);
        assert_eq!(pm.offset(&Pixel(4, 2)), 14);
    }

    #[test]
    fn coordinates_resolve_below_f64() {
        // Adjacent columns 1e-40 apart around -0.75 are indistinguishable
        // as f64 but remain distinct reals.
        let pm = PlaneMapper::new(
            parse_real("-0.75", 256).unwrap(),
            parse_real("0.1", 256).unwrap(),
            parse_real("1e-38", 256).unwrap(),
            100,
            100,
        )
        .unwrap();
        let a = pm.real_for_column(10);
        let b = pm.real_for_column(11);
        assert_eq!(a.to_f64().value(), b.to_f64().value());
        assert!(b > a);
        assert_eq!(a.precision(), 256);
    }

    #[test]
    fn unlimited_bounds_get_a_working_precision() {
        let pm = PlaneMapper::new(Real::ZERO, Real::ZERO, Real::ONE, 2, 2).unwrap();
        assert_eq!(pm.precision(), MIN_PRECISION);
        assert_eq!(pm.y_span().to_f64().value(), 1.0);
        assert_eq!(pm.pixel_to_point(&Pixel(1, 0)).to_f64(), Complex::new(0.5, 0.5));
        assert_eq!(pm.pixel_to_point(&Pixel(0, 1)).to_f64(), Complex::new(0.0, 0.0));
    }

    #[test]
    #[should_panic(expected = "outside a plane of height 4")]
    fn rows_past_the_bottom_panic() {
        mapper("-2", "-2", "4", 4, 4).imaginary_for_row(4);
    }
}
