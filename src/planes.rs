//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0 in
//! the top-left corner, and a rectangle on the real plane defined by
//! its minimum and maximum corners.  Row 0 of the integral plane is the
//! top of the image and corresponds to the *largest* imaginary value,
//! so mathematical "up" is visual "up".
use num::Complex;

use crate::error::{FractalError, Result};

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the x, y of a pixel: column, then row, with row 0 at the
/// top of the image.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

// We don't need a Point, as a single Complex number is a Point.

/// A rectangle on the real plane, real part as x and imaginary part as
/// y.  The constructors swap any bound pair given backwards, so
/// `min <= max` on both axes always holds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Window {
    /// The left-lower corner.
    pub min: Complex<f64>,
    /// The right-upper corner.
    pub max: Complex<f64>,
}

impl Window {
    /// A window from its bounds on each axis, in either order.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Window {
        let (x_min, x_max) = if x_max < x_min { (x_max, x_min) } else { (x_min, x_max) };
        let (y_min, y_max) = if y_max < y_min { (y_max, y_min) } else { (y_min, y_max) };
        Window {
            min: Complex::new(x_min, y_min),
            max: Complex::new(x_max, y_max),
        }
    }

    /// A window from its two corners, in either order.
    pub fn from_corners(a: Complex<f64>, b: Complex<f64>) -> Window {
        Window::new(a.re, b.re, a.im, b.im)
    }

    /// A window whose height is `ratio` times its width, starting from
    /// `y_min`.  The x bounds are normalised first.
    pub fn from_aspect(x_start: f64, x_end: f64, y_min: f64, ratio: f64) -> Window {
        let (x_min, x_max) = if x_end < x_start { (x_end, x_start) } else { (x_start, x_end) };
        Window::new(x_min, x_max, y_min, y_min + (x_max - x_min) * ratio)
    }

    /// Extent along x.
    pub fn width(&self) -> f64 {
        self.max.re - self.min.re
    }

    /// Extent along y.
    pub fn height(&self) -> f64 {
        self.max.im - self.min.im
    }

    /// True when every bound is a finite number.
    pub fn is_finite(&self) -> bool {
        [self.min.re, self.min.im, self.max.re, self.max.im]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// Where a point on the real plane landed on the integral plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Placement {
    /// Inside the raster, at this pixel.
    Inside(Pixel),
    /// A finite point that falls outside the raster.
    Outside,
    /// The point is too large, infinite or NaN to map to a pixel.
    Overflow,
}

/// The largest raster, in pixels, a plane may describe.
pub const MAX_PIXELS: usize = 1 << 28;

/// The number of pixels in a `width` × `height` raster.  Refuses empty
/// rasters and anything past `MAX_PIXELS`.
pub fn pixel_count(width: usize, height: usize) -> Result<usize> {
    match width.checked_mul(height) {
        Some(count) if count > 0 && count <= MAX_PIXELS => Ok(count),
        _ => Err(FractalError::Size(format!("{}x{}", width, height))),
    }
}

/// Contains the definitions of two planes: an integral cartesian plane,
/// and a complex, real cartesian plane.  Maps points from one to the
/// other.
#[derive(Debug, Clone)]
pub struct PlaneMapper {
    /// The size of the integral cartesian plane.
    pub integral_plane: IntegralPlane,
    /// The window on the complex cartesian plane.
    pub window: Window,
    // Size of one pixel on the complex plane, along x and y.
    increments: (f64, f64),
}

impl PlaneMapper {
    /// Constructor.  Takes the size of the integral plane and the
    /// window on the real plane.  Both dimensions must be non-zero, and
    /// together no more than `MAX_PIXELS`.
    pub fn new(width: usize, height: usize, window: Window) -> Result<PlaneMapper> {
        pixel_count(width, height)?;
        if !window.is_finite() {
            return Err(FractalError::Bounds(format!("{:?}", window)));
        }

        let increments = (
            window.width() / (width as f64),
            window.height() / (height as f64),
        );

        Ok(PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            window,
            increments,
        })
    }

    /// Columns.
    pub fn width(&self) -> usize {
        self.integral_plane.0
    }

    /// Rows.
    pub fn height(&self) -> usize {
        self.integral_plane.1
    }

    /// The total number of points in the integral grid.  Used to
    /// calculate memory needs.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Describes that the integral plane is of a size.
    pub fn is_empty(&self) -> bool {
        self.integral_plane.0 == 0 || self.integral_plane.1 == 0
    }

    /// Given a pixel on the integral cartesian plane, map it to the
    /// complex plane: `x = xmin + col * dx`, `y = ymax - row * dy`.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(
            self.window.min.re + (pixel.0 as f64) * self.increments.0,
            self.window.max.im - (pixel.1 as f64) * self.increments.1,
        )
    }

    /// The real value under a column.  Parameter scans walk this.
    pub fn column_to_re(&self, column: usize) -> f64 {
        self.window.min.re + (column as f64) * self.increments.0
    }

    /// Given a complex number corresponding to a location on the
    /// complex cartesian plane, find the pixel it falls in, if any.
    pub fn point_to_pixel(&self, point: &Complex<f64>) -> Placement {
        let column = match self.column_for(point.re) {
            Ok(c) => c,
            Err(placement) => return placement,
        };
        let row = match self.row_for(point.im) {
            Ok(r) => r,
            Err(placement) => return placement,
        };
        Placement::Inside(Pixel(column, row))
    }

    /// The column a real value falls in.
    pub fn column_for(&self, re: f64) -> std::result::Result<usize, Placement> {
        let left = to_index((re - self.window.min.re) / self.increments.0)?;
        if left < 0 || left >= self.integral_plane.0 as i64 {
            return Err(Placement::Outside);
        }
        Ok(left as usize)
    }

    /// The row an imaginary value falls in.  Rows count down from the
    /// top, so the lowest values land in the last row.
    pub fn row_for(&self, im: f64) -> std::result::Result<usize, Placement> {
        let up = to_index((im - self.window.min.im) / self.increments.1)?;
        if up < 0 || up >= self.integral_plane.1 as i64 {
            return Err(Placement::Outside);
        }
        Ok(self.integral_plane.1 - 1 - up as usize)
    }
}

// A scaled offset, floored to a whole pixel index.  Anything that
// doesn't fit an i64 has overflowed.
fn to_index(scaled: f64) -> std::result::Result<i64, Placement> {
    let floored = scaled.floor();
    if !floored.is_finite() || floored.abs() >= (i64::max_value() as f64) {
        return Err(Placement::Overflow);
    }
    Ok(floored as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_sizes_are_bounded() {
        assert_eq!(pixel_count(720, 540).unwrap(), 720 * 540);
        assert!(pixel_count(0, 10).is_err());
        assert!(pixel_count(1 << 15, 1 << 14).is_err());
        assert!(pixel_count(2, usize::max_value()).is_err());
        let window = Window::new(-1.0, 1.0, -1.0, 1.0);
        match PlaneMapper::new(3, usize::max_value(), window) {
            Err(FractalError::Size(_)) => {}
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn window_normalises_backwards_bounds() {
        let w = Window::new(1.0, -1.0, 2.0, -2.0);
        assert_eq!(w, Window::new(-1.0, 1.0, -2.0, 2.0));
        assert_eq!(
            Window::from_corners(Complex::new(1.0, 1.0), Complex::new(-1.0, -1.0)),
            Window::new(-1.0, 1.0, -1.0, 1.0)
        );
    }

    #[test]
    fn window_from_aspect_derives_y_max() {
        let w = Window::from_aspect(1.0, -2.0, -1.125, 0.75);
        assert_eq!(w.min, Complex::new(-2.0, -1.125));
        assert_eq!(w.max, Complex::new(1.0, 1.125));
    }

    #[test]
    fn planemapper_fails_on_empty_plane() {
        assert!(PlaneMapper::new(0, 4, Window::new(-1.0, 1.0, -1.0, 1.0)).is_err());
        assert!(PlaneMapper::new(4, 0, Window::new(-1.0, 1.0, -1.0, 1.0)).is_err());
    }

    #[test]
    fn planemapper_fails_on_infinite_window() {
        let w = Window::new(-1.0, std::f64::INFINITY, -1.0, 1.0);
        assert!(PlaneMapper::new(4, 4, w).is_err());
    }

    #[test]
    fn planemapper_passes_on_good_shape() {
        let pm = PlaneMapper::new(4, 4, Window::new(-1.0, 1.0, -1.0, 1.0));
        assert!(pm.is_ok());
    }

    #[test]
    fn pixel_to_point_inverts_rows() {
        let pm = PlaneMapper::new(4, 4, Window::new(-2.0, 2.0, -2.0, 2.0)).unwrap();
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(-2.0, 2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(2, 2)), Complex::new(0.0, 0.0));
        assert_eq!(pm.pixel_to_point(&Pixel(3, 3)), Complex::new(1.0, -1.0));
    }

    #[test]
    fn swapped_windows_map_identically() {
        let a = PlaneMapper::new(8, 6, Window::new(-2.0, 1.0, -1.0, 1.0)).unwrap();
        let b = PlaneMapper::new(8, 6, Window::new(1.0, -2.0, 1.0, -1.0)).unwrap();
        for row in 0..6 {
            for column in 0..8 {
                let p = Pixel(column, row);
                assert_eq!(a.pixel_to_point(&p), b.pixel_to_point(&p));
            }
        }
    }

    #[test]
    fn point_to_pixel_on_mixed_planes() {
        let pm = PlaneMapper::new(4, 4, Window::new(-2.0, 2.0, -2.0, 2.0)).unwrap();
        assert_eq!(pm.point_to_pixel(&Complex::new(0.0, 0.0)), Placement::Inside(Pixel(2, 1)));
        assert_eq!(pm.point_to_pixel(&Complex::new(-2.0, -2.0)), Placement::Inside(Pixel(0, 3)));
        assert_eq!(pm.point_to_pixel(&Complex::new(1.9, 1.9)), Placement::Inside(Pixel(3, 0)));
    }

    #[test]
    fn point_to_pixel_reports_outside() {
        let pm = PlaneMapper::new(4, 4, Window::new(-2.0, 2.0, -2.0, 2.0)).unwrap();
        assert_eq!(pm.point_to_pixel(&Complex::new(2.0, 0.0)), Placement::Outside);
        assert_eq!(pm.point_to_pixel(&Complex::new(0.0, -2.01)), Placement::Outside);
        assert_eq!(pm.point_to_pixel(&Complex::new(-2.01, 0.0)), Placement::Outside);
    }

    #[test]
    fn point_to_pixel_reports_overflow() {
        let pm = PlaneMapper::new(4, 4, Window::new(-2.0, 2.0, -2.0, 2.0)).unwrap();
        assert_eq!(pm.point_to_pixel(&Complex::new(std::f64::INFINITY, 0.0)), Placement::Overflow);
        assert_eq!(pm.point_to_pixel(&Complex::new(0.0, std::f64::NAN)), Placement::Overflow);
        assert_eq!(pm.point_to_pixel(&Complex::new(1e300, 0.0)), Placement::Overflow);
    }

    #[test]
    fn column_to_re_walks_the_window() {
        let pm = PlaneMapper::new(14, 1, Window::new(1.6, 3.0, 0.0, 1.6)).unwrap();
        assert_eq!(pm.column_to_re(0), 1.6);
        assert!((pm.column_to_re(7) - 2.3).abs() < 1e-12);
    }
}
