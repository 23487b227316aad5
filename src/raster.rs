//! The image buffer every pass writes into, and the bookkeeping that
//! comes back out of a pass.

use std::ops::AddAssign;
use std::time::Duration;

use crate::palette::Rgb;
use crate::planes::{Pixel, Placement};

/// The colour a fresh raster is filled with.
pub const BACKGROUND: Rgb = Rgb(1, 1, 1);

/// What a per-pixel (or per-point) computation asks the rasterizer to
/// do.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Plot {
    /// Write this colour.
    Colour(Rgb),
    /// The arithmetic overflowed; write this fallback colour and count
    /// the anomaly.
    Overflow(Rgb),
    /// The point fell off the raster; write nothing and count it.
    Skip,
}

/// A width × height grid of RGB pixels, row-major, row 0 at the top.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Raster {
    /// A raster filled with `background`.
    pub fn new(width: usize, height: usize, background: Rgb) -> Raster {
        let mut data = Vec::with_capacity(width * height * 3);
        for _ in 0..width * height {
            data.extend_from_slice(&background.to_bytes());
        }
        Raster {
            width,
            height,
            data,
        }
    }

    /// Columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw bytes, three per pixel.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Take the raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// The colour at a pixel, if the pixel is inside the raster.
    pub fn get(&self, pixel: Pixel) -> Option<Rgb> {
        self.offset(pixel)
            .map(|o| Rgb(self.data[o], self.data[o + 1], self.data[o + 2]))
    }

    /// Set a pixel.  Returns false, writing nothing, if it is outside
    /// the raster.
    pub fn put(&mut self, pixel: Pixel, colour: Rgb) -> bool {
        match self.offset(pixel) {
            Some(o) => {
                self.data[o..o + 3].copy_from_slice(&colour.to_bytes());
                true
            }
            None => false,
        }
    }

    /// Write `colour` wherever `placement` landed.  Anything that did
    /// not land inside the raster is skipped.
    pub fn draw(&mut self, placement: Placement, colour: Rgb) -> Plot {
        match placement {
            Placement::Inside(pixel) if self.put(pixel, colour) => Plot::Colour(colour),
            _ => Plot::Skip,
        }
    }

    /// Rows as mutable byte slices, top first, each tagged with its
    /// row number.  Used to hand rows to worker threads.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = (usize, &mut [u8])> + '_ {
        let stride = (self.width * 3).max(1);
        self.data.chunks_mut(stride).enumerate()
    }

    fn offset(&self, pixel: Pixel) -> Option<usize> {
        if pixel.0 < self.width && pixel.1 < self.height {
            Some((pixel.1 * self.width + pixel.0) * 3)
        } else {
            None
        }
    }
}

/// Write a single pixel's colour into a row slice.
#[inline]
pub fn put_in_row(row: &mut [u8], column: usize, colour: Rgb) {
    row[column * 3..column * 3 + 3].copy_from_slice(&colour.to_bytes());
}

/// Diagnostics for one pass.  Not part of the image.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RenderStats {
    /// Pixel writes made.
    pub written: usize,
    /// Pixels or columns abandoned to arithmetic overflow.
    pub overflows: usize,
    /// Points that fell outside the raster and were skipped.
    pub out_of_bounds: usize,
    /// Wall-clock time for the pass.
    pub elapsed: Duration,
}

impl RenderStats {
    /// Account for one `Plot`.
    pub fn record(&mut self, plot: Plot) {
        match plot {
            Plot::Colour(_) => self.written += 1,
            Plot::Overflow(_) => {
                self.written += 1;
                self.overflows += 1;
            }
            Plot::Skip => self.out_of_bounds += 1,
        }
    }
}

impl AddAssign for RenderStats {
    fn add_assign(&mut self, other: RenderStats) {
        self.written += other.written;
        self.overflows += other.overflows;
        self.out_of_bounds += other.out_of_bounds;
        self.elapsed = self.elapsed.max(other.elapsed);
    }
}
