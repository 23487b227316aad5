// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The pixel-per-value renderer.  Every pixel is mapped to a point,
//! the point is classified by the kernel, and the classification is
//! turned into exactly one colour write.  Mandelbrot, Julia, the power
//! and magnet variants and the Newton basins all go through here, on
//! either a flat window or the Riemann sphere.

use crossbeam::thread::ScopedJoinHandle;
use itertools::iproduct;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{info, warn};

use crate::colour::ColourScheme;
use crate::error::{FractalError, Result};
use crate::kernel::{Kernel, Outcome};
use crate::palette::Rgb;
use crate::planes::{Pixel, PlaneMapper};
use crate::raster::{put_in_row, Plot, Raster, RenderStats, BACKGROUND};
use crate::sphere::SphereProjection;

/// Great circles on the sphere are drawn in this.
pub const LINE_COLOUR: Rgb = Rgb(0x60, 0x60, 0x60);

/// What the raster is laid over.
#[derive(Clone, Debug)]
pub enum Surface {
    /// A window of the plane, straight.
    Flat(PlaneMapper),
    /// The unit square, seen as a turned Riemann sphere.
    Sphere(PlaneMapper, SphereProjection),
}

impl Surface {
    fn plane(&self) -> &PlaneMapper {
        match self {
            Surface::Flat(plane) => plane,
            Surface::Sphere(plane, _) => plane,
        }
    }
}

/// The parameters of one pixel-per-value pass.  Once built, it is
/// not mutated; render it as often as you like.
#[derive(Clone, Debug)]
pub struct PixelRenderer {
    surface: Surface,
    kernel: Kernel,
    colours: ColourScheme,
    max_iter: usize,
}

impl PixelRenderer {
    /// Requires the surface the raster covers, the kernel to classify
    /// each point with, the colours to paint the outcomes in, and the
    /// iteration budget per pixel.
    pub fn new(surface: Surface, kernel: Kernel, colours: ColourScheme, max_iter: usize) -> Self {
        PixelRenderer {
            surface,
            kernel,
            colours,
            max_iter,
        }
    }

    /// Raster columns.
    pub fn width(&self) -> usize {
        self.surface.plane().width()
    }

    /// Raster rows.
    pub fn height(&self) -> usize {
        self.surface.plane().height()
    }

    fn colour(&self, outcome: Outcome) -> Rgb {
        match self.kernel {
            Kernel::Escape(_) => self.colours.escape_colour(outcome, self.max_iter),
            Kernel::Newton(_) => self.colours.basin_colour(outcome),
        }
    }

    // Any pixel of the surface resolves to exactly one write.
    fn plot(&self, pixel: Pixel) -> Plot {
        let point = match &self.surface {
            Surface::Flat(plane) => plane.pixel_to_point(&pixel),
            Surface::Sphere(plane, sphere) => match sphere.project(plane.pixel_to_point(&pixel)) {
                None => return Plot::Colour(self.colours.default),
                Some(ref p) if p.on_grid && sphere.grid_lines => return Plot::Colour(LINE_COLOUR),
                Some(p) => p.point,
            },
        };
        let outcome = self.kernel.classify(point, self.max_iter);
        match outcome {
            Outcome::Overflow(i) => {
                warn!(iteration = i, re = point.re, im = point.im, "Overflow");
                Plot::Overflow(self.colour(outcome))
            }
            _ => Plot::Colour(self.colour(outcome)),
        }
    }

    fn plot_row(&self, y: usize, row: &mut [u8]) -> RenderStats {
        let mut stats = RenderStats::default();
        for x in 0..self.width() {
            let plot = self.plot(Pixel(x, y));
            if let Plot::Colour(c) | Plot::Overflow(c) = plot {
                put_in_row(row, x, c);
            }
            stats.record(plot);
        }
        stats
    }

    fn announce(&self) {
        let window = self.surface.plane().window;
        info!(
            width = self.width(),
            height = self.height(),
            max_iter = self.max_iter,
            x_min = window.min.re,
            x_max = window.max.re,
            y_min = window.min.im,
            y_max = window.max.im,
            "Iterating..."
        );
    }

    /// The main function for single-threaded rendering.  Writes every
    /// cell of the raster exactly once.
    pub fn render_single(&self) -> (Raster, RenderStats) {
        self.announce();
        let start = Instant::now();
        let mut raster = Raster::new(self.width(), self.height(), BACKGROUND);
        let mut stats = RenderStats::default();
        for (row, column) in iproduct!(0..self.height(), 0..self.width()) {
            let pixel = Pixel(column, row);
            let plot = self.plot(pixel);
            if let Plot::Colour(c) | Plot::Overflow(c) = plot {
                raster.put(pixel, c);
            }
            stats.record(plot);
        }
        stats.elapsed = start.elapsed();
        info!(elapsed = ?stats.elapsed, overflows = stats.overflows, "Runtime");
        (raster, stats)
    }

    /// A multi-threaded version of the render function that takes a
    /// thread count.  Workers pull whole rows from a shared queue; the
    /// result is identical to `render_single`.
    pub fn render(&self, threads: usize) -> Result<(Raster, RenderStats)> {
        if threads <= 1 {
            return Ok(self.render_single());
        }
        self.announce();
        let start = Instant::now();
        let mut raster = Raster::new(self.width(), self.height(), BACKGROUND);
        let mut stats = RenderStats::default();
        {
            let rows = Arc::new(Mutex::new(raster.rows_mut()));
            crossbeam::scope(|spawner| -> Result<()> {
                let handles: Vec<ScopedJoinHandle<RenderStats>> = (0..threads)
                    .map(|_| {
                        let rows = rows.clone();
                        spawner.spawn(move |_| {
                            let mut stats = RenderStats::default();
                            loop {
                                let row = match rows.lock() {
                                    Ok(mut rows) => rows.next(),
                                    Err(_) => None,
                                };
                                match row {
                                    Some((y, row)) => stats += self.plot_row(y, row),
                                    None => break,
                                }
                            }
                            stats
                        })
                    })
                    .collect();
                for handle in handles {
                    stats += handle.join().map_err(|_| FractalError::Worker)?;
                }
                Ok(())
            })
            .map_err(|_| FractalError::Worker)??;
        }
        stats.elapsed = start.elapsed();
        info!(elapsed = ?stats.elapsed, overflows = stats.overflows, threads, "Runtime");
        Ok((raster, stats))
    }
}
