//! Bifurcation (Feigenbaum) diagrams.  Rather than one value per
//! pixel, each column is a value of the parameter `k`; a trajectory of
//! `p` is run for that `k` and every iterate after the settling count
//! is plotted.  A pixel may be written many times or not at all.

use num::Complex;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::colour::parity_colour;
use crate::palette::{Palette, Rgb};
use crate::planes::{Pixel, Placement, PlaneMapper, Window};
use crate::raster::{Plot, Raster, RenderStats, BACKGROUND};

/// The real maps a scan can iterate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ScanFunction {
    /// `p + k·p·(1 − p)`
    Logistic,
    /// `k·p²·(1 − p)`
    Quadratic,
    /// `k·sin(p)·cos(p)`
    Trigonometric,
    /// `k·p·(1 − p)`, the textbook logistic map.
    Verhulst,
}

impl ScanFunction {
    /// One step of the map.
    #[inline]
    pub fn apply(self, p: f64, k: f64) -> f64 {
        match self {
            ScanFunction::Logistic => p + k * p * (1.0 - p),
            ScanFunction::Quadratic => k * p * p * (1.0 - p),
            ScanFunction::Trigonometric => k * p.sin() * p.cos(),
            ScanFunction::Verhulst => k * p * (1.0 - p),
        }
    }
}

/// Where each iterate is drawn.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ScanPlot {
    /// At `(k, p)`: the classic bifurcation diagram.
    Bifurcation,
    /// At `(p, f(p))`: the return map, overlaid for every `k`.
    ReturnMap,
}

/// How plotted iterates are coloured.
#[derive(Clone, Debug, PartialEq)]
pub enum ScanColouring {
    /// Even iterations in the first colour, odd in the second.
    Parity(Rgb, Rgb),
    /// Iteration `i` in palette colour `i mod len`.
    Palette(Palette),
}

impl ScanColouring {
    fn colour(&self, i: usize) -> Rgb {
        match self {
            ScanColouring::Parity(even, odd) => parity_colour(i, *even, *odd),
            ScanColouring::Palette(palette) => palette.get(i),
        }
    }
}

/// The parameters of one scan.  Columns sweep `k`; the plane maps
/// iterates to pixels.
#[derive(Clone, Debug)]
pub struct ScanRenderer {
    plane: PlaneMapper,
    k_range: (f64, f64),
    function: ScanFunction,
    mode: ScanPlot,
    p0: f64,
    ignore: usize,
    max_iter: usize,
    colouring: ScanColouring,
}

/// Everything a scan needs besides its colours.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScanParameters {
    /// The parameter sweep, one value per column, in either order.
    pub k_range: (f64, f64),
    /// The vertical extent for `p`, in either order.
    pub p_range: (f64, f64),
    /// The map.
    pub function: ScanFunction,
    /// Where iterates land.
    pub mode: ScanPlot,
    /// Starting value for every column.
    pub p0: f64,
    /// Iterations discarded before plotting starts.
    pub ignore: usize,
    /// Iterations per column.
    pub max_iter: usize,
}

impl ScanRenderer {
    /// Requires the raster size, the scan parameters, and the colours.
    pub fn new(
        width: usize,
        height: usize,
        params: ScanParameters,
        colouring: ScanColouring,
    ) -> crate::error::Result<Self> {
        let (k_min, k_max) = sorted(params.k_range);
        let (p_min, p_max) = sorted(params.p_range);
        let window = match params.mode {
            ScanPlot::Bifurcation => Window::new(k_min, k_max, p_min, p_max),
            ScanPlot::ReturnMap => Window::new(p_min, p_max, p_min, p_max),
        };
        Ok(ScanRenderer {
            plane: PlaneMapper::new(width, height, window)?,
            k_range: (k_min, k_max),
            function: params.function,
            mode: params.mode,
            p0: params.p0,
            ignore: params.ignore,
            max_iter: params.max_iter,
            colouring,
        })
    }

    /// The `k` for a column.
    pub fn k_for_column(&self, column: usize) -> f64 {
        let (k_min, k_max) = self.k_range;
        k_min + (column as f64) * (k_max - k_min) / (self.plane.width() as f64)
    }

    /// Run one column's trajectory into the raster.
    fn scan_column(&self, raster: &mut Raster, column: usize, stats: &mut RenderStats) {
        let k = self.k_for_column(column);
        let mut p = self.p0;
        for i in 0..self.max_iter {
            let previous = p;
            p = self.function.apply(p, k);
            let placement = match self.mode {
                ScanPlot::Bifurcation => match self.plane.row_for(p) {
                    Ok(row) => Placement::Inside(Pixel(column, row)),
                    Err(placement) => placement,
                },
                ScanPlot::ReturnMap => self.plane.point_to_pixel(&Complex::new(previous, p)),
            };
            if placement == Placement::Overflow {
                warn!(iteration = i, k, p, "Overflow");
                stats.overflows += 1;
                break;
            }
            if i < self.ignore {
                continue;
            }
            let plot = raster.draw(placement, self.colouring.colour(i));
            if plot == Plot::Skip {
                debug!(iteration = i, k, p, "p out of bounds");
            }
            stats.record(plot);
        }
    }

    /// Render the whole diagram, one column at a time.
    pub fn render(&self) -> (Raster, RenderStats) {
        info!(
            width = self.plane.width(),
            height = self.plane.height(),
            k_min = self.k_range.0,
            k_max = self.k_range.1,
            max_iter = self.max_iter,
            ignore = self.ignore,
            "Scanning..."
        );
        let start = Instant::now();
        let mut raster = Raster::new(self.plane.width(), self.plane.height(), BACKGROUND);
        let mut stats = RenderStats::default();
        for column in 0..self.plane.width() {
            self.scan_column(&mut raster, column, &mut stats);
        }
        stats.elapsed = start.elapsed();
        info!(elapsed = ?stats.elapsed, overflows = stats.overflows, "Runtime");
        (raster, stats)
    }
}

fn sorted(range: (f64, f64)) -> (f64, f64) {
    if range.1 < range.0 {
        (range.1, range.0)
    } else {
        range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVEN: Rgb = Rgb(0xFF, 0x00, 0xF0);
    const ODD: Rgb = Rgb(0x00, 0xF0, 0xFF);

    fn logistic(k_range: (f64, f64)) -> ScanParameters {
        ScanParameters {
            k_range,
            p_range: (0.0, 1.6),
            function: ScanFunction::Logistic,
            mode: ScanPlot::Bifurcation,
            p0: 0.3,
            ignore: 20,
            max_iter: 40,
        }
    }

    fn painted_rows(raster: &Raster, column: usize) -> Vec<usize> {
        (0..raster.height())
            .filter(|row| raster.get(Pixel(column, *row)) != Some(BACKGROUND))
            .collect()
    }

    #[test]
    fn functions() {
        assert!((ScanFunction::Logistic.apply(0.3, 2.5) - 0.825).abs() < 1e-12);
        assert!((ScanFunction::Quadratic.apply(0.5, 4.0) - 0.5).abs() < 1e-12);
        let p: f64 = 0.7;
        assert!((ScanFunction::Trigonometric.apply(p, 2.0) - (2.0 * p).sin()).abs() < 1e-12);
    }

    #[test]
    fn verhulst_settles_on_one_fixed_point() {
        // k = 2.5 has the attracting fixed point p = 1 - 1/k = 0.6.
        let mut params = logistic((2.5, 2.6));
        params.function = ScanFunction::Verhulst;
        let r = ScanRenderer::new(1, 300, params, ScanColouring::Parity(EVEN, ODD)).unwrap();
        let (raster, stats) = r.render();
        assert_eq!(stats.written, 20);
        // 0.6 / (1.6 / 300) = 112.5, so row 300 - 1 - 112.
        assert_eq!(painted_rows(&raster, 0), vec![187]);
    }

    #[test]
    fn logistic_settles_on_one_below_k_two() {
        // p + kp(1 - p) fixes p = 1, attracting while k < 2.
        let r = ScanRenderer::new(1, 300, logistic((1.5, 1.6)), ScanColouring::Parity(EVEN, ODD)).unwrap();
        let (raster, stats) = r.render();
        assert_eq!(stats.written, 20);
        // 1.0 / (1.6 / 300) = 187.5, so row 300 - 1 - 187.
        assert_eq!(painted_rows(&raster, 0), vec![112]);
    }

    #[test]
    fn chaotic_columns_spread_out() {
        let r = ScanRenderer::new(1, 400, logistic((2.9, 3.0)), ScanColouring::Parity(EVEN, ODD)).unwrap();
        let (raster, _) = r.render();
        assert!(painted_rows(&raster, 0).len() > 4);
    }

    #[test]
    fn settling_iterations_are_not_plotted() {
        let mut params = logistic((1.6, 3.0));
        params.ignore = 40;
        let r = ScanRenderer::new(50, 40, params, ScanColouring::Parity(EVEN, ODD)).unwrap();
        let (raster, stats) = r.render();
        assert_eq!(stats.written, 0);
        assert_eq!(raster, Raster::new(50, 40, BACKGROUND));
    }

    #[test]
    fn out_of_window_points_are_skipped() {
        // The attractor here never comes below p = 0.45.
        let mut params = logistic((2.5, 2.6));
        params.p_range = (0.0, 0.3);
        let r = ScanRenderer::new(3, 40, params, ScanColouring::Parity(EVEN, ODD)).unwrap();
        let (raster, stats) = r.render();
        assert_eq!(stats.written, 0);
        assert_eq!(stats.out_of_bounds, 60);
        assert_eq!(raster, Raster::new(3, 40, BACKGROUND));
    }

    #[test]
    fn divergence_abandons_the_column() {
        let mut params = logistic((40.0, 41.0));
        params.p0 = 3.0;
        params.ignore = 0;
        params.max_iter = 500;
        let r = ScanRenderer::new(2, 10, params, ScanColouring::Parity(EVEN, ODD)).unwrap();
        let (_, stats) = r.render();
        assert_eq!(stats.overflows, 2);
    }

    #[test]
    fn period_two_alternates_colours() {
        // At k = 2.2 the logistic form settles into a 2-cycle.
        let mut params = logistic((2.2, 2.21));
        params.max_iter = 200;
        params.ignore = 180;
        let r = ScanRenderer::new(1, 800, params, ScanColouring::Parity(EVEN, ODD)).unwrap();
        let (raster, _) = r.render();
        let rows = painted_rows(&raster, 0);
        assert_eq!(rows.len(), 2);
        let colours: Vec<Rgb> = rows.iter().map(|row| raster.get(Pixel(0, *row)).unwrap()).collect();
        assert!(colours.contains(&EVEN));
        assert!(colours.contains(&ODD));
    }

    #[test]
    fn palette_colouring_cycles() {
        let palette = Palette::new(vec![Rgb(1, 0, 0), Rgb(2, 0, 0), Rgb(3, 0, 0)]).unwrap();
        let c = ScanColouring::Palette(palette);
        assert_eq!(c.colour(4), Rgb(2, 0, 0));
        assert_eq!(c.colour(3), c.colour(0));
    }

    #[test]
    fn return_map_lands_on_the_diagonal_at_a_fixed_point() {
        let mut params = logistic((1.5, 1.5));
        params.mode = ScanPlot::ReturnMap;
        let r = ScanRenderer::new(150, 150, params, ScanColouring::Parity(EVEN, ODD)).unwrap();
        let (raster, stats) = r.render();
        assert_eq!(stats.written, 150 * 20);
        // (1, 1) is column 93 and, counting from the top, row 56.
        assert_ne!(raster.get(Pixel(93, 56)), Some(BACKGROUND));
        assert_eq!(raster.get(Pixel(56, 93)), Some(BACKGROUND));
    }

    #[test]
    fn reversed_ranges_are_normalised() {
        let a = ScanRenderer::new(20, 30, logistic((1.6, 3.0)), ScanColouring::Parity(EVEN, ODD)).unwrap();
        let mut params = logistic((3.0, 1.6));
        params.p_range = (1.6, 0.0);
        let b = ScanRenderer::new(20, 30, params, ScanColouring::Parity(EVEN, ODD)).unwrap();
        assert_eq!(a.render().0, b.render().0);
    }
}
