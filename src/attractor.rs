//! Strange attractors drawn by following a single orbit.  Every point
//! the orbit visits after the settling count is plotted; points that
//! wander off the window are skipped but the orbit carries on.

use num::Complex;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::math::is_degenerate;
use crate::palette::Rgb;
use crate::planes::{Placement, PlaneMapper, Window};
use crate::raster::{Plot, Raster, RenderStats, BACKGROUND};

/// The two-dimensional maps available.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum AttractorMap {
    /// `x' = y − a·x² + 1`, `y' = b·x`
    Henon {
        /// The quadratic coefficient.
        a: f64,
        /// The contraction.
        b: f64,
    },
    /// A rotation by `w` of the point `(x, y − x²)`.
    Orbiter {
        /// Phase angle, in radians.
        w: f64,
    },
}

impl AttractorMap {
    /// One step of the map.
    #[inline]
    pub fn apply(self, z: Complex<f64>) -> Complex<f64> {
        let (x, y) = (z.re, z.im);
        match self {
            AttractorMap::Henon { a, b } => Complex::new(y - a * x * x + 1.0, b * x),
            AttractorMap::Orbiter { w } => {
                let t = y - x * x;
                let (sin_w, cos_w) = w.sin_cos();
                Complex::new(x * cos_w - t * sin_w, x * sin_w + t * cos_w)
            }
        }
    }
}

/// Everything an attractor pass needs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AttractorParameters {
    /// The map.
    pub map: AttractorMap,
    /// Where the first orbit starts.
    pub seed: Complex<f64>,
    /// Iterations discarded before plotting starts.
    pub ignore: usize,
    /// Iterations per orbit.
    pub max_iter: usize,
    /// Number of orbits to follow.
    pub kicks: usize,
    /// How far each orbit's start is shifted from the last one's.
    pub kick: Complex<f64>,
}

/// The parameters of one attractor pass.
#[derive(Clone, Debug)]
pub struct AttractorRenderer {
    plane: PlaneMapper,
    params: AttractorParameters,
    colour: Rgb,
}

impl AttractorRenderer {
    /// Requires the raster size, the window, the parameters and the
    /// colour to draw with.
    pub fn new(
        width: usize,
        height: usize,
        window: Window,
        params: AttractorParameters,
        colour: Rgb,
    ) -> crate::error::Result<Self> {
        Ok(AttractorRenderer {
            plane: PlaneMapper::new(width, height, window)?,
            params,
            colour,
        })
    }

    fn orbit(&self, raster: &mut Raster, start: Complex<f64>, stats: &mut RenderStats) {
        let mut z = start;
        for i in 0..self.params.max_iter {
            match self.plane.point_to_pixel(&z) {
                Placement::Overflow => {
                    warn!(iteration = i, "Overflow - pixel");
                    stats.overflows += 1;
                    return;
                }
                Placement::Inside(_) if i < self.params.ignore => {}
                placement => {
                    let plot = raster.draw(placement, self.colour);
                    if plot == Plot::Skip {
                        debug!(iteration = i, x = z.re, y = z.im, "out of bounds");
                    }
                    stats.record(plot);
                }
            }
            z = self.params.map.apply(z);
            if is_degenerate(z) {
                warn!(iteration = i, "Overflow - function");
                stats.overflows += 1;
                return;
            }
        }
    }

    /// Follow every orbit and return the drawing.
    pub fn render(&self) -> (Raster, RenderStats) {
        info!(
            width = self.plane.width(),
            height = self.plane.height(),
            max_iter = self.params.max_iter,
            kicks = self.params.kicks,
            "Iterating..."
        );
        let start = Instant::now();
        let mut raster = Raster::new(self.plane.width(), self.plane.height(), BACKGROUND);
        let mut stats = RenderStats::default();
        let mut seed = self.params.seed;
        for _ in 0..self.params.kicks {
            self.orbit(&mut raster, seed, &mut stats);
            seed += self.params.kick;
        }
        stats.elapsed = start.elapsed();
        info!(elapsed = ?stats.elapsed, overflows = stats.overflows, "Runtime");
        (raster, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planes::Pixel;

    const COLOUR: Rgb = Rgb(0xFF, 0x00, 0xF0);

    fn henon() -> AttractorParameters {
        AttractorParameters {
            map: AttractorMap::Henon { a: 1.4, b: 0.3 },
            seed: Complex::new(0.0, 0.0),
            ignore: 10,
            max_iter: 600,
            kicks: 1,
            kick: Complex::new(0.0, 0.0),
        }
    }

    #[test]
    fn henon_step() {
        let z = AttractorMap::Henon { a: 1.4, b: 0.3 }.apply(Complex::new(0.0, 0.0));
        assert_eq!(z, Complex::new(1.0, 0.0));
        let z = AttractorMap::Henon { a: 1.4, b: 0.3 }.apply(z);
        assert!((z.re - -0.4).abs() < 1e-12);
        assert!((z.im - 0.3).abs() < 1e-12);
    }

    #[test]
    fn orbiter_with_no_phase_is_a_shear() {
        let z = AttractorMap::Orbiter { w: 0.0 }.apply(Complex::new(0.5, 1.0));
        assert_eq!(z, Complex::new(0.5, 0.75));
    }

    #[test]
    fn henon_draws_its_attractor() {
        let r = AttractorRenderer::new(60, 40, Window::new(-1.5, 1.5, -0.5, 0.5), henon(), COLOUR).unwrap();
        let (raster, stats) = r.render();
        assert_eq!(stats.overflows, 0);
        assert_eq!(stats.out_of_bounds, 0);
        assert_eq!(stats.written, 600 - 10);
        let painted = raster.as_bytes().chunks(3).filter(|p| *p == &COLOUR.to_bytes()[..]).count();
        assert!(painted > 20);
    }

    #[test]
    fn half_a_window_counts_the_other_half() {
        let mut params = henon();
        params.ignore = 0;
        let r = AttractorRenderer::new(30, 40, Window::new(0.0, 1.5, -0.5, 0.5), params, COLOUR).unwrap();
        let (_, stats) = r.render();
        assert!(stats.written > 0);
        assert!(stats.out_of_bounds > 0);
        assert_eq!(stats.written + stats.out_of_bounds, 600);
    }

    #[test]
    fn settling_iterations_are_not_plotted() {
        let mut params = henon();
        params.ignore = 600;
        let r = AttractorRenderer::new(60, 40, Window::new(-1.5, 1.5, -0.5, 0.5), params, COLOUR).unwrap();
        let (raster, stats) = r.render();
        assert_eq!(stats.written, 0);
        assert_eq!(raster.get(Pixel(30, 20)), Some(BACKGROUND));
    }

    #[test]
    fn escaping_orbits_stop_on_overflow() {
        let mut params = henon();
        params.seed = Complex::new(10.0, 10.0);
        let r = AttractorRenderer::new(60, 40, Window::new(-1.5, 1.5, -0.5, 0.5), params, COLOUR).unwrap();
        let (_, stats) = r.render();
        assert_eq!(stats.overflows, 1);
        assert_eq!(stats.written, 0);
    }

    #[test]
    fn kicks_run_several_orbits() {
        let params = AttractorParameters {
            map: AttractorMap::Orbiter {
                w: std::f64::consts::PI / 3.0,
            },
            seed: Complex::new(0.0, 0.0),
            ignore: 0,
            max_iter: 50,
            kicks: 3,
            kick: Complex::new(0.015, -0.015),
        };
        let r = AttractorRenderer::new(64, 64, Window::new(-2.0, 2.0, -2.0, 2.0), params, COLOUR).unwrap();
        let (raster, stats) = r.render();
        assert_eq!(stats.written, 3 * 50);
        // The origin is fixed, so the first orbit paints one pixel only.
        assert_eq!(raster.get(Pixel(32, 31)), Some(COLOUR));
    }
}
