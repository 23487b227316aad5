//! Configuration for a rendering pass.  Each kind of pass has one plain
//! structure with every knob spelled out, a named preset per family
//! carrying the usual defaults, and a `validate` that refuses unusable
//! settings before any work starts.  `build` validates and hands back a
//! renderer.

use num::Complex;
use std::str::FromStr;

use crate::attractor::{AttractorMap, AttractorParameters, AttractorRenderer};
use crate::colour::{contour_start, ColourScheme, Contouring};
use crate::error::{FractalError, Result};
use crate::kernel::{EscapeTime, Family, Kernel, NewtonBasin, Sign, Transition};
use crate::palette::{Palette, PaletteRegistry, Rgb, DEFAULT_RAMP_LENGTH};
use crate::planes::{pixel_count, PlaneMapper, Window};
use crate::render::{PixelRenderer, Surface};
use crate::scan::{ScanColouring, ScanFunction, ScanParameters, ScanPlot, ScanRenderer};
use crate::sphere::SphereProjection;

/// Iteration budgets above this are refused.
pub const ABSURD_ITER: usize = 10_000;

/// Generated grayscale ramps longer than this are refused.
pub const MAX_PALETTE_LENGTH: usize = 4096;

/// Given a string and a separator, returns the two values separated by
/// the separator.
pub fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

/// A specific implementation of parse_pair using a comma and expecting
/// floating point numbers.
pub fn parse_complex(s: &str) -> Option<Complex<f64>> {
    parse_pair(s, ',').map(|(re, im)| Complex { re, im })
}

fn check_iterations(max_iter: usize) -> Result<()> {
    if max_iter < 2 || max_iter > ABSURD_ITER {
        return Err(FractalError::Iterations(format!(
            "{} is not between 2 and {}",
            max_iter, ABSURD_ITER
        )));
    }
    Ok(())
}

fn check_range(name: &str, range: (f64, f64)) -> Result<()> {
    if !range.0.is_finite() || !range.1.is_finite() {
        return Err(FractalError::Bounds(format!("{} {:?} is not finite", name, range)));
    }
    Ok(())
}

fn check_size(width: usize, height: usize) -> Result<()> {
    pixel_count(width, height).map(|_| ())
}

fn check_palette_length(length: usize) -> Result<()> {
    if length > MAX_PALETTE_LENGTH {
        return Err(FractalError::Parameter(format!(
            "palette length {} is more than {}",
            length, MAX_PALETTE_LENGTH
        )));
    }
    Ok(())
}

fn check_seed(seed: Complex<f64>) -> Result<()> {
    if !seed.re.is_finite() || !seed.im.is_finite() {
        return Err(FractalError::Seed(format!("{}", seed)));
    }
    Ok(())
}

fn check_ignore(ignore: usize, max_iter: usize) -> Result<()> {
    if ignore >= max_iter {
        return Err(FractalError::Parameter(format!(
            "ignore count {} leaves nothing of {} iterations to plot",
            ignore, max_iter
        )));
    }
    Ok(())
}

/// The pixel-per-value families.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PixelFamily {
    /// `z := z² ± c`, the pixel is `c`.
    Mandelbrot,
    /// `z := z² ± c`, the pixel is `z₀`.
    Julia,
    /// `z := z^p ± c` for a real power.
    Power,
    /// The first magnetism model.
    Magnet,
    /// Newton basins of the roots of unity.
    Newton,
}

/// What the raster is laid over.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SurfaceConfig {
    /// The window, flat.
    Flat,
    /// A Riemann sphere turned by two angles, in degrees.
    Sphere {
        /// Latitude turn.
        x_angle: f64,
        /// Longitude turn.
        z_angle: f64,
        /// Draw the great circles.
        grid_lines: bool,
    },
}

/// Everything a pixel-per-value pass reads.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelConfig {
    /// Which iteration.
    pub family: PixelFamily,
    /// Real extent of the window, in either order.
    pub x_range: (f64, f64),
    /// Bottom of the window.
    pub y_min: f64,
    /// Top of the window.  `None` derives it from the x extent and
    /// `ratio`.
    pub y_max: Option<f64>,
    /// Height over width, of both the raster and (when `y_max` is
    /// derived) the window.
    pub ratio: f64,
    /// Raster columns.
    pub width: usize,
    /// Raster rows.  `None` derives them from `width` and `ratio`.
    pub height: Option<usize>,
    /// Iteration budget per pixel.
    pub max_iter: usize,
    /// Squared escape radius, or the Newton convergence epsilon.
    pub limit: f64,
    /// How `c` enters the transition.
    pub sign: Sign,
    /// `z₀` for Mandelbrot-like families, `c` for Julia.
    pub seed: Complex<f64>,
    /// Exponent for the power family.
    pub power: f64,
    /// Root count for Newton.
    pub degree: u32,
    /// Name of the contour palette.
    pub palette: String,
    /// Length of the grayscale ramp when the palette is not registered.
    pub palette_length: usize,
    /// Replacements for the first palette entries, in order.
    pub contour_overrides: Vec<Rgb>,
    /// Show this many contour bands below the budget.  `None` turns
    /// contouring off.
    pub contours: Option<usize>,
    /// Use the red-field colouring for escapes instead of bands.
    pub red_field: bool,
    /// Interior colour.
    pub set: Rgb,
    /// Escape colour outside contour bands.
    pub infinity: Rgb,
    /// Colour for pixels that settle on nothing.
    pub default: Rgb,
    /// Flat window or Riemann sphere.
    pub surface: SurfaceConfig,
}

impl Default for PixelConfig {
    fn default() -> Self {
        PixelConfig {
            family: PixelFamily::Mandelbrot,
            x_range: (-2.0, 2.0),
            y_min: -1.5,
            y_max: None,
            ratio: 0.75,
            width: 720,
            height: None,
            max_iter: 100,
            limit: 25.0,
            sign: Sign::Plus,
            seed: Complex::new(0.0, 0.0),
            power: 2.0,
            degree: 3,
            palette: "3TEST".to_string(),
            palette_length: DEFAULT_RAMP_LENGTH,
            contour_overrides: vec![],
            contours: None,
            red_field: false,
            set: Rgb(0xD0, 0xFF, 0xFF),
            infinity: Rgb(0x00, 0x00, 0x00),
            default: Rgb(0x80, 0x80, 0x80),
            surface: SurfaceConfig::Flat,
        }
    }
}

impl PixelConfig {
    /// The Mandelbrot set.
    pub fn mandelbrot() -> Self {
        PixelConfig {
            x_range: (-2.0, 1.0),
            y_min: -1.125,
            ..PixelConfig::default()
        }
    }

    /// The Julia set around `-0.745405 - 0.113006i`.
    pub fn julia() -> Self {
        PixelConfig {
            family: PixelFamily::Julia,
            seed: Complex::new(-0.745405, -0.113006),
            ..PixelConfig::default()
        }
    }

    /// The cubic Mandelbrot.
    pub fn power() -> Self {
        PixelConfig {
            family: PixelFamily::Power,
            x_range: (-1.6, 1.6),
            y_min: -1.2,
            max_iter: 60,
            limit: 49.0,
            power: 3.0,
            ..PixelConfig::default()
        }
    }

    /// The first magnetism model.
    pub fn magnet() -> Self {
        PixelConfig {
            family: PixelFamily::Magnet,
            x_range: (-0.9, 3.5),
            y_min: -2.2,
            ratio: 1.0,
            width: 400,
            max_iter: 64,
            ..PixelConfig::default()
        }
    }

    /// Newton basins of the cube roots of one.
    pub fn newton() -> Self {
        PixelConfig {
            family: PixelFamily::Newton,
            max_iter: 16,
            limit: 0.0025,
            palette: "4CAL_4".to_string(),
            default: Rgb(0xFF, 0x40, 0x40),
            ..PixelConfig::default()
        }
    }

    /// The Mandelbrot set seen on the Riemann sphere, every escape
    /// contoured.
    pub fn sphere() -> Self {
        PixelConfig {
            x_range: (-1.0, 1.0),
            y_min: -1.0,
            ratio: 1.0,
            width: 500,
            limit: 49.0,
            contours: Some(100),
            infinity: Rgb(0x03, 0x03, 0x03),
            default: Rgb(0x00, 0x00, 0x00),
            surface: SurfaceConfig::Sphere {
                x_angle: 0.0,
                z_angle: 0.0,
                grid_lines: true,
            },
            ..PixelConfig::default()
        }
    }

    /// The window, with `y_max` derived if it was left out.
    pub fn window(&self) -> Window {
        let (x_start, x_end) = self.x_range;
        match self.y_max {
            Some(y_max) => Window::new(x_start, x_end, self.y_min, y_max),
            None => Window::from_aspect(x_start, x_end, self.y_min, self.ratio),
        }
    }

    /// Raster rows, derived if they were left out.
    pub fn height(&self) -> usize {
        match self.height {
            Some(height) => height,
            None => (self.width as f64 * self.ratio).floor() as usize,
        }
    }

    /// Refuse anything that would not render.
    pub fn validate(&self) -> Result<()> {
        check_iterations(self.max_iter)?;
        check_range("x", self.x_range)?;
        check_range("y", (self.y_min, self.y_max.unwrap_or(self.y_min)))?;
        if !self.ratio.is_finite() || self.ratio <= 0.0 {
            return Err(FractalError::Size(format!("ratio {}", self.ratio)));
        }
        if !self.window().is_finite() {
            return Err(FractalError::Bounds(format!("{:?}", self.window())));
        }
        check_size(self.width, self.height())?;
        check_palette_length(self.palette_length)?;
        if !self.limit.is_finite() || self.limit <= 0.0 {
            return Err(FractalError::Parameter(format!("limit {}", self.limit)));
        }
        check_seed(self.seed)?;
        if let Some(count) = self.contours {
            if count > self.max_iter {
                return Err(FractalError::Contours(format!(
                    "{} is more than the {} iterations",
                    count, self.max_iter
                )));
            }
        }
        match self.family {
            PixelFamily::Power if !self.power.is_finite() => {
                Err(FractalError::Parameter(format!("power {}", self.power)))
            }
            PixelFamily::Newton if self.degree < 2 => {
                Err(FractalError::Parameter(format!("root count {}", self.degree)))
            }
            _ => Ok(()),
        }
    }

    /// The colours, with the palette taken from `registry` and the
    /// overrides applied.
    pub fn colour_scheme(&self, registry: &PaletteRegistry) -> ColourScheme {
        let mut palette = registry.get_palette(&self.palette, self.palette_length);
        for (i, colour) in self.contour_overrides.iter().enumerate() {
            palette.set(i, *colour);
        }
        let contouring = if self.red_field {
            Contouring::RedField
        } else {
            match self.contours {
                Some(count) => Contouring::Bands {
                    start: contour_start(self.max_iter, count),
                },
                None => Contouring::Off,
            }
        };
        ColourScheme {
            set: self.set,
            infinity: self.infinity,
            default: self.default,
            palette,
            contouring,
        }
    }

    fn kernel(&self) -> Kernel {
        let escape = |family, transition| {
            Kernel::Escape(EscapeTime {
                family,
                transition,
                sign: self.sign,
                seed: self.seed,
                limit: self.limit,
            })
        };
        match self.family {
            PixelFamily::Mandelbrot => escape(Family::Mandelbrot, Transition::Quadratic),
            PixelFamily::Julia => escape(Family::Julia, Transition::Quadratic),
            PixelFamily::Power => escape(Family::Mandelbrot, Transition::RealPower(self.power)),
            PixelFamily::Magnet => escape(Family::Mandelbrot, Transition::Magnet),
            PixelFamily::Newton => Kernel::Newton(NewtonBasin::new(self.degree, self.limit)),
        }
    }

    /// Validate, then assemble the renderer.
    pub fn build(&self, registry: &PaletteRegistry) -> Result<PixelRenderer> {
        self.validate()?;
        let plane = PlaneMapper::new(self.width, self.height(), self.window())?;
        let surface = match self.surface {
            SurfaceConfig::Flat => Surface::Flat(plane),
            SurfaceConfig::Sphere {
                x_angle,
                z_angle,
                grid_lines,
            } => Surface::Sphere(plane, SphereProjection::new(x_angle, z_angle, grid_lines)),
        };
        Ok(PixelRenderer::new(
            surface,
            self.kernel(),
            self.colour_scheme(registry),
            self.max_iter,
        ))
    }
}

/// Everything a parameter scan reads.
#[derive(Clone, Debug, PartialEq)]
pub struct ScanConfig {
    /// The `k` sweep.
    pub k_range: (f64, f64),
    /// The `p` extent.
    pub p_range: (f64, f64),
    /// Raster columns, one `k` each.
    pub width: usize,
    /// Raster rows.
    pub height: usize,
    /// The map.
    pub function: ScanFunction,
    /// Bifurcation diagram or return map.
    pub mode: ScanPlot,
    /// Starting `p`.
    pub p0: f64,
    /// Settling iterations.
    pub ignore: usize,
    /// Iterations per column.
    pub max_iter: usize,
    /// Even-iteration colour.
    pub even: Rgb,
    /// Odd-iteration colour.
    pub odd: Rgb,
    /// Colour from this palette instead of by parity.
    pub palette: Option<String>,
    /// Length of the grayscale ramp when the palette is not registered.
    pub palette_length: usize,
}

impl ScanConfig {
    /// The logistic bifurcation diagram.
    pub fn feigenbaum() -> Self {
        ScanConfig {
            k_range: (1.6, 3.0),
            p_range: (0.0, 1.6),
            width: 800,
            height: 400,
            function: ScanFunction::Logistic,
            mode: ScanPlot::Bifurcation,
            p0: 0.3,
            ignore: 20,
            max_iter: 40,
            even: Rgb(0xFF, 0x00, 0xF0),
            odd: Rgb(0x00, 0xF0, 0xFF),
            palette: None,
            palette_length: DEFAULT_RAMP_LENGTH,
        }
    }

    /// Refuse anything that would not render.
    pub fn validate(&self) -> Result<()> {
        check_iterations(self.max_iter)?;
        check_range("k", self.k_range)?;
        check_range("p", self.p_range)?;
        check_size(self.width, self.height)?;
        check_palette_length(self.palette_length)?;
        if !self.p0.is_finite() {
            return Err(FractalError::Seed(format!("p0 {}", self.p0)));
        }
        check_ignore(self.ignore, self.max_iter)
    }

    /// Validate, then assemble the renderer.
    pub fn build(&self, registry: &PaletteRegistry) -> Result<ScanRenderer> {
        self.validate()?;
        let colouring = match self.palette {
            Some(ref name) => ScanColouring::Palette(registry.get_palette(name, self.palette_length)),
            None => ScanColouring::Parity(self.even, self.odd),
        };
        ScanRenderer::new(
            self.width,
            self.height,
            ScanParameters {
                k_range: self.k_range,
                p_range: self.p_range,
                function: self.function,
                mode: self.mode,
                p0: self.p0,
                ignore: self.ignore,
                max_iter: self.max_iter,
            },
            colouring,
        )
    }
}

/// Everything an attractor pass reads.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AttractorConfig {
    /// The map and its constants.
    pub map: AttractorMap,
    /// Horizontal extent.
    pub x_range: (f64, f64),
    /// Vertical extent.
    pub y_range: (f64, f64),
    /// Raster columns.
    pub width: usize,
    /// Raster rows.
    pub height: usize,
    /// First orbit's start.
    pub seed: Complex<f64>,
    /// Settling iterations per orbit.
    pub ignore: usize,
    /// Iterations per orbit.
    pub max_iter: usize,
    /// Number of orbits.
    pub kicks: usize,
    /// Shift between orbit starts.
    pub kick: Complex<f64>,
    /// Drawing colour.
    pub colour: Rgb,
}

impl AttractorConfig {
    /// The Hénon attractor, `a = 1.4`, `b = 0.3`.
    pub fn henon() -> Self {
        AttractorConfig {
            map: AttractorMap::Henon { a: 1.4, b: 0.3 },
            x_range: (-1.5, 1.5),
            y_range: (-0.5, 0.5),
            width: 600,
            height: 400,
            seed: Complex::new(0.0, 0.0),
            ignore: 10,
            max_iter: 600,
            kicks: 1,
            kick: Complex::new(0.0, 0.0),
            colour: Rgb(0xFF, 0x00, 0xF0),
        }
    }

    /// The orbiter at `w = π/3`, 33 orbits.
    pub fn orbiter() -> Self {
        AttractorConfig {
            map: AttractorMap::Orbiter {
                w: std::f64::consts::FRAC_PI_3,
            },
            x_range: (-2.0, 2.0),
            y_range: (-2.0, 2.0),
            max_iter: 1000,
            kicks: 33,
            kick: Complex::new(0.015, -0.015),
            ..AttractorConfig::henon()
        }
    }

    /// Refuse anything that would not render.
    pub fn validate(&self) -> Result<()> {
        check_iterations(self.max_iter)?;
        check_range("x", self.x_range)?;
        check_range("y", self.y_range)?;
        check_size(self.width, self.height)?;
        check_seed(self.seed)?;
        check_seed(self.kick)?;
        let constants_finite = match self.map {
            AttractorMap::Henon { a, b } => a.is_finite() && b.is_finite(),
            AttractorMap::Orbiter { w } => w.is_finite(),
        };
        if !constants_finite {
            return Err(FractalError::Parameter(format!("{:?}", self.map)));
        }
        check_ignore(self.ignore, self.max_iter)
    }

    /// Validate, then assemble the renderer.
    pub fn build(&self) -> Result<AttractorRenderer> {
        self.validate()?;
        let window = Window::from_corners(
            Complex::new(self.x_range.0, self.y_range.0),
            Complex::new(self.x_range.1, self.y_range.1),
        );
        AttractorRenderer::new(
            self.width,
            self.height,
            window,
            AttractorParameters {
                map: self.map,
                seed: self.seed,
                ignore: self.ignore,
                max_iter: self.max_iter,
                kicks: self.kicks,
                kick: self.kick,
            },
            self.colour,
        )
    }
}

/// Parse a list of hex colours separated by commas, as given for the
/// contour overrides.
pub fn parse_colours(s: &str) -> Result<Vec<Rgb>> {
    s.split(',').map(|c| Rgb::from_hex(c.trim())).collect()
}

/// A palette from a list of hex colours separated by commas.
pub fn parse_palette(s: &str) -> Result<Palette> {
    Palette::new(parse_colours(s)?)
}
