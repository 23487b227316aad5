//! Turning an iteration outcome into a colour.  Everything in here is
//! a pure function of the outcome and the scheme.

use crate::kernel::Outcome;
use crate::palette::{Palette, Rgb};

/// How escaped points are coloured.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Contouring {
    /// Every escaped point gets the infinity colour.
    Off,
    /// Points escaping after iteration `start` are coloured from the
    /// palette by `i mod len`; earlier ones get the infinity colour.
    /// A negative start colours every escape.
    Bands {
        /// The last iteration still drawn in the infinity colour.
        start: i64,
    },
    /// A red ramp laid over the infinity colour, brightest right next
    /// to the set.
    RedField,
}

/// Red-field points this close to the budget get the bright ramp.
pub const RED_OFFSET: usize = 64;

/// The threshold for contour bands: `max_iter - count - 1`.  Showing as
/// many contours as there are iterations colours every escape.
pub fn contour_start(max_iter: usize, count: usize) -> i64 {
    max_iter as i64 - count as i64 - 1
}

/// The colours a pass is drawn with.
#[derive(Clone, Debug, PartialEq)]
pub struct ColourScheme {
    /// Points that never escaped.
    pub set: Rgb,
    /// Points that escaped, outside any contour band.
    pub infinity: Rgb,
    /// Points that never settled on anything: Newton non-convergence,
    /// overflow, and the area around a projected sphere.
    pub default: Rgb,
    /// Contour colours.
    pub palette: Palette,
    /// Contour policy for escaped points.
    pub contouring: Contouring,
}

impl ColourScheme {
    /// Palette colour for iteration `i`, cyclically.
    #[inline]
    pub fn get_contour_colour(&self, i: usize) -> Rgb {
        self.palette.get(i)
    }

    /// Escape-time policy: exhausted points are in the set, escaped
    /// points are contoured or sent to infinity, and overflowed points
    /// keep the set colour they started with.
    pub fn escape_colour(&self, outcome: Outcome, max_iter: usize) -> Rgb {
        match outcome {
            Outcome::Escaped(i) => self.escaped(i, max_iter),
            Outcome::Converged { iteration, .. } => self.escaped(iteration, max_iter),
            Outcome::Exhausted | Outcome::Overflow(_) => self.set,
        }
    }

    /// Root-basin policy.  The colour follows the iteration at which a
    /// root was reached, not which root it was.
    pub fn basin_colour(&self, outcome: Outcome) -> Rgb {
        match outcome {
            Outcome::Converged { iteration, .. } => self.get_contour_colour(iteration),
            Outcome::Escaped(_) | Outcome::Exhausted | Outcome::Overflow(_) => self.default,
        }
    }

    fn escaped(&self, i: usize, max_iter: usize) -> Rgb {
        match self.contouring {
            Contouring::Off => self.infinity,
            Contouring::Bands { start } => {
                if i as i64 > start {
                    self.get_contour_colour(i)
                } else {
                    self.infinity
                }
            }
            Contouring::RedField => red_field(self.infinity, i, max_iter),
        }
    }
}

// Channel arithmetic wraps at 8 bits.
fn red_field(base: Rgb, i: usize, max_iter: usize) -> Rgb {
    let remaining = max_iter.saturating_sub(i);
    let red = if remaining < RED_OFFSET {
        (256 - remaining) as u8
    } else if max_iter < 256 {
        base.0.wrapping_add(i as u8)
    } else {
        base.0.wrapping_add((i * 256 / max_iter) as u8)
    };
    Rgb(red, base.1, base.2)
}

/// Scan colouring by parity: even iterations get `even`.
#[inline]
pub fn parity_colour(i: usize, even: Rgb, odd: Rgb) -> Rgb {
    if i % 2 == 0 {
        even
    } else {
        odd
    }
}
