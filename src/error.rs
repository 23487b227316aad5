//! The ways a render can be refused before it starts, or fail to be
//! written after it finishes.  Numeric trouble inside a pass is not
//! an error; see `kernel::Outcome` and `planes::Placement`.

use failure::Fail;
use std::io;

/// Everything that can go wrong between reading a configuration and
/// writing an image.
#[derive(Debug, Fail)]
pub enum FractalError {
    /// The iteration budget is not a number, or is absurd.
    #[fail(display = "Please enter iterations: {}", _0)]
    Iterations(String),

    /// A window bound is missing, non-numeric or not finite.
    #[fail(display = "Please enter ranges: {}", _0)]
    Bounds(String),

    /// The raster would have no pixels, or far too many.
    #[fail(display = "Could not parse output image size: {}", _0)]
    Size(String),

    /// The contour count is not usable with the iteration budget.
    #[fail(display = "Please enter nr. of contours: {}", _0)]
    Contours(String),

    /// A colour was not six hex digits.
    #[fail(display = "Please enter hex value for colour: {}", _0)]
    Colour(String),

    /// The seed (Julia constant, Hénon start point...) is unusable.
    #[fail(display = "Please enter seed value: {}", _0)]
    Seed(String),

    /// Any other out-of-range numeric parameter.
    #[fail(display = "Invalid parameter: {}", _0)]
    Parameter(String),

    /// A render thread panicked before finishing its rows.
    #[fail(display = "Render failure: a worker thread panicked")]
    Worker,

    /// The image could not be written.
    #[fail(display = "Couldn't save file: {}", _0)]
    Io(#[cause] io::Error),
}

impl From<io::Error> for FractalError {
    fn from(err: io::Error) -> Self {
        FractalError::Io(err)
    }
}

/// Shorthand used throughout the crate.
pub type Result<T> = std::result::Result<T, FractalError>;
