#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Feigenbrot renderer
//!
//! Pictures of discrete dynamical systems.  Every picture here comes
//! from the same small pattern: for each pixel (or each value of a
//! parameter) run a bounded iteration, classify how it ended, and pick
//! a colour for that outcome.
//!
//! The escape-time fractals (Mandelbrot, Julia, their real-power and
//! magnet relatives) and Newton's root basins assign one colour to
//! each pixel; see `render`.  Bifurcation diagrams of the logistic map
//! sweep a parameter along the columns and plot every settled iterate
//! of `p`, so a pixel may be written many times or never; see `scan`.
//! The Hénon attractor and the orbiter follow a single trajectory and
//! plot where it goes; see `attractor`.
//!
//! Configurations live in `config`, with named presets and a `validate`
//! that refuses bad settings before any work is done.  Overflow and
//! points that wander off the raster are not errors: they are skipped,
//! counted in `RenderStats` and logged through `tracing`.

pub mod attractor;
pub mod colour;
pub mod config;
pub mod error;
pub mod kernel;
pub mod math;
pub mod output;
pub mod palette;
pub mod planes;
pub mod raster;
pub mod render;
pub mod scan;
pub mod sphere;

pub use crate::config::{AttractorConfig, PixelConfig, PixelFamily, ScanConfig, SurfaceConfig};
pub use crate::error::{FractalError, Result};
pub use crate::kernel::Outcome;
pub use crate::palette::{Palette, PaletteRegistry, Rgb};
pub use crate::planes::{Pixel, PlaneMapper, Window};
pub use crate::raster::{Plot, Raster, RenderStats};
pub use crate::render::PixelRenderer;
