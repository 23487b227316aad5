//! Writing a finished raster to disk.

use image::png::PNGEncoder;
use image::ColorType;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::raster::Raster;

/// Save the raster as an 8-bit RGB PNG.
pub fn write_png<P: AsRef<Path>>(path: P, raster: &Raster) -> Result<()> {
    let path = path.as_ref();
    let output = BufWriter::new(File::create(path)?);
    let encoder = PNGEncoder::new(output);
    encoder.encode(
        raster.as_bytes(),
        raster.width() as u32,
        raster.height() as u32,
        ColorType::RGB(8),
    )?;
    info!(path = %path.display(), "image written");
    Ok(())
}
