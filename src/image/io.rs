//! Convenience helpers for decoding captures via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::RasterImage;
use crate::util::{StitchMatchError, StitchMatchResult};
use std::path::Path;

/// Creates an owned raster from an RGBA buffer.
pub fn raster_from_rgba_image(img: image::RgbaImage) -> StitchMatchResult<RasterImage> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    RasterImage::new(img.into_raw(), width, height)
}

/// Converts any decoded image to RGBA8.
pub fn raster_from_dynamic_image(img: &image::DynamicImage) -> StitchMatchResult<RasterImage> {
    raster_from_rgba_image(img.to_rgba8())
}

/// Loads an image from disk and converts it to an RGBA raster.
pub fn load_rgba_image<P: AsRef<Path>>(path: P) -> StitchMatchResult<RasterImage> {
    let img = image::open(path).map_err(|err| StitchMatchError::ImageIo {
        reason: err.to_string(),
    })?;
    raster_from_dynamic_image(&img)
}
