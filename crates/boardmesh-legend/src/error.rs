//! Error handling for legend rendering

use thiserror::Error;

/// Errors raised while producing legend rasters.
#[derive(Error, Debug)]
pub enum LegendError {
    /// The canvas could not be allocated
    #[error("cannot allocate a {width}x{height} legend canvas")]
    Canvas { width: u32, height: u32 },

    /// Encoding or writing the raster failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
