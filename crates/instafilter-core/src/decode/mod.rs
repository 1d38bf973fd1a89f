//! Image source for the filter pipeline.
//!
//! This module provides functionality for:
//! - Decoding JPEG and PNG photos into RGB [`PixelBuffer`]s
//! - Correcting EXIF orientation so the pipeline sees upright pixels
//! - Downscaling large photos to a preview size
//!
//! All operations are synchronous and allocate a fresh buffer; the input
//! bytes are never modified.

mod loader;
mod resize;
mod types;

pub use loader::{decode_file, decode_image};
pub use resize::resize_to_fit;
pub use types::{DecodeError, FilterType, Orientation, PixelBuffer};
