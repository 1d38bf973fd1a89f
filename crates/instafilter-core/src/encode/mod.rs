//! Encoding of processed images for the save sink.
//!
//! This module provides functionality for:
//! - Encoding RGB pixel data to JPEG with configurable quality
//! - Lossless PNG encoding
//! - Choosing an output format from a file extension
//!
//! # Examples
//!
//! ```ignore
//! use instafilter_core::encode::{encode, OutputFormat};
//!
//! let pixels = vec![128u8; 100 * 100 * 3];
//! let bytes = encode(&pixels, 100, 100, OutputFormat::Jpeg { quality: 90 }).unwrap();
//! ```

mod jpeg;
mod png;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use jpeg::encode_jpeg;
pub use png::encode_png;

/// Default JPEG quality used by the save flow.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The output path has an extension we cannot encode
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// The underlying encoder failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Output container for a saved image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Jpeg { quality: u8 },
    Png,
}

impl OutputFormat {
    /// Pick a format from a path's extension (`jpg`, `jpeg`, `png`,
    /// case-insensitive).
    pub fn from_path(path: &Path, jpeg_quality: u8) -> Result<Self, EncodeError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg {
                quality: jpeg_quality,
            }),
            "png" => Ok(OutputFormat::Png),
            "" => Err(EncodeError::UnsupportedFormat(
                "missing file extension".to_string(),
            )),
            other => Err(EncodeError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Encode RGB pixel data in the requested format.
pub fn encode(
    pixels: &[u8],
    width: u32,
    height: u32,
    format: OutputFormat,
) -> Result<Vec<u8>, EncodeError> {
    match format {
        OutputFormat::Jpeg { quality } => encode_jpeg(pixels, width, height, quality),
        OutputFormat::Png => encode_png(pixels, width, height),
    }
}

fn validate(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}
