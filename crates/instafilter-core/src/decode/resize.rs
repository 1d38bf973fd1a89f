//! Downscaling of source photos before they enter the filter pipeline.
//!
//! Large photos make the heavier filters (blur, crystallize) slow to
//! recompute on every slider move, so the image source usually hands the
//! pipeline a preview-sized copy.

use super::{DecodeError, FilterType, PixelBuffer};

/// Shrink a buffer so its longest edge is at most `max_edge`, preserving
/// aspect ratio. Buffers that already fit are returned unchanged; nothing
/// is ever upscaled.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` when `max_edge` is zero and
/// `DecodeError::CorruptedFile` when the buffer is malformed.
pub fn resize_to_fit(
    image: &PixelBuffer,
    max_edge: u32,
    filter: FilterType,
) -> Result<PixelBuffer, DecodeError> {
    if max_edge == 0 {
        return Err(DecodeError::InvalidFormat);
    }

    if image.width <= max_edge && image.height <= max_edge {
        return Ok(image.clone());
    }

    let rgb_image = image
        .to_rgb_image()
        .ok_or_else(|| DecodeError::CorruptedFile("pixel buffer size mismatch".to_string()))?;

    let (width, height) = fit_dimensions(image.width, image.height, max_edge);
    let resized = image::imageops::resize(&rgb_image, width, height, filter.to_image_filter());

    Ok(PixelBuffer::from_rgb_image(resized))
}

fn fit_dimensions(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }

    let ratio = width as f64 / height as f64;
    if width >= height {
        let new_height = (max_edge as f64 / ratio).round() as u32;
        (max_edge, new_height.max(1))
    } else {
        let new_width = (max_edge as f64 * ratio).round() as u32;
        (new_width.max(1), max_edge)
    }
}
