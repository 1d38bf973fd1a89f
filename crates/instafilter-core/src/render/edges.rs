//! Colour edge detection.

use image::{GrayImage, Luma, RgbImage};
use imageproc::gradients::sobel_gradients;

/// Sobel kernels sum to 4 on each side, so a full 0→255 step produces a
/// magnitude of 4 * 255. Dividing by this keeps a unit gain at intensity 1.
const SOBEL_GAIN: f32 = 4.0;

/// Replace each channel with its Sobel gradient magnitude scaled by
/// `intensity`. Flat regions go black; an intensity of zero yields a black
/// image.
pub fn edges(image: &RgbImage, intensity: f32) -> RgbImage {
    let (width, height) = image.dimensions();
    let gain = if intensity.is_nan() {
        0.0
    } else {
        intensity.max(0.0) / SOBEL_GAIN
    };

    let mut out = RgbImage::new(width, height);
    for c in 0..3 {
        let channel = GrayImage::from_fn(width, height, |x, y| Luma([image.get_pixel(x, y)[c]]));
        let gradients = sobel_gradients(&channel);
        for (x, y, magnitude) in gradients.enumerate_pixels() {
            let value = (magnitude[0] as f32 * gain).round().clamp(0.0, 255.0);
            out.get_pixel_mut(x, y)[c] = value as u8;
        }
    }
    out
}
