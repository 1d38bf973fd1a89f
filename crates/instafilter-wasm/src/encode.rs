//! Encoding bindings for images that did not come from a pipeline (a
//! pipeline's own output is encoded through `JsFilterPipeline`).

use crate::types::{js_error, JsPixelBuffer};
use instafilter_core::encode;
use wasm_bindgen::prelude::*;

/// Encode an image to JPEG bytes. `quality` is clamped to 1-100.
#[wasm_bindgen]
pub fn encode_jpeg(image: &JsPixelBuffer, quality: u8) -> Result<Vec<u8>, JsValue> {
    let pixels = image.pixels();
    encode::encode_jpeg(&pixels, image.width(), image.height(), quality).map_err(js_error)
}

/// Encode an image to PNG bytes.
#[wasm_bindgen]
pub fn encode_png(image: &JsPixelBuffer) -> Result<Vec<u8>, JsValue> {
    let pixels = image.pixels();
    encode::encode_png(&pixels, image.width(), image.height()).map_err(js_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_jpeg_from_buffer() {
        let img = JsPixelBuffer::new(10, 10, vec![128u8; 10 * 10 * 3]);
        let jpeg = encode_jpeg(&img, 90).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encode_png_from_buffer() {
        let img = JsPixelBuffer::new(3, 3, vec![0u8; 27]);
        let png = encode_png(&img).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }
}
