//! Image source bindings: decoding picked photos and sizing them for the
//! pipeline.
//!
//! ```typescript
//! import { decode_image, resize_to_fit } from '@instafilter/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const photo = resize_to_fit(decode_image(bytes), 1600, 2);
//! pipeline.set_source_image(photo);
//! ```

use crate::types::{js_error, resize_filter_from_u8, JsPixelBuffer};
use instafilter_core::decode;
use wasm_bindgen::prelude::*;

/// Decode a JPEG or PNG file, applying EXIF orientation.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsPixelBuffer, JsValue> {
    decode::decode_image(bytes)
        .map(JsPixelBuffer::from_buffer)
        .map_err(js_error)
}

/// Shrink an image so its longest edge is at most `max_edge`.
///
/// `filter`: 0 = Nearest, 1 = Bilinear, 2 = Lanczos3.
#[wasm_bindgen]
pub fn resize_to_fit(
    image: &JsPixelBuffer,
    max_edge: u32,
    filter: u8,
) -> Result<JsPixelBuffer, JsValue> {
    decode::resize_to_fit(&image.to_buffer(), max_edge, resize_filter_from_u8(filter))
        .map(JsPixelBuffer::from_buffer)
        .map_err(js_error)
}
