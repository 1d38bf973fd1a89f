//! Instafilter WASM - WebAssembly bindings for Instafilter
//!
//! This crate exposes the instafilter-core pipeline to a JavaScript UI:
//! pickers and sliders drive a [`JsFilterPipeline`], which re-renders after
//! every change.
//!
//! # Module Structure
//!
//! - `pipeline` - The filter session handle and filter catalog
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Image decoding and resize bindings
//! - `encode` - Image encoding bindings (JPEG, PNG)
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, JsFilterPipeline } from '@instafilter/wasm';
//!
//! await init();
//!
//! const pipeline = new JsFilterPipeline();
//! pipeline.set_source_image(decode_image(new Uint8Array(await file.arrayBuffer())));
//! pipeline.select_filter('crystallize');
//! pipeline.set_parameter('radius', 0.1);
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod encode;
mod pipeline;
mod types;

pub use decode::{decode_image, resize_to_fit};
pub use encode::{encode_jpeg, encode_png};
pub use pipeline::{filter_catalog, JsFilterPipeline};
pub use types::JsPixelBuffer;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::debug_1(&JsValue::from_str(&format!(
        "instafilter wasm {} ready",
        version()
    )));
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
