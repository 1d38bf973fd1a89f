//! JavaScript handle on a [`FilterPipeline`].
//!
//! The UI owns one `JsFilterPipeline` per editing session. Every setter
//! re-renders synchronously, so after a call returns `output()` reflects
//! the latest filter and slider values.
//!
//! ```typescript
//! const pipeline = new JsFilterPipeline();
//! pipeline.set_source_image(decode_image(bytes));
//! pipeline.select_filter('gaussian_blur');
//! if (pipeline.accepts('radius')) pipeline.set_parameter('radius', 0.25);
//! const jpeg = pipeline.encode_output_jpeg(90);
//! ```

use crate::types::{js_error, JsPixelBuffer};
use instafilter_core::encode::OutputFormat;
use instafilter_core::filter::{FilterKind, ParameterKind};
use instafilter_core::mapping::{MappingConfig, NativeMapping};
use instafilter_core::{save, FilterPipeline};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// One row of the filter picker.
#[derive(Debug, Serialize)]
struct CatalogEntry {
    id: &'static str,
    name: &'static str,
    accepts: Vec<ParameterKind>,
}

fn catalog_entries() -> Vec<CatalogEntry> {
    FilterKind::ALL
        .iter()
        .map(|&kind| CatalogEntry {
            id: kind.id(),
            name: kind.display_name(),
            accepts: kind.spec().accepts.iter().collect(),
        })
        .collect()
}

/// The filter picker contents as
/// `[{ id, name, accepts: ["intensity", ...] }, ...]`.
#[wasm_bindgen]
pub fn filter_catalog() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&catalog_entries()).map_err(js_error)
}

#[cfg(target_arch = "wasm32")]
fn console_warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
fn console_warn(_message: &str) {}

/// A filter session: selected filter, slider values, source and output.
#[wasm_bindgen]
pub struct JsFilterPipeline {
    inner: FilterPipeline,
}

impl Default for JsFilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl JsFilterPipeline {
    /// Start a session with the built-in scale factors.
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsFilterPipeline {
        JsFilterPipeline {
            inner: FilterPipeline::new(),
        }
    }

    /// Start a session with scale factors from a TOML document.
    pub fn with_mapping_toml(source: &str) -> Result<JsFilterPipeline, JsValue> {
        let mapping = NativeMapping::from_toml_str(source).map_err(js_error)?;
        Ok(JsFilterPipeline {
            inner: FilterPipeline::with_mapping(mapping),
        })
    }

    /// Replace the scale factors from a JS object shaped like the TOML
    /// config (`{ defaults: { scale: 10 }, overrides: { ... } }`).
    pub fn set_mapping(&mut self, config: JsValue) -> Result<(), JsValue> {
        let config: MappingConfig = serde_wasm_bindgen::from_value(config).map_err(js_error)?;
        let mapping = NativeMapping::from_config(&config).map_err(js_error)?;
        self.inner.set_mapping(mapping);
        Ok(())
    }

    /// Use `image` as the new source and re-render.
    pub fn set_source_image(&mut self, image: &JsPixelBuffer) {
        self.inner.set_source_image(image.to_buffer());
        if !self.inner.has_output() {
            console_warn("instafilter: source image produced no output");
        }
    }

    /// Select a filter by id (`gaussian_blur`) or display name
    /// (`Gaussian Blur`).
    pub fn select_filter(&mut self, name: &str) -> Result<(), JsValue> {
        let filter: FilterKind = name.parse().map_err(js_error)?;
        self.inner.select_filter(filter);
        Ok(())
    }

    /// Move a slider (`intensity`, `radius`, `scale`) to `value` in [0, 1].
    ///
    /// Sliders the selected filter does not accept are stored but have no
    /// effect on the output.
    pub fn set_parameter(&mut self, kind: &str, value: f32) -> Result<(), JsValue> {
        let kind: ParameterKind = kind.parse().map_err(js_error)?;
        self.inner.set_parameter(kind, value);
        Ok(())
    }

    /// Whether the selected filter reacts to the named slider.
    pub fn accepts(&self, kind: &str) -> bool {
        kind.parse::<ParameterKind>()
            .map(|kind| self.inner.selected_filter().accepts(kind))
            .unwrap_or(false)
    }

    #[wasm_bindgen(getter)]
    pub fn selected_filter(&self) -> String {
        self.inner.selected_filter().id().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn selected_filter_name(&self) -> String {
        self.inner.selected_filter().display_name().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn intensity(&self) -> f32 {
        self.inner.parameter(ParameterKind::Intensity)
    }

    #[wasm_bindgen(getter)]
    pub fn radius(&self) -> f32 {
        self.inner.parameter(ParameterKind::Radius)
    }

    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f32 {
        self.inner.parameter(ParameterKind::Scale)
    }

    /// Native values handed to the filter on the last render, as
    /// `{ values: [intensity | null, radius | null, scale | null] }`.
    pub fn applied_parameters(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.applied_parameters()).map_err(js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn has_output(&self) -> bool {
        self.inner.has_output()
    }

    /// A copy of the processed image, if any.
    pub fn output(&self) -> Option<JsPixelBuffer> {
        self.inner
            .output_image()
            .cloned()
            .map(JsPixelBuffer::from_buffer)
    }

    /// Encode the processed image as JPEG. Fails with
    /// "Please select an image to filter" when there is nothing to save.
    pub fn encode_output_jpeg(&self, quality: u8) -> Result<Vec<u8>, JsValue> {
        self.encode_output(OutputFormat::Jpeg { quality })
    }

    /// Encode the processed image as PNG.
    pub fn encode_output_png(&self) -> Result<Vec<u8>, JsValue> {
        self.encode_output(OutputFormat::Png)
    }
}

impl JsFilterPipeline {
    fn encode_output(&self, format: OutputFormat) -> Result<Vec<u8>, JsValue> {
        save::encode_output(&self.inner, format).map_err(|e| {
            console_warn(&e.to_string());
            js_error(e)
        })
    }

    #[cfg(test)]
    fn inner(&self) -> &FilterPipeline {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use instafilter_core::filter::ParameterSet;

    fn gradient(width: u32, height: u32) -> JsPixelBuffer {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((x + y) * 255 / (width + height)) as u8;
                pixels.extend_from_slice(&[v, v / 2, 255 - v]);
            }
        }
        JsPixelBuffer::new(width, height, pixels)
    }

    #[test]
    fn test_new_pipeline_defaults() {
        let pipeline = JsFilterPipeline::new();
        assert_eq!(pipeline.selected_filter(), "sepia_tone");
        assert_eq!(pipeline.selected_filter_name(), "Sepia Tone");
        assert_eq!(pipeline.intensity(), 0.5);
        assert_eq!(pipeline.radius(), 0.5);
        assert_eq!(pipeline.scale(), 0.5);
        assert!(!pipeline.has_output());
        assert!(pipeline.output().is_none());
    }

    #[test]
    fn test_set_source_renders_output() {
        let mut pipeline = JsFilterPipeline::new();
        pipeline.set_source_image(&gradient(8, 6));
        let output = pipeline.output().unwrap();
        assert_eq!((output.width(), output.height()), (8, 6));
    }

    #[test]
    fn test_select_and_set_by_name() {
        let mut pipeline = JsFilterPipeline::new();
        pipeline.set_source_image(&gradient(16, 16));
        pipeline.select_filter("Gaussian Blur").unwrap();
        pipeline.set_parameter("radius", 0.25).unwrap();

        assert_eq!(pipeline.selected_filter(), "gaussian_blur");
        assert_eq!(
            pipeline.inner().applied_parameters().get(ParameterKind::Radius),
            Some(50.0)
        );
    }

    #[test]
    fn test_accepts_follows_selected_filter() {
        let mut pipeline = JsFilterPipeline::new();
        pipeline.select_filter("pixellate").unwrap();
        assert!(pipeline.accepts("scale"));
        assert!(!pipeline.accepts("radius"));
        assert!(!pipeline.accepts("not-a-slider"));
    }

    #[test]
    fn test_with_mapping_toml() {
        let pipeline = JsFilterPipeline::with_mapping_toml("[defaults]\nscale = 10.0\n").unwrap();
        assert_eq!(
            pipeline
                .inner()
                .mapping()
                .native_max(FilterKind::Pixellate, ParameterKind::Scale),
            10.0
        );
    }

    #[test]
    fn test_encode_output_after_render() {
        let mut pipeline = JsFilterPipeline::new();
        pipeline.set_source_image(&gradient(10, 10));
        let jpeg = pipeline.encode_output_jpeg(85).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
        let png = pipeline.encode_output_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    fn test_catalog_entries() {
        let entries = catalog_entries();
        assert_eq!(entries.len(), FilterKind::COUNT);

        let unsharp = entries.iter().find(|e| e.id == "unsharp_mask").unwrap();
        assert_eq!(unsharp.name, "Unsharp Mask");
        let accepts: ParameterSet = unsharp.accepts.iter().copied().collect();
        assert!(accepts.contains(ParameterKind::Intensity));
        assert!(accepts.contains(ParameterKind::Radius));
        assert!(!accepts.contains(ParameterKind::Scale));
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_save_without_output_is_rejected() {
        let pipeline = JsFilterPipeline::new();
        let err = pipeline.encode_output_png().unwrap_err();
        assert_eq!(
            err.as_string().as_deref(),
            Some("Please select an image to filter")
        );
    }

    #[wasm_bindgen_test]
    fn test_unknown_filter_is_rejected() {
        let mut pipeline = JsFilterPipeline::new();
        assert!(pipeline.select_filter("posterize").is_err());
        assert_eq!(pipeline.selected_filter(), "sepia_tone");
    }

    #[wasm_bindgen_test]
    fn test_filter_catalog_value() {
        let value = filter_catalog().unwrap();
        assert!(value.is_object());
    }
}
