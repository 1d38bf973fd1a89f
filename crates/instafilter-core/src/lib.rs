//! Instafilter Core - photo filter pipeline
//!
//! This crate holds the headless part of Instafilter: a [`FilterPipeline`]
//! that owns the selected filter and its slider values, maps each slider to
//! the filter's native units, and re-renders the output image whenever
//! anything changes.
//!
//! # Module Structure
//!
//! - `filter` - Filter catalog and per-filter parameter capabilities
//! - `mapping` - Normalized-to-native scale factor table (TOML configurable)
//! - `pipeline` - The filter pipeline and its session state
//! - `render` - Evaluator seam and the built-in filter implementations
//! - `decode` - Photo decoding (image source)
//! - `encode` / `save` - Encoding and the save flow (display/save sink)
//!
//! # Example
//!
//! ```ignore
//! use instafilter_core::{decode, FilterKind, FilterPipeline, ParameterKind};
//!
//! let mut pipeline = FilterPipeline::new();
//! pipeline.set_source_image(decode::decode_file("photo.jpg")?);
//! pipeline.select_filter(FilterKind::GaussianBlur);
//! pipeline.set_parameter(ParameterKind::Radius, 0.05); // sigma = 10 px
//! instafilter_core::save::save_to_path(&pipeline, "blurred.png", 90)?;
//! ```

pub mod decode;
pub mod encode;
pub mod filter;
pub mod mapping;
pub mod pipeline;
pub mod render;
pub mod save;

pub use decode::PixelBuffer;
pub use filter::{FilterKind, FilterSpec, NativeParameters, ParameterKind, ParameterSet};
pub use mapping::{ConfigError, NativeMapping};
pub use pipeline::{FilterPipeline, PipelineState, RenderMode, RenderRequest, RenderedOutput};
pub use render::{BuiltinFilters, FilterEvaluator};
pub use save::SaveError;
