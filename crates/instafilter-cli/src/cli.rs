//! Command implementations for the `instafilter` binary.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use instafilter_core::decode::{self, FilterType};
use instafilter_core::encode::DEFAULT_JPEG_QUALITY;
use instafilter_core::{save, FilterKind, FilterPipeline, NativeMapping, ParameterKind};

use crate::config;

/// Inputs for one `apply` run.
#[derive(Debug, Clone, PartialEq, Args)]
pub struct ApplyOptions {
    /// Source image (JPEG or PNG)
    pub input: PathBuf,

    /// Output file; the extension picks JPEG or PNG
    #[arg(short, long)]
    pub output: PathBuf,

    /// Filter id or name (see `instafilter filters`)
    #[arg(short, long, default_value = "sepia_tone")]
    pub filter: FilterKind,

    /// Intensity slider, 0.0 to 1.0
    #[arg(long)]
    pub intensity: Option<f32>,

    /// Radius slider, 0.0 to 1.0
    #[arg(long)]
    pub radius: Option<f32>,

    /// Scale slider, 0.0 to 1.0
    #[arg(long)]
    pub scale: Option<f32>,

    /// Shrink the source so its longest edge is at most this many pixels
    #[arg(long)]
    pub max_edge: Option<u32>,

    /// JPEG quality (1-100)
    #[arg(short, long)]
    pub quality: Option<u8>,

    /// Mapping config (default: ~/.config/instafilter/mapping.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl ApplyOptions {
    fn parameters(&self) -> [(ParameterKind, Option<f32>); ParameterKind::COUNT] {
        [
            (ParameterKind::Intensity, self.intensity),
            (ParameterKind::Radius, self.radius),
            (ParameterKind::Scale, self.scale),
        ]
    }
}

/// Decode `input`, run it through one filter, and save the result.
pub fn apply(options: &ApplyOptions) -> anyhow::Result<()> {
    let mapping = config::resolve_mapping(options.config.as_deref())?;
    let pipeline = build_pipeline(options, mapping)?;

    let quality = options.quality.unwrap_or(DEFAULT_JPEG_QUALITY);
    let written = save::save_to_path(&pipeline, &options.output, quality)
        .with_context(|| format!("failed to save {}", options.output.display()))?;

    println!(
        "{} -> {} ({}, {} bytes)",
        options.input.display(),
        options.output.display(),
        pipeline.selected_filter(),
        written
    );
    Ok(())
}

/// Configure the pipeline, then hand it the source so it renders once.
fn build_pipeline(
    options: &ApplyOptions,
    mapping: NativeMapping,
) -> anyhow::Result<FilterPipeline> {
    let mut pipeline = FilterPipeline::with_mapping(mapping);
    pipeline.select_filter(options.filter);

    let spec = pipeline.selected_spec();
    for (kind, value) in options.parameters() {
        let Some(value) = value else { continue };
        if !spec.accepts(kind) {
            tracing::warn!(
                filter = spec.display_name,
                parameter = %kind,
                "parameter is ignored by this filter"
            );
        }
        pipeline.set_parameter(kind, value);
    }

    let image = load_source(&options.input, options.max_edge)?;
    pipeline.set_source_image(image);
    Ok(pipeline)
}

fn load_source(path: &Path, max_edge: Option<u32>) -> anyhow::Result<decode::PixelBuffer> {
    let image = decode::decode_file(path)
        .with_context(|| format!("failed to decode {}", path.display()))?;

    match max_edge {
        Some(max_edge) => {
            let resized = decode::resize_to_fit(&image, max_edge, FilterType::Lanczos3)
                .context("failed to resize source image")?;
            tracing::info!(
                from = %format!("{}x{}", image.width, image.height),
                to = %format!("{}x{}", resized.width, resized.height),
                "resized source"
            );
            Ok(resized)
        }
        None => Ok(image),
    }
}

/// The filter catalog, one line per filter with its native ranges.
pub fn filter_listing(mapping: &NativeMapping) -> Vec<String> {
    FilterKind::ALL
        .iter()
        .map(|&filter| {
            let ranges: Vec<String> = filter
                .spec()
                .accepts
                .iter()
                .map(|kind| format!("{kind} 0..{}", mapping.native_max(filter, kind)))
                .collect();
            format!("{:<14} {:<14} {}", filter.id(), filter.display_name(), ranges.join(", "))
        })
        .collect()
}

pub fn list_filters(config: Option<&Path>) -> anyhow::Result<()> {
    let mapping = config::resolve_mapping(config)?;
    for line in filter_listing(&mapping) {
        println!("{line}");
    }
    Ok(())
}
