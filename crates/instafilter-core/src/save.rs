//! Save sink: hands the pipeline's processed output to an encoder and
//! writes it out.
//!
//! Saving before any output exists is the one pipeline-adjacent condition
//! reported to the user. It is non-fatal: the session carries on.

use std::path::Path;

use thiserror::Error;

use crate::decode::PixelBuffer;
use crate::encode::{self, EncodeError, OutputFormat};
use crate::pipeline::FilterPipeline;
use crate::render::FilterEvaluator;

/// Errors surfaced by the save flow.
#[derive(Debug, Error)]
pub enum SaveError {
    /// No source was picked yet, or the filter never produced output.
    #[error("Please select an image to filter")]
    NoProcessedImage,

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("Failed to write {path}: {message}")]
    Io { path: String, message: String },
}

/// The processed image, or `SaveError::NoProcessedImage`.
pub fn processed_image<E: FilterEvaluator>(
    pipeline: &FilterPipeline<E>,
) -> Result<&PixelBuffer, SaveError> {
    pipeline.output_image().ok_or(SaveError::NoProcessedImage)
}

/// Encode the processed image in `format`.
pub fn encode_output<E: FilterEvaluator>(
    pipeline: &FilterPipeline<E>,
    format: OutputFormat,
) -> Result<Vec<u8>, SaveError> {
    let image = processed_image(pipeline)?;
    Ok(encode::encode(
        &image.pixels,
        image.width,
        image.height,
        format,
    )?)
}

/// Encode the processed image (format chosen by extension) and write it to
/// `path`. Returns the number of bytes written.
pub fn save_to_path<E: FilterEvaluator>(
    pipeline: &FilterPipeline<E>,
    path: impl AsRef<Path>,
    jpeg_quality: u8,
) -> Result<usize, SaveError> {
    let path = path.as_ref();
    let format = OutputFormat::from_path(path, jpeg_quality)?;
    let bytes = encode_output(pipeline, format)?;

    std::fs::write(path, &bytes).map_err(|e| SaveError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    tracing::info!(
        path = %path.display(),
        bytes = bytes.len(),
        filter = %pipeline.selected_filter(),
        "saved processed image"
    );
    Ok(bytes.len())
}
