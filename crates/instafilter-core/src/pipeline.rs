//! The filter pipeline: selected filter + normalized parameters in,
//! filtered image out.
//!
//! Every mutation (new source, new filter, slider moved) triggers a
//! recompute:
//!
//! 1. Start from the filter instance's applied parameters.
//! 2. For each parameter the selected filter accepts, map the stored slider
//!    value through the [`NativeMapping`] and apply it. Parameters the filter
//!    does not accept are never set.
//! 3. Evaluate the filter against the source image.
//!
//! Absence of a source image is a steady state, not an error. An evaluation
//! that yields nothing leaves the previous output in place.
//!
//! ## Deferred rendering
//!
//! In [`RenderMode::Deferred`] step 3 is skipped. The embedder takes a
//! [`RenderRequest`], evaluates it wherever it likes, and hands the result
//! back through [`FilterPipeline::accept_render`]. Each recompute bumps a
//! generation counter; results from superseded requests are dropped, so the
//! visible output is always from the latest state.

use std::sync::Arc;

use crate::decode::PixelBuffer;
use crate::filter::{FilterKind, FilterSpec, NativeParameters, ParameterKind};
use crate::mapping::{normalize, NativeMapping};
use crate::render::{BuiltinFilters, FilterEvaluator};

/// Slider value every parameter starts at.
pub const DEFAULT_NORMALIZED_VALUE: f32 = 0.5;

/// When recompute evaluates the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Evaluate synchronously inside every mutating call.
    #[default]
    Inline,
    /// Apply parameters only; evaluation happens through
    /// [`FilterPipeline::render_request`].
    Deferred,
}

/// The session state owned by a [`FilterPipeline`].
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineState {
    selected_filter: FilterKind,
    normalized: [f32; ParameterKind::COUNT],
    source_image: Option<Arc<PixelBuffer>>,
    output_image: Option<PixelBuffer>,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self {
            selected_filter: FilterKind::SepiaTone,
            normalized: [DEFAULT_NORMALIZED_VALUE; ParameterKind::COUNT],
            source_image: None,
            output_image: None,
        }
    }
}

impl PipelineState {
    pub fn selected_filter(&self) -> FilterKind {
        self.selected_filter
    }

    /// Stored slider value for `kind`, in `[0, 1]`.
    pub fn parameter(&self, kind: ParameterKind) -> f32 {
        self.normalized[kind.index()]
    }

    pub fn intensity(&self) -> f32 {
        self.parameter(ParameterKind::Intensity)
    }

    pub fn radius(&self) -> f32 {
        self.parameter(ParameterKind::Radius)
    }

    pub fn scale(&self) -> f32 {
        self.parameter(ParameterKind::Scale)
    }

    pub fn source_image(&self) -> Option<&PixelBuffer> {
        self.source_image.as_deref()
    }

    pub fn output_image(&self) -> Option<&PixelBuffer> {
        self.output_image.as_ref()
    }
}

/// A self-contained snapshot of what to render.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub generation: u64,
    pub filter: FilterKind,
    pub params: NativeParameters,
    pub source: Arc<PixelBuffer>,
}

impl RenderRequest {
    pub fn render<E: FilterEvaluator + ?Sized>(&self, evaluator: &E) -> RenderedOutput {
        RenderedOutput {
            generation: self.generation,
            image: evaluator.evaluate(self.filter, &self.params, &self.source),
        }
    }
}

/// The result of evaluating a [`RenderRequest`].
#[derive(Debug, Clone)]
pub struct RenderedOutput {
    pub generation: u64,
    pub image: Option<PixelBuffer>,
}

/// Owns the pipeline state and funnels every mutation through a recompute.
pub struct FilterPipeline<E = BuiltinFilters> {
    evaluator: E,
    mapping: NativeMapping,
    mode: RenderMode,
    state: PipelineState,
    applied: NativeParameters,
    generation: u64,
}

impl FilterPipeline<BuiltinFilters> {
    /// Pipeline with the built-in filters and the default mapping table.
    pub fn new() -> Self {
        Self::with_evaluator(BuiltinFilters, NativeMapping::default())
    }

    pub fn with_mapping(mapping: NativeMapping) -> Self {
        Self::with_evaluator(BuiltinFilters, mapping)
    }
}

impl Default for FilterPipeline<BuiltinFilters> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: FilterEvaluator> FilterPipeline<E> {
    pub fn with_evaluator(evaluator: E, mapping: NativeMapping) -> Self {
        Self {
            evaluator,
            mapping,
            mode: RenderMode::Inline,
            state: PipelineState::default(),
            applied: NativeParameters::new(),
            generation: 0,
        }
    }

    /// Switch between inline and deferred evaluation.
    pub fn with_render_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    /// Replace the source image. Any previous output is discarded before
    /// the recompute, so a failed evaluation leaves no output rather than
    /// output derived from the old photo.
    pub fn set_source_image(&mut self, image: PixelBuffer) {
        tracing::debug!(
            width = image.width,
            height = image.height,
            well_formed = image.is_well_formed(),
            "source image replaced"
        );
        self.state.source_image = Some(Arc::new(image));
        self.state.output_image = None;
        self.recompute();
    }

    /// Select a filter. The new filter starts as a fresh instance with
    /// nothing applied; the current slider values are then re-applied
    /// against its accepted parameters.
    pub fn select_filter(&mut self, filter: FilterKind) {
        tracing::debug!(filter = %filter, accepts = ?filter.spec().accepts, "filter selected");
        self.state.selected_filter = filter;
        self.applied = NativeParameters::new();
        self.recompute();
    }

    /// Store a slider value (clamped to `[0, 1]`) and recompute.
    pub fn set_parameter(&mut self, kind: ParameterKind, value: f32) {
        self.state.normalized[kind.index()] = normalize(value);
        if !self.state.selected_filter.accepts(kind) {
            tracing::trace!(
                filter = %self.state.selected_filter,
                parameter = %kind,
                "parameter not accepted by filter; ignored"
            );
        }
        self.recompute();
    }

    /// Replace the mapping table and recompute with the new factors.
    pub fn set_mapping(&mut self, mapping: NativeMapping) {
        self.mapping = mapping;
        self.recompute();
    }

    /// Re-derive the output image from the current state.
    pub fn recompute(&mut self) {
        self.generation += 1;

        let filter = self.state.selected_filter;
        for kind in filter.spec().accepts.iter() {
            let native = self
                .mapping
                .native_value(filter, kind, self.state.parameter(kind));
            self.applied.set(kind, native);
        }

        if self.mode == RenderMode::Deferred {
            return;
        }

        let Some(request) = self.render_request() else {
            return;
        };
        let rendered = request.render(&self.evaluator);
        self.accept_render(rendered);
    }

    /// Snapshot of the current render inputs, or `None` without a source.
    pub fn render_request(&self) -> Option<RenderRequest> {
        let source = self.state.source_image.clone()?;
        Some(RenderRequest {
            generation: self.generation,
            filter: self.state.selected_filter,
            params: self.applied,
            source,
        })
    }

    /// Install a rendered result. Returns `true` if the visible output was
    /// updated; results from superseded generations and empty results are
    /// dropped.
    pub fn accept_render(&mut self, rendered: RenderedOutput) -> bool {
        if rendered.generation != self.generation {
            tracing::debug!(
                stale = rendered.generation,
                current = self.generation,
                "dropping superseded render"
            );
            return false;
        }

        match rendered.image {
            Some(image) => {
                tracing::debug!(
                    filter = %self.state.selected_filter,
                    params = ?self.applied,
                    generation = self.generation,
                    "output recomputed"
                );
                self.state.output_image = Some(image);
                true
            }
            None => {
                tracing::warn!(
                    filter = %self.state.selected_filter,
                    "filter produced no output; keeping previous result"
                );
                false
            }
        }
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn selected_filter(&self) -> FilterKind {
        self.state.selected_filter
    }

    pub fn selected_spec(&self) -> &'static FilterSpec {
        self.state.selected_filter.spec()
    }

    pub fn parameter(&self, kind: ParameterKind) -> f32 {
        self.state.parameter(kind)
    }

    /// Native values currently set on the filter instance.
    pub fn applied_parameters(&self) -> &NativeParameters {
        &self.applied
    }

    pub fn source_image(&self) -> Option<&PixelBuffer> {
        self.state.source_image()
    }

    pub fn output_image(&self) -> Option<&PixelBuffer> {
        self.state.output_image()
    }

    pub fn has_output(&self) -> bool {
        self.state.output_image.is_some()
    }

    pub fn mapping(&self) -> &NativeMapping {
        &self.mapping
    }

    /// Incremented on every recompute.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
