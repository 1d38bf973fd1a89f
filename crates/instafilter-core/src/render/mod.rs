//! Filter evaluation.
//!
//! The pipeline treats evaluation as an opaque function
//! `(filter, native parameters, source) -> output?` behind the
//! [`FilterEvaluator`] trait. [`BuiltinFilters`] is the shipped
//! implementation, operating on RGB8 buffers.
//!
//! ## Native units and defaults
//!
//! | Filter        | Parameter | Unit                  | Default |
//! |---------------|-----------|-----------------------|---------|
//! | Sepia Tone    | intensity | blend fraction        | 1.0     |
//! | Crystallize   | radius    | cell pitch, px        | 20      |
//! | Edges         | intensity | gain                  | 1.0     |
//! | Gaussian Blur | radius    | sigma, px             | 10      |
//! | Pixellate     | scale     | block size, px        | 8       |
//! | Unsharp Mask  | radius    | sigma, px             | 2.5     |
//! | Unsharp Mask  | intensity | sharpening amount     | 0.5     |
//! | Vignette      | intensity | darkening at corners  | 0.0     |
//! | Vignette      | radius    | untouched disc, px    | 150     |
//!
//! Every filter is deterministic: the same input always yields
//! bit-identical output.

mod blur;
mod cells;
mod edges;
mod tone;

pub use blur::{gaussian_blur, unsharp_mask};
pub use cells::{crystallize, pixellate};
pub use edges::edges;
pub use tone::{sepia_tone, smootherstep, vignette};

use crate::decode::PixelBuffer;
use crate::filter::{FilterKind, NativeParameters, ParameterKind};

/// Evaluates a filter against a source image.
///
/// Returning `None` means "no output"; the pipeline treats that as a
/// recoverable no-op.
pub trait FilterEvaluator {
    fn evaluate(
        &self,
        filter: FilterKind,
        params: &NativeParameters,
        source: &PixelBuffer,
    ) -> Option<PixelBuffer>;
}

impl<F> FilterEvaluator for F
where
    F: Fn(FilterKind, &NativeParameters, &PixelBuffer) -> Option<PixelBuffer>,
{
    fn evaluate(
        &self,
        filter: FilterKind,
        params: &NativeParameters,
        source: &PixelBuffer,
    ) -> Option<PixelBuffer> {
        self(filter, params, source)
    }
}

/// Native defaults, indexed by `[filter][parameter]`. Entries for
/// parameters a filter does not accept are never read.
const NATIVE_DEFAULTS: [[f32; ParameterKind::COUNT]; FilterKind::COUNT] = [
    // intensity, radius, scale
    [1.0, 0.0, 0.0],   // Sepia Tone
    [0.0, 20.0, 0.0],  // Crystallize
    [1.0, 0.0, 0.0],   // Edges
    [0.0, 10.0, 0.0],  // Gaussian Blur
    [0.0, 0.0, 8.0],   // Pixellate
    [0.5, 2.5, 0.0],   // Unsharp Mask
    [0.0, 150.0, 0.0], // Vignette
];

/// The value a filter uses for `kind` when it was never set.
pub fn native_default(filter: FilterKind, kind: ParameterKind) -> f32 {
    NATIVE_DEFAULTS[filter.index()][kind.index()]
}

/// Reference implementations of the catalog filters.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFilters;

impl FilterEvaluator for BuiltinFilters {
    fn evaluate(
        &self,
        filter: FilterKind,
        params: &NativeParameters,
        source: &PixelBuffer,
    ) -> Option<PixelBuffer> {
        let mut image = source.to_rgb_image()?;
        let value = |kind| params.get_or(kind, native_default(filter, kind));

        let output = match filter {
            FilterKind::SepiaTone => {
                sepia_tone(&mut image, value(ParameterKind::Intensity));
                image
            }
            FilterKind::Crystallize => crystallize(&image, value(ParameterKind::Radius)),
            FilterKind::Edges => edges(&image, value(ParameterKind::Intensity)),
            FilterKind::GaussianBlur => gaussian_blur(&image, value(ParameterKind::Radius)),
            FilterKind::Pixellate => pixellate(&image, value(ParameterKind::Scale)),
            FilterKind::UnsharpMask => unsharp_mask(
                &image,
                value(ParameterKind::Radius),
                value(ParameterKind::Intensity),
            ),
            FilterKind::Vignette => {
                vignette(
                    &mut image,
                    value(ParameterKind::Intensity),
                    value(ParameterKind::Radius),
                );
                image
            }
        };

        Some(PixelBuffer::from_rgb_image(output))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> PixelBuffer {
        PixelBuffer::from_rgb_image(test_images::gradient(24, 16))
    }

    #[test]
    fn test_every_filter_produces_same_sized_output() {
        let src = source();
        for filter in FilterKind::ALL {
            let out = BuiltinFilters
                .evaluate(filter, &NativeParameters::new(), &src)
                .unwrap_or_else(|| panic!("{filter} produced no output"));
            assert_eq!((out.width, out.height), (src.width, src.height));
            assert!(out.is_well_formed());
        }
    }

    #[test]
    fn test_malformed_source_yields_no_output() {
        let broken = PixelBuffer::new(10, 10, vec![1, 2, 3]);
        for filter in FilterKind::ALL {
            assert!(BuiltinFilters
                .evaluate(filter, &NativeParameters::new(), &broken)
                .is_none());
        }
    }

    #[test]
    fn test_unset_parameters_use_defaults() {
        let src = source();
        let mut explicit = NativeParameters::new();
        explicit.set(ParameterKind::Radius, 10.0);

        let implicit_out =
            BuiltinFilters.evaluate(FilterKind::GaussianBlur, &NativeParameters::new(), &src);
        let explicit_out = BuiltinFilters.evaluate(FilterKind::GaussianBlur, &explicit, &src);
        assert_eq!(implicit_out, explicit_out);
    }

    #[test]
    fn test_closure_evaluator() {
        let invert = |_: FilterKind, _: &NativeParameters, src: &PixelBuffer| {
            Some(PixelBuffer::new(
                src.width,
                src.height,
                src.pixels.iter().map(|p| 255 - p).collect(),
            ))
        };
        let out = invert
            .evaluate(FilterKind::Edges, &NativeParameters::new(), &PixelBuffer::filled(1, 1, [5, 6, 7]))
            .unwrap();
        assert_eq!(out.pixels, vec![250, 249, 248]);
    }

    #[test]
    fn test_huge_native_values_still_render() {
        let src = source();
        for value in [1e9, 1e10, f32::MAX] {
            let mut params = NativeParameters::new();
            for kind in ParameterKind::ALL {
                params.set(kind, value);
            }
            for filter in FilterKind::ALL {
                let out = BuiltinFilters
                    .evaluate(filter, &params, &src)
                    .unwrap_or_else(|| panic!("{filter} produced no output at {value}"));
                assert_eq!((out.width, out.height), (src.width, src.height));
                assert!(out.is_well_formed());
            }
        }
    }

    #[test]
    fn test_native_defaults_only_for_accepted() {
        for filter in FilterKind::ALL {
            for kind in ParameterKind::ALL {
                if !filter.accepts(kind) {
                    assert_eq!(native_default(filter, kind), 0.0);
                }
            }
        }
    }
}
