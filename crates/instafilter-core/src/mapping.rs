//! Normalized-to-native parameter mapping.
//!
//! Sliders produce values in `[0, 1]`. Each filter expects its inputs in
//! its own units (radius in pixels, block scale in pixels, intensity as a
//! unit fraction), so the pipeline owns a table of scale factors indexed by
//! `(FilterKind, ParameterKind)`:
//!
//! ```text
//! native = clamp(normalized, 0, 1) * factor[filter][parameter]
//! ```
//!
//! The native range of every entry is therefore `[0, factor]`.
//!
//! ## Configuration
//!
//! The table can be loaded from TOML. Unlisted entries keep the built-in
//! defaults:
//!
//! ```toml
//! [defaults]
//! intensity = 1.0
//! radius = 200.0
//! scale = 50.0
//!
//! [overrides.pixellate]
//! scale = 10.0
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::filter::{FilterKind, ParameterKind};

/// Default factor for intensity: passed through unscaled.
pub const DEFAULT_INTENSITY_FACTOR: f32 = 1.0;
/// Default factor for radius: up to 200 pixels.
pub const DEFAULT_RADIUS_FACTOR: f32 = 200.0;
/// Default factor for scale: up to 50 pixels.
pub const DEFAULT_SCALE_FACTOR: f32 = 50.0;

/// Errors raised while building a mapping from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse mapping config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("Unknown filter in mapping config: {0}")]
    UnknownFilter(String),

    #[error("Invalid scale factor {value} for {filter}/{parameter}: must be finite and non-negative")]
    InvalidFactor {
        filter: FilterKind,
        parameter: ParameterKind,
        value: f32,
    },
}

/// Clamp a slider value into `[0, 1]`. NaN maps to 0.
#[inline]
pub fn normalize(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// One factor per parameter kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScaleFactors {
    pub intensity: f32,
    pub radius: f32,
    pub scale: f32,
}

impl Default for ScaleFactors {
    fn default() -> Self {
        Self {
            intensity: DEFAULT_INTENSITY_FACTOR,
            radius: DEFAULT_RADIUS_FACTOR,
            scale: DEFAULT_SCALE_FACTOR,
        }
    }
}

impl ScaleFactors {
    fn as_row(&self) -> [f32; ParameterKind::COUNT] {
        [self.intensity, self.radius, self.scale]
    }
}

/// Per-filter overrides; `None` keeps the default factor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FactorOverrides {
    pub intensity: Option<f32>,
    pub radius: Option<f32>,
    pub scale: Option<f32>,
}

impl FactorOverrides {
    fn entries(&self) -> [(ParameterKind, Option<f32>); ParameterKind::COUNT] {
        [
            (ParameterKind::Intensity, self.intensity),
            (ParameterKind::Radius, self.radius),
            (ParameterKind::Scale, self.scale),
        ]
    }
}

/// Serialized form of a [`NativeMapping`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MappingConfig {
    pub defaults: ScaleFactors,
    /// Keyed by filter identifier (`gaussian_blur`) or display name.
    pub overrides: BTreeMap<String, FactorOverrides>,
}

/// Enum-indexed table of normalized-to-native scale factors.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeMapping {
    factors: [[f32; ParameterKind::COUNT]; FilterKind::COUNT],
}

impl Default for NativeMapping {
    fn default() -> Self {
        Self::uniform(ScaleFactors::default())
    }
}

impl NativeMapping {
    /// The same factors for every filter.
    pub fn uniform(factors: ScaleFactors) -> Self {
        Self {
            factors: [factors.as_row(); FilterKind::COUNT],
        }
    }

    /// Build a mapping from parsed configuration, validating every factor.
    pub fn from_config(config: &MappingConfig) -> Result<Self, ConfigError> {
        let mut mapping = Self::uniform(config.defaults);
        for filter in FilterKind::ALL {
            for kind in ParameterKind::ALL {
                mapping.set_factor(filter, kind, mapping.factor(filter, kind))?;
            }
        }

        for (name, overrides) in &config.overrides {
            let filter: FilterKind = name
                .parse()
                .map_err(|_| ConfigError::UnknownFilter(name.clone()))?;
            for (kind, value) in overrides.entries() {
                if let Some(value) = value {
                    mapping.set_factor(filter, kind, value)?;
                }
            }
        }

        Ok(mapping)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: MappingConfig = toml::from_str(source)?;
        Self::from_config(&config)
    }

    /// Read a TOML mapping file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let mapping = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), "loaded parameter mapping");
        Ok(mapping)
    }

    #[inline]
    pub fn factor(&self, filter: FilterKind, kind: ParameterKind) -> f32 {
        self.factors[filter.index()][kind.index()]
    }

    /// Replace one table entry. Factors must be finite and non-negative.
    pub fn set_factor(
        &mut self,
        filter: FilterKind,
        kind: ParameterKind,
        factor: f32,
    ) -> Result<(), ConfigError> {
        if !factor.is_finite() || factor < 0.0 {
            return Err(ConfigError::InvalidFactor {
                filter,
                parameter: kind,
                value: factor,
            });
        }
        self.factors[filter.index()][kind.index()] = factor;
        Ok(())
    }

    /// Upper bound of the native range for an entry.
    #[inline]
    pub fn native_max(&self, filter: FilterKind, kind: ParameterKind) -> f32 {
        self.factor(filter, kind)
    }

    /// Map a slider value to native units for `filter`.
    #[inline]
    pub fn native_value(&self, filter: FilterKind, kind: ParameterKind, normalized: f32) -> f32 {
        normalize(normalized) * self.factor(filter, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_factors() {
        let mapping = NativeMapping::default();
        for filter in FilterKind::ALL {
            assert_eq!(mapping.factor(filter, ParameterKind::Intensity), 1.0);
            assert_eq!(mapping.factor(filter, ParameterKind::Radius), 200.0);
            assert_eq!(mapping.factor(filter, ParameterKind::Scale), 50.0);
        }
    }

    #[test]
    fn test_native_value() {
        let mapping = NativeMapping::default();
        let radius = mapping.native_value(FilterKind::GaussianBlur, ParameterKind::Radius, 0.5);
        assert!((radius - 100.0).abs() < 1e-4);

        let intensity = mapping.native_value(FilterKind::SepiaTone, ParameterKind::Intensity, 0.8);
        assert!((intensity - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_native_value_clamps_input() {
        let mapping = NativeMapping::default();
        let f = FilterKind::Pixellate;
        assert_eq!(mapping.native_value(f, ParameterKind::Scale, -3.0), 0.0);
        assert_eq!(mapping.native_value(f, ParameterKind::Scale, 7.0), 50.0);
        assert_eq!(mapping.native_value(f, ParameterKind::Scale, f32::NAN), 0.0);
    }

    #[test]
    fn test_from_toml_overrides() {
        let mapping = NativeMapping::from_toml_str(
            r#"
            [defaults]
            radius = 100.0

            [overrides.pixellate]
            scale = 10.0

            [overrides."Unsharp Mask"]
            radius = 5.0
            "#,
        )
        .unwrap();

        assert_eq!(mapping.factor(FilterKind::Pixellate, ParameterKind::Scale), 10.0);
        assert_eq!(mapping.factor(FilterKind::Crystallize, ParameterKind::Scale), 50.0);
        assert_eq!(mapping.factor(FilterKind::GaussianBlur, ParameterKind::Radius), 100.0);
        assert_eq!(mapping.factor(FilterKind::UnsharpMask, ParameterKind::Radius), 5.0);
        assert_eq!(mapping.factor(FilterKind::SepiaTone, ParameterKind::Intensity), 1.0);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(NativeMapping::from_toml_str("").unwrap(), NativeMapping::default());
    }

    #[test]
    fn test_rejects_unknown_filter() {
        let err = NativeMapping::from_toml_str("[overrides.posterize]\nscale = 2.0").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownFilter(name) if name == "posterize"));
    }

    #[test]
    fn test_rejects_negative_factor() {
        let err = NativeMapping::from_toml_str("[overrides.vignette]\nradius = -1.0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidFactor {
                filter: FilterKind::Vignette,
                parameter: ParameterKind::Radius,
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_negative_default() {
        let err = NativeMapping::from_toml_str("[defaults]\nscale = -2.0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFactor { .. }));
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(matches!(
            NativeMapping::from_toml_str("[defaults]\ngamma = 2.0"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_set_factor_rejects_non_finite() {
        let mut mapping = NativeMapping::default();
        assert!(mapping
            .set_factor(FilterKind::Edges, ParameterKind::Intensity, f32::INFINITY)
            .is_err());
        assert!(mapping
            .set_factor(FilterKind::Edges, ParameterKind::Intensity, 10.0)
            .is_ok());
        assert_eq!(mapping.native_max(FilterKind::Edges, ParameterKind::Intensity), 10.0);
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("instafilter-missing-mapping.toml");
        assert!(matches!(NativeMapping::load(&path), Err(ConfigError::Io { .. })));
    }
}
