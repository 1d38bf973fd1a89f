//! Filter catalog: the named filters, the parameters they accept, and the
//! native values applied to a filter instance.
//!
//! Support for a parameter is a static property of a filter, looked up in an
//! enum-indexed capability table rather than discovered at runtime.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the slider-controlled filter inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    Intensity = 0,
    Radius = 1,
    Scale = 2,
}

impl ParameterKind {
    /// Number of parameter kinds; the width of every per-kind table.
    pub const COUNT: usize = 3;

    pub const ALL: [ParameterKind; Self::COUNT] = [
        ParameterKind::Intensity,
        ParameterKind::Radius,
        ParameterKind::Scale,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lowercase identifier, as used in configuration files and the CLI.
    pub const fn id(self) -> &'static str {
        match self {
            ParameterKind::Intensity => "intensity",
            ParameterKind::Radius => "radius",
            ParameterKind::Scale => "scale",
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned when a parameter identifier is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown parameter: {0} (expected intensity, radius or scale)")]
pub struct ParseParameterError(pub String);

impl FromStr for ParameterKind {
    type Err = ParseParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ParameterKind::ALL
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseParameterError(s.to_string()))
    }
}

/// A set of parameter kinds, stored as a bitmask.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ParameterSet(u8);

impl ParameterSet {
    pub const EMPTY: ParameterSet = ParameterSet(0);

    /// Return a copy of this set with `kind` added.
    pub const fn with(self, kind: ParameterKind) -> Self {
        ParameterSet(self.0 | (1 << kind.index()))
    }

    #[inline]
    pub const fn contains(self, kind: ParameterKind) -> bool {
        self.0 & (1 << kind.index()) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in `ParameterKind::ALL` order.
    pub fn iter(self) -> impl Iterator<Item = ParameterKind> {
        ParameterKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }
}

impl fmt::Debug for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<ParameterKind> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = ParameterKind>>(iter: I) -> Self {
        iter.into_iter()
            .fold(ParameterSet::EMPTY, |set, kind| set.with(kind))
    }
}

/// A named image filter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    #[default]
    SepiaTone = 0,
    Crystallize = 1,
    Edges = 2,
    GaussianBlur = 3,
    Pixellate = 4,
    UnsharpMask = 5,
    Vignette = 6,
}

/// Static description of a filter: its name and accepted parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    pub kind: FilterKind,
    /// Human-readable name, as shown on a filter picker.
    pub display_name: &'static str,
    /// Stable snake_case identifier.
    pub id: &'static str,
    /// Parameters this filter consumes. Anything else is ignored.
    pub accepts: ParameterSet,
}

impl FilterSpec {
    #[inline]
    pub fn accepts(&self, kind: ParameterKind) -> bool {
        self.accepts.contains(kind)
    }
}

const INTENSITY: ParameterSet = ParameterSet::EMPTY.with(ParameterKind::Intensity);
const RADIUS: ParameterSet = ParameterSet::EMPTY.with(ParameterKind::Radius);
const SCALE: ParameterSet = ParameterSet::EMPTY.with(ParameterKind::Scale);

/// Capability table, indexed by `FilterKind as usize`.
static CATALOG: [FilterSpec; FilterKind::COUNT] = [
    FilterSpec {
        kind: FilterKind::SepiaTone,
        display_name: "Sepia Tone",
        id: "sepia_tone",
        accepts: INTENSITY,
    },
    // Crystallize takes a cell radius only; it has no scale input.
    FilterSpec {
        kind: FilterKind::Crystallize,
        display_name: "Crystallize",
        id: "crystallize",
        accepts: RADIUS,
    },
    FilterSpec {
        kind: FilterKind::Edges,
        display_name: "Edges",
        id: "edges",
        accepts: INTENSITY,
    },
    FilterSpec {
        kind: FilterKind::GaussianBlur,
        display_name: "Gaussian Blur",
        id: "gaussian_blur",
        accepts: RADIUS,
    },
    FilterSpec {
        kind: FilterKind::Pixellate,
        display_name: "Pixellate",
        id: "pixellate",
        accepts: SCALE,
    },
    FilterSpec {
        kind: FilterKind::UnsharpMask,
        display_name: "Unsharp Mask",
        id: "unsharp_mask",
        accepts: INTENSITY.with(ParameterKind::Radius),
    },
    FilterSpec {
        kind: FilterKind::Vignette,
        display_name: "Vignette",
        id: "vignette",
        accepts: INTENSITY.with(ParameterKind::Radius),
    },
];

impl FilterKind {
    pub const COUNT: usize = 7;

    /// Every filter, in picker order.
    pub const ALL: [FilterKind; Self::COUNT] = [
        FilterKind::SepiaTone,
        FilterKind::Crystallize,
        FilterKind::Edges,
        FilterKind::GaussianBlur,
        FilterKind::Pixellate,
        FilterKind::UnsharpMask,
        FilterKind::Vignette,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn spec(self) -> &'static FilterSpec {
        &CATALOG[self.index()]
    }

    pub fn display_name(self) -> &'static str {
        self.spec().display_name
    }

    pub fn id(self) -> &'static str {
        self.spec().id
    }

    #[inline]
    pub fn accepts(self, kind: ParameterKind) -> bool {
        self.spec().accepts(kind)
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error returned when a filter name is not in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown filter: {0}")]
pub struct ParseFilterError(pub String);

impl FromStr for FilterKind {
    type Err = ParseFilterError;

    /// Accepts the identifier (`gaussian_blur`), a kebab-case variant
    /// (`gaussian-blur`) or the display name (`Gaussian Blur`), ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        FilterKind::ALL
            .into_iter()
            .find(|kind| kind.id() == normalized)
            .ok_or_else(|| ParseFilterError(s.to_string()))
    }
}

/// Native values set on a filter instance, one slot per parameter kind.
///
/// `None` means the parameter was never set; the evaluator falls back to the
/// filter's own default for it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NativeParameters {
    values: [Option<f32>; ParameterKind::COUNT],
}

impl NativeParameters {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, kind: ParameterKind) -> Option<f32> {
        self.values[kind.index()]
    }

    pub fn set(&mut self, kind: ParameterKind, value: f32) {
        self.values[kind.index()] = Some(value);
    }

    /// The value for `kind`, or `default` if it was never set.
    #[inline]
    pub fn get_or(&self, kind: ParameterKind, default: f32) -> f32 {
        self.get(kind).unwrap_or(default)
    }

    /// Which parameters have been set.
    pub fn set_kinds(&self) -> ParameterSet {
        ParameterKind::ALL
            .into_iter()
            .filter(|kind| self.get(*kind).is_some())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }
}
