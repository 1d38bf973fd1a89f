use std::path::{Path, PathBuf};

use anyhow::Context;
use instafilter_core::NativeMapping;

/// Returns the user mapping file path, if a config directory is available.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("instafilter").join("mapping.toml"))
}

/// Picks the scale factor table for this run.
///
/// An explicit `--config` must exist and parse. The per-user file is only
/// read when present; otherwise the built-in factors are used.
pub fn resolve_mapping(explicit: Option<&Path>) -> anyhow::Result<NativeMapping> {
    resolve_from(explicit, default_config_path())
}

fn resolve_from(explicit: Option<&Path>, fallback: Option<PathBuf>) -> anyhow::Result<NativeMapping> {
    if let Some(path) = explicit {
        tracing::debug!(path = %path.display(), "loading mapping from --config");
        return NativeMapping::load(path)
            .with_context(|| format!("failed to load mapping config {}", path.display()));
    }

    match fallback {
        Some(path) if path.is_file() => {
            tracing::debug!(path = %path.display(), "loading user mapping");
            NativeMapping::load(&path)
                .with_context(|| format!("failed to load mapping config {}", path.display()))
        }
        _ => Ok(NativeMapping::default()),
    }
}
