//! Path resolution and index-key normalization.

use std::path::{Path, PathBuf};

/// Resolve a record path (relative to the working copy) against `root`.
///
/// `"."` and the empty string resolve to the root itself. Paths that are
/// already absolute are returned unchanged.
pub fn resolve_record_path(root: &Path, relative: &str) -> PathBuf {
    let trimmed = relative.trim_start_matches("./");
    if trimmed.is_empty() || trimmed == "." {
        return root.to_path_buf();
    }
    let candidate = Path::new(trimmed);
    if candidate.is_absolute() {
        return candidate.to_path_buf();
    }
    trimmed
        .split(['/', '\\'])
        .filter(|part| !part.is_empty() && *part != ".")
        .fold(root.to_path_buf(), |acc, part| acc.join(part))
}

/// Turns paths into flat-index keys.
///
/// Keys use `/` separators and carry no trailing separator. On
/// case-insensitive file systems keys are lower-cased, so lookups must go
/// through the same normalizer that built the index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathNormalizer {
    case_insensitive: bool,
}

impl PathNormalizer {
    pub const fn new(case_insensitive: bool) -> Self {
        Self { case_insensitive }
    }

    /// The convention of the platform this binary was built for.
    pub const fn platform() -> Self {
        Self::new(cfg!(windows))
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    pub fn normalize(&self, path: &Path) -> String {
        let mut key = path.to_string_lossy().replace('\\', "/");
        while key.len() > 1 && key.ends_with('/') {
            key.pop();
        }
        if self.case_insensitive {
            key = key.to_lowercase();
        }
        key
    }
}

impl Default for PathNormalizer {
    fn default() -> Self {
        Self::platform()
    }
}
