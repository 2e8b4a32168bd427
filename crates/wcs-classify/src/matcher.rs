//! Glob matching for the `ignore` list and the file-exclude map.
//!
//! Patterns follow gitignore syntax: a pattern without a `/` matches the
//! file name at any depth, a pattern with a `/` is anchored at the
//! working-copy root, and a match on a directory covers everything below it.

use std::path::Path;

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use wcs_types::ScmConfig;

use crate::error::{ConfigError, ConfigResult};

/// A configuration snapshot with its glob patterns compiled.
///
/// Built once per pass from the freshly read [`ScmConfig`].
#[derive(Clone, Debug)]
pub struct CompiledConfig {
    config: ScmConfig,
    ignore: Gitignore,
    exclude: Gitignore,
}

impl CompiledConfig {
    /// Compile the glob patterns of `config` for the working copy at `root`.
    pub fn compile(root: &Path, config: &ScmConfig) -> ConfigResult<Self> {
        let ignore = build_matcher(root, config.ignore.iter().map(String::as_str))?;
        let exclude = build_matcher(root, config.enabled_excludes())?;
        Ok(Self {
            config: config.clone(),
            ignore,
            exclude,
        })
    }

    pub fn config(&self) -> &ScmConfig {
        &self.config
    }

    /// Whether a (relative) path matches one of the `ignore` patterns.
    pub fn is_ignored(&self, relative: &str, is_dir: bool) -> bool {
        matches_relative(&self.ignore, relative, is_dir)
    }

    /// Whether a (relative) path falls under an enabled file-exclude pattern.
    pub fn is_excluded(&self, relative: &str, is_dir: bool) -> bool {
        matches_relative(&self.exclude, relative, is_dir)
    }
}

fn build_matcher<'a>(
    root: &Path,
    patterns: impl IntoIterator<Item = &'a str>,
) -> ConfigResult<Gitignore> {
    let mut builder = GitignoreBuilder::new(root);
    for pattern in patterns {
        if pattern.trim().is_empty() {
            continue;
        }
        builder
            .add_line(None, pattern)
            .map_err(|e| ConfigError::InvalidGlob {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;
    }
    builder.build().map_err(|e| ConfigError::InvalidGlob {
        pattern: "<set>".to_string(),
        reason: e.to_string(),
    })
}

fn matches_relative(matcher: &Gitignore, relative: &str, is_dir: bool) -> bool {
    if matcher.is_empty() {
        return false;
    }
    // The matcher asserts that paths are relative to its root.
    let relative = relative.trim_start_matches('/');
    if relative.is_empty() {
        return false;
    }
    matcher
        .matched_path_or_any_parents(relative, is_dir)
        .is_ignore()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(config: ScmConfig) -> CompiledConfig {
        CompiledConfig::compile(Path::new("/wc"), &config).unwrap()
    }

    #[test]
    fn empty_config_matches_nothing() {
        let compiled = compile(ScmConfig::default());
        assert!(!compiled.is_ignored("a.log", false));
        assert!(!compiled.is_excluded("a.log", false));
    }

    #[test]
    fn ignore_patterns_match_base_name_anywhere() {
        let compiled = compile(ScmConfig {
            ignore: vec!["*.log".into(), "/build".into()],
            ..ScmConfig::default()
        });
        assert!(compiled.is_ignored("debug.log", false));
        assert!(compiled.is_ignored("deep/nested/trace.log", false));
        assert!(compiled.is_ignored("build", true));
        assert!(compiled.is_ignored("build/out.o", false));
        assert!(!compiled.is_ignored("src/build.rs", false));
    }

    #[test]
    fn only_enabled_excludes_apply() {
        let mut config = ScmConfig::default();
        config.files_exclude.insert("**/.git".into(), true);
        config.files_exclude.insert("**/node_modules".into(), false);
        let compiled = compile(config);

        assert!(compiled.is_excluded(".git", true));
        assert!(compiled.is_excluded("sub/.git/config", false));
        assert!(!compiled.is_excluded("node_modules/x.js", false));
    }

    #[test]
    fn invalid_glob_is_reported() {
        let err = CompiledConfig::compile(
            Path::new("/wc"),
            &ScmConfig {
                ignore: vec!["a[".into()],
                ..ScmConfig::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGlob { ref pattern, .. } if pattern == "a["));
    }
}
