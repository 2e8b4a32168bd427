//! Error types for the classify crate.

/// Errors raised while preparing configuration for a pass.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A glob pattern from `ignore` or the file-exclude map did not compile.
    #[error("invalid glob pattern {pattern:?}: {reason}")]
    InvalidGlob { pattern: String, reason: String },
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
