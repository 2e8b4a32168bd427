//! Error types for the commit crate.

/// Errors that can occur while planning a commit.
#[derive(Debug, thiserror::Error)]
pub enum CommitError {
    /// The selection was empty.
    #[error("nothing to commit")]
    NothingToCommit,

    /// A requested path is not shown in any local group.
    #[error("path is not tracked: {0}")]
    NotTracked(String),

    /// Conflicted resources must be resolved first.
    #[error("{count} conflicted resource(s) must be resolved before committing")]
    Conflicted { count: usize },
}

/// Convenience alias for commit results.
pub type CommitResult<T> = Result<T, CommitError>;
