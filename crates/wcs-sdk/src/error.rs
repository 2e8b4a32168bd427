use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    /// The status collaborator failed.
    #[error("status source error: {0}")]
    Source(String),

    #[error("config error: {0}")]
    Config(#[from] wcs_classify::ConfigError),

    #[error("commit error: {0}")]
    Commit(#[from] wcs_commit::CommitError),

    #[error("type error: {0}")]
    Types(#[from] wcs_types::TypeError),
}

pub type SdkResult<T> = Result<T, SdkError>;
