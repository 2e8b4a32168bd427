use thiserror::Error;

/// Errors produced by type parsing and configuration loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown status code: {0}")]
    UnknownStatus(String),

    #[error("unknown lock status: {0}")]
    UnknownLockStatus(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
