//! Collaborators a [`WorkingCopy`](crate::WorkingCopy) pulls from.
//!
//! [`StatusSource`] talks to the version-control tool; [`ConfigSource`]
//! hands out the configuration as it is right now. In-memory versions of
//! both are provided for tests, REPL sessions and the CLI, which replays a
//! status dump from disk.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use wcs_types::{RawStatusRecord, ScmConfig};

use crate::error::{SdkError, SdkResult};

/// What the status command should report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusOptions {
    pub include_ignored: bool,
    pub include_externals: bool,
    pub check_remote_changes: bool,
}

impl StatusOptions {
    /// The options a reconciliation pass asks for under `config`.
    pub fn for_config(config: &ScmConfig) -> Self {
        Self {
            include_ignored: true,
            include_externals: true,
            check_remote_changes: config.check_remote_changes,
        }
    }
}

/// Access to the version-control tool's status output.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Run the status command and return its parsed records.
    async fn fetch_status(&self, options: StatusOptions) -> SdkResult<Vec<RawStatusRecord>>;

    /// Identity of the repository the working copy was checked out from.
    async fn upstream_identity(&self) -> SdkResult<String>;
}

/// Access to the current configuration.
pub trait ConfigSource: Send + Sync {
    fn current(&self) -> SdkResult<ScmConfig>;
}

/// A [`ConfigSource`] holding a value that can be swapped at runtime.
#[derive(Debug, Default)]
pub struct StaticConfig {
    config: RwLock<ScmConfig>,
}

impl StaticConfig {
    pub fn new(config: ScmConfig) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }

    /// Replace the configuration seen by later passes.
    pub fn set(&self, config: ScmConfig) {
        match self.config.write() {
            Ok(mut current) => *current = config,
            Err(poisoned) => *poisoned.into_inner() = config,
        }
    }
}

impl ConfigSource for StaticConfig {
    fn current(&self) -> SdkResult<ScmConfig> {
        match self.config.read() {
            Ok(config) => Ok(config.clone()),
            Err(poisoned) => Ok(poisoned.into_inner().clone()),
        }
    }
}

/// An in-memory [`StatusSource`] replaying a fixed set of records.
///
/// Records, upstream identity, and an injected failure can all be changed
/// between passes.
#[derive(Debug, Default)]
pub struct InMemoryStatusSource {
    records: RwLock<Vec<RawStatusRecord>>,
    upstream: RwLock<Option<String>>,
    failure: RwLock<Option<String>>,
    last_options: RwLock<Option<StatusOptions>>,
    fetches: AtomicUsize,
}

impl InMemoryStatusSource {
    pub fn new(records: Vec<RawStatusRecord>) -> Self {
        Self {
            records: RwLock::new(records),
            ..Self::default()
        }
    }

    pub fn with_upstream(self, upstream: impl Into<String>) -> Self {
        self.set_upstream(Some(upstream.into()));
        self
    }

    pub fn set_records(&self, records: Vec<RawStatusRecord>) {
        write(&self.records, records);
    }

    pub fn set_upstream(&self, upstream: Option<String>) {
        write(&self.upstream, upstream);
    }

    /// Make every later fetch fail with `message` until cleared with `None`.
    pub fn set_failure(&self, message: Option<String>) {
        write(&self.failure, message);
    }

    /// How many times `fetch_status` has been called.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Options passed to the most recent fetch.
    pub fn last_options(&self) -> Option<StatusOptions> {
        read(&self.last_options)
    }
}

#[async_trait]
impl StatusSource for InMemoryStatusSource {
    async fn fetch_status(&self, options: StatusOptions) -> SdkResult<Vec<RawStatusRecord>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        write(&self.last_options, Some(options));
        if let Some(message) = read(&self.failure) {
            return Err(SdkError::Source(message));
        }
        Ok(read(&self.records))
    }

    async fn upstream_identity(&self) -> SdkResult<String> {
        read(&self.upstream).ok_or_else(|| SdkError::Source("no upstream repository".into()))
    }
}

fn read<T: Clone>(lock: &RwLock<T>) -> T {
    match lock.read() {
        Ok(value) => value.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

fn write<T>(lock: &RwLock<T>, value: T) {
    match lock.write() {
        Ok(mut current) => *current = value,
        Err(poisoned) => *poisoned.into_inner() = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wcs_types::Status;

    #[tokio::test]
    async fn in_memory_source_replays_records() {
        let source = InMemoryStatusSource::new(vec![RawStatusRecord::new("a.txt", Status::Modified)]);
        let options = StatusOptions::for_config(&ScmConfig::default());
        let records = source.fetch_status(options).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(source.fetch_count(), 1);
        assert_eq!(source.last_options(), Some(options));
        assert!(options.check_remote_changes);
    }

    #[tokio::test]
    async fn injected_failure_until_cleared() {
        let source = InMemoryStatusSource::new(Vec::new());
        source.set_failure(Some("svn: E155007".into()));
        let err = source.fetch_status(StatusOptions::default()).await.unwrap_err();
        assert!(matches!(err, SdkError::Source(ref m) if m.contains("E155007")));

        source.set_failure(None);
        assert!(source.fetch_status(StatusOptions::default()).await.is_ok());
    }

    #[tokio::test]
    async fn upstream_identity_optional() {
        let source = InMemoryStatusSource::new(Vec::new());
        assert!(source.upstream_identity().await.is_err());
        let source = source.with_upstream("svn://example/repo");
        assert_eq!(source.upstream_identity().await.unwrap(), "svn://example/repo");
    }

    #[test]
    fn static_config_swaps() {
        let config = StaticConfig::new(ScmConfig::default());
        assert!(!config.current().unwrap().count_unversioned);
        config.set(ScmConfig {
            count_unversioned: true,
            ..ScmConfig::default()
        });
        assert!(config.current().unwrap().count_unversioned);
    }
}
