//! One working copy and its reconciliation passes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use wcs_classify::{filter_externals, CompiledConfig, StatusCategorizer};
use wcs_commit::{CommitFlow, CommitPlan};
use wcs_index::{GroupObserver, ResourceIndexManager};
use wcs_types::PathNormalizer;

use crate::error::SdkResult;
use crate::source::{ConfigSource, StatusOptions, StatusSource};

/// Outcome of one [`WorkingCopy::refresh`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RefreshSummary {
    /// Sequence number of the pass, starting at 1.
    pub pass: u64,
    /// Badge count.
    pub count: usize,
    /// Records the status source returned.
    pub fetched: usize,
    /// Records dropped as externals or external contents.
    pub filtered_out: usize,
    pub changelists: usize,
    pub is_incomplete: bool,
    pub needs_cleanup: bool,
}

struct State {
    manager: ResourceIndexManager,
    passes: u64,
}

/// A working copy on disk, tracked through a [`StatusSource`].
///
/// Passes are serialized: a `refresh` issued while another one runs waits
/// for it to finish. Dropping a pending `refresh` future abandons the pass
/// without touching the index.
pub struct WorkingCopy {
    root: PathBuf,
    source: Arc<dyn StatusSource>,
    config: Arc<dyn ConfigSource>,
    observer: Option<Arc<dyn GroupObserver>>,
    state: Mutex<State>,
}

impl WorkingCopy {
    pub fn new(
        root: impl Into<PathBuf>,
        source: Arc<dyn StatusSource>,
        config: Arc<dyn ConfigSource>,
    ) -> Self {
        Self {
            root: root.into(),
            source,
            config,
            observer: None,
            state: Mutex::new(State {
                manager: ResourceIndexManager::default(),
                passes: 0,
            }),
        }
    }

    /// Report group lifecycle events to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn GroupObserver>) -> Self {
        let state = self.state.get_mut();
        let normalizer = *state.manager.normalizer();
        state.manager = ResourceIndexManager::new(normalizer).with_observer(observer.clone());
        self.observer = Some(observer);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run one pass: fetch, filter, classify, reconcile.
    ///
    /// Configuration is read afresh. When fetching fails the groups and
    /// index from the previous pass stay as they were.
    pub async fn refresh(&self) -> SdkResult<RefreshSummary> {
        let mut state = self.state.lock().await;

        let config = self.config.current()?;
        let compiled = CompiledConfig::compile(&self.root, &config)?;

        let options = StatusOptions::for_config(&config);
        let records = match self.source.fetch_status(options).await {
            Ok(records) => records,
            Err(err) => {
                warn!(root = %self.root.display(), error = %err, "status fetch failed");
                return Err(err);
            }
        };
        let fetched = records.len();

        let upstream = if config.combine_external_if_same_server {
            match self.source.upstream_identity().await {
                Ok(identity) => Some(identity),
                Err(err) => {
                    warn!(error = %err, "upstream identity unavailable, externals stay separate");
                    None
                }
            }
        } else {
            None
        };

        let filtered = filter_externals(records, upstream.as_deref());
        let filtered_out = filtered.removed(fetched);
        let categorized = StatusCategorizer::new(&self.root, &compiled).categorize(&filtered.records);
        let is_incomplete = categorized.is_incomplete;
        let needs_cleanup = categorized.needs_cleanup;

        if state.manager.normalizer().is_case_insensitive() != config.case_insensitive_paths {
            debug!(
                case_insensitive = config.case_insensitive_paths,
                "path case mode changed, starting a fresh index"
            );
            state.manager.dispose();
            let mut manager =
                ResourceIndexManager::new(PathNormalizer::new(config.case_insensitive_paths));
            if let Some(observer) = &self.observer {
                manager = manager.with_observer(observer.clone());
            }
            state.manager = manager;
        }

        let count = state.manager.update_groups(categorized, &config);
        state.passes += 1;

        let summary = RefreshSummary {
            pass: state.passes,
            count,
            fetched,
            filtered_out,
            changelists: state.manager.changelists().len(),
            is_incomplete,
            needs_cleanup,
        };
        info!(
            root = %self.root.display(),
            pass = summary.pass,
            count,
            fetched,
            filtered_out,
            "refreshed working copy"
        );
        Ok(summary)
    }

    /// Run `f` against the index between passes.
    pub async fn with_index<R>(&self, f: impl FnOnce(&ResourceIndexManager) -> R) -> R {
        let state = self.state.lock().await;
        f(&state.manager)
    }

    /// Plan a commit of `paths` with `flow`.
    pub async fn plan_commit<P: AsRef<Path>>(
        &self,
        flow: &CommitFlow,
        paths: &[P],
    ) -> SdkResult<CommitPlan> {
        let state = self.state.lock().await;
        Ok(flow.plan_for_paths(&state.manager, paths)?)
    }

    /// Plan a commit of everything `flow` considers part of "commit all".
    pub async fn plan_commit_all(&self, flow: &CommitFlow) -> SdkResult<CommitPlan> {
        let state = self.state.lock().await;
        Ok(flow.plan_commit_all(&state.manager)?)
    }

    /// Release every group and clear the index. Safe to call repeatedly.
    pub async fn dispose(&self) {
        let mut state = self.state.lock().await;
        state.manager.dispose();
        debug!(root = %self.root.display(), "disposed working copy");
    }
}

impl std::fmt::Debug for WorkingCopy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkingCopy").field("root", &self.root).finish()
    }
}
