//! The classification outcome for one path.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::path::resolve_record_path;
use crate::record::{RawStatusRecord, RemoteStatus};
use crate::status::{LockStatus, PathKind, PropStatus, Status};

/// A path the engine decided to show, with everything the presentation
/// layer needs to decorate it.
///
/// Resources are rebuilt from scratch on every classification pass and
/// never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedResource {
    /// Absolute path of the resource.
    pub resource_path: PathBuf,
    pub status: Status,
    /// Absolute copy-from path when the resource is a rename target.
    pub rename_source: Option<PathBuf>,
    pub props: PropStatus,
    /// `true` for repository-side shadow entries.
    pub remote: bool,
    pub locked: bool,
    pub lock_owner: Option<String>,
    pub has_local_token: bool,
    pub lock_status: Option<LockStatus>,
    pub changelist: Option<String>,
    pub kind: Option<PathKind>,
    /// For deletions: `Some(true)` when the file stays on disk.
    pub exists_locally: Option<bool>,
    pub renamed_and_modified: bool,
    pub property_changes: Vec<PropertyChange>,
}

impl TrackedResource {
    /// Build the local resource for `record` in the working copy at `root`.
    pub fn from_record(root: &Path, record: &RawStatusRecord) -> Self {
        let rename_source = record
            .rename_from
            .as_deref()
            .map(|source| resolve_record_path(root, source));
        let lock = record.lock.clone().unwrap_or_default();
        let renamed_and_modified = rename_source.is_some()
            && matches!(record.status, Status::Added | Status::Replaced)
            && record.content_modified;

        Self {
            resource_path: resolve_record_path(root, &record.path),
            status: record.status,
            rename_source,
            props: record.props,
            remote: false,
            locked: lock.is_locked(),
            lock_owner: lock.owner.clone(),
            has_local_token: lock.token_here,
            lock_status: lock.badge(),
            changelist: record.changelist().map(str::to_string),
            kind: record.kind,
            exists_locally: record.exists_locally,
            renamed_and_modified,
            property_changes: record.property_changes.clone(),
        }
    }

    /// Build the repository-side shadow entry for `record`.
    pub fn from_remote(root: &Path, record: &RawStatusRecord, remote: &RemoteStatus) -> Self {
        Self {
            resource_path: resolve_record_path(root, &record.path),
            status: remote.status,
            rename_source: None,
            props: remote.props,
            remote: true,
            locked: false,
            lock_owner: None,
            has_local_token: false,
            lock_status: None,
            changelist: None,
            kind: record.kind,
            exists_locally: None,
            renamed_and_modified: false,
            property_changes: Vec::new(),
        }
    }

    /// A bare resource, mostly useful in tests and adapters.
    pub fn new(resource_path: impl Into<PathBuf>, status: Status) -> Self {
        Self {
            resource_path: resource_path.into(),
            status,
            rename_source: None,
            props: PropStatus::None,
            remote: false,
            locked: false,
            lock_owner: None,
            has_local_token: false,
            lock_status: None,
            changelist: None,
            kind: None,
            exists_locally: None,
            renamed_and_modified: false,
            property_changes: Vec::new(),
        }
    }

    pub fn with_rename_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.rename_source = Some(source.into());
        self
    }

    pub fn with_changelist(mut self, name: impl Into<String>) -> Self {
        self.changelist = Some(name.into());
        self
    }

    pub fn with_kind(mut self, kind: PathKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Added or replaced with history: the commit must carry the source path.
    pub fn is_rename_target(&self) -> bool {
        self.rename_source.is_some() && matches!(self.status, Status::Added | Status::Replaced)
    }

    /// A deletion that keeps the file on disk (untracked, not removed).
    pub fn is_keep_local_delete(&self) -> bool {
        self.status == Status::Deleted && self.exists_locally == Some(true)
    }

    pub fn is_dir(&self) -> bool {
        self.kind == Some(PathKind::Dir)
    }
}

/// One discrete property change on a path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyChange {
    pub name: String,
    pub change: PropertyChangeKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyChangeKind {
    Added,
    Modified,
    Deleted,
}
