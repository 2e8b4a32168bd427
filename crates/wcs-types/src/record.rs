//! Raw status records, as handed over by the tool adapter.
//!
//! A record is read-only input. Optional parts are explicit: changelist
//! membership is a [`Membership`] variant and repository-side status is an
//! `Option<RemoteStatus>`, so a record can never claim remote status
//! without carrying it. Absent fields deserialize to their defaults.

use serde::{Deserialize, Serialize};

use crate::status::{LockStatus, PathKind, PropStatus, Status};

/// One path as reported by the tool's status command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStatusRecord {
    /// Path relative to the working-copy root (`"."` for the root itself).
    pub path: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub props: PropStatus,
    #[serde(default, rename = "changelist")]
    pub membership: Membership,
    /// Copy-from path (relative) when this record is a rename target.
    #[serde(default)]
    pub rename_from: Option<String>,
    #[serde(default)]
    pub kind: Option<PathKind>,
    #[serde(default)]
    pub wc: WcFlags,
    #[serde(default)]
    pub lock: Option<LockInfo>,
    #[serde(default)]
    pub remote: Option<RemoteStatus>,
    #[serde(default)]
    pub commit: Option<CommitInfo>,
    #[serde(default)]
    pub external: Option<ExternalInfo>,
    /// For deletions: whether the file is still on disk (`--keep-local`).
    #[serde(default)]
    pub exists_locally: Option<bool>,
    /// For rename targets: whether the content also differs from the source.
    #[serde(default)]
    pub content_modified: bool,
    #[serde(default)]
    pub property_changes: Vec<crate::resource::PropertyChange>,
}

impl RawStatusRecord {
    /// A record with the given path and status; everything else unset.
    pub fn new(path: impl Into<String>, status: Status) -> Self {
        Self {
            path: path.into(),
            status,
            props: PropStatus::None,
            membership: Membership::Workspace,
            rename_from: None,
            kind: None,
            wc: WcFlags::default(),
            lock: None,
            remote: None,
            commit: None,
            external: None,
            exists_locally: None,
            content_modified: false,
            property_changes: Vec::new(),
        }
    }

    pub fn with_props(mut self, props: PropStatus) -> Self {
        self.props = props;
        self
    }

    pub fn in_changelist(mut self, name: impl Into<String>) -> Self {
        self.membership = Membership::Changelist(name.into());
        self
    }

    pub fn renamed_from(mut self, source: impl Into<String>) -> Self {
        self.rename_from = Some(source.into());
        self
    }

    pub fn with_kind(mut self, kind: PathKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_wc(mut self, wc: WcFlags) -> Self {
        self.wc = wc;
        self
    }

    pub fn with_lock(mut self, lock: LockInfo) -> Self {
        self.lock = Some(lock);
        self
    }

    pub fn with_remote(mut self, status: Status, props: PropStatus) -> Self {
        self.remote = Some(RemoteStatus { status, props });
        self
    }

    /// Mark this record as an external mount pointing at `upstream`.
    pub fn external_from(mut self, upstream: impl Into<String>) -> Self {
        self.status = Status::External;
        self.external = Some(ExternalInfo {
            upstream: Some(upstream.into()),
        });
        self
    }

    /// The changelist this record belongs to, if any.
    pub fn changelist(&self) -> Option<&str> {
        self.membership.name()
    }

    /// Returns `true` for the working-copy root record.
    pub fn is_root(&self) -> bool {
        matches!(self.normalized_path().as_str(), "" | ".")
    }

    /// The record path with `\` separators turned into `/` and no
    /// leading `./` or trailing `/`.
    pub fn normalized_path(&self) -> String {
        let mut path = self.path.replace('\\', "/");
        while let Some(rest) = path.strip_prefix("./") {
            path = rest.to_string();
        }
        while path.len() > 1 && path.ends_with('/') {
            path.pop();
        }
        path
    }
}

/// Changelist membership of a record.
///
/// Serialized as the optional changelist name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Membership {
    #[default]
    Workspace,
    Changelist(String),
}

impl Membership {
    pub fn name(&self) -> Option<&str> {
        match self {
            Membership::Workspace => None,
            Membership::Changelist(name) => Some(name),
        }
    }
}

impl From<Option<String>> for Membership {
    fn from(name: Option<String>) -> Self {
        match name {
            Some(name) if !name.trim().is_empty() => Membership::Changelist(name),
            _ => Membership::Workspace,
        }
    }
}

impl From<Membership> for Option<String> {
    fn from(membership: Membership) -> Self {
        match membership {
            Membership::Workspace => None,
            Membership::Changelist(name) => Some(name),
        }
    }
}

/// Working-copy administrative flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WcFlags {
    /// The working-copy administrative area is locked (needs cleanup).
    #[serde(default)]
    pub locked: bool,
    /// The path is switched to a different repository location.
    #[serde(default)]
    pub switched: bool,
}

/// Repository lock information for a path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockInfo {
    #[serde(default)]
    pub owner: Option<String>,
    /// Whether this working copy holds the lock token.
    #[serde(default)]
    pub token_here: bool,
    #[serde(default)]
    pub status: Option<LockStatus>,
}

impl LockInfo {
    /// The badge to display, derived from the token when the tool did not
    /// report one explicitly.
    pub fn badge(&self) -> Option<LockStatus> {
        if let Some(status) = self.status {
            return Some(status);
        }
        if self.token_here {
            Some(LockStatus::Held)
        } else if self.owner.is_some() {
            Some(LockStatus::Other)
        } else {
            None
        }
    }

    pub fn is_locked(&self) -> bool {
        self.badge().is_some()
    }
}

/// Repository-side status of a path (`status -u`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteStatus {
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub props: PropStatus,
}

/// Last-commit metadata for a path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    #[serde(default)]
    pub revision: Option<u64>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// Details of an external mount.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalInfo {
    /// Identity (repository UUID or root URL) of the mounted repository.
    #[serde(default)]
    pub upstream: Option<String>,
}
