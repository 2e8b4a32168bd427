//! Groups exposed to the presentation layer.

use std::fmt;

use serde::Serialize;
use wcs_types::TrackedResource;

/// Sort key of the Changes group.
pub const ORDER_CHANGES: u32 = 0;
/// Sort key of the Conflicts group.
pub const ORDER_CONFLICTS: u32 = 1;
/// First sort key handed out to changelist groups.
pub const ORDER_CHANGELIST_BASE: u32 = 1_000;
/// Sort key of the Unversioned group: after every changelist.
pub const ORDER_UNVERSIONED: u32 = u32::MAX - 1;
/// Sort key of the Remote Changes group: always last.
pub const ORDER_REMOTE_CHANGES: u32 = u32::MAX;

/// What a group holds.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum GroupKind {
    Changes,
    Conflicts,
    Unversioned,
    RemoteChanges,
    Changelist(String),
}

impl GroupKind {
    pub fn id(&self) -> GroupId {
        match self {
            GroupKind::Changes => GroupId("changes".into()),
            GroupKind::Conflicts => GroupId("conflicts".into()),
            GroupKind::Unversioned => GroupId("unversioned".into()),
            GroupKind::RemoteChanges => GroupId("remotechanges".into()),
            GroupKind::Changelist(name) => GroupId(format!("changelist-{name}")),
        }
    }

    pub fn label(&self) -> String {
        match self {
            GroupKind::Changes => "Changes".into(),
            GroupKind::Conflicts => "Conflicts".into(),
            GroupKind::Unversioned => "Unversioned".into(),
            GroupKind::RemoteChanges => "Remote Changes".into(),
            GroupKind::Changelist(name) => format!("Changelist \"{name}\""),
        }
    }

    /// Whether this group counts toward the local partition.
    pub fn is_local(&self) -> bool {
        !matches!(self, GroupKind::RemoteChanges)
    }
}

/// Stable identifier of a group (`changes`, `changelist-feat`, ...).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GroupId(String);

impl GroupId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A labelled, ordered list of resources.
///
/// The resource list is only ever replaced as a whole. `generation` is
/// unique per group instance: a disposed and recreated group comes back
/// with a new one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Group {
    id: GroupId,
    kind: GroupKind,
    label: String,
    order: u32,
    generation: u64,
    resources: Vec<TrackedResource>,
}

impl Group {
    pub(crate) fn new(kind: GroupKind, order: u32, generation: u64) -> Self {
        Self {
            id: kind.id(),
            label: kind.label(),
            kind,
            order,
            generation,
            resources: Vec::new(),
        }
    }

    pub fn id(&self) -> &GroupId {
        &self.id
    }

    pub fn kind(&self) -> &GroupKind {
        &self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Presentation sort key; lower sorts first.
    pub fn order(&self) -> u32 {
        self.order
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn resources(&self) -> &[TrackedResource] {
        &self.resources
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Replace the whole resource list.
    pub(crate) fn set_resources(&mut self, resources: Vec<TrackedResource>) {
        self.resources = resources;
    }

    pub(crate) fn set_order(&mut self, order: u32) {
        self.order = order;
    }

    pub(crate) fn take_resources(&mut self) -> Vec<TrackedResource> {
        std::mem::take(&mut self.resources)
    }
}
