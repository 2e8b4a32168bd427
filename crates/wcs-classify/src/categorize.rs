//! The classification pass: filtered records in, grouped resources out.
//!
//! Every record that survives the skip rules lands in exactly one of
//! Changes, Conflicts, Unversioned or a changelist. Repository-side status
//! is tracked separately as a shadow entry and does not take part in that
//! partition. Group order is the order of the input records.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use tracing::debug;
use wcs_types::{Membership, PathKind, RawStatusRecord, Status, TrackedResource};

use crate::byproduct::conflict_byproduct_base;
use crate::matcher::CompiledConfig;

/// Result of one classification pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategorizedStatus {
    pub changes: Vec<TrackedResource>,
    pub conflicts: Vec<TrackedResource>,
    pub unversioned: Vec<TrackedResource>,
    /// Changelist name -> members.
    pub changelists: BTreeMap<String, Vec<TrackedResource>>,
    pub remote_changes: Vec<TrackedResource>,
    pub ignored: Vec<TrackedResource>,
    /// Some part of the tree is incomplete or switched.
    pub is_incomplete: bool,
    /// The working-copy root is administratively locked.
    pub needs_cleanup: bool,
}

impl CategorizedStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of resources in the local partition (remote shadows and
    /// ignored paths excluded).
    pub fn local_len(&self) -> usize {
        self.changes.len()
            + self.conflicts.len()
            + self.unversioned.len()
            + self.changelists.values().map(Vec::len).sum::<usize>()
    }

    /// Returns `true` when there is nothing to show in any group.
    pub fn is_empty(&self) -> bool {
        self.local_len() == 0 && self.remote_changes.is_empty()
    }

    /// Every resource of the local partition, in group order.
    pub fn local_resources(&self) -> impl Iterator<Item = &TrackedResource> {
        self.changes
            .iter()
            .chain(&self.conflicts)
            .chain(self.changelists.values().flatten())
            .chain(&self.unversioned)
    }
}

/// Classifies raw status records under a compiled configuration.
///
/// The pass is pure: no I/O, no failure modes. Records with missing
/// optional fields are treated as unset.
pub struct StatusCategorizer<'a> {
    root: &'a Path,
    config: &'a CompiledConfig,
}

impl<'a> StatusCategorizer<'a> {
    pub fn new(root: &'a Path, config: &'a CompiledConfig) -> Self {
        Self { root, config }
    }

    pub fn categorize(&self, records: &[RawStatusRecord]) -> CategorizedStatus {
        let settings = self.config.config();
        let mut result = CategorizedStatus::new();

        let conflict_paths: HashSet<String> = records
            .iter()
            .filter(|record| record.status == Status::Conflicted)
            .map(RawStatusRecord::normalized_path)
            .collect();

        for record in records {
            if record.is_root() {
                result.is_incomplete |= record.status == Status::Incomplete;
                result.needs_cleanup |= record.wc.locked;
                continue;
            }

            // A switched subtree may hide incomplete items below it.
            if record.wc.switched || record.status == Status::Incomplete {
                result.is_incomplete = true;
            }

            if record.wc.locked || record.wc.switched || record.status == Status::Incomplete {
                continue;
            }

            let relative = record.normalized_path();
            let is_dir = record.kind == Some(PathKind::Dir);

            if self.config.is_excluded(&relative, is_dir) {
                continue;
            }

            if settings.check_remote_changes {
                if let Some(remote) = &record.remote {
                    result
                        .remote_changes
                        .push(TrackedResource::from_remote(self.root, record, remote));
                }
            }

            if record.status.is_unchanged()
                && record.props.is_unchanged()
                && record.membership == Membership::Workspace
            {
                continue;
            }

            match (record.status, &record.membership) {
                (Status::Ignored, _) => result
                    .ignored
                    .push(TrackedResource::from_record(self.root, record)),
                (Status::Conflicted, _) => result
                    .conflicts
                    .push(TrackedResource::from_record(self.root, record)),
                (Status::Unversioned, _) => {
                    if settings.hide_unversioned
                        || self.config.is_ignored(&relative, is_dir)
                        || is_conflict_byproduct(&relative, &conflict_paths)
                    {
                        continue;
                    }
                    result
                        .unversioned
                        .push(TrackedResource::from_record(self.root, record));
                }
                (_, Membership::Changelist(name)) => result
                    .changelists
                    .entry(name.clone())
                    .or_default()
                    .push(TrackedResource::from_record(self.root, record)),
                (_, Membership::Workspace) => result
                    .changes
                    .push(TrackedResource::from_record(self.root, record)),
            }
        }

        debug!(
            changes = result.changes.len(),
            conflicts = result.conflicts.len(),
            unversioned = result.unversioned.len(),
            changelists = result.changelists.len(),
            remote = result.remote_changes.len(),
            ignored = result.ignored.len(),
            incomplete = result.is_incomplete,
            needs_cleanup = result.needs_cleanup,
            "classified status records"
        );
        result
    }
}

fn is_conflict_byproduct(relative: &str, conflict_paths: &HashSet<String>) -> bool {
    conflict_byproduct_base(relative).is_some_and(|base| conflict_paths.contains(base))
}
