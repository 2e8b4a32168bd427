//! The reconciler: categorized output in, stable groups and a flat index out.
//!
//! All state lives in memory and is written only by
//! [`ResourceIndexManager::update_groups`]. The manager is not
//! lock-protected; callers that can overlap passes must serialize them.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use tracing::debug;
use wcs_classify::CategorizedStatus;
use wcs_types::{GroupOrdering, PathNormalizer, ScmConfig, TrackedResource};

use crate::event::{GroupEvent, GroupObserver};
use crate::fingerprint::Fingerprint;
use crate::group::{
    Group, GroupKind, ORDER_CHANGELIST_BASE, ORDER_CHANGES, ORDER_CONFLICTS,
    ORDER_REMOTE_CHANGES, ORDER_UNVERSIONED,
};

/// Owns the exposed groups and the `normalized path -> resource` index.
pub struct ResourceIndexManager {
    normalizer: PathNormalizer,
    ordering: GroupOrdering,
    changes: Option<Group>,
    conflicts: Option<Group>,
    unversioned: Option<Group>,
    remote_changes: Option<Group>,
    changelists: BTreeMap<String, Group>,
    index: HashMap<String, TrackedResource>,
    fingerprint: Option<Fingerprint>,
    lifecycle: Lifecycle,
    count: usize,
    is_incomplete: bool,
    needs_cleanup: bool,
    rebuilds: u64,
}

impl std::fmt::Debug for ResourceIndexManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceIndexManager")
            .field("ordering", &self.ordering)
            .field("changelists", &self.changelists.len())
            .field("indexed", &self.index.len())
            .field("fingerprint", &self.fingerprint)
            .field("count", &self.count)
            .finish()
    }
}

impl ResourceIndexManager {
    /// Create an empty manager. Groups are created on the first update.
    pub fn new(normalizer: PathNormalizer) -> Self {
        Self {
            normalizer,
            ordering: GroupOrdering::default(),
            changes: None,
            conflicts: None,
            unversioned: None,
            remote_changes: None,
            changelists: BTreeMap::new(),
            index: HashMap::new(),
            fingerprint: None,
            lifecycle: Lifecycle::default(),
            count: 0,
            is_incomplete: false,
            needs_cleanup: false,
            rebuilds: 0,
        }
    }

    /// Report group lifecycle transitions to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn GroupObserver>) -> Self {
        self.lifecycle.observer = Some(observer);
        self
    }

    // ---------------------------------------------------------------
    // Reconciliation
    // ---------------------------------------------------------------

    /// Reconcile the groups with a fresh classification and return the
    /// badge count.
    pub fn update_groups(&mut self, categorized: CategorizedStatus, config: &ScmConfig) -> usize {
        let fingerprint = Fingerprint::compute(config.fingerprint, &categorized, &self.normalizer);
        let CategorizedStatus {
            changes,
            conflicts,
            unversioned,
            changelists,
            remote_changes,
            is_incomplete,
            needs_cleanup,
            ..
        } = categorized;

        let ordering = config.group_ordering;
        if ordering != self.ordering {
            self.ordering = ordering;
            self.reorder_all();
        }

        let group = self
            .changes
            .get_or_insert_with(|| self.lifecycle.create(GroupKind::Changes, ordering));
        self.lifecycle.update(group, changes);

        let group = self
            .conflicts
            .get_or_insert_with(|| self.lifecycle.create(GroupKind::Conflicts, ordering));
        self.lifecycle.update(group, conflicts);

        let structure_changed = self.reconcile_changelists(changelists, ordering);

        if ordering == GroupOrdering::CreationOrder && structure_changed {
            self.recreate_trailing_groups();
        }

        let group = self
            .unversioned
            .get_or_insert_with(|| self.lifecycle.create(GroupKind::Unversioned, ordering));
        self.lifecycle.update(group, unversioned);

        if config.check_remote_changes {
            let group = self
                .remote_changes
                .get_or_insert_with(|| self.lifecycle.create(GroupKind::RemoteChanges, ordering));
            self.lifecycle.update(group, remote_changes);
        } else if let Some(group) = self.remote_changes.take() {
            self.lifecycle.dispose(group);
        }

        let rebuilt = self.fingerprint.as_ref() != Some(&fingerprint);
        if rebuilt {
            self.rebuild_index();
            self.rebuilds += 1;
        }

        self.is_incomplete = is_incomplete;
        self.needs_cleanup = needs_cleanup;
        self.count = self.compute_count(config);

        debug!(
            count = self.count,
            rebuilt,
            fingerprint = %fingerprint,
            changelists = self.changelists.len(),
            indexed = self.index.len(),
            "reconciled groups"
        );
        self.fingerprint = Some(fingerprint);
        self.count
    }

    /// Update, create, and dispose changelist groups. Returns `true` when
    /// a group was created or disposed.
    fn reconcile_changelists(
        &mut self,
        changelists: BTreeMap<String, Vec<TrackedResource>>,
        ordering: GroupOrdering,
    ) -> bool {
        let mut structure_changed = false;

        let stale: Vec<String> = self
            .changelists
            .keys()
            .filter(|name| !changelists.contains_key(*name))
            .cloned()
            .collect();
        for name in stale {
            if let Some(group) = self.changelists.remove(&name) {
                debug!(changelist = %name, "disposing changelist group");
                self.lifecycle.dispose(group);
                structure_changed = true;
            }
        }

        for (name, members) in changelists {
            match self.changelists.entry(name) {
                Entry::Occupied(mut entry) => self.lifecycle.update(entry.get_mut(), members),
                Entry::Vacant(entry) => {
                    debug!(changelist = %entry.key(), "creating changelist group");
                    let kind = GroupKind::Changelist(entry.key().clone());
                    let mut group = self.lifecycle.create(kind, ordering);
                    self.lifecycle.update(&mut group, members);
                    entry.insert(group);
                    structure_changed = true;
                }
            }
        }

        structure_changed
    }

    /// Dispose and recreate Unversioned and Remote Changes so a host that
    /// orders groups by creation time keeps them last. Remote resources are
    /// carried over into the new group.
    fn recreate_trailing_groups(&mut self) {
        let ordering = self.ordering;
        if let Some(group) = self.unversioned.take() {
            self.lifecycle.dispose(group);
            self.unversioned = Some(self.lifecycle.create(GroupKind::Unversioned, ordering));
        }
        if let Some(mut group) = self.remote_changes.take() {
            let carried = group.take_resources();
            self.lifecycle.dispose(group);
            let mut recreated = self.lifecycle.create(GroupKind::RemoteChanges, ordering);
            recreated.set_resources(carried);
            self.remote_changes = Some(recreated);
        }
    }

    /// Recompute every group's sort key after the ordering mode changed.
    fn reorder_all(&mut self) {
        let ordering = self.ordering;
        let mut changelists: Vec<&mut Group> = self.changelists.values_mut().collect();
        changelists.sort_by_key(|group| group.generation());
        for (rank, group) in changelists.into_iter().enumerate() {
            let order = match ordering {
                GroupOrdering::Explicit => {
                    ORDER_CHANGELIST_BASE.saturating_add(u32::try_from(rank).unwrap_or(u32::MAX))
                }
                GroupOrdering::CreationOrder => generation_order(group.generation()),
            };
            group.set_order(order);
        }
        self.lifecycle.next_changelist_rank =
            u32::try_from(self.changelists.len()).unwrap_or(u32::MAX);

        for group in [
            &mut self.changes,
            &mut self.conflicts,
            &mut self.unversioned,
            &mut self.remote_changes,
        ]
        .into_iter()
        .flatten()
        {
            let order = match ordering {
                GroupOrdering::Explicit => static_order(group.kind()),
                GroupOrdering::CreationOrder => generation_order(group.generation()),
            };
            group.set_order(order);
        }
    }

    fn rebuild_index(&mut self) {
        let mut index = HashMap::with_capacity(self.local_len());
        for group in self.local_groups() {
            for resource in group.resources() {
                index.insert(self.normalizer.normalize(&resource.resource_path), resource.clone());
            }
        }
        self.index = index;
    }

    fn compute_count(&self, config: &ScmConfig) -> usize {
        let changelists: usize = self
            .changelists
            .iter()
            .filter(|(name, _)| !config.is_ignored_on_status_count(name))
            .map(|(_, group)| group.len())
            .sum();
        let unversioned = if config.count_unversioned {
            self.unversioned.as_ref().map_or(0, Group::len)
        } else {
            0
        };
        self.changes.as_ref().map_or(0, Group::len)
            + self.conflicts.as_ref().map_or(0, Group::len)
            + changelists
            + unversioned
    }

    // ---------------------------------------------------------------
    // Lookup
    // ---------------------------------------------------------------

    /// Find the resource shown for `path`, if any.
    pub fn get_resource_from_file(&self, path: impl AsRef<Path>) -> Option<&TrackedResource> {
        self.index.get(&self.normalizer.normalize(path.as_ref()))
    }

    /// The whole flat index, keyed by normalized path.
    pub fn resource_map(&self) -> &HashMap<String, TrackedResource> {
        &self.index
    }

    /// The normalizer the index keys were built with.
    pub fn normalizer(&self) -> &PathNormalizer {
        &self.normalizer
    }

    // ---------------------------------------------------------------
    // Group accessors
    // ---------------------------------------------------------------

    pub fn changes(&self) -> Option<&Group> {
        self.changes.as_ref()
    }

    pub fn conflicts(&self) -> Option<&Group> {
        self.conflicts.as_ref()
    }

    pub fn unversioned(&self) -> Option<&Group> {
        self.unversioned.as_ref()
    }

    pub fn remote_changes(&self) -> Option<&Group> {
        self.remote_changes.as_ref()
    }

    /// Changelist groups by name.
    pub fn changelists(&self) -> &BTreeMap<String, Group> {
        &self.changelists
    }

    pub fn changelist(&self, name: &str) -> Option<&Group> {
        self.changelists.get(name)
    }

    /// Every live group, in presentation order.
    pub fn groups(&self) -> Vec<&Group> {
        let mut groups: Vec<&Group> = [
            self.changes.as_ref(),
            self.conflicts.as_ref(),
            self.unversioned.as_ref(),
            self.remote_changes.as_ref(),
        ]
        .into_iter()
        .flatten()
        .chain(self.changelists.values())
        .collect();
        groups.sort_by_key(|group| (group.order(), group.generation()));
        groups
    }

    fn local_groups(&self) -> impl Iterator<Item = &Group> {
        [self.changes.as_ref(), self.conflicts.as_ref()]
            .into_iter()
            .flatten()
            .chain(self.changelists.values())
            .chain(self.unversioned.as_ref())
    }

    fn local_len(&self) -> usize {
        self.local_groups().map(Group::len).sum()
    }

    /// Badge count from the last reconciliation.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_incomplete(&self) -> bool {
        self.is_incomplete
    }

    pub fn needs_cleanup(&self) -> bool {
        self.needs_cleanup
    }

    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        self.fingerprint.as_ref()
    }

    /// How many times the flat index has been rebuilt.
    pub fn index_rebuilds(&self) -> u64 {
        self.rebuilds
    }

    // ---------------------------------------------------------------
    // Teardown
    // ---------------------------------------------------------------

    /// Dispose every group and clear the index. Calling it again is a no-op.
    pub fn dispose(&mut self) {
        for group in [
            self.changes.take(),
            self.conflicts.take(),
            self.unversioned.take(),
            self.remote_changes.take(),
        ]
        .into_iter()
        .flatten()
        {
            self.lifecycle.dispose(group);
        }
        for (_, group) in std::mem::take(&mut self.changelists) {
            self.lifecycle.dispose(group);
        }
        self.lifecycle.next_changelist_rank = 0;
        self.index.clear();
        self.fingerprint = None;
        self.count = 0;
        self.is_incomplete = false;
        self.needs_cleanup = false;
    }
}

impl Default for ResourceIndexManager {
    fn default() -> Self {
        Self::new(PathNormalizer::platform())
    }
}

/// Hands out generations and sort keys, and reports lifecycle events.
#[derive(Default)]
struct Lifecycle {
    next_generation: u64,
    next_changelist_rank: u32,
    observer: Option<Arc<dyn GroupObserver>>,
}

impl Lifecycle {
    fn create(&mut self, kind: GroupKind, ordering: GroupOrdering) -> Group {
        self.next_generation += 1;
        let generation = self.next_generation;
        let order = match (&kind, ordering) {
            (_, GroupOrdering::CreationOrder) => generation_order(generation),
            (GroupKind::Changelist(_), GroupOrdering::Explicit) => {
                let rank = self.next_changelist_rank;
                self.next_changelist_rank = rank.saturating_add(1);
                ORDER_CHANGELIST_BASE.saturating_add(rank)
            }
            (kind, GroupOrdering::Explicit) => static_order(kind),
        };
        let group = Group::new(kind, order, generation);
        self.emit(GroupEvent::Created {
            id: group.id().clone(),
            generation,
            order,
        });
        group
    }

    fn update(&self, group: &mut Group, resources: Vec<TrackedResource>) {
        group.set_resources(resources);
        self.emit(GroupEvent::Updated {
            id: group.id().clone(),
            generation: group.generation(),
            len: group.len(),
        });
    }

    fn dispose(&self, group: Group) {
        self.emit(GroupEvent::Disposed {
            id: group.id().clone(),
            generation: group.generation(),
        });
    }

    fn emit(&self, event: GroupEvent) {
        if let Some(observer) = &self.observer {
            observer.on_event(&event);
        }
    }
}

fn static_order(kind: &GroupKind) -> u32 {
    match kind {
        GroupKind::Changes => ORDER_CHANGES,
        GroupKind::Conflicts => ORDER_CONFLICTS,
        GroupKind::Unversioned => ORDER_UNVERSIONED,
        GroupKind::RemoteChanges => ORDER_REMOTE_CHANGES,
        GroupKind::Changelist(_) => ORDER_CHANGELIST_BASE,
    }
}

fn generation_order(generation: u64) -> u32 {
    u32::try_from(generation).unwrap_or(u32::MAX)
}
