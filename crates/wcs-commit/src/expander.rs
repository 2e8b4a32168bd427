//! Expansion of a commit selection into the submitted path list.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;
use wcs_index::ResourceIndexManager;
use wcs_types::{Status, TrackedResource};

/// The paths one commit will touch.
///
/// `display_paths` are the line items the user sees. Rename sources are
/// submitted alongside their targets so the tool can record the copy-from
/// relationship, but they are not shown on their own.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CommitPlan {
    display_paths: BTreeSet<PathBuf>,
    rename_sources: BTreeMap<PathBuf, PathBuf>,
    renamed_and_modified: BTreeSet<PathBuf>,
}

impl CommitPlan {
    /// Paths shown to the user, sorted.
    pub fn display_paths(&self) -> &BTreeSet<PathBuf> {
        &self.display_paths
    }

    /// `display path -> copy-from source` for every selected rename target.
    pub fn rename_sources(&self) -> &BTreeMap<PathBuf, PathBuf> {
        &self.rename_sources
    }

    pub fn rename_source_of(&self, display: &Path) -> Option<&Path> {
        self.rename_sources.get(display).map(PathBuf::as_path)
    }

    /// Whether `display` is a rename target whose content also changed.
    pub fn is_renamed_and_modified(&self, display: &Path) -> bool {
        self.renamed_and_modified.contains(display)
    }

    /// Display paths plus rename sources, sorted and deduplicated.
    pub fn submitted_paths(&self) -> Vec<PathBuf> {
        let submitted: BTreeSet<&PathBuf> = self
            .display_paths
            .iter()
            .chain(self.rename_sources.values())
            .collect();
        submitted.into_iter().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.display_paths.is_empty()
    }
}

/// Expand `selection` into a [`CommitPlan`], consulting `index` for the
/// status of every ancestor directory.
///
/// Each ancestor shown as `added` joins the display paths, and shown
/// ancestors in any other state are passed over. The climb ends at the
/// first ancestor the index does not hold, or at one already reached
/// through an earlier resource.
pub fn expand_commit_paths<'a>(
    index: &ResourceIndexManager,
    selection: impl IntoIterator<Item = &'a TrackedResource>,
) -> CommitPlan {
    let normalizer = index.normalizer();
    let mut plan = CommitPlan::default();
    let mut visited: HashSet<String> = HashSet::new();
    let mut selected = 0usize;

    for resource in selection {
        selected += 1;
        let display = resource.resource_path.clone();

        if resource.is_rename_target() {
            if let Some(source) = &resource.rename_source {
                plan.rename_sources.insert(display.clone(), source.clone());
            }
            if resource.renamed_and_modified {
                plan.renamed_and_modified.insert(display.clone());
            }
        }

        for ancestor in resource.resource_path.ancestors().skip(1) {
            if !visited.insert(normalizer.normalize(ancestor)) {
                break;
            }
            let Some(parent) = index.get_resource_from_file(ancestor) else {
                break;
            };
            if parent.status == Status::Added {
                plan.display_paths.insert(parent.resource_path.clone());
            }
        }

        plan.display_paths.insert(display);
    }

    debug!(
        selected,
        display = plan.display_paths.len(),
        renames = plan.rename_sources.len(),
        "expanded commit selection"
    );
    plan
}
