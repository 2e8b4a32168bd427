//! The commit service.

use std::path::Path;

use tracing::{debug, info};
use wcs_index::ResourceIndexManager;
use wcs_types::{ScmConfig, Status, TrackedResource};

use crate::error::{CommitError, CommitResult};
use crate::expander::{expand_commit_paths, CommitPlan};

/// Plans commits against a [`ResourceIndexManager`].
///
/// Construct one per working copy (or rebuild it when configuration
/// changes) and hand it to whatever drives commits.
#[derive(Clone, Debug, Default)]
pub struct CommitFlow {
    ignore_on_commit: Vec<String>,
}

impl CommitFlow {
    pub fn new(config: &ScmConfig) -> Self {
        Self {
            ignore_on_commit: config.ignore_on_commit.clone(),
        }
    }

    /// Whether `changelist` is left out of "commit everything".
    pub fn is_ignored_on_commit(&self, changelist: &str) -> bool {
        self.ignore_on_commit.iter().any(|name| name == changelist)
    }

    /// Everything "commit all" would pick: the Changes group plus every
    /// changelist not excluded from commits.
    pub fn resources_for_commit_all<'m>(
        &self,
        manager: &'m ResourceIndexManager,
    ) -> CommitResult<Vec<&'m TrackedResource>> {
        let conflicts = manager.conflicts().map_or(0, |group| group.len());
        if conflicts > 0 {
            return Err(CommitError::Conflicted { count: conflicts });
        }

        let mut selection: Vec<&TrackedResource> = manager
            .changes()
            .map(|group| group.resources().iter().collect())
            .unwrap_or_default();
        for (name, group) in manager.changelists() {
            if self.is_ignored_on_commit(name) {
                debug!(changelist = %name, "skipping changelist excluded from commit");
                continue;
            }
            selection.extend(group.resources());
        }

        if selection.is_empty() {
            return Err(CommitError::NothingToCommit);
        }
        Ok(selection)
    }

    /// Plan a commit of `selection`.
    pub fn plan<'a>(
        &self,
        manager: &ResourceIndexManager,
        selection: impl IntoIterator<Item = &'a TrackedResource>,
    ) -> CommitResult<CommitPlan> {
        let selection: Vec<&TrackedResource> = selection.into_iter().collect();
        if selection.is_empty() {
            return Err(CommitError::NothingToCommit);
        }
        let conflicted = selection
            .iter()
            .filter(|resource| resource.status == Status::Conflicted)
            .count();
        if conflicted > 0 {
            return Err(CommitError::Conflicted { count: conflicted });
        }

        let plan = expand_commit_paths(manager, selection);
        info!(
            display = plan.display_paths().len(),
            submitted = plan.submitted_paths().len(),
            "planned commit"
        );
        Ok(plan)
    }

    /// Plan a commit of everything [`Self::resources_for_commit_all`] picks.
    pub fn plan_commit_all(&self, manager: &ResourceIndexManager) -> CommitResult<CommitPlan> {
        let selection = self.resources_for_commit_all(manager)?;
        self.plan(manager, selection)
    }

    /// Plan a commit of raw paths, resolving each through the index.
    pub fn plan_for_paths<P: AsRef<Path>>(
        &self,
        manager: &ResourceIndexManager,
        paths: &[P],
    ) -> CommitResult<CommitPlan> {
        let selection = paths
            .iter()
            .map(|path| {
                let path = path.as_ref();
                manager
                    .get_resource_from_file(path)
                    .ok_or_else(|| CommitError::NotTracked(path.display().to_string()))
            })
            .collect::<CommitResult<Vec<_>>>()?;
        self.plan(manager, selection)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use super::*;
    use wcs_classify::CategorizedStatus;
    use wcs_types::PathNormalizer;

    fn res(path: &str, status: Status) -> TrackedResource {
        TrackedResource::new(path, status)
    }

    fn manager_with(categorized: CategorizedStatus) -> ResourceIndexManager {
        let mut manager = ResourceIndexManager::new(PathNormalizer::new(false));
        manager.update_groups(categorized, &ScmConfig::default());
        manager
    }

    fn workspace() -> CategorizedStatus {
        let mut changelists = BTreeMap::new();
        changelists.insert(
            "feat".to_string(),
            vec![res("/r/feat.rs", Status::Added).with_changelist("feat")],
        );
        changelists.insert(
            "ignore-on-commit".to_string(),
            vec![res("/r/local.cfg", Status::Modified).with_changelist("ignore-on-commit")],
        );
        CategorizedStatus {
            changes: vec![res("/r/main.rs", Status::Modified)],
            unversioned: vec![res("/r/notes.txt", Status::Unversioned)],
            changelists,
            ..CategorizedStatus::default()
        }
    }

    #[test]
    fn commit_all_skips_ignored_changelists_and_unversioned() {
        let manager = manager_with(workspace());
        let flow = CommitFlow::new(&ScmConfig::default());

        let picked: Vec<_> = flow
            .resources_for_commit_all(&manager)
            .unwrap()
            .into_iter()
            .map(|r| r.resource_path.clone())
            .collect();
        assert_eq!(picked, vec![PathBuf::from("/r/main.rs"), PathBuf::from("/r/feat.rs")]);

        let plan = flow.plan_commit_all(&manager).unwrap();
        assert!(!plan.display_paths().contains(Path::new("/r/local.cfg")));
    }

    #[test]
    fn commit_all_blocked_by_conflicts() {
        let mut categorized = workspace();
        categorized.conflicts.push(res("/r/clash.rs", Status::Conflicted));
        let manager = manager_with(categorized);
        let flow = CommitFlow::new(&ScmConfig::default());

        let err = flow.resources_for_commit_all(&manager).unwrap_err();
        assert!(matches!(err, CommitError::Conflicted { count: 1 }));
    }

    #[test]
    fn commit_all_with_nothing_changed() {
        let manager = manager_with(CategorizedStatus::default());
        let flow = CommitFlow::default();
        assert!(matches!(
            flow.plan_commit_all(&manager),
            Err(CommitError::NothingToCommit)
        ));
    }

    #[test]
    fn custom_ignore_on_commit_list() {
        let manager = manager_with(workspace());
        let config = ScmConfig {
            ignore_on_commit: vec!["feat".into()],
            ..ScmConfig::default()
        };
        let flow = CommitFlow::new(&config);
        assert!(flow.is_ignored_on_commit("feat"));

        let picked = flow.resources_for_commit_all(&manager).unwrap();
        let picked: Vec<_> = picked.iter().map(|r| r.resource_path.clone()).collect();
        assert_eq!(picked, vec![PathBuf::from("/r/main.rs"), PathBuf::from("/r/local.cfg")]);
    }

    #[test]
    fn plan_for_paths_resolves_through_index() {
        let manager = manager_with(workspace());
        let flow = CommitFlow::default();
        let plan = flow.plan_for_paths(&manager, &["/r/main.rs", "/r/feat.rs"]).unwrap();
        assert_eq!(
            plan.submitted_paths(),
            vec![PathBuf::from("/r/feat.rs"), PathBuf::from("/r/main.rs")]
        );
    }

    #[test]
    fn plan_for_unknown_path_fails() {
        let manager = manager_with(workspace());
        let flow = CommitFlow::default();
        let err = flow.plan_for_paths(&manager, &["/r/nope.rs"]).unwrap_err();
        assert!(matches!(err, CommitError::NotTracked(ref p) if p == "/r/nope.rs"));
    }

    #[test]
    fn plan_rejects_empty_and_conflicted_selection() {
        let manager = manager_with(workspace());
        let flow = CommitFlow::default();
        assert!(matches!(
            flow.plan(&manager, std::iter::empty()),
            Err(CommitError::NothingToCommit)
        ));

        let conflicted = res("/r/clash.rs", Status::Conflicted);
        assert!(matches!(
            flow.plan(&manager, [&conflicted]),
            Err(CommitError::Conflicted { count: 1 })
        ));
    }
}
