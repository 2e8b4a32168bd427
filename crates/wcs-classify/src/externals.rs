//! External/descendant pre-pass.
//!
//! External mounts are separate working copies; neither the mount point nor
//! anything beneath it belongs to the containing project's groups. The
//! filter removes them in a single pass over the record list, testing each
//! record against the set of mount prefixes and stopping at the first hit.

use tracing::debug;
use wcs_types::{RawStatusRecord, Status};

/// Output of [`filter_externals`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilteredStatus {
    /// Records left for classification, in their original order.
    pub records: Vec<RawStatusRecord>,
    /// Foreign external mounts (relative paths) whose subtrees were removed.
    pub external_mounts: Vec<String>,
    /// Externals from the project's own upstream, kept as native paths.
    pub combined_mounts: Vec<String>,
}

impl FilteredStatus {
    /// Number of records that were dropped as mounts or descendants.
    pub fn removed(&self, original_len: usize) -> usize {
        original_len.saturating_sub(self.records.len())
    }
}

/// Remove external mounts and their descendants from `records`.
///
/// When `project_upstream` is given (combine-externals-if-same-server is
/// on), externals whose upstream identity equals it are treated as part of
/// the project: their mount record is dropped but their contents stay.
pub fn filter_externals(
    records: Vec<RawStatusRecord>,
    project_upstream: Option<&str>,
) -> FilteredStatus {
    let original_len = records.len();
    let (externals, locals): (Vec<_>, Vec<_>) = records
        .into_iter()
        .partition(|record| record.status == Status::External);

    let mut external_mounts = Vec::new();
    let mut combined_mounts = Vec::new();
    for external in &externals {
        let mount = external.normalized_path();
        let upstream = external.external.as_ref().and_then(|e| e.upstream.as_deref());
        match (project_upstream, upstream) {
            (Some(project), Some(theirs)) if project == theirs => combined_mounts.push(mount),
            _ => external_mounts.push(mount),
        }
    }

    // Prefixes with the trailing separator so "lib" does not claim "library".
    let prefixes: Vec<String> = external_mounts.iter().map(|m| format!("{m}/")).collect();

    let records: Vec<RawStatusRecord> = locals
        .into_iter()
        .filter(|record| {
            let path = record.normalized_path();
            !external_mounts
                .iter()
                .zip(&prefixes)
                .any(|(mount, prefix)| path == *mount || path.starts_with(prefix.as_str()))
        })
        .collect();

    let filtered = FilteredStatus {
        records,
        external_mounts,
        combined_mounts,
    };
    debug!(
        externals = filtered.external_mounts.len(),
        combined = filtered.combined_mounts.len(),
        removed = filtered.removed(original_len),
        "external filter pass"
    );
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(filtered: &FilteredStatus) -> Vec<&str> {
        filtered.records.iter().map(|r| r.path.as_str()).collect()
    }

    #[test]
    fn no_externals_keeps_everything() {
        let records = vec![
            RawStatusRecord::new("a.txt", Status::Modified),
            RawStatusRecord::new("b.txt", Status::Added),
        ];
        let filtered = filter_externals(records.clone(), None);
        assert_eq!(filtered.records, records);
        assert!(filtered.external_mounts.is_empty());
    }

    #[test]
    fn removes_mount_and_descendants() {
        let records = vec![
            RawStatusRecord::new("lib", Status::Normal).external_from("uuid-other"),
            RawStatusRecord::new("lib/x.c", Status::Modified),
            RawStatusRecord::new("lib/deep/y.c", Status::Unversioned),
            RawStatusRecord::new("library/z.c", Status::Modified),
            RawStatusRecord::new("src/main.c", Status::Modified),
        ];
        let filtered = filter_externals(records, None);
        assert_eq!(paths(&filtered), vec!["library/z.c", "src/main.c"]);
        assert_eq!(filtered.external_mounts, vec!["lib".to_string()]);
        assert_eq!(filtered.removed(5), 3);
    }

    #[test]
    fn same_upstream_externals_are_combined() {
        let records = vec![
            RawStatusRecord::new("vendor/own", Status::Normal).external_from("uuid-project"),
            RawStatusRecord::new("vendor/own/a.c", Status::Modified),
            RawStatusRecord::new("vendor/foreign", Status::Normal).external_from("uuid-other"),
            RawStatusRecord::new("vendor/foreign/b.c", Status::Modified),
        ];
        let filtered = filter_externals(records, Some("uuid-project"));
        assert_eq!(paths(&filtered), vec!["vendor/own/a.c"]);
        assert_eq!(filtered.combined_mounts, vec!["vendor/own".to_string()]);
        assert_eq!(filtered.external_mounts, vec!["vendor/foreign".to_string()]);
    }

    #[test]
    fn without_combining_every_external_is_foreign() {
        let records = vec![
            RawStatusRecord::new("vendor/own", Status::Normal).external_from("uuid-project"),
            RawStatusRecord::new("vendor/own/a.c", Status::Modified),
        ];
        let filtered = filter_externals(records, None);
        assert!(filtered.records.is_empty());
    }

    #[test]
    fn backslash_paths_are_matched() {
        let records = vec![
            RawStatusRecord::new("ext", Status::Normal).external_from("u"),
            RawStatusRecord::new("ext\\inner.txt", Status::Modified),
        ];
        let filtered = filter_externals(records, None);
        assert!(filtered.records.is_empty());
    }
}
