//! Fingerprints of categorized output, used to skip flat-index rebuilds.
//!
//! [`FingerprintMode::Counts`] only looks at group sizes and changelist
//! `name:count` pairs, so a same-count substitution (file A replaced by
//! file B) goes unnoticed and the index keeps serving the old entity.
//! [`FingerprintMode::Content`] hashes every resource the index would hold
//! and changes whenever any of them does.

use std::fmt;
use std::fmt::Write as _;

use wcs_classify::CategorizedStatus;
use wcs_types::{FingerprintMode, PathNormalizer, TrackedResource};

const CONTENT_DOMAIN: &str = "wcs-groups-v1";

/// A cheap summary of one categorized output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fingerprint {
    Counts(String),
    Content([u8; 32]),
}

impl Fingerprint {
    pub fn compute(
        mode: FingerprintMode,
        categorized: &CategorizedStatus,
        normalizer: &PathNormalizer,
    ) -> Self {
        match mode {
            FingerprintMode::Counts => Self::counts(categorized),
            FingerprintMode::Content => Self::content(categorized, normalizer),
        }
    }

    /// Group sizes plus `name:count` for every changelist.
    pub fn counts(categorized: &CategorizedStatus) -> Self {
        let mut summary = format!(
            "changes={};conflicts={};unversioned={};remote={}",
            categorized.changes.len(),
            categorized.conflicts.len(),
            categorized.unversioned.len(),
            categorized.remote_changes.len(),
        );
        for (name, members) in &categorized.changelists {
            // Writing into a String cannot fail.
            let _ = write!(summary, ";{name}:{}", members.len());
        }
        Fingerprint::Counts(summary)
    }

    /// BLAKE3 over every indexed resource, group by group.
    pub fn content(categorized: &CategorizedStatus, normalizer: &PathNormalizer) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(CONTENT_DOMAIN.as_bytes());

        let mut section = |tag: &str, resources: &[TrackedResource]| {
            hasher.update(b"\x1e");
            hasher.update(tag.as_bytes());
            hasher.update(&(resources.len() as u64).to_le_bytes());
            for resource in resources {
                feed_resource(&mut hasher, resource, normalizer);
            }
        };

        section("changes", &categorized.changes);
        section("conflicts", &categorized.conflicts);
        section("unversioned", &categorized.unversioned);
        for (name, members) in &categorized.changelists {
            section(&format!("changelist:{name}"), members);
        }

        Fingerprint::Content(*hasher.finalize().as_bytes())
    }
}

fn feed_resource(hasher: &mut blake3::Hasher, resource: &TrackedResource, normalizer: &PathNormalizer) {
    let mut field = |bytes: &[u8]| {
        hasher.update(bytes);
        hasher.update(b"\x1f");
    };

    field(normalizer.normalize(&resource.resource_path).as_bytes());
    field(resource.status.as_str().as_bytes());
    field(resource.props.as_str().as_bytes());
    field(
        resource
            .rename_source
            .as_deref()
            .map(|p| normalizer.normalize(p))
            .unwrap_or_default()
            .as_bytes(),
    );
    field(resource.changelist.as_deref().unwrap_or_default().as_bytes());
    field(resource.lock_owner.as_deref().unwrap_or_default().as_bytes());
    field(&[
        resource.locked as u8,
        resource.has_local_token as u8,
        resource.lock_status.map(|l| l.badge() as u8).unwrap_or(0),
        resource.kind.map(|k| k as u8 + 1).unwrap_or(0),
        resource.exists_locally.map(|e| e as u8 + 1).unwrap_or(0),
        resource.renamed_and_modified as u8,
    ]);
    for change in &resource.property_changes {
        field(change.name.as_bytes());
        field(&[change.change as u8]);
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fingerprint::Counts(summary) => f.write_str(summary),
            Fingerprint::Content(hash) => f.write_str(&hex::encode(&hash[..8])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wcs_types::Status;

    fn with_changes(paths: &[&str]) -> CategorizedStatus {
        CategorizedStatus {
            changes: paths
                .iter()
                .map(|p| TrackedResource::new(*p, Status::Modified))
                .collect(),
            ..CategorizedStatus::default()
        }
    }

    #[test]
    fn counts_include_changelist_pairs() {
        let mut categorized = with_changes(&["/wc/a"]);
        categorized
            .changelists
            .insert("feat".into(), vec![TrackedResource::new("/wc/b", Status::Added)]);
        let Fingerprint::Counts(summary) = Fingerprint::counts(&categorized) else {
            panic!("expected counts fingerprint");
        };
        assert!(summary.starts_with("changes=1;conflicts=0;unversioned=0;remote=0"));
        assert!(summary.ends_with(";feat:1"));
    }

    #[test]
    fn counts_miss_same_count_substitution() {
        let before = Fingerprint::counts(&with_changes(&["/wc/a"]));
        let after = Fingerprint::counts(&with_changes(&["/wc/b"]));
        assert_eq!(before, after);
    }

    #[test]
    fn content_catches_same_count_substitution() {
        let normalizer = PathNormalizer::new(false);
        let before = Fingerprint::content(&with_changes(&["/wc/a"]), &normalizer);
        let after = Fingerprint::content(&with_changes(&["/wc/b"]), &normalizer);
        assert_ne!(before, after);
    }

    #[test]
    fn content_catches_status_change_on_same_path() {
        let normalizer = PathNormalizer::new(false);
        let modified = with_changes(&["/wc/a"]);
        let mut deleted = modified.clone();
        deleted.changes[0].status = Status::Deleted;
        assert_ne!(
            Fingerprint::content(&modified, &normalizer),
            Fingerprint::content(&deleted, &normalizer)
        );
    }

    #[test]
    fn content_distinguishes_groups() {
        let normalizer = PathNormalizer::new(false);
        let in_changes = with_changes(&["/wc/a"]);
        let in_conflicts = CategorizedStatus {
            conflicts: in_changes.changes.clone(),
            ..CategorizedStatus::default()
        };
        assert_ne!(
            Fingerprint::content(&in_changes, &normalizer),
            Fingerprint::content(&in_conflicts, &normalizer)
        );
    }

    #[test]
    fn content_is_deterministic() {
        let normalizer = PathNormalizer::new(false);
        let categorized = with_changes(&["/wc/a", "/wc/b"]);
        let fp = Fingerprint::compute(FingerprintMode::Content, &categorized, &normalizer);
        assert_eq!(fp, Fingerprint::compute(FingerprintMode::Content, &categorized, &normalizer));
        assert_eq!(fp.to_string().len(), 16);
    }
}
