use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Changelist name that is excluded from commits and from the badge count
/// unless configured otherwise.
pub const IGNORE_ON_COMMIT: &str = "ignore-on-commit";

/// Source-control configuration.
///
/// The configuration may change while the application runs, so callers
/// re-read it at the start of every reconciliation pass instead of keeping
/// a copy around.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScmConfig {
    /// Treat externals from the project's own repository as native paths.
    pub combine_external_if_same_server: bool,
    /// Never show the Unversioned group's contents.
    pub hide_unversioned: bool,
    /// Glob patterns applied to unversioned paths.
    pub ignore: Vec<String>,
    /// Changelists left out of the badge count.
    pub ignore_on_status_count: Vec<String>,
    /// Changelists left out of "commit everything".
    pub ignore_on_commit: Vec<String>,
    /// Add the Unversioned group's size to the badge count.
    pub count_unversioned: bool,
    /// Ask the repository for incoming changes and show them.
    pub check_remote_changes: bool,
    /// Workspace file-exclude map: pattern -> enabled.
    pub files_exclude: BTreeMap<String, bool>,
    pub group_ordering: GroupOrdering,
    pub fingerprint: FingerprintMode,
    pub case_insensitive_paths: bool,
}

impl Default for ScmConfig {
    fn default() -> Self {
        Self {
            combine_external_if_same_server: false,
            hide_unversioned: false,
            ignore: Vec::new(),
            ignore_on_status_count: vec![IGNORE_ON_COMMIT.to_string()],
            ignore_on_commit: vec![IGNORE_ON_COMMIT.to_string()],
            count_unversioned: false,
            check_remote_changes: true,
            files_exclude: BTreeMap::new(),
            group_ordering: GroupOrdering::default(),
            fingerprint: FingerprintMode::default(),
            case_insensitive_paths: cfg!(windows),
        }
    }
}

impl ScmConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, TypeError> {
        toml::from_str(source).map_err(|e| TypeError::InvalidConfig(e.to_string()))
    }

    /// Enabled file-exclude patterns, in key order.
    pub fn enabled_excludes(&self) -> impl Iterator<Item = &str> {
        self.files_exclude
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(pattern, _)| pattern.as_str())
    }

    pub fn is_ignored_on_status_count(&self, changelist: &str) -> bool {
        self.ignore_on_status_count.iter().any(|name| name == changelist)
    }
}

/// How group presentation order is expressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupOrdering {
    /// Groups carry an explicit sort key; nothing is recreated for ordering.
    #[default]
    Explicit,
    /// For hosts that order groups by creation time: Unversioned and Remote
    /// Changes are disposed and recreated whenever the changelist set changes.
    CreationOrder,
}

/// How the reconciler decides whether the flat index must be rebuilt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerprintMode {
    /// Hash of every group's resources; catches same-count substitutions.
    #[default]
    Content,
    /// Group sizes and `name:count` pairs only.
    Counts,
}
