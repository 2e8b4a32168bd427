//! Status codes reported by the version-control tool.
//!
//! Codes deserialize leniently: an unrecognised word degrades to
//! [`Status::None`] / [`PropStatus::None`] instead of failing the whole
//! status dump.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Content status of a path in the working copy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Status {
    Added,
    Conflicted,
    Deleted,
    External,
    Ignored,
    Incomplete,
    Merged,
    Missing,
    Modified,
    #[default]
    None,
    Normal,
    Obstructed,
    Replaced,
    Unversioned,
}

impl Status {
    /// All status codes, in declaration order.
    pub const ALL: [Status; 14] = [
        Status::Added,
        Status::Conflicted,
        Status::Deleted,
        Status::External,
        Status::Ignored,
        Status::Incomplete,
        Status::Merged,
        Status::Missing,
        Status::Modified,
        Status::None,
        Status::Normal,
        Status::Obstructed,
        Status::Replaced,
        Status::Unversioned,
    ];

    /// Returns `true` for `normal` and `none`: nothing to show for the content.
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Status::Normal | Status::None)
    }

    /// The word the tool prints for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Added => "added",
            Status::Conflicted => "conflicted",
            Status::Deleted => "deleted",
            Status::External => "external",
            Status::Ignored => "ignored",
            Status::Incomplete => "incomplete",
            Status::Merged => "merged",
            Status::Missing => "missing",
            Status::Modified => "modified",
            Status::None => "none",
            Status::Normal => "normal",
            Status::Obstructed => "obstructed",
            Status::Replaced => "replaced",
            Status::Unversioned => "unversioned",
        }
    }

    /// Single-letter badge, following the tool's `status` column.
    pub fn letter(&self) -> char {
        match self {
            Status::Added => 'A',
            Status::Conflicted => 'C',
            Status::Deleted => 'D',
            Status::External => 'X',
            Status::Ignored => 'I',
            Status::Incomplete => '!',
            Status::Merged => 'G',
            Status::Missing => '!',
            Status::Modified => 'M',
            Status::None | Status::Normal => ' ',
            Status::Obstructed => '~',
            Status::Replaced => 'R',
            Status::Unversioned => '?',
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Status::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == lowered)
            .ok_or_else(|| TypeError::UnknownStatus(s.to_string()))
    }
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_default()
    }
}

/// Property status of a path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum PropStatus {
    #[default]
    None,
    Normal,
    Modified,
    Conflicted,
}

impl PropStatus {
    /// Returns `true` when there is no property change to show.
    pub fn is_unchanged(&self) -> bool {
        matches!(self, PropStatus::Normal | PropStatus::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PropStatus::None => "none",
            PropStatus::Normal => "normal",
            PropStatus::Modified => "modified",
            PropStatus::Conflicted => "conflicted",
        }
    }
}

impl fmt::Display for PropStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for PropStatus {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => PropStatus::Normal,
            "modified" => PropStatus::Modified,
            "conflicted" => PropStatus::Conflicted,
            _ => PropStatus::None,
        }
    }
}

/// Repository lock badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LockStatus {
    /// Locked, and the lock token is held by this working copy.
    #[serde(rename = "K")]
    Held,
    /// Locked by another user or working copy.
    #[serde(rename = "O")]
    Other,
    /// The token held here no longer matches any repository lock.
    #[serde(rename = "B")]
    Broken,
    /// The token held here was replaced by someone else's lock.
    #[serde(rename = "T")]
    Stolen,
}

impl LockStatus {
    pub fn badge(&self) -> char {
        match self {
            LockStatus::Held => 'K',
            LockStatus::Other => 'O',
            LockStatus::Broken => 'B',
            LockStatus::Stolen => 'T',
        }
    }
}

impl FromStr for LockStatus {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "K" | "k" => Ok(LockStatus::Held),
            "O" | "o" => Ok(LockStatus::Other),
            "B" | "b" => Ok(LockStatus::Broken),
            "T" | "t" => Ok(LockStatus::Stolen),
            other => Err(TypeError::UnknownLockStatus(other.to_string())),
        }
    }
}

/// Node kind of a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    File,
    Dir,
}
