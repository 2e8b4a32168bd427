//! High-level SDK for working-copy status.
//!
//! Wires the engine crates to the collaborators that talk to the
//! version-control tool and to configuration. One [`WorkingCopy`] per
//! working-copy root runs fetch, filter, classify and reconcile as a single
//! pass, never two at once.

pub mod error;
pub mod source;
pub mod working_copy;

pub use error::{SdkError, SdkResult};
pub use source::{ConfigSource, InMemoryStatusSource, StaticConfig, StatusOptions, StatusSource};
pub use working_copy::{RefreshSummary, WorkingCopy};

// Re-export key types
pub use wcs_commit::{CommitFlow, CommitPlan};
pub use wcs_index::{Group, GroupEvent, GroupKind, GroupObserver, ResourceIndexManager};
pub use wcs_types::{RawStatusRecord, ScmConfig, Status, TrackedResource};
