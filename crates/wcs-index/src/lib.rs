//! Resource index for working-copy status.
//!
//! Owns the groups shown to the user and a flat `path -> resource` index
//! over them. Each reconciliation swaps group contents wholesale, creates
//! and disposes changelist groups as names come and go, and rebuilds the
//! flat index only when the categorized output's fingerprint changed.
//!
//! # Key Types
//!
//! - [`ResourceIndexManager`] -- Reconciler and lookup structure
//! - [`Group`] / [`GroupKind`] / [`GroupId`] -- Exposed containers
//! - [`GroupEvent`] / [`GroupObserver`] -- Lifecycle notifications
//! - [`Fingerprint`] -- Change detector for skipping index rebuilds

pub mod event;
pub mod fingerprint;
pub mod group;
pub mod manager;

pub use event::{GroupEvent, GroupObserver, RecordingObserver};
pub use fingerprint::Fingerprint;
pub use group::{Group, GroupId, GroupKind};
pub use manager::ResourceIndexManager;
