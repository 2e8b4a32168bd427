//! Foundation types for working-copy status tracking.
//!
//! Every other `wcs` crate depends on `wcs-types`. The types here describe
//! what the version-control tool reported for a path and what the engine
//! decided to show for it.
//!
//! # Key Types
//!
//! - [`RawStatusRecord`] -- One parsed status line, as produced by the tool adapter
//! - [`TrackedResource`] -- The classification outcome for one path
//! - [`Status`] / [`PropStatus`] -- Content and property status codes
//! - [`LockStatus`] -- Repository lock badge (K/O/B/T)
//! - [`PathNormalizer`] -- Path key normalization used by the flat index
//! - [`ScmConfig`] -- Runtime configuration read at the start of every pass

pub mod config;
pub mod error;
pub mod path;
pub mod record;
pub mod resource;
pub mod status;

pub use config::{FingerprintMode, GroupOrdering, ScmConfig};
pub use error::TypeError;
pub use path::{resolve_record_path, PathNormalizer};
pub use record::{
    CommitInfo, ExternalInfo, LockInfo, Membership, RawStatusRecord, RemoteStatus, WcFlags,
};
pub use resource::{PropertyChange, PropertyChangeKind, TrackedResource};
pub use status::{LockStatus, PathKind, PropStatus, Status};
