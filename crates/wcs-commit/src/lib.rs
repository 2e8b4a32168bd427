//! Commit planning for working copies.
//!
//! Turns a selection of tracked resources into the exact path list the
//! commit operation must receive: rename targets bring their copy-from
//! source along, and added parent directories are pulled in so their added
//! children can be committed.
//!
//! # Key Types
//!
//! - [`CommitFlow`] -- Commit service, built once from configuration
//! - [`CommitPlan`] -- Display paths, rename sources and the submitted list
//! - [`expand_commit_paths`] -- The path expansion itself

pub mod error;
pub mod expander;
pub mod flow;

pub use error::{CommitError, CommitResult};
pub use expander::{expand_commit_paths, CommitPlan};
pub use flow::CommitFlow;
