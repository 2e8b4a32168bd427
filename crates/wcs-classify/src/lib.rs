//! Status categorization for working copies.
//!
//! Takes the raw records reported by the tool, removes external mounts and
//! everything underneath them, and sorts what remains into the groups the
//! presentation layer shows.
//!
//! # Key Types
//!
//! - [`CompiledConfig`] -- Configuration with glob patterns compiled
//! - [`filter_externals`] / [`FilteredStatus`] -- External/descendant pre-pass
//! - [`StatusCategorizer`] / [`CategorizedStatus`] -- The classification pass
//! - [`conflict_byproduct_base`] -- Recognizes conflict sidecar files

pub mod byproduct;
pub mod categorize;
pub mod error;
pub mod externals;
pub mod matcher;

pub use byproduct::conflict_byproduct_base;
pub use categorize::{CategorizedStatus, StatusCategorizer};
pub use error::{ConfigError, ConfigResult};
pub use externals::{filter_externals, FilteredStatus};
pub use matcher::CompiledConfig;
