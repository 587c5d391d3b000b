//! Content loaders for reading combat data from files.
//!
//! Each loader reads one file format into engine-ready values. The
//! [`ContentFactory`] ties them together for a data directory.

pub mod config;
pub mod entities;
pub mod factory;
pub mod skills;

pub use config::ConfigLoader;
pub use entities::EntityLoader;
pub use factory::{ContentFactory, ContentSet};
pub use skills::SkillLoader;

use std::path::Path;

use anyhow::Context;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file {}", path.display()))
}
