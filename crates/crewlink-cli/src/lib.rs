//! Shared plumbing for the `tag-roster` and `generate-puzzle` binaries.

pub mod config;
pub mod logging;
pub mod output;
