//! CLI subcommands.

pub mod common;
pub mod extent;
pub mod render;
