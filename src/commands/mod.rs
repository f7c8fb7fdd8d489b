//! Top-level subcommand handlers.
pub mod exec;
pub mod plan;
pub mod render;
pub mod version;
