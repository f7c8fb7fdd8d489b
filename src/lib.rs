//! Container engine install and configuration planner.
//!
//! Turns raw host facts and loosely typed user parameters into an ordered,
//! declarative set of resource intents (packages, repository sources, the
//! daemon configuration file, the service, and container execs) for an
//! external executor to apply. Nothing here touches the host.
//!
//! The public API is organised into these layers:
//!
//! - **[`platform`]** — normalise facts into a [`platform::HostProfile`] and
//!   dispatch per-family defaults
//! - **[`config`]** — load inputs and validate parameters into an
//!   [`config::EngineConfig`]
//! - **[`packages`]** — decide the engine, kernel, and prerequisite packages
//! - **[`render`]** — render the daemon configuration file
//! - **[`resources`]** — the intent kinds handed to executors
//! - **[`plan`]** — assemble and order intents into a [`plan::Plan`]
//! - **[`commands`]** — top-level subcommand orchestration (`plan`, `render`, `exec`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod packages;
pub mod plan;
pub mod platform;
pub mod render;
pub mod resources;
