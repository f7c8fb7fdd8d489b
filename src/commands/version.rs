//! Command: print version information.

/// Version string, preferring the build-time `ENGINE_PLAN_VERSION`.
#[must_use]
pub fn version() -> &'static str {
    option_env!("ENGINE_PLAN_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the engine-plan version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("engine-plan {}", version());
}
