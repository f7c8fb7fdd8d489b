//! Command: print the exec intent for a command run inside a container.
use anyhow::Result;

use crate::cli::ExecOpts;
use crate::config::ExecSpec;
use crate::logging::Logger;
use crate::resources::{ExecIntent, Intent as _, Resource};

/// Build the exec intent described by `opts`.
#[must_use]
pub fn intent(opts: &ExecOpts) -> ExecIntent {
    let spec = ExecSpec {
        name: opts.command.clone(),
        container: opts.container.clone(),
        command: opts.command.clone(),
        detach: opts.detach,
        interactive: opts.interactive,
        tty: opts.tty,
    };
    ExecIntent::from_spec(&spec, &opts.docker_command)
}

/// Print the exec intent as JSON to stdout.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
#[allow(clippy::print_stdout)]
pub fn run(opts: &ExecOpts, log: &Logger) -> Result<()> {
    let resource = Resource::from(intent(opts));
    log.debug(&resource.reference().to_string());
    println!("{}", serde_json::to_string_pretty(&resource)?);
    Ok(())
}
