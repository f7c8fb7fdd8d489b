//! `engine-plan` binary: parses arguments and dispatches to a subcommand.
use anyhow::Result;
use clap::Parser;

use engine_plan::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    logging::init_subscriber(args.verbose);
    let log = logging::Logger::new();

    match args.command {
        cli::Command::Plan(opts) => commands::plan::run(&opts, &log),
        cli::Command::Render(opts) => commands::render::run(&opts, &log),
        cli::Command::Exec(opts) => commands::exec::run(&opts, &log),
        cli::Command::Version => {
            commands::version::run();
            Ok(())
        }
    }
}
