//! Command-line interface definition.
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Top-level CLI entry point for the container engine planner.
#[derive(Parser, Debug)]
#[command(
    name = "engine-plan",
    about = "Resolve container engine install and configuration intents",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile an ordered resource plan for one or more hosts
    Plan(PlanOpts),
    /// Print the rendered engine configuration file
    Render(RenderOpts),
    /// Print the exec intent for a command run inside a container
    Exec(ExecOpts),
    /// Print version information
    Version,
}

/// Output format for plans.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Pretty-printed JSON document.
    #[default]
    Json,
    /// One line per intent.
    Text,
}

/// Options for the `plan` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct PlanOpts {
    /// Parameters file (.toml or .json); missing means all defaults
    #[arg(long)]
    pub params: PathBuf,

    /// Host facts file (.toml or .json); repeat to plan several hosts
    #[arg(long, required = true)]
    pub facts: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// Options for the `render` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct RenderOpts {
    /// Parameters file (.toml or .json); missing means all defaults
    #[arg(long)]
    pub params: PathBuf,
}

/// Options for the `exec` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct ExecOpts {
    /// Container to run the command in
    #[arg(long)]
    pub container: String,

    /// Command to run
    #[arg(long)]
    pub command: String,

    /// Run the command in the background
    #[arg(long)]
    pub detach: bool,

    /// Keep stdin open
    #[arg(long)]
    pub interactive: bool,

    /// Allocate a pseudo-TTY
    #[arg(long)]
    pub tty: bool,

    /// Engine client binary
    #[arg(long, default_value = "docker")]
    pub docker_command: String,
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_plan_with_multiple_facts() {
        let cli = Cli::parse_from([
            "engine-plan",
            "plan",
            "--params",
            "params.toml",
            "--facts",
            "a.toml",
            "--facts",
            "b.json",
        ]);
        assert!(
            matches!(&cli.command, Command::Plan(_)),
            "Expected Plan command"
        );
        if let Command::Plan(opts) = cli.command {
            assert_eq!(opts.facts.len(), 2);
            assert_eq!(opts.format, OutputFormat::Json);
        }
    }

    #[test]
    fn parse_plan_text_format() {
        let cli = Cli::parse_from([
            "engine-plan",
            "plan",
            "--params",
            "p.toml",
            "--facts",
            "f.toml",
            "--format",
            "text",
        ]);
        if let Command::Plan(opts) = cli.command {
            assert_eq!(opts.format, OutputFormat::Text);
        } else {
            panic!("Expected Plan command");
        }
    }

    #[test]
    fn plan_requires_facts() {
        let result = Cli::try_parse_from(["engine-plan", "plan", "--params", "p.toml"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_exec_flags() {
        let cli = Cli::parse_from([
            "engine-plan",
            "exec",
            "--container",
            "web",
            "--command",
            "uptime",
            "--tty",
        ]);
        if let Command::Exec(opts) = cli.command {
            assert!(opts.tty);
            assert!(!opts.detach);
            assert_eq!(opts.docker_command, "docker");
        } else {
            panic!("Expected Exec command");
        }
    }

    #[test]
    fn parse_version() {
        let cli = Cli::parse_from(["engine-plan", "version"]);
        assert!(matches!(cli.command, Command::Version));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::parse_from(["engine-plan", "-v", "render", "--params", "p.toml"]);
        assert!(cli.verbose);
    }
}
