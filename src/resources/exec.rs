//! Exec intent: a command run inside a container.
use serde::Serialize;

use super::{Intent, Phase, ResourceKind};
use crate::config::ExecSpec;

/// A one-off command, identified by its full command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecIntent {
    /// Full command line; also the identity title.
    pub command: String,
    /// Environment assignments.
    pub environment: Vec<String>,
    /// Search path for the command.
    pub path: Vec<String>,
    /// Timeout in seconds; `0` disables it.
    pub timeout: u32,
}

impl ExecIntent {
    /// Build the exec intent for `spec` using the engine client `docker_command`.
    #[must_use]
    pub fn from_spec(spec: &ExecSpec, docker_command: &str) -> Self {
        Self {
            command: spec.command_line(docker_command),
            environment: vec!["HOME=/root".to_string()],
            path: vec!["/bin".to_string(), "/usr/bin".to_string()],
            timeout: 0,
        }
    }
}

impl Intent for ExecIntent {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Exec
    }

    fn title(&self) -> &str {
        &self.command
    }

    fn phase(&self) -> Phase {
        Phase::Runtime
    }

    fn description(&self) -> String {
        self.command.clone()
    }
}
