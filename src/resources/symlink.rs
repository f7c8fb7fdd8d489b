//! Symlink intent.
use serde::Serialize;

use super::{Intent, Phase, ResourceKind};

/// Init script shim that hands legacy `service` calls to upstart.
pub const UPSTART_JOB: &str = "/lib/init/upstart-job";

/// A symbolic link at `path` pointing to `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymlinkIntent {
    /// Where the link lives.
    pub path: String,
    /// What the link points to.
    pub target: String,
}

impl SymlinkIntent {
    /// Create a symlink intent.
    #[must_use]
    pub fn new(path: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            target: target.into(),
        }
    }

    /// Redirect `/etc/init.d/<service>` to the upstart job shim.
    #[must_use]
    pub fn upstart_init_script(service_name: &str) -> Self {
        Self::new(format!("/etc/init.d/{service_name}"), UPSTART_JOB)
    }
}

impl Intent for SymlinkIntent {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Symlink
    }

    fn title(&self) -> &str {
        &self.path
    }

    fn phase(&self) -> Phase {
        Phase::Independent
    }

    fn description(&self) -> String {
        format!("{} -> {}", self.path, self.target)
    }
}
