//! Structured logger with per-host summary collection.
use std::sync::Mutex;

use super::types::{HostEntry, PlanStatus};

/// Tracing target used for stage headers.
pub(super) const STAGE_TARGET: &str = "engine_plan::stage";

/// Console logger that also keeps a summary of every planned host.
///
/// Messages go through [`tracing`], so formatting and verbosity are decided
/// by the subscriber installed with
/// [`init_subscriber`](super::subscriber::init_subscriber).
#[derive(Debug, Default)]
pub struct Logger {
    hosts: Mutex<Vec<HostEntry>>,
}

impl Logger {
    /// Create a new logger with an empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a clone of all recorded host entries.
    #[must_use]
    pub fn host_entries(&self) -> Vec<HostEntry> {
        self.hosts.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Record a host's plan outcome for the summary.
    pub fn record_host(&self, name: &str, status: PlanStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.hosts.lock() {
            guard.push(HostEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Count the hosts whose plan failed.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.hosts.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|h| h.status == PlanStatus::Failed)
                .count()
        })
    }

    /// Print the summary of all recorded hosts.
    pub fn print_summary(&self) {
        let hosts = self.host_entries();
        if hosts.is_empty() {
            return;
        }

        self.stage("Summary");

        let mut ok = 0u32;
        let mut warned = 0u32;
        let mut failed = 0u32;

        for host in &hosts {
            match host.status {
                PlanStatus::Ok => ok += 1,
                PlanStatus::Warned => warned += 1,
                PlanStatus::Failed => failed += 1,
            }
            let (icon, color) = host.status.style();
            let suffix = host
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));
            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", host.name));
        }

        let total = ok + warned + failed;
        self.info(&format!(
            "{total} hosts: \x1b[32m{ok} ok\x1b[0m, \x1b[33m{warned} warned\x1b[0m, \x1b[31m{failed} failed\x1b[0m"
        ));
    }
}
