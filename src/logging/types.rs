//! Summary types: per-host entries and their status.

/// Plan outcome for one host, kept for the run summary.
#[derive(Debug, Clone)]
pub struct HostEntry {
    /// Host label (hostname or facts file).
    pub name: String,
    /// Final status of the host's plan.
    pub status: PlanStatus,
    /// Optional detail message (e.g., intent count or error description).
    pub message: Option<String>,
}

/// Status of a compiled plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStatus {
    /// Plan compiled cleanly.
    Ok,
    /// Plan compiled with warnings (e.g. fallback defaults for an unknown family).
    Warned,
    /// Plan could not be compiled.
    Failed,
}

impl PlanStatus {
    /// Summary icon and ANSI colour for this status.
    #[must_use]
    pub const fn style(self) -> (&'static str, &'static str) {
        match self {
            Self::Ok => ("✓", "\x1b[32m"),
            Self::Warned => ("○", "\x1b[33m"),
            Self::Failed => ("✗", "\x1b[31m"),
        }
    }
}
