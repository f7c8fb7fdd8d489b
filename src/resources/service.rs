//! Service intent.
use serde::Serialize;

use super::{Intent, Phase, ResourceKind};
use crate::config::ServiceState;
use crate::platform::ServiceProvider;

/// The engine service as the supervisor should run it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceIntent {
    /// Identity title; stable regardless of the unit name.
    pub title: String,
    /// Unit name known to the init system.
    pub name: String,
    /// Desired run state; `None` leaves it unmanaged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ensure: Option<ServiceState>,
    /// Start at boot.
    pub enable: bool,
    /// Init system override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<ServiceProvider>,
    /// Whether the init script supports `status`.
    pub hasstatus: bool,
    /// Whether the init script supports `restart`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hasrestart: Option<bool>,
}

impl Intent for ServiceIntent {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Service
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn phase(&self) -> Phase {
        Phase::Service
    }

    fn description(&self) -> String {
        let state = self.ensure.map_or("unmanaged", ServiceState::as_str);
        let enable = if self.enable { "enabled" } else { "disabled" };
        let provider = self
            .provider
            .map_or_else(String::new, |p| format!(" via {p}"));
        format!("{} {state}, {enable}{provider}", self.name)
    }
}
