//! Package intent.
use serde::Serialize;

use super::{Intent, Phase, ResourceKind};
use crate::config::Ensure;
use crate::packages::PackageSpec;

/// A package the host package manager should install or remove.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageIntent {
    /// Identity title (e.g. `docker` for the engine, whatever its name).
    pub title: String,
    /// Package name passed to the package manager.
    pub name: String,
    /// Desired state.
    pub ensure: Ensure,
}

impl PackageIntent {
    /// Create a package intent.
    #[must_use]
    pub fn new(title: impl Into<String>, name: impl Into<String>, ensure: Ensure) -> Self {
        Self {
            title: title.into(),
            name: name.into(),
            ensure,
        }
    }

    /// A package whose title is its own name.
    #[must_use]
    pub fn from_spec(spec: &PackageSpec) -> Self {
        Self::new(spec.name.clone(), spec.name.clone(), spec.ensure)
    }
}

impl Intent for PackageIntent {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Package
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn phase(&self) -> Phase {
        Phase::Install
    }

    fn description(&self) -> String {
        if self.title == self.name {
            format!("{} ({})", self.name, self.ensure)
        } else {
            format!("{} as {} ({})", self.title, self.name, self.ensure)
        }
    }
}
