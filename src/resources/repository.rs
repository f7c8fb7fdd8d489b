//! Repository source intent.
use serde::Serialize;

use super::{Intent, Phase, ResourceKind};
use crate::platform::UpstreamRepository;

/// A vendor package repository to register with the package manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositorySourceIntent {
    /// Identity title.
    pub title: String,
    /// Repository definition.
    #[serde(flatten)]
    pub repository: UpstreamRepository,
}

impl RepositorySourceIntent {
    /// Create a repository intent.
    #[must_use]
    pub fn new(title: impl Into<String>, repository: UpstreamRepository) -> Self {
        Self {
            title: title.into(),
            repository,
        }
    }
}

impl Intent for RepositorySourceIntent {
    fn kind(&self) -> ResourceKind {
        ResourceKind::RepositorySource
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn phase(&self) -> Phase {
        Phase::Install
    }

    fn description(&self) -> String {
        match &self.repository {
            UpstreamRepository::Apt {
                location, release, ..
            } => format!("apt {location} {release}"),
            UpstreamRepository::Yum { name, baseurl, .. } => format!("yum {name} {baseurl}"),
        }
    }
}
