//! File intent.
use serde::Serialize;

use super::{Intent, Phase, ResourceKind};
use crate::render::RenderedConfig;

/// A file whose full content is managed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileIntent {
    /// Absolute path on the host.
    pub path: String,
    /// Desired content.
    pub content: String,
    /// Hex SHA-256 of `content`.
    pub checksum: String,
    /// Owning user.
    pub owner: String,
    /// Owning group.
    pub group: String,
    /// Octal permission bits.
    pub mode: String,
}

impl FileIntent {
    /// A root-owned, world-readable file holding `rendered`.
    #[must_use]
    pub fn from_rendered(path: impl Into<String>, rendered: &RenderedConfig) -> Self {
        Self {
            path: path.into(),
            content: rendered.content.clone(),
            checksum: rendered.checksum(),
            owner: "root".to_string(),
            group: "root".to_string(),
            mode: "0644".to_string(),
        }
    }
}

impl Intent for FileIntent {
    fn kind(&self) -> ResourceKind {
        ResourceKind::File
    }

    fn title(&self) -> &str {
        &self.path
    }

    fn phase(&self) -> Phase {
        Phase::Config
    }

    fn description(&self) -> String {
        let short = self.checksum.get(..12).unwrap_or(&self.checksum);
        format!("{} ({} bytes, sha256 {short})", self.path, self.content.len())
    }
}
