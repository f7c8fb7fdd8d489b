//! Declarative resource intents handed to external executors.
//!
//! Every intent has an identity ([`ResourceRef`], rendered `Kind[title]`), a
//! [`Phase`] that fixes its place in the install → config → service chain,
//! and kind-specific attributes. Intents describe desired state only; they
//! are never applied by this crate.
pub mod exec;
pub mod file;
pub mod package;
pub mod repository;
pub mod service;
pub mod symlink;

use std::fmt;

use serde::{Serialize, Serializer};

pub use exec::ExecIntent;
pub use file::FileIntent;
pub use package::PackageIntent;
pub use repository::RepositorySourceIntent;
pub use service::ServiceIntent;
pub use symlink::SymlinkIntent;

/// The kind of a resource intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceKind {
    /// A package managed by the host package manager.
    Package,
    /// A file with rendered content.
    File,
    /// A supervised service.
    Service,
    /// A package repository definition.
    RepositorySource,
    /// A symbolic link.
    Symlink,
    /// A one-off command.
    Exec,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Package => write!(f, "Package"),
            Self::File => write!(f, "File"),
            Self::Service => write!(f, "Service"),
            Self::RepositorySource => write!(f, "RepositorySource"),
            Self::Symlink => write!(f, "Symlink"),
            Self::Exec => write!(f, "Exec"),
        }
    }
}

/// Identity of an intent: its kind plus a title unique within that kind.
///
/// # Examples
///
/// ```
/// use engine_plan::resources::{ResourceKind, ResourceRef};
///
/// let r = ResourceRef::new(ResourceKind::Package, "docker");
/// assert_eq!(r.to_string(), "Package[docker]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceRef {
    /// Resource kind.
    pub kind: ResourceKind,
    /// Title, unique per kind.
    pub title: String,
}

impl ResourceRef {
    /// Create a reference.
    #[must_use]
    pub fn new(kind: ResourceKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.kind, self.title)
    }
}

impl Serialize for ResourceRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Position of an intent in the fixed ordering chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Repositories and packages.
    Install,
    /// Configuration files.
    Config,
    /// Service supervision.
    Service,
    /// Commands that need the running service.
    Runtime,
    /// Not ordered relative to the chain.
    Independent,
}

/// Common interface of every intent kind.
pub trait Intent {
    /// Kind of this intent.
    fn kind(&self) -> ResourceKind;

    /// Title, unique within the kind.
    fn title(&self) -> &str;

    /// Phase of the ordering chain this intent belongs to.
    fn phase(&self) -> Phase;

    /// Human-readable one-line summary of the desired state.
    fn description(&self) -> String;

    /// Identity of this intent.
    fn reference(&self) -> ResourceRef {
        ResourceRef::new(self.kind(), self.title())
    }
}

/// Any resource intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resource {
    /// See [`PackageIntent`].
    Package(PackageIntent),
    /// See [`FileIntent`].
    File(FileIntent),
    /// See [`ServiceIntent`].
    Service(ServiceIntent),
    /// See [`RepositorySourceIntent`].
    RepositorySource(RepositorySourceIntent),
    /// See [`SymlinkIntent`].
    Symlink(SymlinkIntent),
    /// See [`ExecIntent`].
    Exec(ExecIntent),
}

impl Resource {
    fn inner(&self) -> &dyn Intent {
        match self {
            Self::Package(r) => r,
            Self::File(r) => r,
            Self::Service(r) => r,
            Self::RepositorySource(r) => r,
            Self::Symlink(r) => r,
            Self::Exec(r) => r,
        }
    }
}

impl Intent for Resource {
    fn kind(&self) -> ResourceKind {
        self.inner().kind()
    }

    fn title(&self) -> &str {
        self.inner().title()
    }

    fn phase(&self) -> Phase {
        self.inner().phase()
    }

    fn description(&self) -> String {
        self.inner().description()
    }
}

macro_rules! impl_from_intent {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        $(
            impl From<$ty> for Resource {
                fn from(intent: $ty) -> Self {
                    Self::$variant(intent)
                }
            }
        )+
    };
}

impl_from_intent!(
    Package(PackageIntent),
    File(FileIntent),
    Service(ServiceIntent),
    RepositorySource(RepositorySourceIntent),
    Symlink(SymlinkIntent),
    Exec(ExecIntent),
);

/// A resource intent together with its outgoing ordering edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceIntent {
    /// The intent itself.
    #[serde(flatten)]
    pub resource: Resource,
    /// Intents that must be applied after this one.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub before: Vec<ResourceRef>,
    /// Intents that must be applied after this one and refreshed when it changes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notifies: Vec<ResourceRef>,
}

impl ResourceIntent {
    /// Identity of the wrapped intent.
    #[must_use]
    pub fn reference(&self) -> ResourceRef {
        self.resource.reference()
    }
}
