//! Package resolution: which engine, prerequisite, and kernel packages apply.
use serde::Serialize;

use crate::config::{EngineConfig, Ensure};
use crate::platform::{FamilyDefaults, HostProfile, OsFamily, UpstreamRepository};

/// Ubuntu release whose stock kernel is replaced by a backported one.
const BACKPORT_KERNEL_RELEASE: &str = "12.04";

/// Backported kernel packages installed on [`BACKPORT_KERNEL_RELEASE`].
const BACKPORT_KERNEL_PACKAGES: &[&str] = &[
    "linux-image-generic-lts-trusty",
    "linux-headers-generic-lts-trusty",
];

/// A package with its desired state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageSpec {
    /// Package name as known to the package manager.
    pub name: String,
    /// Desired state.
    pub ensure: Ensure,
}

impl PackageSpec {
    /// A package that must be installed.
    #[must_use]
    pub fn present(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ensure: Ensure::Present,
        }
    }
}

/// Outcome of package resolution for one host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageDecision {
    /// The engine package; `None` when the package is not managed.
    pub engine: Option<PackageSpec>,
    /// Kernel packages the engine needs on this host.
    pub kernel_packages: Vec<String>,
    /// Whether the vendor repository is configured.
    pub needs_upstream_source: bool,
    /// The vendor repository, present exactly when `needs_upstream_source`.
    pub repository: Option<UpstreamRepository>,
    /// Package enabling HTTPS repository transport, when the repository needs one.
    pub https_transport: Option<String>,
    /// Prerequisite packages, defaults or the caller's full replacement.
    pub prerequisites: Vec<PackageSpec>,
}

impl PackageDecision {
    /// Name of the engine package, if managed.
    #[must_use]
    pub fn engine_name(&self) -> Option<&str> {
        self.engine.as_ref().map(|p| p.name.as_str())
    }
}

/// Decide which packages and repository the host needs.
///
/// Pure function of its inputs. Unsupported OS families resolve with the
/// generic defaults from [`HostProfile::defaults`].
#[must_use]
pub fn resolve(host: &HostProfile, config: &EngineConfig) -> PackageDecision {
    resolve_with(host, &host.defaults(), config)
}

/// Resolve with precomputed family defaults.
#[must_use]
pub fn resolve_with(
    host: &HostProfile,
    defaults: &FamilyDefaults,
    config: &EngineConfig,
) -> PackageDecision {
    let repository = if config.use_upstream_source {
        defaults.upstream_repository.clone().map(|repo| match repo {
            UpstreamRepository::Apt {
                location,
                release,
                repos,
                key,
                key_source,
                required_packages,
                pin,
                include_src,
            } => UpstreamRepository::Apt {
                location: config.package_source_location.clone().unwrap_or(location),
                release,
                repos,
                key,
                key_source,
                required_packages,
                pin,
                include_src,
            },
            yum @ UpstreamRepository::Yum { .. } => yum,
        })
    } else {
        None
    };
    let needs_upstream_source = repository.is_some();
    if config.use_upstream_source && !needs_upstream_source {
        tracing::debug!(
            "no vendor repository for {} {}; using the native package",
            host.os_family,
            host.distribution_id
        );
    }

    let default_name = if needs_upstream_source {
        defaults.upstream_package
    } else {
        defaults.native_package
    };
    let engine = config.manage_package.then(|| PackageSpec {
        name: config.package_identifier(default_name),
        ensure: config.ensure,
    });

    let prerequisites = config.prerequired_packages.as_ref().map_or_else(
        || {
            defaults
                .prerequisites
                .iter()
                .copied()
                .map(PackageSpec::present)
                .collect()
        },
        |names| names.iter().map(PackageSpec::present).collect(),
    );

    let kernel_packages = if config.manage_kernel {
        kernel_packages(host)
    } else {
        Vec::new()
    };

    PackageDecision {
        engine,
        kernel_packages,
        needs_upstream_source,
        repository,
        https_transport: if needs_upstream_source {
            defaults.https_transport.map(String::from)
        } else {
            None
        },
        prerequisites,
    }
}

/// Kernel packages the engine needs on this host.
///
/// Only Ubuntu ships the storage modules outside the base kernel image:
/// 12.04 gets the backported kernel, and `-generic` flavoured kernels get the
/// matching `linux-image-extra` package. Everything else needs nothing.
#[must_use]
pub fn kernel_packages(host: &HostProfile) -> Vec<String> {
    if host.os_family != OsFamily::Debian || !host.is_ubuntu() {
        return Vec::new();
    }
    if host.release.as_deref() == Some(BACKPORT_KERNEL_RELEASE) {
        return BACKPORT_KERNEL_PACKAGES
            .iter()
            .map(ToString::to_string)
            .collect();
    }
    match host.kernel_release.as_deref() {
        Some(release) if release.ends_with("-generic") => {
            vec![format!("linux-image-extra-{release}")]
        }
        _ => Vec::new(),
    }
}
