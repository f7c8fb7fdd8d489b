//! Host facts normalisation and per-family dispatch defaults.
use std::fmt;

use serde::{Serialize, Serializer};

use crate::config::raw::{RawInput, RawValue};
use crate::error::{HostError, UnsupportedHost};

/// Operating system family of the target host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OsFamily {
    /// Debian, Ubuntu and derivatives (apt).
    Debian,
    /// Red Hat, `CentOS`, Fedora, Amazon (yum).
    RedHat,
    /// Arch Linux (pacman).
    Archlinux,
    /// Any family without a dedicated dispatch branch.
    Other(String),
}

impl OsFamily {
    /// Parse the `osfamily` fact (case-insensitive).
    #[must_use]
    pub fn from_fact(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "debian" => Self::Debian,
            "redhat" => Self::RedHat,
            "archlinux" | "arch" => Self::Archlinux,
            _ => Self::Other(value.to_string()),
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debian => write!(f, "Debian"),
            Self::RedHat => write!(f, "RedHat"),
            Self::Archlinux => write!(f, "Archlinux"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

impl Serialize for OsFamily {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Canonical identification of the target host.
///
/// Created once from raw facts by [`HostProfile::from_facts`] and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostProfile {
    /// Host name, when the facts carry one.
    pub hostname: Option<String>,
    /// OS family used for dispatch.
    pub os_family: OsFamily,
    /// Distribution identifier (e.g. `Ubuntu`, `Debian`, `CentOS`).
    pub distribution_id: String,
    /// Release codename (e.g. `maverick`).
    pub codename: Option<String>,
    /// Running kernel release (e.g. `3.8.0-29-generic`).
    pub kernel_release: Option<String>,
    /// Full OS release string (e.g. `10.04`).
    pub release: Option<String>,
    /// Major OS release number.
    pub major_release: Option<u32>,
}

/// Look up a fact as a scalar string. Empty strings count as absent.
fn fact(facts: &RawInput, key: &str) -> Result<Option<String>, HostError> {
    match facts.get(key) {
        None => Ok(None),
        Some(value) => value
            .scalar()
            .map(|s| (!s.is_empty()).then_some(s))
            .ok_or_else(|| HostError::NotScalar(key.to_string())),
    }
}

/// Look up `table.key` inside a structured fact such as `os`.
fn nested_fact(facts: &RawInput, table: &str, key: &str) -> Option<String> {
    facts
        .get(table)
        .and_then(RawValue::as_table)
        .and_then(|t| t.get(key))
        .and_then(RawValue::scalar)
        .filter(|s| !s.is_empty())
}

/// Leading numeric component of a release string (`"10.04"` → `10`).
fn leading_number(release: &str) -> Option<u32> {
    release
        .split(['.', '-', ' '])
        .next()
        .and_then(|major| major.parse().ok())
}

impl HostProfile {
    /// Normalise raw facts into a host profile.
    ///
    /// Legacy flat facts (`osfamily`, `lsbdistid`, …) take precedence over the
    /// structured `os` fact. Missing facts are left unset; an absent OS family
    /// resolves to [`OsFamily::Other`].
    ///
    /// # Errors
    ///
    /// Returns [`HostError::NotScalar`] if a fact that must be a string is a
    /// list or table.
    pub fn from_facts(facts: &RawInput) -> Result<Self, HostError> {
        let family = fact(facts, "osfamily")?
            .or_else(|| nested_fact(facts, "os", "family"))
            .unwrap_or_else(|| "unknown".to_string());

        let distribution_id = match fact(facts, "lsbdistid")? {
            Some(id) => id,
            None => fact(facts, "operatingsystem")?
                .or_else(|| nested_fact(facts, "os", "name"))
                .unwrap_or_else(|| family.clone()),
        };

        let release = fact(facts, "operatingsystemrelease")?;
        let major_release = match fact(facts, "operatingsystemmajrelease")? {
            Some(major) => leading_number(&major),
            None => release.as_deref().and_then(leading_number),
        };

        let hostname = match fact(facts, "fqdn")? {
            Some(name) => Some(name),
            None => fact(facts, "hostname")?,
        };

        Ok(Self {
            hostname,
            os_family: OsFamily::from_fact(&family),
            distribution_id,
            codename: fact(facts, "lsbdistcodename")?,
            kernel_release: fact(facts, "kernelrelease")?,
            release,
            major_release,
        })
    }

    /// Whether the distribution is Ubuntu.
    #[must_use]
    pub fn is_ubuntu(&self) -> bool {
        self.distribution_id.eq_ignore_ascii_case("ubuntu")
    }

    fn is_distribution(&self, name: &str) -> bool {
        self.distribution_id.eq_ignore_ascii_case(name)
    }

    /// Major release strictly below `threshold`; unknown releases count as
    /// below.
    fn major_below(&self, threshold: u32) -> bool {
        self.major_release.is_none_or(|major| major < threshold)
    }

    /// Dispatch defaults for this host's OS family.
    #[must_use]
    pub fn defaults(&self) -> FamilyDefaults {
        match &self.os_family {
            OsFamily::Debian => self.debian_defaults(),
            OsFamily::RedHat => self.redhat_defaults(),
            OsFamily::Archlinux => FamilyDefaults {
                upstream_package: "docker",
                native_package: "docker",
                upstream_repository: None,
                https_transport: None,
                prerequisites: &["libcgroup", "apparmor"],
                config_dir: "/etc/conf.d",
                service_provider: Some(ServiceProvider::Systemd),
                service_hasrestart: None,
                init_script_link: false,
                unsupported: None,
            },
            OsFamily::Other(name) => FamilyDefaults {
                upstream_package: "docker",
                native_package: "docker",
                upstream_repository: None,
                https_transport: None,
                prerequisites: &["cgroupfs-mount", "apparmor"],
                config_dir: "/etc/default",
                service_provider: None,
                service_hasrestart: None,
                init_script_link: false,
                unsupported: Some(UnsupportedHost {
                    family: name.clone(),
                }),
            },
        }
    }

    fn debian_defaults(&self) -> FamilyDefaults {
        let distro = self.distribution_id.to_ascii_lowercase();
        let location = format!("https://get.docker.io/{distro}");
        let upstream_repository = Some(UpstreamRepository::Apt {
            location,
            release: "docker",
            repos: "main",
            key: "A88D21E9",
            key_source: "http://get.docker.io/gpg",
            required_packages: "debian-keyring debian-archive-keyring",
            pin: 10,
            include_src: false,
        });

        if self.is_ubuntu() {
            // Upstart shipped until 15.04; the archive only carries the
            // engine as docker.io from 14.04 onwards.
            let upstart = self.major_below(15);
            FamilyDefaults {
                upstream_package: "lxc-docker",
                native_package: if self.major_below(14) {
                    "lxc-docker"
                } else {
                    "docker.io"
                },
                upstream_repository,
                https_transport: Some("apt-transport-https"),
                prerequisites: &["cgroup-lite", "apparmor"],
                config_dir: "/etc/default",
                service_provider: Some(if upstart {
                    ServiceProvider::Upstart
                } else {
                    ServiceProvider::Systemd
                }),
                service_hasrestart: upstart.then_some(false),
                init_script_link: upstart,
                unsupported: None,
            }
        } else {
            FamilyDefaults {
                upstream_package: "lxc-docker",
                native_package: "docker.io",
                upstream_repository,
                https_transport: Some("apt-transport-https"),
                prerequisites: &["cgroupfs-mount", "apparmor"],
                config_dir: "/etc/default",
                service_provider: None,
                service_hasrestart: None,
                init_script_link: false,
                unsupported: None,
            }
        }
    }

    fn redhat_defaults(&self) -> FamilyDefaults {
        let fedora = self.is_distribution("fedora");
        let amazon = self.is_distribution("amazon");
        let legacy = self.major_below(7) && !amazon;

        let upstream_repository = (legacy && !fedora).then(|| {
            let major = self.major_release.unwrap_or(6);
            UpstreamRepository::Yum {
                name: "epel",
                baseurl: format!("https://dl.fedoraproject.org/pub/epel/{major}/$basearch"),
                gpgkey: format!("https://dl.fedoraproject.org/pub/epel/RPM-GPG-KEY-EPEL-{major}"),
            }
        });

        FamilyDefaults {
            upstream_package: "docker-io",
            native_package: if fedora || legacy { "docker-io" } else { "docker" },
            upstream_repository,
            https_transport: None,
            prerequisites: &["device-mapper", "libcgroup", "policycoreutils"],
            config_dir: "/etc/sysconfig",
            service_provider: (!self.major_below(7)).then_some(ServiceProvider::Systemd),
            service_hasrestart: None,
            init_script_link: false,
            unsupported: None,
        }
    }
}

/// Init system used to supervise the engine service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceProvider {
    /// Ubuntu's legacy event-based init.
    Upstart,
    /// systemd.
    Systemd,
}

impl fmt::Display for ServiceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upstart => write!(f, "upstart"),
            Self::Systemd => write!(f, "systemd"),
        }
    }
}

/// Vendor repository definition for a family's package manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum UpstreamRepository {
    /// An apt source entry.
    Apt {
        /// Repository URL.
        location: String,
        /// Suite name.
        release: &'static str,
        /// Components.
        repos: &'static str,
        /// Signing key id.
        key: &'static str,
        /// Where to fetch the signing key from.
        key_source: &'static str,
        /// Packages the source needs to verify signatures.
        required_packages: &'static str,
        /// Pin priority.
        pin: u16,
        /// Whether `deb-src` lines are added.
        include_src: bool,
    },
    /// A yum repository definition.
    Yum {
        /// Repository id.
        name: &'static str,
        /// Base URL.
        baseurl: String,
        /// Signing key URL.
        gpgkey: String,
    },
}

/// Per-family defaults returned by host dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyDefaults {
    /// Engine package name when the vendor repository is used.
    pub upstream_package: &'static str,
    /// Engine package name from the distribution's own archive.
    pub native_package: &'static str,
    /// Vendor repository, if the family has one.
    pub upstream_repository: Option<UpstreamRepository>,
    /// Package enabling HTTPS repository transport, if the package manager needs one.
    pub https_transport: Option<&'static str>,
    /// Prerequisite packages installed unless overridden.
    pub prerequisites: &'static [&'static str],
    /// Directory holding the service environment file.
    pub config_dir: &'static str,
    /// Explicit init system, or `None` for the platform default.
    pub service_provider: Option<ServiceProvider>,
    /// Whether the init system can restart the service in place.
    pub service_hasrestart: Option<bool>,
    /// Whether `/etc/init.d/<service>` should redirect to upstart.
    pub init_script_link: bool,
    /// Set when the family matched no dispatch branch.
    pub unsupported: Option<UnsupportedHost>,
}
