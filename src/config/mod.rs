//! Parameter loading, validation, and the canonical [`EngineConfig`].
pub mod exec;
pub mod params;
pub mod raw;
pub mod toml_loader;

use std::fmt;

use serde::Serialize;

pub use exec::ExecSpec;
pub use raw::{RawInput, RawValue};

/// Default daemon socket the engine listens on.
pub const DEFAULT_SOCKET_BIND: &str = "unix:///var/run/docker.sock";

/// Canonical, validated engine configuration.
///
/// Built once per invocation by [`params::validate`] and treated as read-only
/// by every resolver; nothing downstream re-validates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineConfig {
    /// Pinned engine version appended to the package name.
    pub version: Option<String>,
    /// Explicit engine package name; `None` means the host family default.
    pub package_name: Option<String>,
    /// Whether the engine package itself is managed.
    pub manage_package: bool,
    /// Whether the vendor repository should be configured.
    pub use_upstream_source: bool,
    /// Override for the vendor repository location.
    pub package_source_location: Option<String>,
    /// Execution driver passed with `-e`.
    pub exec_driver: Option<ExecDriver>,
    /// Storage driver passed with `--storage-driver`.
    pub storage_driver: Option<StorageDriver>,
    /// HTTP(S) proxy exported to the daemon environment.
    pub proxy: Option<String>,
    /// Proxy exclusion list exported to the daemon environment.
    pub no_proxy: Option<String>,
    /// DNS servers, in the order given.
    pub dns: Vec<String>,
    /// DNS search domains, in the order given.
    pub dns_search: Vec<String>,
    /// Extra daemon flags appended verbatim.
    pub extra_parameters: Vec<String>,
    /// Extra shell lines appended verbatim to the config file.
    pub shell_values: Vec<String>,
    /// Group owning the daemon socket.
    pub socket_group: Option<String>,
    /// Unix socket the daemon binds.
    pub socket_bind: Option<String>,
    /// TCP addresses the daemon binds.
    pub tcp_bind: Vec<String>,
    /// Name of the supervised service.
    pub service_name: String,
    /// Desired run state; `None` leaves the service state unmanaged.
    pub service_state: Option<ServiceState>,
    /// Whether the service starts at boot.
    pub service_enable: bool,
    /// Daemon log level.
    pub log_level: Option<LogLevel>,
    /// Whether the daemon enables SELinux support.
    pub selinux_enabled: Option<bool>,
    /// Daemon data root.
    pub root_dir: Option<String>,
    /// Temporary directory exported as `TMPDIR`.
    pub tmp_dir: Option<String>,
    /// Full replacement for the host's default prerequisite packages.
    pub prerequired_packages: Option<Vec<String>>,
    /// Whether kernel extra packages are managed.
    pub manage_kernel: bool,
    /// Desired state of the engine package.
    pub ensure: Ensure,
    /// Engine client binary name.
    pub docker_command: String,
    /// Commands to run inside containers once the service is up.
    pub execs: Vec<ExecSpec>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: None,
            package_name: None,
            manage_package: true,
            use_upstream_source: true,
            package_source_location: None,
            exec_driver: None,
            storage_driver: None,
            proxy: None,
            no_proxy: None,
            dns: Vec::new(),
            dns_search: Vec::new(),
            extra_parameters: Vec::new(),
            shell_values: Vec::new(),
            socket_group: None,
            socket_bind: Some(DEFAULT_SOCKET_BIND.to_string()),
            tcp_bind: Vec::new(),
            service_name: "docker".to_string(),
            service_state: None,
            service_enable: true,
            log_level: None,
            selinux_enabled: None,
            root_dir: None,
            tmp_dir: None,
            prerequired_packages: None,
            manage_kernel: true,
            ensure: Ensure::Present,
            docker_command: "docker".to_string(),
            execs: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Final engine package identifier.
    ///
    /// Uses the configured package name (or `default_name`) and appends
    /// `-<version>` when a version is pinned.
    #[must_use]
    pub fn package_identifier(&self, default_name: &str) -> String {
        let name = self.package_name.as_deref().unwrap_or(default_name);
        match self.version.as_deref() {
            Some(version) if !version.is_empty() => format!("{name}-{version}"),
            _ => name.to_string(),
        }
    }
}

/// Declare a closed set of lowercase string values with parsing and display.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $allowed:literal { $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Human-readable list of accepted values.
            pub const ALLOWED: &'static str = $allowed;

            /// Parse an exact lowercase value.
            #[must_use]
            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $($text => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// The canonical string form.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum! {
    /// Daemon log verbosity.
    LogLevel, "debug, info, warn, error or fatal" {
        /// `debug`
        Debug => "debug",
        /// `info`
        Info => "info",
        /// `warn`
        Warn => "warn",
        /// `error`
        Error => "error",
        /// `fatal`
        Fatal => "fatal",
    }
}

string_enum! {
    /// Desired presence of the engine package.
    Ensure, "present or absent" {
        /// Installed.
        Present => "present",
        /// Removed.
        Absent => "absent",
    }
}

string_enum! {
    /// Desired run state of the engine service.
    ServiceState, "running or stopped" {
        /// Started.
        Running => "running",
        /// Stopped.
        Stopped => "stopped",
    }
}

string_enum! {
    /// Container execution driver.
    ExecDriver, "native or lxc" {
        /// Built-in libcontainer driver.
        Native => "native",
        /// LXC driver.
        Lxc => "lxc",
    }
}

string_enum! {
    /// Image and container storage driver.
    StorageDriver, "aufs, devicemapper, btrfs, overlay, overlay2, vfs or zfs" {
        /// `aufs`
        Aufs => "aufs",
        /// `devicemapper`
        Devicemapper => "devicemapper",
        /// `btrfs`
        Btrfs => "btrfs",
        /// `overlay`
        Overlay => "overlay",
        /// `overlay2`
        Overlay2 => "overlay2",
        /// `vfs`
        Vfs => "vfs",
        /// `zfs`
        Zfs => "zfs",
    }
}
