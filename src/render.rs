//! Rendering of the engine service's environment file.
use std::fmt::Write as _;

use sha2::{Digest, Sha256};

use crate::config::EngineConfig;

/// File header written above the rendered settings.
const HEADER: &str = "# Container engine daemon configuration\n\
                      # Managed by engine-plan; local changes will be overwritten.\n";

/// Rendered text of the service configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedConfig {
    /// Full file content.
    pub content: String,
}

impl RenderedConfig {
    /// Hex-encoded SHA-256 of the content.
    #[must_use]
    pub fn checksum(&self) -> String {
        format!("{:x}", Sha256::digest(self.content.as_bytes()))
    }
}

/// Daemon flags in their fixed order.
///
/// Each set field contributes its flag; list fields contribute one flag per
/// element in the order given.
#[must_use]
pub fn daemon_flags(config: &EngineConfig) -> Vec<String> {
    let mut flags = Vec::new();

    for bind in &config.tcp_bind {
        flags.push(format!("-H {bind}"));
    }
    if let Some(socket) = &config.socket_bind {
        flags.push(format!("-H {socket}"));
    }
    if let Some(root) = &config.root_dir {
        flags.push(format!("--data-root {root}"));
    }
    if let Some(level) = config.log_level {
        flags.push(format!("-l {level}"));
    }
    if let Some(selinux) = config.selinux_enabled {
        flags.push(format!("--selinux-enabled={selinux}"));
    }
    if let Some(group) = &config.socket_group {
        flags.push(format!("-G {group}"));
    }
    for server in &config.dns {
        flags.push(format!("--dns {server}"));
    }
    for domain in &config.dns_search {
        flags.push(format!("--dns-search {domain}"));
    }
    if let Some(driver) = config.exec_driver {
        flags.push(format!("-e {driver}"));
    }
    if let Some(driver) = config.storage_driver {
        flags.push(format!("--storage-driver={driver}"));
    }
    flags.extend(config.extra_parameters.iter().cloned());

    flags
}

/// Render the service environment file for `config`.
///
/// Pure and total: identical input always yields byte-identical output.
#[must_use]
pub fn render(config: &EngineConfig) -> RenderedConfig {
    let mut out = String::from(HEADER);
    out.push('\n');

    let _ = writeln!(out, "DOCKER=\"/usr/bin/{}\"", config.docker_command);
    let _ = writeln!(out, "DOCKER_OPTS=\"{}\"", daemon_flags(config).join(" "));

    if let Some(proxy) = &config.proxy {
        let _ = writeln!(out, "export http_proxy='{proxy}'");
        let _ = writeln!(out, "export https_proxy='{proxy}'");
    }
    if let Some(no_proxy) = &config.no_proxy {
        let _ = writeln!(out, "export no_proxy='{no_proxy}'");
    }
    if let Some(tmp) = &config.tmp_dir {
        let _ = writeln!(out, "export TMPDIR=\"{tmp}\"");
    }
    for line in &config.shell_values {
        let _ = writeln!(out, "{line}");
    }

    RenderedConfig { content: out }
}
