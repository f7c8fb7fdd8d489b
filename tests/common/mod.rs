// Shared helpers for integration tests.
//
// Provides temporary-directory-backed facts and parameter files plus a few
// canned host fact sets, so each integration test can build its inputs
// without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use engine_plan::config::{RawInput, toml_loader};
use engine_plan::plan::{self, Plan};

/// Ubuntu 10.04 (maverick) on a `-generic` kernel: upstart host that needs
/// the kernel extra package.
pub const UBUNTU_MAVERICK: &str = r#"
osfamily = "Debian"
operatingsystem = "Ubuntu"
lsbdistid = "Ubuntu"
lsbdistcodename = "maverick"
kernelrelease = "3.8.0-29-generic"
operatingsystemrelease = "10.04"
fqdn = "web01.example.com"
"#;

/// Ubuntu 12.04 (precise): gets the backported trusty kernel.
pub const UBUNTU_PRECISE: &str = r#"
osfamily = "Debian"
lsbdistid = "Ubuntu"
lsbdistcodename = "precise"
kernelrelease = "3.2.0-23-generic"
operatingsystemrelease = "12.04"
"#;

/// Debian 7 (wheezy) on a backports kernel.
pub const DEBIAN_WHEEZY: &str = r#"
osfamily = "Debian"
operatingsystem = "Debian"
lsbdistid = "Debian"
lsbdistcodename = "wheezy"
kernelrelease = "3.12-1-amd64"
operatingsystemrelease = "7.5"
"#;

/// CentOS 6, described with the structured `os` fact in JSON.
pub const CENTOS_6_JSON: &str = r#"{
  "os": { "family": "RedHat", "name": "CentOS" },
  "operatingsystemrelease": "6.5",
  "kernelrelease": "2.6.32-431.el6.x86_64"
}"#;

/// An isolated directory of input files backed by a [`tempfile::TempDir`].
pub struct IntegrationTestContext {
    /// Temporary directory holding the input files.
    pub root: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create an empty context.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        Self { root }
    }

    /// Path to the context directory.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Write `content` to `name` inside the context and return its path.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(name);
        std::fs::write(&path, content).expect("write input file");
        path
    }

    /// Load a previously written input file.
    pub fn load(&self, name: &str) -> RawInput {
        toml_loader::load_input(&self.root.path().join(name)).expect("load input file")
    }
}

/// Compile a plan from TOML facts and TOML parameters.
pub fn compile(facts: &str, params: &str) -> Plan {
    try_compile(facts, params).expect("compile plan")
}

/// Compile a plan, returning the error instead of panicking.
pub fn try_compile(facts: &str, params: &str) -> Result<Plan, engine_plan::error::PlanError> {
    let facts: RawInput = toml::from_str(facts).expect("parse facts");
    let params: RawInput = toml::from_str(params).expect("parse params");
    plan::compile(&facts, &params)
}

/// Whether `earlier` is applied strictly before `later`.
pub fn ordered(plan: &Plan, earlier: &str, later: &str) -> bool {
    match (plan.position(earlier), plan.position(later)) {
        (Some(a), Some(b)) => a < b,
        _ => false,
    }
}
