#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing,
    clippy::panic
)]
//! Integration tests for plan compilation.
//!
//! These tests compile full plans from TOML/JSON facts and parameters and
//! check the resolved packages, the repository source, the configuration
//! file, the service, and the ordering edges between them.

mod common;

use common::*;
use engine_plan::cli::OutputFormat;
use engine_plan::commands;
use engine_plan::config::{Ensure, ServiceState};
use engine_plan::error::{GraphError, PlanError, ValidationError};
use engine_plan::logging::{Logger, PlanStatus};
use engine_plan::plan::Plan;
use engine_plan::platform::{OsFamily, ServiceProvider, UpstreamRepository};
use engine_plan::resources::{
    FileIntent, PackageIntent, RepositorySourceIntent, Resource, ServiceIntent,
};

fn package<'a>(plan: &'a Plan, title: &str) -> &'a PackageIntent {
    match plan.find(&format!("Package[{title}]")).map(|i| &i.resource) {
        Some(Resource::Package(p)) => p,
        other => panic!("Package[{title}] not found: {other:?}"),
    }
}

fn service(plan: &Plan) -> &ServiceIntent {
    match plan.find("Service[docker]").map(|i| &i.resource) {
        Some(Resource::Service(s)) => s,
        other => panic!("Service[docker] not found: {other:?}"),
    }
}

fn repository(plan: &Plan) -> Option<&RepositorySourceIntent> {
    match plan.find("RepositorySource[docker]").map(|i| &i.resource) {
        Some(Resource::RepositorySource(r)) => Some(r),
        _ => None,
    }
}

fn file<'a>(plan: &'a Plan, path: &str) -> &'a FileIntent {
    match plan.find(&format!("File[{path}]")).map(|i| &i.resource) {
        Some(Resource::File(f)) => f,
        other => panic!("File[{path}] not found: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Ubuntu defaults
// ---------------------------------------------------------------------------

#[test]
fn ubuntu_defaults_use_vendor_repository() {
    let plan = compile(UBUNTU_MAVERICK, "");
    assert_eq!(package(&plan, "docker").name, "lxc-docker");
    assert_eq!(package(&plan, "docker").ensure, Ensure::Present);

    let repo = repository(&plan).expect("repository source");
    match &repo.repository {
        UpstreamRepository::Apt { location, key, .. } => {
            assert_eq!(location, "https://get.docker.io/ubuntu");
            assert_eq!(*key, "A88D21E9");
        }
        other @ UpstreamRepository::Yum { .. } => panic!("unexpected repository {other:?}"),
    }
}

#[test]
fn https_transport_precedes_engine_package() {
    let plan = compile(UBUNTU_MAVERICK, "");
    assert!(ordered(&plan, "Package[apt-transport-https]", "Package[docker]"));
    assert!(ordered(
        &plan,
        "Package[apt-transport-https]",
        "RepositorySource[docker]"
    ));
    assert!(ordered(&plan, "RepositorySource[docker]", "Package[docker]"));
}

#[test]
fn install_precedes_config_precedes_service() {
    let plan = compile(UBUNTU_MAVERICK, "");
    assert!(ordered(&plan, "Package[docker]", "File[/etc/default/docker]"));
    assert!(ordered(&plan, "Package[cgroup-lite]", "File[/etc/default/docker]"));
    assert!(ordered(&plan, "File[/etc/default/docker]", "Service[docker]"));
}

#[test]
fn service_subscribes_to_config_file() {
    let plan = compile(UBUNTU_MAVERICK, "");
    let intent = plan.find("File[/etc/default/docker]").unwrap();
    let notified: Vec<String> = intent.notifies.iter().map(ToString::to_string).collect();
    assert_eq!(notified, vec!["Service[docker]"]);
}

#[test]
fn upstart_service_and_init_link() {
    let plan = compile(UBUNTU_MAVERICK, "");
    let svc = service(&plan);
    assert_eq!(svc.provider, Some(ServiceProvider::Upstart));
    assert_eq!(svc.hasrestart, Some(false));
    assert_eq!(svc.ensure, None);
    assert!(svc.enable);
    match plan.find("Symlink[/etc/init.d/docker]").map(|i| &i.resource) {
        Some(Resource::Symlink(link)) => assert_eq!(link.target, "/lib/init/upstart-job"),
        other => panic!("init link missing: {other:?}"),
    }
}

#[test]
fn version_is_appended_to_package_name() {
    let plan = compile(UBUNTU_MAVERICK, "version = \"0.5.5\"\n");
    assert_eq!(package(&plan, "docker").name, "lxc-docker-0.5.5");
}

#[test]
fn custom_package_name_with_version() {
    let plan = compile(
        UBUNTU_MAVERICK,
        "version = \"0.5.5\"\npackage_name = \"docker-custom-pkg-name\"\n",
    );
    assert_eq!(package(&plan, "docker").name, "docker-custom-pkg-name-0.5.5");
}

#[test]
fn native_source_has_no_repository() {
    let plan = compile(UBUNTU_MAVERICK, "use_upstream_package_source = false\n");
    assert!(repository(&plan).is_none());
    assert!(plan.find("Package[apt-transport-https]").is_none());
    assert_eq!(package(&plan, "docker").name, "lxc-docker");
}

#[test]
fn trusty_native_package_is_docker_io() {
    let facts = UBUNTU_MAVERICK
        .replace("maverick", "trusty")
        .replace("10.04", "14.04");
    let plan = compile(&facts, "use_upstream_package_source = false\n");
    assert_eq!(package(&plan, "docker").name, "docker.io");
}

#[test]
fn package_source_location_overrides_repository() {
    let plan = compile(
        UBUNTU_MAVERICK,
        "package_source_location = \"http://mirror.local/docker\"\n",
    );
    match &repository(&plan).unwrap().repository {
        UpstreamRepository::Apt { location, .. } => {
            assert_eq!(location, "http://mirror.local/docker");
        }
        other @ UpstreamRepository::Yum { .. } => panic!("unexpected repository {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Kernel packages
// ---------------------------------------------------------------------------

#[test]
fn generic_kernel_gets_extra_package_before_engine() {
    let plan = compile(UBUNTU_MAVERICK, "");
    assert!(ordered(
        &plan,
        "Package[linux-image-extra-3.8.0-29-generic]",
        "Package[docker]"
    ));
}

#[test]
fn manage_kernel_false_drops_extra_package() {
    let plan = compile(UBUNTU_MAVERICK, "manage_kernel = false\n");
    assert!(
        plan.find("Package[linux-image-extra-3.8.0-29-generic]")
            .is_none()
    );
}

#[test]
fn precise_gets_backported_kernel() {
    let plan = compile(UBUNTU_PRECISE, "");
    assert!(plan.find("Package[linux-image-generic-lts-trusty]").is_some());
    assert!(plan.find("Package[linux-headers-generic-lts-trusty]").is_some());
    assert!(
        plan.find("Package[linux-image-extra-3.2.0-23-generic]")
            .is_none()
    );
}

#[test]
fn debian_kernel_has_no_extra_package() {
    let plan = compile(DEBIAN_WHEEZY, "");
    assert!(
        !plan
            .intents
            .iter()
            .any(|i| i.reference().to_string().starts_with("Package[linux-"))
    );
}

// ---------------------------------------------------------------------------
// Debian and other families
// ---------------------------------------------------------------------------

#[test]
fn debian_defaults() {
    let plan = compile(DEBIAN_WHEEZY, "");
    assert_eq!(package(&plan, "docker").name, "lxc-docker");
    assert!(plan.find("Package[cgroupfs-mount]").is_some());
    assert!(plan.find("Symlink[/etc/init.d/docker]").is_none());
    assert_eq!(service(&plan).provider, None);
    match &repository(&plan).unwrap().repository {
        UpstreamRepository::Apt { location, .. } => {
            assert_eq!(location, "https://get.docker.io/debian");
        }
        other @ UpstreamRepository::Yum { .. } => panic!("unexpected repository {other:?}"),
    }
}

#[test]
fn debian_native_package_is_docker_io() {
    let plan = compile(DEBIAN_WHEEZY, "use_upstream_package_source = false\n");
    assert_eq!(package(&plan, "docker").name, "docker.io");
}

#[test]
fn centos_from_json_facts() {
    let ctx = IntegrationTestContext::new();
    ctx.write("centos.json", CENTOS_6_JSON);
    let facts = ctx.load("centos.json");
    let plan = engine_plan::plan::compile(&facts, &Default::default()).unwrap();

    assert_eq!(plan.host.os_family, OsFamily::RedHat);
    assert_eq!(package(&plan, "docker").name, "docker-io");
    assert!(plan.find("File[/etc/sysconfig/docker]").is_some());
    assert!(plan.find("Package[apt-transport-https]").is_none());
    match &repository(&plan).unwrap().repository {
        UpstreamRepository::Yum { name, baseurl, .. } => {
            assert_eq!(*name, "epel");
            assert!(baseurl.contains("/epel/6/"));
        }
        other @ UpstreamRepository::Apt { .. } => panic!("unexpected repository {other:?}"),
    }
}

#[test]
fn unsupported_family_falls_back_with_warning() {
    let plan = compile("osfamily = \"Gentoo\"\n", "");
    assert_eq!(plan.warnings.len(), 1);
    assert!(plan.warnings[0].contains("Gentoo"));
    assert_eq!(package(&plan, "docker").name, "docker");
    assert!(plan.find("Package[apparmor]").is_some());
}

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

#[test]
fn service_name_changes_config_path_and_link() {
    let plan = compile(UBUNTU_MAVERICK, "service_name = \"docker.io\"\n");
    assert!(plan.find("File[/etc/default/docker.io]").is_some());
    assert!(plan.find("Symlink[/etc/init.d/docker.io]").is_some());
    assert_eq!(service(&plan).name, "docker.io");
}

#[test]
fn service_state_and_enable() {
    let plan = compile(
        DEBIAN_WHEEZY,
        "service_state = \"stopped\"\nservice_enable = false\n",
    );
    assert_eq!(service(&plan).ensure, Some(ServiceState::Stopped));
    assert!(!service(&plan).enable);
}

#[test]
fn ensure_absent_only_affects_engine_package() {
    let plan = compile(UBUNTU_MAVERICK, "ensure = \"absent\"\n");
    assert_eq!(package(&plan, "docker").ensure, Ensure::Absent);
    assert_eq!(package(&plan, "apparmor").ensure, Ensure::Present);
    assert_eq!(
        package(&plan, "linux-image-extra-3.8.0-29-generic").ensure,
        Ensure::Present
    );
}

#[test]
fn unmanaged_package_keeps_prerequisites() {
    let plan = compile(UBUNTU_MAVERICK, "manage_package = false\n");
    assert!(plan.find("Package[docker]").is_none());
    assert!(plan.find("Package[cgroup-lite]").is_some());
}

#[test]
fn prerequisite_override_replaces_defaults() {
    let plan = compile(DEBIAN_WHEEZY, "prerequired_packages = [\"lvm2\"]\n");
    assert!(plan.find("Package[lvm2]").is_some());
    assert!(plan.find("Package[cgroupfs-mount]").is_none());
    assert!(plan.find("Package[apparmor]").is_none());
}

#[test]
fn prerequisite_named_docker_is_not_dropped() {
    let err = try_compile(DEBIAN_WHEEZY, "prerequired_packages = [\"docker\", \"lvm2\"]\n")
        .unwrap_err();
    assert!(matches!(
        err,
        PlanError::Graph(GraphError::DuplicateResource(_))
    ));
}

#[test]
fn prerequisite_sharing_the_engine_package_name_yields_one_intent() {
    let params = "use_upstream_package_source = false\n\
                  prerequired_packages = [\"docker.io\"]\n";
    let plan = compile(DEBIAN_WHEEZY, params);
    let named: Vec<&PackageIntent> = plan
        .intents
        .iter()
        .filter_map(|i| match &i.resource {
            Resource::Package(p) if p.name == "docker.io" => Some(p),
            _ => None,
        })
        .collect();
    assert_eq!(named.len(), 1);
    assert_eq!(named[0].title, "docker");
}

#[test]
fn prerequisite_contradicting_engine_state_aborts() {
    let params = "use_upstream_package_source = false\n\
                  ensure = \"absent\"\n\
                  prerequired_packages = [\"docker.io\"]\n";
    let err = try_compile(DEBIAN_WHEEZY, params).unwrap_err();
    assert!(matches!(
        err,
        PlanError::Graph(GraphError::ConflictingPackage { .. })
    ));
    assert!(err.to_string().contains("docker.io"));
}

#[test]
fn config_file_content_reflects_parameters() {
    let plan = compile(
        DEBIAN_WHEEZY,
        "dns = [\"8.8.8.8\", \"8.8.4.4\"]\nproxy = \"http://127.0.0.1:3128\"\n",
    );
    let f = file(&plan, "/etc/default/docker");
    assert!(f.content.contains("--dns 8.8.8.8 --dns 8.8.4.4"));
    assert!(f.content.contains("export http_proxy='http://127.0.0.1:3128'"));
    assert_eq!(f.checksum.len(), 64);
}

#[test]
fn execs_follow_the_service() {
    let params = r#"
[exec.uptime]
container = "web"
command = "uptime"
tty = true
"#;
    let plan = compile(DEBIAN_WHEEZY, params);
    assert!(ordered(
        &plan,
        "Service[docker]",
        "Exec[docker exec --tty=true web uptime]"
    ));
}

#[test]
fn invalid_log_level_aborts() {
    let err = try_compile(UBUNTU_MAVERICK, "log_level = \"verbose\"\n").unwrap_err();
    assert!(matches!(
        err,
        PlanError::Validation(ValidationError::LogLevel(_))
    ));
    assert!(
        err.to_string()
            .contains("debug, info, warn, error or fatal")
    );
}

#[test]
fn log_level_list_aborts_with_allowed_set() {
    let err = try_compile(UBUNTU_MAVERICK, "log_level = [\"debug\"]\n").unwrap_err();
    assert!(matches!(
        err,
        PlanError::Validation(ValidationError::LogLevel(_))
    ));
    assert!(err.to_string().contains("debug, info, warn, error or fatal"));
}

#[test]
fn unquoted_version_is_accepted() {
    let plan = compile(UBUNTU_MAVERICK, "version = 1.5\n");
    assert_eq!(package(&plan, "docker").name, "lxc-docker-1.5");
}

#[test]
fn invalid_selinux_enabled_aborts() {
    let err = try_compile(UBUNTU_MAVERICK, "selinux_enabled = \"yes\"\n").unwrap_err();
    assert!(matches!(
        err,
        PlanError::Validation(ValidationError::SelinuxEnabled(_))
    ));
}

#[test]
fn plan_is_deterministic() {
    let a = compile(UBUNTU_MAVERICK, "dns = \"8.8.8.8\"\n");
    let b = compile(UBUNTU_MAVERICK, "dns = \"8.8.8.8\"\n");
    assert_eq!(a, b);
}

// ---------------------------------------------------------------------------
// Command layer: several hosts in parallel
// ---------------------------------------------------------------------------

#[test]
fn hosts_are_reported_in_argument_order() {
    let ctx = IntegrationTestContext::new();
    let paths = vec![
        ctx.write("wheezy.toml", DEBIAN_WHEEZY),
        ctx.write("maverick.toml", UBUNTU_MAVERICK),
        ctx.write("centos.json", CENTOS_6_JSON),
    ];
    let config = commands::plan::load_config(&ctx.root_path().join("missing.toml")).unwrap();
    let log = Logger::new();
    let plans = commands::plan::plan_hosts(&paths, &config, &log);

    let families: Vec<String> = plans.iter().map(|p| p.host.os_family.to_string()).collect();
    assert_eq!(families, vec!["Debian", "Debian", "RedHat"]);
    assert_eq!(plans[1].host.hostname.as_deref(), Some("web01.example.com"));
    assert_eq!(log.failure_count(), 0);
    assert!(
        log.host_entries()
            .iter()
            .all(|h| h.status == PlanStatus::Ok)
    );

    let json: serde_json::Value = serde_json::from_str(
        &commands::plan::format_plans(&plans, OutputFormat::Json).unwrap(),
    )
    .unwrap();
    assert_eq!(json.as_array().map(Vec::len), Some(3));
}
