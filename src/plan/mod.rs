//! Resource graph assembly: turns resolved packages, rendered config, and
//! validated parameters into an ordered list of intents.
//!
//! The fixed chain is install → config → service → runtime. Every
//! install-phase intent is ordered before the configuration file, the
//! configuration file notifies the service, and the service precedes any
//! exec. Symlinks sit outside the chain.
pub mod graph;

use serde::Serialize;

use crate::config::{EngineConfig, Ensure, RawInput, params};
use crate::error::{GraphError, PlanError};
use crate::packages::{self, PackageDecision};
use crate::platform::{FamilyDefaults, HostProfile};
use crate::render::{self, RenderedConfig};
use crate::resources::{
    ExecIntent, FileIntent, Intent, PackageIntent, Phase, RepositorySourceIntent,
    ResourceIntent, ResourceRef, ServiceIntent, SymlinkIntent,
};

pub use graph::ResourceGraph;

/// Title shared by the engine package, repository, and service intents.
pub const ENGINE_TITLE: &str = "docker";

/// Ordered intents for one host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    /// The host the plan was compiled for.
    pub host: HostProfile,
    /// Intents in application order.
    pub intents: Vec<ResourceIntent>,
    /// Non-fatal problems found while resolving.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Plan {
    /// Look up an intent by its `Kind[title]` identity.
    #[must_use]
    pub fn find(&self, reference: &str) -> Option<&ResourceIntent> {
        self.intents
            .iter()
            .find(|i| i.reference().to_string() == reference)
    }

    /// Position of an intent in the application order.
    #[must_use]
    pub fn position(&self, reference: &str) -> Option<usize> {
        self.intents
            .iter()
            .position(|i| i.reference().to_string() == reference)
    }
}

/// Path of the service environment file for this family and service name.
#[must_use]
pub fn config_path(defaults: &FamilyDefaults, service_name: &str) -> String {
    format!("{}/{service_name}", defaults.config_dir)
}

/// Validate `params`, normalise `facts`, and build the plan.
///
/// # Errors
///
/// Returns [`PlanError::Validation`] for rejected parameters (before any
/// intent is produced), [`PlanError::Host`] for malformed facts, and
/// [`PlanError::Graph`] if the intents cannot be ordered.
pub fn compile(facts: &RawInput, params: &RawInput) -> Result<Plan, PlanError> {
    let config = params::validate(params)?;
    compile_config(facts, &config)
}

/// Build the plan for one host from already validated parameters.
///
/// # Errors
///
/// Returns [`PlanError::Host`] for malformed facts and [`PlanError::Graph`]
/// if the intents cannot be ordered.
pub fn compile_config(facts: &RawInput, config: &EngineConfig) -> Result<Plan, PlanError> {
    let host = HostProfile::from_facts(facts)?;
    let defaults = host.defaults();
    let decision = packages::resolve_with(&host, &defaults, config);
    let rendered = render::render(config);
    build(host, &defaults, &decision, &rendered, config).map_err(PlanError::from)
}

/// Assemble the intents and their edges, then order them.
///
/// # Errors
///
/// Returns [`GraphError`] if two intents collide or the edges form a cycle.
pub fn build(
    host: HostProfile,
    defaults: &FamilyDefaults,
    decision: &PackageDecision,
    rendered: &RenderedConfig,
    config: &EngineConfig,
) -> Result<Plan, GraphError> {
    let mut graph = ResourceGraph::new();

    let transport = decision
        .https_transport
        .as_deref()
        .map(|name| graph.add(PackageIntent::new(name, name, Ensure::Present)))
        .transpose()?;

    let repository = decision
        .repository
        .clone()
        .map(|repo| graph.add(RepositorySourceIntent::new(ENGINE_TITLE, repo)))
        .transpose()?;
    if let (Some(transport), Some(repository)) = (&transport, &repository) {
        graph.before(transport, repository)?;
    }

    let mut kernel = Vec::with_capacity(decision.kernel_packages.len());
    for name in &decision.kernel_packages {
        kernel.push(graph.add(PackageIntent::new(
            name.as_str(),
            name.as_str(),
            Ensure::Present,
        ))?);
    }

    let engine = decision
        .engine
        .as_ref()
        .map(|spec| graph.add(PackageIntent::new(ENGINE_TITLE, spec.name.as_str(), spec.ensure)))
        .transpose()?;

    let mut prerequisites = Vec::with_capacity(decision.prerequisites.len());
    for spec in &decision.prerequisites {
        prerequisites.push(graph.add(PackageIntent::from_spec(spec))?);
    }

    if let Some(engine) = &engine {
        let upstream = transport.iter().chain(&repository).chain(&kernel);
        for dependency in upstream.chain(&prerequisites) {
            if dependency != engine {
                graph.before(dependency, engine)?;
            }
        }
    }

    let path = config_path(defaults, &config.service_name);
    let file = graph.add(FileIntent::from_rendered(path, rendered))?;
    let install: Vec<ResourceRef> = transport
        .iter()
        .chain(&repository)
        .chain(&kernel)
        .chain(&engine)
        .chain(&prerequisites)
        .cloned()
        .collect();
    for dependency in &install {
        graph.before(dependency, &file)?;
    }

    let service = graph.add(ServiceIntent {
        title: ENGINE_TITLE.to_string(),
        name: config.service_name.clone(),
        ensure: config.service_state,
        enable: config.service_enable,
        provider: defaults.service_provider,
        hasstatus: true,
        hasrestart: defaults.service_hasrestart,
    })?;
    graph.notify(&file, &service)?;

    if defaults.init_script_link {
        graph.add(SymlinkIntent::upstart_init_script(&config.service_name))?;
    }

    for spec in &config.execs {
        let exec = graph.add(ExecIntent::from_spec(spec, &config.docker_command))?;
        graph.before(&service, &exec)?;
    }

    tracing::debug!("ordering {} intents for {}", graph.len(), host.distribution_id);
    let intents = graph.into_ordered()?;
    debug_assert!(phases_are_monotonic(&intents));

    let warnings = defaults
        .unsupported
        .iter()
        .map(ToString::to_string)
        .collect();

    Ok(Plan {
        host,
        intents,
        warnings,
    })
}

/// Whether chain intents appear in non-decreasing phase order.
fn phases_are_monotonic(intents: &[ResourceIntent]) -> bool {
    intents
        .iter()
        .map(|i| i.resource.phase())
        .filter(|p| *p != Phase::Independent)
        .collect::<Vec<_>>()
        .windows(2)
        .all(|w| matches!(w, [a, b] if a <= b))
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::config::RawValue;
    use crate::error::ValidationError;
    use crate::logging::test_helpers::capture;
    use crate::resources::Resource;

    fn input(entries: &[(&str, RawValue)]) -> RawInput {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    fn ubuntu_maverick() -> RawInput {
        input(&[
            ("osfamily", "Debian".into()),
            ("lsbdistid", "Ubuntu".into()),
            ("lsbdistcodename", "maverick".into()),
            ("kernelrelease", "3.8.0-29-generic".into()),
            ("operatingsystemrelease", "10.04".into()),
        ])
    }

    fn debian_wheezy() -> RawInput {
        input(&[
            ("osfamily", "Debian".into()),
            ("lsbdistid", "Debian".into()),
            ("lsbdistcodename", "wheezy".into()),
            ("kernelrelease", "3.12-1-amd64".into()),
            ("operatingsystemrelease", "7.5".into()),
        ])
    }

    fn before(plan: &Plan, earlier: &str, later: &str) -> bool {
        match (plan.position(earlier), plan.position(later)) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        }
    }

    #[test]
    fn default_ubuntu_plan_orders_the_chain() {
        let plan = compile(&ubuntu_maverick(), &RawInput::new()).unwrap();
        assert!(before(&plan, "Package[apt-transport-https]", "RepositorySource[docker]"));
        assert!(before(&plan, "RepositorySource[docker]", "Package[docker]"));
        assert!(before(
            &plan,
            "Package[linux-image-extra-3.8.0-29-generic]",
            "Package[docker]"
        ));
        assert!(before(&plan, "Package[docker]", "File[/etc/default/docker]"));
        assert!(before(&plan, "File[/etc/default/docker]", "Service[docker]"));
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn config_file_notifies_service() {
        let plan = compile(&ubuntu_maverick(), &RawInput::new()).unwrap();
        let file = plan.find("File[/etc/default/docker]").unwrap();
        assert_eq!(file.notifies.len(), 1);
        assert_eq!(file.notifies[0].to_string(), "Service[docker]");
    }

    #[test]
    fn upstart_host_gets_init_link_and_no_restart() {
        let plan = compile(&ubuntu_maverick(), &RawInput::new()).unwrap();
        assert!(plan.find("Symlink[/etc/init.d/docker]").is_some());
        match &plan.find("Service[docker]").unwrap().resource {
            Resource::Service(s) => {
                assert_eq!(s.hasrestart, Some(false));
                assert!(s.hasstatus);
            }
            other => panic!("unexpected resource {other:?}"),
        }
    }

    #[test]
    fn native_source_drops_repository() {
        let params = input(&[("use_upstream_package_source", false.into())]);
        let plan = compile(&ubuntu_maverick(), &params).unwrap();
        assert!(plan.find("RepositorySource[docker]").is_none());
        assert!(plan.find("Package[apt-transport-https]").is_none());
        match &plan.find("Package[docker]").unwrap().resource {
            Resource::Package(p) => assert_eq!(p.name, "lxc-docker"),
            other => panic!("unexpected resource {other:?}"),
        }
    }

    #[test]
    fn unmanaged_package_keeps_prerequisites() {
        let params = input(&[("manage_package", false.into())]);
        let plan = compile(&debian_wheezy(), &params).unwrap();
        assert!(plan.find("Package[docker]").is_none());
        assert!(plan.find("Package[cgroupfs-mount]").is_some());
        assert!(before(&plan, "Package[apparmor]", "File[/etc/default/docker]"));
    }

    #[test]
    fn service_name_moves_config_file() {
        let params = input(&[("service_name", "docker.io".into())]);
        let plan = compile(&debian_wheezy(), &params).unwrap();
        assert!(plan.find("File[/etc/default/docker.io]").is_some());
        assert!(plan.find("Service[docker]").is_some());
    }

    #[test]
    fn execs_run_after_service() {
        let mut exec = std::collections::BTreeMap::new();
        exec.insert("container".to_string(), RawValue::from("web"));
        exec.insert("command".to_string(), RawValue::from("uptime"));
        let mut execs = std::collections::BTreeMap::new();
        execs.insert("uptime".to_string(), RawValue::Table(exec));
        let params = input(&[("exec", RawValue::Table(execs))]);

        let plan = compile(&debian_wheezy(), &params).unwrap();
        assert!(before(&plan, "Service[docker]", "Exec[docker exec web uptime]"));
    }

    #[test]
    fn prerequisite_duplicating_transport_is_merged() {
        let params = input(&[(
            "prerequired_packages",
            vec!["apt-transport-https", "cgroup-lite"].into(),
        )]);
        let plan = compile(&ubuntu_maverick(), &params).unwrap();
        let count = plan
            .intents
            .iter()
            .filter(|i| i.reference().to_string() == "Package[apt-transport-https]")
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn unsupported_family_warns_and_falls_back() {
        let facts = input(&[("osfamily", "Solaris".into())]);
        let plan = compile(&facts, &RawInput::new()).unwrap();
        assert_eq!(plan.warnings.len(), 1);
        assert!(plan.warnings[0].contains("Solaris"));
        assert!(plan.find("Package[docker]").is_some());
    }

    #[test]
    fn unsupported_family_is_reported_only_through_the_plan() {
        let facts = input(&[("osfamily", "Solaris".into())]);
        let out = capture(false, |_| {
            let plan = compile_config(&facts, &EngineConfig::default()).unwrap();
            assert_eq!(plan.warnings.len(), 1);
        });
        assert!(!out.contains("Solaris"), "warning logged during compile: {out}");
    }

    #[test]
    fn prerequisite_titled_like_the_engine_is_rejected() {
        let params = input(&[("prerequired_packages", vec!["docker", "lvm2"].into())]);
        let err = compile(&debian_wheezy(), &params).unwrap_err();
        assert!(matches!(
            err,
            PlanError::Graph(GraphError::DuplicateResource(ref r)) if r == "Package[docker]"
        ));
    }

    #[test]
    fn prerequisite_naming_the_engine_package_is_merged() {
        let params = input(&[
            ("use_upstream_package_source", false.into()),
            ("prerequired_packages", vec!["docker.io", "lvm2"].into()),
        ]);
        let plan = compile(&debian_wheezy(), &params).unwrap();
        assert!(plan.find("Package[docker.io]").is_none());
        match &plan.find("Package[docker]").unwrap().resource {
            Resource::Package(p) => assert_eq!(p.name, "docker.io"),
            other => panic!("unexpected resource {other:?}"),
        }
        assert!(before(&plan, "Package[lvm2]", "Package[docker]"));
    }

    #[test]
    fn prerequisite_conflicting_with_absent_engine_is_rejected() {
        let params = input(&[
            ("use_upstream_package_source", false.into()),
            ("ensure", "absent".into()),
            ("prerequired_packages", vec!["docker.io"].into()),
        ]);
        let err = compile(&debian_wheezy(), &params).unwrap_err();
        assert!(matches!(
            err,
            PlanError::Graph(GraphError::ConflictingPackage { ref name, .. }) if name == "docker.io"
        ));
    }

    #[test]
    fn invalid_parameters_abort_compilation() {
        let params = input(&[("log_level", "verbose".into())]);
        let err = compile(&ubuntu_maverick(), &params).unwrap_err();
        assert!(matches!(
            err,
            PlanError::Validation(ValidationError::LogLevel(_))
        ));
    }

    #[test]
    fn chain_phases_never_go_backwards() {
        let plan = compile(&ubuntu_maverick(), &RawInput::new()).unwrap();
        assert!(phases_are_monotonic(&plan.intents));
    }
}
