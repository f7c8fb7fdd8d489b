//! Command: compile resource plans for one or more hosts.
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use rayon::prelude::*;

use crate::cli::{OutputFormat, PlanOpts};
use crate::config::{EngineConfig, params, toml_loader};
use crate::logging::{Logger, PlanStatus};
use crate::plan::{self, Plan};
use crate::resources::{Intent as _, ResourceRef};

/// Run the plan command and print the result to stdout.
///
/// # Errors
///
/// Returns an error if the parameters file cannot be read or is invalid, or
/// if any host fails to plan.
#[allow(clippy::print_stdout)]
pub fn run(opts: &PlanOpts, log: &Logger) -> Result<()> {
    log.stage("Loading parameters");
    let config = load_config(&opts.params)?;
    log.info(&format!("{} exec definition(s)", config.execs.len()));

    log.stage(&format!("Planning {} host(s)", opts.facts.len()));
    let plans = plan_hosts(&opts.facts, &config, log);

    if !plans.is_empty() {
        println!("{}", format_plans(&plans, opts.format)?);
    }

    log.print_summary();

    if log.failure_count() > 0 {
        anyhow::bail!("{} host(s) failed to plan", log.failure_count());
    }
    Ok(())
}

/// Load and validate the parameters file.
///
/// # Errors
///
/// Returns an error if the file cannot be parsed or a parameter is rejected.
pub fn load_config(path: &Path) -> Result<EngineConfig> {
    let input = toml_loader::load_input(path)?;
    params::validate(&input).with_context(|| format!("validating {}", path.display()))
}

/// Plan every facts file in parallel, recording each outcome on `log`.
///
/// Plans are returned in argument order; failed hosts are logged and left out.
pub fn plan_hosts(facts: &[PathBuf], config: &EngineConfig, log: &Logger) -> Vec<Plan> {
    let outcomes: Vec<(String, Result<Plan>)> = facts
        .par_iter()
        .map(|path| {
            let outcome = toml_loader::load_input(path).and_then(|facts| {
                plan::compile_config(&facts, config)
                    .with_context(|| format!("planning {}", path.display()))
            });
            (path.display().to_string(), outcome)
        })
        .collect();

    let mut plans = Vec::with_capacity(outcomes.len());
    for (label, outcome) in outcomes {
        match outcome {
            Ok(plan) => {
                let name = plan.host.hostname.clone().unwrap_or(label);
                for warning in &plan.warnings {
                    log.warn(&format!("{name}: {warning}"));
                }
                let status = if plan.warnings.is_empty() {
                    PlanStatus::Ok
                } else {
                    PlanStatus::Warned
                };
                let detail = format!("{} intents", plan.intents.len());
                log.debug(&format!("{name}: {detail}"));
                log.record_host(&name, status, Some(&detail));
                plans.push(plan);
            }
            Err(e) => {
                log.error(&format!("{e:#}"));
                log.record_host(&label, PlanStatus::Failed, Some(&e.root_cause().to_string()));
            }
        }
    }
    plans
}

/// Serialize plans: a single JSON object for one host, an array for several,
/// or one line per intent in text mode.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_plans(plans: &[Plan], format: OutputFormat) -> Result<String> {
    match (format, plans) {
        (OutputFormat::Json, [single]) => Ok(serde_json::to_string_pretty(single)?),
        (OutputFormat::Json, _) => Ok(serde_json::to_string_pretty(plans)?),
        (OutputFormat::Text, _) => Ok(plans.iter().map(plan_text).collect::<Vec<_>>().join("\n")),
    }
}

fn join_refs(refs: &[ResourceRef]) -> String {
    refs.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Text rendering of one plan.
fn plan_text(plan: &Plan) -> String {
    let host = &plan.host;
    let mut out = format!("# {} {}", host.os_family, host.distribution_id);
    if let Some(release) = &host.release {
        let _ = write!(out, " {release}");
    }
    if let Some(name) = &host.hostname {
        let _ = write!(out, " ({name})");
    }
    out.push('\n');

    for warning in &plan.warnings {
        let _ = writeln!(out, "# warning: {warning}");
    }
    for intent in &plan.intents {
        let _ = write!(
            out,
            "{}: {}",
            intent.reference(),
            intent.resource.description()
        );
        if !intent.before.is_empty() {
            let _ = write!(out, " -> {}", join_refs(&intent.before));
        }
        if !intent.notifies.is_empty() {
            let _ = write!(out, " ~> {}", join_refs(&intent.notifies));
        }
        out.push('\n');
    }
    out
}
