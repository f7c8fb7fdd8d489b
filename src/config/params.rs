//! Parameter validation: loosely-typed user input to [`EngineConfig`].
//!
//! This is the only place user parameters are checked. Every enumerated
//! value is parsed into its closed type here, and every scalar-or-list field
//! is coerced into an ordered `Vec<String>`, so resolvers downstream never
//! branch on input shape.
use super::exec::ExecSpec;
use super::raw::{RawInput, RawValue};
use super::{EngineConfig, Ensure, ExecDriver, LogLevel, ServiceState, StorageDriver};
use crate::error::ValidationError;

/// Every parameter name accepted in a parameters file.
pub const KNOWN_PARAMETERS: &[&str] = &[
    "version",
    "ensure",
    "package_name",
    "manage_package",
    "use_upstream_package_source",
    "package_source_location",
    "execdriver",
    "storage_driver",
    "proxy",
    "no_proxy",
    "dns",
    "dns_search",
    "extra_parameters",
    "shell_values",
    "socket_group",
    "socket_bind",
    "tcp_bind",
    "service_name",
    "service_state",
    "service_enable",
    "log_level",
    "selinux_enabled",
    "root_dir",
    "tmp_dir",
    "prerequired_packages",
    "manage_kernel",
    "docker_command",
    "exec",
];

/// Typed accessors over a raw parameter map.
struct Params<'a> {
    input: &'a RawInput,
}

impl<'a> Params<'a> {
    /// Optional string; an empty string counts as unset.
    fn string(&self, key: &str) -> Result<Option<String>, ValidationError> {
        match self.input.get(key) {
            None => Ok(None),
            Some(RawValue::Text(s)) if s.is_empty() => Ok(None),
            Some(RawValue::Text(s)) => Ok(Some(s.clone())),
            Some(_) => Err(ValidationError::ExpectedString(key.to_string())),
        }
    }

    /// Optional string in its raw form, before enumeration checks.
    ///
    /// Booleans and numbers are rendered so that the enumeration error can
    /// quote what the user wrote.
    /// Optional scalar rendered as text, so `version = 1.5` reads as `"1.5"`.
    fn scalar_text(&self, key: &str) -> Result<Option<String>, ValidationError> {
        match self.input.get(key).map(RawValue::scalar) {
            None => Ok(None),
            Some(Some(s)) if s.is_empty() => Ok(None),
            Some(Some(s)) => Ok(Some(s)),
            Some(None) => Err(ValidationError::ExpectedString(key.to_string())),
        }
    }

    fn choice_text(&self, key: &str) -> Result<Option<String>, ValidationError> {
        match self.input.get(key) {
            None => Ok(None),
            Some(value) => match value.scalar() {
                Some(s) if s.is_empty() => Ok(None),
                Some(s) => Ok(Some(s)),
                None => Err(ValidationError::ExpectedString(key.to_string())),
            },
        }
    }

    fn choice<T>(
        &self,
        key: &str,
        allowed: &'static str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Option<T>, ValidationError> {
        self.choice_text(key)?
            .map(|value| {
                parse(&value).ok_or_else(|| ValidationError::InvalidChoice {
                    field: key.to_string(),
                    value,
                    allowed,
                })
            })
            .transpose()
    }

    fn bool_or(&self, key: &str, default: bool) -> Result<bool, ValidationError> {
        self.input.get(key).map_or(Ok(default), |value| {
            value.as_bool().ok_or_else(|| ValidationError::ExpectedBool {
                field: key.to_string(),
                value: value.to_string(),
            })
        })
    }

    fn list(&self, key: &str) -> Result<Option<Vec<String>>, ValidationError> {
        self.input
            .get(key)
            .map(|value| {
                value
                    .to_string_list()
                    .ok_or_else(|| ValidationError::ExpectedStringOrList(key.to_string()))
            })
            .transpose()
    }

    fn list_or_empty(&self, key: &str) -> Result<Vec<String>, ValidationError> {
        Ok(self.list(key)?.unwrap_or_default())
    }

    fn execs(&self) -> Result<Vec<ExecSpec>, ValidationError> {
        let Some(value) = self.input.get("exec") else {
            return Ok(Vec::new());
        };
        let table = value
            .as_table()
            .ok_or_else(|| ValidationError::ExpectedTable("exec".to_string()))?;
        table
            .iter()
            .map(|(name, entry)| {
                let entry = entry
                    .as_table()
                    .ok_or_else(|| ValidationError::ExpectedTable(format!("exec.{name}")))?;
                ExecSpec::from_table(name, entry)
            })
            .collect()
    }

    const fn raw(&self) -> &'a RawInput {
        self.input
    }
}

/// Validate raw user parameters into an [`EngineConfig`].
///
/// Unset parameters take the documented defaults. The first invalid value
/// aborts validation; no partial configuration is returned.
///
/// # Errors
///
/// Returns a [`ValidationError`] naming the offending parameter if a key is
/// unknown, a value has the wrong shape, or an enumerated value is outside
/// its allowed set.
///
/// # Examples
///
/// ```
/// use engine_plan::config::{RawInput, RawValue, params};
///
/// let mut input = RawInput::new();
/// input.insert("dns".to_string(), RawValue::from("8.8.8.8"));
/// let config = params::validate(&input).unwrap();
/// assert_eq!(config.dns, vec!["8.8.8.8".to_string()]);
/// ```
pub fn validate(input: &RawInput) -> Result<EngineConfig, ValidationError> {
    if let Some(unknown) = input
        .keys()
        .find(|k| !KNOWN_PARAMETERS.contains(&k.as_str()))
    {
        return Err(ValidationError::UnknownParameter(unknown.clone()));
    }

    let p = Params { input };
    let defaults = EngineConfig::default();

    let log_level = match p.raw().get("log_level") {
        None => None,
        Some(RawValue::Text(s)) if s.is_empty() => None,
        Some(value) => Some(
            value
                .scalar()
                .as_deref()
                .and_then(LogLevel::parse)
                .ok_or_else(|| ValidationError::LogLevel(value.to_string()))?,
        ),
    };

    let selinux_enabled = match p.raw().get("selinux_enabled") {
        None => None,
        Some(RawValue::Text(s)) if s.is_empty() => None,
        Some(value) => Some(
            value
                .as_bool()
                .ok_or_else(|| ValidationError::SelinuxEnabled(value.to_string()))?,
        ),
    };

    let config = EngineConfig {
        version: p.scalar_text("version")?,
        package_name: p.string("package_name")?,
        manage_package: p.bool_or("manage_package", defaults.manage_package)?,
        use_upstream_source: p
            .bool_or("use_upstream_package_source", defaults.use_upstream_source)?,
        package_source_location: p.string("package_source_location")?,
        exec_driver: p.choice("execdriver", ExecDriver::ALLOWED, ExecDriver::parse)?,
        storage_driver: p.choice("storage_driver", StorageDriver::ALLOWED, StorageDriver::parse)?,
        proxy: p.string("proxy")?,
        no_proxy: p.string("no_proxy")?,
        dns: p.list_or_empty("dns")?,
        dns_search: p.list_or_empty("dns_search")?,
        extra_parameters: p.list_or_empty("extra_parameters")?,
        shell_values: p.list_or_empty("shell_values")?,
        socket_group: p.string("socket_group")?,
        socket_bind: match p.raw().get("socket_bind") {
            None => defaults.socket_bind,
            Some(_) => p.string("socket_bind")?,
        },
        tcp_bind: p.list_or_empty("tcp_bind")?,
        service_name: p.string("service_name")?.unwrap_or(defaults.service_name),
        service_state: p.choice("service_state", ServiceState::ALLOWED, ServiceState::parse)?,
        service_enable: p.bool_or("service_enable", defaults.service_enable)?,
        log_level,
        selinux_enabled,
        root_dir: p.string("root_dir")?,
        tmp_dir: p.string("tmp_dir")?,
        prerequired_packages: p.list("prerequired_packages")?,
        manage_kernel: p.bool_or("manage_kernel", defaults.manage_kernel)?,
        ensure: p
            .choice("ensure", Ensure::ALLOWED, Ensure::parse)?
            .unwrap_or(defaults.ensure),
        docker_command: p
            .string("docker_command")?
            .unwrap_or(defaults.docker_command),
        execs: p.execs()?,
    };

    tracing::debug!(
        "validated {} parameter(s); package managed: {}, upstream source: {}",
        input.len(),
        config.manage_package,
        config.use_upstream_source
    );
    Ok(config)
}
