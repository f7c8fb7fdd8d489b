//! Validation of `exec` definitions: commands run inside a container.
use std::collections::BTreeMap;

use serde::Serialize;

use super::raw::RawValue;
use crate::error::ValidationError;

/// A validated command to run inside a running container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecSpec {
    /// Name of the definition in the parameters file.
    pub name: String,
    /// Target container.
    pub container: String,
    /// Command to run in the container.
    pub command: String,
    /// Run in the background.
    pub detach: bool,
    /// Keep stdin open.
    pub interactive: bool,
    /// Allocate a pseudo-TTY.
    pub tty: bool,
}

const KNOWN_KEYS: &[&str] = &["container", "command", "detach", "interactive", "tty"];

impl ExecSpec {
    /// Validate one named exec definition.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if `container` or `command` is missing
    /// or not a string, a flag is not boolean, or an unknown key is present.
    pub fn from_table(
        name: &str,
        table: &BTreeMap<String, RawValue>,
    ) -> Result<Self, ValidationError> {
        if let Some(unknown) = table.keys().find(|k| !KNOWN_KEYS.contains(&k.as_str())) {
            return Err(ValidationError::UnknownParameter(format!(
                "exec.{name}.{unknown}"
            )));
        }

        let text = |key: &str| -> Result<String, ValidationError> {
            let field = format!("exec.{name}.{key}");
            match table.get(key) {
                None => Err(ValidationError::MissingField(field)),
                Some(value) => match value.as_text() {
                    Some(s) if !s.is_empty() => Ok(s.to_string()),
                    Some(_) => Err(ValidationError::MissingField(field)),
                    None => Err(ValidationError::ExpectedString(field)),
                },
            }
        };
        let flag = |key: &str| -> Result<bool, ValidationError> {
            table.get(key).map_or(Ok(false), |value| {
                value.as_bool().ok_or_else(|| ValidationError::ExpectedBool {
                    field: format!("exec.{name}.{key}"),
                    value: value.to_string(),
                })
            })
        };

        Ok(Self {
            name: name.to_string(),
            container: text("container")?,
            command: text("command")?,
            detach: flag("detach")?,
            interactive: flag("interactive")?,
            tty: flag("tty")?,
        })
    }

    /// Flags passed to `exec`, in a fixed order.
    #[must_use]
    pub fn flags(&self) -> Vec<&'static str> {
        let mut flags = Vec::new();
        if self.detach {
            flags.push("--detach=true");
        }
        if self.interactive {
            flags.push("--interactive=true");
        }
        if self.tty {
            flags.push("--tty=true");
        }
        flags
    }

    /// Full command line, e.g. `docker exec --tty=true web uptime`.
    #[must_use]
    pub fn command_line(&self, docker_command: &str) -> String {
        let mut parts = vec![docker_command, "exec"];
        parts.extend(self.flags());
        parts.push(&self.container);
        parts.push(&self.command);
        parts.join(" ")
    }
}
