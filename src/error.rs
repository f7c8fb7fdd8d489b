//! Domain-specific error types for the planning engine.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Library modules return typed errors (e.g., [`ValidationError`],
//! [`GraphError`]) while command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! PlanError
//! ├── Validation(ValidationError) — invalid user parameters
//! ├── Host(HostError)             — malformed host facts
//! └── Graph(GraphError)           — inconsistent resource graph
//! ```
//!
//! [`UnsupportedHost`] is not part of the hierarchy: an unknown OS family is
//! resolved with fallback defaults and reported as a plan warning.

use thiserror::Error;

/// Top-level error type for a single plan compilation.
#[derive(Error, Debug)]
pub enum PlanError {
    /// User parameters were rejected before any intent was produced.
    #[error("Invalid parameters: {0}")]
    Validation(#[from] ValidationError),

    /// Host facts could not be normalised.
    #[error("Invalid host facts: {0}")]
    Host(#[from] HostError),

    /// The resource graph could not be ordered.
    #[error("Resource graph error: {0}")]
    Graph(#[from] GraphError),
}

/// Errors raised while validating user parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `log_level` is not one of the accepted daemon levels.
    #[error("log_level must be one of debug, info, warn, error or fatal (got '{0}')")]
    LogLevel(String),

    /// `selinux_enabled` is not a literal boolean.
    #[error("selinux_enabled must be true or false (got '{0}')")]
    SelinuxEnabled(String),

    /// An enumerated parameter holds a value outside its allowed set.
    #[error("{field} must be one of {allowed} (got '{value}')")]
    InvalidChoice {
        /// Parameter name.
        field: String,
        /// Rejected value.
        value: String,
        /// Human-readable list of accepted values.
        allowed: &'static str,
    },

    /// A boolean parameter holds something other than `true`/`false`.
    #[error("{field} must be true or false (got '{value}')")]
    ExpectedBool {
        /// Parameter name.
        field: String,
        /// Rejected value.
        value: String,
    },

    /// A parameter that must be a string has another shape.
    #[error("{0} must be a string")]
    ExpectedString(String),

    /// A parameter that must be a string or a list of strings has another shape.
    #[error("{0} must be a string or a list of strings")]
    ExpectedStringOrList(String),

    /// A parameter that must be a table has another shape.
    #[error("{0} must be a table")]
    ExpectedTable(String),

    /// A required parameter is absent.
    #[error("{0} is required")]
    MissingField(String),

    /// The parameter name is not recognised.
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),
}

/// Errors raised while normalising host facts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// A fact that must be a scalar was given as a list or table.
    #[error("fact '{0}' must be a scalar value")]
    NotScalar(String),
}

/// Errors raised while assembling or ordering the resource graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The ordering edges contain a cycle.
    #[error("ordering cycle between {0}")]
    Cycle(String),

    /// An edge refers to an intent that was never added.
    #[error("unknown resource {0}")]
    UnknownResource(String),

    /// Two intents share the same identity.
    #[error("duplicate resource {0}")]
    DuplicateResource(String),

    /// One package name is declared with two different desired states.
    #[error("package '{name}' is declared as {first} and {second}")]
    ConflictingPackage {
        /// Package name passed to the package manager.
        name: String,
        /// Identity of the first declaration.
        first: String,
        /// Identity of the conflicting declaration.
        second: String,
    },
}

/// The host's OS family matched no dispatch branch.
///
/// Carried as a warning: resolution continues with fallback defaults.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported OS family '{family}'; using generic defaults")]
pub struct UnsupportedHost {
    /// The OS family reported by the host facts.
    pub family: String,
}
