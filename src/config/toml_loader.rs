//! Facts and parameter file loading (TOML, or JSON by extension).
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

use super::raw::RawInput;

/// Load and deserialize an input file.
///
/// Files ending in `.json` are parsed with `serde_json`; everything else is
/// treated as TOML. A missing file deserializes from an empty document so
/// that callers see all defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if !path.exists() {
        return if is_json {
            serde_json::from_str("{}").context("Failed to create empty config")
        } else {
            toml::from_str("").context("Failed to create empty config")
        };
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;

    if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON input: {}", path.display()))
    } else {
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML input: {}", path.display()))
    }
}

/// Load an unstructured key-value input (facts or parameters).
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_input(path: &Path) -> Result<RawInput> {
    load_config(path)
}
