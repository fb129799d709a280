//! Configuration loading for the CLI.
//!
//! Settings are taken from, in increasing precedence:
//! 1. Default values
//! 2. A YAML configuration file
//! 3. Environment variables (`ICM_GATES`, `ICM_INVERSE`, `ICM_ANCILLA_PREFIX`)
//! 4. Command-line flags

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use icm_compile::IcmConfig;

/// Load configuration from an optional YAML file and the environment.
pub fn load(path: Option<&str>) -> Result<IcmConfig> {
    let config = match path {
        Some(path) => from_file(path)?,
        None => IcmConfig::default(),
    };
    Ok(merge_env(config, |key| std::env::var(key).ok()))
}

/// Load configuration from a YAML file.
pub fn from_file(path: impl AsRef<Path>) -> Result<IcmConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_yaml_ng::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Apply environment overrides read through `lookup`.
pub fn merge_env(mut config: IcmConfig, lookup: impl Fn(&str) -> Option<String>) -> IcmConfig {
    if let Some(gates) = lookup("ICM_GATES") {
        config.gates = split_list(&gates);
    }
    if let Some(inverse) = lookup("ICM_INVERSE") {
        if let Some(val) = parse_bool(&inverse) {
            config.inverse = val;
        }
    }
    if let Some(prefix) = lookup("ICM_ANCILLA_PREFIX") {
        config.ancilla_prefix = prefix;
    }
    config
}

/// Split a comma-separated list, dropping empty entries.
pub fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_ascii_lowercase)
        .collect()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
