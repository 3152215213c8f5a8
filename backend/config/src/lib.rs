//! `bunwatch-config`: Bunwatch runtime configuration.
//!
//! Provides:
//! - Typed config schema (Discord session, snapshot source, stream capture, logging)
//! - YAML loading
//! - `${ENV_VAR}` substitution and flat env var overrides
//! - Default value application
//! - Validation
//! - Redaction for safe logging/display
//! - Immutable runtime settings for the components

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod settings;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{
    apply_env_overrides, apply_env_overrides_with, collect_referenced_vars, resolve_env_vars,
    resolve_env_vars_with, MissingEnvVarError,
};
pub use io::{config_dir, config_file_path, load_config, parse_config};
pub use redact::{redact, redact_url};
pub use schema::{BunwatchConfig, StopCondition};
pub use settings::{CaptureConfig, Presentation, SnapshotSettings};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// Load, substitute env vars, and apply overrides and defaults.
///
/// This is the main entry point for loading a config at runtime. Validation
/// is left to the caller, which knows whether a Discord token is required
/// and usually wants logging initialised first.
pub async fn load_and_prepare(path: &Path) -> Result<BunwatchConfig> {
    let raw_config = load_config(path).await?;
    let env: HashMap<String, String> = std::env::vars().collect();
    prepare(raw_config, &env)
}

/// The processing pipeline shared by [`load_and_prepare`] and tests.
pub fn prepare(raw_config: BunwatchConfig, env: &HashMap<String, String>) -> Result<BunwatchConfig> {
    let value = serde_json::to_value(&raw_config)
        .context("Failed to serialize config for processing")?;
    let value = resolve_env_vars_with(&value, env).context("Failed to resolve env vars in config")?;
    let config: BunwatchConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;
    let config = apply_env_overrides_with(config, env);
    Ok(apply_all_defaults(config))
}
