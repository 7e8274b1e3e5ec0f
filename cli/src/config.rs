use std::path::Path;

use anyhow::{Context, Result};
use porbeagle_codegen::GeneratorConfig;

/// Config file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "porbeagle.toml";

/// Load the generator configuration. An explicit path must exist; the
/// default file is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<GeneratorConfig> {
    let config = match explicit {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => GeneratorConfig::load_optional(DEFAULT_CONFIG_FILE)
            .with_context(|| format!("Failed to load config file: {}", DEFAULT_CONFIG_FILE))?,
    };
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}
