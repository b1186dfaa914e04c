//! # CLI Configuration
//!
//! Optional YAML file passed with `--config`:
//!
//! ```yaml
//! default_version: "3.2.1"   # schema when --schema-version is absent
//! strict: false              # warnings fail the exit code
//! output: text               # text | json
//! ```
//!
//! Every key is optional. Command-line flags take precedence.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use portcall_core::SchemaVersion;

/// Report rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Settings read from the `--config` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Schema version used when none is given on the command line. Without
    /// one, each event's embedded `version` selects its schema.
    pub default_version: Option<SchemaVersion>,
    /// Treat warnings as failures for the exit code.
    pub strict: bool,
    /// Report format when `--json` is not given.
    pub output: OutputFormat,
}

impl CliConfig {
    /// Loads the file at `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config YAML: {}", path.display()))?;
        tracing::debug!(?config, path = %path.display(), "loaded configuration");
        Ok(config)
    }
}
