//! # Schema Subcommand
//!
//! Writes the JSON Schema artifact for a registered schema version, for
//! producers that validate with a generic JSON Schema toolchain.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use portcall_core::SchemaVersion;
use portcall_schema::{compile_artifact, export_json_schema, SchemaError, TypeRegistry};

use crate::config::CliConfig;

/// Arguments for the `portcall schema` subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Schema version to export (default: the latest registered).
    #[arg(long, value_name = "VERSION")]
    pub schema_version: Option<SchemaVersion>,

    /// Write the artifact here instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Compile the artifact before writing it.
    #[arg(long)]
    pub check: bool,
}

/// Execute the schema subcommand.
pub fn run_schema(args: &SchemaArgs, config: &CliConfig) -> Result<u8> {
    let registry = TypeRegistry::builtin().context("building the built-in type registry")?;
    let schema = match args.schema_version.or(config.default_version) {
        Some(version) => registry
            .get(&version)
            .ok_or(SchemaError::UnknownVersion(version))?,
        None => registry.latest().context("no schema is registered")?,
    };

    let artifact = export_json_schema(schema);
    if args.check {
        compile_artifact(&artifact).context("exported artifact does not compile")?;
        tracing::info!(version = %schema.version(), "artifact compiles");
    }

    let rendered = serde_json::to_string_pretty(&artifact)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, format!("{rendered}\n"))
                .with_context(|| format!("writing artifact: {}", path.display()))?;
            println!("Wrote schema {} to {}", schema.version(), path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_checked_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("event.schema.json");
        let args = SchemaArgs {
            schema_version: Some(SchemaVersion::new(3, 2, 1)),
            output: Some(path.clone()),
            check: true,
        };
        assert_eq!(run_schema(&args, &CliConfig::default()).unwrap(), 0);

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["$id"], "https://schemas.portcall.events/event/3.2.1");
        assert!(written["$defs"]["Ship"]["anyOf"].is_array());
    }

    #[test]
    fn test_unknown_version_is_error() {
        let args = SchemaArgs {
            schema_version: Some(SchemaVersion::new(1, 0, 0)),
            output: None,
            check: false,
        };
        let err = run_schema(&args, &CliConfig::default()).unwrap_err();
        assert!(err.to_string().contains("1.0.0"));
    }

    #[test]
    fn test_config_default_version_used() {
        let dir = tempfile::tempdir().unwrap();
        let args = SchemaArgs {
            schema_version: None,
            output: Some(dir.path().join("out.json")),
            check: false,
        };
        let config = CliConfig {
            default_version: Some(SchemaVersion::new(2, 0, 0)),
            ..CliConfig::default()
        };
        assert!(run_schema(&args, &config).is_err());
    }
}
