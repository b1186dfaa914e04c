//! # Validate Subcommand
//!
//! Checks a file of port-call events for conformance.
//!
//! The input holds either one event object or an array of events; `-` reads
//! standard input. Each element is validated independently, so one bad event
//! does not hide the diagnostics of the others.
//!
//! Exit codes: 0 when every event conforms, 1 when any does not (or, in
//! strict mode, carries a warning), 2 when the input cannot be read or is
//! not JSON.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use serde_json::Value;

use portcall_core::SchemaVersion;
use portcall_schema::{EventValidator, ValidationResult};

use crate::config::{CliConfig, OutputFormat};

/// Arguments for the `portcall validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// JSON file with one event or an array of events (`-` for stdin).
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Validate against this schema version instead of each event's own.
    #[arg(long, value_name = "VERSION")]
    pub schema_version: Option<SchemaVersion>,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Fail on warnings as well as errors.
    #[arg(long)]
    pub strict: bool,
}

/// Outcome for one event of the input.
#[derive(Debug, Clone, Serialize)]
pub struct EventReport {
    /// Position in the input array (0 for a single object).
    pub index: usize,
    /// The event's `id`, when it is a string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub result: ValidationResult,
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs, config: &CliConfig) -> Result<u8> {
    let text = read_input(&args.input)?;
    let document: Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing JSON from {}", display(&args.input)))?;

    let validator = EventValidator::builtin().context("building the built-in type registry")?;
    let version = args.schema_version.or(config.default_version);
    let reports = validate_document(&validator, document, version);

    let strict = args.strict || config.strict;
    let format = if args.json {
        OutputFormat::Json
    } else {
        config.output
    };
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Text => print_text(&reports, strict),
    }

    let failed = reports.iter().filter(|r| !passes(&r.result, strict)).count();
    tracing::info!(events = reports.len(), failed, strict, "validation finished");
    Ok(if failed > 0 { 1 } else { 0 })
}

/// Validates every event of `document`.
pub fn validate_document(
    validator: &EventValidator,
    document: Value,
    version: Option<SchemaVersion>,
) -> Vec<EventReport> {
    let events = match document {
        Value::Array(items) => items,
        single => vec![single],
    };
    events
        .iter()
        .enumerate()
        .map(|(index, event)| EventReport {
            index,
            id: event.get("id").and_then(Value::as_str).map(str::to_string),
            result: match version {
                Some(version) => validator.validate_as(event, version),
                None => validator.validate(event),
            },
        })
        .collect()
}

/// Whether a result counts as passing under the given strictness.
pub fn passes(result: &ValidationResult, strict: bool) -> bool {
    if strict {
        result.is_clean()
    } else {
        result.valid
    }
}

fn print_text(reports: &[EventReport], strict: bool) {
    for report in reports {
        let label = report.id.as_deref().unwrap_or("<no id>");
        let errors = report.result.errors().count();
        let warnings = report.result.warnings().count();
        let status = if passes(&report.result, strict) {
            "PASS"
        } else {
            "FAIL"
        };
        println!("{status}: event[{}] {label} ({errors} error(s), {warnings} warning(s))", report.index);
        for violation in &report.result.violations {
            println!("{violation}");
        }
    }
    let passed = reports.iter().filter(|r| passes(&r.result, strict)).count();
    println!("Events: {passed}/{} passed", reports.len());
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading events from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading events: {}", path.display()))
}

fn display(path: &Path) -> String {
    if path == Path::new("-") {
        "stdin".to_string()
    } else {
        path.display().to_string()
    }
}
