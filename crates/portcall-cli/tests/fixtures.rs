//! Integration test: the `validate` handler accepts every fixture file and
//! reports a mixed batch with the right exit code.

use std::io::Write;
use std::path::PathBuf;

use portcall_cli::config::CliConfig;
use portcall_cli::validate::{run_validate, validate_document, ValidateArgs};
use portcall_schema::EventValidator;
use serde_json::Value;

/// Find the repository root.
fn repo_root() -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.pop(); // crates/
    dir.pop(); // repo root
    dir
}

fn fixtures() -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(repo_root().join("fixtures").join("events"))
        .unwrap()
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    files
}

fn args(input: PathBuf, strict: bool) -> ValidateArgs {
    ValidateArgs {
        input,
        schema_version: None,
        json: true,
        strict,
    }
}

#[test]
fn test_every_fixture_exits_zero_in_strict_mode() {
    for path in fixtures() {
        let code = run_validate(&args(path.clone(), true), &CliConfig::default()).unwrap();
        assert_eq!(code, 0, "{}", path.display());
    }
}

#[test]
fn test_batch_with_one_bad_event() {
    let mut events: Vec<Value> = fixtures()
        .iter()
        .map(|p| serde_json::from_str(&std::fs::read_to_string(p).unwrap()).unwrap())
        .collect();
    let mut broken = events[0].clone();
    broken.as_object_mut().unwrap().remove("ship");
    events.push(broken);
    let batch = Value::Array(events);

    let validator = EventValidator::builtin().unwrap();
    let reports = validate_document(&validator, batch.clone(), None);
    let failing: Vec<usize> = reports
        .iter()
        .filter(|r| !r.result.valid)
        .map(|r| r.index)
        .collect();
    assert_eq!(failing, vec![reports.len() - 1]);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(batch.to_string().as_bytes()).unwrap();
    let code = run_validate(&args(file.path().to_path_buf(), false), &CliConfig::default()).unwrap();
    assert_eq!(code, 1);
}
