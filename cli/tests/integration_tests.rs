use std::fs;
use std::path::PathBuf;
use std::process::Output;

/// Helper to create a temp directory that is cleaned up on drop.
struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("service_model_cli_test_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).expect("failed to create temp dir");
        Self { path }
    }

    fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Small OpenAPI document with one anonymous array and one reference.
fn write_petstore(dir: &TempDir) -> PathBuf {
    let json = serde_json::json!({
        "openapi": "3.0.3",
        "info": { "title": "Petstore", "version": "1.0.0" },
        "paths": {},
        "components": {
            "schemas": {
                "Pet": {
                    "type": "object",
                    "required": ["id"],
                    "properties": {
                        "id": { "type": "integer", "format": "int64" },
                        "name": { "type": "string", "maxLength": 64 },
                        "owner": { "$ref": "#/components/schemas/Owner" },
                        "tags": {
                            "type": "array",
                            "items": { "type": "string" }
                        }
                    }
                },
                "Owner": {
                    "type": "object",
                    "properties": {
                        "email": { "type": "string", "format": "email" }
                    }
                }
            }
        }
    });
    let path = dir.join("petstore.json");
    fs::write(&path, serde_json::to_string_pretty(&json).unwrap()).expect("failed to write document");
    path
}

fn run(args: &[&str]) -> Output {
    std::process::Command::new(env!("CARGO_BIN_EXE_service-model"))
        .args(args)
        .output()
        .expect("failed to run service-model")
}

// ---------------------------------------------------------------------------
// build
// ---------------------------------------------------------------------------

#[test]
fn build_prints_json_model_to_stdout() {
    let dir = TempDir::new("build_stdout");
    let input = write_petstore(&dir);

    let out = run(&["build", "--input", input.to_str().unwrap()]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let model: serde_json::Value = serde_json::from_slice(&out.stdout).expect("stdout should be JSON");
    assert_eq!(model["field_descriptions"]["PetId"]["kind"], "long");
    assert_eq!(model["field_descriptions"]["PetTags"]["kind"], "list");
    assert_eq!(model["field_descriptions"]["PetTags"]["element_type"], "PetTag");
    assert_eq!(model["field_descriptions"]["PetTag"]["kind"], "string");
    assert_eq!(model["field_descriptions"]["OwnerEmail"]["format"], "email");
    assert_eq!(
        model["structure_descriptions"]["Pet"]["members"]["owner"]["type_name"],
        "Owner"
    );
    assert_eq!(model["structure_descriptions"]["Pet"]["members"]["id"]["required"], true);
}

#[test]
fn build_writes_yaml_to_output_file() {
    let dir = TempDir::new("build_yaml");
    let input = write_petstore(&dir);
    let output = dir.join("out/model.yaml");

    let out = run(&[
        "build",
        "--input",
        input.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
        "--format",
        "yaml",
    ]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(out.stdout.is_empty());

    let raw = fs::read_to_string(&output).expect("output file should exist");
    let model: serde_yaml::Value = serde_yaml::from_str(&raw).unwrap();
    assert_eq!(
        model["structure_descriptions"]["Owner"]["members"]["email"]["type_name"].as_str(),
        Some("OwnerEmail")
    );
}

#[test]
fn build_applies_config_file() {
    let dir = TempDir::new("build_config");
    let input = write_petstore(&dir);
    let config = dir.join("service-model.yml");
    fs::write(
        &config,
        r#"version: "1.0"
naming:
  plural_suffix: List
model_override:
  patterns:
    PetName: "^[a-z]+$"
exclude: [Owner]
"#,
    )
    .unwrap();

    let out = run(&[
        "build",
        "--input",
        input.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let model: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(model["field_descriptions"]["PetTagsList"]["element_type"], "PetTags");
    assert_eq!(model["field_descriptions"]["PetName"]["pattern"], "^[a-z]+$");
    assert!(model["structure_descriptions"].get("Owner").is_none());
}

#[test]
fn build_fails_on_unsupported_schema() {
    let dir = TempDir::new("build_unsupported");
    let input = dir.join("odd.yaml");
    fs::write(
        &input,
        r#"components:
  schemas:
    Odd:
      type: object
      properties:
        value:
          not: { type: string }
"#,
    )
    .unwrap();

    let out = run(&["build", "--input", input.to_str().unwrap()]);
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("error:"), "stderr: {stderr}");
    assert!(stderr.contains("#/components/schemas/Odd/properties/value"), "stderr: {stderr}");
}

#[test]
fn build_fails_on_missing_input() {
    let dir = TempDir::new("build_missing");
    let out = run(&["build", "--input", dir.join("absent.json").to_str().unwrap()]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Failed to build"));
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_reports_counts_and_stable_fingerprint() {
    let dir = TempDir::new("check_fingerprint");
    let input = write_petstore(&dir);

    let first = run(&["check", "--input", input.to_str().unwrap()]);
    assert!(first.status.success(), "stderr: {}", String::from_utf8_lossy(&first.stderr));
    let first_stdout = String::from_utf8_lossy(&first.stdout).to_string();
    assert!(first_stdout.contains("Checked 2 component(s)"), "stdout: {first_stdout}");

    let second = run(&["check", "--input", input.to_str().unwrap()]);
    assert_eq!(first_stdout, String::from_utf8_lossy(&second.stdout));

    let fingerprint = first_stdout
        .lines()
        .find_map(|line| line.strip_prefix("fingerprint: "))
        .expect("fingerprint line");
    assert_eq!(fingerprint.len(), 64);
    assert!(fingerprint.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn check_rejects_invalid_override_pattern() {
    let dir = TempDir::new("check_pattern");
    let input = write_petstore(&dir);
    let config = dir.join("service-model.yml");
    fs::write(&config, "model_override:\n  patterns:\n    PetName: \"[unclosed\"\n").unwrap();

    let out = run(&[
        "check",
        "--input",
        input.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("validation error"), "stderr: {stderr}");
    assert!(stderr.contains("PetName"), "stderr: {stderr}");
}

#[test]
fn verbose_flag_logs_to_stderr_only() {
    let dir = TempDir::new("verbose");
    let input = write_petstore(&dir);

    let out = std::process::Command::new(env!("CARGO_BIN_EXE_service-model"))
        .args(["--verbose", "build", "--input", input.to_str().unwrap()])
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run service-model");
    assert!(out.status.success());
    assert!(serde_json::from_slice::<serde_json::Value>(&out.stdout).is_ok());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Model built"));
}
