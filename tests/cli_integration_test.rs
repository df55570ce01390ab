use anyhow::Result;
use std::process::Command;
use tempfile::TempDir;

fn symphony() -> Command {
    Command::new(env!("CARGO_BIN_EXE_symphony"))
}

#[test]
fn test_cli_help() {
    let output = symphony()
        .arg("--help")
        .output()
        .expect("Failed to run binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Synthesizes Symphony deployment templates"));
    assert!(stdout.contains("synth"));
}

#[test]
fn test_cli_version() {
    let output = symphony()
        .arg("--version")
        .output()
        .expect("Failed to run binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("symphony"));
}

#[test]
fn test_synth_writes_one_template_per_stack() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output = symphony()
        .args(["synth", "--environment", "dev", "--force", "--output"])
        .arg(temp_dir.path())
        .output()
        .expect("Failed to run binary");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stateful = temp_dir.path().join("Stateful-dev.template.json");
    let stateless = temp_dir.path().join("Stateless-dev.template.json");
    assert!(stateful.exists());
    assert!(stateless.exists());

    let template: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&stateful)?)?;
    assert_eq!(template["AWSTemplateFormatVersion"], "2010-09-09");
    assert_eq!(
        template["Outputs"]["BucketName"]["Export"]["Name"],
        "BucketName-dev"
    );
    assert_eq!(
        template["Outputs"]["TableName"]["Export"]["Name"],
        "TableName-dev"
    );

    let template: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&stateless)?)?;
    let resources = template["Resources"].as_object().unwrap();
    assert!(resources
        .values()
        .any(|r| r["Type"] == "AWS::ApiGatewayV2::Api"));
    assert!(resources
        .values()
        .any(|r| r["Type"] == "AWS::Lambda::Function"
            && r["Properties"]["Runtime"] == "provided.al2023"));

    Ok(())
}

#[test]
fn test_synth_rejects_unknown_environment() {
    let temp_dir = TempDir::new().unwrap();
    let output = symphony()
        .args(["synth", "--environment", "qa", "--force", "--output"])
        .arg(temp_dir.path())
        .output()
        .expect("Failed to run binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown environment"), "stderr: {stderr}");
    // No partial output on configuration errors
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[test]
fn test_synth_is_deterministic_for_resources() -> Result<()> {
    let first_dir = TempDir::new()?;
    let second_dir = TempDir::new()?;
    for dir in [&first_dir, &second_dir] {
        let output = symphony()
            .args(["synth", "--environment", "prod", "--force", "--output"])
            .arg(dir.path())
            .output()
            .expect("Failed to run binary");
        assert!(output.status.success());
    }

    for name in ["Stateful-prod.template.json", "Stateless-prod.template.json"] {
        let first: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(first_dir.path().join(name))?)?;
        let second: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(second_dir.path().join(name))?)?;
        // Tag metadata carries a timestamp; the declared resources and
        // outputs must match exactly
        assert_eq!(first["Resources"], second["Resources"]);
        assert_eq!(first["Outputs"], second["Outputs"]);
    }
    Ok(())
}
