use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::{CliTest, DEFINITIONS};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["definitions"], "config_keys.json");
    assert_eq!(parsed["secretsFile"], "~/.flavorgen_secrets.json");
    assert_eq!(parsed["outputPattern"], "app/src/{variant}/res/values/config.xml");
    assert_eq!(parsed["maxAttempts"], 3);

    assert!(
        content.contains("\n  \"definitions\""),
        "Config should use 2-space indentation"
    );
    assert!(content.ends_with("}\n"));

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Created .flavorgenrc.json
    ✓ Created config_keys.json

    ----- stderr -----
    ");

    let content = test.read_file(".flavorgenrc.json")?;
    assert_config_content(&content)?;

    let definitions: Value = serde_json::from_str(&test.read_file("config_keys.json")?)?;
    assert_eq!(definitions["builds"], serde_json::json!(["debug", "release"]));

    Ok(())
}

#[test]
fn test_init_keeps_existing_definitions() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("config_keys.json", DEFINITIONS)?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Created .flavorgenrc.json

    ----- stderr -----
    ");

    assert_eq!(test.read_file("config_keys.json")?, DEFINITIONS);

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".flavorgenrc.json", "{}")?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: false
    exit_code: 2
    ----- stdout -----

    ----- stderr -----
    Error: .flavorgenrc.json already exists
    ");

    assert_eq!(test.read_file(".flavorgenrc.json")?, "{}");
    assert!(!test.root().join("config_keys.json").exists());

    Ok(())
}

#[test]
fn test_init_project_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;

    test.command().arg("init").output()?;

    // no input at all: every value falls back to the starter defaults
    let output = test.run_with_input(test.generate_command(), "")?;
    assert!(
        output.status.success(),
        "generate should work right after init. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert!(
        test.read_file("app/src/main/res/values/config.xml")?
            .contains("<string name=\"api_base_uri\">https://example.com/</string>")
    );
    assert!(
        test.read_file("app/src/debug/res/values/config.xml")?
            .contains("https://stage.example.com/")
    );
    assert!(!test.root().join("app/src/release").exists());

    Ok(())
}
