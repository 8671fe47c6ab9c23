use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use crate::{CliTest, SMALL_DEFINITIONS, answers};

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_generate_writes_compacted_variants() -> Result<()> {
    let test = CliTest::with_project()?;

    let output = test.run_with_input(test.generate_command(), &answers("key-debug", "key-release"))?;
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    assert_eq!(
        test.read_file("app/src/main/res/values/config.xml")?,
        "<?xml version='1.0' encoding='utf-8'?>\n\
         <resources>\n  \
         <string name=\"asset_statements\">https://%%portal_host%%/assetlinks.json</string>\n  \
         <bool name=\"crash_reporting\">false</bool>\n\
         </resources>\n"
    );
    assert_eq!(
        test.read_file("app/src/debug/res/values/config.xml")?,
        "<?xml version='1.0' encoding='utf-8'?>\n\
         <resources>\n  \
         <string name=\"api_base_uri\">https://stage.example.com/</string>\n\
         </resources>\n"
    );
    assert_eq!(
        test.read_file("app/src/acme/res/values/config.xml")?,
        "<?xml version='1.0' encoding='utf-8'?>\n\
         <resources>\n  \
         <string name=\"portal_host\">acme.example</string>\n  \
         <string name=\"asset_statements\">https://acme.example/assetlinks.json</string>\n\
         </resources>\n"
    );
    assert_eq!(
        test.read_file("app/src/acmeDebug/res/values/config.xml")?,
        "<?xml version='1.0' encoding='utf-8'?>\n\
         <resources>\n  \
         <string name=\"api_key\">key-debug</string>\n  \
         <string name=\"portal_host\">acme.stage.example</string>\n\
         </resources>\n"
    );
    assert_eq!(
        test.read_file("app/src/acmeRelease/res/values/config.xml")?,
        "<?xml version='1.0' encoding='utf-8'?>\n\
         <resources>\n  \
         <string name=\"api_key\">key-release</string>\n\
         </resources>\n"
    );

    let out = stdout(&output);
    assert!(out.contains("Written app/src/acmeDebug/res/values/config.xml."));
    assert!(out.contains("Generated 6 resource files"));
    assert!(out.contains("api_key >> acmeDebug (required): "));
    assert!(out.contains("portal_host >> acme [acme.example]: "));
    // capped keys are never asked below their level
    assert!(!out.contains("portal_host >> acmeDebug"));
    assert!(!out.contains("crash_reporting >> debug"));

    // the unresolved placeholder at main is reported, not fatal
    let err = stderr(&output);
    assert!(err.contains("%%portal_host%%"), "stderr: {}", err);
    assert!(err.contains("1 problems (0 errors, 1 warning)"), "stderr: {}", err);

    Ok(())
}

#[test]
fn test_generate_caches_required_values() -> Result<()> {
    let test = CliTest::with_project()?;

    let first = test.run_with_input(test.generate_command(), &answers("key-debug", "key-release"))?;
    assert_eq!(first.status.code(), Some(0), "stderr: {}", stderr(&first));

    let secrets: Value = serde_json::from_str(&test.read_file("secrets.json")?)?;
    assert_eq!(
        secrets,
        json!({
            "acmeDebug": { "api_key": "key-debug" },
            "acmeRelease": { "api_key": "key-release" }
        })
    );

    // a fresh run with no input at all falls back to the cache
    std::fs::remove_dir_all(test.root().join("app"))?;
    let second = test.run_with_input(test.generate_command(), "")?;
    assert_eq!(second.status.code(), Some(0), "stderr: {}", stderr(&second));
    assert!(stdout(&second).contains("api_key >> acmeDebug [key-debug]: "));
    assert!(
        test.read_file("app/src/acmeRelease/res/values/config.xml")?
            .contains("<string name=\"api_key\">key-release</string>")
    );

    Ok(())
}

#[test]
fn test_generate_updates_cached_value() -> Result<()> {
    let test = CliTest::with_project()?;
    test.write_file(
        "secrets.json",
        r#"{ "acmeDebug": { "api_key": "old" }, "acmeRelease": { "api_key": "kept" } }"#,
    )?;

    let output = test.run_with_input(test.generate_command(), &answers("new", ""))?;
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let secrets: Value = serde_json::from_str(&test.read_file("secrets.json")?)?;
    assert_eq!(secrets["acmeDebug"]["api_key"], "new");
    assert_eq!(secrets["acmeRelease"]["api_key"], "kept");

    Ok(())
}

#[test]
fn test_generate_snapshot() -> Result<()> {
    let test = CliTest::with_definitions(SMALL_DEFINITIONS)?;

    let mut cmd = test.generate_command();
    test.snapshot_settings().bind(|| {
        assert_cmd_snapshot!(cmd.pass_stdin("\n\n\nsecret\n\n"), @r"
        success: true
        exit_code: 0
        ----- stdout -----
        Enter configuration values. Values in [] are defaults.
        Entries marked with (required) have to be non-empty.
        Entering no value when there's no default and no (required) marking skips overriding the value at the displayed level.

        api_key >> main: api_key >> debug: api_key >> acme: api_key >> acmeDebug (required): theme_color >> main [#ff0000]: Written app/src/main/res/values/config.xml.
        Written app/src/acmeDebug/res/values/config.xml.
        ✓ Generated 2 resource files

        ----- stderr -----
        ");
    });

    let content = test.read_file("app/src/acmeDebug/res/values/config.xml")?;
    insta::assert_snapshot!(content, @r#"
    <?xml version='1.0' encoding='utf-8'?>
    <resources>
      <string name="api_key">secret</string>
    </resources>
    "#);

    Ok(())
}

#[test]
fn test_generate_fails_without_required_value() -> Result<()> {
    let test = CliTest::with_definitions(SMALL_DEFINITIONS)?;

    let mut cmd = test.generate_command();
    test.snapshot_settings().bind(|| {
        assert_cmd_snapshot!(cmd.pass_stdin(""), @r"
        success: false
        exit_code: 2
        ----- stdout -----
        Enter configuration values. Values in [] are defaults.
        Entries marked with (required) have to be non-empty.
        Entering no value when there's no default and no (required) marking skips overriding the value at the displayed level.

        api_key >> main:
        api_key >> debug:
        api_key >> acme:
        api_key >> acmeDebug (required):

        ----- stderr -----
        Error: a value for 'api_key' in 'acmeDebug' is required but none was provided
        ");
    });

    assert!(!test.root().join("app").exists());
    assert!(!test.root().join("secrets.json").exists());

    Ok(())
}

#[test]
fn test_generate_requires_home_for_default_secrets_file() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".flavorgenrc.json", r#"{ "definitions": "config_keys.json" }"#)?;
    test.write_file("config_keys.json", SMALL_DEFINITIONS)?;

    let mut cmd = test.generate_command();
    cmd.env_remove("HOME");
    test.snapshot_settings().bind(|| {
        assert_cmd_snapshot!(cmd, @r#"
        success: false
        exit_code: 2
        ----- stdout -----

        ----- stderr -----
        Error: Failed to resolve 'secretsFile' path: Cannot expand "~/.flavorgen_secrets.json": HOME is not set
        "#);
    });

    // the cache must never land inside the project
    assert!(!test.root().join("~").exists());
    assert!(!test.root().join("app").exists());

    Ok(())
}

#[test]
fn test_generate_retries_empty_required_answers() -> Result<()> {
    let test = CliTest::with_project()?;
    test.write_file(
        ".flavorgenrc.json",
        r#"{ "secretsFile": "secrets.json", "maxAttempts": 2 }"#,
    )?;

    // first required answer is empty, the retry supplies it
    let input = "\n".repeat(8) + "key-debug\nkey-release\n" + &"\n".repeat(5);
    let output = test.run_with_input(test.generate_command(), &input)?;

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("You must provide a value for api_key in acmeDebug!"));
    let secrets: Value = serde_json::from_str(&test.read_file("secrets.json")?)?;
    assert_eq!(secrets["acmeDebug"]["api_key"], "key-debug");
    assert_eq!(secrets["acmeRelease"]["api_key"], "key-release");

    Ok(())
}

#[test]
fn test_generate_corrupt_cache_is_ignored() -> Result<()> {
    let test = CliTest::with_project()?;
    test.write_file("secrets.json", "{ broken")?;

    let output = test.run_with_input(test.generate_command(), &answers("a", "b"))?;

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("secret cache"));
    let secrets: Value = serde_json::from_str(&test.read_file("secrets.json")?)?;
    assert_eq!(secrets["acmeDebug"]["api_key"], "a");

    Ok(())
}

#[test]
fn test_generate_dry_run_writes_nothing() -> Result<()> {
    let test = CliTest::with_project()?;

    let mut cmd = test.generate_command();
    cmd.arg("--dry-run");
    let output = test.run_with_input(cmd, &answers("key-debug", "key-release"))?;

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("==> app/src/acmeDebug/res/values/config.xml"));
    assert!(out.contains("<string name=\"api_key\">key-debug</string>"));
    assert!(out.contains("Rendered 6 resource files"));
    assert!(!test.root().join("app").exists());
    assert!(!test.root().join("secrets.json").exists());

    Ok(())
}

#[test]
fn test_generate_output_pattern_override() -> Result<()> {
    let test = CliTest::with_project()?;

    let mut cmd = test.generate_command();
    cmd.args(["--output-pattern", "out/{variant}.xml"]);
    let output = test.run_with_input(cmd, &answers("a", "b"))?;

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(test.root().join("out/acmeDebug.xml").exists());
    assert!(test.root().join("out/main.xml").exists());

    Ok(())
}

#[test]
fn test_generate_rejects_pattern_without_variant() -> Result<()> {
    let test = CliTest::with_project()?;

    let mut cmd = test.generate_command();
    cmd.args(["--output-pattern", "out/config.xml"]);
    let output = test.run_with_input(cmd, "")?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("outputPattern"));

    Ok(())
}

#[test]
fn test_generate_missing_definitions() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".flavorgenrc.json", "{}")?;

    let mut cmd = test.generate_command();
    test.snapshot_settings().bind(|| {
        assert_cmd_snapshot!(cmd.pass_stdin(""), @r"
        success: false
        exit_code: 2
        ----- stdout -----

        ----- stderr -----
        Error: Failed to read definitions: [ROOT]/config_keys.json: No such file or directory (os error 2)
        ");
    });

    Ok(())
}

#[test]
fn test_generate_invalid_definitions() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "config_keys.json",
        r#"{ "keys": [ { "name": "flag", "type": "boolean" } ] }"#,
    )?;

    let output = test.run_with_input(test.generate_command(), "")?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("invalid definitions"));

    Ok(())
}

#[test]
fn test_generate_secrets_file_from_env() -> Result<()> {
    let test = CliTest::with_project()?;

    let mut cmd = test.generate_command();
    cmd.env("FLAVORGEN_SECRETS_FILE", test.root().join("private/cache.json"));
    let output = test.run_with_input(cmd, &answers("a", "b"))?;

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(test.root().join("private/cache.json").exists());
    assert!(!test.root().join("secrets.json").exists());

    Ok(())
}
