use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::{CliTest, EN_JSON};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
success: true
exit_code: 0
----- stdout -----
✓ Created .transkeyrc.json

----- stderr -----
");

    let content = test.read_file(".transkeyrc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(
        parsed["matches"],
        serde_json::json!(["this._translate", "_translate"])
    );
    assert_eq!(parsed["languages"], serde_json::json!(["typescript", "html"]));
    assert!(parsed["paths"].as_array().unwrap().is_empty());

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".transkeyrc.json", "{}")?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
success: false
exit_code: 2
----- stdout -----

----- stderr -----
Error: .transkeyrc.json already exists
");

    assert_eq!(test.read_file(".transkeyrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    test.command().arg("init").output()?;

    let content = test.read_file(".transkeyrc.json")?;
    let mut config: Value = serde_json::from_str(&content)?;
    config["paths"] = serde_json::json!(["i18n/en.json"]);
    test.write_file(".transkeyrc.json", &config.to_string())?;
    test.write_file("i18n/en.json", EN_JSON)?;
    test.write_file("src/app.html", "<p>{{ _translate.title }}</p>\n")?;

    let output = test
        .position_command("hover", "src/app.html", 1, 10)
        .output()?;
    assert!(
        output.status.success(),
        "hover should work with initialized config. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    Ok(())
}
