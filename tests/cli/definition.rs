use anyhow::Result;
use serde_json::Value;

use crate::{COMPONENT_TS, CliTest, stdout};

const FILE: &str = "src/app/app.component.ts";

fn project() -> Result<CliTest> {
    let test = CliTest::with_translations()?;
    test.write_file(FILE, COMPONENT_TS)?;
    Ok(test)
}

#[test]
fn test_definition_in_every_language() -> Result<()> {
    let test = project()?;

    let output = test.position_command("definition", FILE, 4, 30).output()?;
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.starts_with("definition: CONTROLL.buy\n"));
    assert!(out.contains("  = en: src/assets/i18n/en.json:3\n"));
    assert!(out.contains("  = vi: src/assets/i18n/vi.json:3\n"));

    Ok(())
}

#[test]
fn test_definition_json_lines_are_zero_based() -> Result<()> {
    let test = project()?;

    let output = test
        .position_command("definition", FILE, 5, 14)
        .args(["--format", "json"])
        .output()?;
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout)?;
    let targets = json["result"]["targets"].as_array().unwrap();
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0]["label"], "en");
    assert_eq!(targets[0]["line"], 6);
    assert!(
        targets[0]["filePath"]
            .as_str()
            .unwrap()
            .ends_with("src/assets/i18n/en.json")
    );

    Ok(())
}

#[test]
fn test_definition_root_points_at_top() -> Result<()> {
    let test = project()?;
    test.write_file("src/root.ts", "const t = this._translate;\n")?;

    let output = test
        .position_command("definition", "src/root.ts", 1, 15)
        .args(["--format", "json"])
        .output()?;
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["result"]["key"], "");
    assert_eq!(json["result"]["targets"][0]["line"], 0);
    assert_eq!(json["result"]["targets"][1]["line"], 0);

    Ok(())
}

#[test]
fn test_definition_unknown_key() -> Result<()> {
    let test = project()?;

    let output = test.position_command("definition", FILE, 6, 20).output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("No definition found"));

    Ok(())
}
