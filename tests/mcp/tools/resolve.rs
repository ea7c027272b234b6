use std::time::{Duration, Instant};

use rmcp::handler::server::wrapper::Parameters;
use serde_json::{Value, json};
use transkey::mcp::{TranskeyMcpServer, types::PositionParams};

use crate::{McpTestFixture, extract_tool_result_json, fixture_en_vi};

fn position(fixture: &McpTestFixture, line_text: &str, column: u32) -> Parameters<PositionParams> {
    Parameters(PositionParams {
        project_root_path: fixture.root(),
        line_text: line_text.to_string(),
        column,
        language_id: None,
    })
}

// ============================================================================
// hover tests
// ============================================================================

#[tokio::test]
async fn test_hover() {
    let fixture = fixture_en_vi().unwrap();
    let server = TranskeyMcpServer::new();

    let result = server
        .hover(position(&fixture, "label = this._translate.CONTROLL.buy;", 20))
        .await
        .unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["applicable"], true);
    assert_eq!(json_result["result"]["key"], "CONTROLL.buy");
    assert_eq!(
        json_result["result"]["entries"],
        json!([
            { "label": "en", "value": "Buy" },
            { "label": "vi", "value": "Mua" }
        ])
    );
    assert_eq!(json_result["warnings"], json!([]));
}

#[tokio::test]
async fn test_hover_reports_broken_config() {
    let fixture = fixture_en_vi().unwrap();
    let server = TranskeyMcpServer::new();
    let line = "_translate.CONTROLL.buy";

    let result = server.hover(position(&fixture, line, 0)).await.unwrap();
    assert!(extract_tool_result_json(&result).get("configError").is_none());

    std::fs::write(fixture.root_path().join(".transkeyrc.json"), "{ broken").unwrap();
    let result = server.hover(position(&fixture, line, 0)).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert!(
        json_result["configError"]
            .as_str()
            .unwrap()
            .contains("Failed to parse config file")
    );
    assert_eq!(
        json_result["result"]["entries"],
        json!([
            { "label": "en", "value": "Buy" },
            { "label": "vi", "value": "Mua" }
        ])
    );
}

#[tokio::test]
async fn test_hover_renders_non_string_leaf() {
    let fixture = fixture_en_vi().unwrap();
    let server = TranskeyMcpServer::new();

    let result = server
        .hover(position(&fixture, "_translate.count", 3))
        .await
        .unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(
        json_result["result"]["entries"],
        json!([{ "label": "en", "value": "3" }])
    );
}

#[tokio::test]
async fn test_hover_nothing_resolved() {
    let fixture = fixture_en_vi().unwrap();
    let server = TranskeyMcpServer::new();

    let result = server
        .hover(position(&fixture, "unrelated.CONTROLL.buy", 5))
        .await
        .unwrap();
    let json_result = extract_tool_result_json(&result);
    assert!(json_result["result"].is_null());
}

#[tokio::test]
async fn test_hover_language_gating() {
    let fixture = fixture_en_vi().unwrap();
    let server = TranskeyMcpServer::new();

    let mut params = position(&fixture, "_translate.CONTROLL.buy", 3);
    params.0.language_id = Some("python".to_string());

    let result = server.hover(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);
    assert_eq!(json_result["applicable"], false);
    assert!(json_result["result"].is_null());
}

#[tokio::test]
async fn test_hover_column_out_of_range() {
    let fixture = fixture_en_vi().unwrap();
    let server = TranskeyMcpServer::new();

    let result = server
        .hover(position(&fixture, "_translate.CONTROLL.buy", 99))
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_hover_sees_file_changes() {
    let fixture = fixture_en_vi().unwrap();
    let server = TranskeyMcpServer::new();
    let line = "_translate.CONTROLL.buy";

    let result = server.hover(position(&fixture, line, 3)).await.unwrap();
    assert_eq!(
        extract_tool_result_json(&result)["result"]["entries"][1]["value"],
        "Mua"
    );

    fixture
        .write_translation_file("vi", &json!({ "CONTROLL": { "buy": "Mua ngay" } }))
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    let mut latest = Value::Null;
    while Instant::now() < deadline {
        let result = server.hover(position(&fixture, line, 3)).await.unwrap();
        latest = extract_tool_result_json(&result)["result"]["entries"][1]["value"].clone();
        if latest == "Mua ngay" {
            break;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    assert_eq!(latest, "Mua ngay");
}

// ============================================================================
// complete tests
// ============================================================================

#[tokio::test]
async fn test_complete() {
    let fixture = fixture_en_vi().unwrap();
    let server = TranskeyMcpServer::new();

    let result = server
        .complete(position(&fixture, "x = this._translate.CONTROLL.", 28))
        .await
        .unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["result"]["parent"], "CONTROLL");
    assert_eq!(
        json_result["result"]["suggestions"],
        json!([
            {
                "key": "buy",
                "path": "CONTROLL.buy",
                "documentation": ["en: Buy", "vi: Mua"]
            },
            {
                "key": "sell",
                "path": "CONTROLL.sell",
                "documentation": ["en: Sell"]
            }
        ])
    );
}

#[tokio::test]
async fn test_complete_malformed_document_contributes_nothing() {
    let fixture = fixture_en_vi().unwrap();
    fixture.write_raw_translation_file("vi", "[1, 2").unwrap();
    let server = TranskeyMcpServer::new();

    let result = server
        .complete(position(&fixture, "_translate.", 10))
        .await
        .unwrap();
    let json_result = extract_tool_result_json(&result);

    let keys: Vec<&str> = json_result["result"]["suggestions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["CONTROLL", "count"]);
    assert_eq!(json_result["warnings"][0]["label"], "vi");
}

// ============================================================================
// definition tests
// ============================================================================

#[tokio::test]
async fn test_definition() {
    let fixture = fixture_en_vi().unwrap();
    let server = TranskeyMcpServer::new();

    let result = server
        .definition(position(&fixture, "_translate.CONTROLL.sell", 20))
        .await
        .unwrap();
    let json_result = extract_tool_result_json(&result);

    let targets = json_result["result"]["targets"].as_array().unwrap();
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0]["label"], "en");
    // Pretty-printed fixture: `{`, `"CONTROLL": {`, `"buy"`, `"sell"`.
    assert_eq!(targets[0]["line"], 3);
}

#[tokio::test]
async fn test_definition_literal_key() {
    let fixture = McpTestFixture::with_translations(vec![(
        "en",
        json!({ "CONTROLL": { "buy": "Buy" } }),
    )])
    .unwrap();
    let server = TranskeyMcpServer::new();

    let result = server
        .definition(position(&fixture, "key: 'CONTROLL.buy'", 8))
        .await
        .unwrap();
    let json_result = extract_tool_result_json(&result);
    assert_eq!(json_result["result"]["key"], "CONTROLL.buy");
    assert_eq!(json_result["result"]["targets"][0]["line"], 2);
}
