use rmcp::handler::server::wrapper::Parameters;
use serde_json::json;
use transkey::mcp::{TranskeyMcpServer, types::ProjectParams};

use crate::{McpTestFixture, extract_tool_result_json, fixture_en_vi};

// ============================================================================
// get_config tests
// ============================================================================

#[tokio::test]
async fn test_get_config_defaults() {
    let fixture = McpTestFixture::new().unwrap();
    let server = TranskeyMcpServer::new();

    let params = Parameters(ProjectParams {
        project_root_path: fixture.root(),
    });

    let result = server.get_config(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["fromFile"], false);
    assert_eq!(
        json_result["config"]["matches"],
        json!(["this._translate", "_translate"])
    );
    assert_eq!(
        json_result["config"]["languages"],
        json!(["typescript", "html"])
    );
    assert_eq!(json_result["config"]["paths"], json!([]));
    assert_eq!(json_result["root"], fixture.root());
}

#[tokio::test]
async fn test_get_config_from_file() {
    let fixture = fixture_en_vi().unwrap();
    let server = TranskeyMcpServer::new();

    let params = Parameters(ProjectParams {
        project_root_path: fixture.root(),
    });

    let result = server.get_config(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["fromFile"], true);
    assert_eq!(
        json_result["config"]["paths"],
        json!(["i18n/en.json", "i18n/vi.json"])
    );
}

#[tokio::test]
async fn test_get_config_picks_up_changes() {
    let fixture = fixture_en_vi().unwrap();
    let server = TranskeyMcpServer::new();
    let params = || {
        Parameters(ProjectParams {
            project_root_path: fixture.root(),
        })
    };

    server.get_config(params()).await.unwrap();
    fixture
        .write_config(&json!({ "lenient": true, "paths": ["i18n/en.json"] }))
        .unwrap();

    let result = server.get_config(params()).await.unwrap();
    let json_result = extract_tool_result_json(&result);
    assert_eq!(json_result["config"]["lenient"], true);
    assert_eq!(
        json_result["config"]["matches"],
        json!(["this._translate", "_translate", "translate", "trans"])
    );
    assert_eq!(json_result["config"]["paths"], json!(["i18n/en.json"]));
}

#[tokio::test]
async fn test_get_config_keeps_last_good() {
    let fixture = fixture_en_vi().unwrap();
    let server = TranskeyMcpServer::new();
    let params = || {
        Parameters(ProjectParams {
            project_root_path: fixture.root(),
        })
    };

    server.get_config(params()).await.unwrap();
    std::fs::write(fixture.root_path().join(".transkeyrc.json"), "{ broken").unwrap();

    let result = server.get_config(params()).await.unwrap();
    let json_result = extract_tool_result_json(&result);
    assert_eq!(
        json_result["config"]["paths"],
        json!(["i18n/en.json", "i18n/vi.json"])
    );
    assert!(
        json_result["configError"]
            .as_str()
            .unwrap()
            .contains("Failed to parse config file")
    );
}

#[tokio::test]
async fn test_config_error_clears_after_fix() {
    let fixture = fixture_en_vi().unwrap();
    let server = TranskeyMcpServer::new();
    let params = || {
        Parameters(ProjectParams {
            project_root_path: fixture.root(),
        })
    };

    let result = server.get_config(params()).await.unwrap();
    assert!(extract_tool_result_json(&result).get("configError").is_none());

    std::fs::write(fixture.root_path().join(".transkeyrc.json"), "{ broken").unwrap();
    let result = server.list_documents(params()).await.unwrap();
    let json_result = extract_tool_result_json(&result);
    assert!(json_result["configError"].is_string());
    assert_eq!(json_result["documents"].as_array().unwrap().len(), 2);

    fixture
        .write_config(&json!({ "paths": ["i18n/en.json"] }))
        .unwrap();
    let result = server.get_config(params()).await.unwrap();
    let json_result = extract_tool_result_json(&result);
    assert!(json_result.get("configError").is_none());
    assert_eq!(json_result["config"]["paths"], json!(["i18n/en.json"]));
}

#[tokio::test]
async fn test_get_config_invalid_root() {
    let server = TranskeyMcpServer::new();

    let params = Parameters(ProjectParams {
        project_root_path: "/definitely/not/a/real/project".to_string(),
    });

    assert!(server.get_config(params).await.is_err());
}

// ============================================================================
// workspace cache tests
// ============================================================================

#[tokio::test]
async fn test_removed_root_is_dropped() {
    let kept = fixture_en_vi().unwrap();
    let removed = fixture_en_vi().unwrap();
    let removed_root = removed.root();
    let server = TranskeyMcpServer::new();

    for fixture in [&kept, &removed] {
        server
            .get_config(Parameters(ProjectParams {
                project_root_path: fixture.root(),
            }))
            .await
            .unwrap();
    }
    assert_eq!(server.open_workspaces(), 2);

    drop(removed);
    let params = Parameters(ProjectParams {
        project_root_path: removed_root,
    });
    assert!(server.get_config(params).await.is_err());
    assert_eq!(server.open_workspaces(), 1);

    server
        .get_config(Parameters(ProjectParams {
            project_root_path: kept.root(),
        }))
        .await
        .unwrap();
    assert_eq!(server.open_workspaces(), 1);
}

#[tokio::test]
async fn test_open_workspaces_are_bounded() {
    let server = TranskeyMcpServer::new();
    let fixtures: Vec<McpTestFixture> = (0..TranskeyMcpServer::MAX_WORKSPACES + 2)
        .map(|_| fixture_en_vi().unwrap())
        .collect();

    for fixture in &fixtures {
        server
            .get_config(Parameters(ProjectParams {
                project_root_path: fixture.root(),
            }))
            .await
            .unwrap();
    }
    assert_eq!(server.open_workspaces(), TranskeyMcpServer::MAX_WORKSPACES);

    // An evicted root opens again on demand.
    let result = server
        .get_config(Parameters(ProjectParams {
            project_root_path: fixtures[0].root(),
        }))
        .await
        .unwrap();
    let json_result = extract_tool_result_json(&result);
    assert_eq!(json_result["fromFile"], true);
    assert_eq!(server.open_workspaces(), TranskeyMcpServer::MAX_WORKSPACES);
}
