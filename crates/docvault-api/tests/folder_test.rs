//! Integration tests for folder endpoints.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_create_folder_records_actor() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({ "name": "Contracts", "description": "Signed PDFs" })),
            Some("alice"),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["name"], "Contracts");
    assert_eq!(response.body["data"]["created_by"], "alice");
    assert!(response.body["data"]["parent_id"].is_null());
}

#[tokio::test]
async fn test_missing_actor_header_uses_default_actor() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request("POST", "/api/folders", Some(json!({ "name": "Inbox" })), None)
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["data"]["created_by"], "system");
}

#[tokio::test]
async fn test_create_folder_unknown_parent() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({ "name": "Orphan", "parent_id": 999 })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.error_code(), "INVALID_PARENT");
}

#[tokio::test]
async fn test_create_folder_rejects_empty_name() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request("POST", "/api/folders", Some(json!({ "name": "" })), None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");

    let blank = app
        .request("POST", "/api/folders", Some(json!({ "name": "   " })), None)
        .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_uses_error_envelope() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request("POST", "/api/folders", Some(json!({ "title": "no name" })), None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_children_path_and_tree() {
    let app = helpers::TestApp::new().await;
    let root = app.create_folder("Engineering", None).await;
    let child = app.create_folder("Specs", Some(root)).await;
    let grandchild = app.create_folder("Drafts", Some(child)).await;

    let children = app
        .request("GET", &format!("/api/folders/{root}/children"), None, None)
        .await;
    assert_eq!(children.status, StatusCode::OK);
    assert_eq!(children.body["data"].as_array().unwrap().len(), 1);
    assert_eq!(children.body["data"][0]["id"], child);

    let path = app
        .request("GET", &format!("/api/folders/{grandchild}/path"), None, None)
        .await;
    assert_eq!(path.status, StatusCode::OK);
    let names: Vec<&str> = path.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Engineering", "Specs", "Drafts"]);

    let tree = app.request("GET", "/api/folders/tree", None, None).await;
    assert_eq!(tree.status, StatusCode::OK);
    assert_eq!(tree.body["data"]["total_folders"], 3);
    assert_eq!(tree.body["data"]["roots"][0]["name"], "Engineering");
    assert_eq!(
        tree.body["data"]["roots"][0]["children"][0]["children"][0]["name"],
        "Drafts"
    );
}

#[tokio::test]
async fn test_list_folders_sorted_by_name() {
    let app = helpers::TestApp::new().await;
    app.create_folder("Zeta", None).await;
    app.create_folder("Alpha", None).await;

    let response = app.request("GET", "/api/folders", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"][0]["name"], "Alpha");
    assert_eq!(response.body["data"][1]["name"], "Zeta");
}

#[tokio::test]
async fn test_move_folder_and_reject_cycle() {
    let app = helpers::TestApp::new().await;
    let a = app.create_folder("A", None).await;
    let b = app.create_folder("B", Some(a)).await;
    let c = app.create_folder("C", None).await;

    let moved = app
        .request(
            "PUT",
            &format!("/api/folders/{c}/move"),
            Some(json!({ "parent_id": b })),
            None,
        )
        .await;
    assert_eq!(moved.status, StatusCode::OK);
    assert_eq!(moved.body["data"]["parent_id"], b);

    let cycle = app
        .request(
            "PUT",
            &format!("/api/folders/{a}/move"),
            Some(json!({ "parent_id": c })),
            None,
        )
        .await;
    assert_eq!(cycle.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(cycle.error_code(), "INVALID_PARENT");

    let to_root = app
        .request(
            "PUT",
            &format!("/api/folders/{c}/move"),
            Some(json!({ "parent_id": null })),
            None,
        )
        .await;
    assert_eq!(to_root.status, StatusCode::OK);
    assert!(to_root.body["data"]["parent_id"].is_null());
}

#[tokio::test]
async fn test_get_folder_errors() {
    let app = helpers::TestApp::new().await;

    let missing = app.request("GET", "/api/folders/42", None, None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.error_code(), "NOT_FOUND");

    let invalid = app.request("GET", "/api/folders/abc", None, None).await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    assert_eq!(invalid.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_health_reports_backends() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["registry"]["backend"], "memory");
    assert_eq!(response.body["data"]["storage"]["local"], true);
}
