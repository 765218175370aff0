mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{create_todo, id_of, send, send_raw, signup, test_app};

const MISSING_ID: &str = "67e55044-10b1-426f-9247-bb680e5fe0c8";

#[tokio::test]
async fn created_todo_starts_incomplete() {
    let app = test_app();
    let (token, user) = signup(&app, "ann@example.com", "secret1").await;

    let todo = create_todo(&app, &token, "Buy milk").await;
    assert_eq!(todo["text"], "Buy milk");
    assert_eq!(todo["_creator"], user["_id"]);

    let res = send(&app, Method::GET, &format!("/todos/{}", id_of(&todo)), Some(&token), None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["todo"]["text"], "Buy milk");
    assert_eq!(res.body["todo"]["completed"], false);
    assert!(res.body["todo"]["completedAt"].is_null());
}

#[tokio::test]
async fn create_ignores_fields_outside_whitelist() {
    let app = test_app();
    let (token, user) = signup(&app, "ann@example.com", "secret1").await;

    let res = send(
        &app,
        Method::POST,
        "/todos",
        Some(&token),
        Some(json!({
            "text": "  sneaky  ",
            "completed": true,
            "completedAt": 123,
            "_creator": MISSING_ID
        })),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["text"], "sneaky");
    assert_eq!(res.body["completed"], false);
    assert!(res.body["completedAt"].is_null());
    assert_eq!(res.body["_creator"], user["_id"]);
}

#[tokio::test]
async fn create_requires_text() {
    let app = test_app();
    let (token, _) = signup(&app, "ann@example.com", "secret1").await;

    for body in [json!({}), json!({ "text": "" }), json!({ "text": "   " })] {
        let res = send(&app, Method::POST, "/todos", Some(&token), Some(body)).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert!(res.body["field_errors"]["text"].is_string());
    }
}

#[tokio::test]
async fn list_wraps_todos_in_creation_order() {
    let app = test_app();
    let (token, _) = signup(&app, "ann@example.com", "secret1").await;
    create_todo(&app, &token, "first").await;
    create_todo(&app, &token, "second").await;

    let res = send(&app, Method::GET, "/todos", Some(&token), None).await;
    assert_eq!(res.status, StatusCode::OK);
    let todos = res.body["todos"].as_array().unwrap();
    assert_eq!(todos.len(), 2);
    assert_eq!(todos[0]["text"], "first");
    assert_eq!(todos[1]["text"], "second");
}

#[tokio::test]
async fn patch_completion_stamps_then_resets() {
    let app = test_app();
    let (token, _) = signup(&app, "ann@example.com", "secret1").await;
    let todo = create_todo(&app, &token, "Write report").await;
    let uri = format!("/todos/{}", id_of(&todo));

    let done = send(&app, Method::PATCH, &uri, Some(&token), Some(json!({ "completed": true }))).await;
    assert_eq!(done.status, StatusCode::OK);
    assert_eq!(done.body["todo"]["completed"], true);
    assert!(done.body["todo"]["completedAt"].as_i64().unwrap() > 0);
    assert_eq!(done.body["todo"]["text"], "Write report");

    let reset = send(&app, Method::PATCH, &uri, Some(&token), Some(json!({ "text": "Rewrite report" }))).await;
    assert_eq!(reset.status, StatusCode::OK);
    assert_eq!(reset.body["todo"]["text"], "Rewrite report");
    assert_eq!(reset.body["todo"]["completed"], false);
    assert!(reset.body["todo"]["completedAt"].is_null());
}

#[tokio::test]
async fn patch_with_non_boolean_completed_does_not_complete() {
    let app = test_app();
    let (token, _) = signup(&app, "ann@example.com", "secret1").await;
    let todo = create_todo(&app, &token, "Call mum").await;
    let uri = format!("/todos/{}", id_of(&todo));

    let res = send(&app, Method::PATCH, &uri, Some(&token), Some(json!({ "completed": "true" }))).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["todo"]["completed"], false);
    assert!(res.body["todo"]["completedAt"].is_null());
}

#[tokio::test]
async fn patch_rejects_blank_text() {
    let app = test_app();
    let (token, _) = signup(&app, "ann@example.com", "secret1").await;
    let todo = create_todo(&app, &token, "keep").await;
    let uri = format!("/todos/{}", id_of(&todo));

    let res = send(&app, Method::PATCH, &uri, Some(&token), Some(json!({ "text": " " }))).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let unchanged = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(unchanged.body["todo"]["text"], "keep");
}

#[tokio::test]
async fn complete_route_marks_done() {
    let app = test_app();
    let (token, _) = signup(&app, "ann@example.com", "secret1").await;
    let todo = create_todo(&app, &token, "Water plants").await;

    let res = send(
        &app,
        Method::GET,
        &format!("/todos/complete/{}", id_of(&todo)),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["todo"]["completed"], true);
    assert!(res.body["todo"]["completedAt"].is_i64());
}

#[tokio::test]
async fn delete_returns_removed_todo_once() {
    let app = test_app();
    let (token, _) = signup(&app, "ann@example.com", "secret1").await;
    let todo = create_todo(&app, &token, "Old task").await;
    let uri = format!("/todos/{}", id_of(&todo));

    let res = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["_id"], todo["_id"]);
    assert_eq!(res.body["text"], "Old task");

    let again = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);

    let gone = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn remove_alias_deletes() {
    let app = test_app();
    let (token, _) = signup(&app, "ann@example.com", "secret1").await;
    let todo = create_todo(&app, &token, "Alias").await;

    let res = send(
        &app,
        Method::GET,
        &format!("/todos/remove/{}", id_of(&todo)),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["_id"], todo["_id"]);

    let list = send(&app, Method::GET, "/todos", Some(&token), None).await;
    assert!(list.body["todos"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_id_on_get_is_a_bad_request() {
    let app = test_app();
    let (token, _) = signup(&app, "ann@example.com", "secret1").await;

    let res = send(&app, Method::GET, "/todos/123", Some(&token), None).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["message"], "invalid ID");
}

#[tokio::test]
async fn malformed_id_on_mutations_is_not_found() {
    let app = test_app();
    let (token, _) = signup(&app, "ann@example.com", "secret1").await;

    let cases = [
        (Method::DELETE, "/todos/123", None),
        (Method::GET, "/todos/remove/123", None),
        (Method::GET, "/todos/complete/123", None),
        (Method::PATCH, "/todos/123", Some(json!({ "completed": true }))),
    ];
    for (method, uri, body) in cases {
        let res = send(&app, method.clone(), uri, Some(&token), body).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND, "{} {}", method, uri);
    }
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let app = test_app();
    let (token, _) = signup(&app, "ann@example.com", "secret1").await;

    let get = send(&app, Method::GET, &format!("/todos/{}", MISSING_ID), Some(&token), None).await;
    assert_eq!(get.status, StatusCode::NOT_FOUND);

    let complete = send(
        &app,
        Method::GET,
        &format!("/todos/complete/{}", MISSING_ID),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(complete.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn todo_routes_require_a_session() {
    let app = test_app();

    let list = send(&app, Method::GET, "/todos", None, None).await;
    assert_eq!(list.status, StatusCode::UNAUTHORIZED);

    let create = send(&app, Method::POST, "/todos", None, Some(json!({ "text": "x" }))).await;
    assert_eq!(create.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn patch_without_body_resets_completion() {
    let app = test_app();
    let (token, _) = signup(&app, "ann@example.com", "secret1").await;
    let todo = create_todo(&app, &token, "Pay rent").await;
    let id = id_of(&todo);

    let done = send(&app, Method::GET, &format!("/todos/complete/{}", id), Some(&token), None).await;
    assert_eq!(done.body["todo"]["completed"], true);

    let res = send(&app, Method::PATCH, &format!("/todos/{}", id), Some(&token), None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["todo"]["text"], "Pay rent");
    assert_eq!(res.body["todo"]["completed"], false);
    assert!(res.body["todo"]["completedAt"].is_null());
}

#[tokio::test]
async fn create_without_body_fails_validation() {
    let app = test_app();
    let (token, _) = signup(&app, "ann@example.com", "secret1").await;

    let res = send(&app, Method::POST, "/todos", Some(&token), None).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
    assert!(res.body["field_errors"]["text"].is_string());
}

#[tokio::test]
async fn create_with_malformed_json_is_a_json_bad_request() {
    let app = test_app();
    let (token, _) = signup(&app, "ann@example.com", "secret1").await;

    let res = send_raw(
        &app,
        Method::POST,
        "/todos",
        Some(&token),
        Some("application/json"),
        "{text: 'no quotes'}",
    )
    .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], true);
    assert_eq!(res.body["code"], "BAD_REQUEST");

    let list = send(&app, Method::GET, "/todos", Some(&token), None).await;
    assert_eq!(list.body["todos"], json!([]));
}

#[tokio::test]
async fn create_with_form_body_is_read_as_empty() {
    let app = test_app();
    let (token, _) = signup(&app, "ann@example.com", "secret1").await;

    let res = send_raw(
        &app,
        Method::POST,
        "/todos",
        Some(&token),
        Some("application/x-www-form-urlencoded"),
        "text=hello",
    )
    .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}
