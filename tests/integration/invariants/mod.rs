//! Cross-endpoint behavioural properties
//!
//! Title derivation, cascade deletes, pagination arithmetic and activity
//! ordering, each observed only through the HTTP surface.

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::common::assertions::{assert_timestamp_progression, timestamp};
use crate::common::{request, TestApp};

async fn conversation_title(app: &TestApp, id: &str) -> Value {
    let (_, body) = app.get(&format!("/api/conversations/{id}")).await;
    body["data"]["title"].clone()
}

#[tokio::test]
async fn test_title_derived_from_first_user_message() {
    let app = TestApp::new().await.unwrap();
    let conv = app.create_conversation(None).await;
    let id = conv["id"].as_str().unwrap();

    app.post_message(id, "Hello world").await;
    assert_eq!(conversation_title(&app, id).await, "Hello world");

    // Only the first user message names the conversation
    app.post_message(id, "Something else entirely").await;
    assert_eq!(conversation_title(&app, id).await, "Hello world");
}

#[tokio::test]
async fn test_long_first_message_title_is_truncated() {
    let app = TestApp::new().await.unwrap();
    let conv = app.create_conversation(None).await;
    let id = conv["id"].as_str().unwrap();
    app.post_message(id, &"x".repeat(120)).await;

    let title = conversation_title(&app, id).await;
    assert_eq!(title, format!("{}...", "x".repeat(50)));
}

#[tokio::test]
async fn test_bot_message_does_not_name_conversation() {
    let app = TestApp::new().await.unwrap();
    let conv = app.create_conversation(None).await;
    let id = conv["id"].as_str().unwrap();

    let (status, _) = app
        .send(request(
            Method::POST,
            "/api/messages",
            Some(json!({ "conversationId": id, "content": "Bot reply", "isFromUser": false })),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(conversation_title(&app, id).await, "New Conversation");

    app.post_message(id, "User question").await;
    assert_eq!(conversation_title(&app, id).await, "User question");
}

#[tokio::test]
async fn test_client_title_is_never_overwritten() {
    let app = TestApp::new().await.unwrap();
    let conv = app.create_conversation(Some("Chosen")).await;
    let id = conv["id"].as_str().unwrap();

    app.post_message(id, "Hello world").await;
    assert_eq!(conversation_title(&app, id).await, "Chosen");
}

#[tokio::test]
async fn test_concurrent_first_messages_set_title_once() {
    let app = TestApp::new().await.unwrap();
    let conv = app.create_conversation(None).await;
    let id = conv["id"].as_str().unwrap();

    let (a, b) = tokio::join!(app.post_message(id, "alpha"), app.post_message(id, "beta"));
    assert_eq!(a["isFromUser"], true);
    assert_eq!(b["isFromUser"], true);

    let title = conversation_title(&app, id).await;
    assert!(title == "alpha" || title == "beta", "unexpected title {title}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_posts_on_shared_pool_all_succeed() {
    let app = TestApp::with_file_database().await.unwrap();
    let conv = app.create_conversation(None).await;
    let id = conv["id"].as_str().unwrap().to_string();

    let handles: Vec<_> = (0..40)
        .map(|i| {
            let router = app.test_router();
            let req = request(
                Method::POST,
                "/api/messages",
                Some(json!({ "conversationId": id, "content": format!("burst {i}") })),
            );
            tokio::spawn(async move { router.oneshot(req).await.unwrap().status() })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::CREATED);
    }

    let (_, body) = app.get(&format!("/api/messages/{id}?limit=100")).await;
    // 40 posted plus the greeting
    assert_eq!(body["pagination"]["totalCount"], 41);
    let title = conversation_title(&app, &id).await;
    assert!(
        title.as_str().is_some_and(|t| t.starts_with("burst ")),
        "unexpected title {title}"
    );
}

#[tokio::test]
async fn test_delete_cascades_to_messages() {
    let app = TestApp::new().await.unwrap();
    let conv = app.create_conversation(None).await;
    let id = conv["id"].as_str().unwrap();
    let msg = app.post_message(id, "Soon gone").await;

    let (status, _) = app
        .send(request(Method::DELETE, &format!("/api/conversations/{id}"), None))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .get(&format!("/api/messages/single/{}", msg["id"].as_str().unwrap()))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get(&format!("/api/messages/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.message_rows().await, 0);
}

#[tokio::test]
async fn test_get_is_idempotent() {
    let app = TestApp::new().await.unwrap();
    let conv = app.create_conversation(None).await;
    let id = conv["id"].as_str().unwrap();
    app.post_message(id, "Stable").await;

    let uri = format!("/api/conversations/{id}");
    let first = app.get(&uri).await;
    let second = app.get(&uri).await;
    assert_eq!(first, second);

    let list_first = app.get("/api/conversations").await;
    let list_second = app.get("/api/conversations").await;
    assert_eq!(list_first, list_second);
}

#[tokio::test]
async fn test_message_page_size_is_min_of_limit_and_total() {
    let app = TestApp::new().await.unwrap();
    let conv = app.create_conversation(None).await;
    let id = conv["id"].as_str().unwrap();
    for i in 0..6 {
        app.post_message(id, &format!("m{i}")).await;
    }
    // six posted plus the greeting
    let total = 7;

    for limit in [1, 3, 7, 10] {
        let (status, body) = app.get(&format!("/api/messages/{id}?limit={limit}")).await;
        assert_eq!(status, StatusCode::OK);

        let page = body["data"].as_array().unwrap();
        assert_eq!(page.len(), limit.min(total));
        assert_eq!(body["pagination"]["totalCount"], total);
        assert_eq!(page[0]["content"], "m5");
    }
}

#[tokio::test]
async fn test_page_beyond_total_pages_is_empty() {
    let app = TestApp::new().await.unwrap();
    let conv = app.create_conversation(None).await;
    let id = conv["id"].as_str().unwrap();
    app.post_message(id, "only one").await;

    let (status, body) = app
        .get(&format!("/api/messages/{id}?page=5&limit=10"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["pagination"]["totalPages"], 1);
    assert_eq!(body["pagination"]["hasNext"], false);
    assert_eq!(body["pagination"]["hasPrev"], true);

    let (_, body) = app.get("/api/conversations?page=3").await;
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["pagination"]["hasNext"], false);
}

#[tokio::test]
async fn test_new_message_moves_conversation_to_top() {
    let app = TestApp::new().await.unwrap();
    let older = app.create_conversation(Some("Older")).await;
    let newer = app.create_conversation(Some("Newer")).await;

    let (_, body) = app.get("/api/conversations").await;
    assert_eq!(body["data"][0]["id"], newer["id"]);

    let msg = app.post_message(older["id"].as_str().unwrap(), "bump").await;

    let (_, body) = app.get("/api/conversations").await;
    assert_eq!(body["data"][0]["id"], older["id"]);
    assert_timestamp_progression(
        &timestamp(&msg["createdAt"]),
        &timestamp(&body["data"][0]["updatedAt"]),
    );
}
