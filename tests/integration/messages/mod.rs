//! Message handler integration tests

use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use crate::common::assertions::{assert_failure, assert_timestamp_progression, timestamp};
use crate::common::{error_fields, request, TestApp};

mod test_create_message {
    use super::*;

    #[tokio::test]
    async fn test_create_message_returns_201_verbatim() {
        let app = TestApp::new().await.unwrap();
        let conv = app.create_conversation(None).await;
        let id = conv["id"].as_str().unwrap();

        let (status, body) = app
            .send(request(
                Method::POST,
                "/api/messages",
                Some(json!({ "conversationId": id, "content": "  Hi there!\n" })),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);

        let data = &body["data"];
        assert_eq!(data["content"], "  Hi there!\n");
        assert_eq!(data["conversationId"], id);
        assert_eq!(data["isFromUser"], true);
        assert_eq!(data["createdAt"], data["updatedAt"]);
    }

    #[tokio::test]
    async fn test_create_bot_message() {
        let app = TestApp::new().await.unwrap();
        let conv = app.create_conversation(None).await;

        let (status, body) = app
            .send(request(
                Method::POST,
                "/api/messages",
                Some(json!({
                    "conversationId": conv["id"],
                    "content": "I can help with that.",
                    "isFromUser": false
                })),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["isFromUser"], false);
    }

    #[tokio::test]
    async fn test_create_message_unknown_conversation_returns_404() {
        let app = TestApp::new().await.unwrap();
        let before = app.message_rows().await;

        let (status, body) = app
            .send(request(
                Method::POST,
                "/api/messages",
                Some(json!({ "conversationId": Uuid::new_v4(), "content": "Hello" })),
            ))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_failure(&body, "Conversation not found");
        assert_eq!(app.message_rows().await, before);
    }

    #[tokio::test]
    async fn test_create_empty_content_returns_400() {
        let app = TestApp::new().await.unwrap();
        let conv = app.create_conversation(None).await;
        let before = app.message_rows().await;

        for content in ["", "   \n\t"] {
            let (status, body) = app
                .send(request(
                    Method::POST,
                    "/api/messages",
                    Some(json!({ "conversationId": conv["id"], "content": content })),
                ))
                .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_failure(&body, "Validation error");
            assert_eq!(error_fields(&body), vec!["content"]);
        }
        assert_eq!(app.message_rows().await, before);
    }

    #[tokio::test]
    async fn test_create_content_too_long_returns_400() {
        let app = TestApp::new().await.unwrap();
        let conv = app.create_conversation(None).await;

        let (status, body) = app
            .send(request(
                Method::POST,
                "/api/messages",
                Some(json!({ "conversationId": conv["id"], "content": "a".repeat(10_001) })),
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_fields(&body), vec!["content"]);
    }

    #[tokio::test]
    async fn test_create_missing_fields_returns_400() {
        let app = TestApp::new().await.unwrap();
        let (status, body) = app
            .send(request(Method::POST, "/api/messages", Some(json!({}))))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_fields(&body), vec!["content", "conversationId"]);
    }

    #[tokio::test]
    async fn test_create_malformed_conversation_id_returns_400() {
        let app = TestApp::new().await.unwrap();
        let (status, body) = app
            .send(request(
                Method::POST,
                "/api/messages",
                Some(json!({ "conversationId": "42", "content": "Hello" })),
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_fields(&body), vec!["conversationId"]);
    }

    #[tokio::test]
    async fn test_create_wrong_type_returns_400() {
        let app = TestApp::new().await.unwrap();
        let conv = app.create_conversation(None).await;
        let (status, body) = app
            .send(request(
                Method::POST,
                "/api/messages",
                Some(json!({ "conversationId": conv["id"], "content": 7 })),
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_fields(&body), vec!["body"]);
    }
}

mod test_list_messages {
    use super::*;

    #[tokio::test]
    async fn test_list_messages_newest_first() {
        let app = TestApp::new().await.unwrap();
        let conv = app.create_conversation(None).await;
        let id = conv["id"].as_str().unwrap();
        app.post_message(id, "one").await;
        app.post_message(id, "two").await;

        let (status, body) = app.get(&format!("/api/messages/{id}")).await;
        assert_eq!(status, StatusCode::OK);

        let messages = body["data"].as_array().unwrap();
        let contents: Vec<&str> = messages
            .iter()
            .map(|m| m["content"].as_str().unwrap())
            .collect();
        assert_eq!(contents[..2], ["two", "one"]);
        assert_eq!(body["pagination"]["limit"], 50);
        assert_eq!(body["pagination"]["totalCount"], 3);

        for pair in messages.windows(2) {
            assert_timestamp_progression(
                &timestamp(&pair[1]["createdAt"]),
                &timestamp(&pair[0]["createdAt"]),
            );
        }
    }

    #[tokio::test]
    async fn test_list_messages_unknown_conversation_returns_404() {
        let app = TestApp::new().await.unwrap();
        let (status, body) = app
            .get(&format!("/api/messages/{}", Uuid::new_v4()))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_failure(&body, "Conversation not found");
    }

    #[tokio::test]
    async fn test_list_messages_malformed_id_returns_400() {
        let app = TestApp::new().await.unwrap();
        let (status, body) = app.get("/api/messages/xyz").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_failure(&body, "Invalid parameters");
        assert_eq!(error_fields(&body), vec!["conversationId"]);
    }

    #[tokio::test]
    async fn test_list_messages_limit_above_max_returns_400() {
        let app = TestApp::new().await.unwrap();
        let conv = app.create_conversation(None).await;
        let (status, body) = app
            .get(&format!(
                "/api/messages/{}?limit=500",
                conv["id"].as_str().unwrap()
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_fields(&body), vec!["limit"]);
    }
}

mod test_get_message {
    use super::*;

    #[tokio::test]
    async fn test_get_message_includes_conversation() {
        let app = TestApp::new().await.unwrap();
        let conv = app.create_conversation(Some("Support")).await;
        let msg = app
            .post_message(conv["id"].as_str().unwrap(), "Need help")
            .await;

        let (status, body) = app
            .get(&format!("/api/messages/single/{}", msg["id"].as_str().unwrap()))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["id"], msg["id"]);
        assert_eq!(body["data"]["content"], "Need help");
        assert_eq!(body["data"]["conversation"]["id"], conv["id"]);
        assert_eq!(body["data"]["conversation"]["title"], "Support");
    }

    #[tokio::test]
    async fn test_get_unknown_message_returns_404() {
        let app = TestApp::new().await.unwrap();
        let (status, body) = app
            .get(&format!("/api/messages/single/{}", Uuid::new_v4()))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_failure(&body, "Message not found");
    }

    #[tokio::test]
    async fn test_get_message_malformed_id_returns_400() {
        let app = TestApp::new().await.unwrap();
        let (status, body) = app.get("/api/messages/single/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_fields(&body), vec!["id"]);
    }
}
