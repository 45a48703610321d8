use serde_json::json;

use crate::common::{TestApp, routes};

mod podcast_create {
    use super::*;

    #[tokio::test]
    async fn owner_can_create_and_fetch_podcast() {
        let app = TestApp::spawn().await;
        let token = app.token_for("alice");

        let res = app
            .post_with_token(
                routes::PODCASTS,
                &json!({
                    "id": "client-chosen",
                    "ownerId": "mallory",
                    "title": "Tech Talk",
                    "description": "Weekly tech news",
                    "author": "Alice",
                    "email": "alice@example.com",
                    "categories": ["Technology", "News"],
                    "explicit": true,
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        let id = res.id();
        assert_ne!(id, "client-chosen");
        assert_eq!(res.body["ownerId"], "alice");
        assert_eq!(res.body["title"], "Tech Talk");
        assert_eq!(res.body["language"], "en-us");
        assert_eq!(res.body["explicit"], true);
        assert_eq!(res.body["categories"], json!(["Technology", "News"]));
        assert!(
            res.body["rssUrl"]
                .as_str()
                .unwrap()
                .ends_with(&format!("/feeds/{id}/rss"))
        );

        let fetched = app.get_with_token(&routes::podcast(&id), &token).await;
        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.body, res.body);
    }

    #[tokio::test]
    async fn ids_are_unique() {
        let app = TestApp::spawn().await;
        let token = app.token_for("alice");

        let first = app.create_podcast(&token, "One").await;
        let second = app.create_podcast(&token, "Two").await;

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn rejects_missing_title() {
        let app = TestApp::spawn().await;
        let token = app.token_for("alice");

        let res = app
            .post_with_token(routes::PODCASTS, &json!({ "description": "untitled" }), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn rejects_malformed_json() {
        let app = TestApp::spawn().await;
        let token = app.token_for("alice");

        let res = app
            .client
            .post(app.url(routes::PODCASTS))
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", "application/json")
            .body("{\"title\": ")
            .send()
            .await
            .unwrap();

        assert_eq!(res.status().as_u16(), 400);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn requires_token() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::PODCASTS, &json!({ "title": "Anon" }))
            .await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");

        let res = app
            .post_with_token(routes::PODCASTS, &json!({ "title": "Forged" }), "not-a-jwt")
            .await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }
}

mod podcast_ownership {
    use super::*;

    #[tokio::test]
    async fn list_only_returns_own_podcasts() {
        let app = TestApp::spawn().await;
        let alice = app.token_for("alice");
        let bob = app.token_for("bob");

        let a1 = app.create_podcast(&alice, "A1").await;
        let a2 = app.create_podcast(&alice, "A2").await;
        app.create_podcast(&bob, "B1").await;

        let res = app.get_with_token(routes::PODCASTS, &alice).await;
        assert_eq!(res.status, 200);
        let ids: Vec<&str> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&a1.as_str()));
        assert!(ids.contains(&a2.as_str()));
    }

    #[tokio::test]
    async fn other_users_get_not_found() {
        let app = TestApp::spawn().await;
        let alice = app.token_for("alice");
        let bob = app.token_for("bob");
        let id = app.create_podcast(&alice, "Private").await;

        let res = app.get_with_token(&routes::podcast(&id), &bob).await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");

        let res = app
            .put_with_token(&routes::podcast(&id), &json!({ "title": "Mine now" }), &bob)
            .await;
        assert_eq!(res.status, 404);

        let res = app.delete_with_token(&routes::podcast(&id), &bob).await;
        assert_eq!(res.status, 404);

        let res = app.get_with_token(&routes::episodes(&id), &bob).await;
        assert_eq!(res.status, 404);

        let res = app.get_with_token(&routes::podcast_stats(&id), &bob).await;
        assert_eq!(res.status, 404);

        let missing = app.get_with_token(&routes::podcast("nope"), &bob).await;
        assert_eq!(missing.body, res.body);

        let res = app.get_with_token(&routes::podcast(&id), &alice).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["title"], "Private");
    }
}

mod podcast_update {
    use super::*;

    #[tokio::test]
    async fn update_keeps_identity_fields() {
        let app = TestApp::spawn().await;
        let token = app.token_for("alice");
        let id = app.create_podcast(&token, "Before").await;
        let before = app.get_with_token(&routes::podcast(&id), &token).await;

        let res = app
            .put_with_token(
                &routes::podcast(&id),
                &json!({
                    "id": "other-id",
                    "ownerId": "bob",
                    "createdAt": "2000-01-01T00:00:00Z",
                    "title": "After",
                    "language": "de-de",
                    "websiteUrl": "https://example.com",
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["id"], id.as_str());
        assert_eq!(res.body["ownerId"], "alice");
        assert_eq!(res.body["createdAt"], before.body["createdAt"]);
        assert_eq!(res.body["title"], "After");
        assert_eq!(res.body["language"], "de-de");
        assert_eq!(res.body["websiteUrl"], "https://example.com");

        let fetched = app.get_with_token(&routes::podcast(&id), &token).await;
        assert_eq!(fetched.body, res.body);
    }

    #[tokio::test]
    async fn update_validates_title() {
        let app = TestApp::spawn().await;
        let token = app.token_for("alice");
        let id = app.create_podcast(&token, "Keep").await;

        let res = app
            .put_with_token(&routes::podcast(&id), &json!({ "title": "x".repeat(257) }), &token)
            .await;
        assert_eq!(res.status, 400);

        let fetched = app.get_with_token(&routes::podcast(&id), &token).await;
        assert_eq!(fetched.body["title"], "Keep");
    }

    #[tokio::test]
    async fn update_missing_podcast_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.token_for("alice");

        let res = app
            .put_with_token(&routes::podcast("missing"), &json!({ "title": "x" }), &token)
            .await;
        assert_eq!(res.status, 404);
    }
}

mod podcast_delete {
    use super::*;

    #[tokio::test]
    async fn delete_cascades_to_episodes_and_audio() {
        let app = TestApp::spawn().await;
        let token = app.token_for("alice");
        let id = app.create_podcast(&token, "Doomed").await;
        let episode = app
            .create_episode(&id, json!({ "title": "Pilot" }), b"audio".to_vec(), &token)
            .await;
        let object = app.object_name(episode["audioUrl"].as_str().unwrap());
        assert!(app.object_exists(&object).await);

        let res = app.delete_with_token(&routes::podcast(&id), &token).await;
        assert_eq!(res.status, 204);

        let res = app.get_with_token(&routes::podcast(&id), &token).await;
        assert_eq!(res.status, 404);
        let res = app.get_with_token(&routes::episodes(&id), &token).await;
        assert_eq!(res.status, 404);
        let res = app
            .get_with_token(
                &routes::episode(&id, episode["id"].as_str().unwrap()),
                &token,
            )
            .await;
        assert_eq!(res.status, 404);
        assert!(!app.object_exists(&object).await);

        let res = app.delete_with_token(&routes::podcast(&id), &token).await;
        assert_eq!(res.status, 404);
    }
}
