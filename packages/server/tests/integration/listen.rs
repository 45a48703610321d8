use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn listening_counts_downloads() {
    let app = TestApp::spawn().await;
    let token = app.token_for("alice");
    let podcast_id = app.create_podcast(&token, "Show").await;
    let episode = app
        .create_episode(&podcast_id, json!({ "title": "Pilot" }), b"hello".to_vec(), &token)
        .await;
    let episode_id = episode["id"].as_str().unwrap();

    for _ in 0..3 {
        let res = app
            .get_bytes(&routes::listen(&podcast_id, episode_id), None)
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.bytes, b"hello");
    }

    let fetched = app
        .get_with_token(&routes::episode(&podcast_id, episode_id), &token)
        .await;
    assert_eq!(fetched.body["downloadCount"], 3);
}

#[tokio::test]
async fn listening_to_unknown_episode_is_not_found() {
    let app = TestApp::spawn().await;
    let token = app.token_for("alice");
    let podcast_id = app.create_podcast(&token, "Show").await;

    let res = app
        .get_without_token(&routes::listen(&podcast_id, "missing"))
        .await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn listening_after_delete_is_not_found() {
    let app = TestApp::spawn().await;
    let token = app.token_for("alice");
    let podcast_id = app.create_podcast(&token, "Show").await;
    let episode = app
        .create_episode(&podcast_id, json!({ "title": "Pilot" }), b"hello".to_vec(), &token)
        .await;
    let episode_id = episode["id"].as_str().unwrap();
    app.delete_with_token(&routes::podcast(&podcast_id), &token)
        .await;

    let res = app
        .get_without_token(&routes::listen(&podcast_id, episode_id))
        .await;

    assert_eq!(res.status, 404);
}
