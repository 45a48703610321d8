use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn stats_for_single_episode_scenario() {
    let app = TestApp::spawn().await;
    let token = app.token_for("alice");
    let podcast_id = app.create_podcast(&token, "Tech Talk").await;
    app.create_episode(
        &podcast_id,
        json!({
            "title": "Launch",
            "downloadCount": 5,
            "publishDate": "2024-03-10T00:00:00Z",
        }),
        vec![0u8; 2048],
        &token,
    )
    .await;

    let res = app
        .get_with_token(&routes::podcast_stats(&podcast_id), &token)
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["podcastId"], podcast_id.as_str());
    assert_eq!(res.body["totalEpisodes"], 1);
    assert_eq!(res.body["totalDownloads"], 5);
    assert_eq!(res.body["totalStorage"], 2048);
    assert_eq!(res.body["totalStorageFormatted"], "2 KB");
    assert_eq!(res.body["downloadsByMonth"], json!({ "2024-03": 5 }));
    assert_eq!(res.body["episodeStats"][0]["title"], "Launch");
    assert_eq!(res.body["episodeStats"][0]["downloads"], 5);
    assert!(res.body["lastUpdated"].is_string());
}

#[tokio::test]
async fn stats_sum_across_episodes() {
    let app = TestApp::spawn().await;
    let token = app.token_for("alice");
    let podcast_id = app.create_podcast(&token, "Show").await;
    for (title, downloads, date, size) in [
        ("One", 2, "2024-01-05T00:00:00Z", 1024),
        ("Two", 3, "2024-01-20T00:00:00Z", 512),
        ("Three", 7, "2024-02-01T00:00:00Z", 0),
    ] {
        app.create_episode(
            &podcast_id,
            json!({ "title": title, "downloadCount": downloads, "publishDate": date }),
            vec![1u8; size],
            &token,
        )
        .await;
    }
    let episode = app.get_with_token(&routes::episodes(&podcast_id), &token).await;
    let first_id = episode.body[0]["id"].as_str().unwrap().to_string();
    app.get_bytes(&routes::listen(&podcast_id, &first_id), None)
        .await;

    let res = app
        .get_with_token(&routes::podcast_stats(&podcast_id), &token)
        .await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["totalEpisodes"], 3);
    assert_eq!(res.body["totalDownloads"], 13);
    assert_eq!(res.body["totalStorage"], 1536);
    assert_eq!(res.body["totalStorageFormatted"], "1.5 KB");
    assert_eq!(
        res.body["downloadsByMonth"],
        json!({ "2024-01": 6, "2024-02": 7 })
    );
    let titles: Vec<&str> = res.body["episodeStats"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["One", "Two", "Three"]);
}

#[tokio::test]
async fn empty_podcast_has_zero_stats() {
    let app = TestApp::spawn().await;
    let token = app.token_for("alice");
    let podcast_id = app.create_podcast(&token, "Quiet").await;

    let res = app
        .get_with_token(&routes::podcast_stats(&podcast_id), &token)
        .await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["totalEpisodes"], 0);
    assert_eq!(res.body["totalStorageFormatted"], "0 B");
    assert_eq!(res.body["downloadsByMonth"], json!({}));
}
