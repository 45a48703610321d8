use serde_json::json;

use crate::common::{AudioPart, MAX_OBJECT_SIZE, TestApp, routes};

mod episode_create {
    use super::*;

    #[tokio::test]
    async fn creates_episode_with_audio() {
        let app = TestApp::spawn().await;
        let token = app.token_for("alice");
        let podcast_id = app.create_podcast(&token, "Show").await;

        let res = app
            .post_episode(
                &podcast_id,
                Some(&json!({
                    "id": "client-chosen",
                    "title": "Pilot",
                    "description": "First one",
                    "duration": "00:42:17",
                    "season": 1,
                    "episode": 1,
                    "publishDate": "2024-03-10T00:00:00Z",
                    "fileSize": 1,
                    "audioUrl": "http://elsewhere.example/x.mp3",
                })),
                Some(AudioPart::mp3(vec![1u8; 3000])),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        let body = &res.body;
        assert_ne!(body["id"], "client-chosen");
        assert_eq!(body["podcastId"], podcast_id.as_str());
        assert_eq!(body["title"], "Pilot");
        assert_eq!(body["duration"], "00:42:17");
        assert_eq!(body["season"], 1);
        assert_eq!(body["episode"], 1);
        assert_eq!(body["fileSize"], 3000);
        assert_eq!(body["mimeType"], "audio/mpeg");
        assert_eq!(body["audioFileName"], "episode.mp3");
        assert_eq!(body["downloadCount"], 0);
        assert_eq!(body["publishDate"], "2024-03-10T00:00:00Z");
        assert!(body.get("audioObject").is_none());

        let object = app.object_name(body["audioUrl"].as_str().unwrap());
        assert!(object.starts_with(&format!("{podcast_id}/{}/", body["id"].as_str().unwrap())));
        assert!(app.object_exists(&object).await);

        let fetched = app
            .get_with_token(
                &routes::episode(&podcast_id, body["id"].as_str().unwrap()),
                &token,
            )
            .await;
        assert_eq!(fetched.status, 200);
        assert_eq!(&fetched.body, body);
    }

    #[tokio::test]
    async fn audio_url_is_served() {
        let app = TestApp::spawn().await;
        let token = app.token_for("alice");
        let podcast_id = app.create_podcast(&token, "Show").await;
        let episode = app
            .create_episode(&podcast_id, json!({ "title": "Pilot" }), b"ID3 bytes".to_vec(), &token)
            .await;

        let res = app
            .get_bytes(episode["audioUrl"].as_str().unwrap(), None)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.bytes, b"ID3 bytes");
    }

    #[tokio::test]
    async fn missing_file_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.token_for("alice");
        let podcast_id = app.create_podcast(&token, "Show").await;

        let res = app
            .post_episode(&podcast_id, Some(&json!({ "title": "Silent" })), None, &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        let list = app.get_with_token(&routes::episodes(&podcast_id), &token).await;
        assert_eq!(list.body, json!([]));
    }

    #[tokio::test]
    async fn invalid_metadata_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.token_for("alice");
        let podcast_id = app.create_podcast(&token, "Show").await;

        let res = app
            .post_episode(
                &podcast_id,
                Some(&json!({ "title": "Bad", "duration": "forever" })),
                Some(AudioPart::mp3(b"abc".to_vec())),
                &token,
            )
            .await;
        assert_eq!(res.status, 400);

        let res = app
            .post_episode(
                &podcast_id,
                Some(&json!({ "title": "" })),
                Some(AudioPart::mp3(b"abc".to_vec())),
                &token,
            )
            .await;
        assert_eq!(res.status, 400);

        let list = app.get_with_token(&routes::episodes(&podcast_id), &token).await;
        assert_eq!(list.body, json!([]));
    }

    #[tokio::test]
    async fn oversized_file_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.token_for("alice");
        let podcast_id = app.create_podcast(&token, "Show").await;

        let res = app
            .post_episode(
                &podcast_id,
                Some(&json!({ "title": "Huge" })),
                Some(AudioPart::mp3(vec![0u8; MAX_OBJECT_SIZE as usize + 1])),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        let list = app.get_with_token(&routes::episodes(&podcast_id), &token).await;
        assert_eq!(list.body, json!([]));
    }

    #[tokio::test]
    async fn foreign_podcast_is_not_found() {
        let app = TestApp::spawn().await;
        let alice = app.token_for("alice");
        let bob = app.token_for("bob");
        let podcast_id = app.create_podcast(&alice, "Show").await;

        let res = app
            .post_episode(
                &podcast_id,
                Some(&json!({ "title": "Intruder" })),
                Some(AudioPart::mp3(b"abc".to_vec())),
                &bob,
            )
            .await;

        assert_eq!(res.status, 404);
        let list = app.get_with_token(&routes::episodes(&podcast_id), &alice).await;
        assert_eq!(list.body, json!([]));
    }

    #[tokio::test]
    async fn mime_type_follows_upload() {
        let app = TestApp::spawn().await;
        let token = app.token_for("alice");
        let podcast_id = app.create_podcast(&token, "Show").await;

        let res = app
            .post_episode(
                &podcast_id,
                Some(&json!({ "title": "Ogg" })),
                Some(AudioPart {
                    file_name: "take.ogg",
                    mime: "audio/ogg",
                    bytes: b"OggS".to_vec(),
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["mimeType"], "audio/ogg");
        assert!(res.body["audioUrl"].as_str().unwrap().ends_with(".ogg"));
    }
}

mod episode_list {
    use super::*;

    #[tokio::test]
    async fn lists_by_publish_date() {
        let app = TestApp::spawn().await;
        let token = app.token_for("alice");
        let podcast_id = app.create_podcast(&token, "Show").await;
        app.create_episode(
            &podcast_id,
            json!({ "title": "Later", "publishDate": "2024-05-01T00:00:00Z" }),
            b"b".to_vec(),
            &token,
        )
        .await;
        app.create_episode(
            &podcast_id,
            json!({ "title": "Earlier", "publishDate": "2024-01-01T00:00:00Z" }),
            b"a".to_vec(),
            &token,
        )
        .await;

        let res = app.get_with_token(&routes::episodes(&podcast_id), &token).await;

        assert_eq!(res.status, 200);
        let titles: Vec<&str> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, ["Earlier", "Later"]);
    }
}

mod episode_update {
    use super::*;

    #[tokio::test]
    async fn update_changes_metadata_only() {
        let app = TestApp::spawn().await;
        let token = app.token_for("alice");
        let podcast_id = app.create_podcast(&token, "Show").await;
        let episode = app
            .create_episode(&podcast_id, json!({ "title": "Pilot" }), b"abc".to_vec(), &token)
            .await;
        let episode_id = episode["id"].as_str().unwrap();

        let res = app
            .put_with_token(
                &routes::episode(&podcast_id, episode_id),
                &json!({
                    "title": "Pilot (remastered)",
                    "explicit": true,
                    "duration": 90,
                    "audioUrl": "http://elsewhere.example/x.mp3",
                    "fileSize": 99,
                    "downloadCount": 1000,
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["title"], "Pilot (remastered)");
        assert_eq!(res.body["explicit"], true);
        assert_eq!(res.body["duration"], "00:01:30");
        assert_eq!(res.body["audioUrl"], episode["audioUrl"]);
        assert_eq!(res.body["fileSize"], 3);
        assert_eq!(res.body["downloadCount"], 0);
        assert_eq!(res.body["createdAt"], episode["createdAt"]);
    }

    #[tokio::test]
    async fn update_other_users_episode_is_not_found() {
        let app = TestApp::spawn().await;
        let alice = app.token_for("alice");
        let bob = app.token_for("bob");
        let podcast_id = app.create_podcast(&alice, "Show").await;
        let episode = app
            .create_episode(&podcast_id, json!({ "title": "Pilot" }), b"abc".to_vec(), &alice)
            .await;
        let path = routes::episode(&podcast_id, episode["id"].as_str().unwrap());

        let res = app.put_with_token(&path, &json!({ "title": "Mine" }), &bob).await;
        assert_eq!(res.status, 404);
        let res = app.get_with_token(&path, &bob).await;
        assert_eq!(res.status, 404);
        let res = app.delete_with_token(&path, &bob).await;
        assert_eq!(res.status, 404);

        let res = app.get_with_token(&path, &alice).await;
        assert_eq!(res.body["title"], "Pilot");
    }
}

mod episode_audio {
    use super::*;

    #[tokio::test]
    async fn owner_can_download_audio() {
        let app = TestApp::spawn().await;
        let token = app.token_for("alice");
        let podcast_id = app.create_podcast(&token, "Show").await;
        let episode = app
            .create_episode(&podcast_id, json!({ "title": "Pilot" }), b"0123456789".to_vec(), &token)
            .await;
        let episode_id = episode["id"].as_str().unwrap();

        let res = app
            .get_bytes(&routes::episode_audio(&podcast_id, episode_id), Some(&token))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.bytes, b"0123456789");
        assert_eq!(res.headers["content-type"], "audio/mpeg");
        assert_eq!(res.headers["content-length"], "10");
        assert!(
            res.headers["content-disposition"]
                .to_str()
                .unwrap()
                .contains("episode.mp3")
        );

        let fetched = app
            .get_with_token(&routes::episode(&podcast_id, episode_id), &token)
            .await;
        assert_eq!(fetched.body["downloadCount"], 0);
    }

    #[tokio::test]
    async fn audio_url_endpoint_matches_episode() {
        let app = TestApp::spawn().await;
        let token = app.token_for("alice");
        let podcast_id = app.create_podcast(&token, "Show").await;
        let episode = app
            .create_episode(&podcast_id, json!({ "title": "Pilot" }), b"abc".to_vec(), &token)
            .await;

        let res = app
            .get_with_token(
                &routes::episode_audio_url(&podcast_id, episode["id"].as_str().unwrap()),
                &token,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["url"], episode["audioUrl"]);
    }

    #[tokio::test]
    async fn replace_audio_swaps_file() {
        let app = TestApp::spawn().await;
        let token = app.token_for("alice");
        let podcast_id = app.create_podcast(&token, "Show").await;
        let episode = app
            .create_episode(&podcast_id, json!({ "title": "Pilot" }), b"old".to_vec(), &token)
            .await;
        let episode_id = episode["id"].as_str().unwrap();
        let old_object = app.object_name(episode["audioUrl"].as_str().unwrap());

        let res = app
            .put_episode_audio(
                &podcast_id,
                episode_id,
                Some(AudioPart {
                    file_name: "final.m4a",
                    mime: "audio/mp4",
                    bytes: b"brand new".to_vec(),
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["fileSize"], 9);
        assert_eq!(res.body["mimeType"], "audio/mp4");
        assert_eq!(res.body["audioFileName"], "final.m4a");
        assert_ne!(res.body["audioUrl"], episode["audioUrl"]);
        assert!(!app.object_exists(&old_object).await);

        let audio = app
            .get_bytes(&routes::episode_audio(&podcast_id, episode_id), Some(&token))
            .await;
        assert_eq!(audio.bytes, b"brand new");
    }

    #[tokio::test]
    async fn other_users_cannot_touch_audio() {
        let app = TestApp::spawn().await;
        let alice = app.token_for("alice");
        let bob = app.token_for("bob");
        let podcast_id = app.create_podcast(&alice, "Show").await;
        let episode = app
            .create_episode(&podcast_id, json!({ "title": "Pilot" }), b"abc".to_vec(), &alice)
            .await;
        let episode_id = episode["id"].as_str().unwrap();
        let object = app.object_name(episode["audioUrl"].as_str().unwrap());

        let res = app
            .get_bytes(&routes::episode_audio(&podcast_id, episode_id), Some(&bob))
            .await;
        assert_eq!(res.status, 404);
        let res = app
            .get_with_token(&routes::episode_audio_url(&podcast_id, episode_id), &bob)
            .await;
        assert_eq!(res.status, 404);
        let res = app
            .put_episode_audio(
                &podcast_id,
                episode_id,
                Some(AudioPart::mp3(b"intruder".to_vec())),
                &bob,
            )
            .await;
        assert_eq!(res.status, 404);
        let res = app.get_with_token(&routes::episodes(&podcast_id), &bob).await;
        assert_eq!(res.status, 404);

        assert!(app.object_exists(&object).await);
        let audio = app
            .get_bytes(&routes::episode_audio(&podcast_id, episode_id), Some(&alice))
            .await;
        assert_eq!(audio.bytes, b"abc");
    }

    #[tokio::test]
    async fn replace_audio_requires_file() {
        let app = TestApp::spawn().await;
        let token = app.token_for("alice");
        let podcast_id = app.create_podcast(&token, "Show").await;
        let episode = app
            .create_episode(&podcast_id, json!({ "title": "Pilot" }), b"old".to_vec(), &token)
            .await;

        let res = app
            .put_episode_audio(&podcast_id, episode["id"].as_str().unwrap(), None, &token)
            .await;

        assert_eq!(res.status, 400);
    }
}

mod episode_delete {
    use super::*;

    #[tokio::test]
    async fn delete_removes_episode_and_audio() {
        let app = TestApp::spawn().await;
        let token = app.token_for("alice");
        let podcast_id = app.create_podcast(&token, "Show").await;
        let episode = app
            .create_episode(&podcast_id, json!({ "title": "Pilot" }), b"abc".to_vec(), &token)
            .await;
        let path = routes::episode(&podcast_id, episode["id"].as_str().unwrap());
        let object = app.object_name(episode["audioUrl"].as_str().unwrap());

        let res = app.delete_with_token(&path, &token).await;
        assert_eq!(res.status, 204);

        assert_eq!(app.get_with_token(&path, &token).await.status, 404);
        assert_eq!(app.delete_with_token(&path, &token).await.status, 404);
        assert!(!app.object_exists(&object).await);
        assert_eq!(
            app.get_with_token(&routes::podcast(&podcast_id), &token)
                .await
                .status,
            200
        );
    }
}
