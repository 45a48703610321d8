use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::handlers::media::{EpisodeForm, audio_response};
use crate::models::Episode;
use crate::models::shared::UrlResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/{podcast_id}/episodes",
    tag = "Episodes",
    operation_id = "listEpisodes",
    summary = "List a podcast's episodes",
    description = "Episodes ordered by publish date, oldest first.",
    params(("podcast_id" = String, Path, description = "Podcast ID")),
    responses(
        (status = 200, description = "Episodes", body = Vec<Episode>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Podcast not found or not owned by the caller (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_episodes(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(podcast_id): Path<String>,
) -> Result<Json<Vec<Episode>>, AppError> {
    Ok(Json(
        state
            .service
            .list_episodes(&podcast_id, &auth_user.user_id)
            .await?,
    ))
}

#[utoipa::path(
    post,
    path = "/{podcast_id}/episodes",
    tag = "Episodes",
    operation_id = "createEpisode",
    summary = "Create an episode with its audio",
    description = "Multipart body: a `metadata` part holding the episode JSON and a required \
        `file` part holding the audio. The audio is stored first; if that fails no episode \
        is created. Audio-derived fields in the metadata are ignored.",
    params(("podcast_id" = String, Path, description = "Podcast ID")),
    request_body(content_type = "multipart/form-data", description = "Episode metadata and audio file"),
    responses(
        (status = 201, description = "Episode created", body = Episode),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Podcast not found or not owned by the caller (NOT_FOUND)", body = ErrorBody),
        (status = 502, description = "Audio storage failed (STORAGE_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart))]
pub async fn create_episode(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(podcast_id): Path<String>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = EpisodeForm::read(multipart, state.config.storage.max_object_size).await?;
    let metadata = form.metadata.unwrap_or_default();
    let (upload, _spool) = match form.audio {
        Some(received) => (Some(received.upload), Some(received.spool)),
        None => (None, None),
    };

    let episode = state
        .service
        .create_episode(&podcast_id, metadata, upload, &auth_user.user_id)
        .await?;

    Ok((StatusCode::CREATED, Json(episode)))
}

#[utoipa::path(
    get,
    path = "/{podcast_id}/episodes/{episode_id}",
    tag = "Episodes",
    operation_id = "getEpisode",
    summary = "Get an episode",
    params(
        ("podcast_id" = String, Path, description = "Podcast ID"),
        ("episode_id" = String, Path, description = "Episode ID"),
    ),
    responses(
        (status = 200, description = "Episode", body = Episode),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Episode not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn get_episode(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((podcast_id, episode_id)): Path<(String, String)>,
) -> Result<Json<Episode>, AppError> {
    Ok(Json(
        state
            .service
            .get_episode(&podcast_id, &episode_id, &auth_user.user_id)
            .await?,
    ))
}

#[utoipa::path(
    put,
    path = "/{podcast_id}/episodes/{episode_id}",
    tag = "Episodes",
    operation_id = "updateEpisode",
    summary = "Update episode metadata",
    description = "Replaces the editable metadata. Audio fields, `downloadCount` and ids are \
        not changed; use the audio endpoint to swap the file.",
    params(
        ("podcast_id" = String, Path, description = "Podcast ID"),
        ("episode_id" = String, Path, description = "Episode ID"),
    ),
    request_body = Episode,
    responses(
        (status = 200, description = "Episode updated", body = Episode),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Episode not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn update_episode(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((podcast_id, episode_id)): Path<(String, String)>,
    AppJson(payload): AppJson<Episode>,
) -> Result<Json<Episode>, AppError> {
    Ok(Json(
        state
            .service
            .update_episode(&podcast_id, &episode_id, payload, &auth_user.user_id)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/{podcast_id}/episodes/{episode_id}",
    tag = "Episodes",
    operation_id = "deleteEpisode",
    summary = "Delete an episode",
    description = "Deletes the episode record, then its stored audio.",
    params(
        ("podcast_id" = String, Path, description = "Podcast ID"),
        ("episode_id" = String, Path, description = "Episode ID"),
    ),
    responses(
        (status = 204, description = "Episode deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Episode not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_episode(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((podcast_id, episode_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    state
        .service
        .delete_episode(&podcast_id, &episode_id, &auth_user.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/{podcast_id}/episodes/{episode_id}/audio",
    tag = "Episodes",
    operation_id = "downloadEpisodeAudio",
    summary = "Stream an episode's audio",
    description = "Owner download. Does not count towards `downloadCount`.",
    params(
        ("podcast_id" = String, Path, description = "Podcast ID"),
        ("episode_id" = String, Path, description = "Episode ID"),
    ),
    responses(
        (status = 200, description = "Audio content"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Episode or audio not found (NOT_FOUND)", body = ErrorBody),
        (status = 502, description = "Audio storage failed (STORAGE_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn download_episode_audio(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((podcast_id, episode_id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let audio = state
        .service
        .get_episode_audio(&podcast_id, &episode_id, &auth_user.user_id)
        .await?;
    audio_response(audio)
}

#[utoipa::path(
    put,
    path = "/{podcast_id}/episodes/{episode_id}/audio",
    tag = "Episodes",
    operation_id = "replaceEpisodeAudio",
    summary = "Replace an episode's audio",
    description = "Multipart body with a required `file` part. The new audio is stored and \
        recorded before the previous file is removed.",
    params(
        ("podcast_id" = String, Path, description = "Podcast ID"),
        ("episode_id" = String, Path, description = "Episode ID"),
    ),
    request_body(content_type = "multipart/form-data", description = "Replacement audio file"),
    responses(
        (status = 200, description = "Episode with new audio", body = Episode),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Episode not found (NOT_FOUND)", body = ErrorBody),
        (status = 502, description = "Audio storage failed (STORAGE_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart))]
pub async fn replace_episode_audio(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((podcast_id, episode_id)): Path<(String, String)>,
    multipart: Multipart,
) -> Result<Json<Episode>, AppError> {
    let form = EpisodeForm::read(multipart, state.config.storage.max_object_size).await?;
    let received = form
        .audio
        .ok_or_else(|| AppError::Validation("Missing 'file' part".into()))?;

    let episode = state
        .service
        .replace_episode_audio(
            &podcast_id,
            &episode_id,
            received.upload,
            &auth_user.user_id,
        )
        .await?;
    drop(received.spool);

    Ok(Json(episode))
}

#[utoipa::path(
    get,
    path = "/{podcast_id}/episodes/{episode_id}/audio-url",
    tag = "Episodes",
    operation_id = "getEpisodeAudioUrl",
    summary = "Resolve the audio locator",
    params(
        ("podcast_id" = String, Path, description = "Podcast ID"),
        ("episode_id" = String, Path, description = "Episode ID"),
    ),
    responses(
        (status = 200, description = "Audio URL", body = UrlResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Episode not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn get_episode_audio_url(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((podcast_id, episode_id)): Path<(String, String)>,
) -> Result<Json<UrlResponse>, AppError> {
    let url = state
        .service
        .get_episode_audio_url(&podcast_id, &episode_id, &auth_user.user_id)
        .await?;
    Ok(Json(UrlResponse { url }))
}
