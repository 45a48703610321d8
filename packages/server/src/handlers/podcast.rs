use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::{Podcast, PodcastStats};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Podcasts",
    operation_id = "listPodcasts",
    summary = "List the caller's podcasts",
    description = "Returns every podcast owned by the caller, oldest first.",
    responses(
        (status = 200, description = "Podcasts owned by the caller", body = Vec<Podcast>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_podcasts(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Podcast>>, AppError> {
    Ok(Json(state.service.list_podcasts(&auth_user.user_id).await?))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Podcasts",
    operation_id = "createPodcast",
    summary = "Create a podcast",
    description = "Creates a podcast owned by the caller. `id`, `ownerId`, timestamps and \
        `rssUrl` in the body are ignored and assigned by the server.",
    request_body = Podcast,
    responses(
        (status = 201, description = "Podcast created", body = Podcast),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(title = %payload.title))]
pub async fn create_podcast(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<Podcast>,
) -> Result<impl IntoResponse, AppError> {
    let podcast = state
        .service
        .create_podcast(payload, &auth_user.user_id)
        .await?;

    Ok((StatusCode::CREATED, Json(podcast)))
}

#[utoipa::path(
    get,
    path = "/{podcast_id}",
    tag = "Podcasts",
    operation_id = "getPodcast",
    summary = "Get a podcast",
    params(("podcast_id" = String, Path, description = "Podcast ID")),
    responses(
        (status = 200, description = "Podcast", body = Podcast),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Podcast not found or not owned by the caller (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn get_podcast(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(podcast_id): Path<String>,
) -> Result<Json<Podcast>, AppError> {
    Ok(Json(
        state
            .service
            .get_podcast(&podcast_id, &auth_user.user_id)
            .await?,
    ))
}

#[utoipa::path(
    put,
    path = "/{podcast_id}",
    tag = "Podcasts",
    operation_id = "updatePodcast",
    summary = "Update a podcast",
    description = "Replaces the editable fields. `id`, `ownerId` and `createdAt` never change.",
    params(("podcast_id" = String, Path, description = "Podcast ID")),
    request_body = Podcast,
    responses(
        (status = 200, description = "Podcast updated", body = Podcast),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Podcast not found or not owned by the caller (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn update_podcast(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(podcast_id): Path<String>,
    AppJson(payload): AppJson<Podcast>,
) -> Result<Json<Podcast>, AppError> {
    Ok(Json(
        state
            .service
            .update_podcast(&podcast_id, payload, &auth_user.user_id)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/{podcast_id}",
    tag = "Podcasts",
    operation_id = "deletePodcast",
    summary = "Delete a podcast",
    description = "Deletes the podcast, all of its episodes and their stored audio.",
    params(("podcast_id" = String, Path, description = "Podcast ID")),
    responses(
        (status = 204, description = "Podcast deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Podcast not found or not owned by the caller (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_podcast(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(podcast_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .service
        .delete_podcast(&podcast_id, &auth_user.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/{podcast_id}/stats",
    tag = "Podcasts",
    operation_id = "getPodcastStats",
    summary = "Aggregate podcast statistics",
    description = "Download, episode and storage totals. `downloadsByMonth` buckets each \
        episode's current download count under its publish month.",
    params(("podcast_id" = String, Path, description = "Podcast ID")),
    responses(
        (status = 200, description = "Statistics", body = PodcastStats),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Podcast not found or not owned by the caller (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn get_podcast_stats(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(podcast_id): Path<String>,
) -> Result<Json<PodcastStats>, AppError> {
    Ok(Json(
        state
            .service
            .get_podcast_stats(&podcast_id, &auth_user.user_id)
            .await?,
    ))
}
