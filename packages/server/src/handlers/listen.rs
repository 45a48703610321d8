use axum::extract::{Path, State};
use axum::response::Response;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::handlers::media::audio_response;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/{podcast_id}/{episode_id}",
    tag = "Listen",
    operation_id = "listen",
    summary = "Stream an episode to a listener",
    description = "Anonymous playback. Each successful request adds one to the episode's \
        `downloadCount`.",
    params(
        ("podcast_id" = String, Path, description = "Podcast ID"),
        ("episode_id" = String, Path, description = "Episode ID"),
    ),
    responses(
        (status = 200, description = "Audio content"),
        (status = 404, description = "Episode or audio not found (NOT_FOUND)", body = ErrorBody),
        (status = 502, description = "Audio storage failed (STORAGE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn listen(
    State(state): State<AppState>,
    Path((podcast_id, episode_id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let audio = state.service.listen(&podcast_id, &episode_id).await?;
    audio_response(audio)
}
