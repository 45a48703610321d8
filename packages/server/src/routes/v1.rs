use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers::{episode, listen, media, podcast};
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/podcasts", podcast_routes(config))
        .nest("/listen", listen_routes())
}

fn podcast_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let crud = OpenApiRouter::new()
        .routes(routes!(podcast::list_podcasts, podcast::create_podcast))
        .routes(routes!(
            podcast::get_podcast,
            podcast::update_podcast,
            podcast::delete_podcast
        ))
        .routes(routes!(podcast::get_podcast_stats))
        .routes(routes!(
            episode::get_episode,
            episode::update_episode,
            episode::delete_episode
        ))
        .routes(routes!(episode::get_episode_audio_url));

    let upload = OpenApiRouter::new()
        .routes(routes!(episode::list_episodes, episode::create_episode))
        .routes(routes!(
            episode::download_episode_audio,
            episode::replace_episode_audio
        ))
        .layer(media::audio_body_limit(config.storage.max_object_size));

    crud.merge(upload)
}

fn listen_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(listen::listen))
}
