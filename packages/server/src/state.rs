use crate::config::AppConfig;
use crate::service::PodcastService;

#[derive(Clone)]
pub struct AppState {
    pub service: PodcastService,
    pub config: AppConfig,
}
