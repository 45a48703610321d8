use std::sync::Arc;

use anyhow::Context;
use common::storage::ContentStore;
use common::storage::filesystem::FilesystemContentStore;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use podcast_server::config::AppConfig;
use podcast_server::database::init_db;
use podcast_server::repository::{MemoryRepository, PodcastRepository, SqlRepository};
use podcast_server::service::{PodcastService, ServiceSettings};
use podcast_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "podcast_server=info,common=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = AppConfig::load().context("Failed to load config")?;

    let repo: Arc<dyn PodcastRepository> = match &config.database.url {
        Some(url) => {
            let db = init_db(url).await.context("Failed to connect to database")?;
            info!("Using Postgres persistence");
            Arc::new(SqlRepository::new(db))
        }
        None => {
            info!("No database configured, records are kept in memory");
            Arc::new(MemoryRepository::new())
        }
    };

    let store = FilesystemContentStore::new(
        config.storage.root.clone(),
        config.storage.public_base_url.clone(),
        config.storage.max_object_size,
    )
    .await
    .context("Failed to initialize content store")?;
    store
        .ensure_container(&config.storage.audio_container)
        .await
        .context("Failed to create audio container")?;
    info!(root = %config.storage.root.display(), "Content store ready");

    let service = PodcastService::new(
        repo,
        Arc::new(store),
        ServiceSettings {
            audio_container: config.storage.audio_container.clone(),
            public_url: config.server.public_url.clone(),
        },
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = podcast_server::build_router(AppState { service, config });

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
