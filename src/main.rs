use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use media_widgets::{
    config::{Config, LibraryBackend},
    db::{KodiLibrary, MediaLibrary, SnapshotLibrary},
    routes::{create_router, AppState},
    services::{
        random::{RandomSource, ThreadRandom},
        MediaAggregator,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "media_widgets=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let random: Arc<dyn RandomSource> = Arc::new(ThreadRandom);

    let library: Arc<dyn MediaLibrary> = match config.library_backend {
        LibraryBackend::Kodi => Arc::new(KodiLibrary::new(
            config.kodi_url.clone(),
            config.kodi_username.clone(),
            config.kodi_password.clone(),
        )),
        LibraryBackend::Snapshot => {
            let path = config
                .snapshot_path
                .as_deref()
                .context("SNAPSHOT_PATH must be set for the snapshot backend")?;
            Arc::new(SnapshotLibrary::load(path, random.clone()).await?)
        }
    };

    tracing::info!(backend = library.name(), "Media library ready");

    let state = Arc::new(AppState::new(
        MediaAggregator::new(library, random),
        config.widget_defaults(),
    ));
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server running on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
