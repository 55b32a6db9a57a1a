use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fare_server::config::ServerConfig;
use fare_server::notify::{NoopNotifier, Notifier, WebhookNotifier};
use fare_server::service::FareService;
use fare_server::store::{JsonFileStore, MemoryStore};
use fare_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fare_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    let notifier: Arc<dyn Notifier> = if config.webhooks.is_enabled() {
        Arc::new(WebhookNotifier::new(config.webhooks.clone())?)
    } else {
        Arc::new(NoopNotifier)
    };

    let service = match &config.data_path {
        Some(path) => {
            let store = JsonFileStore::open(path)?;
            info!(path = %store.path().display(), "using JSON file store");
            FareService::new(Arc::new(store), config.policy, &config.fare_cache, notifier)
        }
        None => {
            info!("using in-memory store; data is lost on exit");
            FareService::new(
                Arc::new(MemoryStore::new()),
                config.policy,
                &config.fare_cache,
                notifier,
            )
        }
    };

    let app = create_router(AppState::new(service));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, policy = %config.policy, "fare server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
