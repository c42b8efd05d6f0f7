use chat_service::clients::{HttpAssetStore, HttpPostDirectory, HttpProfileDirectory};
use chat_service::presence::PresenceRegistry;
use chat_service::services::{ChatService, EventFanout, NotificationService};
use chat_service::store::{PgConversationStore, PgMessageStore, PgNotificationStore};
use chat_service::{config, db, error, logging, routes, state::AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), error::AppError> {
    logging::init_tracing();
    let cfg = config::Config::from_env()?;

    let db = db::init_pool(&cfg.database_url)
        .await
        .map_err(|e| error::AppError::StartServer(format!("db: {e}")))?;

    // Run embedded migrations (idempotent). The schema must be in sync
    // before we serve traffic.
    db::MIGRATOR
        .run(&db)
        .await
        .map_err(|e| error::AppError::StartServer(format!("database migrations failed: {e}")))?;

    let registry = PresenceRegistry::new();
    let fanout = EventFanout::new(registry.clone());

    let http = reqwest::Client::new();
    let assets = Arc::new(HttpAssetStore::new(
        http.clone(),
        cfg.asset_service_url.clone(),
    ));
    let profiles = Arc::new(HttpProfileDirectory::new(
        http.clone(),
        cfg.profile_service_url.clone(),
    ));
    let posts = Arc::new(HttpPostDirectory::new(http, cfg.post_service_url.clone()));

    let notifications = Arc::new(NotificationService::new(
        Arc::new(PgNotificationStore::new(db.clone())),
        profiles.clone(),
        fanout.clone(),
    ));
    let chat = Arc::new(ChatService::new(
        Arc::new(PgConversationStore::new(db.clone())),
        Arc::new(PgMessageStore::new(db.clone())),
        assets,
        profiles,
        posts,
        notifications.clone(),
        fanout.clone(),
    ));

    let state = AppState {
        registry,
        fanout,
        chat,
        notifications,
    };

    let bind_addr = format!("0.0.0.0:{}", cfg.port);
    tracing::info!(%bind_addr, "starting chat-service");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| error::AppError::StartServer(format!("bind {bind_addr}: {e}")))?;

    axum::serve(listener, routes::build_router(state))
        .await
        .map_err(|e| error::AppError::StartServer(format!("serve: {e}")))?;

    Ok(())
}
