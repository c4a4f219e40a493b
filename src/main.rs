use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use std::sync::Arc;
use std::time::Duration;

mod api;
mod auth;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod models;
mod routes;
mod state;
mod store;
mod utils;
mod workflow;

use config::Config;
use db::init_db;

use crate::docs::ApiDoc;
use crate::state::AppState;
use crate::store::mysql::{
    MySqlAuditStore, MySqlLeaveCatalog, MySqlLeaveLedger, MySqlNotificationStore,
};
use crate::utils::leave_type_cache::LeaveTypeCache;
use tracing::{error, info};
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "HRM leave workflow"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url, config.db_max_connections).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let cache = LeaveTypeCache::new(Duration::from_secs(config.leave_type_cache_ttl_secs));

    let warmup_cache = cache.clone();
    let warmup_pool = pool.clone();
    actix_web::rt::spawn(async move {
        match warmup_cache.warmup(&warmup_pool, 250).await {
            Ok(loaded) => info!(loaded, "Leave type cache warmed up"),
            Err(e) => error!(error = ?e, "Failed to warmup leave type cache"),
        }
    });

    let state = AppState::new(
        Arc::new(MySqlLeaveLedger::new(pool.clone())),
        Arc::new(MySqlLeaveCatalog::new(pool.clone(), cache)),
        Arc::new(MySqlNotificationStore::new(pool.clone())),
        Arc::new(MySqlAuditStore::new(pool.clone())),
    );
    let effects = state.effects.clone();

    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        let state = state.clone();
        let config = config.clone();

        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard matches JS/CSS assets
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(config.clone()))
            .configure(|cfg| state.register(cfg))
            .service(index)
            .configure(|cfg| routes::configure(cfg, config))
    })
    .bind(server_addr)?
    .run()
    .await?;

    // Drain notifications and audit rows queued by the last requests.
    effects.flush().await;
    info!("Server stopped");

    Ok(())
}
