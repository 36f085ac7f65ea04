use sea_orm::Database;
use tracing::info;

use threads_auth::config::AuthConfig;
use threads_auth::infra::telegram::TelegramGateway;
use threads_auth::router::build_router;
use threads_auth::state::AppState;
use threads_auth_migration::{Migrator, MigratorTrait};
use threads_core::config::Config;
use threads_core::deferred::Deferred;
use threads_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = AuthConfig::from_env();
    config.validate().expect("invalid configuration");

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    if config.run_migrations {
        Migrator::up(&db, None)
            .await
            .expect("failed to apply migrations");
        info!("migrations applied");
    }

    let deferred = Deferred::new();
    let state = AppState {
        db,
        telegram: TelegramGateway::new(&config.telegram_api_url, &config.bot_token),
        deferred: deferred.clone(),
        bot_secret: config.bot_secret.clone(),
        website_url: config.website_base(),
        cookie_secure: config.cookie_secure,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("auth service listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    info!(pending = deferred.pending(), "draining deferred tasks");
    deferred.shutdown().await;
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("received Ctrl+C, shutting down"),
            _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("received Ctrl+C, shutting down");
    }
}
