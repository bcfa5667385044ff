//! Process startup: tracing, configuration, database, HTTP server.

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, DatabaseConnection};
use tracing::info;

use crate::api::servers::{app_state::AppState, rest};
use crate::bootstrap::config::Config;
use crate::bootstrap::errors::AppError;
use crate::modules::auth::jwt;
use crate::modules::media::FsThumbnailStore;
use crate::modules::profiles;

pub async fn run() -> Result<(), AppError> {
    init_tracing();

    let config = Config::from_env()?;
    info!("Configuration loaded. Initializing server...");

    jwt::init_jwt_secret(&config.auth.jwt_secret);

    let db = setup_database(&config).await?;

    // Placeholder profiles whose entries were deleted accumulate over
    // time; sweep them on startup.
    if let Err(err) = profiles::delete_orphans(&db).await {
        tracing::warn!(error = %err, "orphan profile sweep failed");
    }

    let media = Arc::new(FsThumbnailStore::new(config.content.media_dir.clone()));

    let app_state = AppState::new(db, config.clone(), media);
    rest::start(app_state, &config).await
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(true)
        .init();
}

async fn setup_database(config: &Config) -> Result<DatabaseConnection, AppError> {
    info!("Setting up database");

    let db_config = &config.db;
    let mut opt = ConnectOptions::new(&db_config.url);

    opt.max_connections(db_config.max_connections)
        .min_connections(db_config.min_connections)
        .connect_timeout(db_config.connect_timeout)
        .idle_timeout(db_config.idle_timeout)
        .sqlx_logging(db_config.logging_enabled);

    let connection = sea_orm::Database::connect(opt).await?;

    info!("Running database migrations...");
    Migrator::up(&connection, None).await?;

    Ok(connection)
}
