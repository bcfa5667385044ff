//! REST API router configuration.
//!
//! Route definitions and server startup live here; handler
//! implementations are in their respective submodules. The same route
//! set is mounted once per API version with the version injected as a
//! request extension, so version parsing never reaches the handlers.

mod creators;
mod entries;
mod health;
mod profiles;
mod taxonomy;

use axum::routing::{get, put};
use axum::{Extension, Router};
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN};
use http::{HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::api::servers::app_state::AppState;
use crate::bootstrap::config::Config;
use crate::bootstrap::errors::AppError;
use crate::modules::projection::ApiVersion;

/// Build the full router. The unversioned mount serves v1 for legacy
/// clients; unknown version segments fall through to 404.
pub fn build_router(app_state: AppState, config: &Config) -> Router {
    let cors = build_cors_layer(config);

    let mounts = [
        ("/api/pulse", ApiVersion::V1),
        ("/api/pulse/v1", ApiVersion::V1),
        ("/api/pulse/v2", ApiVersion::V2),
        ("/api/pulse/v3", ApiVersion::V3),
    ];

    let mut router: Router<AppState> = Router::new();
    for (prefix, version) in mounts {
        router = router.nest(prefix, api_routes().layer(Extension(version)));
    }

    router.with_state(app_state).layer(cors)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // Health
        .route("/health", get(health::check))
        // Entries
        .route("/entries", get(entries::list).post(entries::create))
        .route(
            "/entries/bookmarks",
            get(entries::list_bookmarked).post(entries::bulk_bookmark),
        )
        .route(
            "/entries/moderation-states",
            get(entries::moderation_states),
        )
        .route("/entries/{id}", get(entries::get))
        .route(
            "/entries/{id}/moderate/{state_id}",
            put(entries::moderate),
        )
        .route("/entries/{id}/feature", put(entries::feature))
        .route("/entries/{id}/bookmark", put(entries::bookmark))
        // Profiles
        .route("/profiles", get(profiles::list))
        .route("/profiles/{id}", get(profiles::get))
        .route(
            "/myprofile",
            get(profiles::my_profile).put(profiles::update_my_profile),
        )
        // Creators (legacy autocomplete)
        .route("/creators", get(creators::list))
        // Taxonomies
        .route("/tags", get(taxonomy::tags))
        .route("/issues", get(taxonomy::issues))
        .route("/helptypes", get(taxonomy::help_types))
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();

    let mut cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ORIGIN, ACCEPT, CONTENT_TYPE, AUTHORIZATION])
        .max_age(std::time::Duration::from_secs(3600));

    if config.cors.allow_credentials {
        cors = cors.allow_credentials(true);
    }

    cors
}

/// Start the REST server.
pub async fn start(app_state: AppState, config: &Config) -> Result<(), AppError> {
    let app = build_router(app_state, config);
    let bind_addr = format!("0.0.0.0:{}", config.server.rest_port);

    info!("Starting REST server on {}", &bind_addr);
    info!("CORS allowed origins: {:?}", config.cors.allowed_origins);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
