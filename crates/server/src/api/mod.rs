//! API module providing the HTTP surface of the status page.
//!
//! This module is organized into submodules:
//! - `site` - Public pages (homepage, service timelines, documentation)
//! - `profile` - Admin-only OAuth profile linking (/profile, /profile/verify)
//! - `health` - Health check endpoint (/healthz)
//! - `openapi` - OpenAPI/Utoipa configuration

pub mod health;
pub mod openapi;
pub mod profile;
pub mod site;

pub use health::MISC_TAG;
pub use profile::PROFILE_TAG;
pub use site::SITE_TAG;

use crate::AppResources;
use axum::routing::get;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_redoc::{Redoc, Servable};

/// Builds the full application router. Shared between the binary and the
/// integration tests.
pub fn build_router(resources: AppResources) -> axum::Router {
    let (router, api) = OpenApiRouter::with_openapi(openapi::ApiDoc::openapi())
        .routes(routes!(site::home))
        .routes(routes!(site::documentation))
        .routes(routes!(site::service_timeline))
        .routes(routes!(profile::profile))
        .routes(routes!(profile::verify))
        .routes(routes!(health::health))
        .split_for_parts();

    // The dated timeline variants share the documented handler's response
    // shape; register them as plain routes instead of documenting each
    // permutation separately.
    let router = router
        .route("/services/{slug}/{year}", get(site::service_timeline_year))
        .route(
            "/services/{slug}/{year}/{month}",
            get(site::service_timeline_month),
        )
        .route(
            "/services/{slug}/{year}/{month}/{day}",
            get(site::service_timeline_day),
        );

    router
        .merge(Redoc::with_url("/api-docs", api))
        .fallback(site::not_found)
        .layer(axum::Extension(resources))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Starts the web server with all configured routes.
#[tracing::instrument(skip(resources))]
pub async fn start_webserver(resources: AppResources) -> color_eyre::Result<()> {
    let listen_address = resources.config.listen_address.clone();
    let router = build_router(resources);

    let listener = tokio::net::TcpListener::bind(&listen_address).await?;
    tracing::info!(addr = %listen_address, "Server running");
    axum::serve(listener, router)
        .await
        .map_err(|e| color_eyre::Report::msg(format!("Failed to start server: {e}")))?;

    Ok(())
}
