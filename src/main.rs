use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{Request, Response},
    middleware::{self},
    Router,
};
use surrealdb::{engine::any::Any, Surreal};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::Span;
use uuid::Uuid;

use crate::{
    auth::token_service::AuthConfig,
    config::AppConfig,
    middlewares::mw_rate_limit::RateLimiter,
    routes::{
        album_routes::AlbumRoutes, artist_request_routes::ArtistRequestRoutes,
        auth_routes::AuthRoutes, playlist_routes::PlaylistRoutes, song_routes::SongRoutes,
        user_routes::UserRoutes,
    },
    services::storage_service::{LocalObjectStorage, ObjectStorage},
};

pub use self::error::{Error, Result};

mod auth;
mod config;
mod controllers;
mod db;
mod error;
mod helpers;
mod middlewares;
mod models;
mod routes;
mod services;
#[cfg(test)]
mod test_utils;
mod validators;

#[derive(Clone)]
struct AppState {
    db: Surreal<Any>,
    auth_config: AuthConfig,
    storage: Arc<dyn ObjectStorage>,
    rate_limiter: RateLimiter,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    init_tracing();

    tracing::info!("Starting Music Streaming API...");

    let config = AppConfig::from_env()?;
    let db = db::connect(&config.db).await?;

    let auth_config = AuthConfig::from_env()?;
    tracing::info!("Auth configuration loaded");

    let storage = LocalObjectStorage::new(config.upload_dir.clone(), config.public_base_url.clone());
    storage.initialize().await?;
    tracing::info!("Object storage ready at {}", storage.root().display());

    let app_state = AppState {
        db,
        auth_config,
        storage: Arc::new(storage),
        rate_limiter: RateLimiter::new(),
    };

    let routes_api = Router::new()
        .nest("/auth", AuthRoutes::routes())
        .nest("/songs", SongRoutes::routes())
        .nest("/artist-requests", ArtistRequestRoutes::routes())
        .nest("/users", UserRoutes::routes())
        .nest("/playlists", PlaylistRoutes::routes())
        .nest("/albums", AlbumRoutes::routes())
        // Layers run bottom-up: the ctx is resolved before rate limiting.
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            middlewares::mw_rate_limit::rate_limit_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            middlewares::mw_auth::mw_ctx_resolver,
        ))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes));

    let routes_all = Router::new()
        .nest("/api", routes_api)
        .nest_service("/uploads", ServeDir::new(&config.upload_dir))
        .with_state(app_state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4();
                    tracing::info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    tracing::info!("{} {}", request.method(), request.uri().path());
                })
                .on_response(
                    |response: &Response<Body>, latency: Duration, _span: &Span| {
                        let status = response.status();
                        let latency_ms = latency.as_millis();

                        match status.as_u16() {
                            200..=399 => tracing::info!("{} ({}ms)", status, latency_ms),
                            400..=499 => tracing::warn!("{} ({}ms)", status, latency_ms),
                            _ => tracing::error!("{} ({}ms)", status, latency_ms),
                        }
                    },
                ),
        )
        .layer(CorsLayer::very_permissive());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;

    tracing::info!("Listening on http://{}", config.bind_addr);

    axum::serve(
        listener,
        routes_all.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "music_streaming_api=debug,tower_http=info,info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}
