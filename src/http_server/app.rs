use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use color_eyre::eyre::{Context, eyre};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::{
    database::Database,
    http_server::{routes, state::AppState},
};

pub struct HttpServerConfig {
    pub port: u16,
    pub database: Database,
}

pub async fn start(config: HttpServerConfig) -> color_eyre::Result<()> {
    let app_state = Arc::new(AppState {
        db: Arc::new(config.database),
    });

    let app = Router::new()
        .route("/", get(routes::home::index))
        .route("/venues", get(routes::venues::index))
        .route("/venues/search", post(routes::venues::search))
        .route(
            "/venues/create",
            get(routes::venues::create_form).post(routes::venues::create_submit),
        )
        .route(
            "/venues/{venue_id}",
            get(routes::venues::detail).delete(routes::venues::delete),
        )
        .route(
            "/venues/{venue_id}/edit",
            get(routes::venues::edit_form).post(routes::venues::edit_submit),
        )
        .route("/artists", get(routes::artists::index))
        .route("/artists/search", post(routes::artists::search))
        .route(
            "/artists/create",
            get(routes::artists::create_form).post(routes::artists::create_submit),
        )
        .route("/artists/{artist_id}", get(routes::artists::detail))
        .route(
            "/artists/{artist_id}/edit",
            get(routes::artists::edit_form).post(routes::artists::edit_submit),
        )
        .route("/shows", get(routes::shows::index))
        .route(
            "/shows/create",
            get(routes::shows::create_form).post(routes::shows::create_submit),
        )
        .fallback(routes::not_found)
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .wrap_err_with(|| eyre!("Failed to bind to port {}", config.port))?;
    log::info!("Listening on port {}", config.port);
    axum::serve(listener, app)
        .await
        .wrap_err("Failed to start HTTP server")?;

    Ok(())
}
