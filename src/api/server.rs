use std::sync::{Arc, RwLock};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::middleware;
use axum::{Router, extract::Request, response::Response};
use http::{HeaderValue, header};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::api::state::{AppState, spawn_session_sweeper};
use crate::core::{AppConfig, init_tracing};

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

// Chat transcripts and contact details are private to the visitor
async fn set_no_store(request: Request, next: middleware::Next) -> Response {
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

pub fn app(shared_state: Arc<RwLock<AppState>>) -> Router {
    // The widget is embedded in pages served from other origins
    let cors = CorsLayer::permissive();

    Router::new()
        .nest("/api", routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(middleware::from_fn(set_no_store)),
        )
        .with_state(Arc::clone(&shared_state))
}

// Run the server
pub async fn serve(host: String, port: String, config: AppConfig) -> Result<()> {
    init_tracing("debug");

    let session_idle = config.session_idle();
    let app_state = AppState::new(config);
    let shared_state = Arc::new(RwLock::new(app_state));
    let app = app(Arc::clone(&shared_state));

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;

    tracing::debug!("Server started. Listening on {}", listener.local_addr()?);

    // Visitors rarely close their session explicitly
    spawn_session_sweeper(
        Arc::clone(&shared_state),
        SWEEP_INTERVAL.min(session_idle).max(Duration::from_secs(1)),
        session_idle,
    );

    axum::serve(listener, app).await?;

    Ok(())
}
