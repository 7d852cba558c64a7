use crate::config::{AppState, HttpConfig};
use anyhow::Result;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

/// Start the API server
pub async fn serve(addr: &str, config: HttpConfig, state: AppState) -> Result<()> {
    let app = create_router(&config, state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API server listening on {}{}", addr, config.endpoint);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the API router
fn create_router(config: &HttpConfig, state: AppState) -> Router {
    let router = Router::new()
        .route("/api/health", get(health_check))
        .route(&config.endpoint, post(handle_request))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        );

    let router = if config.permissive_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.with_state(state)
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "tessera",
        "version": env!("CARGO_PKG_VERSION"),
        "tools": state.server.registry().len(),
    }))
}

/// Protocol endpoint: `{ method, params? }` in, envelope out.
///
/// The body is taken raw so malformed JSON still gets an envelope.
async fn handle_request(State(state): State<AppState>, body: Bytes) -> Response {
    let envelope = state.server.handle_bytes(&body).await;
    let status =
        StatusCode::from_u16(envelope.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(envelope)).into_response()
}
