use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arta_core::domain::report;
use arta_core::domain::request::PortfolioRequest;
use arta_core::ingest::provider::{HttpJsonMarketData, MarketDataProvider};
use arta_core::pipeline::{self, error::RecommendError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = arta_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let provider = HttpJsonMarketData::from_settings(&settings)?;
    let state = AppState {
        provider: Arc::new(provider),
    };

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/api/v1/recommendations", post(create_recommendation))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    provider: Arc<dyn MarketDataProvider>,
}

async fn create_recommendation(
    State(state): State<AppState>,
    Json(request): Json<PortfolioRequest>,
) -> Response {
    tracing::info!(
        initial_capital = request.initial_capital,
        time_horizon = %request.time_horizon,
        "received recommendation request"
    );

    match pipeline::recommend(state.provider.as_ref(), &request).await {
        Ok(recommendation) => {
            tracing::info!("recommendation created");
            (StatusCode::OK, Json(report::build_response(&request, &recommendation))).into_response()
        }
        Err(err) => error_response(err),
    }
}

/// The single translation point from pipeline failures to transport
/// status codes. Internal errors never leak detail to the caller.
fn error_response(err: RecommendError) -> Response {
    let status = status_for(&err);
    let detail = match &err {
        RecommendError::Internal(inner) => {
            sentry_anyhow::capture_anyhow(inner);
            tracing::error!(error = %inner, "unexpected failure while building recommendation");
            "internal server error".to_string()
        }
        other => {
            tracing::warn!(%status, error = %other, "recommendation rejected");
            other.to_string()
        }
    };

    (status, Json(json!({ "detail": detail }))).into_response()
}

fn status_for(err: &RecommendError) -> StatusCode {
    match err {
        RecommendError::DataUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        RecommendError::FilterExhausted(_)
        | RecommendError::InsufficientHistory(_)
        | RecommendError::OptimizationFailure(_) => StatusCode::BAD_REQUEST,
        RecommendError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &arta_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_failures_to_transport_statuses() {
        assert_eq!(
            status_for(&RecommendError::DataUnavailable),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(&RecommendError::FilterExhausted("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&RecommendError::InsufficientHistory("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&RecommendError::OptimizationFailure("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&RecommendError::Internal(anyhow::anyhow!("boom"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
