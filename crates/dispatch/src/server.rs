//! Axum-based HTTP front end.
//!
//! The failure signal lives in the response body, not the status line:
//! classification endpoints always answer HTTP 200 with the structured
//! success/failure envelope, a behavior inherited from the reference system.

use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use finder_core::{ClassificationResult, Error, Result};

use crate::dispatcher::CoalescingDispatcher;

pub use finder_core::config::ServerConfig;

/// Shared application state.
pub struct AppState {
    pub dispatcher: Arc<CoalescingDispatcher>,
}

/// Front-end server.
pub struct FinderServer {
    config: ServerConfig,
    state: Arc<AppState>,
    metrics_handle: Option<PrometheusHandle>,
}

impl FinderServer {
    pub fn new(config: ServerConfig, dispatcher: Arc<CoalescingDispatcher>) -> Self {
        Self {
            config,
            state: Arc::new(AppState { dispatcher }),
            metrics_handle: None,
        }
    }

    /// Expose a Prometheus rendering endpoint at `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }

    /// Build the Axum router.
    pub fn build_router(&self) -> Router {
        let mut router = Router::new()
            .route("/api/find-service", post(find_service_handler))
            .route("/api/healthz", get(healthz_handler))
            .with_state(self.state.clone());

        if let Some(handle) = &self.metrics_handle {
            let handle = handle.clone();
            router = router.route("/metrics", get(move || async move { handle.render() }));
        }

        if self.config.enable_cors {
            router = router.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any));
        }

        if self.config.enable_tracing {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    /// Run the server.
    pub async fn run(self) -> Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::gateway(format!("failed to bind {}: {}", addr, e)))?;

        tracing::info!(addr = %addr, "Service Finder server starting");

        axum::serve(listener, self.build_router())
            .await
            .map_err(|e| Error::gateway(format!("server error: {}", e)))?;

        Ok(())
    }
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Body of `POST /api/find-service`.
#[derive(Debug, Deserialize)]
pub struct FindServiceRequest {
    pub intent: String,
}

/// Body of `GET /api/healthz`.
#[derive(Debug, Serialize)]
pub struct HealthzResponse {
    pub status: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Liveness probe. No dispatcher involvement.
async fn healthz_handler() -> impl IntoResponse {
    Json(HealthzResponse {
        status: "ok".to_string(),
    })
}

async fn find_service_handler(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<FindServiceRequest>, JsonRejection>,
) -> impl IntoResponse {
    let trace_id = Uuid::new_v4().to_string();

    let intent = match payload {
        Ok(Json(request)) if !request.intent.trim().is_empty() => request.intent,
        Ok(_) => {
            return (
                StatusCode::OK,
                Json(ClassificationResult::failure(
                    "intent must be a non-empty string",
                )),
            );
        }
        Err(rejection) => {
            tracing::debug!(trace_id = %trace_id, error = %rejection, "rejected request body");
            return (
                StatusCode::OK,
                Json(ClassificationResult::failure(
                    r#"invalid request body; expected {"intent": "string"}"#,
                )),
            );
        }
    };

    tracing::info!(
        trace_id = %trace_id,
        intent_len = intent.len(),
        "Processing find-service request"
    );

    let result = state.dispatcher.classify(&intent).await;

    (StatusCode::OK, Json(result))
}
