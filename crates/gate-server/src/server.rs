//! HTTP server and route handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use gate_core::{FactsProvider, InferenceRequest, SystemFactsProvider};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::backend::{ApiBackend, Backend, LocalBackend};
use crate::config::GatewayConfig;
use crate::metrics::GatewayMetrics;
use crate::selector::BackendSelector;
use crate::{GatewayError, Result};

/// The inference gateway: backends, selector, metrics, and the HTTP surface
pub struct GatewayServer {
    config: GatewayConfig,
    state: AppState,
}

/// Shared application state
#[derive(Clone)]
struct AppState {
    selector: Arc<BackendSelector>,
    local: Arc<LocalBackend>,
    api: Arc<ApiBackend>,
    metrics: Arc<GatewayMetrics>,
    facts_provider: Arc<dyn FactsProvider>,
}

impl GatewayServer {
    /// Create a gateway probing the host for hardware facts
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let provider: Arc<dyn FactsProvider> = Arc::new(SystemFactsProvider::new());
        Self::with_facts_provider(config, provider, GatewayConfig::api_key_from_env())
    }

    /// Create a gateway with an injected facts provider and API key
    pub fn with_facts_provider(
        config: GatewayConfig,
        facts_provider: Arc<dyn FactsProvider>,
        api_key: Option<String>,
    ) -> Result<Self> {
        crate::config::validate_config(&config).map_err(GatewayError::Configuration)?;

        let facts = facts_provider.collect()?;
        info!(
            "Detected hardware: {} cores, {:.1}GiB RAM, {} GPUs",
            facts.cpu_cores,
            facts.ram_total_gb,
            facts.gpu_count()
        );

        let local = Arc::new(LocalBackend::new(config.local.clone(), &facts));
        let api = Arc::new(ApiBackend::new(config.api.clone(), api_key)?);
        let metrics = Arc::new(GatewayMetrics::new());

        let selector = Arc::new(BackendSelector::new(
            local.clone(),
            api.clone(),
            metrics.clone(),
        ));

        Ok(Self {
            config,
            state: AppState {
                selector,
                local,
                api,
                metrics,
                facts_provider,
            },
        })
    }

    /// Build the axum router with all routes and middleware
    pub fn router(&self) -> Router {
        let mut router = Router::new()
            .route("/generate", post(generate_handler))
            .route("/metrics", get(metrics_handler))
            .route("/health", get(health_handler))
            .route("/system-specs", get(system_specs_handler))
            .route("/load-model", post(load_model_handler))
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            router = router.layer(CorsLayer::permissive());
        }

        router
    }

    /// Serve HTTP requests until shutdown
    pub async fn serve(&self) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.bind_address, self.config.http_port)
            .parse()
            .map_err(|e| GatewayError::Configuration(format!("Invalid bind address: {}", e)))?;

        info!("Starting gateway on {}", addr);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| GatewayError::Server(format!("Failed to bind to {}: {}", addr, e)))?;

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| GatewayError::Server(format!("HTTP server failed: {}", e)))?;

        info!("Gateway shutdown complete");
        Ok(())
    }
}

/// Wait for ctrl-c or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        }
    }
}

// HTTP handler functions

/// Generation endpoint
async fn generate_handler(
    State(state): State<AppState>,
    Json(request): Json<InferenceRequest>,
) -> std::result::Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    if let Err(reason) = request.validate() {
        return Err(error_response(&GatewayError::InvalidRequest(reason)));
    }

    match state.selector.generate(&request).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            error!("Generation failed: {}", e);
            Err(error_response(&e))
        }
    }
}

/// Metrics snapshot endpoint
async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.snapshot())
}

/// Health check endpoint
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "local_available": state.local.is_available(),
        "api_available": state.api.is_available(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Hardware facts endpoint
async fn system_specs_handler(
    State(state): State<AppState>,
) -> std::result::Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    match state.facts_provider.collect() {
        Ok(facts) => Ok(Json(facts)),
        Err(e) => Err(error_response(&GatewayError::Core(e))),
    }
}

/// Simulated model-load endpoint
async fn load_model_handler(
    State(state): State<AppState>,
) -> std::result::Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let facts = state
        .facts_provider
        .collect()
        .map_err(|e| error_response(&GatewayError::Core(e)))?;

    match state.local.load_model(&facts).await {
        Ok(()) => Ok(Json(json!({
            "status": "success",
            "message": "Model loaded",
        }))),
        Err(e) => {
            error!("Model load failed: {}", e);
            Err(error_response(&e))
        }
    }
}

/// Map a gateway error to a status code and JSON body
fn error_response(error: &GatewayError) -> (StatusCode, Json<serde_json::Value>) {
    let status = StatusCode::from_u16(error.to_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": error.to_string() })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use gate_core::facts::testing::capable_facts;
    use gate_core::StaticFactsProvider;
    use tower::ServiceExt;

    fn test_server(capable: bool, api_key: Option<String>) -> GatewayServer {
        let mut facts = capable_facts();
        if !capable {
            facts.gpus.clear();
            facts.cuda_available = false;
        }

        let config = crate::config::GatewayConfigBuilder::new()
            .simulated_latency(std::time::Duration::from_millis(1))
            .build();

        let provider: Arc<dyn FactsProvider> = Arc::new(StaticFactsProvider::new(facts));
        GatewayServer::with_facts_provider(config, provider, api_key).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let server = test_server(true, None);
        let response = server
            .router()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["local_available"], true);
        assert_eq!(body["api_available"], false);
    }

    #[tokio::test]
    async fn test_metrics_endpoint_starts_at_zero() {
        let server = test_server(true, None);
        let response = server
            .router()
            .oneshot(
                Request::builder()
                    .uri("/metrics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["total_requests"], 0);
        assert_eq!(body["avg_response_time_ms"], 0.0);
    }

    #[tokio::test]
    async fn test_generate_serves_locally() {
        let server = test_server(true, None);
        let response = server
            .router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/generate")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"prompt": "roll for initiative"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["backend"], "local");
        assert!(body["text"].as_str().unwrap().contains("roll for initiative"));
    }

    #[tokio::test]
    async fn test_generate_without_any_backend_is_503() {
        let server = test_server(false, None);
        let response = server
            .router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/generate")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"prompt": "hello"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_generate_rejects_invalid_request() {
        let server = test_server(true, None);
        let response = server
            .router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/generate")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"prompt": "hello", "max_tokens": 0}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_system_specs_endpoint() {
        let server = test_server(true, None);
        let response = server
            .router()
            .oneshot(
                Request::builder()
                    .uri("/system-specs")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["cpu_model"], "Test CPU");
        assert_eq!(body["gpus"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_load_model_on_incapable_system_is_503() {
        let server = test_server(false, None);
        let response = server
            .router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/load-model")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_generate_updates_metrics() {
        let server = test_server(true, None);
        let router = server.router();

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/generate")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"prompt": "hello"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/metrics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["total_requests"], 1);
        assert_eq!(body["local_requests"], 1);
        assert_eq!(body["api_requests"], 0);
        assert!(body["avg_response_time_ms"].as_f64().unwrap() > 0.0);
    }
}
