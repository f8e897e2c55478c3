//! Edge Server
//!
//! Serves the built frontend and forwards API calls to the booking backend.
//!
//! # Routes
//!
//! - `ANY {prefix}/` and `ANY {prefix}/*` for each configured proxy prefix
//!   (default `/api`, `/test_api`) - forwarded to the upstream origin
//! - `GET {health_path}/live`, `/ready` and `{health_path}` - health probes,
//!   only when `health_path` is configured
//! - everything else - a file from the static root, or the entry document
//!   with status 200 so client-side routing can take over
//!
//! # Example
//!
//! ```rust,no_run
//! use teebox::config::EdgeConfig;
//! use teebox::edge::{serve, EdgeState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EdgeConfig::default();
//!     let state = EdgeState::new(config.clone())?;
//!     serve(state, &config).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod proxy;
pub mod routes;
pub mod state;

pub use error::{EdgeError, EdgeResult};
pub use state::EdgeState;

use axum::{
    extract::DefaultBodyLimit,
    routing::{any, get},
    Router,
};
use std::sync::Arc;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::config::EdgeConfig;

/// Static files from the static root, falling back to the entry document
///
/// The fallback keeps its own 200 status, so unknown navigational paths
/// never surface as 404.
pub fn static_service(config: &EdgeConfig) -> ServeDir<ServeFile> {
    ServeDir::new(&config.static_dir).fallback(ServeFile::new(config.index_path()))
}

fn health_routes() -> Router<Arc<EdgeState>> {
    Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health))
}

/// Build the edge router with all routes and middleware
pub fn build_router(state: EdgeState) -> Router {
    let mut router: Router<Arc<EdgeState>> = Router::new();

    if let Some(path) = &state.config.health_path {
        let path = path.trim_end_matches('/');
        if path.is_empty() {
            tracing::warn!("Ignoring health_path \"/\"; it would shadow the frontend");
        } else {
            tracing::debug!("Health endpoints mounted at {}", path);
            router = router.nest(path, health_routes());
        }
    }

    for prefix in &state.config.proxy_prefixes {
        let prefix = prefix.trim_end_matches('/');
        tracing::debug!("Proxying {}/* to {}", prefix, state.upstream);

        // `/*rest` never matches an empty remainder
        let forward = any(proxy::forward).layer(DefaultBodyLimit::max(state.config.max_body_size));
        router = router
            .route(&format!("{}/", prefix), forward.clone())
            .route(&format!("{}/*rest", prefix), forward);
    }

    let statics = static_service(&state.config);
    let shared_state = Arc::new(state);

    router
        .fallback_service(statics)
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state)
}

/// Start the edge server
pub async fn serve(state: EdgeState, config: &EdgeConfig) -> EdgeResult<()> {
    let upstream = state.upstream.clone();
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Teebox edge listening on {}", addr);
    tracing::info!("Serving {:?}, forwarding API calls to {}", config.static_dir, upstream);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| EdgeError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Teebox edge shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{closed_addr, spawn_upstream};
    use axum::{
        body::Body,
        http::{HeaderMap, Request, StatusCode, Uri},
        routing::post,
        Json,
    };
    use std::time::Duration;
    use tempfile::{tempdir, TempDir};
    use tower::util::ServiceExt;

    const INDEX: &str = "<!doctype html><app-root></app-root>";

    fn static_root() -> TempDir {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), INDEX).unwrap();
        std::fs::write(dir.path().join("main.js"), "console.log('tee times');").unwrap();
        dir
    }

    fn test_config(upstream_url: &str, dir: &TempDir) -> EdgeConfig {
        EdgeConfig {
            static_dir: dir.path().to_path_buf(),
            upstream_url: upstream_url.to_string(),
            request_timeout_ms: 2_000,
            connect_timeout_ms: 1_000,
            ..Default::default()
        }
    }

    fn create_test_app(upstream_url: &str, dir: &TempDir) -> Router {
        build_router(EdgeState::new(test_config(upstream_url, dir)).unwrap())
    }

    /// Upstream that answers every path with `UPSTREAM <path>`
    async fn echo_upstream() -> String {
        spawn_upstream(
            Router::new().fallback(|uri: Uri| async move { format!("UPSTREAM {}", uri.path()) }),
        )
        .await
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_proxy_relays_upstream_json() {
        let upstream = spawn_upstream(Router::new().route(
            "/api/teetimes",
            get(|| async { Json(serde_json::json!({"a": 1})) }),
        ))
        .await;
        let dir = static_root();
        let app = create_test_app(&upstream, &dir);

        let response = app.oneshot(get_request("/api/teetimes")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "application/json");
        assert_eq!(body_string(response).await, r#"{"a":1}"#);
    }

    #[tokio::test]
    async fn test_proxy_handles_test_api_prefix() {
        let upstream = spawn_upstream(
            Router::new().route("/test_api/teetimes", get(|| async { "[]" })),
        )
        .await;
        let dir = static_root();
        let app = create_test_app(&upstream, &dir);

        let response = app.oneshot(get_request("/test_api/teetimes")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "[]");
    }

    #[tokio::test]
    async fn test_proxy_rewrites_host_and_keeps_query() {
        let upstream = spawn_upstream(Router::new().route(
            "/api/echo",
            get(|headers: HeaderMap, uri: Uri| async move {
                let host = headers
                    .get("host")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                format!("{}|{}", host, uri.query().unwrap_or_default())
            }),
        ))
        .await;
        let dir = static_root();
        let app = create_test_app(&upstream, &dir);

        let request = Request::builder()
            .uri("/api/echo?date=2025-09-01")
            .header("host", "golf.example.com")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        let expected_host = upstream.trim_start_matches("http://");
        assert_eq!(
            body_string(response).await,
            format!("{}|date=2025-09-01", expected_host)
        );
    }

    #[tokio::test]
    async fn test_proxy_forwards_method_and_body() {
        let upstream = spawn_upstream(Router::new().route(
            "/api/bookings",
            post(|body: String| async move { (StatusCode::CREATED, body) }),
        ))
        .await;
        let dir = static_root();
        let app = create_test_app(&upstream, &dir);

        let request = Request::builder()
            .method("POST")
            .uri("/api/bookings")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"course":"Bonneville"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_string(response).await, r#"{"course":"Bonneville"}"#);
    }

    #[tokio::test]
    async fn test_proxy_passes_upstream_errors_through() {
        let upstream = spawn_upstream(Router::new().route(
            "/api/foreup_teetimes",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "scraper offline") }),
        ))
        .await;
        let dir = static_root();
        let app = create_test_app(&upstream, &dir);

        let response = app
            .clone()
            .oneshot(get_request("/api/foreup_teetimes"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_string(response).await, "scraper offline");

        // unknown API paths are the upstream's 404, not the SPA document
        let response = app.oneshot(get_request("/api/nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_bad_gateway() {
        let addr = closed_addr().await;
        let dir = static_root();
        let app = create_test_app(&format!("http://{}", addr), &dir);

        let response = tokio::time::timeout(
            Duration::from_secs(10),
            app.oneshot(get_request("/api/teetimes")),
        )
        .await
        .expect("proxy hung on unreachable upstream")
        .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"]["code"], "BAD_GATEWAY");
    }

    #[tokio::test]
    async fn test_slow_upstream_is_gateway_timeout() {
        let upstream = spawn_upstream(Router::new().route(
            "/api/teetimes",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "[]"
            }),
        ))
        .await;
        let dir = static_root();
        let app = create_test_app(&upstream, &dir);

        let response = app.oneshot(get_request("/api/teetimes")).await.unwrap();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let dir = static_root();
        let config = EdgeConfig {
            static_dir: dir.path().to_path_buf(),
            max_body_size: 8,
            ..Default::default()
        };
        let app = build_router(EdgeState::new(config).unwrap());

        let request = Request::builder()
            .method("POST")
            .uri("/api/teetimes")
            .body(Body::from("a body longer than eight bytes"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_static_file_served() {
        let dir = static_root();
        let app = create_test_app("http://127.0.0.1:8000", &dir);

        let response = app.oneshot(get_request("/main.js")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
        assert!(content_type.contains("javascript"), "{content_type}");
        assert_eq!(body_string(response).await, "console.log('tee times');");
    }

    #[tokio::test]
    async fn test_root_serves_entry_document() {
        let dir = static_root();
        let app = create_test_app("http://127.0.0.1:8000", &dir);

        let response = app.oneshot(get_request("/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, INDEX);
    }

    #[tokio::test]
    async fn test_unknown_path_falls_back_to_entry_document() {
        let dir = static_root();
        let app = create_test_app("http://127.0.0.1:8000", &dir);

        let response = app.oneshot(get_request("/some/unknown/path")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/html"));
        assert_eq!(body_string(response).await, INDEX);
    }

    #[tokio::test]
    async fn test_bare_prefix_is_forwarded() {
        let upstream = echo_upstream().await;
        let dir = static_root();
        let app = create_test_app(&upstream, &dir);

        for path in ["/api/", "/test_api/"] {
            let response = app.clone().oneshot(get_request(path)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(body_string(response).await, format!("UPSTREAM {}", path));
        }
    }

    #[tokio::test]
    async fn test_body_read_failure_is_bad_request() {
        let dir = static_root();
        let app = create_test_app("http://127.0.0.1:8000", &dir);

        let chunks = futures_util::stream::iter(vec![
            Ok(axum::body::Bytes::from_static(b"{\"course\":")),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "client went away")),
        ]);
        let request = Request::builder()
            .method("POST")
            .uri("/api/bookings")
            .body(Body::from_stream(chunks))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"]["code"], "REQUEST_BODY_UNREADABLE");
    }

    #[tokio::test]
    async fn test_health_paths_belong_to_frontend_by_default() {
        let dir = static_root();
        let app = create_test_app("http://127.0.0.1:8000", &dir);

        for path in ["/health", "/health/live", "/health/ready"] {
            let response = app.clone().oneshot(get_request(path)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(body_string(response).await, INDEX, "{path}");
        }
    }

    #[tokio::test]
    async fn test_health_routes_when_configured() {
        let dir = static_root();
        let config = EdgeConfig {
            health_path: Some("/_edge/health".to_string()),
            ..test_config("http://127.0.0.1:8000", &dir)
        };
        let app = build_router(EdgeState::new(config).unwrap());

        let live = app.clone().oneshot(get_request("/_edge/health/live")).await.unwrap();
        assert_eq!(live.status(), StatusCode::OK);

        let ready = app.clone().oneshot(get_request("/_edge/health/ready")).await.unwrap();
        assert_eq!(ready.status(), StatusCode::OK);

        let full = app.clone().oneshot(get_request("/_edge/health")).await.unwrap();
        let body: serde_json::Value = serde_json::from_str(&body_string(full).await).unwrap();
        assert_eq!(body["status"], "healthy");

        let spa = app.oneshot(get_request("/health")).await.unwrap();
        assert_eq!(body_string(spa).await, INDEX);
    }

    #[tokio::test]
    async fn test_not_ready_without_entry_document() {
        let dir = tempdir().unwrap();
        let config = EdgeConfig {
            health_path: Some("/_edge/health".to_string()),
            ..test_config("http://127.0.0.1:8000", &dir)
        };
        let app = build_router(EdgeState::new(config).unwrap());

        let response = app.oneshot(get_request("/_edge/health/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
