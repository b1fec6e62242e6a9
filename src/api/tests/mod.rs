use super::*;
use crate::config::ErrorDisclosure;
use crate::test_helpers::{MockBehavior, MockExtractor, test_config};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tower::ServiceExt;


/// Router backed by `extractor` with artifacts under `temp_dir`
fn test_app(temp_dir: &Path, extractor: Arc<MockExtractor>) -> Router {
    test_app_with(test_config(temp_dir), extractor)
}

fn test_app_with(config: Config, extractor: Arc<MockExtractor>) -> Router {
    let config = Arc::new(config);
    let service = Arc::new(DownloadService::new(config.clone(), extractor));
    create_router(service, config)
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// POST /api/download with `{"url": url}`
async fn submit(app: Router, url: &str) -> (StatusCode, serde_json::Value) {
    let body = serde_json::json!({ "url": url }).to_string();
    let response = app.oneshot(post_json("/api/download", &body)).await.unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

#[tokio::test]
async fn test_cors_enabled() {
    let dir = tempdir().unwrap();
    let app = test_app(dir.path(), Arc::new(MockExtractor::succeeding("T")));

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn test_cors_specific_origin() {
    let dir = tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.api.cors_origins = vec!["http://allowed.example".to_string()];
    let app = test_app_with(config, Arc::new(MockExtractor::succeeding("T")));

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://allowed.example")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://allowed.example")
    );
}

#[tokio::test]
async fn test_cors_disabled() {
    let dir = tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.api.cors_enabled = false;
    let app = test_app_with(config, Arc::new(MockExtractor::succeeding("T")));

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .get("access-control-allow-origin")
            .is_none()
    );
}

#[tokio::test]
async fn test_swagger_ui_toggle() {
    let dir = tempdir().unwrap();

    let app = test_app(dir.path(), Arc::new(MockExtractor::succeeding("T")));
    let response = app.oneshot(get("/api-docs/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let mut config = test_config(dir.path());
    config.api.swagger_ui = false;
    let app = test_app_with(config, Arc::new(MockExtractor::succeeding("T")));
    let response = app.oneshot(get("/api-docs/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let dir = tempdir().unwrap();
    let app = test_app(dir.path(), Arc::new(MockExtractor::succeeding("T")));

    let response = app.oneshot(get("/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_server_serves_and_shuts_down_gracefully() {
    let dir = tempdir().unwrap();
    let config = Arc::new(test_config(dir.path()));
    let service = Arc::new(DownloadService::new(
        config.clone(),
        Arc::new(MockExtractor::succeeding("T")),
    ));

    // Port 0 = OS assigns a free port
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(serve(listener, service, config, async move {
        let _ = stop_rx.await;
    }));

    let mut stream = tokio::net::TcpStream::connect(address).await.unwrap();
    stream
        .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.unwrap();
    assert!(raw.starts_with("HTTP/1.1 200"), "unexpected response: {}", raw);
    assert!(raw.contains(r#"{"status":"healthy"}"#));

    stop_tx.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server should stop after the shutdown signal")
        .unwrap()
        .unwrap();
}
