//! Drives the router through `tower::ServiceExt` without binding a socket.

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use futures::StreamExt;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tally::services::CounterService;
use tally::state::AppState;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    service: Arc<CounterService>,
    shutdown_signal: CancellationToken,
}

impl TestApp {
    fn new() -> Self {
        let shutdown_signal = CancellationToken::new();
        let state = AppState::build(shutdown_signal.clone());
        let service = state.counter_service.clone();
        Self {
            router: tally::routes::build().with_state(state),
            service,
            shutdown_signal,
        }
    }
    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }
    async fn command(&self, path: &str, body: &str) -> (StatusCode, String) {
        let request = Request::post(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = self.send(request).await;
        let status = response.status();
        (status, body_text(response).await)
    }
    async fn open_stream(&self) -> (Response, impl futures::Stream<Item = Bytes> + Unpin) {
        let response = self
            .send(Request::get("/stream").body(Body::empty()).unwrap())
            .await;
        let (parts, body) = response.into_parts();
        let frames = body.into_data_stream().map(|frame| frame.unwrap());
        (Response::from_parts(parts, Body::empty()), frames)
    }
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn next_frame(frames: &mut (impl futures::Stream<Item = Bytes> + Unpin)) -> String {
    let frame = tokio::time::timeout(Duration::from_secs(1), frames.next())
        .await
        .expect("no event within a second")
        .expect("stream ended");
    String::from_utf8(frame.to_vec()).unwrap()
}

#[tokio::test]
async fn increment_from_zero() {
    let app = TestApp::new();
    let (status, body) = app.command("/increment", r#"{"value": 5}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
    assert_eq!(app.service.value(), 5);
}

#[tokio::test]
async fn decrement_below_zero_is_rejected() {
    let app = TestApp::new();
    app.command("/increment", r#"{"value": 5}"#).await;
    let (status, body) = app.command("/decrement", r#"{"value": 10}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("negative"), "unexpected body: {body}");
    assert_eq!(app.service.value(), 5);

    let (status, _) = app.command("/decrement", r#"{"value": 5}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.service.value(), 0);
}

#[tokio::test]
async fn malformed_commands_are_bad_requests() {
    let app = TestApp::new();
    for body in [
        r#"{}"#,
        r#"{"value": "5"}"#,
        r#"{"value": 1.5}"#,
        r#"{"value": null}"#,
        r#"{"value": -1}"#,
        r#"{"value": 99999999999999999999}"#,
        "not json",
    ] {
        let (status, message) = app.command("/increment", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body} gave {message}");
        assert!(!message.is_empty());
    }

    let request = Request::post("/increment")
        .body(Body::from(r#"{"value": 1}"#))
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.service.value(), 0);
}

#[tokio::test]
async fn stream_receives_update() {
    let app = TestApp::new();
    let (response, mut frames) = app.open_stream().await;
    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::CONTENT_TYPE], "text/event-stream");
    assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
    assert_eq!(headers[header::CONNECTION], "keep-alive");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(app.service.observers(), 1);

    let (status, _) = app.command("/increment", r#"{"value": 3}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(next_frame(&mut frames).await, "data: {\"value\": 3}\n\n");
}

#[tokio::test]
async fn stream_receives_consecutive_updates() {
    let app = TestApp::new();
    let (_, mut frames) = app.open_stream().await;
    for expected in 1..=3 {
        let mut pending = Box::pin(next_frame(&mut frames));
        // the first poll registers the session for the next value
        assert!(futures::poll!(pending.as_mut()).is_pending());
        assert_eq!(app.service.observers(), 1);
        let (status, _) = app.command("/increment", r#"{"value": 1}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(pending.await, format!("data: {{\"value\": {expected}}}\n\n"));
    }
}

#[tokio::test]
async fn every_stream_gets_the_update() {
    let app = TestApp::new();
    let (_, mut first) = app.open_stream().await;
    let (_, mut second) = app.open_stream().await;
    assert_eq!(app.service.observers(), 2);

    app.command("/increment", r#"{"value": 1}"#).await;
    assert_eq!(next_frame(&mut first).await, "data: {\"value\": 1}\n\n");
    assert_eq!(next_frame(&mut second).await, "data: {\"value\": 1}\n\n");
}

#[tokio::test]
async fn disconnect_does_not_leak() {
    let app = TestApp::new();
    let (_, frames) = app.open_stream().await;
    assert_eq!(app.service.observers(), 1);
    assert_eq!(app.service.sessions(), 1);
    drop(frames);
    assert_eq!(app.service.observers(), 0);
    assert_eq!(app.service.sessions(), 0);

    for _ in 0..10 {
        let (status, _) = app.command("/increment", r#"{"value": 1}"#).await;
        assert_eq!(status, StatusCode::OK);
    }
    assert_eq!(app.service.value(), 10);
    assert_eq!(app.service.observers(), 0);
}

#[tokio::test]
async fn shutdown_ends_streams() {
    let app = TestApp::new();
    let (_, mut frames) = app.open_stream().await;
    app.shutdown_signal.cancel();
    let end = tokio::time::timeout(Duration::from_secs(1), frames.next())
        .await
        .unwrap();
    assert!(end.is_none());
    assert_eq!(app.service.sessions(), 0);
    drop(frames);
    assert_eq!(app.service.observers(), 0);
}

#[tokio::test]
async fn options_short_circuits() {
    let app = TestApp::new();
    for path in ["/increment", "/decrement", "/stream"] {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri(path)
            .body(Body::empty())
            .unwrap();
        let response = app.send(request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
        for method in ["GET", "POST", "OPTIONS"] {
            assert!(methods.contains(method), "missing {method} in {methods}");
        }
        let allowed = headers[header::ACCESS_CONTROL_ALLOW_HEADERS].to_str().unwrap();
        assert!(allowed.eq_ignore_ascii_case("content-type"));
        assert!(headers.contains_key("x-request-id"));
        assert!(body_text(response).await.is_empty());
    }
    assert_eq!(app.service.value(), 0);
}

#[tokio::test]
async fn cors_headers_on_every_response() {
    let app = TestApp::new();
    let request = Request::post("/decrement")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"value": 1}"#))
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_METHODS],
        "GET, POST, OPTIONS"
    );
    assert!(headers.contains_key(header::ACCESS_CONTROL_ALLOW_HEADERS));
    assert!(headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn stats_report_state() {
    let app = TestApp::new();
    app.command("/increment", r#"{"value": 7}"#).await;
    let (_, _frames) = app.open_stream().await;

    let response = app
        .send(Request::get("/stats").body(Body::empty()).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let stats: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(stats["value"], 7);
    assert_eq!(stats["observers"], 1);
    assert_eq!(stats["sessions"], 1);
}

#[tokio::test]
async fn health_and_version() {
    let app = TestApp::new();
    let response = app
        .send(Request::get("/health").body(Body::empty()).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = app
        .send(Request::get("/version").body(Body::empty()).unwrap())
        .await;
    assert_eq!(
        body_text(response).await,
        format!("tally_{}", env!("CARGO_PKG_VERSION"))
    );
}
