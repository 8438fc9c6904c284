mod counter;
mod sse;
mod system;

use crate::middlewares::trace_id::{TraceId, TraceIdLayer};
use crate::state::AppState;
use axum::body::Body;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, CONTENT_TYPE,
};
use axum::http::{HeaderValue, Method, Request};
use axum::response::Response;
use axum::{
    Router,
    routing::{get, post},
};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::Span;

pub fn build() -> Router<AppState> {
    Router::new()
        .route("/increment", post(counter::increment))
        .route("/decrement", post(counter::decrement))
        .route("/stream", get(sse::stream))
        .route("/health", get(system::health))
        .route("/version", get(system::version))
        .route("/stats", get(system::stats))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| match request
                    .extensions()
                    .get::<TraceId>()
                {
                    Some(trace_id) => tracing::debug_span!("request", trace_id = %trace_id),
                    None => tracing::debug_span!("request"),
                })
                .on_request(|req: &Request<Body>, _span: &Span| {
                    tracing::trace!(
                        method = %req.method(),
                        uri = %req.uri(),
                        version = %format!("{:?}", req.version()),
                        "started processing request"
                    );
                })
                .on_response(|res: &Response, latency: Duration, _span: &Span| {
                    tracing::trace!(
                        status = ?res.status(),
                        latency = %format!("{}ms", latency.as_millis()),
                        "finished processing request"
                    );
                }),
        )
        // answers every OPTIONS request itself with 200 and an empty body
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([CONTENT_TYPE]),
        )
        // outside the CORS layer so preflight responses are tagged too
        .layer(TraceIdLayer::new())
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("content-type"),
        ))
}
