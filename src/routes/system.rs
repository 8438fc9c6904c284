use crate::models::dtos::stats::StatsDto;
use crate::services::CounterService;
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use std::sync::Arc;

pub async fn health() -> impl IntoResponse {
    axum::http::StatusCode::OK
}

pub async fn version() -> impl IntoResponse {
    format!("tally_{}", env!("CARGO_PKG_VERSION"))
}

pub async fn stats(State(service): State<Arc<CounterService>>) -> impl IntoResponse {
    Json(StatsDto {
        value: service.value(),
        observers: service.observers(),
        sessions: service.sessions(),
    })
}
