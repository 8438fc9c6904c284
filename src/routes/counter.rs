use crate::common::ApiResult;
use crate::extractors::JsonBody;
use crate::models::Command;
use crate::models::dtos::command::CommandDto;
use crate::services::CounterService;
use axum::extract::State;
use axum::response::IntoResponse;
use std::sync::Arc;

pub async fn increment(
    State(service): State<Arc<CounterService>>,
    JsonBody(body): JsonBody<CommandDto>,
) -> ApiResult<impl IntoResponse> {
    service.process(Command::increment(body.value))?;
    Ok("OK")
}

pub async fn decrement(
    State(service): State<Arc<CounterService>>,
    JsonBody(body): JsonBody<CommandDto>,
) -> ApiResult<impl IntoResponse> {
    service.process(Command::decrement(body.value))?;
    Ok("OK")
}
