use crate::services::CounterService;
use axum::extract::FromRef;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct AppState {
    pub counter_service: Arc<CounterService>,
    pub shutdown_signal: CancellationToken,
}

impl AppState {
    pub fn build(shutdown_signal: CancellationToken) -> Self {
        Self {
            counter_service: CounterService::new(),
            shutdown_signal,
        }
    }
}

impl FromRef<AppState> for Arc<CounterService> {
    fn from_ref(state: &AppState) -> Self {
        state.counter_service.clone()
    }
}
