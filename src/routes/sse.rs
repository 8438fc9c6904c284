use crate::extractors::ClientIp;
use crate::models::CounterEvent;
use crate::services::session;
use crate::state::AppState;
use crate::utils::guardable;
use axum::extract::State;
use axum::http::header::{CACHE_CONTROL, CONNECTION};
use axum::response::{IntoResponse, Sse, sse};
use futures::StreamExt;
use std::convert::Infallible;
use std::time::Duration;

pub async fn stream(State(state): State<AppState>, ClientIp(ip): ClientIp) -> impl IntoResponse {
    let peer = ip.unwrap_or("unknown".to_string());
    let guard = state.counter_service.open_session(peer);
    let events = session::values(state.counter_service.clone()).map(
        |value| -> Result<sse::Event, Infallible> {
            Ok(sse::Event::default().data(CounterEvent::new(value).to_json()))
        },
    );
    // issue: https://github.com/hyperium/hyper/issues/2787
    let events = guardable(
        events.take_until(state.shutdown_signal.clone().cancelled_owned()),
        guard,
    );
    (
        [(CACHE_CONTROL, "no-cache"), (CONNECTION, "keep-alive")],
        Sse::new(events).keep_alive(
            sse::KeepAlive::new()
                .interval(Duration::from_secs(15))
                .text("ping"),
        ),
    )
}
