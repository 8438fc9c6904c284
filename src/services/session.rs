use crate::services::counter::{CounterService, Observer};
use futures::Stream;
use futures::stream;
use std::sync::Arc;

/// Lazy, unbounded sequence of counter values for one streaming connection.
///
/// The first observer is registered right away so that a value committed
/// after the session opens is never missed. Afterwards a new observer is only
/// registered when the consumer asks for the next item, i.e. once the
/// previous value has been written out. Values committed in between are
/// skipped.
///
/// Dropping the stream drops the pending observer, which unregisters it.
pub fn values(service: Arc<CounterService>) -> impl Stream<Item = i64> {
    let observer = service.register();
    stream::unfold(
        (service, Some(observer)),
        |(service, observer): (Arc<CounterService>, Option<Observer>)| async move {
            let mut observer = observer.unwrap_or_else(|| service.register());
            let value = observer.next_value().await?;
            Some((value, (service, None)))
        },
    )
}
