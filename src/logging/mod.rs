use crate::logging::format::Formatter;
use tracing::Level;
use tracing_subscriber::Layer;
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

mod format;

const CRATE_TARGET: &str = "tally";

fn is_crate_target(target: &str) -> bool {
    target == CRATE_TARGET || target.starts_with("tally::")
}

/// Installs the global subscriber. Events of this crate are printed at
/// `level`, everything else (axum, hyper, tower_http) at `INFO`.
pub fn registry_logs(level: Level) -> anyhow::Result<()> {
    let crate_layer = tracing_subscriber::fmt::layer()
        .event_format(Formatter::new(true))
        .with_filter(filter::filter_fn(move |metadata| {
            is_crate_target(metadata.target()) && metadata.level() <= &level
        }));
    let general_layer = tracing_subscriber::fmt::layer()
        .event_format(Formatter::new(false))
        .with_filter(filter::filter_fn(|metadata| {
            !is_crate_target(metadata.target()) && metadata.level() <= &Level::INFO
        }));
    tracing_subscriber::registry()
        .with(crate_layer)
        .with(general_layer)
        .with(tracing_error::ErrorLayer::default())
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_target() {
        assert!(is_crate_target("tally"));
        assert!(is_crate_target("tally::services::counter"));
        assert!(!is_crate_target("tally_other"));
        assert!(!is_crate_target("tower_http::trace"));
    }
}
