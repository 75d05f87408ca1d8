//! Tracing subscriber setup

use crate::Config;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber for `config`
///
/// `RUST_LOG` wins over `default_filter`. Production deployments log JSON
/// lines, everything else human-readable text. A second call is a no-op.
pub fn init_tracing(config: &Config, default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let registry = tracing_subscriber::registry().with(filter);

    let _ = if config.is_production() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .try_init()
    };
}
