// Logger initialization

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_LOG_FILTER: &str = "marketplace_api=debug,tower_http=debug,axum=debug";

/// Installs the global `tracing` subscriber. `RUST_LOG` overrides the
/// default filter.
pub fn init_logger() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
