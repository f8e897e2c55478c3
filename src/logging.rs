//! Tracing setup shared by the binaries.

use crate::config::LoggingConfig;
use tracing_subscriber::{
    fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Build the filter: `RUST_LOG` wins, otherwise the configured level for
/// this crate and `tower_http`.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "teebox={level},tower_http={level}",
            level = config.level
        ))
    })
}

/// Run `f` under a temporary stderr subscriber
///
/// Config resolution happens before the configured subscriber exists; its
/// warnings (skipped config files, bad overrides) would otherwise be lost.
pub fn bootstrap<T>(f: impl FnOnce() -> T) -> T {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("teebox=warn"));
    bootstrap_with(filter, std::io::stderr, f)
}

fn bootstrap_with<W, T>(filter: EnvFilter, writer: W, f: impl FnOnce() -> T) -> T
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .finish();
    tracing::subscriber::with_default(subscriber, f)
}

/// Install the global subscriber
///
/// `format = "json"` emits one JSON object per event; anything else uses the
/// human-readable formatter.
pub fn init(config: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(env_filter(config));

    let result = if config.format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    if let Err(e) = result {
        eprintln!("Tracing already initialized: {}", e);
    }
}
