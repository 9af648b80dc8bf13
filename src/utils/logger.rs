// Tracing initialization
// Stdout always; a daily-rolling file under LOG_DIR when that variable is set.

use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "bookify=debug,tower_http=debug,axum=info";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer());

    match std::env::var("LOG_DIR") {
        Ok(dir) if !dir.trim().is_empty() => {
            let appender = tracing_appender::rolling::daily(dir.trim(), "bookify-api.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = LOG_GUARD.set(guard);
            registry
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .init();
        }
        _ => registry.init(),
    }
}
