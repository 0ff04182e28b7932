// src/logging.rs
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "MINIX_LOG";

/// Trazas a stderr, filtradas por `MINIX_LOG` (por defecto `warn`), para no
/// mezclarlas con la salida de los comandos.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
