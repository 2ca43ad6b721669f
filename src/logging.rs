//! # Logging
//! src/logging.rs
//!
//! Inicializa `tracing-subscriber` una sola vez al arrancar. El nivel se
//! controla con `RUST_LOG`; por defecto solo `info` y superiores de este
//! crate.

use tracing_subscriber::EnvFilter;

/// Filtro usado cuando `RUST_LOG` no está definida
pub const DEFAULT_FILTER: &str = "file_server=info";

/// Construye el filtro de eventos
pub fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Instala el subscriber global
///
/// Cada línea incluye el nombre del thread, que identifica la conexión
/// (`conn-<peer>`).
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_target(false)
        .with_level(true)
        .with_thread_names(true)
        .init();
}
