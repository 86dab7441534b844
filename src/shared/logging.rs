// src/shared/logging.rs

use tracing_subscriber::{
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter,
};

fn filtro(nivel: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("{nivel},sqlx=warn")))
}

/// Inicializa o subscriber de logs.
///
/// `RUST_LOG` tem prioridade; sem ele, usa o nível da configuração e
/// silencia o ruído do sqlx. Os logs do crate `log` (acesso do actix)
/// também passam pelo subscriber.
pub fn inicializar(nivel: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(filtro(nivel))
        .try_init()
}
