// Archivo: config.rs
// Propósito: configuración de los nodos fuente. Hoy contiene sólo la
// política ante cargas solapadas; se puede construir a mano o leer del
// entorno (`.env` incluido).
use crate::errors::{AsyncDataError, Result};
use std::str::FromStr;

/// Variable de entorno leída por `SourceConfig::from_env`.
pub const LOAD_POLICY_ENV: &str = "ASYNC_DATA_LOAD_POLICY";

/// Qué hacer con el resultado de una carga cuando otra más nueva ya empezó.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Se entregan todos los resultados, en el orden en que se resuelven los
    /// futuros.
    #[default]
    DeliverAll,
    /// Sólo se entrega el resultado (y el `finished`) de la carga más
    /// reciente; los de cargas superadas se descartan.
    LatestOnly,
}

impl FromStr for LoadPolicy {
    type Err = AsyncDataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "deliver_all" => Ok(LoadPolicy::DeliverAll),
            "latest" | "latest_only" => Ok(LoadPolicy::LatestOnly),
            other => Err(AsyncDataError::Configuration(format!("{}: valor desconocido '{}'", LOAD_POLICY_ENV, other))),
        }
    }
}

/// Configuración de un `SourceNode`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceConfig {
    pub load_policy: LoadPolicy,
}

impl SourceConfig {
    /// Lee la configuración de `ASYNC_DATA_LOAD_POLICY` tras cargar un
    /// `.env` si existe. Sin variable se usa la configuración por defecto.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let load_policy = match std::env::var(LOAD_POLICY_ENV) {
            Ok(raw) => raw.parse()?,
            Err(_) => LoadPolicy::default(),
        };
        Ok(Self { load_policy })
    }
}
