// Archivo: errors.rs
// Propósito: definir los errores del crate y el alias Result<T> usado por
// las APIs públicas. Los fallos de una carga NO son errores: viajan como
// valores por el canal `failed`.
use thiserror::Error;

/// Errores de programación y configuración del motor de propagación.
///
/// - `Configuration`: el futuro devuelto por la función de carga no acepta
///   continuaciones, o una variable de entorno tiene un valor inválido.
/// - `AlreadySettled`: se intentó resolver dos veces un `Deferred`.
/// - `EmptyCombination`: `all` recibió cero nodos.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsyncDataError {
    /// El futuro no pudo registrar sus callbacks o la configuración es inválida.
    #[error("Configuración inválida: {0}")]
    Configuration(String),
    /// El futuro ya tiene un resultado y no admite otro.
    #[error("El futuro ya fue resuelto: {0}")]
    AlreadySettled(String),
    /// `all` necesita al menos un nodo fuente.
    #[error("Combinación vacía: all() requiere al menos un nodo")]
    EmptyCombination,
}

/// Alias de resultado usado por las APIs del crate.
pub type Result<T> = std::result::Result<T, AsyncDataError>;
