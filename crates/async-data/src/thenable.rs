// Archivo: thenable.rs
// Propósito: definir el contrato mínimo que el motor consume del futuro
// externo devuelto por una función de carga. El motor nunca ejecuta la
// operación: sólo se engancha a su resultado.
use crate::errors::Result;

/// Resultado final de un futuro.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T, E> {
    Fulfilled(T),
    Rejected(E),
}

impl<T, E> Outcome<T, E> {
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Outcome::Fulfilled(_))
    }
}

impl<T, E> From<std::result::Result<T, E>> for Outcome<T, E> {
    fn from(res: std::result::Result<T, E>) -> Self {
        match res {
            Ok(v) => Outcome::Fulfilled(v),
            Err(e) => Outcome::Rejected(e),
        }
    }
}

/// Contrato del futuro externo.
///
/// Una implementación debe invocar exactamente una de las dos ramas de cada
/// continuación registrada, y cada completion registrada una vez, cuando el
/// futuro se resuelva. Cuándo y en qué contexto se invocan depende del
/// propio futuro.
///
/// Registrar puede fallar (`AsyncDataError::Configuration`) si el futuro no
/// está en condiciones de aceptar callbacks. Una implementación debe aceptar
/// o rechazar ambos registros por igual; si aun así acepta uno y rechaza el
/// otro, `SourceNode::load` abandona esa carga y no entrega su resultado.
pub trait Thenable {
    type Value: Clone + 'static;
    type Error: Clone + 'static;

    /// Registra las ramas de éxito y de fallo.
    fn attach_continuation<S, R>(&self, on_success: S, on_failure: R) -> Result<()>
        where S: FnOnce(Self::Value) + 'static,
              R: FnOnce(Self::Error) + 'static;

    /// Registra un callback que corre tras cualquiera de las dos ramas.
    fn attach_completion<D>(&self, on_done: D) -> Result<()>
        where D: FnOnce() + 'static;
}
