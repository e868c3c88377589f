// Archivo: stubs.rs
// Propósito: implementación en memoria de `Thenable` para pruebas, demos y
// wiring rápido. Un `Deferred` se resuelve a mano con `resolve`/`reject`.
use crate::errors::{AsyncDataError, Result};
use crate::thenable::{Outcome, Thenable};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

type Callback<T, E> = Box<dyn FnOnce(&Outcome<T, E>)>;

struct DeferredState<T, E> {
    outcome: Option<Outcome<T, E>>,
    callbacks: Vec<Callback<T, E>>,
}

/// Futuro en memoria que se resuelve manualmente.
///
/// - Se resuelve como mucho una vez; el segundo intento devuelve
///   `AsyncDataError::AlreadySettled`.
/// - Al resolverse corre los callbacks de forma síncrona y en el orden en
///   que se registraron (continuaciones y completions intercaladas).
/// - Un callback registrado después de resolverse corre de inmediato con el
///   resultado guardado, así que un mismo `Deferred` resuelto puede servir
///   a varias llamadas a `load()`.
///
/// Los clones comparten estado.
pub struct Deferred<T, E> {
    state: Rc<RefCell<DeferredState<T, E>>>,
}

impl<T, E> Clone for Deferred<T, E> {
    fn clone(&self) -> Self {
        Self { state: Rc::clone(&self.state) }
    }
}

impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for Deferred<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Deferred")
         .field("outcome", &state.outcome)
         .field("pending_callbacks", &state.callbacks.len())
         .finish()
    }
}

impl<T: Clone + 'static, E: Clone + 'static> Default for Deferred<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static, E: Clone + 'static> Deferred<T, E> {
    /// Crea un futuro pendiente.
    pub fn new() -> Self {
        Self { state: Rc::new(RefCell::new(DeferredState { outcome: None,
                                                          callbacks: Vec::new() })) }
    }

    /// Crea un futuro ya resuelto con éxito.
    pub fn fulfilled(value: T) -> Self {
        let d = Self::new();
        d.state.borrow_mut().outcome = Some(Outcome::Fulfilled(value));
        d
    }

    /// Crea un futuro ya rechazado.
    pub fn rejected(reason: E) -> Self {
        let d = Self::new();
        d.state.borrow_mut().outcome = Some(Outcome::Rejected(reason));
        d
    }

    pub fn resolve(&self, value: T) -> Result<()> {
        self.settle(Outcome::Fulfilled(value))
    }

    pub fn reject(&self, reason: E) -> Result<()> {
        self.settle(Outcome::Rejected(reason))
    }

    pub fn is_settled(&self) -> bool {
        self.state.borrow().outcome.is_some()
    }

    pub fn outcome(&self) -> Option<Outcome<T, E>> {
        self.state.borrow().outcome.clone()
    }

    fn settle(&self, outcome: Outcome<T, E>) -> Result<()> {
        let callbacks = {
            let mut state = self.state.borrow_mut();
            if state.outcome.is_some() {
                return Err(AsyncDataError::AlreadySettled("Deferred".into()));
            }
            state.outcome = Some(outcome.clone());
            std::mem::take(&mut state.callbacks)
        };
        for callback in callbacks {
            callback(&outcome);
        }
        Ok(())
    }

    /// Registra `callback`, o lo corre ya si el futuro está resuelto.
    fn register(&self, callback: Callback<T, E>) {
        let settled = {
            let mut state = self.state.borrow_mut();
            match state.outcome.clone() {
                Some(outcome) => Some((outcome, callback)),
                None => {
                    state.callbacks.push(callback);
                    None
                }
            }
        };
        if let Some((outcome, callback)) = settled {
            callback(&outcome);
        }
    }
}

impl<T: Clone + 'static, E: Clone + 'static> Thenable for Deferred<T, E> {
    type Value = T;
    type Error = E;

    fn attach_continuation<S, R>(&self, on_success: S, on_failure: R) -> Result<()>
        where S: FnOnce(T) + 'static,
              R: FnOnce(E) + 'static
    {
        self.register(Box::new(move |outcome: &Outcome<T, E>| match outcome {
                          Outcome::Fulfilled(v) => on_success(v.clone()),
                          Outcome::Rejected(e) => on_failure(e.clone()),
                      }));
        Ok(())
    }

    fn attach_completion<D>(&self, on_done: D) -> Result<()>
        where D: FnOnce() + 'static
    {
        self.register(Box::new(move |_: &Outcome<T, E>| on_done()));
        Ok(())
    }
}
