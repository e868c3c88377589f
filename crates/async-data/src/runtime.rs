// Archivo: runtime.rs
// Propósito: adaptador de cualquier `Future` de Rust al contrato
// `Thenable`, ejecutado con tokio en el hilo actual a través de un
// `LocalSet` explícito.
use crate::errors::Result;
use crate::stubs::Deferred;
use crate::thenable::{Outcome, Thenable};
use std::fmt;
use std::future::Future;
use tokio::task::LocalSet;

/// Futuro de tokio visto como `Thenable`.
///
/// La tarea se encola en `local` al construir el `LocalTask` y corre cuando
/// ese `LocalSet` se impulsa (`run_until`, `block_on` o `.await`). Mientras
/// tanto la carga queda pendiente. Encolar en un `LocalSet` nunca entra en
/// pánico, esté o no dentro de un runtime.
pub struct LocalTask<T, E> {
    settled: Deferred<T, E>,
}

impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for LocalTask<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalTask").field("settled", &self.settled).finish()
    }
}

impl<T: Clone + 'static, E: Clone + 'static> LocalTask<T, E> {
    pub fn new<Fut>(local: &LocalSet, future: Fut) -> Self
        where Fut: Future<Output = std::result::Result<T, E>> + 'static
    {
        let settled = Deferred::new();
        let target = settled.clone();
        local.spawn_local(async move {
                 let res = match future.await {
                     Ok(value) => target.resolve(value),
                     Err(reason) => target.reject(reason),
                 };
                 if let Err(e) = res {
                     log::warn!("LocalTask: {}", e);
                 }
             });
        Self { settled }
    }

    pub fn is_settled(&self) -> bool {
        self.settled.is_settled()
    }

    pub fn outcome(&self) -> Option<Outcome<T, E>> {
        self.settled.outcome()
    }
}

impl<T: Clone + 'static, E: Clone + 'static> Thenable for LocalTask<T, E> {
    type Value = T;
    type Error = E;

    fn attach_continuation<S, R>(&self, on_success: S, on_failure: R) -> Result<()>
        where S: FnOnce(T) + 'static,
              R: FnOnce(E) + 'static
    {
        self.settled.attach_continuation(on_success, on_failure)
    }

    fn attach_completion<D>(&self, on_done: D) -> Result<()>
        where D: FnOnce() + 'static
    {
        self.settled.attach_completion(on_done)
    }
}
