// Archivo: source.rs
// Propósito: `SourceNode`, el nodo raíz que posee la función de carga y
// expone `load()`. Traduce los callbacks del futuro externo a los canales
// `succeeded`, `failed` y `finished` de su nodo.
use crate::config::{LoadPolicy, SourceConfig};
use crate::errors::{AsyncDataError, Result};
use crate::node::{AsyncData, Node};
use crate::thenable::Thenable;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Marca de una carga concreta. Con `LoadPolicy::LatestOnly` una carga deja
/// de entregar resultados en cuanto otra más nueva empieza. Una carga cuyo
/// futuro rechazó alguno de los callbacks queda abandonada y no entrega nada.
#[derive(Clone)]
struct LoadTicket {
    issued: u64,
    current: Rc<Cell<u64>>,
    policy: LoadPolicy,
    abandoned: Rc<Cell<bool>>,
}

impl LoadTicket {
    fn delivers(&self) -> bool {
        if self.abandoned.get() {
            return false;
        }
        match self.policy {
            LoadPolicy::DeliverAll => true,
            LoadPolicy::LatestOnly => self.issued == self.current.get(),
        }
    }
}

/// Nodo fuente: dueño de la función de carga.
///
/// `A` es el tipo de los argumentos de `load` (una tupla si son varios) y
/// `F` el futuro que devuelve la función de carga.
pub struct SourceNode<A, F: Thenable> {
    node: Node<F::Value, F::Error>,
    load_fn: Box<dyn Fn(A) -> F>,
    last_arguments: RefCell<Option<A>>,
    generation: Rc<Cell<u64>>,
    config: SourceConfig,
}

impl<A, F: Thenable> fmt::Debug for SourceNode<A, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceNode")
         .field("node", &self.node)
         .field("loads", &self.generation.get())
         .field("config", &self.config)
         .finish()
    }
}

/// Atajo para `SourceNode::new`.
pub fn async_data<A, F, L>(load_fn: L) -> SourceNode<A, F>
    where A: Clone,
          F: Thenable,
          L: Fn(A) -> F + 'static
{
    SourceNode::new(load_fn)
}

impl<A: Clone, F: Thenable> SourceNode<A, F> {
    /// Crea un nodo fuente con la configuración por defecto
    /// (`LoadPolicy::DeliverAll`).
    pub fn new<L>(load_fn: L) -> Self
        where L: Fn(A) -> F + 'static
    {
        Self::with_config(load_fn, SourceConfig::default())
    }

    pub fn with_config<L>(load_fn: L, config: SourceConfig) -> Self
        where L: Fn(A) -> F + 'static
    {
        Self { node: Node::new(),
               load_fn: Box::new(load_fn),
               last_arguments: RefCell::new(None),
               generation: Rc::new(Cell::new(0)),
               config }
    }

    pub fn config(&self) -> SourceConfig {
        self.config
    }

    /// Argumentos de la última llamada a `load`.
    pub fn last_arguments(&self) -> Option<A> {
        self.last_arguments.borrow().clone()
    }

    /// Inicia una carga.
    ///
    /// 1. Despacha `started` (antes de invocar la función de carga).
    /// 2. Guarda `args` como últimos argumentos.
    /// 3. Invoca la función de carga y engancha el futuro a los canales.
    /// 4. Devuelve el futuro sin tocar.
    ///
    /// Si el futuro rechaza cualquiera de los dos callbacks se devuelve
    /// `AsyncDataError::Configuration`; `started` ya fue despachado y
    /// `is_loading` queda en `true` hasta la próxima carga que termine. La
    /// carga queda abandonada: aunque la continuación se haya registrado,
    /// su resultado no llega a los canales.
    ///
    /// Se permiten cargas solapadas; qué resultados se entregan depende de
    /// `SourceConfig::load_policy`.
    pub fn load(&self, args: A) -> Result<F> {
        let issued = self.generation.get() + 1;
        self.generation.set(issued);
        log::debug!("node {} load #{} requested", self.node.id(), issued);

        self.node.started().dispatch(());
        *self.last_arguments.borrow_mut() = Some(args.clone());
        let future = (self.load_fn)(args);

        let id = self.node.id();
        let ticket = LoadTicket { issued,
                                  current: Rc::clone(&self.generation),
                                  policy: self.config.load_policy,
                                  abandoned: Rc::new(Cell::new(false)) };
        let abandon = |e: &AsyncDataError| {
            log::warn!("node {} load #{} abandoned: {}", id, issued, e);
            ticket.abandoned.set(true);
        };

        let (succeeded, on_success_ticket) = (self.node.succeeded().clone(), ticket.clone());
        let (failed, on_failure_ticket) = (self.node.failed().clone(), ticket.clone());
        future.attach_continuation(move |value| {
                                       if on_success_ticket.delivers() {
                                           succeeded.dispatch(value);
                                       } else {
                                           log::debug!("node {} dropping success of load #{}", id, issued);
                                       }
                                   },
                                   move |reason| {
                                       if on_failure_ticket.delivers() {
                                           failed.dispatch(reason);
                                       } else {
                                           log::debug!("node {} dropping failure of load #{}", id, issued);
                                       }
                                   })
              .inspect_err(abandon)?;

        let (finished, on_done_ticket) = (self.node.finished().clone(), ticket.clone());
        future.attach_completion(move || {
                  if on_done_ticket.delivers() {
                      finished.dispatch(());
                  }
              })
              .inspect_err(abandon)?;

        Ok(future)
    }
}

impl<A, F: Thenable> AsyncData<F::Value, F::Error> for SourceNode<A, F> {
    fn node(&self) -> &Node<F::Value, F::Error> {
        &self.node
    }
}
