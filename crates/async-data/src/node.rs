// Archivo: node.rs
// Propósito: el nodo encadenable (`Node`) con sus cuatro canales y la
// bandera `is_loading`, más el trait `AsyncData` que comparten nodos
// derivados, nodos fuente y nodos combinados.
//
// Relación de propiedad: cada listener que un padre registra para su hijo
// guarda un handle al hijo. El grafo es un DAG padre -> hijo sin ciclos, así
// que el conteo de referencias basta para liberar nodos.
use crate::channel::Channel;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

struct NodeInner<T, E> {
    id: Uuid,
    started: Channel<()>,
    succeeded: Channel<T>,
    failed: Channel<E>,
    finished: Channel<()>,
    is_loading: Rc<Cell<bool>>,
}

/// Unidad encadenable del ciclo de vida de una carga.
///
/// `started` es un canal simple; `succeeded`, `failed` y `finished` son de
/// replay, lo que permite que un hijo creado tarde nazca ya con el último
/// resultado transformado.
///
/// `Node` es un handle barato de clonar; los clones apuntan al mismo nodo.
pub struct Node<T, E> {
    inner: Rc<NodeInner<T, E>>,
}

impl<T, E> Clone for Node<T, E> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<T, E> fmt::Debug for Node<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
         .field("id", &self.inner.id)
         .field("is_loading", &self.inner.is_loading.get())
         .finish()
    }
}

impl<T: Clone + 'static, E: Clone + 'static> Default for Node<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static, E: Clone + 'static> Node<T, E> {
    /// Crea un nodo sin padres. `is_loading` queda enganchado a sus propios
    /// canales antes que cualquier listener externo, así que `started` y
    /// `finished` nacen con un listener cada uno.
    pub fn new() -> Self {
        let id = Uuid::new_v4();
        let started = Channel::plain();
        let finished = Channel::replaying();
        let is_loading = Rc::new(Cell::new(false));

        let flag = Rc::clone(&is_loading);
        started.subscribe(move |_| {
                   log::debug!("node {} started", id);
                   flag.set(true);
               });
        let flag = Rc::clone(&is_loading);
        finished.subscribe(move |_| {
                    log::debug!("node {} finished", id);
                    flag.set(false);
                });

        Self { inner: Rc::new(NodeInner { id,
                                          started,
                                          succeeded: Channel::replaying(),
                                          failed: Channel::replaying(),
                                          finished,
                                          is_loading }) }
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn started(&self) -> &Channel<()> {
        &self.inner.started
    }

    pub fn succeeded(&self) -> &Channel<T> {
        &self.inner.succeeded
    }

    pub fn failed(&self) -> &Channel<E> {
        &self.inner.failed
    }

    pub fn finished(&self) -> &Channel<()> {
        &self.inner.finished
    }

    /// Último valor de éxito que llegó a este nodo.
    pub fn value(&self) -> Option<T> {
        self.inner.succeeded.last()
    }

    /// Último motivo de fallo que llegó a este nodo.
    pub fn error(&self) -> Option<E> {
        self.inner.failed.last()
    }
}

/// Interfaz común de todo lo que se comporta como un nodo para encadenar:
/// nodos derivados, `SourceNode` y `CombinedNode`.
///
/// Ninguna operación dispara una carga: sólo añaden suscripciones.
pub trait AsyncData<T: Clone + 'static, E: Clone + 'static> {
    /// Nodo subyacente con los cuatro canales.
    fn node(&self) -> &Node<T, E>;

    /// `true` entre un `started` y el siguiente `finished` que llegan al nodo.
    fn is_loading(&self) -> bool {
        self.node().inner.is_loading.get()
    }

    /// Registra `listener` para cada inicio de carga y devuelve `self` para
    /// seguir encadenando.
    fn requested<L>(&self, listener: L) -> &Self
        where L: Fn() + 'static
    {
        self.node().started().subscribe(move |_| listener());
        self
    }

    /// Crea un nodo hijo cableado a los cuatro canales de este nodo.
    ///
    /// - `started` se reenvía sin cambios.
    /// - `succeeded` pasa por `on_success`, `failed` por `on_failure`.
    /// - en `finished` se llama `on_finally` y luego se reenvía.
    ///
    /// Si este nodo ya produjo un resultado, el hijo lo recibe (transformado)
    /// antes de que esta llamada retorne.
    fn resolved_with<U, F, S, R, D>(&self, on_success: S, on_failure: R, on_finally: D) -> Node<U, F>
        where U: Clone + 'static,
              F: Clone + 'static,
              S: Fn(T) -> U + 'static,
              R: Fn(E) -> F + 'static,
              D: Fn() + 'static
    {
        let parent = self.node();
        let child = Node::<U, F>::new();
        log::debug!("node {} derived from {}", child.id(), parent.id());

        let target = child.started().clone();
        parent.started().subscribe(move |_| target.dispatch(()));

        let target = child.succeeded().clone();
        parent.succeeded().subscribe(move |value: &T| target.dispatch(on_success(value.clone())));

        let target = child.failed().clone();
        parent.failed().subscribe(move |reason: &E| target.dispatch(on_failure(reason.clone())));

        let target = child.finished().clone();
        parent.finished().subscribe(move |_| {
                             on_finally();
                             target.dispatch(());
                         });

        child
    }

    /// Hijo identidad: propaga los cuatro eventos sin transformar.
    fn resolved(&self) -> Node<T, E> {
        self.resolved_with(|value| value, |reason| reason, || {})
    }

    /// Hijo que transforma sólo el valor de éxito.
    fn map<U, S>(&self, on_success: S) -> Node<U, E>
        where U: Clone + 'static,
              S: Fn(T) -> U + 'static
    {
        self.resolved_with(on_success, |reason| reason, || {})
    }

    /// Hijo que transforma sólo el motivo de fallo.
    fn map_err<F, R>(&self, on_failure: R) -> Node<T, F>
        where F: Clone + 'static,
              R: Fn(E) -> F + 'static
    {
        self.resolved_with(|value| value, on_failure, || {})
    }

    /// Hijo identidad que ejecuta `on_finally` en cada `finished`.
    fn finally<D>(&self, on_finally: D) -> Node<T, E>
        where D: Fn() + 'static
    {
        self.resolved_with(|value| value, |reason| reason, on_finally)
    }
}

impl<T: Clone + 'static, E: Clone + 'static> AsyncData<T, E> for Node<T, E> {
    fn node(&self) -> &Node<T, E> {
        self
    }
}
