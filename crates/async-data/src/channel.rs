// Archivo: channel.rs
// Propósito: canal de notificación multicast, opcionalmente con replay del
// último payload para suscriptores tardíos. Es la única pieza del crate que
// recuerda valores: todo comportamiento de "suscriptor tardío" se reduce a
// este mecanismo.
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

type Listener<T> = Rc<dyn Fn(&T)>;

struct ChannelState<T> {
    listeners: Vec<Listener<T>>,
    replay: bool,
    last: Option<T>,
    dispatches: u64,
}

/// Canal multicast de un solo hilo.
///
/// Los listeners se invocan en orden de suscripción. Un listener añadido
/// durante un `dispatch` no recibe ese mismo `dispatch`; empieza a recibir
/// a partir del siguiente (y, si el canal es de replay, recibe el último
/// valor en el momento de suscribirse).
///
/// Los clones comparten estado: clonar un `Channel` produce otro handle al
/// mismo canal.
pub struct Channel<T> {
    state: Rc<RefCell<ChannelState<T>>>,
}

impl<T> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Self { state: Rc::clone(&self.state) }
    }
}

impl<T> fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Channel")
         .field("replay", &state.replay)
         .field("listeners", &state.listeners.len())
         .field("dispatches", &state.dispatches)
         .finish()
    }
}

impl<T: Clone + 'static> Channel<T> {
    fn with_replay(replay: bool) -> Self {
        Self { state: Rc::new(RefCell::new(ChannelState { listeners: Vec::new(),
                                                          replay,
                                                          last: None,
                                                          dispatches: 0 })) }
    }

    /// Canal sin memoria: cada `dispatch` llega sólo a los listeners
    /// registrados en ese momento.
    pub fn plain() -> Self {
        Self::with_replay(false)
    }

    /// Canal que recuerda el último payload y lo reenvía de inmediato a
    /// cualquier listener añadido después de un `dispatch`.
    pub fn replaying() -> Self {
        Self::with_replay(true)
    }

    pub fn is_replaying(&self) -> bool {
        self.state.borrow().replay
    }

    /// Registra `listener` para los próximos `dispatch`. Si el canal es de
    /// replay y ya hubo un `dispatch`, lo invoca de forma síncrona con el
    /// último payload antes de retornar.
    pub fn subscribe<L>(&self, listener: L)
        where L: Fn(&T) + 'static
    {
        let listener: Listener<T> = Rc::new(listener);
        // El borrow se suelta antes de invocar: el listener puede suscribir
        // o despachar sobre este mismo canal.
        let replayed = {
            let mut state = self.state.borrow_mut();
            state.listeners.push(Rc::clone(&listener));
            if state.replay {
                state.last.clone()
            } else {
                None
            }
        };
        if let Some(payload) = replayed {
            listener(&payload);
        }
    }

    /// Invoca a todos los listeners registrados, en orden de suscripción.
    ///
    /// Un panic dentro de un listener no se captura: se propaga al llamador
    /// y los listeners restantes no reciben este `dispatch`.
    pub fn dispatch(&self, payload: T) {
        let listeners = {
            let mut state = self.state.borrow_mut();
            state.dispatches += 1;
            if state.replay {
                state.last = Some(payload.clone());
            }
            state.listeners.clone()
        };
        for listener in listeners.iter() {
            listener(&payload);
        }
    }

    /// Último payload despachado (sólo en canales de replay).
    pub fn last(&self) -> Option<T> {
        self.state.borrow().last.clone()
    }

    /// Número de listeners registrados. En los canales de un `Node` incluye
    /// los listeners internos que mantienen `is_loading` (uno en `started`
    /// y otro en `finished`).
    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    pub fn dispatch_count(&self) -> u64 {
        self.state.borrow().dispatches
    }
}
