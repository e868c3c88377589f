// Archivo: combined.rs
// Propósito: `CombinedNode` y el combinador `all`, que une varios nodos en
// uno solo. Reglas por canal:
// - started: OR, cualquier fuente que empieza.
// - succeeded: AND la primera vez (todas las fuentes con valor), luego cada
//   éxito individual redespacha con el último valor conocido de cada una.
// - failed: OR, se reenvía el motivo de la fuente tal cual.
// - finished: igual que succeeded, sin payload.
use crate::errors::{AsyncDataError, Result};
use crate::node::{AsyncData, Node};
use std::cell::RefCell;
use std::rc::Rc;

/// Nodo sintetizado a partir de varias fuentes. El valor de éxito es la
/// lista de valores de las fuentes, en el orden en que se pasaron a `all`.
///
/// Las fuentes se referencian, no se controlan: el nodo combinado no inicia
/// cargas.
#[derive(Debug, Clone)]
pub struct CombinedNode<T, E> {
    node: Node<Vec<T>, E>,
    sources: Vec<Node<T, E>>,
}

impl<T: Clone + 'static, E: Clone + 'static> CombinedNode<T, E> {
    pub fn sources(&self) -> &[Node<T, E>] {
        &self.sources
    }
}

impl<T: Clone + 'static, E: Clone + 'static> AsyncData<Vec<T>, E> for CombinedNode<T, E> {
    fn node(&self) -> &Node<Vec<T>, E> {
        &self.node
    }
}

/// Une `sources` en un `CombinedNode`.
///
/// Si todas las fuentes ya tienen resultado, el nodo combinado nace con él.
/// Devuelve `AsyncDataError::EmptyCombination` si no se pasa ningún nodo.
pub fn all<'a, T, E, N, I>(sources: I) -> Result<CombinedNode<T, E>>
    where T: Clone + 'static,
          E: Clone + 'static,
          N: AsyncData<T, E> + 'a,
          I: IntoIterator<Item = &'a N>
{
    let sources: Vec<Node<T, E>> = sources.into_iter().map(|s| s.node().clone()).collect();
    if sources.is_empty() {
        return Err(AsyncDataError::EmptyCombination);
    }

    let node = Node::<Vec<T>, E>::new();
    let values: Rc<RefCell<Vec<Option<T>>>> = Rc::new(RefCell::new(vec![None; sources.len()]));
    let finishes: Rc<RefCell<Vec<bool>>> = Rc::new(RefCell::new(vec![false; sources.len()]));
    log::debug!("node {} joins {} sources", node.id(), sources.len());

    for (index, source) in sources.iter().enumerate() {
        let target = node.started().clone();
        source.started().subscribe(move |_| target.dispatch(()));

        let (target, slots) = (node.succeeded().clone(), Rc::clone(&values));
        source.succeeded().subscribe(move |value: &T| {
                              let snapshot = {
                                  let mut slots = slots.borrow_mut();
                                  slots[index] = Some(value.clone());
                                  slots.iter().cloned().collect::<Option<Vec<T>>>()
                              };
                              if let Some(joined) = snapshot {
                                  target.dispatch(joined);
                              }
                          });

        let target = node.failed().clone();
        source.failed().subscribe(move |reason: &E| target.dispatch(reason.clone()));

        let (target, slots) = (node.finished().clone(), Rc::clone(&finishes));
        source.finished().subscribe(move |_| {
                             let complete = {
                                 let mut slots = slots.borrow_mut();
                                 slots[index] = true;
                                 slots.iter().all(|done| *done)
                             };
                             if complete {
                                 target.dispatch(());
                             }
                         });
    }

    Ok(CombinedNode { node, sources })
}
