use async_data::{all, AsyncData, AsyncDataError, Deferred, Node, SourceNode};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

type Queue = Rc<RefCell<VecDeque<Deferred<String, String>>>>;

fn queued_source() -> (SourceNode<(), Deferred<String, String>>, Queue) {
  let queue: Queue = Rc::new(RefCell::new(VecDeque::new()));
  let sink = Rc::clone(&queue);
  let source = SourceNode::new(move |_: ()| {
    let d = Deferred::new();
    sink.borrow_mut().push_back(d.clone());
    d
  });
  (source, queue)
}

fn next(queue: &Queue) -> Deferred<String, String> {
  queue.borrow_mut().pop_front().expect("a pending load")
}

#[test]
fn combined_node_supports_chaining() {
  let (a, _) = queued_source();
  let (b, _) = queued_source();
  let combined = all([&a, &b]).unwrap();
  assert_eq!(combined.sources().len(), 2);
  let child: Node<usize, String> = combined.requested(|| {}).map(|values| values.len());
  assert!(child.value().is_none());
}

#[test]
fn success_waits_for_every_source_then_refires_with_stale_values() {
  let (a, qa) = queued_source();
  let (b, qb) = queued_source();
  let seen = Rc::new(RefCell::new(Vec::new()));
  let finals = Rc::new(RefCell::new(0));
  let (sink, fin) = (Rc::clone(&seen), Rc::clone(&finals));
  let _view = all([&a, &b]).unwrap()
                           .resolved_with(move |v| sink.borrow_mut().push(v), |e| e, move || *fin.borrow_mut() += 1);

  a.load(()).unwrap();
  b.load(()).unwrap();
  next(&qa).resolve("a1".into()).unwrap();
  assert!(seen.borrow().is_empty());
  assert_eq!(*finals.borrow(), 0);
  next(&qb).resolve("b1".into()).unwrap();
  assert_eq!(*seen.borrow(), vec![vec!["a1".to_string(), "b1".to_string()]]);
  assert_eq!(*finals.borrow(), 1);

  a.load(()).unwrap();
  next(&qa).resolve("a2".into()).unwrap();
  assert_eq!(seen.borrow().last().cloned(), Some(vec!["a2".to_string(), "b1".to_string()]));
  assert_eq!(seen.borrow().len(), 2);
  assert_eq!(*finals.borrow(), 2);
}

#[test]
fn failure_passes_through_without_waiting() {
  let (a, qa) = queued_source();
  let (b, _qb) = queued_source();
  let combined = all([&a, &b]).unwrap();

  a.load(()).unwrap();
  b.load(()).unwrap();
  next(&qa).reject("a broke".into()).unwrap();
  assert_eq!(combined.node().error(), Some("a broke".to_string()));
  assert_eq!(combined.node().value(), None);
}

#[test]
fn started_is_any_source_and_loading_clears_on_joined_finish() {
  let (a, qa) = queued_source();
  let (b, qb) = queued_source();
  let combined = all([&a, &b]).unwrap();
  let starts = Rc::new(RefCell::new(0));
  let counter = Rc::clone(&starts);
  combined.requested(move || *counter.borrow_mut() += 1);

  a.load(()).unwrap();
  assert!(combined.is_loading());
  b.load(()).unwrap();
  assert_eq!(*starts.borrow(), 2);

  next(&qa).resolve("a".into()).unwrap();
  assert!(combined.is_loading());
  next(&qb).resolve("b".into()).unwrap();
  assert!(!combined.is_loading());
}

#[test]
fn late_combination_is_born_with_joined_result() {
  let a = SourceNode::new(|_: ()| Deferred::<i32, String>::fulfilled(1));
  let b = SourceNode::new(|_: ()| Deferred::<i32, String>::fulfilled(2));
  a.load(()).unwrap();
  b.load(()).unwrap();

  let sum = all([&a, &b]).unwrap().map(|v| v.iter().sum::<i32>());
  assert_eq!(sum.value(), Some(3));
}

#[test]
fn combinations_nest() {
  let a = SourceNode::new(|_: ()| Deferred::<i32, String>::fulfilled(1));
  let inner = all([&a]).unwrap();
  let outer = all([inner.node(), &inner.node().clone()]).unwrap();
  a.load(()).unwrap();
  assert_eq!(outer.node().value(), Some(vec![vec![1], vec![1]]));
}

#[test]
fn empty_combination_is_rejected() {
  let none: Vec<&Node<i32, String>> = Vec::new();
  assert_eq!(all(none).unwrap_err(), AsyncDataError::EmptyCombination);
}
