use async_data::{async_data, AsyncData, Deferred, Node, SourceNode};
use std::cell::RefCell;
use std::rc::Rc;

type Source = SourceNode<(), Deferred<i32, String>>;

/// Fuente cuya función de carga devuelve siempre el mismo `Deferred`.
fn source_with(pending: &Deferred<i32, String>) -> Source {
  let handle = pending.clone();
  async_data(move |_: ()| handle.clone())
}

fn spy<T: Clone + 'static>() -> (Rc<RefCell<Vec<T>>>, impl Fn(T) + 'static) {
  let calls = Rc::new(RefCell::new(Vec::new()));
  let sink = Rc::clone(&calls);
  (calls, move |v: T| sink.borrow_mut().push(v))
}

#[test]
fn success_flows_through_transform_chain() {
  let pending = Deferred::new();
  let data = source_with(&pending);
  let (calls, cb) = spy::<i32>();
  let (finals, fin) = spy::<()>();
  let _leaf = data.resolved_with(|v| v * 10, |e| e, || {})
                  .resolved_with(move |v| cb(v), |e: String| e, move || fin(()));

  data.load(()).unwrap();
  assert!(calls.borrow().is_empty());
  pending.resolve(5).unwrap();
  assert_eq!(*calls.borrow(), vec![50]);
  assert_eq!(finals.borrow().len(), 1);
}

#[test]
fn failure_flows_through_transform_chain() {
  let pending = Deferred::new();
  let data = source_with(&pending);
  let (successes, ok) = spy::<i32>();
  let (failures, ko) = spy::<String>();
  let (finals, fin) = spy::<()>();
  let _leaf = data.map_err(|_| "fail".to_string())
                  .resolved()
                  .resolved_with(move |v| ok(v), move |e| ko(e), move || fin(()));

  data.load(()).unwrap();
  pending.reject("no".into()).unwrap();
  assert!(successes.borrow().is_empty());
  assert_eq!(*failures.borrow(), vec!["fail".to_string()]);
  assert_eq!(finals.borrow().len(), 1);
}

#[test]
fn identity_children_propagate_original_value() {
  let pending = Deferred::new();
  let data = source_with(&pending);
  let (calls, cb) = spy::<i32>();
  let _leaf = data.resolved().resolved().map(move |v| cb(v));

  data.load(()).unwrap();
  pending.resolve(5).unwrap();
  assert_eq!(*calls.borrow(), vec![5]);
}

#[test]
fn late_child_is_born_with_transformed_result() {
  let data = source_with(&Deferred::fulfilled(4));
  data.load(()).unwrap();

  let doubled = data.map(|v| v * 2);
  assert_eq!(doubled.value(), Some(8));

  let (calls, cb) = spy::<i32>();
  let _grandchild = doubled.map(move |v| cb(v + 1));
  assert_eq!(*calls.borrow(), vec![9]);
  assert!(!doubled.is_loading());
}

#[test]
fn sibling_children_each_receive_every_dispatch() {
  let pending = Deferred::new();
  let data = source_with(&pending);
  let (left, l) = spy::<i32>();
  let (right, r) = spy::<i32>();
  let _a = data.map(move |v| l(v));
  let _b = data.map(move |v| r(v));

  data.load(()).unwrap();
  pending.resolve(3).unwrap();
  data.load(()).unwrap();
  assert_eq!(*left.borrow(), vec![3, 3]);
  assert_eq!(*right.borrow(), vec![3, 3]);
}

#[test]
fn requested_fires_on_every_chained_level() {
  let data = source_with(&Deferred::new());
  let (calls, _) = spy::<&'static str>();
  let (c1, c2, c3) = (Rc::clone(&calls), Rc::clone(&calls), Rc::clone(&calls));

  data.requested(move || c1.borrow_mut().push("source"));
  let level2 = data.resolved();
  level2.requested(move || c2.borrow_mut().push("level2"));
  let level3 = level2.resolved();
  level3.requested(move || c3.borrow_mut().push("level3"));

  data.load(()).unwrap();
  assert!(data.is_loading());
  assert!(level2.is_loading());
  assert!(level3.is_loading());
  assert_eq!(*calls.borrow(), vec!["source", "level2", "level3"]);
}

#[test]
fn requested_and_resolved_chain_in_either_order() {
  let data = source_with(&Deferred::new());
  let count = Rc::new(RefCell::new(0));
  let (c1, c2, c3) = (Rc::clone(&count), Rc::clone(&count), Rc::clone(&count));

  let _tail = data.requested(move || *c1.borrow_mut() += 1)
                  .resolved()
                  .requested(move || *c2.borrow_mut() += 1)
                  .resolved()
                  .requested(move || *c3.borrow_mut() += 1)
                  .clone();

  data.load(()).unwrap();
  assert_eq!(*count.borrow(), 3);
}

#[test]
fn chaining_never_triggers_a_load() {
  let loads = Rc::new(RefCell::new(0));
  let counter = Rc::clone(&loads);
  let data = async_data(move |_: ()| {
    *counter.borrow_mut() += 1;
    Deferred::<i32, String>::new()
  });
  let _child = data.resolved().map(|v| v + 1);
  data.requested(|| {});
  assert_eq!(*loads.borrow(), 0);
  assert!(!data.is_loading());
}

#[test]
fn finally_runs_once_per_finished_without_touching_values() {
  let pending = Deferred::new();
  let data = source_with(&pending);
  let (finals, fin) = spy::<()>();
  let child = data.finally(move || fin(()));

  data.load(()).unwrap();
  pending.resolve(1).unwrap();
  data.load(()).unwrap();
  assert_eq!(finals.borrow().len(), 2);
  assert_eq!(child.value(), Some(1));
}

#[test]
#[should_panic(expected = "transform bug")]
fn panicking_transform_propagates_out_of_dispatch() {
  let pending = Deferred::new();
  let data = source_with(&pending);
  let _child = data.map_err(|_: String| -> String { panic!("transform bug") });
  data.load(()).unwrap();
  let _ = pending.reject("no".into());
}

#[test]
fn node_channels_count_internal_loading_listeners() {
  let node = Node::<i32, String>::new();
  assert_eq!(node.started().listener_count(), 1);
  assert_eq!(node.finished().listener_count(), 1);
  assert_eq!(node.succeeded().listener_count(), 0);
  node.requested(|| {});
  assert_eq!(node.started().listener_count(), 2);
}
