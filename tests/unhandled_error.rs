//! The unhandled-error hook is process wide, so it lives in its own test
//! binary.

use std::sync::{Arc, Mutex};

use rxstream::{observer::reset_unhandled_error_hook, prelude::*};

#[test]
fn errors_without_a_handler_reach_the_hook() {
  let reported = Arc::new(Mutex::new(vec![]));
  let c_reported = reported.clone();
  set_unhandled_error_hook(move |err| c_reported.lock().unwrap().push(format!("{err:?}")));

  observable::throw_err::<i32, _>("boom").subscribe(|_| {});
  observable::of([1, 2])
    .map_err(observable::infallible::<&'static str>)
    .concat(observable::throw_err("late"))
    .subscribe_err(|_| {}, |_| {});

  let subject = Subject::<i32, &'static str>::default();
  subject.dispose();
  subject.clone().subscribe_err(|_| {}, |_| {});

  reset_unhandled_error_hook();
  observable::throw_err::<i32, _>("after reset").subscribe(|_| {});

  assert_eq!(*reported.lock().unwrap(), vec!["\"boom\"".to_string(), "Disposed".to_string()]);
}
