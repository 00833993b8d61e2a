use std::convert::Infallible;

use super::{BehaviorSubject, SubjectSubscription};
use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
};

/// A current value that can be watched.
///
/// Wraps a [`BehaviorSubject`] that is only fed through
/// [`set_value`](Self::set_value): subscribers get the current value, then
/// every change. The stream never errors and completes when the variable is
/// dropped.
///
/// ```
/// use std::sync::{Arc, Mutex};
///
/// use rxstream::prelude::*;
///
/// let seen = Arc::new(Mutex::new(vec![]));
/// let c_seen = seen.clone();
///
/// let mut variable = Variable::new("initial");
/// variable.set_value("first");
/// variable
///   .as_observable()
///   .subscribe_event(move |e| c_seen.lock().unwrap().push(e));
/// variable.set_value("second");
/// drop(variable);
///
/// assert_eq!(
///   *seen.lock().unwrap(),
///   vec![Event::Next("first"), Event::Next("second"), Event::Completed]
/// );
/// ```
pub struct Variable<Item: Clone> {
  value: Item,
  subject: BehaviorSubject<Item, Infallible>,
}

impl<Item: Clone> Variable<Item> {
  pub fn new(value: Item) -> Self { Variable { subject: BehaviorSubject::new(value.clone()), value } }

  pub fn value(&self) -> Item { self.value.clone() }

  /// Replace the value and push it to every subscriber.
  pub fn set_value(&mut self, value: Item) {
    self.value = value.clone();
    self.subject.next(value);
  }

  /// Subscribe-only view of the variable.
  pub fn as_observable(&self) -> VariableObservable<Item> { VariableObservable(self.subject.clone()) }

  pub fn observer_count(&self) -> usize { self.subject.observer_count() }
}

impl<Item: Clone> Drop for Variable<Item> {
  fn drop(&mut self) { self.subject.clone().complete() }
}

/// The observable side of a [`Variable`]; it cannot emit.
pub struct VariableObservable<Item>(BehaviorSubject<Item, Infallible>);

impl<Item> Clone for VariableObservable<Item> {
  fn clone(&self) -> Self { VariableObservable(self.0.clone()) }
}

impl<Item> ObservableType for VariableObservable<Item> {
  type Item = Item;
  type Err = Infallible;
}

impl<Item, O> CoreObservable<O> for VariableObservable<Item>
where
  O: Observer<Item, Infallible> + Send + 'static,
  Item: Clone + Send + 'static,
{
  type Unsub = SubjectSubscription<Item, Infallible>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub { self.0.actual_subscribe(observer) }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::prelude::*;

  #[test]
  fn subscribers_start_from_the_current_value() {
    let mut variable = Variable::new(1);
    variable.set_value(2);
    assert_eq!(variable.value(), 2);

    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    variable
      .as_observable()
      .map(|v| v * 10)
      .subscribe(move |v| c_out.lock().unwrap().push(v));
    variable.set_value(3);

    assert_eq!(*out.lock().unwrap(), vec![20, 30]);
    assert_eq!(variable.value(), 3);
  }

  #[test]
  fn dropping_completes_every_subscriber() {
    let variable = Variable::new("a");
    let observable = variable.as_observable();
    let events = Arc::new(Mutex::new(vec![]));
    let c_events = events.clone();
    observable
      .clone()
      .subscribe_event(move |e| c_events.lock().unwrap().push(e));
    assert_eq!(variable.observer_count(), 1);

    drop(variable);
    assert_eq!(*events.lock().unwrap(), vec![Event::Next("a"), Event::Completed]);

    let late = Arc::new(Mutex::new(vec![]));
    let c_late = late.clone();
    observable.subscribe_event(move |e| c_late.lock().unwrap().push(e));
    assert_eq!(*late.lock().unwrap(), vec![Event::Completed]);
  }

  #[test]
  fn unsubscribed_observer_misses_later_values() {
    let mut variable = Variable::new(0);
    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    let subscription = variable
      .as_observable()
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    variable.set_value(1);
    subscription.unsubscribe();
    variable.set_value(2);

    assert_eq!(*out.lock().unwrap(), vec![0, 1]);
    assert_eq!(variable.observer_count(), 0);
  }
}
