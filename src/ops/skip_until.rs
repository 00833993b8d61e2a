//! SkipUntil operator implementation
//!
//! Drops source values until a trigger observable emits its first value.

use std::sync::{
  atomic::{AtomicBool, Ordering},
  Arc,
};

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  subscription::{SerialSubscription, Subscription, TupleSubscription},
};

/// SkipUntil operator
///
/// The gate opens on the trigger's first value and the trigger is released
/// right away. A trigger that terminates without a value keeps the gate shut
/// for good. Source errors always pass; source completion passes only once
/// the gate is open. Either terminal releases the trigger.
#[derive(Clone)]
pub struct SkipUntil<S, T> {
  pub source: S,
  pub trigger: T,
}

impl<S: ObservableType, T> ObservableType for SkipUntil<S, T> {
  type Item = S::Item;
  type Err = S::Err;
}

/// Observer of the source.
pub struct SkipUntilObserver<O> {
  observer: O,
  open: Arc<AtomicBool>,
  trigger: SerialSubscription,
}

impl<O, Item, Err> Observer<Item, Err> for SkipUntilObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if self.open.load(Ordering::Acquire) {
      self.observer.next(value);
    }
  }

  fn error(self, err: Err) {
    self.trigger.unsubscribe();
    self.observer.error(err);
  }

  fn complete(self) {
    self.trigger.unsubscribe();
    if self.open.load(Ordering::Acquire) {
      self.observer.complete();
    }
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

/// Observer of the trigger.
pub struct SkipUntilTriggerObserver {
  open: Arc<AtomicBool>,
  trigger: SerialSubscription,
}

impl<Item, Err> Observer<Item, Err> for SkipUntilTriggerObserver {
  fn next(&mut self, _: Item) {
    if !self.open.swap(true, Ordering::AcqRel) {
      self.trigger.clone().unsubscribe();
    }
  }

  fn error(self, _: Err) {}

  fn complete(self) {}

  fn is_closed(&self) -> bool { self.open.load(Ordering::Acquire) || self.trigger.is_closed() }
}

impl<S, T, O> CoreObservable<O> for SkipUntil<S, T>
where
  S: CoreObservable<SkipUntilObserver<O>>,
  T: CoreObservable<SkipUntilTriggerObserver>,
  T::Unsub: Send + 'static,
{
  type Unsub = TupleSubscription<S::Unsub, SerialSubscription>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let SkipUntil { source, trigger } = self;
    let open = Arc::new(AtomicBool::new(false));
    let trigger_slot = SerialSubscription::default();

    let trigger_unsub =
      trigger.actual_subscribe(SkipUntilTriggerObserver { open: open.clone(), trigger: trigger_slot.clone() });
    trigger_slot.replace(trigger_unsub);

    let source_unsub = source.actual_subscribe(SkipUntilObserver { observer, open, trigger: trigger_slot.clone() });
    TupleSubscription::new(source_unsub, trigger_slot)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::prelude::*;

  #[test]
  fn drops_until_trigger_fires() {
    let mut source = Subject::<i32, ()>::default();
    let mut trigger = Subject::<(), ()>::default();
    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    source
      .clone()
      .skip_until(trigger.clone())
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    source.next(1);
    source.next(2);
    trigger.next(());
    source.next(3);
    trigger.next(());
    source.next(4);

    assert_eq!(*out.lock().unwrap(), vec![3, 4]);
    assert_eq!(trigger.observer_count(), 0);
  }

  #[test]
  fn silent_trigger_keeps_the_gate_shut() {
    let mut source = Subject::<i32, ()>::default();
    let trigger = Subject::<(), ()>::default();
    let events = Arc::new(Mutex::new(vec![]));
    let c_events = events.clone();
    source
      .clone()
      .skip_until(trigger.clone())
      .subscribe_event(move |e| c_events.lock().unwrap().push(e));

    trigger.clone().complete();
    source.next(1);
    source.clone().complete();

    assert!(events.lock().unwrap().is_empty());
  }

  #[test]
  fn completion_passes_once_open() {
    let mut events = vec![];
    observable::of([1, 2])
      .skip_until(observable::just(()))
      .subscribe_event(|e| events.push(e));
    assert_eq!(events, vec![Event::Next(1), Event::Next(2), Event::Completed]);
  }

  #[test]
  fn errors_pass_while_shut() {
    let source = Subject::<i32, &'static str>::default();
    let trigger = Subject::<(), &'static str>::default();
    let events = Arc::new(Mutex::new(vec![]));
    let c_events = events.clone();
    source
      .clone()
      .skip_until(trigger.clone())
      .subscribe_event(move |e| c_events.lock().unwrap().push(e));

    source.clone().error("boom");

    assert_eq!(*events.lock().unwrap(), vec![Event::Error("boom")]);
    assert_eq!(trigger.observer_count(), 0);
  }

  #[test]
  fn synchronous_trigger_opens_immediately() {
    let mut out = vec![];
    observable::of([1, 2, 3])
      .skip_until(observable::just(()))
      .subscribe(|v| out.push(v));
    assert_eq!(out, vec![1, 2, 3]);
  }

  #[test]
  fn unsubscribe_releases_both() {
    let source = Subject::<i32, ()>::default();
    let trigger = Subject::<(), ()>::default();
    let subscription = source.clone().skip_until(trigger.clone()).subscribe(|_| {});
    assert_eq!(source.observer_count(), 1);
    assert_eq!(trigger.observer_count(), 1);
    subscription.unsubscribe();
    assert_eq!(source.observer_count(), 0);
    assert_eq!(trigger.observer_count(), 0);
  }
}
