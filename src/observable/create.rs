use std::marker::PhantomData;

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::{Emitter, Observer},
  subscription::Subscription,
};

/// Observable created from a producer function.
///
/// The producer gets a `&mut dyn Emitter` and returns the teardown of whatever
/// it started. It runs once per subscription. Nothing is completed on its
/// behalf, and calls made after a terminal event are dropped. A producer that
/// ends the stream has its teardown run right away.
///
/// ```
/// use rxstream::prelude::*;
///
/// let mut values = vec![];
/// observable::create(|emitter: &mut dyn Emitter<i32, ()>| {
///   emitter.next(1);
///   emitter.complete();
///   emitter.next(2);
/// })
/// .subscribe(|v| values.push(v));
/// assert_eq!(values, vec![1]);
/// ```
pub fn create<F, Item, Err, U>(producer: F) -> Create<F, Item, Err>
where
  F: FnOnce(&mut dyn Emitter<Item, Err>) -> U,
  U: Subscription,
{
  Create { producer, _marker: PhantomData }
}

pub struct Create<F, Item, Err> {
  producer: F,
  _marker: PhantomData<fn() -> (Item, Err)>,
}

impl<F: Clone, Item, Err> Clone for Create<F, Item, Err> {
  fn clone(&self) -> Self { Create { producer: self.producer.clone(), _marker: PhantomData } }
}

impl<F, Item, Err> ObservableType for Create<F, Item, Err> {
  type Item = Item;
  type Err = Err;
}

/// Wrapper to implement Emitter for Option<O>
struct CreateEmitter<O>(Option<O>);

impl<O, Item, Err> Emitter<Item, Err> for CreateEmitter<O>
where
  O: Observer<Item, Err>,
{
  #[inline]
  fn next(&mut self, value: Item) {
    if let Some(observer) = &mut self.0 {
      observer.next(value);
    }
  }

  #[inline]
  fn error(&mut self, err: Err) {
    if let Some(observer) = self.0.take() {
      observer.error(err);
    }
  }

  #[inline]
  fn complete(&mut self) {
    if let Some(observer) = self.0.take() {
      observer.complete();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.as_ref().map_or(true, Observer::<Item, Err>::is_closed) }
}

impl<F, Item, Err, U, O> CoreObservable<O> for Create<F, Item, Err>
where
  O: Observer<Item, Err>,
  F: FnOnce(&mut dyn Emitter<Item, Err>) -> U,
  U: Subscription,
{
  type Unsub = Option<U>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let mut emitter = CreateEmitter(Some(observer));
    let teardown = (self.producer)(&mut emitter);
    // The producer already ended the stream, or downstream left while it ran.
    if Emitter::<Item, Err>::is_closed(&emitter) {
      teardown.unsubscribe();
      None
    } else {
      Some(teardown)
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
  };

  use crate::prelude::*;

  #[test]
  fn next_after_complete_is_dropped() {
    let mut next = 0;
    let mut complete = 0;
    let mut error = 0;

    observable::create(|emitter: &mut dyn Emitter<i32, &str>| {
      emitter.next(1);
      emitter.next(2);
      emitter.next(3);
      emitter.complete();
      emitter.next(3);
      emitter.error("never dispatch error");
    })
    .subscribe_all(|_| next += 1, |_| error += 1, || complete += 1);

    assert_eq!(next, 3);
    assert_eq!(complete, 1);
    assert_eq!(error, 0);
  }

  #[test]
  fn no_auto_complete() {
    let events = Arc::new(Mutex::new(vec![]));
    let c_events = events.clone();
    observable::create(|emitter: &mut dyn Emitter<i32, ()>| emitter.next(1))
      .subscribe_event(move |e| c_events.lock().unwrap().push(e));
    assert_eq!(*events.lock().unwrap(), vec![Event::Next(1)]);
  }

  #[test]
  fn teardown_runs_on_unsubscribe() {
    let unsubscribed = Arc::new(AtomicBool::new(false));
    let c_unsubscribed = unsubscribed.clone();

    let subscription = observable::create(move |emitter: &mut dyn Emitter<i32, ()>| {
      emitter.next(1);
      ClosureSubscription(move || c_unsubscribed.store(true, Ordering::SeqCst))
    })
    .subscribe(|_| {});

    assert!(!unsubscribed.load(Ordering::SeqCst));
    subscription.unsubscribe();
    assert!(unsubscribed.load(Ordering::SeqCst));
  }

  #[test]
  fn teardown_runs_once_the_stream_ends() {
    let released = Arc::new(Mutex::new(0));
    let c_released = released.clone();
    let completed = std::cell::Cell::new(false);

    let subscription = observable::create(move |emitter: &mut dyn Emitter<i32, ()>| {
      emitter.next(1);
      emitter.complete();
      ClosureSubscription(move || *c_released.lock().unwrap() += 1)
    })
    .subscribe_complete(|_| {}, || completed.set(true));

    assert!(completed.get());
    assert_eq!(*released.lock().unwrap(), 1);
    subscription.unsubscribe();
    assert_eq!(*released.lock().unwrap(), 1);
  }

  #[test]
  fn teardown_runs_when_downstream_stops_early() {
    let released = Arc::new(AtomicBool::new(false));
    let c_released = released.clone();
    let mut out = vec![];

    observable::create(move |emitter: &mut dyn Emitter<i32, ()>| {
      emitter.next(1);
      emitter.next(2);
      ClosureSubscription(move || c_released.store(true, Ordering::SeqCst))
    })
    .take(1)
    .subscribe(|v| out.push(v));

    assert_eq!(out, vec![1]);
    assert!(released.load(Ordering::SeqCst));
  }

  #[test]
  fn every_subscription_reruns_the_producer() {
    let runs = Arc::new(Mutex::new(0));
    let c_runs = runs.clone();
    let source = observable::create(move |emitter: &mut dyn Emitter<i32, ()>| {
      *c_runs.lock().unwrap() += 1;
      emitter.complete();
    });
    source.clone().subscribe(|_| {});
    source.subscribe(|_| {});
    assert_eq!(*runs.lock().unwrap(), 2);
  }
}
