//! Take operator implementation

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  subscription::{SerialSubscription, Subscription},
};

/// Emits only the first `count` values emitted by the source Observable.
///
/// After the `count`-th value it completes and unsubscribes the source,
/// regardless of what the source does next. A source with fewer values ends
/// the stream with its own terminal event.
///
/// # Example
///
/// ```
/// use rxstream::prelude::*;
///
/// let mut out = vec![];
/// observable::from_iter(0..10).take(5).subscribe(|v| out.push(v));
/// assert_eq!(out, vec![0, 1, 2, 3, 4]);
/// ```
#[derive(Clone)]
pub struct Take<S> {
  pub source: S,
  pub count: usize,
}

impl<S: ObservableType> ObservableType for Take<S> {
  type Item = S::Item;
  type Err = S::Err;
}

pub struct TakeObserver<O> {
  observer: Option<O>,
  remaining: usize,
  upstream: SerialSubscription,
}

impl<O, Item, Err> Observer<Item, Err> for TakeObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    let Some(observer) = self.observer.as_mut() else { return };
    self.remaining -= 1;
    observer.next(value);
    if self.remaining == 0 {
      if let Some(observer) = self.observer.take() {
        observer.complete();
      }
      self.upstream.clone().unsubscribe();
    }
  }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

impl<S, O> CoreObservable<O> for Take<S>
where
  S: CoreObservable<TakeObserver<O>>,
  S::Unsub: Send + 'static,
  O: Observer<S::Item, S::Err>,
{
  type Unsub = SerialSubscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let Take { source, count } = self;
    let upstream = SerialSubscription::default();
    if count == 0 {
      observer.complete();
      upstream.clone().unsubscribe();
      return upstream;
    }
    let unsub = source.actual_subscribe(TakeObserver { observer: Some(observer), remaining: count, upstream: upstream.clone() });
    upstream.replace(unsub);
    upstream
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::prelude::*;

  #[test]
  fn base_function() {
    let mut completed = false;
    let mut next_count = 0;

    observable::from_iter(0..100)
      .take(5)
      .subscribe_complete(|_| next_count += 1, || completed = true);

    assert_eq!(next_count, 5);
    assert!(completed);
  }

  #[test]
  fn shorter_source_forwards_its_own_terminal() {
    let mut events = vec![];
    observable::of([1, 2])
      .map_err(observable::infallible)
      .concat(observable::throw_err("boom"))
      .take(5)
      .subscribe_event(|e| events.push(e));
    assert_eq!(events, vec![Event::Next(1), Event::Next(2), Event::Error("boom")]);
  }

  #[test]
  fn take_zero_completes_without_subscribing() {
    let subscribed = Arc::new(Mutex::new(false));
    let c_subscribed = subscribed.clone();
    let mut events = vec![];
    observable::defer(move || {
      *c_subscribed.lock().unwrap() = true;
      observable::of([1])
    })
    .take(0)
    .subscribe_event(|e| events.push(e));

    assert_eq!(events, vec![Event::Completed]);
    assert!(!*subscribed.lock().unwrap());
  }

  #[test]
  fn unsubscribes_a_hot_source() {
    let mut source = Subject::<i32, ()>::default();
    let events = Arc::new(Mutex::new(vec![]));
    let c_events = events.clone();
    source
      .clone()
      .take(2)
      .subscribe_event(move |e| c_events.lock().unwrap().push(e));
    assert_eq!(source.observer_count(), 1);

    source.next(1);
    source.next(2);
    source.next(3);

    assert_eq!(*events.lock().unwrap(), vec![Event::Next(1), Event::Next(2), Event::Completed]);
    assert_eq!(source.observer_count(), 0);
  }

  #[test]
  fn take_on_interval() {
    let scheduler = TestScheduler::default();
    let values = Arc::new(Mutex::new(vec![]));
    let c_values = values.clone();
    observable::interval(Duration::from_millis(1), scheduler.clone())
      .take(3)
      .subscribe(move |v| c_values.lock().unwrap().push(v));
    scheduler.advance_by(Duration::from_millis(10));
    assert_eq!(*values.lock().unwrap(), vec![0, 1, 2]);
    assert_eq!(scheduler.pending_count(), 0);
  }
}
