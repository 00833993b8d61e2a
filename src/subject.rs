//! Subjects: observables that are also observers and multicast what they
//! receive to every current subscriber.
//!
//! - [`Subject`] forwards live values only.
//! - [`BehaviorSubject`] holds a current value and hands it to each new
//!   subscriber.
//! - [`ReplaySubject`] hands new subscribers the most recent values, even
//!   after termination.
//! - [`Variable`] owns a current value and completes its watchers when
//!   dropped.
//!
//! All three are cheap handles: clones share one subject. Terminal events are
//! sticky, so a late subscriber of a terminated subject receives the terminal
//! event right away.

mod behavior_subject;
mod replay_subject;
mod subject_core;
mod subject_subscription;
mod subscribers;
mod variable;

pub use behavior_subject::BehaviorSubject;
pub use replay_subject::ReplaySubject;
use subject_core::{Replay, SubjectCore};
pub use subject_subscription::SubjectSubscription;
pub use variable::{Variable, VariableObservable};

/// Publish subject: subscribers only see what is emitted after they joined.
///
/// ```
/// use std::sync::{Arc, Mutex};
///
/// use rxstream::prelude::*;
///
/// let mut subject = Subject::<i32, ()>::default();
/// subject.next(1);
///
/// let seen = Arc::new(Mutex::new(vec![]));
/// let c_seen = seen.clone();
/// subject.clone().subscribe(move |v| c_seen.lock().unwrap().push(v));
/// subject.next(2);
///
/// assert_eq!(*seen.lock().unwrap(), vec![2]);
/// ```
pub struct Subject<Item, Err> {
  core: SubjectCore<Item, Err>,
}

impl<Item, Err> Default for Subject<Item, Err> {
  fn default() -> Self { Self { core: SubjectCore::new(Replay::Nothing) } }
}

impl<Item, Err> Subject<Item, Err> {
  pub fn new() -> Self { Self::default() }
}

/// Shared surface of every subject flavor.
macro_rules! impl_subject {
  ($ty:ident) => {
    impl<Item, Err> Clone for $ty<Item, Err> {
      fn clone(&self) -> Self { Self { core: self.core.clone() } }
    }

    impl<Item, Err> $ty<Item, Err> {
      /// Number of observers currently subscribed.
      pub fn observer_count(&self) -> usize { self.core.observer_count() }

      /// Whether the subject terminated or was disposed.
      pub fn is_stopped(&self) -> bool { self.core.is_stopped() }

      pub fn is_disposed(&self) -> bool { self.core.is_disposed() }

      /// Drop all observers without notifying them and release buffered
      /// values. Later emissions are ignored. Later subscribers receive only
      /// the terminal event; when there was none, they receive nothing and
      /// [`RxError::Disposed`](crate::error::RxError::Disposed) goes to the
      /// unhandled-error hook.
      pub fn dispose(&self) { self.core.dispose() }
    }

    impl<Item, Err> $crate::observable::ObservableType for $ty<Item, Err> {
      type Item = Item;
      type Err = Err;
    }

    impl<Item, Err, O> $crate::observable::CoreObservable<O> for $ty<Item, Err>
    where
      O: $crate::observer::Observer<Item, Err> + Send + 'static,
      Item: Clone + Send + 'static,
      Err: Clone + Send + 'static,
    {
      type Unsub = $crate::subject::SubjectSubscription<Item, Err>;

      fn actual_subscribe(self, observer: O) -> Self::Unsub { self.core.subscribe(Box::new(observer)) }
    }

    impl<Item, Err> $crate::observer::Observer<Item, Err> for $ty<Item, Err>
    where
      Item: Clone,
      Err: Clone,
    {
      #[inline]
      fn next(&mut self, value: Item) { self.core.next(value) }

      #[inline]
      fn error(self, err: Err) { self.core.error(err) }

      #[inline]
      fn complete(self) { self.core.complete() }

      #[inline]
      fn is_closed(&self) -> bool { self.core.is_stopped() }
    }
  };
}

pub(crate) use impl_subject;

impl_subject!(Subject);

#[cfg(test)]
mod tests {
  use std::{
    sync::{Arc, Mutex},
    thread,
  };

  use crate::prelude::*;

  fn record<T: Clone + Send + 'static>(
    subject: &Subject<T, &'static str>,
  ) -> (Arc<Mutex<Vec<Event<T, &'static str>>>>, impl Subscription) {
    let events = Arc::new(Mutex::new(vec![]));
    let c_events = events.clone();
    let subscription = subject.clone().subscribe_event(move |e| c_events.lock().unwrap().push(e));
    (events, subscription)
  }

  #[test]
  fn multicasts_to_every_observer() {
    let mut subject = Subject::default();
    let (a, _a) = record(&subject);
    let (b, _b) = record(&subject);
    subject.next(1);
    subject.next(2);
    subject.clone().complete();

    let expected = vec![Event::Next(1), Event::Next(2), Event::Completed];
    assert_eq!(*a.lock().unwrap(), expected);
    assert_eq!(*b.lock().unwrap(), expected);
  }

  #[test]
  fn late_subscriber_gets_the_terminal_only() {
    let mut subject = Subject::<i32, _>::default();
    subject.next(1);
    subject.clone().error("boom");
    let (events, subscription) = record(&subject);
    assert_eq!(*events.lock().unwrap(), vec![Event::Error("boom")]);
    assert!(subscription.is_closed());
  }

  #[test]
  fn observer_may_unsubscribe_itself() {
    let mut subject = Subject::<i32, ()>::default();
    let seen = Arc::new(Mutex::new(vec![]));
    let handle: Arc<Mutex<Option<BoxSubscription>>> = Arc::new(Mutex::new(None));

    let c_seen = seen.clone();
    let c_handle = handle.clone();
    let subscription = subject.clone().subscribe(move |v| {
      c_seen.lock().unwrap().push(v);
      if let Some(subscription) = c_handle.lock().unwrap().take() {
        subscription.unsubscribe();
      }
    });
    *handle.lock().unwrap() = Some(subscription.into_boxed());

    subject.next(1);
    subject.next(2);
    assert_eq!(*seen.lock().unwrap(), vec![1]);
    assert_eq!(subject.observer_count(), 0);
  }

  #[test]
  fn observer_may_subscribe_during_broadcast() {
    let mut subject = Subject::<i32, ()>::default();
    let late = Arc::new(Mutex::new(vec![]));

    let c_subject = subject.clone();
    let c_late = late.clone();
    let subscribed = Arc::new(Mutex::new(false));
    subject.clone().subscribe(move |_| {
      let mut subscribed = subscribed.lock().unwrap();
      if !*subscribed {
        *subscribed = true;
        let c_late = c_late.clone();
        c_subject.clone().subscribe(move |v| c_late.lock().unwrap().push(v));
      }
    });

    subject.next(1);
    subject.next(2);
    assert_eq!(*late.lock().unwrap(), vec![2]);
    assert_eq!(subject.observer_count(), 2);
  }

  #[test]
  #[should_panic(expected = "re-entrant emission")]
  fn reentrant_emission_panics() {
    let mut subject = Subject::<i32, ()>::default();
    let c_subject = subject.clone();
    subject.clone().subscribe(move |v| {
      if v == 1 {
        c_subject.clone().next(2);
      }
    });
    subject.next(1);
  }

  #[test]
  fn dispose_releases_observers_silently() {
    let mut subject = Subject::<i32, &'static str>::default();
    let (events, _subscription) = record(&subject);
    subject.dispose();
    subject.next(1);

    assert!(events.lock().unwrap().is_empty());
    assert!(subject.is_disposed());
    assert_eq!(subject.observer_count(), 0);

    let (late, _) = record(&subject);
    assert!(late.lock().unwrap().is_empty());
  }

  #[test]
  fn broadcasts_are_serialized_across_threads() {
    let subject = Subject::<usize, ()>::default();
    let in_flight = Arc::new(Mutex::new(0usize));
    let max_in_flight = Arc::new(Mutex::new(0usize));
    let count = Arc::new(Mutex::new(0usize));

    let (c_in_flight, c_max, c_count) = (in_flight.clone(), max_in_flight.clone(), count.clone());
    subject.clone().subscribe(move |_| {
      let now = {
        let mut in_flight = c_in_flight.lock().unwrap();
        *in_flight += 1;
        *in_flight
      };
      {
        let mut max = c_max.lock().unwrap();
        *max = (*max).max(now);
      }
      thread::yield_now();
      *c_count.lock().unwrap() += 1;
      *c_in_flight.lock().unwrap() -= 1;
    });

    let handles: Vec<_> = (0..4)
      .map(|t| {
        let mut subject = subject.clone();
        thread::spawn(move || {
          for i in 0..100 {
            subject.next(t * 100 + i);
          }
        })
      })
      .collect();
    for handle in handles {
      handle.join().unwrap();
    }

    assert_eq!(*count.lock().unwrap(), 400);
    assert_eq!(*max_in_flight.lock().unwrap(), 1);
  }
}
