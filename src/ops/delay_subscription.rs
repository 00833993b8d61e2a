//! DelaySubscription operator implementation

use crate::{
  observable::{CoreObservable, ObservableType},
  scheduler::{Duration, Scheduler, TaskHandle},
  subscription::{SerialSubscription, Subscription, TupleSubscription},
};

/// Subscribes to the source only once `delay` has elapsed on `scheduler`.
///
/// Unsubscribing before that cancels the pending subscribe, so the source is
/// never touched.
#[derive(Debug, Clone)]
pub struct DelaySubscription<S, Sch> {
  pub source: S,
  pub delay: Duration,
  pub scheduler: Sch,
}

impl<S: ObservableType, Sch> ObservableType for DelaySubscription<S, Sch> {
  type Item = S::Item;
  type Err = S::Err;
}

impl<S, Sch, O> CoreObservable<O> for DelaySubscription<S, Sch>
where
  S: CoreObservable<O> + Send + 'static,
  S::Unsub: Send + 'static,
  O: Send + 'static,
  Sch: Scheduler,
{
  type Unsub = TupleSubscription<TaskHandle, SerialSubscription>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let DelaySubscription { source, delay, scheduler } = self;
    let upstream = SerialSubscription::default();
    let slot = upstream.clone();
    let handle = scheduler.schedule(
      move || {
        if !slot.is_closed() {
          slot.replace(source.actual_subscribe(observer));
        }
      },
      Some(delay),
    );
    TupleSubscription::new(handle, upstream)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::prelude::*;

  #[test]
  fn subscribes_after_the_delay() {
    let scheduler = TestScheduler::default();
    let mut source = Subject::<i32, ()>::default();
    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    source
      .clone()
      .delay_subscription(Duration::from_millis(100), scheduler.clone())
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    assert_eq!(source.observer_count(), 0);
    source.next(1);
    scheduler.advance_by(Duration::from_millis(100));
    assert_eq!(source.observer_count(), 1);
    source.next(2);

    assert_eq!(*out.lock().unwrap(), vec![2]);
  }

  #[test]
  fn cold_source_starts_late() {
    let scheduler = TestScheduler::default();
    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    observable::of([1, 2])
      .delay_subscription(Duration::from_millis(10), scheduler.clone())
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    assert!(out.lock().unwrap().is_empty());
    scheduler.advance_by(Duration::from_millis(10));
    assert_eq!(*out.lock().unwrap(), vec![1, 2]);
  }

  #[test]
  fn unsubscribe_before_the_delay_never_subscribes() {
    let scheduler = TestScheduler::default();
    let source = Subject::<i32, ()>::default();
    let subscription = source
      .clone()
      .delay_subscription(Duration::from_millis(100), scheduler.clone())
      .subscribe(|_| {});

    subscription.unsubscribe();
    scheduler.advance_by(Duration::from_millis(200));

    assert_eq!(source.observer_count(), 0);
  }
}
