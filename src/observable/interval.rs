use std::convert::Infallible;

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  scheduler::{Duration, Scheduler, TaskHandle},
};

/// Creates an observable which emits sequential numbers every `period`,
/// starting one period after subscription, until unsubscribed.
///
/// # Panics
///
/// Panics if `period` is zero.
pub fn interval<Sch: Scheduler>(period: Duration, scheduler: Sch) -> Interval<Sch> {
  assert!(!period.is_zero(), "interval period must be non-zero");
  Interval { period, delay: None, scheduler }
}

/// Like [`interval`], but the first number is emitted after `delay`.
pub fn interval_at<Sch: Scheduler>(delay: Duration, period: Duration, scheduler: Sch) -> Interval<Sch> {
  assert!(!period.is_zero(), "interval period must be non-zero");
  Interval { period, delay: Some(delay), scheduler }
}

#[derive(Clone)]
pub struct Interval<Sch> {
  period: Duration,
  delay: Option<Duration>,
  scheduler: Sch,
}

impl<Sch> ObservableType for Interval<Sch> {
  type Item = usize;
  type Err = Infallible;
}

impl<Sch, O> CoreObservable<O> for Interval<Sch>
where
  Sch: Scheduler,
  O: Observer<usize, Infallible> + Send + 'static,
{
  type Unsub = TaskHandle;

  fn actual_subscribe(self, mut observer: O) -> Self::Unsub {
    self.scheduler.schedule_repeating(
      move |tick| {
        if !observer.is_closed() {
          observer.next(tick);
        }
      },
      self.period,
      self.delay,
    )
  }
}
