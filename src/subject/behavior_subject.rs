use super::{impl_subject, Replay, SubjectCore};
use crate::error::RxError;

/// Subject with a current value.
///
/// Every new subscriber receives the current value first, then the live
/// values. Once terminated only the terminal event is handed out.
///
/// ```
/// use std::sync::{Arc, Mutex};
///
/// use rxstream::prelude::*;
///
/// let mut subject = BehaviorSubject::<_, ()>::new(0);
/// subject.next(1);
///
/// let seen = Arc::new(Mutex::new(vec![]));
/// let c_seen = seen.clone();
/// subject.clone().subscribe(move |v| c_seen.lock().unwrap().push(v));
/// subject.next(2);
///
/// assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
/// assert_eq!(subject.value(), Ok(2));
/// ```
pub struct BehaviorSubject<Item, Err> {
  core: SubjectCore<Item, Err>,
}

impl<Item, Err> BehaviorSubject<Item, Err> {
  pub fn new(value: Item) -> Self { Self { core: SubjectCore::new(Replay::Latest(value)) } }
}

impl<Item: Clone, Err: Clone> BehaviorSubject<Item, Err> {
  /// The current value.
  ///
  /// Fails with [`RxError::Disposed`] after `dispose` and with
  /// [`RxError::Terminated`] after an error. A completed subject still
  /// reports its last value.
  pub fn value(&self) -> Result<Item, RxError> { self.core.latest() }
}

impl_subject!(BehaviorSubject);

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::prelude::*;

  fn record(subject: &BehaviorSubject<i32, &'static str>) -> Arc<Mutex<Vec<Event<i32, &'static str>>>> {
    let events = Arc::new(Mutex::new(vec![]));
    let c_events = events.clone();
    subject.clone().subscribe_event(move |e| c_events.lock().unwrap().push(e));
    events
  }

  #[test]
  fn new_subscriber_receives_the_seed() {
    let subject = BehaviorSubject::new(7);
    let events = record(&subject);
    assert_eq!(*events.lock().unwrap(), vec![Event::Next(7)]);
  }

  #[test]
  fn new_subscriber_receives_the_latest_value() {
    let mut subject = BehaviorSubject::new(0);
    let first = record(&subject);
    subject.next(1);
    subject.next(2);
    let second = record(&subject);
    subject.next(3);

    assert_eq!(*first.lock().unwrap(), vec![Event::Next(0), Event::Next(1), Event::Next(2), Event::Next(3)]);
    assert_eq!(*second.lock().unwrap(), vec![Event::Next(2), Event::Next(3)]);
  }

  #[test]
  fn completed_subject_replays_only_the_terminal() {
    let mut subject = BehaviorSubject::new(0);
    subject.next(1);
    subject.clone().complete();

    let late = record(&subject);
    assert_eq!(*late.lock().unwrap(), vec![Event::Completed]);
    assert_eq!(subject.value(), Ok(1));
  }

  #[test]
  fn value_after_error_and_dispose() {
    let subject = BehaviorSubject::<i32, &'static str>::new(1);
    subject.clone().error("boom");
    assert_eq!(subject.value(), Err(RxError::Terminated));

    let disposed = BehaviorSubject::<i32, &'static str>::new(1);
    disposed.dispose();
    assert_eq!(disposed.value(), Err(RxError::Disposed));
  }
}
