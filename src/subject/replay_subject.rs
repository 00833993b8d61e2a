use std::collections::VecDeque;

use super::{impl_subject, Replay, SubjectCore};

/// Subject replaying the most recent values to every new subscriber.
///
/// The buffer survives termination: a late subscriber of a terminated
/// subject receives the buffered values and then the terminal event. A
/// capacity of zero behaves like a plain [`Subject`](super::Subject).
pub struct ReplaySubject<Item, Err> {
  core: SubjectCore<Item, Err>,
}

impl<Item, Err> ReplaySubject<Item, Err> {
  /// Replays at most `capacity` values.
  pub fn new(capacity: usize) -> Self {
    Self { core: SubjectCore::new(Replay::Buffer { capacity: Some(capacity), values: VecDeque::new() }) }
  }

  /// Replays everything it ever received.
  pub fn unbounded() -> Self {
    Self { core: SubjectCore::new(Replay::Buffer { capacity: None, values: VecDeque::new() }) }
  }
}

impl_subject!(ReplaySubject);

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::prelude::*;

  fn record(subject: &ReplaySubject<i32, &'static str>) -> Arc<Mutex<Vec<Event<i32, &'static str>>>> {
    let events = Arc::new(Mutex::new(vec![]));
    let c_events = events.clone();
    subject.clone().subscribe_event(move |e| c_events.lock().unwrap().push(e));
    events
  }

  #[test]
  fn replays_the_last_values() {
    let mut subject = ReplaySubject::new(2);
    subject.next(1);
    subject.next(2);
    subject.next(3);

    let late = record(&subject);
    subject.next(4);
    assert_eq!(*late.lock().unwrap(), vec![Event::Next(2), Event::Next(3), Event::Next(4)]);
  }

  #[test]
  fn replays_buffer_then_error_after_termination() {
    let mut subject = ReplaySubject::new(3);
    subject.next(1);
    subject.next(2);
    subject.clone().error("boom");

    let late = record(&subject);
    assert_eq!(*late.lock().unwrap(), vec![Event::Next(1), Event::Next(2), Event::Error("boom")]);
  }

  #[test]
  fn unbounded_keeps_everything() {
    let mut subject = ReplaySubject::unbounded();
    for v in 0..100 {
      subject.next(v);
    }
    subject.clone().complete();

    let late = record(&subject);
    let late = late.lock().unwrap();
    assert_eq!(late.len(), 101);
    assert_eq!(late.last(), Some(&Event::Completed));
  }

  #[test]
  fn zero_capacity_acts_as_publish() {
    let mut subject = ReplaySubject::new(0);
    subject.next(1);
    let late = record(&subject);
    subject.next(2);
    assert_eq!(*late.lock().unwrap(), vec![Event::Next(2)]);
  }

  #[test]
  fn dispose_clears_the_buffer() {
    let mut subject = ReplaySubject::new(2);
    subject.next(1);
    subject.dispose();

    let late = record(&subject);
    assert!(late.lock().unwrap().is_empty());
  }
}
