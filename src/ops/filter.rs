//! Filter operator implementation

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
};

/// Forwards only the values satisfying `filter`; terminal events always pass.
///
/// ```
/// use rxstream::prelude::*;
///
/// let mut evens = vec![];
/// observable::range(0, 6).filter(|v| v % 2 == 0).subscribe(|v| evens.push(v));
/// assert_eq!(evens, vec![0, 2, 4]);
/// ```
#[derive(Clone)]
pub struct Filter<S, F> {
  pub source: S,
  pub filter: F,
}

impl<S: ObservableType, F> ObservableType for Filter<S, F> {
  type Item = S::Item;
  type Err = S::Err;
}

pub struct FilterObserver<O, F> {
  observer: O,
  filter: F,
}

impl<O, F, Item, Err> Observer<Item, Err> for FilterObserver<O, F>
where
  O: Observer<Item, Err>,
  F: FnMut(&Item) -> bool,
{
  fn next(&mut self, value: Item) {
    if (self.filter)(&value) {
      self.observer.next(value);
    }
  }

  fn error(self, err: Err) { self.observer.error(err); }

  fn complete(self) { self.observer.complete(); }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

impl<S, F, O> CoreObservable<O> for Filter<S, F>
where
  S: CoreObservable<FilterObserver<O, F>>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let Filter { source, filter } = self;
    source.actual_subscribe(FilterObserver { observer, filter })
  }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;

  #[test]
  fn terminal_events_pass_through() {
    let mut events = vec![];
    observable::of([1, 2, 3])
      .filter(|_| false)
      .subscribe_event(|e| events.push(e));
    assert_eq!(events, vec![Event::Completed]);

    let mut errors = vec![];
    observable::throw_err::<i32, _>("boom")
      .filter(|_| true)
      .subscribe_err(|_| {}, |e| errors.push(e));
    assert_eq!(errors, vec!["boom"]);
  }

  #[test]
  fn predicate_sees_every_value() {
    let mut seen = vec![];
    let mut kept = vec![];
    observable::from_iter(["a", "bb", "ccc"])
      .filter(|s| {
        seen.push(*s);
        s.len() > 1
      })
      .subscribe(|s| kept.push(s));
    assert_eq!(seen, vec!["a", "bb", "ccc"]);
    assert_eq!(kept, vec!["bb", "ccc"]);
  }
}
