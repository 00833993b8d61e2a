//! DistinctUntilChanged operator implementation

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
};

/// Forwards a value only if it differs from the previous forwarded one.
///
/// `eq` decides equality; `distinct_until_changed` uses `PartialEq`. The
/// first value always passes.
///
/// ```
/// use rxstream::prelude::*;
///
/// let mut out = vec![];
/// observable::of(['A', 'A', 'B', 'B', 'B', 'A']).distinct_until_changed().subscribe(|v| out.push(v));
/// assert_eq!(out, vec!['A', 'B', 'A']);
/// ```
#[derive(Clone)]
pub struct DistinctUntilChanged<S, F> {
  pub source: S,
  pub eq: F,
}

impl<S: ObservableType, F> ObservableType for DistinctUntilChanged<S, F> {
  type Item = S::Item;
  type Err = S::Err;
}

pub struct DistinctUntilChangedObserver<O, F, Item> {
  observer: O,
  eq: F,
  last: Option<Item>,
}

impl<O, F, Item, Err> Observer<Item, Err> for DistinctUntilChangedObserver<O, F, Item>
where
  O: Observer<Item, Err>,
  F: FnMut(&Item, &Item) -> bool,
  Item: Clone,
{
  fn next(&mut self, value: Item) {
    if let Some(last) = &self.last {
      if (self.eq)(last, &value) {
        return;
      }
    }
    self.last = Some(value.clone());
    self.observer.next(value);
  }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

impl<S, F, O> CoreObservable<O> for DistinctUntilChanged<S, F>
where
  S: CoreObservable<DistinctUntilChangedObserver<O, F, <S as ObservableType>::Item>>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let DistinctUntilChanged { source, eq } = self;
    source.actual_subscribe(DistinctUntilChangedObserver { observer, eq, last: None })
  }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;

  #[test]
  fn custom_equality() {
    let mut out = vec![];
    observable::of([1, 11, 2, 22, 3])
      .distinct_until_changed_by(|a, b| a % 10 == b % 10)
      .subscribe(|v| out.push(v));
    assert_eq!(out, vec![1, 2, 3]);
  }

  #[test]
  fn compares_with_last_forwarded_value() {
    let mut out = vec![];
    observable::of([1, 2, 1, 1, 3, 3])
      .distinct_until_changed()
      .subscribe(|v| out.push(v));
    assert_eq!(out, vec![1, 2, 1, 3]);
  }
}
