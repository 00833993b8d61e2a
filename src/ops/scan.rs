//! Scan operator implementation

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
};

/// Emits the running accumulation of the source, one value per input.
///
/// ```
/// use rxstream::prelude::*;
///
/// let mut sums = vec![];
/// observable::of([1, 2, 3]).scan(0, |acc, v| acc + v).subscribe(|v| sums.push(v));
/// assert_eq!(sums, vec![1, 3, 6]);
/// ```
#[derive(Clone)]
pub struct Scan<S, F, Acc> {
  pub source: S,
  pub func: F,
  pub seed: Acc,
}

impl<S: ObservableType, F, Acc> ObservableType for Scan<S, F, Acc> {
  type Item = Acc;
  type Err = S::Err;
}

pub struct ScanObserver<O, F, Acc> {
  observer: O,
  func: F,
  acc: Acc,
}

impl<O, F, Acc, Item, Err> Observer<Item, Err> for ScanObserver<O, F, Acc>
where
  O: Observer<Acc, Err>,
  F: FnMut(Acc, Item) -> Acc,
  Acc: Clone,
{
  fn next(&mut self, value: Item) {
    self.acc = (self.func)(self.acc.clone(), value);
    self.observer.next(self.acc.clone());
  }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

impl<S, F, Acc, O> CoreObservable<O> for Scan<S, F, Acc>
where
  S: CoreObservable<ScanObserver<O, F, Acc>>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let Scan { source, func, seed } = self;
    source.actual_subscribe(ScanObserver { observer, func, acc: seed })
  }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;

  #[test]
  fn seed_is_not_emitted() {
    let mut out = vec![];
    observable::empty::<i32>()
      .scan(100, |acc, v| acc + v)
      .subscribe_event(|e| out.push(e));
    assert_eq!(out, vec![Event::Completed]);
  }

  #[test]
  fn accumulator_can_change_type() {
    let mut out = vec![];
    observable::of(["a", "b", "c"])
      .scan(String::new(), |mut acc, v| {
        acc.push_str(v);
        acc
      })
      .subscribe(|v| out.push(v));
    assert_eq!(out, vec!["a", "ab", "abc"]);
  }
}
