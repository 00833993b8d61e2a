//! Reduce operator implementation

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
};

/// Folds the source into one value, emitted right before completion.
///
/// An empty source emits the seed. On error nothing is emitted.
#[derive(Clone)]
pub struct Reduce<S, F, Acc> {
  pub source: S,
  pub func: F,
  pub seed: Acc,
}

impl<S: ObservableType, F, Acc> ObservableType for Reduce<S, F, Acc> {
  type Item = Acc;
  type Err = S::Err;
}

pub struct ReduceObserver<O, F, Acc> {
  observer: O,
  func: F,
  acc: Option<Acc>,
}

impl<O, F, Acc, Item, Err> Observer<Item, Err> for ReduceObserver<O, F, Acc>
where
  O: Observer<Acc, Err>,
  F: FnMut(Acc, Item) -> Acc,
{
  fn next(&mut self, value: Item) {
    if let Some(acc) = self.acc.take() {
      self.acc = Some((self.func)(acc, value));
    }
  }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(mut self) {
    if let Some(acc) = self.acc.take() {
      self.observer.next(acc);
    }
    self.observer.complete()
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

impl<S, F, Acc, O> CoreObservable<O> for Reduce<S, F, Acc>
where
  S: CoreObservable<ReduceObserver<O, F, Acc>>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let Reduce { source, func, seed } = self;
    source.actual_subscribe(ReduceObserver { observer, func, acc: Some(seed) })
  }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;

  #[test]
  fn emits_once_before_completion() {
    let mut events = vec![];
    observable::range(1, 4)
      .reduce(0, |acc, v| acc + v)
      .subscribe_event(|e| events.push(e));
    assert_eq!(events, vec![Event::Next(10), Event::Completed]);
  }

  #[test]
  fn empty_source_emits_the_seed() {
    let mut out = vec![];
    observable::empty::<i32>()
      .reduce(7, |acc, v| acc * v)
      .subscribe(|v| out.push(v));
    assert_eq!(out, vec![7]);
  }

  #[test]
  fn error_emits_nothing() {
    let mut events = vec![];
    observable::of([1, 2])
      .map_err(observable::infallible)
      .concat(observable::throw_err("boom"))
      .reduce(0, |acc, v| acc + v)
      .subscribe_event(|e| events.push(e));
    assert_eq!(events, vec![Event::Error("boom")]);
  }

  #[test]
  fn float_average() {
    let mut average = 0.0;
    observable::of([1.5f64, 2.5, 3.5])
      .reduce((0.0, 0usize), |(sum, n), v| (sum + v, n + 1))
      .map(|(sum, n)| sum / n as f64)
      .subscribe(|v| average = v);
    assert!(float_cmp::approx_eq!(f64, average, 2.5, ulps = 2));
  }
}
