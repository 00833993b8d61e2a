//! Map operator implementation
//!
//! `map` transforms every value with a closure; `map_with_index` also hands
//! the closure the zero-based position of the value.

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
};

#[derive(Clone)]
pub struct Map<S, F> {
  pub source: S,
  pub func: F,
}

impl<S, F, B> ObservableType for Map<S, F>
where
  S: ObservableType,
  F: FnMut(S::Item) -> B,
{
  type Item = B;
  type Err = S::Err;
}

pub struct MapObserver<O, F> {
  observer: O,
  func: F,
}

impl<O, F, Item, Err, B> Observer<Item, Err> for MapObserver<O, F>
where
  O: Observer<B, Err>,
  F: FnMut(Item) -> B,
{
  fn next(&mut self, value: Item) { self.observer.next((self.func)(value)) }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

impl<S, F, B, O> CoreObservable<O> for Map<S, F>
where
  S: CoreObservable<MapObserver<O, F>>,
  F: FnMut(S::Item) -> B,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let Map { source, func } = self;
    source.actual_subscribe(MapObserver { observer, func })
  }
}

#[derive(Clone)]
pub struct MapWithIndex<S, F> {
  pub source: S,
  pub func: F,
}

impl<S, F, B> ObservableType for MapWithIndex<S, F>
where
  S: ObservableType,
  F: FnMut(S::Item, usize) -> B,
{
  type Item = B;
  type Err = S::Err;
}

pub struct MapWithIndexObserver<O, F> {
  observer: O,
  func: F,
  index: usize,
}

impl<O, F, Item, Err, B> Observer<Item, Err> for MapWithIndexObserver<O, F>
where
  O: Observer<B, Err>,
  F: FnMut(Item, usize) -> B,
{
  fn next(&mut self, value: Item) {
    let index = self.index;
    self.index += 1;
    self.observer.next((self.func)(value, index))
  }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

impl<S, F, B, O> CoreObservable<O> for MapWithIndex<S, F>
where
  S: CoreObservable<MapWithIndexObserver<O, F>>,
  F: FnMut(S::Item, usize) -> B,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let MapWithIndex { source, func } = self;
    source.actual_subscribe(MapWithIndexObserver { observer, func, index: 0 })
  }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;

  #[test]
  fn primitive_type() {
    let mut i = 0;
    observable::from_iter(100..101)
      .map(|v| v * 2)
      .subscribe(|v| i += v);
    assert_eq!(i, 200);
  }

  #[test]
  fn reference_lifetime_should_work() {
    let mut i = 0;
    observable::of([100])
      .map(|v| v)
      .subscribe(|v| i += v);
    assert_eq!(i, 100);
  }

  #[test]
  fn changes_the_item_type() {
    let mut out = vec![];
    observable::of([1, 2])
      .map(|v| format!("#{v}"))
      .subscribe(|v| out.push(v));
    assert_eq!(out, vec!["#1".to_string(), "#2".to_string()]);
  }

  #[test]
  fn with_index_counts_from_zero() {
    let mut out = vec![];
    observable::of(["a", "b", "c"])
      .map_with_index(|v, i| (i, v))
      .subscribe(|v| out.push(v));
    assert_eq!(out, vec![(0, "a"), (1, "b"), (2, "c")]);
  }

  #[test]
  fn errors_pass_through() {
    let mut err = None;
    observable::throw_err::<i32, _>("boom")
      .map(|v| v + 1)
      .subscribe_err(|_| {}, |e| err = Some(e));
    assert_eq!(err, Some("boom"));
  }
}
