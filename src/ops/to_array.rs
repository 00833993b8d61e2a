//! ToArray operator implementation

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
};

/// Collects every value and emits them as one `Vec` when the source
/// completes. An error discards the collected values.
#[derive(Clone)]
pub struct ToArray<S> {
  pub source: S,
}

impl<S: ObservableType> ObservableType for ToArray<S> {
  type Item = Vec<S::Item>;
  type Err = S::Err;
}

pub struct ToArrayObserver<O, Item> {
  observer: O,
  values: Vec<Item>,
}

impl<O, Item, Err> Observer<Item, Err> for ToArrayObserver<O, Item>
where
  O: Observer<Vec<Item>, Err>,
{
  fn next(&mut self, value: Item) { self.values.push(value); }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(mut self) {
    self.observer.next(self.values);
    self.observer.complete()
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

impl<S, O> CoreObservable<O> for ToArray<S>
where
  S: CoreObservable<ToArrayObserver<O, <S as ObservableType>::Item>>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.source.actual_subscribe(ToArrayObserver { observer, values: vec![] })
  }
}
