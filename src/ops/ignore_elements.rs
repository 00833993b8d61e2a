//! IgnoreElements operator implementation

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
};

/// Drops every value and forwards only the terminal event.
#[derive(Clone)]
pub struct IgnoreElements<S> {
  pub source: S,
}

impl<S: ObservableType> ObservableType for IgnoreElements<S> {
  type Item = S::Item;
  type Err = S::Err;
}

pub struct IgnoreElementsObserver<O>(O);

impl<O, Item, Err> Observer<Item, Err> for IgnoreElementsObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, _: Item) {}

  fn error(self, err: Err) { self.0.error(err) }

  fn complete(self) { self.0.complete() }

  fn is_closed(&self) -> bool { self.0.is_closed() }
}

impl<S, O> CoreObservable<O> for IgnoreElements<S>
where
  S: CoreObservable<IgnoreElementsObserver<O>>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.source.actual_subscribe(IgnoreElementsObserver(observer))
  }
}
