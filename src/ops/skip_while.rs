//! SkipWhile operator implementation

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
};

/// Drops values while `predicate` holds. The first value failing it and
/// everything after are forwarded; the predicate is not consulted again.
#[derive(Clone)]
pub struct SkipWhile<S, F> {
  pub source: S,
  pub predicate: F,
}

impl<S: ObservableType, F> ObservableType for SkipWhile<S, F> {
  type Item = S::Item;
  type Err = S::Err;
}

pub struct SkipWhileObserver<O, F> {
  observer: O,
  predicate: F,
  skipping: bool,
}

impl<O, F, Item, Err> Observer<Item, Err> for SkipWhileObserver<O, F>
where
  O: Observer<Item, Err>,
  F: FnMut(&Item) -> bool,
{
  fn next(&mut self, value: Item) {
    if self.skipping && (self.predicate)(&value) {
      return;
    }
    self.skipping = false;
    self.observer.next(value);
  }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

impl<S, F, O> CoreObservable<O> for SkipWhile<S, F>
where
  S: CoreObservable<SkipWhileObserver<O, F>>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let SkipWhile { source, predicate } = self;
    source.actual_subscribe(SkipWhileObserver { observer, predicate, skipping: true })
  }
}
