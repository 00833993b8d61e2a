//! Concat operator implementation

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  subscription::{SerialSubscription, Subscription, TupleSubscription},
};

/// Mirrors `first`, then subscribes `second` once `first` completes.
///
/// An error of `first` ends the stream and `second` is never subscribed.
/// For more than two sources see [`observable::concat`](crate::observable::concat).
#[derive(Clone)]
pub struct Concat<A, B> {
  pub first: A,
  pub second: B,
}

impl<A: ObservableType, B> ObservableType for Concat<A, B> {
  type Item = A::Item;
  type Err = A::Err;
}

pub struct ConcatObserver<O, B> {
  observer: O,
  second: B,
  // holds `first`, released as soon as it finishes
  upstream: SerialSubscription,
  slot: SerialSubscription,
}

impl<O, B, Item, Err> Observer<Item, Err> for ConcatObserver<O, B>
where
  O: Observer<Item, Err>,
  B: CoreObservable<O>,
  B::Unsub: Send + 'static,
{
  fn next(&mut self, value: Item) { self.observer.next(value) }

  fn error(self, err: Err) {
    self.upstream.unsubscribe();
    self.observer.error(err)
  }

  fn complete(self) {
    let ConcatObserver { observer, second, upstream, slot } = self;
    upstream.unsubscribe();
    if slot.is_closed() || observer.is_closed() {
      return;
    }
    let unsub = second.actual_subscribe(observer);
    slot.replace(unsub);
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

impl<A, B, O> CoreObservable<O> for Concat<A, B>
where
  A: CoreObservable<ConcatObserver<O, B>>,
  A::Unsub: Send + 'static,
{
  type Unsub = TupleSubscription<SerialSubscription, SerialSubscription>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let Concat { first, second } = self;
    let upstream = SerialSubscription::default();
    let slot = SerialSubscription::default();
    let unsub =
      first.actual_subscribe(ConcatObserver { observer, second, upstream: upstream.clone(), slot: slot.clone() });
    upstream.replace(unsub);
    TupleSubscription::new(upstream, slot)
  }
}
