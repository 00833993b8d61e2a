//! ElementAt operator implementation

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  subscription::{SerialSubscription, Subscription},
};

/// Emits only the value at zero-based `index`, then completes and
/// unsubscribes the source. A shorter source ends with its own terminal
/// event and nothing emitted.
#[derive(Clone)]
pub struct ElementAt<S> {
  pub source: S,
  pub index: usize,
}

impl<S: ObservableType> ObservableType for ElementAt<S> {
  type Item = S::Item;
  type Err = S::Err;
}

pub struct ElementAtObserver<O> {
  observer: Option<O>,
  remaining: usize,
  upstream: SerialSubscription,
}

impl<O, Item, Err> Observer<Item, Err> for ElementAtObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if self.observer.is_none() {
      return;
    }
    if self.remaining > 0 {
      self.remaining -= 1;
      return;
    }
    if let Some(mut observer) = self.observer.take() {
      observer.next(value);
      observer.complete();
    }
    self.upstream.clone().unsubscribe();
  }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

impl<S, O> CoreObservable<O> for ElementAt<S>
where
  S: CoreObservable<ElementAtObserver<O>>,
  S::Unsub: Send + 'static,
{
  type Unsub = SerialSubscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let ElementAt { source, index } = self;
    let upstream = SerialSubscription::default();
    let unsub = source.actual_subscribe(ElementAtObserver {
      observer: Some(observer),
      remaining: index,
      upstream: upstream.clone(),
    });
    upstream.replace(unsub);
    upstream
  }
}
