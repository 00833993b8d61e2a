//! TryMap operator implementation

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  subscription::{SerialSubscription, Subscription},
};

/// `map` with a fallible closure: the first `Err` it returns terminates the
/// stream with that error and unsubscribes the source.
///
/// ```
/// use rxstream::prelude::*;
///
/// let mut values = vec![];
/// let mut error = None;
/// observable::of(["1", "2", "x", "4"])
///   .map_err(observable::infallible)
///   .try_map(|s| s.parse::<i32>().map_err(|e| e.to_string()))
///   .subscribe_err(|v| values.push(v), |e| error = Some(e));
/// assert_eq!(values, vec![1, 2]);
/// assert!(error.is_some());
/// ```
#[derive(Clone)]
pub struct TryMap<S, F> {
  pub source: S,
  pub func: F,
}

impl<S, F, B> ObservableType for TryMap<S, F>
where
  S: ObservableType,
  F: FnMut(S::Item) -> Result<B, S::Err>,
{
  type Item = B;
  type Err = S::Err;
}

pub struct TryMapObserver<O, F> {
  observer: Option<O>,
  func: F,
  upstream: SerialSubscription,
}

impl<O, F, Item, Err, B> Observer<Item, Err> for TryMapObserver<O, F>
where
  O: Observer<B, Err>,
  F: FnMut(Item) -> Result<B, Err>,
{
  fn next(&mut self, value: Item) {
    let Some(observer) = self.observer.as_mut() else { return };
    match (self.func)(value) {
      Ok(mapped) => observer.next(mapped),
      Err(err) => {
        if let Some(observer) = self.observer.take() {
          observer.error(err);
        }
        self.upstream.clone().unsubscribe();
      }
    }
  }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

impl<S, F, B, O> CoreObservable<O> for TryMap<S, F>
where
  S: CoreObservable<TryMapObserver<O, F>>,
  S::Unsub: Send + 'static,
  F: FnMut(S::Item) -> Result<B, S::Err>,
{
  type Unsub = SerialSubscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let TryMap { source, func } = self;
    let upstream = SerialSubscription::default();
    let unsub = source.actual_subscribe(TryMapObserver { observer: Some(observer), func, upstream: upstream.clone() });
    upstream.replace(unsub);
    upstream
  }
}
