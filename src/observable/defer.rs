use crate::observable::{CoreObservable, ObservableType};

/// Creates the observable only when subscribed, calling `factory` once per
/// subscription.
///
/// ```
/// use rxstream::prelude::*;
///
/// let mut values = vec![];
/// observable::defer(|| observable::of([1, 2])).subscribe(|v| values.push(v));
/// assert_eq!(values, vec![1, 2]);
/// ```
pub fn defer<F, S>(factory: F) -> Defer<F>
where
  F: FnOnce() -> S,
  S: ObservableType,
{
  Defer(factory)
}

#[derive(Clone)]
pub struct Defer<F>(F);

impl<F, S> ObservableType for Defer<F>
where
  F: FnOnce() -> S,
  S: ObservableType,
{
  type Item = S::Item;
  type Err = S::Err;
}

impl<F, S, O> CoreObservable<O> for Defer<F>
where
  F: FnOnce() -> S,
  S: CoreObservable<O>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub { (self.0)().actual_subscribe(observer) }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::prelude::*;

  #[test]
  fn factory_runs_per_subscription() {
    let calls = Arc::new(Mutex::new(0));
    let c_calls = calls.clone();
    let deferred = observable::defer(move || {
      *c_calls.lock().unwrap() += 1;
      observable::just(1)
    });
    assert_eq!(*calls.lock().unwrap(), 0);

    deferred.clone().subscribe(|_| {});
    deferred.subscribe(|_| {});
    assert_eq!(*calls.lock().unwrap(), 2);
  }
}
