//! StartWith operator implementation

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
};

/// Emits `values` synchronously on subscribe, then mirrors the source.
///
/// ```
/// use rxstream::prelude::*;
///
/// let mut out = vec![];
/// observable::of([3, 4]).start_with([1, 2]).subscribe(|v| out.push(v));
/// assert_eq!(out, vec![1, 2, 3, 4]);
/// ```
#[derive(Clone)]
pub struct StartWith<S, V> {
  pub source: S,
  pub values: V,
}

impl<S: ObservableType> ObservableType for StartWith<S, Vec<S::Item>> {
  type Item = S::Item;
  type Err = S::Err;
}

impl<S, O> CoreObservable<O> for StartWith<S, Vec<S::Item>>
where
  S: CoreObservable<O>,
  O: Observer<S::Item, S::Err>,
{
  type Unsub = Option<S::Unsub>;

  fn actual_subscribe(self, mut observer: O) -> Self::Unsub {
    for value in self.values {
      if observer.is_closed() {
        return None;
      }
      observer.next(value);
    }
    if observer.is_closed() {
      return None;
    }
    Some(self.source.actual_subscribe(observer))
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::prelude::*;

  #[test]
  fn prefix_then_live_values() {
    let mut source = Subject::<i32, ()>::default();
    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    source
      .clone()
      .start_with([0])
      .subscribe(move |v| c_out.lock().unwrap().push(v));
    source.next(1);
    assert_eq!(*out.lock().unwrap(), vec![0, 1]);
  }

  #[test]
  fn take_inside_prefix_skips_the_source() {
    let subscribed = Arc::new(Mutex::new(false));
    let c_subscribed = subscribed.clone();
    let mut out = vec![];
    observable::defer(move || {
      *c_subscribed.lock().unwrap() = true;
      observable::of([9])
    })
    .start_with([1, 2, 3])
    .take(2)
    .subscribe(|v| out.push(v));

    assert_eq!(out, vec![1, 2]);
    assert!(!*subscribed.lock().unwrap());
  }
}
