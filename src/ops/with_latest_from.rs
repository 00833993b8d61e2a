//! WithLatestFrom operator implementation

use std::marker::PhantomData;

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  rc::MutArc,
  subscription::{SerialSubscription, Subscription, TupleSubscription},
};

/// Combines each item of `source` with the latest item of `other`.
///
/// Source items that arrive before `other` emitted anything are dropped.
/// Completion of `other` is ignored, its error ends the stream. This struct
/// is created by [`with_latest_from`](crate::observable::Observable::with_latest_from)
/// and [`with_latest_from_by`](crate::observable::Observable::with_latest_from_by).
#[derive(Clone)]
pub struct WithLatestFrom<S, B, F> {
  pub source: S,
  pub other: B,
  pub selector: F,
}

impl<S, B, F, R> ObservableType for WithLatestFrom<S, B, F>
where
  S: ObservableType,
  B: ObservableType<Err = S::Err>,
  F: FnMut(S::Item, B::Item) -> R,
{
  type Item = R;
  type Err = S::Err;
}

/// Observer of the primary source.
pub struct AObserver<O, F, ItemB> {
  observer: MutArc<Option<O>>,
  selector: F,
  value: MutArc<Option<ItemB>>,
  other: SerialSubscription,
}

impl<O, F, ItemA, ItemB, R, Err> Observer<ItemA, Err> for AObserver<O, F, ItemB>
where
  O: Observer<R, Err>,
  F: FnMut(ItemA, ItemB) -> R,
  ItemB: Clone,
{
  fn next(&mut self, item: ItemA) {
    // clone first so the value lock is not held across downstream calls
    let latest = self.value.rc_deref().clone();
    if let Some(latest) = latest {
      let value = (self.selector)(item, latest);
      self.observer.next(value);
    }
  }

  fn error(self, err: Err) {
    self.other.unsubscribe();
    self.observer.error(err)
  }

  fn complete(self) {
    self.other.unsubscribe();
    self.observer.complete();
  }

  fn is_closed(&self) -> bool { Observer::<R, Err>::is_closed(&self.observer) }
}

/// Observer of `other`; it only records the latest value.
pub struct BObserver<O, ItemB, R> {
  observer: MutArc<Option<O>>,
  value: MutArc<Option<ItemB>>,
  source: SerialSubscription,
  _marker: PhantomData<fn() -> R>,
}

impl<O, ItemB, R, Err> Observer<ItemB, Err> for BObserver<O, ItemB, R>
where
  O: Observer<R, Err>,
{
  #[inline]
  fn next(&mut self, value: ItemB) { *self.value.rc_deref_mut() = Some(value); }

  fn error(self, err: Err) {
    self.source.unsubscribe();
    self.observer.error(err)
  }

  #[inline]
  fn complete(self) {}

  #[inline]
  fn is_closed(&self) -> bool { Observer::<R, Err>::is_closed(&self.observer) }
}

impl<S, B, F, R, O> CoreObservable<O> for WithLatestFrom<S, B, F>
where
  S: CoreObservable<AObserver<O, F, <B as ObservableType>::Item>>,
  B: CoreObservable<BObserver<O, <B as ObservableType>::Item, R>, Err = <S as ObservableType>::Err>,
  F: FnMut(<S as ObservableType>::Item, <B as ObservableType>::Item) -> R,
  S::Unsub: Send + 'static,
  B::Unsub: Send + 'static,
{
  type Unsub = TupleSubscription<SerialSubscription, SerialSubscription>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let WithLatestFrom { source, other, selector } = self;
    let observer = MutArc::own(Some(observer));
    let value = MutArc::own(None);
    let source_slot = SerialSubscription::default();
    let other_slot = SerialSubscription::default();

    let unsub = other.actual_subscribe(BObserver {
      observer: observer.clone(),
      value: value.clone(),
      source: source_slot.clone(),
      _marker: PhantomData,
    });
    other_slot.replace(unsub);

    if !source_slot.is_closed() {
      let unsub = source.actual_subscribe(AObserver { observer, selector, value, other: other_slot.clone() });
      source_slot.replace(unsub);
    }
    TupleSubscription::new(source_slot, other_slot)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::prelude::*;

  #[test]
  fn simple() {
    let ret = Arc::new(Mutex::new(String::new()));
    let c_ret = ret.clone();

    let mut s1 = Subject::<char, ()>::default();
    let mut s2 = Subject::<char, ()>::default();

    s1.clone().with_latest_from(s2.clone()).subscribe(move |(a, b)| {
      let mut ret = c_ret.lock().unwrap();
      ret.push(a);
      ret.push(b);
    });

    s1.next('1');
    s2.next('A');
    s1.next('2');
    s2.next('B');
    s2.next('C');
    s2.next('D');
    s1.next('3');
    s1.next('4');

    assert_eq!(*ret.lock().unwrap(), "2A3D4D");
  }

  #[test]
  fn smoke() {
    let a_store = Arc::new(Mutex::new(vec![]));
    let b_store = Arc::new(Mutex::new(vec![]));
    let numbers_store = Arc::new(Mutex::new(vec![]));

    let mut numbers = Subject::<i32, ()>::default();
    let primary = numbers.clone().filter(|v| *v % 3 == 0);
    let secondary = numbers.clone().filter(|v| *v % 3 != 0);

    let c_numbers_store = numbers_store.clone();
    primary
      .clone()
      .with_latest_from(secondary.clone())
      .subscribe(move |v| c_numbers_store.lock().unwrap().push(v));
    let c_a_store = a_store.clone();
    primary.subscribe(move |v| c_a_store.lock().unwrap().push(v));
    let c_b_store = b_store.clone();
    secondary.subscribe(move |v| c_b_store.lock().unwrap().push(v));

    (0..10).for_each(|v| numbers.next(v));

    assert_eq!(*a_store.lock().unwrap(), vec![0, 3, 6, 9]);
    assert_eq!(*b_store.lock().unwrap(), vec![1, 2, 4, 5, 7, 8]);
    assert_eq!(*numbers_store.lock().unwrap(), vec![(3, 2), (6, 5), (9, 8)]);
  }

  #[test]
  fn selector_and_other_completion() {
    let mut source = Subject::<i32, ()>::default();
    let mut other = Subject::<i32, ()>::default();
    let events = Arc::new(Mutex::new(vec![]));
    let c_events = events.clone();
    source
      .clone()
      .with_latest_from_by(other.clone(), |a, b| a * b)
      .subscribe_event(move |e| c_events.lock().unwrap().push(e));

    other.next(10);
    other.clone().complete();
    source.next(2);
    source.clone().complete();

    assert_eq!(*events.lock().unwrap(), vec![Event::Next(20), Event::Completed]);
  }

  #[test]
  fn other_error_ends_the_stream() {
    let source = Subject::<i32, &'static str>::default();
    let other = Subject::<i32, &'static str>::default();
    let events = Arc::new(Mutex::new(vec![]));
    let c_events = events.clone();
    source
      .clone()
      .with_latest_from(other.clone())
      .subscribe_event(move |e| c_events.lock().unwrap().push(e));

    other.clone().error("boom");

    assert_eq!(*events.lock().unwrap(), vec![Event::Error("boom")]);
    assert_eq!(source.observer_count(), 0);
  }
}
