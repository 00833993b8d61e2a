//! Zip operator implementation
//!
//! Zip combines items from observables index by index, emitting once every
//! source has produced its n-th item.

use std::collections::VecDeque;

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  rc::MutArc,
  subscription::{MultiSubscription, Subscription},
};

// ==================== Zip Operator ====================

/// Zip operator
///
/// Buffers items from each source and emits a tuple `(ItemA, ItemB)` when
/// both sides have one queued. Completes, and releases both sources, as soon
/// as a completed side has nothing left to pair.
#[derive(Clone)]
pub struct Zip<A, B> {
  pub source_a: A,
  pub source_b: B,
}

impl<A, B> ObservableType for Zip<A, B>
where
  A: ObservableType,
  B: ObservableType<Err = A::Err>,
{
  type Item = (A::Item, B::Item);
  type Err = A::Err;
}

// ==================== Shared State ====================

/// Shared state between A and B observers
pub struct ZipState<O, ItemA, ItemB> {
  observer: Option<O>,
  buffer_a: VecDeque<ItemA>,
  buffer_b: VecDeque<ItemB>,
  completed_a: bool,
  completed_b: bool,
}

impl<O, ItemA, ItemB> ZipState<O, ItemA, ItemB> {
  fn new(observer: O) -> Self {
    Self {
      observer: Some(observer),
      buffer_a: VecDeque::new(),
      buffer_b: VecDeque::new(),
      completed_a: false,
      completed_b: false,
    }
  }

  fn emit_pair<Err>(&mut self)
  where
    O: Observer<(ItemA, ItemB), Err>,
  {
    if self.buffer_a.is_empty() || self.buffer_b.is_empty() {
      return;
    }
    if let (Some(a), Some(b)) = (self.buffer_a.pop_front(), self.buffer_b.pop_front()) {
      if let Some(observer) = self.observer.as_mut() {
        observer.next((a, b));
      }
    }
  }

  /// Takes the observer once no more pairs can be formed.
  fn take_if_exhausted(&mut self) -> Option<O> {
    let exhausted =
      (self.completed_a && self.buffer_a.is_empty()) || (self.completed_b && self.buffer_b.is_empty());
    if exhausted { self.observer.take() } else { None }
  }
}

// ==================== Observer Structs ====================

/// Observer for source A
pub struct ZipAObserver<O, ItemA, ItemB> {
  state: MutArc<ZipState<O, ItemA, ItemB>>,
  subscriptions: MultiSubscription,
}

/// Observer for source B
pub struct ZipBObserver<O, ItemA, ItemB> {
  state: MutArc<ZipState<O, ItemA, ItemB>>,
  subscriptions: MultiSubscription,
}

fn finish<O, Item, Err>(observer: Option<O>, subscriptions: MultiSubscription)
where
  O: Observer<Item, Err>,
{
  if let Some(observer) = observer {
    subscriptions.unsubscribe();
    observer.complete();
  }
}

fn fail<O, Item, Err>(observer: Option<O>, subscriptions: MultiSubscription, err: Err)
where
  O: Observer<Item, Err>,
{
  if let Some(observer) = observer {
    subscriptions.unsubscribe();
    observer.error(err);
  }
}

fn zip_is_closed<O, ItemA, ItemB, Err>(state: &MutArc<ZipState<O, ItemA, ItemB>>) -> bool
where
  O: Observer<(ItemA, ItemB), Err>,
{
  state
    .try_rc_deref_mut()
    .is_some_and(|state| state.observer.as_ref().map_or(true, Observer::<(ItemA, ItemB), Err>::is_closed))
}

// ==================== Observer Implementations ====================

impl<ItemA, ItemB, Err, O> Observer<ItemA, Err> for ZipAObserver<O, ItemA, ItemB>
where
  O: Observer<(ItemA, ItemB), Err>,
{
  fn next(&mut self, value: ItemA) {
    let observer = {
      let mut state = self.state.rc_deref_mut();
      if state.observer.is_none() {
        return;
      }
      state.buffer_a.push_back(value);
      state.emit_pair::<Err>();
      state.take_if_exhausted()
    };
    finish::<_, (ItemA, ItemB), Err>(observer, self.subscriptions.clone());
  }

  fn error(self, err: Err) {
    let observer = self.state.rc_deref_mut().observer.take();
    fail::<_, (ItemA, ItemB), Err>(observer, self.subscriptions, err);
  }

  fn complete(self) {
    let observer = {
      let mut state = self.state.rc_deref_mut();
      state.completed_a = true;
      state.take_if_exhausted()
    };
    finish::<_, (ItemA, ItemB), Err>(observer, self.subscriptions);
  }

  fn is_closed(&self) -> bool { zip_is_closed::<_, _, _, Err>(&self.state) }
}

impl<ItemA, ItemB, Err, O> Observer<ItemB, Err> for ZipBObserver<O, ItemA, ItemB>
where
  O: Observer<(ItemA, ItemB), Err>,
{
  fn next(&mut self, value: ItemB) {
    let observer = {
      let mut state = self.state.rc_deref_mut();
      if state.observer.is_none() {
        return;
      }
      state.buffer_b.push_back(value);
      state.emit_pair::<Err>();
      state.take_if_exhausted()
    };
    finish::<_, (ItemA, ItemB), Err>(observer, self.subscriptions.clone());
  }

  fn error(self, err: Err) {
    let observer = self.state.rc_deref_mut().observer.take();
    fail::<_, (ItemA, ItemB), Err>(observer, self.subscriptions, err);
  }

  fn complete(self) {
    let observer = {
      let mut state = self.state.rc_deref_mut();
      state.completed_b = true;
      state.take_if_exhausted()
    };
    finish::<_, (ItemA, ItemB), Err>(observer, self.subscriptions);
  }

  fn is_closed(&self) -> bool { zip_is_closed::<_, _, _, Err>(&self.state) }
}

// ==================== CoreObservable Implementation ====================

impl<A, B, O> CoreObservable<O> for Zip<A, B>
where
  A: CoreObservable<ZipAObserver<O, <A as ObservableType>::Item, <B as ObservableType>::Item>>,
  B: CoreObservable<
    ZipBObserver<O, <A as ObservableType>::Item, <B as ObservableType>::Item>,
    Err = <A as ObservableType>::Err,
  >,
  A::Unsub: Send + 'static,
  B::Unsub: Send + 'static,
{
  type Unsub = MultiSubscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let Zip { source_a, source_b } = self;
    let subscriptions = MultiSubscription::default();
    let state = MutArc::own(ZipState::new(observer));

    let unsub = source_a.actual_subscribe(ZipAObserver { state: state.clone(), subscriptions: subscriptions.clone() });
    subscriptions.append(unsub);
    if !subscriptions.is_closed() {
      let unsub = source_b.actual_subscribe(ZipBObserver { state, subscriptions: subscriptions.clone() });
      subscriptions.append(unsub);
    }
    subscriptions
  }
}

// ==================== N-ary ====================

/// Zip over a list of sources of the same type, emitting `selector(items)`
/// for every index all of them reached. An empty list completes immediately.
#[derive(Clone)]
pub struct ZipAll<S, F> {
  pub sources: Vec<S>,
  pub selector: F,
}

impl<S, F, R> ObservableType for ZipAll<S, F>
where
  S: ObservableType,
  F: FnMut(Vec<S::Item>) -> R,
{
  type Item = R;
  type Err = S::Err;
}

struct ZipAllState<O, F, Item> {
  observer: Option<O>,
  selector: F,
  buffers: Vec<VecDeque<Item>>,
  completed: Vec<bool>,
}

impl<O, F, Item> ZipAllState<O, F, Item> {
  fn take_if_exhausted(&mut self) -> Option<O> {
    let exhausted = self
      .buffers
      .iter()
      .zip(&self.completed)
      .any(|(buffer, completed)| *completed && buffer.is_empty());
    if exhausted { self.observer.take() } else { None }
  }
}

pub struct ZipAllObserver<O, F, Item> {
  state: MutArc<ZipAllState<O, F, Item>>,
  index: usize,
  subscriptions: MultiSubscription,
}

impl<O, F, Item, R, Err> Observer<Item, Err> for ZipAllObserver<O, F, Item>
where
  O: Observer<R, Err>,
  F: FnMut(Vec<Item>) -> R,
{
  fn next(&mut self, value: Item) {
    let observer = {
      let mut guard = self.state.rc_deref_mut();
      let state = &mut *guard;
      if state.observer.is_none() {
        return;
      }
      if let Some(buffer) = state.buffers.get_mut(self.index) {
        buffer.push_back(value);
      }
      if state.buffers.iter().all(|buffer| !buffer.is_empty()) {
        let items = state.buffers.iter_mut().filter_map(VecDeque::pop_front).collect();
        let value = (state.selector)(items);
        if let Some(observer) = state.observer.as_mut() {
          observer.next(value);
        }
      }
      state.take_if_exhausted()
    };
    finish::<_, R, Err>(observer, self.subscriptions.clone());
  }

  fn error(self, err: Err) {
    let observer = self.state.rc_deref_mut().observer.take();
    fail::<_, R, Err>(observer, self.subscriptions, err);
  }

  fn complete(self) {
    let observer = {
      let mut state = self.state.rc_deref_mut();
      if let Some(completed) = state.completed.get_mut(self.index) {
        *completed = true;
      }
      state.take_if_exhausted()
    };
    finish::<_, R, Err>(observer, self.subscriptions);
  }

  fn is_closed(&self) -> bool {
    self
      .state
      .try_rc_deref_mut()
      .is_some_and(|state| state.observer.as_ref().map_or(true, Observer::<R, Err>::is_closed))
  }
}

impl<S, F, R, O> CoreObservable<O> for ZipAll<S, F>
where
  S: CoreObservable<ZipAllObserver<O, F, <S as ObservableType>::Item>>,
  S::Unsub: Send + 'static,
  F: FnMut(Vec<S::Item>) -> R,
  O: Observer<R, S::Err>,
{
  type Unsub = MultiSubscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let ZipAll { sources, selector } = self;
    let subscriptions = MultiSubscription::default();
    if sources.is_empty() {
      observer.complete();
      subscriptions.clone().unsubscribe();
      return subscriptions;
    }

    let state = MutArc::own(ZipAllState {
      observer: Some(observer),
      selector,
      buffers: sources.iter().map(|_| VecDeque::new()).collect(),
      completed: vec![false; sources.len()],
    });
    for (index, source) in sources.into_iter().enumerate() {
      if subscriptions.is_closed() {
        break;
      }
      let unsub =
        source.actual_subscribe(ZipAllObserver { state: state.clone(), index, subscriptions: subscriptions.clone() });
      subscriptions.append(unsub);
    }
    subscriptions
  }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::prelude::*;

  #[test]
  fn pairs_by_index() {
    let mut out = vec![];
    observable::of([1, 2, 3])
      .zip(observable::of(['a', 'b', 'c']))
      .subscribe(|v| out.push(v));
    assert_eq!(out, vec![(1, 'a'), (2, 'b'), (3, 'c')]);
  }

  #[test]
  fn shorter_side_ends_the_stream() {
    let mut events = vec![];
    observable::of([1, 2])
      .zip(observable::from_iter(10..))
      .subscribe_event(|e| events.push(e));
    assert_eq!(events, vec![Event::Next((1, 10)), Event::Next((2, 11)), Event::Completed]);
  }

  #[test]
  fn waits_for_buffered_values_before_completing() {
    let mut a = Subject::<i32, ()>::default();
    let mut b = Subject::<i32, ()>::default();
    let events = Arc::new(Mutex::new(vec![]));
    let c_events = events.clone();
    a.clone()
      .zip(b.clone())
      .subscribe_event(move |e| c_events.lock().unwrap().push(e));

    a.next(1);
    a.next(2);
    a.clone().complete();
    assert!(events.lock().unwrap().is_empty());

    b.next(10);
    assert_eq!(b.observer_count(), 1);
    b.next(20);

    assert_eq!(*events.lock().unwrap(), vec![Event::Next((1, 10)), Event::Next((2, 20)), Event::Completed]);
    assert_eq!(b.observer_count(), 0);
  }

  #[test]
  fn error_is_forwarded() {
    let mut a = Subject::<i32, &'static str>::default();
    let b = Subject::<i32, &'static str>::default();
    let events = Arc::new(Mutex::new(vec![]));
    let c_events = events.clone();
    a.clone()
      .zip(b.clone())
      .subscribe_event(move |e| c_events.lock().unwrap().push(e));

    a.next(1);
    b.clone().error("boom");

    assert_eq!(*events.lock().unwrap(), vec![Event::Error("boom")]);
    assert_eq!(a.observer_count(), 0);
  }

  #[test]
  fn n_ary_zip() {
    let mut out = vec![];
    observable::zip(vec![observable::of([1, 2, 3]), observable::of([10, 20, 30]), observable::of([100, 200, 300])], |v| {
      v.into_iter().sum::<i32>()
    })
    .subscribe(|v| out.push(v));
    assert_eq!(out, vec![111, 222, 333]);
  }

  #[test]
  fn n_ary_hot_sources() {
    let mut sources = vec![Subject::<i32, ()>::default(), Subject::default()];
    let events = Arc::new(Mutex::new(vec![]));
    let c_events = events.clone();
    observable::zip(sources.clone(), |v| v)
      .subscribe_event(move |e| c_events.lock().unwrap().push(e));

    sources[0].next(1);
    sources[0].next(2);
    sources[1].next(3);
    sources[0].clone().complete();
    sources[1].next(4);

    assert_eq!(*events.lock().unwrap(), vec![Event::Next(vec![1, 3]), Event::Next(vec![2, 4]), Event::Completed]);
  }
}
