//! CombineLatest operator implementation
//!
//! Keeps the latest value of every source and emits `selector(latest...)`
//! whenever any source emits, once each of them has emitted at least once.

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  rc::MutArc,
  subscription::{MultiSubscription, Subscription},
};

// ==================== Binary ====================

/// CombineLatest operator
///
/// Completes once both sources completed, even if one of them never emitted.
/// An error from either side is forwarded at once.
#[derive(Clone)]
pub struct CombineLatest<A, B, F> {
  pub source_a: A,
  pub source_b: B,
  pub selector: F,
}

impl<A, B, F, R> ObservableType for CombineLatest<A, B, F>
where
  A: ObservableType,
  B: ObservableType<Err = A::Err>,
  F: FnMut(A::Item, B::Item) -> R,
{
  type Item = R;
  type Err = A::Err;
}

enum CombineItem<A, B> {
  ItemA(A),
  ItemB(B),
}

/// Shared state between the A and B observers.
pub struct CombineLatestState<O, F, ItemA, ItemB> {
  observer: Option<O>,
  selector: F,
  a: Option<ItemA>,
  b: Option<ItemB>,
  completed: usize,
}

impl<O, F, ItemA, ItemB> CombineLatestState<O, F, ItemA, ItemB> {
  fn next<R, Err>(&mut self, value: CombineItem<ItemA, ItemB>)
  where
    O: Observer<R, Err>,
    F: FnMut(ItemA, ItemB) -> R,
    ItemA: Clone,
    ItemB: Clone,
  {
    if self.observer.is_none() {
      return;
    }
    match value {
      CombineItem::ItemA(a) => self.a = Some(a),
      CombineItem::ItemB(b) => self.b = Some(b),
    }
    if let (Some(a), Some(b), Some(observer)) = (&self.a, &self.b, self.observer.as_mut()) {
      let value = (self.selector)(a.clone(), b.clone());
      observer.next(value);
    }
  }
}

pub struct CombineLatestAObserver<O, F, ItemA, ItemB> {
  state: MutArc<CombineLatestState<O, F, ItemA, ItemB>>,
  subscriptions: MultiSubscription,
}

pub struct CombineLatestBObserver<O, F, ItemA, ItemB> {
  state: MutArc<CombineLatestState<O, F, ItemA, ItemB>>,
  subscriptions: MultiSubscription,
}

fn pair_error<O, F, ItemA, ItemB, R, Err>(
  state: &MutArc<CombineLatestState<O, F, ItemA, ItemB>>, subscriptions: MultiSubscription, err: Err,
) where
  O: Observer<R, Err>,
{
  let observer = state.rc_deref_mut().observer.take();
  if let Some(observer) = observer {
    subscriptions.unsubscribe();
    observer.error(err);
  }
}

fn pair_complete<O, F, ItemA, ItemB, R, Err>(state: &MutArc<CombineLatestState<O, F, ItemA, ItemB>>)
where
  O: Observer<R, Err>,
{
  let observer = {
    let mut state = state.rc_deref_mut();
    state.completed += 1;
    if state.completed == 2 { state.observer.take() } else { None }
  };
  if let Some(observer) = observer {
    observer.complete();
  }
}

fn pair_is_closed<O, F, ItemA, ItemB, R, Err>(state: &MutArc<CombineLatestState<O, F, ItemA, ItemB>>) -> bool
where
  O: Observer<R, Err>,
{
  state
    .try_rc_deref_mut()
    .is_some_and(|state| state.observer.as_ref().map_or(true, Observer::<R, Err>::is_closed))
}

impl<O, F, ItemA, ItemB, R, Err> Observer<ItemA, Err> for CombineLatestAObserver<O, F, ItemA, ItemB>
where
  O: Observer<R, Err>,
  F: FnMut(ItemA, ItemB) -> R,
  ItemA: Clone,
  ItemB: Clone,
{
  fn next(&mut self, value: ItemA) { self.state.rc_deref_mut().next::<R, Err>(CombineItem::ItemA(value)) }

  fn error(self, err: Err) { pair_error::<_, _, _, _, R, Err>(&self.state, self.subscriptions, err) }

  fn complete(self) { pair_complete::<_, _, _, _, R, Err>(&self.state) }

  fn is_closed(&self) -> bool { pair_is_closed::<_, _, _, _, R, Err>(&self.state) }
}

impl<O, F, ItemA, ItemB, R, Err> Observer<ItemB, Err> for CombineLatestBObserver<O, F, ItemA, ItemB>
where
  O: Observer<R, Err>,
  F: FnMut(ItemA, ItemB) -> R,
  ItemA: Clone,
  ItemB: Clone,
{
  fn next(&mut self, value: ItemB) { self.state.rc_deref_mut().next::<R, Err>(CombineItem::ItemB(value)) }

  fn error(self, err: Err) { pair_error::<_, _, _, _, R, Err>(&self.state, self.subscriptions, err) }

  fn complete(self) { pair_complete::<_, _, _, _, R, Err>(&self.state) }

  fn is_closed(&self) -> bool { pair_is_closed::<_, _, _, _, R, Err>(&self.state) }
}

impl<A, B, F, R, O> CoreObservable<O> for CombineLatest<A, B, F>
where
  A: CoreObservable<CombineLatestAObserver<O, F, <A as ObservableType>::Item, <B as ObservableType>::Item>>,
  B: CoreObservable<
    CombineLatestBObserver<O, F, <A as ObservableType>::Item, <B as ObservableType>::Item>,
    Err = <A as ObservableType>::Err,
  >,
  F: FnMut(<A as ObservableType>::Item, <B as ObservableType>::Item) -> R,
  A::Unsub: Send + 'static,
  B::Unsub: Send + 'static,
{
  type Unsub = MultiSubscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let CombineLatest { source_a, source_b, selector } = self;
    let subscriptions = MultiSubscription::default();
    let state =
      MutArc::own(CombineLatestState { observer: Some(observer), selector, a: None, b: None, completed: 0 });

    let unsub =
      source_a.actual_subscribe(CombineLatestAObserver { state: state.clone(), subscriptions: subscriptions.clone() });
    subscriptions.append(unsub);
    if !subscriptions.is_closed() {
      let unsub = source_b.actual_subscribe(CombineLatestBObserver { state, subscriptions: subscriptions.clone() });
      subscriptions.append(unsub);
    }
    subscriptions
  }
}

// ==================== N-ary ====================

/// CombineLatest over a list of sources of the same type.
///
/// An empty list completes immediately.
#[derive(Clone)]
pub struct CombineLatestAll<S, F> {
  pub sources: Vec<S>,
  pub selector: F,
}

impl<S, F, R> ObservableType for CombineLatestAll<S, F>
where
  S: ObservableType,
  F: FnMut(Vec<S::Item>) -> R,
{
  type Item = R;
  type Err = S::Err;
}

struct CombineLatestAllState<O, F, Item> {
  observer: Option<O>,
  selector: F,
  latest: Vec<Option<Item>>,
  completed: usize,
}

pub struct CombineLatestAllObserver<O, F, Item> {
  state: MutArc<CombineLatestAllState<O, F, Item>>,
  index: usize,
  subscriptions: MultiSubscription,
}

impl<O, F, Item, R, Err> Observer<Item, Err> for CombineLatestAllObserver<O, F, Item>
where
  O: Observer<R, Err>,
  F: FnMut(Vec<Item>) -> R,
  Item: Clone,
{
  fn next(&mut self, value: Item) {
    let mut guard = self.state.rc_deref_mut();
    let state = &mut *guard;
    if state.observer.is_none() {
      return;
    }
    if let Some(slot) = state.latest.get_mut(self.index) {
      *slot = Some(value);
    }
    if state.latest.iter().all(Option::is_some) {
      let values = state.latest.iter().flatten().cloned().collect();
      let value = (state.selector)(values);
      if let Some(observer) = state.observer.as_mut() {
        observer.next(value);
      }
    }
  }

  fn error(self, err: Err) {
    let observer = self.state.rc_deref_mut().observer.take();
    if let Some(observer) = observer {
      self.subscriptions.unsubscribe();
      observer.error(err);
    }
  }

  fn complete(self) {
    let observer = {
      let mut state = self.state.rc_deref_mut();
      state.completed += 1;
      if state.completed == state.latest.len() { state.observer.take() } else { None }
    };
    if let Some(observer) = observer {
      observer.complete();
    }
  }

  fn is_closed(&self) -> bool {
    self
      .state
      .try_rc_deref_mut()
      .is_some_and(|state| state.observer.as_ref().map_or(true, Observer::<R, Err>::is_closed))
  }
}

impl<S, F, R, O> CoreObservable<O> for CombineLatestAll<S, F>
where
  S: CoreObservable<CombineLatestAllObserver<O, F, <S as ObservableType>::Item>>,
  S::Unsub: Send + 'static,
  F: FnMut(Vec<S::Item>) -> R,
  O: Observer<R, S::Err>,
{
  type Unsub = MultiSubscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let CombineLatestAll { sources, selector } = self;
    let subscriptions = MultiSubscription::default();
    if sources.is_empty() {
      observer.complete();
      subscriptions.clone().unsubscribe();
      return subscriptions;
    }

    let latest = sources.iter().map(|_| None).collect();
    let state = MutArc::own(CombineLatestAllState { observer: Some(observer), selector, latest, completed: 0 });
    for (index, source) in sources.into_iter().enumerate() {
      if subscriptions.is_closed() {
        break;
      }
      let unsub = source.actual_subscribe(CombineLatestAllObserver {
        state: state.clone(),
        index,
        subscriptions: subscriptions.clone(),
      });
      subscriptions.append(unsub);
    }
    subscriptions
  }
}
