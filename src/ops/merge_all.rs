//! MergeAll operator implementation
//!
//! Flattens an observable of observables with bounded concurrency. With a
//! limit of one it is `concat_all`; the n-ary `concat` and `merge`
//! constructors feed it from a plain iterator of sources.

use std::{collections::VecDeque, marker::PhantomData};

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  rc::MutArc,
  subscription::{MultiSubscription, SerialSubscription, Subscription},
};

#[derive(Clone)]
pub struct MergeAll<S> {
  pub source: S,
  pub concurrent: usize,
}

impl<S> ObservableType for MergeAll<S>
where
  S: ObservableType,
  S::Item: ObservableType<Err = S::Err>,
{
  type Item = <S::Item as ObservableType>::Item;
  type Err = S::Err;
}

/// Emits every observable of an iterator, then completes.
///
/// Only used as the outer stream of the n-ary constructors, so it carries
/// the error type of the inner sources without ever producing one.
pub struct Sources<I, Err> {
  iter: I,
  _hint: PhantomData<fn() -> Err>,
}

impl<I, Err> Sources<I, Err> {
  pub(crate) fn new(iter: I) -> Self { Sources { iter, _hint: PhantomData } }
}

impl<I: Clone, Err> Clone for Sources<I, Err> {
  fn clone(&self) -> Self { Sources::new(self.iter.clone()) }
}

impl<I: Iterator, Err> ObservableType for Sources<I, Err> {
  type Item = I::Item;
  type Err = Err;
}

impl<I, Err, O> CoreObservable<O> for Sources<I, Err>
where
  I: Iterator,
  O: Observer<I::Item, Err>,
{
  type Unsub = ();

  fn actual_subscribe(self, mut observer: O) -> Self::Unsub {
    for source in self.iter {
      if observer.is_closed() {
        return;
      }
      observer.next(source);
    }
    if !observer.is_closed() {
      observer.complete();
    }
  }
}

struct MergeAllState<O, In> {
  observer: Option<O>,
  pending: VecDeque<In>,
  active: usize,
  outer_completed: bool,
}

struct Shared<O, In> {
  state: MutArc<MergeAllState<O, In>>,
  subscriptions: MultiSubscription,
  concurrent: usize,
  // Instantiated in `actual_subscribe`, where `In` is known to accept the
  // inner observer, so the observer impls carry no bound on `In`.
  subscribe_inner: fn(&Shared<O, In>, In),
}

impl<O, In> Clone for Shared<O, In> {
  fn clone(&self) -> Self {
    Shared {
      state: self.state.clone(),
      subscriptions: self.subscriptions.clone(),
      concurrent: self.concurrent,
      subscribe_inner: self.subscribe_inner,
    }
  }
}

impl<O, In> Shared<O, In> {
  fn fail<Item, Err>(&self, err: Err)
  where
    O: Observer<Item, Err>,
  {
    let observer = {
      let mut state = self.state.rc_deref_mut();
      state.pending.clear();
      state.observer.take()
    };
    if let Some(observer) = observer {
      self.subscriptions.clone().unsubscribe();
      observer.error(err);
    }
  }

  fn is_closed<Item, Err>(&self) -> bool
  where
    O: Observer<Item, Err>,
  {
    self
      .state
      .try_rc_deref_mut()
      .is_some_and(|state| state.observer.as_ref().map_or(true, Observer::<Item, Err>::is_closed))
  }
}

/// Each inner stream gets its own slot, released as soon as it finishes.
fn subscribe_inner<O, In>(shared: &Shared<O, In>, inner: In)
where
  In: CoreObservable<MergeAllInnerObserver<O, In>>,
  In::Unsub: Send + 'static,
{
  let slot = SerialSubscription::default();
  shared.subscriptions.append(slot.clone());
  let unsub = inner.actual_subscribe(MergeAllInnerObserver { shared: shared.clone(), upstream: slot.clone() });
  slot.replace(unsub);
}

/// Observer of the outer stream.
pub struct MergeAllObserver<O, In> {
  shared: Shared<O, In>,
  upstream: SerialSubscription,
}

/// Observer of one inner stream.
pub struct MergeAllInnerObserver<O, In> {
  shared: Shared<O, In>,
  upstream: SerialSubscription,
}

impl<O, In, Err> Observer<In, Err> for MergeAllObserver<O, In>
where
  In: ObservableType,
  O: Observer<In::Item, Err>,
{
  fn next(&mut self, inner: In) {
    {
      let mut state = self.shared.state.rc_deref_mut();
      if state.observer.is_none() {
        return;
      }
      if state.active >= self.shared.concurrent {
        state.pending.push_back(inner);
        return;
      }
      state.active += 1;
    }
    (self.shared.subscribe_inner)(&self.shared, inner);
  }

  fn error(self, err: Err) {
    self.upstream.unsubscribe();
    self.shared.fail::<In::Item, Err>(err)
  }

  fn complete(self) {
    let MergeAllObserver { shared, upstream } = self;
    upstream.unsubscribe();
    let observer = {
      let mut state = shared.state.rc_deref_mut();
      state.outer_completed = true;
      if state.active == 0 && state.pending.is_empty() { state.observer.take() } else { None }
    };
    if let Some(observer) = observer {
      observer.complete();
    }
  }

  fn is_closed(&self) -> bool { self.shared.is_closed::<In::Item, Err>() }
}

impl<O, In, Item, Err> Observer<Item, Err> for MergeAllInnerObserver<O, In>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    let mut state = self.shared.state.rc_deref_mut();
    if let Some(observer) = state.observer.as_mut() {
      observer.next(value);
    }
  }

  fn error(self, err: Err) {
    self.upstream.unsubscribe();
    self.shared.fail::<Item, Err>(err)
  }

  fn complete(self) {
    enum Then<O, In> {
      Subscribe(In),
      Complete(O),
      Idle,
    }

    let MergeAllInnerObserver { shared, upstream } = self;
    upstream.unsubscribe();
    let then = {
      let mut state = shared.state.rc_deref_mut();
      state.active -= 1;
      if state.observer.is_none() {
        Then::Idle
      } else if let Some(inner) = state.pending.pop_front() {
        state.active += 1;
        Then::Subscribe(inner)
      } else if state.outer_completed && state.active == 0 {
        state.observer.take().map_or(Then::Idle, Then::Complete)
      } else {
        Then::Idle
      }
    };

    match then {
      Then::Subscribe(inner) => (shared.subscribe_inner)(&shared, inner),
      Then::Complete(observer) => observer.complete(),
      Then::Idle => {}
    }
  }

  fn is_closed(&self) -> bool { self.shared.is_closed::<Item, Err>() }
}

impl<S, O> CoreObservable<O> for MergeAll<S>
where
  S: CoreObservable<MergeAllObserver<O, <S as ObservableType>::Item>>,
  S::Item: ObservableType<Err = S::Err> + CoreObservable<MergeAllInnerObserver<O, <S as ObservableType>::Item>>,
  <S::Item as CoreObservable<MergeAllInnerObserver<O, <S as ObservableType>::Item>>>::Unsub: Send + 'static,
  S::Unsub: Send + 'static,
{
  type Unsub = MultiSubscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let MergeAll { source, concurrent } = self;
    let subscriptions = MultiSubscription::default();
    let shared = Shared {
      state: MutArc::own(MergeAllState {
        observer: Some(observer),
        pending: VecDeque::new(),
        active: 0,
        outer_completed: false,
      }),
      subscriptions: subscriptions.clone(),
      concurrent,
      subscribe_inner: subscribe_inner::<O, S::Item>,
    };
    let outer = SerialSubscription::default();
    subscriptions.append(outer.clone());
    let unsub = source.actual_subscribe(MergeAllObserver { shared, upstream: outer.clone() });
    outer.replace(unsub);
    subscriptions
  }
}
