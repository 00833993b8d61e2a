//! Lifecycle taps: `on_complete`, `on_error` and `finalize`.

use std::convert::Infallible;

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  rc::MutArc,
  subscription::Subscription,
};

// ============================================================================
// OnError
// ============================================================================

/// Hands the source's error to `func`. The resulting stream completes instead
/// of erroring, so its error type is `Infallible`.
#[derive(Clone)]
pub struct OnError<S, F> {
  pub source: S,
  pub func: F,
}

impl<S: ObservableType, F> ObservableType for OnError<S, F> {
  type Item = S::Item;
  type Err = Infallible;
}

pub struct OnErrorObserver<O, F> {
  observer: O,
  func: F,
}

impl<O, F, Item, Err> Observer<Item, Err> for OnErrorObserver<O, F>
where
  O: Observer<Item, Infallible>,
  F: FnOnce(Err),
{
  fn next(&mut self, value: Item) { self.observer.next(value); }

  fn error(self, err: Err) {
    (self.func)(err);
    self.observer.complete();
  }

  fn complete(self) { self.observer.complete(); }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

impl<S, F, O> CoreObservable<O> for OnError<S, F>
where
  S: CoreObservable<OnErrorObserver<O, F>>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let OnError { source, func } = self;
    source.actual_subscribe(OnErrorObserver { observer, func })
  }
}

// ============================================================================
// OnComplete
// ============================================================================

/// Runs `func` when the source completes, before forwarding the completion.
#[derive(Clone)]
pub struct OnComplete<S, F> {
  pub source: S,
  pub func: F,
}

impl<S: ObservableType, F> ObservableType for OnComplete<S, F> {
  type Item = S::Item;
  type Err = S::Err;
}

pub struct OnCompleteObserver<O, F> {
  observer: O,
  func: F,
}

impl<O, F, Item, Err> Observer<Item, Err> for OnCompleteObserver<O, F>
where
  O: Observer<Item, Err>,
  F: FnOnce(),
{
  fn next(&mut self, value: Item) { self.observer.next(value); }

  fn error(self, err: Err) { self.observer.error(err); }

  fn complete(self) {
    (self.func)();
    self.observer.complete();
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

impl<S, F, O> CoreObservable<O> for OnComplete<S, F>
where
  S: CoreObservable<OnCompleteObserver<O, F>>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let OnComplete { source, func } = self;
    source.actual_subscribe(OnCompleteObserver { observer, func })
  }
}

// ============================================================================
// Finalize
// ============================================================================

/// Runs `func` exactly once, after the terminal event has been forwarded or
/// when the subscription is unsubscribed, whichever happens first.
#[derive(Clone)]
pub struct Finalize<S, F> {
  pub source: S,
  pub func: F,
}

impl<S: ObservableType, F> ObservableType for Finalize<S, F> {
  type Item = S::Item;
  type Err = S::Err;
}

fn run_once<F: FnOnce()>(func: &MutArc<Option<F>>) {
  let func = func.rc_deref_mut().take();
  if let Some(func) = func {
    func();
  }
}

pub struct FinalizeObserver<O, F> {
  observer: O,
  func: MutArc<Option<F>>,
}

impl<O, F, Item, Err> Observer<Item, Err> for FinalizeObserver<O, F>
where
  O: Observer<Item, Err>,
  F: FnOnce(),
{
  fn next(&mut self, value: Item) { self.observer.next(value); }

  fn error(self, err: Err) {
    self.observer.error(err);
    run_once(&self.func);
  }

  fn complete(self) {
    self.observer.complete();
    run_once(&self.func);
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

pub struct FinalizeSubscription<U, F> {
  upstream: U,
  func: MutArc<Option<F>>,
}

impl<U: Subscription, F: FnOnce()> Subscription for FinalizeSubscription<U, F> {
  fn unsubscribe(self) {
    self.upstream.unsubscribe();
    run_once(&self.func);
  }

  fn is_closed(&self) -> bool { self.func.rc_deref().is_none() || self.upstream.is_closed() }
}

impl<S, F, O> CoreObservable<O> for Finalize<S, F>
where
  S: CoreObservable<FinalizeObserver<O, F>>,
  F: FnOnce() + Send + 'static,
{
  type Unsub = FinalizeSubscription<S::Unsub, F>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let Finalize { source, func } = self;
    let func = MutArc::own(Some(func));
    let upstream = source.actual_subscribe(FinalizeObserver { observer, func: func.clone() });
    FinalizeSubscription { upstream, func }
  }
}
