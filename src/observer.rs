//! Observer trait and implementations
//!
//! The Observer trait defines the consumer of data in the reactive pattern.
//! It provides three methods: next (for values), error (for errors), and
//! complete (for stream completion).

use std::{
  fmt::Debug,
  sync::{PoisonError, RwLock},
};

use once_cell::sync::Lazy;

use crate::rc::MutArc;

// ============================================================================
// Observer Trait
// ============================================================================

/// Observer trait: the consumer of one subscription's events.
///
/// `error` and `complete` consume the observer, so nothing can be delivered
/// after a terminal event.
pub trait Observer<Item, Err> {
  /// Receive the next value from the observable
  fn next(&mut self, value: Item);

  /// Handle an error from the observable
  fn error(self, err: Err);

  /// Handle completion of the observable
  fn complete(self);

  /// Returns `true` if the observer will not accept more values.
  ///
  /// Synchronous sources check this between items so a downstream `take` or
  /// an unsubscribe stops them early.
  fn is_closed(&self) -> bool;
}

// ============================================================================
// Event
// ============================================================================

/// One notification of a stream, as delivered to `subscribe_event`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<Item, Err> {
  Next(Item),
  Error(Err),
  Completed,
}

impl<Item, Err> Event<Item, Err> {
  #[inline]
  pub fn is_terminal(&self) -> bool { !matches!(self, Event::Next(_)) }

  /// Replay this event on an observer.
  pub fn deliver<O: Observer<Item, Err>>(self, observer: &mut Option<O>) {
    match self {
      Event::Next(v) => observer.next(v),
      Event::Error(e) => observer.take().error(e),
      Event::Completed => observer.take().complete(),
    }
  }
}

// ============================================================================
// Emitter Trait
// ============================================================================

/// Emission facade handed to the producer of `observable::create`.
///
/// Takes `&mut self` for every method so the producer can work with a
/// `&mut dyn Emitter` and never learns the concrete observer type. Calls made
/// after a terminal event are dropped.
pub trait Emitter<Item, Err> {
  fn next(&mut self, value: Item);
  fn error(&mut self, err: Err);
  fn complete(&mut self);
  fn is_closed(&self) -> bool;
}

// ============================================================================
// DynObserver Trait - Object-safe Observer
// ============================================================================

/// Object-safe mirror of [`Observer`], used where observers of different
/// types live in one collection (subjects).
pub trait DynObserver<Item, Err> {
  fn box_next(&mut self, value: Item);
  fn box_error(self: Box<Self>, err: Err);
  fn box_complete(self: Box<Self>);
  fn box_is_closed(&self) -> bool;
}

impl<T, Item, Err> DynObserver<Item, Err> for T
where
  T: Observer<Item, Err>,
{
  fn box_next(&mut self, value: Item) { self.next(value); }
  fn box_error(self: Box<Self>, err: Err) { self.error(err); }
  fn box_complete(self: Box<Self>) { self.complete(); }
  fn box_is_closed(&self) -> bool { self.is_closed() }
}

/// Boxed observer that may cross threads.
pub type BoxObserver<'a, Item, Err> = Box<dyn DynObserver<Item, Err> + Send + 'a>;

impl<'a, Item, Err> Observer<Item, Err> for BoxObserver<'a, Item, Err> {
  #[inline]
  fn next(&mut self, value: Item) { (**self).box_next(value) }

  #[inline]
  fn error(self, err: Err) { self.box_error(err) }

  #[inline]
  fn complete(self) { self.box_complete() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).box_is_closed() }
}

// ============================================================================
// Closure observers
// ============================================================================

/// Observer built from a `next` closure only. Errors are handed to the
/// unhandled-error hook.
#[derive(Clone)]
pub struct ObserverNext<N>(pub N);

impl<N, Item, Err> Observer<Item, Err> for ObserverNext<N>
where
  N: FnMut(Item),
  Err: Debug,
{
  #[inline]
  fn next(&mut self, value: Item) { (self.0)(value); }

  fn error(self, err: Err) { report_unhandled_error(&err); }

  #[inline]
  fn complete(self) {}

  #[inline]
  fn is_closed(&self) -> bool { false }
}

/// Observer built from `next` and `error` closures.
#[derive(Clone)]
pub struct ObserverErr<N, E> {
  pub next: N,
  pub error: E,
}

impl<N, E, Item, Err> Observer<Item, Err> for ObserverErr<N, E>
where
  N: FnMut(Item),
  E: FnOnce(Err),
{
  #[inline]
  fn next(&mut self, value: Item) { (self.next)(value); }

  #[inline]
  fn error(self, err: Err) { (self.error)(err); }

  #[inline]
  fn complete(self) {}

  #[inline]
  fn is_closed(&self) -> bool { false }
}

/// Observer built from `next` and `complete` closures. Errors are handed to
/// the unhandled-error hook.
#[derive(Clone)]
pub struct ObserverComp<N, C> {
  pub next: N,
  pub complete: C,
}

impl<N, C, Item, Err> Observer<Item, Err> for ObserverComp<N, C>
where
  N: FnMut(Item),
  C: FnOnce(),
  Err: Debug,
{
  #[inline]
  fn next(&mut self, value: Item) { (self.next)(value); }

  fn error(self, err: Err) { report_unhandled_error(&err); }

  #[inline]
  fn complete(self) { (self.complete)(); }

  #[inline]
  fn is_closed(&self) -> bool { false }
}

/// Observer built from all three closures.
#[derive(Clone)]
pub struct ObserverAll<N, E, C> {
  pub next: N,
  pub error: E,
  pub complete: C,
}

impl<N, E, C, Item, Err> Observer<Item, Err> for ObserverAll<N, E, C>
where
  N: FnMut(Item),
  E: FnOnce(Err),
  C: FnOnce(),
{
  #[inline]
  fn next(&mut self, value: Item) { (self.next)(value); }

  #[inline]
  fn error(self, err: Err) { (self.error)(err); }

  #[inline]
  fn complete(self) { (self.complete)(); }

  #[inline]
  fn is_closed(&self) -> bool { false }
}

/// Observer receiving every notification as an [`Event`].
#[derive(Clone)]
pub struct ObserverEvent<F>(pub F);

impl<F, Item, Err> Observer<Item, Err> for ObserverEvent<F>
where
  F: FnMut(Event<Item, Err>),
{
  #[inline]
  fn next(&mut self, value: Item) { (self.0)(Event::Next(value)); }

  #[inline]
  fn error(mut self, err: Err) { (self.0)(Event::Error(err)); }

  #[inline]
  fn complete(mut self) { (self.0)(Event::Completed); }

  #[inline]
  fn is_closed(&self) -> bool { false }
}

// ============================================================================
// Observer implementations for Option and shared Option wrappers
// ============================================================================

/// Option observer - None ignores all events, Some delegates to inner
impl<O, Item, Err> Observer<Item, Err> for Option<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if let Some(inner) = self {
      inner.next(value);
    }
  }

  fn error(self, err: Err) {
    if let Some(inner) = self {
      inner.error(err);
    }
  }

  fn complete(self) {
    if let Some(inner) = self {
      inner.complete();
    }
  }

  fn is_closed(&self) -> bool { self.as_ref().map_or(true, Observer::is_closed) }
}

/// `MutArc<Option<O>>` - one downstream shared by several upstream observers.
/// Terminal events `take()` the inner observer so only the first one lands.
impl<O, Item, Err> Observer<Item, Err> for MutArc<Option<O>>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) { self.rc_deref_mut().next(value); }

  fn error(self, err: Err) {
    let inner = self.rc_deref_mut().take();
    if let Some(inner) = inner {
      inner.error(err);
    }
  }

  fn complete(self) {
    let inner = self.rc_deref_mut().take();
    if let Some(inner) = inner {
      inner.complete();
    }
  }

  fn is_closed(&self) -> bool {
    self
      .try_rc_deref_mut()
      .is_some_and(|inner| Observer::<Item, Err>::is_closed(&*inner))
  }
}

// ============================================================================
// Unhandled errors
// ============================================================================

type UnhandledErrorHook = Box<dyn Fn(&dyn Debug) + Send + Sync>;

static UNHANDLED_ERROR_HOOK: Lazy<RwLock<Option<UnhandledErrorHook>>> =
  Lazy::new(|| RwLock::new(None));

/// Install the handler for errors that reach a subscriber registered without
/// an error callback. Replaces any previous hook.
///
/// Without a hook such errors are logged with `tracing::error!`.
pub fn set_unhandled_error_hook(hook: impl Fn(&dyn Debug) + Send + Sync + 'static) {
  *UNHANDLED_ERROR_HOOK
    .write()
    .unwrap_or_else(PoisonError::into_inner) = Some(Box::new(hook));
}

/// Restore the default `tracing` based reporting.
pub fn reset_unhandled_error_hook() {
  *UNHANDLED_ERROR_HOOK
    .write()
    .unwrap_or_else(PoisonError::into_inner) = None;
}

pub(crate) fn report_unhandled_error(err: &dyn Debug) {
  let hook = UNHANDLED_ERROR_HOOK
    .read()
    .unwrap_or_else(PoisonError::into_inner);
  match hook.as_ref() {
    Some(hook) => hook(err),
    None => tracing::error!(error = ?err, "unhandled error reached a subscriber"),
  }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
  use super::*;

  struct TestObserver {
    values: Vec<i32>,
  }

  impl Observer<i32, ()> for TestObserver {
    fn next(&mut self, value: i32) { self.values.push(value); }

    fn error(self, _: ()) {}

    fn complete(self) {}

    fn is_closed(&self) -> bool { false }
  }

  #[test]
  fn observer_trait() {
    let mut obs = TestObserver { values: vec![] };
    obs.next(1);
    obs.next(2);
    assert_eq!(obs.values, vec![1, 2]);
    assert!(!obs.is_closed());
  }

  #[test]
  fn closure_as_observer() {
    let mut count = 0;
    let mut closure_obs = ObserverNext(|v: i32| count += v);
    Observer::<i32, ()>::next(&mut closure_obs, 10);
    Observer::<i32, ()>::next(&mut closure_obs, 20);
    assert_eq!(count, 30);
  }

  #[test]
  fn option_observer_closes_when_taken() {
    let shared = MutArc::own(Some(TestObserver { values: vec![] }));
    let mut upstream = shared.clone();
    upstream.next(1);
    assert!(!upstream.is_closed());
    upstream.clone().complete();
    assert!(upstream.is_closed());
    upstream.next(2);
    assert!(shared.rc_deref().is_none());
  }

  #[test]
  fn event_observer_sees_terminal() {
    let mut events = vec![];
    let mut obs = ObserverEvent(|e: Event<i32, &'static str>| events.push(e));
    obs.next(1);
    obs.error("boom");
    assert_eq!(events, vec![Event::Next(1), Event::Error("boom")]);
  }

  #[test]
  fn boxed_observer_delegates() {
    let mut boxed: BoxObserver<i32, ()> = Box::new(ObserverAll {
      next: |_: i32| {},
      error: |_: ()| {},
      complete: || {},
    });
    boxed.next(1);
    assert!(!boxed.is_closed());
    boxed.complete();
  }
}
