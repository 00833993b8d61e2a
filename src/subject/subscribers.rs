use std::sync::{
  atomic::{AtomicBool, Ordering},
  Arc,
};

use crate::{
  observer::{BoxObserver, Observer},
  rc::MutArc,
  subscription::DynamicSubscriptions,
};

/// One registered observer of a subject.
///
/// The closed flag is checked before the observer lock is taken, so an
/// unsubscribe racing a broadcast only ever waits for the value in flight.
pub(crate) struct ObserverSlot<Item, Err> {
  closed: Arc<AtomicBool>,
  observer: MutArc<Option<BoxObserver<'static, Item, Err>>>,
}

impl<Item, Err> Clone for ObserverSlot<Item, Err> {
  fn clone(&self) -> Self { Self { closed: self.closed.clone(), observer: self.observer.clone() } }
}

impl<Item, Err> ObserverSlot<Item, Err> {
  pub(crate) fn new(observer: BoxObserver<'static, Item, Err>) -> Self {
    Self { closed: Arc::new(AtomicBool::new(false)), observer: MutArc::own(Some(observer)) }
  }

  /// A slot that never receives anything.
  pub(crate) fn closed() -> Self {
    Self { closed: Arc::new(AtomicBool::new(true)), observer: MutArc::own(None) }
  }

  #[inline]
  pub(crate) fn is_closed(&self) -> bool { self.closed.load(Ordering::Acquire) }

  pub(crate) fn next(&self, value: Item) {
    if self.is_closed() {
      return;
    }
    let mut guard = self.observer.rc_deref_mut();
    let Some(observer) = guard.as_mut() else { return };
    observer.next(value);
    if observer.is_closed() {
      self.closed.store(true, Ordering::Release);
      let observer = guard.take();
      drop(guard);
      drop(observer);
    }
  }

  pub(crate) fn error(&self, err: Err) {
    if let Some(observer) = self.take_for_terminal() {
      observer.error(err);
    }
  }

  pub(crate) fn complete(&self) {
    if let Some(observer) = self.take_for_terminal() {
      observer.complete();
    }
  }

  /// Stop delivering to this slot without notifying its observer.
  ///
  /// If the observer is busy with a value on this very thread the lock can't
  /// be taken; the flag is enough then and the observer goes away after its
  /// current call.
  pub(crate) fn close(&self) {
    if self.closed.swap(true, Ordering::AcqRel) {
      return;
    }
    let observer = self.observer.try_rc_deref_mut().and_then(|mut guard| guard.take());
    drop(observer);
  }

  fn take_for_terminal(&self) -> Option<BoxObserver<'static, Item, Err>> {
    if self.closed.swap(true, Ordering::AcqRel) {
      return None;
    }
    self.observer.rc_deref_mut().take()
  }
}

/// The observers of one subject, keyed by subscription id.
pub(crate) struct Subscribers<Item, Err> {
  inner: DynamicSubscriptions<ObserverSlot<Item, Err>>,
}

impl<Item, Err> Default for Subscribers<Item, Err> {
  fn default() -> Self { Self { inner: DynamicSubscriptions::default() } }
}

impl<Item, Err> Subscribers<Item, Err> {
  #[inline]
  pub(crate) fn add(&mut self, slot: ObserverSlot<Item, Err>) -> usize { self.inner.add(slot) }

  #[inline]
  pub(crate) fn remove(&mut self, id: usize) -> Option<ObserverSlot<Item, Err>> { self.inner.remove(id) }

  /// The slots a broadcast should visit, in subscription order.
  pub(crate) fn snapshot(&self) -> Vec<ObserverSlot<Item, Err>> { self.inner.iter().cloned().collect() }

  pub(crate) fn take_all(&mut self) -> Vec<ObserverSlot<Item, Err>> { self.inner.drain().collect() }

  pub(crate) fn prune_closed(&mut self) { self.inner.retain(|slot| !slot.is_closed()) }

  pub(crate) fn active_count(&self) -> usize { self.inner.iter().filter(|slot| !slot.is_closed()).count() }
}
