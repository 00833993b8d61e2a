use std::sync::{
  atomic::{AtomicBool, Ordering},
  Arc,
};

use crate::{observer::Observer, rc::MutArc, subscription::Subscription};

/// The last link of a chain: wraps the user's observer and doubles as the
/// handle that cuts it off.
///
/// Unsubscribing flips a shared flag checked before every delivery, so it
/// halts delivery synchronously even when called from inside the observer's
/// own callback or while another thread is emitting.
pub struct Subscriber<O> {
  observer: MutArc<Option<O>>,
  closed: Arc<AtomicBool>,
}

impl<O> Subscriber<O> {
  pub fn new(observer: O) -> Self {
    Subscriber { observer: MutArc::own(Some(observer)), closed: Arc::new(AtomicBool::new(false)) }
  }

  fn take_observer(&self) -> Option<O> {
    if self.closed.swap(true, Ordering::AcqRel) {
      None
    } else {
      self.observer.rc_deref_mut().take()
    }
  }
}

impl<O> Clone for Subscriber<O> {
  fn clone(&self) -> Self {
    Subscriber { observer: self.observer.clone(), closed: self.closed.clone() }
  }
}

impl<Item, Err, O> Observer<Item, Err> for Subscriber<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if self.closed.load(Ordering::Acquire) {
      return;
    }
    if let Some(observer) = self.observer.rc_deref_mut().as_mut() {
      observer.next(value);
    }
  }

  fn error(self, err: Err) {
    if let Some(observer) = self.take_observer() {
      observer.error(err);
    }
  }

  fn complete(self) {
    if let Some(observer) = self.take_observer() {
      observer.complete();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.closed.load(Ordering::Acquire) }
}

impl<O> Subscription for Subscriber<O> {
  fn unsubscribe(self) {
    if self.closed.swap(true, Ordering::AcqRel) {
      return;
    }
    // Held only while the observer runs; in that case it is dropped with the
    // last clone instead.
    let observer = self
      .observer
      .try_rc_deref_mut()
      .and_then(|mut slot| slot.take());
    drop(observer);
  }

  #[inline]
  fn is_closed(&self) -> bool { self.closed.load(Ordering::Acquire) }
}
