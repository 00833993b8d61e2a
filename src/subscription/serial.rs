use super::{BoxSubscription, Subscription};
use crate::rc::MutArc;

#[derive(Default)]
struct Slot {
  closed: bool,
  current: Option<BoxSubscription>,
}

/// A late-bound, replaceable subscription slot.
///
/// Operators hand a clone to their observers before the upstream handle
/// exists; the handle is stored with [`replace`](Self::replace) once
/// subscribe returns. Replacing releases the previous handle, and a handle
/// stored into a closed slot is released at once, so an observer that
/// finished synchronously still tears its upstream down.
#[derive(Clone, Default)]
pub struct SerialSubscription(MutArc<Slot>);

impl SerialSubscription {
  pub fn replace(&self, subscription: impl Subscription + Send + 'static) {
    let mut slot = self.0.rc_deref_mut();
    if slot.closed {
      drop(slot);
      subscription.unsubscribe();
      return;
    }
    let previous = slot.current.replace(subscription.into_boxed());
    drop(slot);
    if let Some(previous) = previous {
      previous.unsubscribe();
    }
  }

  /// Release the current handle but keep the slot open for the next one.
  pub fn release_current(&self) {
    let current = self.0.rc_deref_mut().current.take();
    if let Some(current) = current {
      current.unsubscribe();
    }
  }
}

impl Subscription for SerialSubscription {
  fn unsubscribe(self) {
    let current = {
      let mut slot = self.0.rc_deref_mut();
      if slot.closed {
        return;
      }
      slot.closed = true;
      slot.current.take()
    };
    if let Some(current) = current {
      current.unsubscribe();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.rc_deref().closed }
}
