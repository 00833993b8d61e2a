use super::{subject_core::CoreState, subscribers::ObserverSlot};
use crate::{rc::MutArc, subscription::Subscription};

/// Handle of one observer registered on a subject.
///
/// Unsubscribing stops delivery right away and removes the observer from the
/// subject; it never notifies the observer.
pub struct SubjectSubscription<Item, Err> {
  registration: Option<(MutArc<CoreState<Item, Err>>, usize)>,
  slot: ObserverSlot<Item, Err>,
}

impl<Item, Err> SubjectSubscription<Item, Err> {
  pub(crate) fn new(state: MutArc<CoreState<Item, Err>>, id: usize, slot: ObserverSlot<Item, Err>) -> Self {
    Self { registration: Some((state, id)), slot }
  }

  /// Handle for an observer that was served and terminated during subscribe.
  pub(crate) fn finished() -> Self { Self { registration: None, slot: ObserverSlot::closed() } }
}

impl<Item, Err> Subscription for SubjectSubscription<Item, Err> {
  fn unsubscribe(self) {
    self.slot.close();
    if let Some((state, id)) = self.registration {
      let removed = state.rc_deref_mut().subscribers.remove(id);
      drop(removed);
    }
  }

  fn is_closed(&self) -> bool { self.slot.is_closed() }
}
