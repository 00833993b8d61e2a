use super::Subscription;

/// TupleSubscription that combines two subscriptions
///
/// Used by operators that own exactly two independent handles, e.g. the two
/// sides of `amb` or a source plus the trigger of `skip_until`.
pub struct TupleSubscription<U1, U2> {
  unsub1: U1,
  unsub2: U2,
}

impl<U1, U2> TupleSubscription<U1, U2> {
  pub fn new(unsub1: U1, unsub2: U2) -> Self { TupleSubscription { unsub1, unsub2 } }
}

impl<U1, U2> Subscription for TupleSubscription<U1, U2>
where
  U1: Subscription,
  U2: Subscription,
{
  fn unsubscribe(self) {
    self.unsub1.unsubscribe();
    self.unsub2.unsubscribe();
  }

  // Closed only when both halves are closed.
  fn is_closed(&self) -> bool { self.unsub1.is_closed() && self.unsub2.is_closed() }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::subscription::SerialSubscription;

  #[test]
  fn tuple_subscription() {
    let a = SerialSubscription::default();
    let b = SerialSubscription::default();

    let tuple_sub = TupleSubscription::new(a.clone(), b.clone());

    assert!(!tuple_sub.is_closed());
    tuple_sub.unsubscribe();

    assert!(a.is_closed());
    assert!(b.is_closed());
  }

  #[test]
  fn closed_only_when_both_closed() {
    let a = SerialSubscription::default();
    let tuple_sub = TupleSubscription::new(a.clone(), ());
    assert!(!tuple_sub.is_closed());
    a.unsubscribe();
    assert!(tuple_sub.is_closed());
  }
}
