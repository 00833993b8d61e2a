use super::Subscription;

/// Object-safe mirror of [`Subscription`].
///
/// `Subscription::unsubscribe(self)` needs `Sized`, so a boxed handle goes
/// through this trait instead.
pub trait DynSubscription {
  fn box_unsubscribe(self: Box<Self>);
  fn box_is_closed(&self) -> bool;
}

impl<T: Subscription> DynSubscription for T {
  #[inline]
  fn box_unsubscribe(self: Box<Self>) { (*self).unsubscribe() }

  #[inline]
  fn box_is_closed(&self) -> bool { self.is_closed() }
}

/// A type-erased subscription that may cross threads.
///
/// Subscriptions are control handles, not data views, so the box is
/// `'static`: it can be stored in operator state and released at any later
/// time from any thread.
pub struct BoxSubscription(Box<dyn DynSubscription + Send>);

impl BoxSubscription {
  #[inline]
  pub fn new(subscription: impl Subscription + Send + 'static) -> Self {
    BoxSubscription(Box::new(subscription))
  }
}

impl Subscription for BoxSubscription {
  #[inline]
  fn unsubscribe(self) { self.0.box_unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { self.0.box_is_closed() }

  #[inline]
  fn into_boxed(self) -> BoxSubscription { self }
}
