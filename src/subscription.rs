//! Subscription handles
//!
//! A subscription is the release handle of one acquired resource: an
//! observable chain, a scheduled task, a subject registration. Releasing is
//! idempotent; handles that can be cloned keep a shared closed flag so a
//! second `unsubscribe` through any clone has no effect.

mod boxed;
mod dynamic;
mod multi;
mod serial;
mod source_with_handle;
mod tuple;

pub use boxed::*;
pub use dynamic::*;
pub use multi::*;
pub use serial::*;
pub use source_with_handle::*;
pub use tuple::*;

/// Handle returned by every subscribe call.
pub trait Subscription {
  /// Release the resource. Calling it on an already closed handle is a no-op.
  fn unsubscribe(self);

  fn is_closed(&self) -> bool;

  /// Activates "RAII" behavior for this subscription: `unsubscribe()` is
  /// called as soon as the returned guard goes out of scope.
  ///
  /// **Attention:** binding the guard to `_` drops it, and unsubscribes,
  /// immediately.
  fn unsubscribe_when_dropped(self) -> SubscriptionGuard<Self>
  where
    Self: Sized,
  {
    SubscriptionGuard::new(self)
  }

  /// Hand the subscription to a bag that releases it together with all its
  /// other entries.
  fn disposed_by(self, bag: &DisposeBag)
  where
    Self: Sized + Send + 'static,
  {
    bag.add(self);
  }

  fn into_boxed(self) -> BoxSubscription
  where
    Self: Sized + Send + 'static,
  {
    BoxSubscription::new(self)
  }
}

/// The handle of a source that holds no resources, like `from_iter`.
impl Subscription for () {
  #[inline]
  fn unsubscribe(self) {}

  #[inline]
  fn is_closed(&self) -> bool { true }
}

impl<T: Subscription> Subscription for Option<T> {
  #[inline]
  fn unsubscribe(self) {
    if let Some(inner) = self {
      inner.unsubscribe()
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.as_ref().map_or(true, Subscription::is_closed) }
}

/// A subscription that runs a closure on unsubscribe, typically the teardown
/// returned by a `create` producer.
pub struct ClosureSubscription<F>(pub F);

impl<F: FnOnce()> Subscription for ClosureSubscription<F> {
  #[inline]
  fn unsubscribe(self) { (self.0)() }

  #[inline]
  fn is_closed(&self) -> bool { false }
}

/// An RAII implementation of a "scoped subscribed" of a subscription.
/// When this structure is dropped (falls out of scope), the subscription will
/// be unsubscribed.
///
/// If you want to drop it immediately, wrap it in its own scope
#[must_use]
pub struct SubscriptionGuard<T: Subscription>(Option<T>);

impl<T: Subscription> SubscriptionGuard<T> {
  /// Wraps an existing subscription with a guard to enable RAII behavior for
  /// it.
  pub fn new(subscription: T) -> SubscriptionGuard<T> { SubscriptionGuard(Some(subscription)) }

  /// Give up the guard without unsubscribing.
  pub fn into_inner(mut self) -> Option<T> { self.0.take() }
}

impl<T: Subscription> Drop for SubscriptionGuard<T> {
  #[inline]
  fn drop(&mut self) {
    if let Some(subscription) = self.0.take() {
      subscription.unsubscribe()
    }
  }
}
