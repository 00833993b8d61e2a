//! SourceWithHandle subscription combinator
//!
//! A subscription made of a primary part whose state it reports, plus an
//! extra handle released along with it. `subscribe` pairs the downstream
//! subscriber with the upstream chain this way, and `delay_subscription`
//! pairs the pending task with the late-bound source.

use super::Subscription;

/// When unsubscribed, the source is released first, then the handle.
/// `is_closed` delegates to the source.
pub struct SourceWithHandle<U, H> {
  pub source: U,
  pub handle: H,
}

impl<U, H> SourceWithHandle<U, H> {
  #[inline]
  pub fn new(source: U, handle: H) -> Self { Self { source, handle } }
}

impl<U, H> Subscription for SourceWithHandle<U, H>
where
  U: Subscription,
  H: Subscription,
{
  fn unsubscribe(self) {
    self.source.unsubscribe();
    self.handle.unsubscribe();
  }

  fn is_closed(&self) -> bool { self.source.is_closed() }
}
