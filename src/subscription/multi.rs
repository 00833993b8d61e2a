use std::fmt::{Debug, Formatter};

use smallvec::SmallVec;

use super::{BoxSubscription, Subscription};
use crate::rc::MutArc;

struct Inner {
  closed: bool,
  teardown: SmallVec<[BoxSubscription; 2]>,
}

impl Default for Inner {
  fn default() -> Self { Inner { closed: false, teardown: SmallVec::new() } }
}

/// A composite subscription: children are added over time and all released
/// together.
///
/// Clones share the same set. Adding to a closed composite releases the new
/// child immediately; closed children are pruned on every add.
#[derive(Clone, Default)]
pub struct MultiSubscription(MutArc<Inner>);

impl MultiSubscription {
  pub fn append(&self, subscription: impl Subscription + Send + 'static) {
    let mut inner = self.0.rc_deref_mut();
    if inner.closed {
      drop(inner);
      subscription.unsubscribe();
    } else {
      inner.teardown.retain(|v| !v.is_closed());
      inner.teardown.push(subscription.into_boxed());
    }
  }

  /// Number of children still held.
  pub fn teardown_size(&self) -> usize { self.0.rc_deref().teardown.len() }
}

impl Subscription for MultiSubscription {
  fn unsubscribe(self) {
    // Children are released outside the lock, they may call back into it.
    let teardown = {
      let mut inner = self.0.rc_deref_mut();
      if inner.closed {
        return;
      }
      inner.closed = true;
      std::mem::take(&mut inner.teardown)
    };
    for sub in teardown {
      sub.unsubscribe();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.rc_deref().closed }
}

impl Debug for MultiSubscription {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let inner = self.0.rc_deref();
    f.debug_struct("MultiSubscription")
      .field("closed", &inner.closed)
      .field("teardown_count", &inner.teardown.len())
      .finish()
  }
}

/// Scoped bulk release: every subscription added to the bag is unsubscribed
/// when the bag is dropped (or explicitly disposed).
///
/// ```rust
/// use rxstream::prelude::*;
///
/// let bag = DisposeBag::default();
/// let subject = Subject::<i32, ()>::default();
/// subject.clone().subscribe(|v| println!("{v}")).disposed_by(&bag);
/// assert_eq!(subject.observer_count(), 1);
/// drop(bag);
/// assert_eq!(subject.observer_count(), 0);
/// ```
#[derive(Default)]
pub struct DisposeBag(MultiSubscription);

impl DisposeBag {
  #[inline]
  pub fn add(&self, subscription: impl Subscription + Send + 'static) { self.0.append(subscription) }

  /// Release everything now; later additions are released immediately.
  #[inline]
  pub fn dispose(&self) { self.0.clone().unsubscribe() }

  #[inline]
  pub fn is_disposed(&self) -> bool { self.0.is_closed() }

  #[inline]
  pub fn len(&self) -> usize { self.0.teardown_size() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

impl Drop for DisposeBag {
  fn drop(&mut self) { self.dispose() }
}
