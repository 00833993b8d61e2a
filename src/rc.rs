use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};

/// Shared, mutable state guarded by a mutex.
///
/// Every operator that keeps per-subscription state across several observers
/// (merge, zip, combine_latest, ...) keeps it in one `MutArc`, so exactly one
/// event is processed at a time per operator instance.
#[derive(Default)]
pub struct MutArc<T>(Arc<Mutex<T>>);

impl<T> MutArc<T> {
  pub fn own(t: T) -> Self { Self(Arc::new(Mutex::new(t))) }

  /// Lock for reading. A poisoned lock is recovered, the panic that poisoned
  /// it has already been reported on its own thread.
  #[inline]
  pub fn rc_deref(&self) -> MutexGuard<'_, T> {
    self.0.lock().unwrap_or_else(PoisonError::into_inner)
  }

  #[inline]
  pub fn rc_deref_mut(&self) -> MutexGuard<'_, T> {
    self.0.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Lock only if nobody holds the lock right now, including the current
  /// thread further up the stack.
  #[inline]
  pub fn try_rc_deref_mut(&self) -> Option<MutexGuard<'_, T>> {
    match self.0.try_lock() {
      Ok(guard) => Some(guard),
      Err(TryLockError::Poisoned(p)) => Some(p.into_inner()),
      Err(TryLockError::WouldBlock) => None,
    }
  }

  #[inline]
  pub fn ptr_eq(&self, other: &Self) -> bool { Arc::ptr_eq(&self.0, &other.0) }
}

impl<T> From<T> for MutArc<T> {
  #[inline]
  fn from(t: T) -> Self { Self::own(t) }
}

impl<T> Clone for MutArc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn clones_share_state() {
    let a = MutArc::own(1);
    let b = a.clone();
    *b.rc_deref_mut() += 1;
    assert_eq!(*a.rc_deref(), 2);
    assert!(a.ptr_eq(&b));
  }

  #[test]
  fn try_lock_fails_while_held() {
    let a = MutArc::own(0);
    let guard = a.rc_deref_mut();
    assert!(a.try_rc_deref_mut().is_none());
    drop(guard);
    assert!(a.try_rc_deref_mut().is_some());
  }

  #[test]
  fn poisoned_lock_is_recovered() {
    let a = MutArc::own(5);
    let b = a.clone();
    let _ = std::thread::spawn(move || {
      let _guard = b.rc_deref_mut();
      panic!("poison");
    })
    .join();
    assert_eq!(*a.rc_deref(), 5);
  }
}
