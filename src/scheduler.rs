//! Scheduling capability used by the time-based constructors and operators.
//!
//! The engine only needs three things from a scheduler: run a task now, run
//! it after a delay, run it periodically, each returning a [`TaskHandle`]
//! that cancels it. Every time-based operator takes its scheduler as an
//! explicit parameter.

use std::sync::{
  atomic::{AtomicBool, Ordering},
  Arc,
};

pub use std::time::Duration;

use futures::future::AbortHandle;

use crate::subscription::Subscription;

#[cfg(feature = "futures-scheduler")]
mod futures_scheduler;
mod test_scheduler;
#[cfg(feature = "tokio-scheduler")]
mod tokio_scheduler;

#[cfg(feature = "futures-scheduler")]
pub use futures_scheduler::default_scheduler;
pub use test_scheduler::TestScheduler;

/// A Scheduler is an object to order task and schedule their execution.
pub trait Scheduler: Clone + Send + 'static {
  /// Run `task` once, after `delay` if given. `None` means "as soon as
  /// possible", which is never synchronously inside this call.
  fn schedule<T>(&self, task: T, delay: Option<Duration>) -> TaskHandle
  where
    T: FnOnce() + Send + 'static;

  /// Run `task` every `period`, passing the zero-based tick index. The first
  /// tick fires after `delay`, or after one `period` when `delay` is `None`.
  fn schedule_repeating<T>(&self, task: T, period: Duration, delay: Option<Duration>) -> TaskHandle
  where
    T: FnMut(usize) + Send + 'static;
}

/// Cancel handle of a scheduled task. Clones refer to the same task.
///
/// A one-shot task closes its handle once it has run.
#[derive(Clone, Default)]
pub struct TaskHandle {
  closed: Arc<AtomicBool>,
  abort: Option<AbortHandle>,
}

impl TaskHandle {
  pub(crate) fn new() -> Self { Self::default() }

  pub(crate) fn with_abort(mut self, abort: AbortHandle) -> Self {
    self.abort = Some(abort);
    self
  }

  #[inline]
  pub(crate) fn mark_finished(&self) { self.closed.store(true, Ordering::Release); }
}

impl Subscription for TaskHandle {
  fn unsubscribe(self) {
    self.closed.store(true, Ordering::Release);
    if let Some(abort) = self.abort {
      abort.abort();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.closed.load(Ordering::Acquire) }
}
