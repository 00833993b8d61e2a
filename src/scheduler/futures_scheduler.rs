use std::time::Instant;

use futures::{
  executor::ThreadPool,
  future::{abortable, Future},
};
use futures_time::task::sleep;
use once_cell::sync::Lazy;

use super::{Duration, Scheduler, TaskHandle};
use crate::subscription::Subscription;

static DEFAULT_POOL: Lazy<ThreadPool> =
  Lazy::new(|| ThreadPool::new().expect("failed to start the default thread pool"));

/// Process-wide thread pool, created on first use and never torn down.
///
/// Only a convenience: every time-based operator still takes its scheduler as
/// a parameter, nothing reaches for this implicitly.
pub fn default_scheduler() -> ThreadPool { DEFAULT_POOL.clone() }

fn spawn_abortable(pool: &ThreadPool, handle: TaskHandle, fut: impl Future<Output = ()> + Send + 'static) -> TaskHandle {
  let (fut, abort) = abortable(fut);
  pool.spawn_ok(async move {
    let _ = fut.await;
  });
  handle.with_abort(abort)
}

impl Scheduler for ThreadPool {
  fn schedule<T>(&self, task: T, delay: Option<Duration>) -> TaskHandle
  where
    T: FnOnce() + Send + 'static,
  {
    let handle = TaskHandle::new();
    let c_handle = handle.clone();
    let fut = async move {
      if let Some(delay) = delay {
        sleep(delay.into()).await;
      }
      if !c_handle.is_closed() {
        task();
        c_handle.mark_finished();
      }
    };
    spawn_abortable(self, handle, fut)
  }

  fn schedule_repeating<T>(&self, mut task: T, period: Duration, delay: Option<Duration>) -> TaskHandle
  where
    T: FnMut(usize) + Send + 'static,
  {
    let handle = TaskHandle::new();
    let c_handle = handle.clone();
    let fut = async move {
      // Deadlines are offsets from `start`, so time spent in `task` does not
      // push later ticks back.
      let start = Instant::now();
      let mut deadline = delay.unwrap_or(period);
      for tick in 0.. {
        sleep(deadline.saturating_sub(start.elapsed()).into()).await;
        if c_handle.is_closed() {
          break;
        }
        task(tick);
        deadline = deadline.saturating_add(period);
      }
    };
    spawn_abortable(self, handle, fut)
  }
}
