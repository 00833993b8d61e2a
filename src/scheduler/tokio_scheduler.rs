use futures::future::abortable;
use tokio::runtime::Handle;

use super::{Duration, Scheduler, TaskHandle};
use crate::subscription::Subscription;

/// Schedules onto a tokio runtime through its [`Handle`].
impl Scheduler for Handle {
  fn schedule<T>(&self, task: T, delay: Option<Duration>) -> TaskHandle
  where
    T: FnOnce() + Send + 'static,
  {
    let handle = TaskHandle::new();
    let c_handle = handle.clone();
    let (fut, abort) = abortable(async move {
      if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
      }
      if !c_handle.is_closed() {
        task();
        c_handle.mark_finished();
      }
    });
    self.spawn(fut);
    handle.with_abort(abort)
  }

  fn schedule_repeating<T>(&self, mut task: T, period: Duration, delay: Option<Duration>) -> TaskHandle
  where
    T: FnMut(usize) + Send + 'static,
  {
    let handle = TaskHandle::new();
    let c_handle = handle.clone();
    let (fut, abort) = abortable(async move {
      let start = tokio::time::Instant::now() + delay.unwrap_or(period);
      let mut ticker = tokio::time::interval_at(start, period);
      for tick in 0.. {
        ticker.tick().await;
        if c_handle.is_closed() {
          break;
        }
        task(tick);
      }
    });
    self.spawn(fut);
    handle.with_abort(abort)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use super::*;

  #[tokio::test(flavor = "multi_thread")]
  async fn delayed_task_on_tokio() {
    let hits = Arc::new(Mutex::new(0));
    let c_hits = hits.clone();
    let handle = Handle::current().schedule(
      move || *c_hits.lock().unwrap() += 1,
      Some(Duration::from_millis(5)),
    );
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(*hits.lock().unwrap(), 1);
    assert!(handle.is_closed());
  }
}
