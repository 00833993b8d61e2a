//! Test Scheduler for deterministic testing of time-based operators.
//!
//! Provides virtual time that only advances when explicitly instructed,
//! enabling deterministic testing of `delay`, `buffer`, `interval`, etc.
//!
//! # Usage
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use rxstream::prelude::*;
//!
//! let scheduler = TestScheduler::default();
//! let values = Arc::new(Mutex::new(vec![]));
//! let c_values = values.clone();
//! observable::of([42])
//!   .delay(Duration::from_millis(100), scheduler.clone())
//!   .subscribe(move |v| c_values.lock().unwrap().push(v));
//!
//! scheduler.advance_by(Duration::from_millis(99));
//! assert!(values.lock().unwrap().is_empty());
//! scheduler.advance_by(Duration::from_millis(1));
//! assert_eq!(*values.lock().unwrap(), vec![42]);
//! ```
//!
//! Clones share one clock and one task queue. Tasks run synchronously on the
//! thread calling [`TestScheduler::advance_by`].

use std::{cmp::Ordering, collections::BinaryHeap};

use super::{Duration, Scheduler, TaskHandle};
use crate::{rc::MutArc, subscription::Subscription};

// ==================== Internal State ====================

#[derive(Default)]
struct TestSchedulerState {
  virtual_time: Duration,
  task_queue: BinaryHeap<ScheduledTask>,
  next_task_id: usize,
}

enum TaskKind {
  Once(Box<dyn FnOnce() + Send>),
  Repeating { task: Box<dyn FnMut(usize) + Send>, period: Duration, tick: usize },
}

struct ScheduledTask {
  scheduled_time: Duration,
  task_id: usize,
  task: TaskKind,
  handle: TaskHandle,
}

impl PartialEq for ScheduledTask {
  fn eq(&self, other: &Self) -> bool {
    self.scheduled_time == other.scheduled_time && self.task_id == other.task_id
  }
}

impl Eq for ScheduledTask {}

impl PartialOrd for ScheduledTask {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for ScheduledTask {
  fn cmp(&self, other: &Self) -> Ordering {
    // Min-heap: earlier times first, then FIFO by task_id
    other
      .scheduled_time
      .cmp(&self.scheduled_time)
      .then_with(|| other.task_id.cmp(&self.task_id))
  }
}

impl TestSchedulerState {
  fn push(&mut self, scheduled_time: Duration, task: TaskKind, handle: TaskHandle) {
    let task_id = self.next_task_id;
    self.next_task_id += 1;
    self
      .task_queue
      .push(ScheduledTask { scheduled_time, task_id, task, handle });
  }
}

// ==================== TestScheduler ====================

/// A virtual time scheduler for deterministic testing.
#[derive(Clone, Default)]
pub struct TestScheduler {
  state: MutArc<TestSchedulerState>,
}

impl TestScheduler {
  /// Current virtual time, measured from the scheduler's creation.
  pub fn now(&self) -> Duration { self.state.rc_deref().virtual_time }

  /// Number of queued tasks, cancelled ones included until they are reached.
  pub fn pending_count(&self) -> usize { self.state.rc_deref().task_queue.len() }

  /// Advance virtual time by `duration`, running every task due on the way.
  ///
  /// Tasks run in order of their scheduled time, FIFO for equal times. A task
  /// scheduled by a running task is picked up in the same call if it falls
  /// due before the target time.
  pub fn advance_by(&self, duration: Duration) {
    let target_time = self.now() + duration;
    loop {
      let task = {
        let mut state = self.state.rc_deref_mut();
        let due = state
          .task_queue
          .peek()
          .is_some_and(|peek| peek.scheduled_time <= target_time);
        if !due {
          break;
        }
        let task = state.task_queue.pop();
        if let Some(task) = &task {
          state.virtual_time = task.scheduled_time;
        }
        task
      };
      let Some(scheduled) = task else {
        break;
      };
      self.run(scheduled);
    }
    self.state.rc_deref_mut().virtual_time = target_time;
  }

  // Runs outside the state lock: tasks schedule new tasks.
  fn run(&self, scheduled: ScheduledTask) {
    let ScheduledTask { scheduled_time, task, handle, .. } = scheduled;
    if handle.is_closed() {
      return;
    }
    match task {
      TaskKind::Once(task) => {
        task();
        handle.mark_finished();
      }
      TaskKind::Repeating { mut task, period, tick } => {
        task(tick);
        if !handle.is_closed() {
          let next = TaskKind::Repeating { task, period, tick: tick + 1 };
          self
            .state
            .rc_deref_mut()
            .push(scheduled_time + period, next, handle);
        }
      }
    }
  }
}

impl Scheduler for TestScheduler {
  fn schedule<T>(&self, task: T, delay: Option<Duration>) -> TaskHandle
  where
    T: FnOnce() + Send + 'static,
  {
    let handle = TaskHandle::new();
    let mut state = self.state.rc_deref_mut();
    let at = state.virtual_time + delay.unwrap_or(Duration::ZERO);
    state.push(at, TaskKind::Once(Box::new(task)), handle.clone());
    handle
  }

  fn schedule_repeating<T>(&self, task: T, period: Duration, delay: Option<Duration>) -> TaskHandle
  where
    T: FnMut(usize) + Send + 'static,
  {
    assert!(!period.is_zero(), "a repeating task needs a non-zero period");
    let handle = TaskHandle::new();
    let mut state = self.state.rc_deref_mut();
    let at = state.virtual_time + delay.unwrap_or(period);
    let task = TaskKind::Repeating { task: Box::new(task), period, tick: 0 };
    state.push(at, task, handle.clone());
    handle
  }
}
