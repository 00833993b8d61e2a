//! Buffer operator implementation
//!
//! Batches source values, flushing on a count or a time span, whichever
//! comes first.

use std::mem;

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  rc::MutArc,
  scheduler::{Duration, Scheduler},
  subscription::{SerialSubscription, Subscription, TupleSubscription},
};

/// Buffer operator
///
/// Each flush emits the current batch, possibly empty, and restarts both the
/// count and the timer. Completion flushes what is left before completing;
/// an error drops it.
#[derive(Clone)]
pub struct Buffer<S, Sch> {
  pub source: S,
  pub time_span: Duration,
  pub count: usize,
  pub scheduler: Sch,
}

impl<S: ObservableType, Sch> ObservableType for Buffer<S, Sch> {
  type Item = Vec<S::Item>;
  type Err = S::Err;
}

struct BufferState<O, Item> {
  observer: Option<O>,
  buffer: Vec<Item>,
  // bumped on every flush so a stale timer knows it lost the race
  generation: u64,
}

impl<O, Item> BufferState<O, Item> {
  fn flush<Err>(&mut self) -> u64
  where
    O: Observer<Vec<Item>, Err>,
  {
    let batch = mem::take(&mut self.buffer);
    self.generation += 1;
    if let Some(observer) = self.observer.as_mut() {
      observer.next(batch);
    }
    self.generation
  }
}

#[derive(Clone)]
struct BufferTimer<Sch> {
  time_span: Duration,
  scheduler: Sch,
  slot: SerialSubscription,
}

impl<Sch: Scheduler> BufferTimer<Sch> {
  /// Schedules the time-span flush for `generation`, replacing the previous
  /// timer.
  fn arm<O, Item, Err>(&self, state: MutArc<BufferState<O, Item>>, generation: u64)
  where
    O: Observer<Vec<Item>, Err> + Send + 'static,
    Item: Send + 'static,
  {
    if self.slot.is_closed() {
      return;
    }
    let timer = self.clone();
    let handle = self.scheduler.schedule(
      move || {
        let next_generation = {
          let mut guard = state.rc_deref_mut();
          if guard.generation != generation || guard.observer.is_none() {
            return;
          }
          guard.flush::<Err>()
        };
        timer.arm::<O, Item, Err>(state, next_generation);
      },
      Some(self.time_span),
    );
    self.slot.replace(handle);
  }
}

pub struct BufferObserver<O, Item, Sch> {
  state: MutArc<BufferState<O, Item>>,
  count: usize,
  timer: BufferTimer<Sch>,
}

impl<O, Item, Err, Sch> Observer<Item, Err> for BufferObserver<O, Item, Sch>
where
  O: Observer<Vec<Item>, Err> + Send + 'static,
  Item: Send + 'static,
  Sch: Scheduler,
{
  fn next(&mut self, value: Item) {
    let flushed = {
      let mut state = self.state.rc_deref_mut();
      if state.observer.is_none() {
        return;
      }
      state.buffer.push(value);
      (state.buffer.len() >= self.count).then(|| state.flush::<Err>())
    };
    if let Some(generation) = flushed {
      self.timer.arm::<O, Item, Err>(self.state.clone(), generation);
    }
  }

  fn error(self, err: Err) {
    let observer = {
      let mut state = self.state.rc_deref_mut();
      state.buffer.clear();
      state.observer.take()
    };
    self.timer.slot.unsubscribe();
    if let Some(observer) = observer {
      observer.error(err);
    }
  }

  fn complete(self) {
    let rest = {
      let mut state = self.state.rc_deref_mut();
      let batch = mem::take(&mut state.buffer);
      state.observer.take().map(|observer| (observer, batch))
    };
    self.timer.slot.unsubscribe();
    if let Some((mut observer, batch)) = rest {
      observer.next(batch);
      observer.complete();
    }
  }

  fn is_closed(&self) -> bool {
    self
      .state
      .try_rc_deref_mut()
      .is_some_and(|state| state.observer.as_ref().map_or(true, Observer::<Vec<Item>, Err>::is_closed))
  }
}

impl<S, Sch, O> CoreObservable<O> for Buffer<S, Sch>
where
  S: CoreObservable<BufferObserver<O, <S as ObservableType>::Item, Sch>>,
  S::Item: Send + 'static,
  O: Observer<Vec<S::Item>, S::Err> + Send + 'static,
  Sch: Scheduler,
{
  type Unsub = TupleSubscription<S::Unsub, SerialSubscription>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let Buffer { source, time_span, count, scheduler } = self;
    let state = MutArc::own(BufferState { observer: Some(observer), buffer: vec![], generation: 0 });
    let timer = BufferTimer { time_span, scheduler, slot: SerialSubscription::default() };
    timer.arm::<O, S::Item, S::Err>(state.clone(), 0);

    let slot = timer.slot.clone();
    let unsub = source.actual_subscribe(BufferObserver { state, count, timer });
    TupleSubscription::new(unsub, slot)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::prelude::*;

  #[test]
  fn flushes_on_count_and_on_time() {
    let scheduler = TestScheduler::default();
    let mut source = Subject::<i32, ()>::default();
    let events = Arc::new(Mutex::new(vec![]));
    let c_events = events.clone();
    source
      .clone()
      .buffer(Duration::from_millis(100), 2, scheduler.clone())
      .subscribe_event(move |e| c_events.lock().unwrap().push(e));

    source.next(1);
    source.next(2);
    source.next(3);
    assert_eq!(*events.lock().unwrap(), vec![Event::Next(vec![1, 2])]);

    scheduler.advance_by(Duration::from_millis(100));
    assert_eq!(events.lock().unwrap().last(), Some(&Event::Next(vec![3])));

    scheduler.advance_by(Duration::from_millis(100));
    assert_eq!(events.lock().unwrap().last(), Some(&Event::Next(vec![])));

    source.next(4);
    source.clone().complete();
    assert_eq!(
      *events.lock().unwrap(),
      vec![
        Event::Next(vec![1, 2]),
        Event::Next(vec![3]),
        Event::Next(vec![]),
        Event::Next(vec![4]),
        Event::Completed
      ]
    );
  }

  #[test]
  fn count_flush_restarts_the_timer() {
    let scheduler = TestScheduler::default();
    let mut source = Subject::<i32, ()>::default();
    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    source
      .clone()
      .buffer(Duration::from_millis(100), 2, scheduler.clone())
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    scheduler.advance_by(Duration::from_millis(60));
    source.next(1);
    source.next(2);
    source.next(3);
    scheduler.advance_by(Duration::from_millis(60));
    assert_eq!(*out.lock().unwrap(), vec![vec![1, 2]]);
    scheduler.advance_by(Duration::from_millis(40));
    assert_eq!(*out.lock().unwrap(), vec![vec![1, 2], vec![3]]);
  }

  #[test]
  fn error_drops_the_batch() {
    let scheduler = TestScheduler::default();
    let mut source = Subject::<i32, &'static str>::default();
    let events = Arc::new(Mutex::new(vec![]));
    let c_events = events.clone();
    source
      .clone()
      .buffer(Duration::from_millis(100), 10, scheduler.clone())
      .subscribe_event(move |e| c_events.lock().unwrap().push(e));

    source.next(1);
    source.clone().error("boom");
    scheduler.advance_by(Duration::from_millis(500));

    assert_eq!(*events.lock().unwrap(), vec![Event::Error("boom")]);
  }

  #[test]
  fn unsubscribe_stops_the_timer() {
    let scheduler = TestScheduler::default();
    let source = Subject::<i32, ()>::default();
    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    let subscription = source
      .clone()
      .buffer(Duration::from_millis(100), 10, scheduler.clone())
      .subscribe(move |v| c_out.lock().unwrap().push(v));

    subscription.unsubscribe();
    scheduler.advance_by(Duration::from_millis(500));

    assert!(out.lock().unwrap().is_empty());
    assert_eq!(source.observer_count(), 0);
    assert_eq!(scheduler.pending_count(), 0);
  }

  #[test]
  fn synchronous_source_flushes_on_complete() {
    let scheduler = TestScheduler::default();
    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    observable::of([1, 2, 3, 4, 5])
      .buffer(Duration::from_secs(1), 2, scheduler)
      .subscribe(move |v| c_out.lock().unwrap().push(v));
    assert_eq!(*out.lock().unwrap(), vec![vec![1, 2], vec![3, 4], vec![5]]);
  }
}
