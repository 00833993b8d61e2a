//! Delay operator implementation

use std::collections::VecDeque;

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::{Event, Observer},
  rc::MutArc,
  scheduler::{Duration, Scheduler},
  subscription::{MultiSubscription, Subscription, TupleSubscription},
};

/// Re-emits every notification of the source, errors included, `delay`
/// later on `scheduler`. Relative order is kept even if the scheduler runs
/// tasks out of order, because each task delivers the oldest pending event.
#[derive(Debug, Clone)]
pub struct Delay<S, Sch> {
  pub source: S,
  pub delay: Duration,
  pub scheduler: Sch,
}

impl<S: ObservableType, Sch> ObservableType for Delay<S, Sch> {
  type Item = S::Item;
  type Err = S::Err;
}

struct DelayState<O, Item, Err> {
  observer: Option<O>,
  pending: VecDeque<Event<Item, Err>>,
}

pub struct DelayObserver<O, Item, Err, Sch> {
  state: MutArc<DelayState<O, Item, Err>>,
  delay: Duration,
  scheduler: Sch,
  tasks: MultiSubscription,
}

impl<O, Item, Err, Sch> DelayObserver<O, Item, Err, Sch>
where
  O: Observer<Item, Err> + Send + 'static,
  Item: Send + 'static,
  Err: Send + 'static,
  Sch: Scheduler,
{
  fn push(&self, event: Event<Item, Err>) {
    self.state.rc_deref_mut().pending.push_back(event);
    let state = self.state.clone();
    let handle = self.scheduler.schedule(
      move || {
        let mut guard = state.rc_deref_mut();
        match guard.pending.pop_front() {
          Some(Event::Next(value)) => {
            if let Some(observer) = guard.observer.as_mut() {
              observer.next(value);
            }
          }
          Some(Event::Error(err)) => {
            let observer = guard.observer.take();
            drop(guard);
            if let Some(observer) = observer {
              observer.error(err);
            }
          }
          Some(Event::Completed) => {
            let observer = guard.observer.take();
            drop(guard);
            if let Some(observer) = observer {
              observer.complete();
            }
          }
          None => {}
        }
      },
      Some(self.delay),
    );
    self.tasks.append(handle);
  }
}

impl<O, Item, Err, Sch> Observer<Item, Err> for DelayObserver<O, Item, Err, Sch>
where
  O: Observer<Item, Err> + Send + 'static,
  Item: Send + 'static,
  Err: Send + 'static,
  Sch: Scheduler,
{
  fn next(&mut self, value: Item) { self.push(Event::Next(value)) }

  fn error(self, err: Err) { self.push(Event::Error(err)) }

  fn complete(self) { self.push(Event::Completed) }

  fn is_closed(&self) -> bool {
    self.tasks.is_closed()
      || self
        .state
        .try_rc_deref_mut()
        .is_some_and(|state| state.observer.as_ref().map_or(true, Observer::<Item, Err>::is_closed))
  }
}

impl<S, Sch, O> CoreObservable<O> for Delay<S, Sch>
where
  S: CoreObservable<DelayObserver<O, <S as ObservableType>::Item, <S as ObservableType>::Err, Sch>>,
  S::Item: Send + 'static,
  S::Err: Send + 'static,
  O: Observer<S::Item, S::Err> + Send + 'static,
  Sch: Scheduler,
{
  type Unsub = TupleSubscription<S::Unsub, MultiSubscription>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let Delay { source, delay, scheduler } = self;
    let tasks = MultiSubscription::default();
    let state = MutArc::own(DelayState { observer: Some(observer), pending: VecDeque::new() });
    let unsub = source.actual_subscribe(DelayObserver { state, delay, scheduler, tasks: tasks.clone() });
    TupleSubscription::new(unsub, tasks)
  }
}
