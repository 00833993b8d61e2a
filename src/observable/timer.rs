use std::convert::Infallible;

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  scheduler::{Duration, Scheduler, TaskHandle},
};

/// Emits `item` once after `delay`, then completes.
pub fn timer<Item, Sch: Scheduler>(item: Item, delay: Duration, scheduler: Sch) -> Timer<Item, Sch> {
  Timer { item, delay, scheduler }
}

#[derive(Clone)]
pub struct Timer<Item, Sch> {
  item: Item,
  delay: Duration,
  scheduler: Sch,
}

impl<Item, Sch> ObservableType for Timer<Item, Sch> {
  type Item = Item;
  type Err = Infallible;
}

impl<Item, Sch, O> CoreObservable<O> for Timer<Item, Sch>
where
  Item: Send + 'static,
  Sch: Scheduler,
  O: Observer<Item, Infallible> + Send + 'static,
{
  type Unsub = TaskHandle;

  fn actual_subscribe(self, mut observer: O) -> Self::Unsub {
    let Timer { item, delay, scheduler } = self;
    scheduler.schedule(
      move || {
        observer.next(item);
        observer.complete();
      },
      Some(delay),
    )
  }
}
