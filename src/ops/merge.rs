//! Merge operator implementation

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  rc::MutArc,
  subscription::{MultiSubscription, SerialSubscription, Subscription},
};

/// Subscribes both sources at once and forwards values as they arrive.
///
/// Completes when both sources completed. The first error from either side
/// is forwarded at once and the other side is unsubscribed.
#[derive(Clone)]
pub struct Merge<A, B> {
  pub source_a: A,
  pub source_b: B,
}

impl<A: ObservableType, B> ObservableType for Merge<A, B> {
  type Item = A::Item;
  type Err = A::Err;
}

struct MergeState<O> {
  observer: Option<O>,
  completed: usize,
}

pub struct MergeObserver<O> {
  state: MutArc<MergeState<O>>,
  subscriptions: MultiSubscription,
  // this side's own handle, released when it finishes
  upstream: SerialSubscription,
}

impl<O, Item, Err> Observer<Item, Err> for MergeObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    let mut state = self.state.rc_deref_mut();
    if let Some(observer) = state.observer.as_mut() {
      observer.next(value);
    }
  }

  fn error(self, err: Err) {
    let observer = self.state.rc_deref_mut().observer.take();
    if let Some(observer) = observer {
      self.subscriptions.unsubscribe();
      observer.error(err);
    }
  }

  fn complete(self) {
    self.upstream.unsubscribe();
    let observer = {
      let mut state = self.state.rc_deref_mut();
      state.completed += 1;
      if state.completed == 2 { state.observer.take() } else { None }
    };
    if let Some(observer) = observer {
      observer.complete();
    }
  }

  fn is_closed(&self) -> bool {
    self
      .state
      .try_rc_deref_mut()
      .is_some_and(|state| state.observer.as_ref().map_or(true, Observer::<Item, Err>::is_closed))
  }
}

impl<A, B, O> CoreObservable<O> for Merge<A, B>
where
  A: CoreObservable<MergeObserver<O>>,
  B: CoreObservable<MergeObserver<O>>,
  A::Unsub: Send + 'static,
  B::Unsub: Send + 'static,
{
  type Unsub = MultiSubscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let Merge { source_a, source_b } = self;
    let subscriptions = MultiSubscription::default();
    let state = MutArc::own(MergeState { observer: Some(observer), completed: 0 });
    let side = |upstream: &SerialSubscription| {
      subscriptions.append(upstream.clone());
      MergeObserver { state: state.clone(), subscriptions: subscriptions.clone(), upstream: upstream.clone() }
    };

    let slot_a = SerialSubscription::default();
    let slot_b = SerialSubscription::default();
    let observer_a = side(&slot_a);
    let observer_b = side(&slot_b);
    slot_a.replace(source_a.actual_subscribe(observer_a));
    if !subscriptions.is_closed() {
      slot_b.replace(source_b.actual_subscribe(observer_b));
    }
    subscriptions
  }
}
