//! Amb operator implementation

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  rc::MutArc,
  subscription::{SerialSubscription, Subscription, TupleSubscription},
};

/// Mirrors whichever source notifies first, with a value or a terminal
/// event; the other one is unsubscribed on the spot.
#[derive(Clone)]
pub struct Amb<A, B> {
  pub source_a: A,
  pub source_b: B,
}

impl<A: ObservableType, B> ObservableType for Amb<A, B> {
  type Item = A::Item;
  type Err = A::Err;
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Side {
  A,
  B,
}

struct AmbState<O> {
  observer: Option<O>,
  winner: Option<Side>,
}

pub struct AmbObserver<O> {
  state: MutArc<AmbState<O>>,
  side: Side,
  rival: SerialSubscription,
}

impl<O> AmbObserver<O> {
  /// Returns false if the other side already won, otherwise claims the win
  /// and releases the other side when this call is the one that claims it.
  fn claim(&self) -> bool {
    let won_now = {
      let mut state = self.state.rc_deref_mut();
      match state.winner {
        Some(side) if side != self.side => return false,
        Some(_) => false,
        None => {
          state.winner = Some(self.side);
          true
        }
      }
    };
    if won_now {
      self.rival.clone().unsubscribe();
    }
    true
  }
}

impl<O, Item, Err> Observer<Item, Err> for AmbObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if !self.claim() {
      return;
    }
    let mut state = self.state.rc_deref_mut();
    if let Some(observer) = state.observer.as_mut() {
      observer.next(value);
    }
  }

  fn error(self, err: Err) {
    if !self.claim() {
      return;
    }
    let observer = self.state.rc_deref_mut().observer.take();
    if let Some(observer) = observer {
      observer.error(err);
    }
  }

  fn complete(self) {
    if !self.claim() {
      return;
    }
    let observer = self.state.rc_deref_mut().observer.take();
    if let Some(observer) = observer {
      observer.complete();
    }
  }

  fn is_closed(&self) -> bool {
    self.state.try_rc_deref_mut().is_some_and(|state| {
      state.winner.is_some_and(|side| side != self.side)
        || state.observer.as_ref().map_or(true, Observer::<Item, Err>::is_closed)
    })
  }
}

impl<A, B, O> CoreObservable<O> for Amb<A, B>
where
  A: CoreObservable<AmbObserver<O>>,
  B: CoreObservable<AmbObserver<O>>,
  A::Unsub: Send + 'static,
  B::Unsub: Send + 'static,
{
  type Unsub = TupleSubscription<SerialSubscription, SerialSubscription>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let Amb { source_a, source_b } = self;
    let state = MutArc::own(AmbState { observer: Some(observer), winner: None });
    let slot_a = SerialSubscription::default();
    let slot_b = SerialSubscription::default();

    let unsub = source_a.actual_subscribe(AmbObserver { state: state.clone(), side: Side::A, rival: slot_b.clone() });
    slot_a.replace(unsub);
    if !slot_b.is_closed() {
      let unsub = source_b.actual_subscribe(AmbObserver { state, side: Side::B, rival: slot_a.clone() });
      slot_b.replace(unsub);
    }
    TupleSubscription::new(slot_a, slot_b)
  }
}
