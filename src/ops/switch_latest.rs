//! SwitchLatest operator implementation

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  rc::MutArc,
  subscription::{SerialSubscription, Subscription, TupleSubscription},
};

/// Mirrors the most recent inner observable.
///
/// Each new inner observable releases the previous one before it is
/// subscribed, and anything a released inner still delivers is dropped.
/// Completes once the outer stream completed and the current inner (if any)
/// completed too. An error from the outer or the current inner ends the
/// stream.
#[derive(Clone)]
pub struct SwitchLatest<S> {
  pub source: S,
}

impl<S> ObservableType for SwitchLatest<S>
where
  S: ObservableType,
  S::Item: ObservableType<Err = S::Err>,
{
  type Item = <S::Item as ObservableType>::Item;
  type Err = S::Err;
}

struct SwitchState<O> {
  observer: Option<O>,
  generation: u64,
  inner_active: bool,
  outer_completed: bool,
}

/// Observer of the outer stream.
pub struct SwitchLatestObserver<O> {
  state: MutArc<SwitchState<O>>,
  outer: SerialSubscription,
  inner: SerialSubscription,
}

/// Observer of one inner stream, tagged with the generation it belongs to.
pub struct SwitchLatestInnerObserver<O> {
  state: MutArc<SwitchState<O>>,
  generation: u64,
  outer: SerialSubscription,
  inner: SerialSubscription,
}

impl<O, In, Err> Observer<In, Err> for SwitchLatestObserver<O>
where
  In: CoreObservable<SwitchLatestInnerObserver<O>>,
  In::Unsub: Send + 'static,
  O: Observer<In::Item, Err>,
{
  fn next(&mut self, inner: In) {
    let generation = {
      let mut state = self.state.rc_deref_mut();
      if state.observer.is_none() {
        return;
      }
      state.generation += 1;
      state.inner_active = true;
      state.generation
    };
    self.inner.release_current();
    let unsub = inner.actual_subscribe(SwitchLatestInnerObserver {
      state: self.state.clone(),
      generation,
      outer: self.outer.clone(),
      inner: self.inner.clone(),
    });
    if self.state.rc_deref().generation == generation {
      self.inner.replace(unsub);
    } else {
      unsub.unsubscribe();
    }
  }

  fn error(self, err: Err) {
    let observer = self.state.rc_deref_mut().observer.take();
    if let Some(observer) = observer {
      self.inner.unsubscribe();
      observer.error(err);
    }
  }

  fn complete(self) {
    let observer = {
      let mut state = self.state.rc_deref_mut();
      state.outer_completed = true;
      if state.inner_active { None } else { state.observer.take() }
    };
    if let Some(observer) = observer {
      observer.complete();
    }
  }

  fn is_closed(&self) -> bool {
    self
      .state
      .try_rc_deref_mut()
      .is_some_and(|state| state.observer.as_ref().map_or(true, Observer::<In::Item, Err>::is_closed))
  }
}

impl<O, Item, Err> Observer<Item, Err> for SwitchLatestInnerObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    let mut state = self.state.rc_deref_mut();
    if state.generation != self.generation {
      return;
    }
    if let Some(observer) = state.observer.as_mut() {
      observer.next(value);
    }
  }

  fn error(self, err: Err) {
    let observer = {
      let mut state = self.state.rc_deref_mut();
      if state.generation != self.generation {
        return;
      }
      state.observer.take()
    };
    if let Some(observer) = observer {
      self.outer.unsubscribe();
      self.inner.unsubscribe();
      observer.error(err);
    }
  }

  fn complete(self) {
    let observer = {
      let mut state = self.state.rc_deref_mut();
      if state.generation != self.generation {
        return;
      }
      state.inner_active = false;
      if state.outer_completed { state.observer.take() } else { None }
    };
    if let Some(observer) = observer {
      observer.complete();
    }
  }

  fn is_closed(&self) -> bool {
    self.state.try_rc_deref_mut().is_some_and(|state| {
      state.generation != self.generation || state.observer.as_ref().map_or(true, Observer::<Item, Err>::is_closed)
    })
  }
}

impl<S, O> CoreObservable<O> for SwitchLatest<S>
where
  S: CoreObservable<SwitchLatestObserver<O>>,
  S::Item: ObservableType<Err = S::Err>,
  S::Unsub: Send + 'static,
{
  type Unsub = TupleSubscription<SerialSubscription, SerialSubscription>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let outer = SerialSubscription::default();
    let inner = SerialSubscription::default();
    let state = MutArc::own(SwitchState {
      observer: Some(observer),
      generation: 0,
      inner_active: false,
      outer_completed: false,
    });
    let unsub = self
      .source
      .actual_subscribe(SwitchLatestObserver { state, outer: outer.clone(), inner: inner.clone() });
    outer.replace(unsub);
    TupleSubscription::new(outer, inner)
  }
}
