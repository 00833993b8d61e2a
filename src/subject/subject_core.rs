use std::{
  collections::VecDeque,
  thread::{self, ThreadId},
};

use super::{
  subject_subscription::SubjectSubscription,
  subscribers::{ObserverSlot, Subscribers},
};
use crate::{
  error::RxError,
  observer::{report_unhandled_error, BoxObserver, Observer},
  rc::MutArc,
};

/// How a terminated subject ended.
#[derive(Clone)]
pub(crate) enum Terminal<Err> {
  Completed,
  Error(Err),
}

impl<Err> Terminal<Err> {
  fn deliver<Item, O: Observer<Item, Err>>(self, observer: O) {
    match self {
      Terminal::Completed => observer.complete(),
      Terminal::Error(err) => observer.error(err),
    }
  }
}

/// What a subject hands to late subscribers.
pub(crate) enum Replay<Item> {
  /// Nothing: publish semantics.
  Nothing,
  /// The current value, replayed while the subject is live.
  Latest(Item),
  /// The most recent values, `None` capacity meaning unbounded. Replayed even
  /// after termination, followed by the terminal event.
  Buffer { capacity: Option<usize>, values: VecDeque<Item> },
}

impl<Item: Clone> Replay<Item> {
  fn record(&mut self, value: &Item) {
    match self {
      Replay::Nothing => {}
      Replay::Latest(latest) => *latest = value.clone(),
      Replay::Buffer { capacity, values } => {
        if *capacity == Some(0) {
          return;
        }
        if Some(values.len()) == *capacity {
          values.pop_front();
        }
        values.push_back(value.clone());
      }
    }
  }

  fn replayed(&self, terminated: bool) -> Vec<Item> {
    match self {
      Replay::Nothing => vec![],
      Replay::Latest(_) if terminated => vec![],
      Replay::Latest(latest) => vec![latest.clone()],
      Replay::Buffer { values, .. } => values.iter().cloned().collect(),
    }
  }
}

impl<Item> Replay<Item> {
  fn clear(&mut self) {
    if let Replay::Buffer { values, .. } = self {
      values.clear();
    }
  }
}

pub(crate) struct CoreState<Item, Err> {
  pub(crate) subscribers: Subscribers<Item, Err>,
  terminal: Option<Terminal<Err>>,
  replay: Replay<Item>,
  disposed: bool,
}

/// Shared machinery of every subject flavor.
///
/// Emissions are serialized by the `emitting` lock: one broadcast finishes on
/// every observer before the next begins, whichever thread sends it. The
/// state lock is never held while an observer runs, so observers may
/// subscribe to or unsubscribe from the subject they are being fed by.
/// Emitting into the subject from inside one of its own observers is a
/// contract violation and panics.
pub(crate) struct SubjectCore<Item, Err> {
  state: MutArc<CoreState<Item, Err>>,
  emitting: MutArc<()>,
  emitter: MutArc<Option<ThreadId>>,
}

impl<Item, Err> Clone for SubjectCore<Item, Err> {
  fn clone(&self) -> Self {
    Self { state: self.state.clone(), emitting: self.emitting.clone(), emitter: self.emitter.clone() }
  }
}

struct EmitGuard<'a> {
  _lock: std::sync::MutexGuard<'a, ()>,
  emitter: &'a MutArc<Option<ThreadId>>,
}

impl Drop for EmitGuard<'_> {
  fn drop(&mut self) { *self.emitter.rc_deref_mut() = None; }
}

impl<Item, Err> SubjectCore<Item, Err> {
  pub(crate) fn new(replay: Replay<Item>) -> Self {
    Self {
      state: MutArc::own(CoreState {
        subscribers: Subscribers::default(),
        terminal: None,
        replay,
        disposed: false,
      }),
      emitting: MutArc::own(()),
      emitter: MutArc::own(None),
    }
  }

  fn emitting_on_this_thread(&self) -> bool { *self.emitter.rc_deref() == Some(thread::current().id()) }

  fn begin_emit(&self) -> EmitGuard<'_> {
    if self.emitting_on_this_thread() {
      panic!("re-entrant emission: a subject was fed from inside one of its own observers");
    }
    self.enter()
  }

  fn enter(&self) -> EmitGuard<'_> {
    let lock = self.emitting.rc_deref_mut();
    *self.emitter.rc_deref_mut() = Some(thread::current().id());
    EmitGuard { _lock: lock, emitter: &self.emitter }
  }

  pub(crate) fn observer_count(&self) -> usize { self.state.rc_deref().subscribers.active_count() }

  pub(crate) fn is_stopped(&self) -> bool {
    let state = self.state.rc_deref();
    state.disposed || state.terminal.is_some()
  }

  pub(crate) fn is_disposed(&self) -> bool { self.state.rc_deref().disposed }

  /// Drop every observer without notifying it and release the replay
  /// buffer. Later subscribers only receive the terminal event, if the
  /// subject had one; otherwise they get nothing and `RxError::Disposed` is
  /// reported as unhandled.
  pub(crate) fn dispose(&self) {
    let slots = {
      let mut state = self.state.rc_deref_mut();
      if state.disposed {
        return;
      }
      state.disposed = true;
      state.replay.clear();
      state.subscribers.take_all()
    };
    tracing::trace!(observers = slots.len(), "subject disposed");
    for slot in slots {
      slot.close();
    }
  }
}

impl<Item: Clone, Err: Clone> SubjectCore<Item, Err> {
  pub(crate) fn next(&self, value: Item) {
    let _guard = self.begin_emit();
    let slots = {
      let mut state = self.state.rc_deref_mut();
      if state.disposed {
        drop(state);
        tracing::warn!("value sent to a disposed subject was dropped");
        return;
      }
      if state.terminal.is_some() {
        return;
      }
      state.replay.record(&value);
      state.subscribers.snapshot()
    };

    if let Some((last, rest)) = slots.split_last() {
      for slot in rest {
        slot.next(value.clone());
      }
      last.next(value);
    }
    self.state.rc_deref_mut().subscribers.prune_closed();
  }

  pub(crate) fn error(&self, err: Err) { self.terminate(Terminal::Error(err)); }

  pub(crate) fn complete(&self) { self.terminate(Terminal::Completed); }

  fn terminate(&self, terminal: Terminal<Err>) {
    let _guard = self.begin_emit();
    let slots = {
      let mut state = self.state.rc_deref_mut();
      if state.disposed || state.terminal.is_some() {
        return;
      }
      state.terminal = Some(terminal.clone());
      state.subscribers.take_all()
    };
    tracing::trace!(observers = slots.len(), "subject terminated");
    for slot in slots {
      match terminal.clone() {
        Terminal::Completed => slot.complete(),
        Terminal::Error(err) => slot.error(err),
      }
    }
  }

  /// Register `observer`, after serving it whatever the subject replays.
  pub(crate) fn subscribe(&self, mut observer: BoxObserver<'static, Item, Err>) -> SubjectSubscription<Item, Err> {
    // Subscribing from inside a broadcast of this subject must not wait for
    // that broadcast to finish.
    let _guard = if self.emitting_on_this_thread() { None } else { Some(self.enter()) };

    let mut state = self.state.rc_deref_mut();
    if state.disposed {
      let terminal = state.terminal.clone();
      drop(state);
      match terminal {
        Some(terminal) => terminal.deliver::<Item, _>(observer),
        None => report_unhandled_error(&RxError::Disposed),
      }
      return SubjectSubscription::finished();
    }

    let replayed = state.replay.replayed(state.terminal.is_some());
    if let Some(terminal) = state.terminal.clone() {
      drop(state);
      for value in replayed {
        observer.next(value);
      }
      terminal.deliver::<Item, _>(observer);
      return SubjectSubscription::finished();
    }

    let slot = ObserverSlot::new(observer);
    let id = state.subscribers.add(slot.clone());
    drop(state);

    for value in replayed {
      slot.next(value);
    }
    SubjectSubscription::new(self.state.clone(), id, slot)
  }

  /// Current value of a `Latest` replay.
  pub(crate) fn latest(&self) -> Result<Item, RxError> {
    let state = self.state.rc_deref();
    if state.disposed {
      return Err(RxError::Disposed);
    }
    if let Some(Terminal::Error(_)) = state.terminal {
      return Err(RxError::Terminated);
    }
    match &state.replay {
      Replay::Latest(latest) => Ok(latest.clone()),
      _ => Err(RxError::Disposed),
    }
  }
}
