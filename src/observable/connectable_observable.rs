use crate::{
  observable::{CoreObservable, ObservableType},
  rc::MutArc,
  subscription::{SerialSubscription, Subscription},
};

/// Handle of the single upstream subscription of a connectable observable.
/// Unsubscribing it disconnects the source; subscribers stay registered on
/// the subject.
pub type Connection = SerialSubscription;

/// Multicasts one subscription to `source` through `subject`.
///
/// Subscribing only registers the observer on the subject; the source is
/// subscribed when [`connect`](ConnectableObservable::connect) is first
/// called.
///
/// ```
/// use std::sync::{Arc, Mutex};
///
/// use rxstream::prelude::*;
///
/// let connectable = observable::of([1, 2, 3]).publish();
/// let seen = Arc::new(Mutex::new(vec![]));
/// let c_seen = seen.clone();
/// connectable.clone().subscribe(move |v| c_seen.lock().unwrap().push(v));
/// assert!(seen.lock().unwrap().is_empty());
///
/// connectable.connect();
/// assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
/// ```
pub struct ConnectableObservable<S, Subj> {
  source: MutArc<Option<S>>,
  subject: Subj,
  connection: Connection,
}

impl<S, Subj: Clone> Clone for ConnectableObservable<S, Subj> {
  fn clone(&self) -> Self {
    Self { source: self.source.clone(), subject: self.subject.clone(), connection: self.connection.clone() }
  }
}

impl<S, Subj> ConnectableObservable<S, Subj> {
  pub fn new(source: S, subject: Subj) -> Self {
    Self { source: MutArc::own(Some(source)), subject, connection: Connection::default() }
  }

  /// The subject observers are registered on.
  pub fn subject(&self) -> &Subj { &self.subject }

  /// Subscribes the subject to the source, once.
  ///
  /// Later calls return a handle to the same connection, even after it was
  /// unsubscribed.
  pub fn connect(&self) -> Connection
  where
    S: CoreObservable<Subj>,
    S::Unsub: Send + 'static,
    Subj: Clone,
  {
    let source = self.source.rc_deref_mut().take();
    if let Some(source) = source {
      tracing::trace!("connecting multicast source");
      let upstream = source.actual_subscribe(self.subject.clone());
      self.connection.replace(upstream);
    }
    self.connection.clone()
  }

  pub fn is_connected(&self) -> bool { self.source.rc_deref().is_none() && !self.connection.is_closed() }
}

impl<S, Subj: ObservableType> ObservableType for ConnectableObservable<S, Subj> {
  type Item = Subj::Item;
  type Err = Subj::Err;
}

impl<S, Subj, O> CoreObservable<O> for ConnectableObservable<S, Subj>
where
  Subj: CoreObservable<O> + Clone,
{
  type Unsub = Subj::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub { self.subject.actual_subscribe(observer) }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::prelude::*;

  #[test]
  fn nothing_flows_before_connect() {
    let mut source = Subject::<i32, ()>::default();
    let connectable = source.clone().publish();
    let seen = Arc::new(Mutex::new(vec![]));
    let c_seen = seen.clone();
    connectable.clone().subscribe(move |v| c_seen.lock().unwrap().push(v));

    source.next(1);
    assert!(seen.lock().unwrap().is_empty());
    assert!(!connectable.is_connected());

    connectable.connect();
    source.next(2);
    assert_eq!(*seen.lock().unwrap(), vec![2]);
  }

  #[test]
  fn connect_is_idempotent() {
    let subscriptions = Arc::new(Mutex::new(0));
    let c_subscriptions = subscriptions.clone();
    let connectable = observable::defer(move || {
      *c_subscriptions.lock().unwrap() += 1;
      observable::never::<i32, ()>()
    })
    .publish();

    let first = connectable.connect();
    let second = connectable.connect();
    assert_eq!(*subscriptions.lock().unwrap(), 1);
    assert!(connectable.is_connected());

    first.unsubscribe();
    assert!(second.is_closed());
    assert!(!connectable.is_connected());
  }

  #[test]
  fn disconnect_stops_the_source() {
    let mut source = Subject::<i32, ()>::default();
    let connectable = source.clone().publish();
    let seen = Arc::new(Mutex::new(vec![]));
    let c_seen = seen.clone();
    connectable.clone().subscribe(move |v| c_seen.lock().unwrap().push(v));

    let connection = connectable.connect();
    source.next(1);
    connection.unsubscribe();
    source.next(2);

    assert_eq!(*seen.lock().unwrap(), vec![1]);
    assert_eq!(source.observer_count(), 0);
  }

  #[test]
  fn replay_serves_late_subscribers() {
    let connectable = observable::of([1, 2, 3]).replay(2);
    connectable.connect();

    let seen = Arc::new(Mutex::new(vec![]));
    let c_seen = seen.clone();
    connectable.subscribe_event(move |e| c_seen.lock().unwrap().push(e));
    assert_eq!(*seen.lock().unwrap(), vec![Event::Next(2), Event::Next(3), Event::Completed]);
  }
}
