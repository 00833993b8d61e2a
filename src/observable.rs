//! Observable traits, constructors and the operator algebra.
//!
//! An observable is a value describing how to produce a sequence. It is split
//! in three traits:
//!
//! - [`ObservableType`] names the `Item` and `Err` types it produces.
//! - [`CoreObservable`] attaches one observer and starts production.
//! - [`Observable`] is implemented for every `ObservableType` and provides the
//!   operators and the `subscribe` family.
//!
//! Every operator is a plain struct wrapping its source(s), so a chain is an
//! explicit composition of values and subscribing walks it from the end back
//! to the roots.

use std::{convert::Infallible, fmt::Debug};

use crate::{
  observer::{Event, Observer, ObserverAll, ObserverComp, ObserverErr, ObserverEvent, ObserverNext},
  ops::{
    amb::Amb,
    buffer::Buffer,
    combine_latest::{CombineLatest, CombineLatestAll},
    concat::Concat,
    delay::Delay,
    delay_subscription::DelaySubscription,
    distinct_until_changed::DistinctUntilChanged,
    element_at::ElementAt,
    filter::Filter,
    ignore_elements::IgnoreElements,
    lifecycle::{Finalize, OnComplete, OnError},
    map::{Map, MapWithIndex},
    map_err::MapErr,
    merge::Merge,
    merge_all::{MergeAll, Sources},
    reduce::Reduce,
    scan::Scan,
    skip::Skip,
    skip_until::SkipUntil,
    skip_while::SkipWhile,
    start_with::StartWith,
    switch_latest::SwitchLatest,
    take::Take,
    to_array::ToArray,
    try_map::TryMap,
    with_latest_from::WithLatestFrom,
    zip::{Zip, ZipAll},
  },
  scheduler::{Duration, Scheduler},
  subject::{ReplaySubject, Subject},
  subscriber::Subscriber,
  subscription::{SourceWithHandle, Subscription},
};

mod connectable_observable;
mod create;
mod defer;
mod from_iter;
mod interval;
mod timer;
mod trivial;

pub use connectable_observable::*;
pub use create::*;
pub use defer::*;
pub use from_iter::*;
pub use interval::*;
pub use timer::*;
pub use trivial::*;

// ============================================================================
// Core traits
// ============================================================================

/// The types an observable produces.
pub trait ObservableType {
  type Item;
  type Err;
}

/// Attach an observer and start production.
///
/// Operators implement this by wrapping the observer and subscribing their
/// source(s); roots implement it by emitting.
pub trait CoreObservable<O>: ObservableType {
  type Unsub: Subscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub;
}

/// The handle returned by the `subscribe` family: the downstream subscriber
/// plus the upstream chain, `None` once released because the stream ended
/// while subscribing.
pub type SubscriptionOf<S, O> =
  SourceWithHandle<Subscriber<O>, Option<<S as CoreObservable<Subscriber<O>>>::Unsub>>;

type Tuple<A, B> = fn(A, B) -> (A, B);

// ============================================================================
// Operator algebra
// ============================================================================

/// Operators and subscription entry points, available on every observable.
pub trait Observable: ObservableType + Sized {
  // ---------------------------------------------------------------------------
  // Transforming
  // ---------------------------------------------------------------------------

  /// Creates a new stream which calls a closure on each element and uses
  /// its return as the value.
  fn map<B, F>(self, func: F) -> Map<Self, F>
  where
    F: FnMut(Self::Item) -> B,
  {
    Map { source: self, func }
  }

  /// Like `map`, but a failing closure terminates the stream with its error.
  fn try_map<B, F>(self, func: F) -> TryMap<Self, F>
  where
    F: FnMut(Self::Item) -> Result<B, Self::Err>,
  {
    TryMap { source: self, func }
  }

  /// `map` that also receives the zero-based index of the element.
  fn map_with_index<B, F>(self, func: F) -> MapWithIndex<Self, F>
  where
    F: FnMut(Self::Item, usize) -> B,
  {
    MapWithIndex { source: self, func }
  }

  fn map_err<E, F>(self, func: F) -> MapErr<Self, F>
  where
    F: FnOnce(Self::Err) -> E,
  {
    MapErr { source: self, func }
  }

  /// Emits `acc = func(acc, item)` for every item, starting from `seed`.
  fn scan<Acc, F>(self, seed: Acc, func: F) -> Scan<Self, F, Acc>
  where
    F: FnMut(Acc, Self::Item) -> Acc,
    Acc: Clone,
  {
    Scan { source: self, func, seed }
  }

  /// Like `scan`, but only emits the final accumulator, right before
  /// completing.
  fn reduce<Acc, F>(self, seed: Acc, func: F) -> Reduce<Self, F, Acc>
  where
    F: FnMut(Acc, Self::Item) -> Acc,
  {
    Reduce { source: self, func, seed }
  }

  /// Collects every item and emits them as one `Vec` on completion.
  fn to_array(self) -> ToArray<Self> { ToArray { source: self } }

  /// Maps each item to an observable and merges all of them.
  fn flat_map<In, F>(self, func: F) -> MergeAll<Map<Self, F>>
  where
    F: FnMut(Self::Item) -> In,
  {
    MergeAll { source: self.map(func), concurrent: usize::MAX }
  }

  // ---------------------------------------------------------------------------
  // Filtering
  // ---------------------------------------------------------------------------

  fn filter<F>(self, filter: F) -> Filter<Self, F>
  where
    F: FnMut(&Self::Item) -> bool,
  {
    Filter { source: self, filter }
  }

  fn skip(self, count: usize) -> Skip<Self> { Skip { source: self, count } }

  fn skip_while<F>(self, predicate: F) -> SkipWhile<Self, F>
  where
    F: FnMut(&Self::Item) -> bool,
  {
    SkipWhile { source: self, predicate }
  }

  /// Drops items until `trigger` emits its first value.
  fn skip_until<T: ObservableType>(self, trigger: T) -> SkipUntil<Self, T> {
    SkipUntil { source: self, trigger }
  }

  fn take(self, count: usize) -> Take<Self> { Take { source: self, count } }

  /// Emits only the item at zero-based `index`, then completes.
  fn element_at(self, index: usize) -> ElementAt<Self> { ElementAt { source: self, index } }

  fn distinct_until_changed(self) -> DistinctUntilChanged<Self, fn(&Self::Item, &Self::Item) -> bool>
  where
    Self::Item: PartialEq + Clone,
  {
    DistinctUntilChanged { source: self, eq: <Self::Item as PartialEq>::eq }
  }

  fn distinct_until_changed_by<F>(self, eq: F) -> DistinctUntilChanged<Self, F>
  where
    F: FnMut(&Self::Item, &Self::Item) -> bool,
    Self::Item: Clone,
  {
    DistinctUntilChanged { source: self, eq }
  }

  fn ignore_elements(self) -> IgnoreElements<Self> { IgnoreElements { source: self } }

  // ---------------------------------------------------------------------------
  // Combining
  // ---------------------------------------------------------------------------

  /// Emits `values` first, then the items of `self`.
  fn start_with<I>(self, values: I) -> StartWith<Self, Vec<Self::Item>>
  where
    I: IntoIterator<Item = Self::Item>,
  {
    StartWith { source: self, values: values.into_iter().collect() }
  }

  /// Subscribes to `other` once `self` completes.
  fn concat<B>(self, other: B) -> Concat<Self, B>
  where
    B: ObservableType<Item = Self::Item, Err = Self::Err>,
  {
    Concat { first: self, second: other }
  }

  fn merge<B>(self, other: B) -> Merge<Self, B>
  where
    B: ObservableType<Item = Self::Item, Err = Self::Err>,
  {
    Merge { source_a: self, source_b: other }
  }

  /// Flattens an observable of observables, keeping at most `concurrent`
  /// inner subscriptions alive; the rest wait in arrival order.
  fn merge_all(self, concurrent: usize) -> MergeAll<Self>
  where
    Self::Item: ObservableType,
  {
    assert!(concurrent > 0, "merge_all needs a concurrency of at least one");
    MergeAll { source: self, concurrent }
  }

  /// Flattens an observable of observables one after another.
  fn concat_all(self) -> MergeAll<Self>
  where
    Self::Item: ObservableType,
  {
    self.merge_all(1)
  }

  /// Mirrors the most recent inner observable, dropping the previous one.
  fn switch_latest(self) -> SwitchLatest<Self>
  where
    Self::Item: ObservableType,
  {
    SwitchLatest { source: self }
  }

  fn combine_latest<B, F, R>(self, other: B, selector: F) -> CombineLatest<Self, B, F>
  where
    B: ObservableType<Err = Self::Err>,
    F: FnMut(Self::Item, B::Item) -> R,
  {
    CombineLatest { source_a: self, source_b: other, selector }
  }

  fn zip<B>(self, other: B) -> Zip<Self, B>
  where
    B: ObservableType<Err = Self::Err>,
  {
    Zip { source_a: self, source_b: other }
  }

  /// Pairs every item with the latest item of `other`, once `other` has
  /// emitted.
  fn with_latest_from<B>(self, other: B) -> WithLatestFrom<Self, B, Tuple<Self::Item, B::Item>>
  where
    B: ObservableType<Err = Self::Err>,
  {
    WithLatestFrom { source: self, other, selector: |a, b| (a, b) }
  }

  fn with_latest_from_by<B, F, R>(self, other: B, selector: F) -> WithLatestFrom<Self, B, F>
  where
    B: ObservableType<Err = Self::Err>,
    F: FnMut(Self::Item, B::Item) -> R,
  {
    WithLatestFrom { source: self, other, selector }
  }

  /// Mirrors whichever of `self` and `other` notifies first.
  fn amb<B>(self, other: B) -> Amb<Self, B>
  where
    B: ObservableType<Item = Self::Item, Err = Self::Err>,
  {
    Amb { source_a: self, source_b: other }
  }

  // ---------------------------------------------------------------------------
  // Time based
  // ---------------------------------------------------------------------------

  /// Emits batches of items, each flushed when `count` items arrived or
  /// `time_span` elapsed since the previous flush, whichever is first.
  ///
  /// # Panics
  ///
  /// Panics if `count` is zero.
  fn buffer<Sch: Scheduler>(self, time_span: Duration, count: usize, scheduler: Sch) -> Buffer<Self, Sch> {
    assert!(count > 0, "buffer count must be greater than zero");
    Buffer { source: self, time_span, count, scheduler }
  }

  /// Shifts every notification, terminal ones included, by `delay`.
  fn delay<Sch: Scheduler>(self, delay: Duration, scheduler: Sch) -> Delay<Self, Sch> {
    Delay { source: self, delay, scheduler }
  }

  /// Subscribes to the source only after `delay`.
  fn delay_subscription<Sch: Scheduler>(self, delay: Duration, scheduler: Sch) -> DelaySubscription<Self, Sch> {
    DelaySubscription { source: self, delay, scheduler }
  }

  // ---------------------------------------------------------------------------
  // Multicast
  // ---------------------------------------------------------------------------

  fn publish(self) -> ConnectableObservable<Self, Subject<Self::Item, Self::Err>>
  where
    Self::Item: Clone,
    Self::Err: Clone,
  {
    ConnectableObservable::new(self, Subject::default())
  }

  /// Multicast through a subject replaying the last `count` items.
  fn replay(self, count: usize) -> ConnectableObservable<Self, ReplaySubject<Self::Item, Self::Err>>
  where
    Self::Item: Clone,
    Self::Err: Clone,
  {
    ConnectableObservable::new(self, ReplaySubject::new(count))
  }

  fn replay_all(self) -> ConnectableObservable<Self, ReplaySubject<Self::Item, Self::Err>>
  where
    Self::Item: Clone,
    Self::Err: Clone,
  {
    ConnectableObservable::new(self, ReplaySubject::unbounded())
  }

  // ---------------------------------------------------------------------------
  // Lifecycle
  // ---------------------------------------------------------------------------

  fn on_complete<F: FnOnce()>(self, func: F) -> OnComplete<Self, F> { OnComplete { source: self, func } }

  /// Handles the error with `func`; the resulting stream never errors.
  fn on_error<F>(self, func: F) -> OnError<Self, F>
  where
    F: FnOnce(Self::Err),
  {
    OnError { source: self, func }
  }

  /// Runs `func` exactly once, on the first of completion, error or
  /// unsubscribe.
  fn finalize<F>(self, func: F) -> Finalize<Self, F>
  where
    F: FnOnce() + Send + 'static,
  {
    Finalize { source: self, func }
  }

  // ---------------------------------------------------------------------------
  // Subscribing
  // ---------------------------------------------------------------------------

  fn subscribe_with<O>(self, observer: O) -> SubscriptionOf<Self, O>
  where
    O: Observer<Self::Item, Self::Err>,
    Self: CoreObservable<Subscriber<O>>,
  {
    let subscriber = Subscriber::new(observer);
    let upstream = self.actual_subscribe(subscriber.clone());
    if Subscription::is_closed(&subscriber) {
      upstream.unsubscribe();
      return SourceWithHandle::new(subscriber, None);
    }
    SourceWithHandle::new(subscriber, Some(upstream))
  }

  /// Subscribe with a `next` handler. Errors go to the unhandled-error hook.
  fn subscribe<N>(self, next: N) -> SubscriptionOf<Self, ObserverNext<N>>
  where
    N: FnMut(Self::Item),
    Self::Err: Debug,
    Self: CoreObservable<Subscriber<ObserverNext<N>>>,
  {
    self.subscribe_with(ObserverNext(next))
  }

  fn subscribe_err<N, E>(self, next: N, error: E) -> SubscriptionOf<Self, ObserverErr<N, E>>
  where
    N: FnMut(Self::Item),
    E: FnOnce(Self::Err),
    Self: CoreObservable<Subscriber<ObserverErr<N, E>>>,
  {
    self.subscribe_with(ObserverErr { next, error })
  }

  fn subscribe_complete<N, C>(self, next: N, complete: C) -> SubscriptionOf<Self, ObserverComp<N, C>>
  where
    N: FnMut(Self::Item),
    C: FnOnce(),
    Self::Err: Debug,
    Self: CoreObservable<Subscriber<ObserverComp<N, C>>>,
  {
    self.subscribe_with(ObserverComp { next, complete })
  }

  fn subscribe_all<N, E, C>(self, next: N, error: E, complete: C) -> SubscriptionOf<Self, ObserverAll<N, E, C>>
  where
    N: FnMut(Self::Item),
    E: FnOnce(Self::Err),
    C: FnOnce(),
    Self: CoreObservable<Subscriber<ObserverAll<N, E, C>>>,
  {
    self.subscribe_with(ObserverAll { next, error, complete })
  }

  /// Subscribe with one handler receiving every notification as an [`Event`].
  fn subscribe_event<F>(self, func: F) -> SubscriptionOf<Self, ObserverEvent<F>>
  where
    F: FnMut(Event<Self::Item, Self::Err>),
    Self: CoreObservable<Subscriber<ObserverEvent<F>>>,
  {
    self.subscribe_with(ObserverEvent(func))
  }
}

impl<T: ObservableType> Observable for T {}

// ============================================================================
// N-ary constructors
// ============================================================================

/// Subscribes to each source in turn, moving on when the previous completes.
pub fn concat<I, Err>(sources: I) -> MergeAll<Sources<I::IntoIter, Err>>
where
  I: IntoIterator,
  I::Item: ObservableType<Err = Err>,
{
  MergeAll { source: Sources::new(sources.into_iter()), concurrent: 1 }
}

/// Subscribes to every source at once and forwards items as they arrive.
pub fn merge<I, Err>(sources: I) -> MergeAll<Sources<I::IntoIter, Err>>
where
  I: IntoIterator,
  I::Item: ObservableType<Err = Err>,
{
  MergeAll { source: Sources::new(sources.into_iter()), concurrent: usize::MAX }
}

/// Emits `selector(latest values)` whenever any source emits, once all of
/// them have emitted.
pub fn combine_latest<S, F, R>(sources: Vec<S>, selector: F) -> CombineLatestAll<S, F>
where
  S: ObservableType,
  F: FnMut(Vec<S::Item>) -> R,
{
  CombineLatestAll { sources, selector }
}

/// Emits `selector(nth values)` for every index all sources reached.
pub fn zip<S, F, R>(sources: Vec<S>, selector: F) -> ZipAll<S, F>
where
  S: ObservableType,
  F: FnMut(Vec<S::Item>) -> R,
{
  ZipAll { sources, selector }
}

/// Adapts an error-free stream to any error type: `of([1]).map_err(infallible)`.
pub fn infallible<E>(err: Infallible) -> E { match err {} }
