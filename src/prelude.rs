//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

// Core traits
pub use crate::observable::{CoreObservable, Observable, ObservableType};
// Constructors stay namespaced: `observable::of(..)`, `observable::merge(..)`
pub use crate::observable::{self, ConnectableObservable, Connection};
// Observer side
pub use crate::observer::{set_unhandled_error_hook, Emitter, Event, Observer};
pub use crate::subscriber::Subscriber;
// Subject
pub use crate::subject::{BehaviorSubject, ReplaySubject, Subject, SubjectSubscription, Variable, VariableObservable};
// Subscription
pub use crate::subscription::{
  BoxSubscription, ClosureSubscription, DisposeBag, MultiSubscription, SerialSubscription, Subscription,
  SubscriptionGuard, TupleSubscription,
};
// Scheduler
#[cfg(feature = "futures-scheduler")]
pub use crate::scheduler::default_scheduler;
pub use crate::scheduler::{self, Duration, Scheduler, TaskHandle, TestScheduler};
// Errors raised by the engine itself
pub use crate::error::RxError;
