//! # rxstream: a push-based reactive streams engine
//!
//! Observables describe how to produce a sequence of `next` values ended by
//! at most one `error` or `complete`. Operators compose them into new
//! observables, subjects multicast one stream to many observers, and every
//! subscription can be torn down exactly once.
//!
//! ## Quick Start
//!
//! ```rust
//! use rxstream::prelude::*;
//!
//! let mut out = vec![];
//! observable::from_iter(0..10)
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 2)
//!   .subscribe(|v| out.push(v));
//! assert_eq!(out, vec![0, 4, 8, 12, 16]);
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | The operator algebra and the `subscribe` family |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`Subject`] | Observable and observer at once, multicasting to its subscribers |
//! | [`Subscription`] | Handle to cancel an active subscription |
//! | [`Scheduler`] | Where timers and delayed work run |
//!
//! ## Feature Flags
//!
//! - **`futures-scheduler`** (default): `futures` thread pool as a scheduler
//! - **`tokio-scheduler`**: a tokio runtime `Handle` as a scheduler
//!
//! [`Observable`]: observable::Observable
//! [`Observer`]: observer::Observer
//! [`Subject`]: subject::Subject
//! [`Subscription`]: subscription::Subscription
//! [`Scheduler`]: scheduler::Scheduler

pub mod error;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod rc;
pub mod scheduler;
pub mod subject;
pub mod subscriber;
pub mod subscription;

pub use error::RxError;
pub use prelude::*;
