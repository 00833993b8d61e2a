//! Operator implementations.
//!
//! Each operator is a struct holding its source(s) and parameters, built by
//! the matching method of [`Observable`](crate::observable::Observable).
//! Subscribing wraps the downstream observer in the operator's own observer
//! and subscribes the source(s) with it.

pub mod amb;
pub mod buffer;
pub mod combine_latest;
pub mod concat;
pub mod delay;
pub mod delay_subscription;
pub mod distinct_until_changed;
pub mod element_at;
pub mod filter;
pub mod ignore_elements;
pub mod lifecycle;
pub mod map;
pub mod map_err;
pub mod merge;
pub mod merge_all;
pub mod reduce;
pub mod scan;
pub mod skip;
pub mod skip_until;
pub mod skip_while;
pub mod start_with;
pub mod switch_latest;
pub mod take;
pub mod to_array;
pub mod try_map;
pub mod with_latest_from;
pub mod zip;
