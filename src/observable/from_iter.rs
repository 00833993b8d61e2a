use std::{
  convert::Infallible,
  iter::{successors, Successors, Take},
};

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
};

/// Creates an observable that produces values from an iterator.
///
/// Completes when all elements have been emitted. Never emits an error.
/// Stops early when the downstream closes, e.g. behind a `take`.
///
/// # Examples
///
/// ```
/// use rxstream::prelude::*;
///
/// observable::from_iter(vec![0, 1, 2, 3]).subscribe(|v| println!("{v},"));
/// ```
pub fn from_iter<Iter>(iter: Iter) -> FromIter<Iter>
where
  Iter: IntoIterator,
{
  FromIter(iter)
}

/// Emits every element of `values` in order, then completes.
pub fn of<Item, const N: usize>(values: [Item; N]) -> FromIter<[Item; N]> { FromIter(values) }

/// Emits `value`, then completes.
pub fn just<Item>(value: Item) -> FromIter<[Item; 1]> { FromIter([value]) }

/// Integers `range` can count up from.
pub trait RangeValue: Sized {
  /// The next value, `None` past the type's maximum.
  fn checked_next(&self) -> Option<Self>;
}

macro_rules! impl_range_value {
  ($($t:ty),*) => {
    $(
      impl RangeValue for $t {
        #[inline]
        fn checked_next(&self) -> Option<Self> { self.checked_add(1) }
      }
    )*
  };
}

impl_range_value!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

pub type RangeIter<T> = Take<Successors<T, fn(&T) -> Option<T>>>;

/// Emits `count` consecutive integers starting at `start`, then completes.
///
/// The sequence ends early at the type's maximum instead of overflowing.
///
/// ```
/// use rxstream::prelude::*;
///
/// let mut sum = 0;
/// observable::range(1, 4).subscribe(|v| sum += v);
/// assert_eq!(sum, 1 + 2 + 3 + 4);
/// ```
pub fn range<T: RangeValue>(start: T, count: usize) -> FromIter<RangeIter<T>> {
  let step: fn(&T) -> Option<T> = T::checked_next;
  FromIter(successors(Some(start), step).take(count))
}

#[derive(Clone)]
pub struct FromIter<Iter>(Iter);

impl<Iter: IntoIterator> ObservableType for FromIter<Iter> {
  type Item = Iter::Item;
  type Err = Infallible;
}

impl<Iter, O> CoreObservable<O> for FromIter<Iter>
where
  Iter: IntoIterator,
  O: Observer<Iter::Item, Infallible>,
{
  type Unsub = ();

  fn actual_subscribe(self, mut observer: O) -> Self::Unsub {
    for v in self.0 {
      if observer.is_closed() {
        return;
      }
      observer.next(v);
    }
    if !observer.is_closed() {
      observer.complete();
    }
  }
}
