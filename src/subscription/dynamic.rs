use smallvec::SmallVec;

use super::Subscription;

/// A container of items addressed by the id handed out when they were added.
///
/// Insertion order is preserved, so iteration order equals registration
/// order. `SmallVec` keeps the common case of one or two entries off the heap.
pub struct DynamicSubscriptions<U> {
  next_id: usize,
  items: SmallVec<[(usize, U); 2]>,
}

impl<U> Default for DynamicSubscriptions<U> {
  fn default() -> Self { Self { next_id: 0, items: SmallVec::new() } }
}

impl<U> DynamicSubscriptions<U> {
  /// Add an item and return its unique ID.
  #[inline]
  pub fn add(&mut self, item: U) -> usize {
    let id = self.next_id;
    self.next_id += 1;
    self.items.push((id, item));
    id
  }

  pub fn remove(&mut self, id: usize) -> Option<U> {
    self
      .items
      .iter()
      .position(|(i, _)| *i == id)
      .map(|pos| self.items.remove(pos).1)
  }

  #[inline]
  pub fn contains(&self, id: usize) -> bool { self.items.iter().any(|(i, _)| *i == id) }

  #[inline]
  pub fn len(&self) -> usize { self.items.len() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.items.is_empty() }

  #[inline]
  pub fn retain(&mut self, mut keep: impl FnMut(&U) -> bool) { self.items.retain(|(_, item)| keep(item)) }

  #[inline]
  pub fn drain(&mut self) -> impl Iterator<Item = U> + '_ { self.items.drain(..).map(|(_, item)| item) }

  #[inline]
  pub fn iter(&self) -> impl Iterator<Item = &U> { self.items.iter().map(|(_, item)| item) }
}

impl<U: Subscription> DynamicSubscriptions<U> {
  /// Unsubscribe all items and clear the container.
  pub fn unsubscribe_all(&mut self) {
    for item in self.drain() {
      item.unsubscribe();
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn add_remove_by_id() {
    let mut subs: DynamicSubscriptions<&str> = DynamicSubscriptions::default();
    let a = subs.add("a");
    let b = subs.add("b");
    let c = subs.add("c");
    assert_eq!(subs.len(), 3);

    assert_eq!(subs.remove(b), Some("b"));
    assert_eq!(subs.remove(b), None);
    assert!(subs.contains(a) && subs.contains(c));
    assert_eq!(subs.iter().copied().collect::<Vec<_>>(), vec!["a", "c"]);
  }

  #[test]
  fn ids_are_not_reused() {
    let mut subs: DynamicSubscriptions<()> = DynamicSubscriptions::default();
    let a = subs.add(());
    subs.remove(a);
    let b = subs.add(());
    assert_ne!(a, b);
  }

  #[test]
  fn unsubscribe_all_empties() {
    let mut subs = DynamicSubscriptions::default();
    subs.add(());
    subs.add(());
    subs.unsubscribe_all();
    assert!(subs.is_empty());
  }
}
