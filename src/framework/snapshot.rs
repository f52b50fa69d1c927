//! # Collection Snapshot
//!
//! The ordered, id-unique list the actor believes the server holds. All mutation goes
//! through per-entry patches (`prepend`, `replace`, `remove`, `insert_at`) so that a
//! rollback can restore exactly one entry without touching the others.

use crate::framework::entity::CatalogEntity;

/// Ordered collection with at most one entry per id.
#[derive(Debug, Clone)]
pub struct Snapshot<T: CatalogEntity> {
    items: Vec<T>,
}

impl<T: CatalogEntity> Default for Snapshot<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: CatalogEntity> Snapshot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole collection. Later duplicates of an id are dropped.
    pub fn replace_all(&mut self, items: Vec<T>) -> usize {
        let before = items.len();
        let mut unique: Vec<T> = Vec::with_capacity(before);
        for item in items {
            if !unique.iter().any(|seen| seen.id() == item.id()) {
                unique.push(item);
            }
        }
        self.items = unique;
        before - self.items.len()
    }

    pub fn position(&self, id: &T::Id) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &T::Id) -> bool {
        self.position(id).is_some()
    }

    /// Puts `item` first, dropping any existing entry with the same id.
    pub fn prepend(&mut self, item: T) {
        self.items.retain(|existing| existing.id() != item.id());
        self.items.insert(0, item);
    }

    /// Overwrites the entry with id `id` in place and returns the old value.
    ///
    /// `item` may carry a different id (placeholder reconciliation). Any other entry
    /// already holding the new id is removed so ids stay unique.
    pub fn replace(&mut self, id: &T::Id, item: T) -> Option<T> {
        let index = self.position(id)?;
        if item.id() != id {
            if let Some(clash) = self.position(item.id()) {
                self.items.remove(clash);
                let index = if clash < index { index - 1 } else { index };
                return Some(std::mem::replace(&mut self.items[index], item));
            }
        }
        Some(std::mem::replace(&mut self.items[index], item))
    }

    /// Removes the entry with id `id`, returning its index and value.
    pub fn remove(&mut self, id: &T::Id) -> Option<(usize, T)> {
        let index = self.position(id)?;
        Some((index, self.items.remove(index)))
    }

    /// Inserts at `index`, clamped to the current length. Returns false if the id
    /// is already present.
    pub fn insert_at(&mut self, index: usize, item: T) -> bool {
        if self.contains(item.id()) {
            return false;
        }
        let index = index.min(self.items.len());
        self.items.insert(index, item);
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.items.clone()
    }
}

/// Entries whose searchable fields contain `term`, ignoring case.
///
/// The term is matched as typed, whitespace included. An empty term keeps everything.
/// The input is never modified.
pub fn filter<'a, T: CatalogEntity>(items: &'a [T], term: &str) -> Vec<&'a T> {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    items.iter().filter(|item| item.matches(&needle)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::entity::{EntityId, LocalKey};
    use std::fmt;

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    enum TagId {
        Remote(u32),
        Local(LocalKey),
    }

    impl fmt::Display for TagId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                TagId::Remote(id) => write!(f, "{}", id),
                TagId::Local(key) => write!(f, "{}", key),
            }
        }
    }

    impl EntityId for TagId {
        fn local(key: LocalKey) -> Self {
            TagId::Local(key)
        }

        fn as_local(&self) -> Option<LocalKey> {
            match self {
                TagId::Local(key) => Some(*key),
                TagId::Remote(_) => None,
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Tag {
        id: TagId,
        label: String,
    }

    impl CatalogEntity for Tag {
        type Id = TagId;
        type Draft = String;

        fn id(&self) -> &TagId {
            &self.id
        }

        fn from_draft(id: TagId, label: String) -> Self {
            Self { id, label }
        }

        fn apply(&mut self, label: String) {
            self.label = label;
        }

        fn matches(&self, needle: &str) -> bool {
            self.label.to_lowercase().contains(needle)
        }
    }

    fn tag(id: u32, label: &str) -> Tag {
        Tag::from_draft(TagId::Remote(id), label.to_string())
    }

    fn ids(snapshot: &Snapshot<Tag>) -> Vec<TagId> {
        snapshot.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_replace_all_keeps_first_duplicate() {
        let mut snapshot = Snapshot::new();
        let dropped = snapshot.replace_all(vec![tag(1, "a"), tag(2, "b"), tag(1, "c")]);
        assert_eq!(dropped, 1);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get(&TagId::Remote(1)).unwrap().label, "a");
    }

    #[test]
    fn test_replace_reconciles_placeholder_in_place() {
        let mut snapshot = Snapshot::new();
        snapshot.replace_all(vec![tag(1, "a"), tag(2, "b")]);
        let local = TagId::local(LocalKey(7));
        snapshot.prepend(Tag::from_draft(local.clone(), "new".into()));

        let old = snapshot.replace(&local, tag(3, "new")).unwrap();
        assert_eq!(old.id, local);
        assert_eq!(
            ids(&snapshot),
            vec![TagId::Remote(3), TagId::Remote(1), TagId::Remote(2)]
        );
    }

    #[test]
    fn test_replace_with_existing_id_keeps_ids_unique() {
        let mut snapshot = Snapshot::new();
        snapshot.replace_all(vec![tag(1, "a"), tag(2, "b")]);
        let local = TagId::local(LocalKey(1));
        snapshot.prepend(Tag::from_draft(local.clone(), "b2".into()));

        snapshot.replace(&local, tag(2, "b2"));
        assert_eq!(ids(&snapshot), vec![TagId::Remote(2), TagId::Remote(1)]);
        assert_eq!(snapshot.get(&TagId::Remote(2)).unwrap().label, "b2");
    }

    #[test]
    fn test_remove_then_insert_restores_position() {
        let mut snapshot = Snapshot::new();
        snapshot.replace_all(vec![tag(1, "a"), tag(2, "b"), tag(3, "c")]);
        let (index, removed) = snapshot.remove(&TagId::Remote(2)).unwrap();
        assert_eq!(index, 1);
        assert!(snapshot.insert_at(index, removed));
        assert_eq!(
            ids(&snapshot),
            vec![TagId::Remote(1), TagId::Remote(2), TagId::Remote(3)]
        );
        assert!(!snapshot.insert_at(0, tag(2, "dup")));
    }

    #[test]
    fn test_insert_at_clamps_index() {
        let mut snapshot = Snapshot::new();
        snapshot.replace_all(vec![tag(1, "a")]);
        assert!(snapshot.insert_at(10, tag(2, "b")));
        assert_eq!(ids(&snapshot), vec![TagId::Remote(1), TagId::Remote(2)]);
    }

    #[test]
    fn test_filter_is_pure_and_empty_term_keeps_order() {
        let items = vec![tag(1, "Alpha"), tag(2, "beta"), tag(3, "ALPHABET")];
        let all = filter(&items, "");
        assert_eq!(all.len(), 3);
        assert_eq!(all[2].id, TagId::Remote(3));

        let alpha: Vec<_> = filter(&items, "alPha").iter().map(|t| t.id.clone()).collect();
        assert_eq!(alpha, vec![TagId::Remote(1), TagId::Remote(3)]);
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn test_filter_does_not_trim_term() {
        let items = vec![tag(1, "Alpha"), tag(2, "Alpha beta")];
        let hits: Vec<_> = filter(&items, "alpha ").iter().map(|t| t.id.clone()).collect();
        assert_eq!(hits, vec![TagId::Remote(2)]);
    }
}
