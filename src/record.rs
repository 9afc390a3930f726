//! In-memory record collections.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

pub type RecordId = Ulid;

/// A flat value with a stable identifier assigned at construction.
pub trait Record {
    fn id(&self) -> RecordId;
}

/// Ordered collection of records, kept in insertion order.
///
/// Lookups are linear scans; collections here hold tens of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordStore<T> {
    records: Vec<T>,
}

impl<T> Default for RecordStore<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<T: Record> RecordStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(records: Vec<T>) -> Self {
        Self { records }
    }

    pub fn append(&mut self, record: T) {
        self.records.push(record);
    }

    /// Replace the first record with `id`. Returns `false` if none matched.
    pub fn replace(&mut self, id: RecordId, record: T) -> bool {
        match self.position(id) {
            Some(index) => {
                self.records[index] = record;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: RecordId) -> Option<T> {
        self.position(id).map(|index| self.records.remove(index))
    }

    pub fn find(&self, id: RecordId) -> Option<&T> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn find_mut(&mut self, id: RecordId) -> Option<&mut T> {
        self.records.iter_mut().find(|r| r.id() == id)
    }

    /// Apply `f` to the record with `id` in place. Returns `false` if none matched.
    pub fn update(&mut self, id: RecordId, f: impl FnOnce(&mut T)) -> bool {
        match self.find_mut(id) {
            Some(record) => {
                f(record);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.position(id).is_some()
    }

    pub fn retain(&mut self, f: impl FnMut(&T) -> bool) {
        self.records.retain(f);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.records.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }
}

impl<'a, T> IntoIterator for &'a RecordStore<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: RecordId,
        label: &'static str,
    }

    impl Record for Item {
        fn id(&self) -> RecordId {
            self.id
        }
    }

    fn item(label: &'static str) -> Item {
        Item {
            id: Ulid::new(),
            label,
        }
    }

    #[test]
    fn append_keeps_insertion_order() {
        let mut store = RecordStore::new();
        store.append(item("a"));
        store.append(item("b"));
        let labels: Vec<_> = store.iter().map(|i| i.label).collect();
        assert_eq!(labels, vec!["a", "b"]);
    }

    #[test]
    fn replace_in_place_and_missing_is_noop() {
        let first = item("a");
        let mut store = RecordStore::from_vec(vec![first.clone(), item("b")]);

        let replaced = Item {
            id: first.id,
            label: "z",
        };
        assert!(store.replace(first.id, replaced));
        assert_eq!(store.as_slice()[0].label, "z");

        assert!(!store.replace(Ulid::new(), item("ghost")));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn remove_and_find() {
        let a = item("a");
        let mut store = RecordStore::from_vec(vec![a.clone()]);
        assert_eq!(store.find(a.id), Some(&a));
        assert_eq!(store.remove(a.id), Some(a.clone()));
        assert!(store.remove(a.id).is_none());
        assert!(store.find(a.id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn update_reports_whether_a_record_matched() {
        let a = item("a");
        let mut store = RecordStore::from_vec(vec![a.clone()]);
        assert!(store.update(a.id, |i| i.label = "changed"));
        assert!(!store.update(Ulid::new(), |i| i.label = "never"));
        assert_eq!(store.find(a.id).map(|i| i.label), Some("changed"));
    }
}
