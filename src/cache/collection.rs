use im::Vector;

use crate::core::{Todo, TodoId};

/// Ordered, id-unique view of the remote `todos` collection.
///
/// Backed by a persistent vector so snapshots handed to readers are cheap
/// clones that never observe later mutations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    items: Vector<Todo>,
}

impl Collection {
    /// Builds the collection from an authoritative server list: sorted
    /// newest first, first occurrence wins on duplicate ids.
    pub fn from_authoritative(items: impl IntoIterator<Item = Todo>) -> Self {
        let mut collection = Self::default();
        for mut item in items {
            if collection.contains(item.id) {
                continue;
            }
            item.optimistic = false;
            collection.items.push_back(item);
        }
        collection.sort_descending();
        collection
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Todo> {
        self.items.iter()
    }

    pub fn ids(&self) -> Vec<TodoId> {
        self.items.iter().map(|item| item.id).collect()
    }

    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn contains(&self, id: TodoId) -> bool {
        self.position(id).is_some()
    }

    pub fn position(&self, id: TodoId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn to_vec(&self) -> Vec<Todo> {
        self.items.iter().cloned().collect()
    }

    pub fn is_sorted_descending(&self) -> bool {
        self.items
            .iter()
            .zip(self.items.iter().skip(1))
            .all(|(newer, older)| newer.id > older.id)
    }

    pub(crate) fn push_front(&mut self, item: Todo) {
        self.items.push_front(item);
    }

    pub(crate) fn remove(&mut self, id: TodoId) -> Option<Todo> {
        let index = self.position(id)?;
        Some(self.items.remove(index))
    }

    /// Re-inserts `item` at its descending-id position and returns that index.
    /// Does nothing if an item with the same id is already present.
    pub(crate) fn restore(&mut self, item: Todo) -> Option<usize> {
        let index = match self
            .items
            .binary_search_by(|other| item.id.cmp(&other.id))
        {
            Ok(_) => return None,
            Err(index) => index,
        };
        self.items.insert(index, item);
        Some(index)
    }

    /// Swaps the optimistic entry `placeholder` for its authoritative copy.
    ///
    /// Any other entry already holding the authoritative id is dropped so the
    /// collection stays unique. If the placeholder is gone the confirmed item
    /// goes to the front. The result is re-sorted.
    pub(crate) fn confirm(&mut self, placeholder: TodoId, mut confirmed: Todo) {
        confirmed.optimistic = false;
        self.items.retain(|item| item.id != confirmed.id);

        let slot = self
            .items
            .iter()
            .position(|item| item.optimistic && item.id == placeholder);
        match slot {
            Some(index) => {
                self.items.set(index, confirmed);
            }
            None => self.items.push_front(confirmed),
        }

        self.sort_descending();
    }

    fn sort_descending(&mut self) {
        self.items.sort_by(|a, b| b.id.cmp(&a.id));
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Todo;
    type IntoIter = im::vector::Iter<'a, Todo>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
