use tracing::debug;

use super::Collection;
use crate::core::{Todo, TodoId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchStatus {
    Pending,
    Committed,
    RolledBack,
}

/// Transform that undoes one speculative edit without touching edits made
/// by other in-flight mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inverse {
    /// Nothing was applied (no cached collection, or the target was absent).
    Noop,
    /// Undo a speculative insert.
    DropPlaceholder(TodoId),
    /// Undo a speculative removal; the item goes back to its sorted slot.
    Restore(Todo),
}

/// Record of one speculative mutation awaiting its round trip.
#[derive(Debug)]
#[must_use = "a pending patch must be committed or rolled back"]
pub struct PendingPatch {
    inverse: Inverse,
    status: PatchStatus,
}

impl PendingPatch {
    pub fn insert(collection: Option<&mut Collection>, item: Todo) -> Self {
        let Some(collection) = collection else {
            return Self::new(Inverse::Noop);
        };
        let id = item.id;
        collection.push_front(item);
        Self::new(Inverse::DropPlaceholder(id))
    }

    pub fn remove(collection: Option<&mut Collection>, id: TodoId) -> Self {
        match collection.and_then(|collection| collection.remove(id)) {
            Some(item) => Self::new(Inverse::Restore(item)),
            None => Self::new(Inverse::Noop),
        }
    }

    fn new(inverse: Inverse) -> Self {
        Self {
            inverse,
            status: PatchStatus::Pending,
        }
    }

    pub fn status(&self) -> PatchStatus {
        self.status
    }

    pub fn inverse(&self) -> &Inverse {
        &self.inverse
    }

    /// The round trip succeeded; the speculative state stands.
    pub fn commit(mut self) -> PatchStatus {
        self.status = PatchStatus::Committed;
        self.status
    }

    /// The round trip failed; applies the inverse to whatever collection is
    /// cached now. A collection replaced by a fetch since the apply is left
    /// alone unless it still carries the speculative edit.
    pub fn rollback(mut self, collection: Option<&mut Collection>) -> PatchStatus {
        if let Some(collection) = collection {
            match std::mem::replace(&mut self.inverse, Inverse::Noop) {
                Inverse::Noop => {}
                Inverse::DropPlaceholder(id) => {
                    if collection.remove(id).is_some() {
                        debug!(placeholder = %id, "dropped speculative insert");
                    }
                }
                Inverse::Restore(item) => {
                    let id = item.id;
                    if let Some(index) = collection.restore(item) {
                        debug!(id = %id, index, "restored speculative removal");
                    }
                }
            }
        }
        self.status = PatchStatus::RolledBack;
        self.status
    }
}
