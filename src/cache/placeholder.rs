use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use crate::core::TodoId;

/// Hands out placeholder ids for speculative inserts.
///
/// Clock-backed generators use microseconds since the Unix epoch, bumped
/// past the last issued value so two adds in the same tick still differ.
#[derive(Debug)]
pub struct PlaceholderIds {
    /// Lowest value the next id may take.
    floor: AtomicU64,
    clock: bool,
}

impl PlaceholderIds {
    pub fn clock() -> Self {
        Self {
            floor: AtomicU64::new(0),
            clock: true,
        }
    }

    /// Deterministic generator: `start`, `start + 1`, ...
    pub fn sequential(start: u64) -> Self {
        Self {
            floor: AtomicU64::new(start & !TodoId::PLACEHOLDER_BIT),
            clock: false,
        }
    }

    pub fn next(&self) -> TodoId {
        let now = if self.clock {
            u64::try_from(Utc::now().timestamp_micros()).unwrap_or(0)
        } else {
            0
        };

        let floor = self
            .floor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |floor| {
                Some(now.max(floor).wrapping_add(1) & !TodoId::PLACEHOLDER_BIT)
            })
            .unwrap_or_else(|floor| floor);

        TodoId::placeholder(now.max(floor))
    }
}

impl Default for PlaceholderIds {
    fn default() -> Self {
        Self::clock()
    }
}
