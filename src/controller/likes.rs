//! Optimistic like cache
//!
//! Like counters are kept per entity, keyed by [`EntityKey`]. Every toggle
//! hands back a [`LikeTicket`] snapshotting the value it started from, so
//! overlapping toggles on the same entity stay individually reversible.
//!
//! Each entry carries an epoch that changes whenever server truth replaces
//! it. A ticket from an older epoch can no longer roll anything back.

use crate::api::EntityKey;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LikeState {
    pub count: u32,
    pub liked: bool,
}

impl LikeState {
    pub fn new(count: u32, liked: bool) -> Self {
        Self { count, liked }
    }

    /// The state after one toggle. `liked` decides the direction, so an
    /// unliked entity never decrements.
    pub fn toggled(self) -> Self {
        if self.liked {
            Self::new(self.count.saturating_sub(1), false)
        } else {
            Self::new(self.count.saturating_add(1), true)
        }
    }
}

/// Snapshot taken when a toggle is applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeTicket {
    pub key: EntityKey,
    pub before: LikeState,
    pub after: LikeState,
    epoch: u64,
}

impl LikeTicket {
    fn delta(&self) -> i64 {
        i64::from(self.after.count) - i64::from(self.before.count)
    }
}

/// Result of rolling back a failed toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rollback {
    /// Nothing touched the entry since the toggle: back to the exact snapshot
    Restored(LikeState),
    /// Later toggles moved the entry: only this toggle's delta was undone
    Reverted(LikeState),
    /// Server truth replaced the entry (or it is gone): rollback discarded
    Stale,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    state: LikeState,
    epoch: u64,
}

#[derive(Debug, Default)]
pub struct LikeLedger {
    entries: HashMap<EntityKey, Entry>,
    next_epoch: u64,
}

impl LikeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record server truth for an entity, invalidating outstanding tickets
    pub fn observe(&mut self, key: EntityKey, state: LikeState) {
        let epoch = self.next_epoch;
        self.next_epoch += 1;
        self.entries.insert(key, Entry { state, epoch });
    }

    pub fn get(&self, key: EntityKey) -> Option<LikeState> {
        self.entries.get(&key).map(|e| e.state)
    }

    pub fn forget(&mut self, key: EntityKey) {
        self.entries.remove(&key);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Apply an optimistic toggle to the value visible right now
    ///
    /// Returns `None` for entities the ledger has never seen.
    pub fn toggle(&mut self, key: EntityKey) -> Option<LikeTicket> {
        let entry = self.entries.get_mut(&key)?;
        let before = entry.state;
        let after = before.toggled();
        entry.state = after;

        Some(LikeTicket {
            key,
            before,
            after,
            epoch: entry.epoch,
        })
    }

    /// Undo a failed toggle relative to what the entry shows now
    pub fn rollback(&mut self, ticket: &LikeTicket) -> Rollback {
        let Some(entry) = self.entries.get_mut(&ticket.key) else {
            return Rollback::Stale;
        };

        if entry.epoch != ticket.epoch {
            return Rollback::Stale;
        }

        if entry.state == ticket.after {
            entry.state = ticket.before;
            return Rollback::Restored(entry.state);
        }

        let count = (i64::from(entry.state.count) - ticket.delta()).max(0);
        entry.state = LikeState::new(
            u32::try_from(count).unwrap_or(u32::MAX),
            !entry.state.liked,
        );
        Rollback::Reverted(entry.state)
    }
}
