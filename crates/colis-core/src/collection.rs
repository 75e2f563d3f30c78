// SPDX-License-Identifier: AGPL-3.0
// Colis Core - In-memory entity collections
//
// A collection is only ever replaced wholesale by a fetch result. Each fetch
// takes a ticket first; only the most recently issued ticket may write, so a
// slow response can never overwrite a newer one.

use crate::aggregate::{aggregate, StatusCounts, Tracked};
use crate::status::StatusKind;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Permission for one fetch to write its result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// What happened to a fetch result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The collection now holds this many entities
    Applied(usize),
    /// A newer fetch was issued meanwhile; the result was dropped
    Stale,
}

/// The list and the counts derived from it
#[derive(Debug, Clone)]
pub struct Snapshot<E: Tracked> {
    pub items: Vec<E>,
    pub counts: StatusCounts<E::Status>,
}

impl<E: Tracked> Default for Snapshot<E> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            counts: StatusCounts::empty(),
        }
    }
}

pub struct Collection<E: Tracked> {
    name: &'static str,
    snapshot: RwLock<Snapshot<E>>,
    issued: AtomicU64,
}

impl<E: Tracked + Clone> Collection<E> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            snapshot: RwLock::new(Snapshot::default()),
            issued: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Issue a ticket for a fetch that is about to start
    pub fn begin_fetch(&self) -> FetchTicket {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!("Issued {} fetch #{}", self.name, seq);
        FetchTicket { seq }
    }

    /// Replace the contents with a fetch result, unless a newer fetch was issued
    pub fn apply(&self, ticket: FetchTicket, items: Vec<E>) -> RefreshOutcome {
        let mut snapshot = self.write();

        let latest = self.issued.load(Ordering::SeqCst);
        if ticket.seq != latest {
            tracing::warn!(
                "Dropping stale {} response #{} (latest is #{})",
                self.name,
                ticket.seq,
                latest
            );
            return RefreshOutcome::Stale;
        }

        self.log_regressions(&snapshot.items, &items);

        let counts = aggregate(&items);
        let total = items.len();
        *snapshot = Snapshot { items, counts };
        tracing::info!("Loaded {} {}", total, self.name);
        RefreshOutcome::Applied(total)
    }

    /// Empty the collection and invalidate every fetch still in flight
    pub fn clear(&self) {
        let mut snapshot = self.write();
        self.issued.fetch_add(1, Ordering::SeqCst);
        *snapshot = Snapshot::default();
    }

    pub fn items(&self) -> Vec<E> {
        self.read().items.clone()
    }

    pub fn counts(&self) -> StatusCounts<E::Status> {
        self.read().counts.clone()
    }

    pub fn snapshot(&self) -> Snapshot<E> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // The backend drives every transition and is trusted; a status moving
    // backwards is only reported.
    fn log_regressions(&self, previous: &[E], next: &[E]) {
        if previous.is_empty() {
            return;
        }
        let before: HashMap<&str, E::Status> = previous
            .iter()
            .filter_map(|e| e.status().known().map(|s| (e.id(), s)))
            .collect();

        for entity in next {
            let (Some(old), Some(new)) = (before.get(entity.id()), entity.status().known()) else {
                continue;
            };
            if new.stage() < old.stage() {
                tracing::warn!(
                    "{} {} moved back from {} to {}",
                    self.name,
                    entity.id(),
                    old.as_str(),
                    new.as_str()
                );
            }
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Snapshot<E>> {
        self.snapshot.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Snapshot<E>> {
        self.snapshot.write().unwrap_or_else(PoisonError::into_inner)
    }
}
