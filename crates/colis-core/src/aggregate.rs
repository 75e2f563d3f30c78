// SPDX-License-Identifier: AGPL-3.0
// Colis Core - Status aggregation
//
// Counts are always a fresh tally over the whole list. Nothing here is
// updated incrementally.

use crate::range::Timestamped;
use crate::status::{Reported, StatusKind};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// An entity carrying a backend-reported status
pub trait Tracked: Timestamped {
    type Status: StatusKind;

    fn id(&self) -> &str;

    fn status(&self) -> &Reported<Self::Status>;
}

/// Per-status tally of one list of entities
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(bound(serialize = ""))]
pub struct StatusCounts<S: StatusKind> {
    #[serde(serialize_with = "by_wire_name")]
    counts: BTreeMap<S, usize>,
    /// Number of entities in the list, recognized or not
    pub total: usize,
    /// Entities whose status is outside the known set
    pub unrecognized: usize,
}

impl<S: StatusKind> StatusCounts<S> {
    /// All known statuses at zero
    pub fn empty() -> Self {
        Self {
            counts: S::ALL.iter().map(|status| (*status, 0)).collect(),
            total: 0,
            unrecognized: 0,
        }
    }

    pub fn get(&self, status: S) -> usize {
        self.counts.get(&status).copied().unwrap_or(0)
    }

    /// Sum over known statuses. Never exceeds `total`.
    pub fn recognized(&self) -> usize {
        self.counts.values().sum()
    }

    /// Known statuses with their counts, in lifecycle order
    pub fn iter(&self) -> impl Iterator<Item = (S, usize)> + '_ {
        self.counts.iter().map(|(status, count)| (*status, *count))
    }
}

impl<S: StatusKind> Default for StatusCounts<S> {
    fn default() -> Self {
        Self::empty()
    }
}

fn by_wire_name<S: StatusKind, Ser: Serializer>(
    counts: &BTreeMap<S, usize>,
    serializer: Ser,
) -> Result<Ser::Ok, Ser::Error> {
    serializer.collect_map(counts.iter().map(|(status, count)| (status.as_str(), count)))
}

/// Tally entities by status
pub fn aggregate<E: Tracked>(entities: &[E]) -> StatusCounts<E::Status> {
    aggregate_iter(entities.iter())
}

/// Tally any sequence of entity references, e.g. a range-filtered view
pub fn aggregate_iter<'a, E, I>(entities: I) -> StatusCounts<E::Status>
where
    E: Tracked + 'a,
    I: IntoIterator<Item = &'a E>,
{
    let mut counts = StatusCounts::empty();
    for entity in entities {
        counts.total += 1;
        match entity.status() {
            Reported::Known(status) => *counts.counts.entry(*status).or_insert(0) += 1,
            Reported::Unrecognized(raw) => {
                tracing::warn!(
                    "Not counting {} with unrecognized status {:?}",
                    entity.id(),
                    raw
                );
                counts.unrecognized += 1;
            }
        }
    }
    counts
}
