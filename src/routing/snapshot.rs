//! Point-in-time routing state.

use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::protocol::NeighborId;

/// An immutable dump of a routing table's state
///
/// A snapshot carries a deep copy of the successor map and the shuffled
/// neighbor ordering taken between mutations of a live table. It is the unit
/// of persistence: storing snapshots across runs is what keeps random routes
/// repeatable, which in turn bounds how many distinct nodes an adversary can
/// reach by retrying with fresh identities.
///
/// Snapshots can be constructed freely; [`Snapshot::validate`] decides
/// whether one represents a state a table would accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<N: NeighborId> {
    routes: HashMap<N, N>,
    ordered_neighbors: Vec<N>,
}

impl<N: NeighborId> Snapshot<N> {
    /// Create a snapshot from a successor map and a neighbor ordering
    ///
    /// No validation is performed here; pass the result through
    /// [`Snapshot::validate`] or hand it to
    /// [`RandomRoutingTable::from_snapshot`](crate::routing::RandomRoutingTable::from_snapshot),
    /// which validates on your behalf.
    pub fn new(routes: HashMap<N, N>, ordered_neighbors: Vec<N>) -> Self {
        Self {
            routes,
            ordered_neighbors,
        }
    }

    /// The successor map: an entry `(x, y)` means a message arriving from
    /// neighbor `x` is forwarded to neighbor `y`
    pub fn routes(&self) -> &HashMap<N, N> {
        &self.routes
    }

    /// The shuffled neighbor ordering used to seed self-advertisements
    pub fn ordered_neighbors(&self) -> &[N] {
        &self.ordered_neighbors
    }

    /// Decompose into the successor map and the neighbor ordering
    pub fn into_parts(self) -> (HashMap<N, N>, Vec<N>) {
        (self.routes, self.ordered_neighbors)
    }

    /// Check that this snapshot constitutes a valid routing state
    ///
    /// The checks, in order:
    ///
    /// - the set of route keys equals the set of route values, so every
    ///   neighbor both routes somewhere and is routed to
    /// - with more than one route, no neighbor is its own successor
    /// - following successors from any key visits every neighbor exactly
    ///   once before returning to the start (one cycle, not several)
    /// - the neighbor ordering is duplicate-free
    /// - the neighbor ordering covers exactly the routed neighbors
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSnapshot`] naming the first violated check.
    pub fn validate(&self) -> Result<()> {
        let routes = &self.routes;

        let values: HashSet<&N> = routes.values().collect();
        if values.len() != routes.len() || !values.iter().all(|v| routes.contains_key(v)) {
            return Err(Error::InvalidSnapshot("key/value set mismatch"));
        }

        if routes.len() > 1 {
            if routes.iter().any(|(key, value)| key == value) {
                return Err(Error::InvalidSnapshot("illegal self-route"));
            }

            // Follow the successor chain from an arbitrary key. A repeat
            // before `len` distinct visits means the routes decompose into
            // more than one cycle.
            if let Some(first) = routes.keys().next() {
                let mut seen: HashSet<&N> = HashSet::with_capacity(routes.len());
                let mut cursor = first;
                for _ in 0..routes.len() - 1 {
                    seen.insert(cursor);
                    cursor = match routes.get(cursor) {
                        Some(next) => next,
                        None => return Err(Error::InvalidSnapshot("unclosed cycle")),
                    };
                    if seen.contains(cursor) {
                        return Err(Error::InvalidSnapshot("cycle too short"));
                    }
                }
                if routes.get(cursor) != Some(first) {
                    return Err(Error::InvalidSnapshot("unclosed cycle"));
                }
            }
        }

        let order_set: HashSet<&N> = self.ordered_neighbors.iter().collect();
        if order_set.len() != self.ordered_neighbors.len() {
            return Err(Error::InvalidSnapshot("ordered-neighbors has duplicates"));
        }

        if self.ordered_neighbors.len() != routes.len()
            || self.ordered_neighbors.iter().any(|n| !routes.contains_key(n))
        {
            return Err(Error::InvalidSnapshot("ordered-neighbors mismatch"));
        }

        Ok(())
    }

    /// Total companion to [`Snapshot::validate`]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}
