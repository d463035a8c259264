//! The random routing table.
//!
//! Each neighbor is paired with exactly one successor neighbor, and with two
//! or more neighbors the pairs form a single cycle covering them all. A
//! message arriving from neighbor `x` is always forwarded to the same
//! successor, which is what makes walks over the trust graph repeatable.
//! Alongside the successor map the table keeps a shuffled ordering of its
//! neighbors, used only to pick which subset of neighbors to seed when a
//! node advertises itself.
//!
//! Priority is given to consistent non-blocking reads for threads doing
//! routing lookups. Mutations are expected to be rare compared to reads and
//! tables are expected to stay small. During an in-progress mutation a
//! neighbor may briefly be pointed to by two routes, but it never becomes
//! unreachable and is never unmapped; snapshots always reflect a state that
//! existed between mutations.

use std::collections::{HashMap, HashSet};

use dashmap::DashMap;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::protocol::{Advertisement, NeighborId};
use crate::routing::snapshot::Snapshot;

/// State guarded by the mutation lock: the shuffled advertising order and
/// the RNG used for edge selection, list positions, and batch permutations.
struct OrderState<N> {
    list: Vec<N>,
    rng: StdRng,
}

/// A routing table pairing each trusted neighbor with one successor
///
/// Point lookups ([`next_hop`](RandomRoutingTable::next_hop),
/// [`contains`](RandomRoutingTable::contains),
/// [`len`](RandomRoutingTable::len)) read the concurrent successor map
/// without taking the table lock and may run from any number of threads.
/// Mutators, [`snapshot`](RandomRoutingTable::snapshot), and
/// [`ordered_neighbors`](RandomRoutingTable::ordered_neighbors) serialize on
/// a single internal mutex.
///
/// Routes are selected with a cryptographically strong RNG seeded from OS
/// entropy by default; tests can inject a seeded RNG via
/// [`with_rng`](RandomRoutingTable::with_rng) for reproducible construction.
pub struct RandomRoutingTable<N: NeighborId> {
    /// Successor map: an entry `(x, y)` routes a message arriving from
    /// neighbor `x` on to neighbor `y`.
    routes: DashMap<N, N>,
    /// Held by every mutator for its full duration, and by snapshot and
    /// ordered-list reads. Never held by point reads of `routes`.
    state: Mutex<OrderState<N>>,
}

impl<N: NeighborId> RandomRoutingTable<N> {
    /// Create an empty table with an OS-entropy RNG
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create an empty table with the given source of randomness
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            routes: DashMap::new(),
            state: Mutex::new(OrderState {
                list: Vec::new(),
                rng,
            }),
        }
    }

    /// Restore a table from a snapshot, with an OS-entropy RNG
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSnapshot`](crate::Error::InvalidSnapshot) if
    /// the snapshot violates the routing invariants.
    pub fn from_snapshot(snapshot: Snapshot<N>) -> Result<Self> {
        Self::from_snapshot_with_rng(snapshot, StdRng::from_entropy())
    }

    /// Restore a table from a snapshot with the given source of randomness
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSnapshot`](crate::Error::InvalidSnapshot) if
    /// the snapshot violates the routing invariants.
    pub fn from_snapshot_with_rng(snapshot: Snapshot<N>, rng: StdRng) -> Result<Self> {
        snapshot.validate()?;
        let (routes, list) = snapshot.into_parts();

        Ok(Self {
            routes: routes.into_iter().collect(),
            state: Mutex::new(OrderState { list, rng }),
        })
    }

    /// Whether the neighbor is in the table
    pub fn contains(&self, neighbor: &N) -> bool {
        self.routes.contains_key(neighbor)
    }

    /// The number of neighbors (equivalently, routes) in the table
    ///
    /// May briefly include a neighbor whose addition is still committing;
    /// it never misses a neighbor mid-removal.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the table holds no neighbors
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// The successor paired with the given prior neighbor, if any
    ///
    /// This is the next hop for a message received from `prior`. Unknown
    /// neighbors yield `None`; this never fails.
    pub fn next_hop(&self, prior: &N) -> Option<N> {
        self.routes.get(prior).map(|route| route.value().clone())
    }

    /// The next hop for an advertisement, keyed by its sender
    pub fn next_hop_for<A: Advertisement<N>>(&self, message: &A) -> Option<N> {
        self.next_hop(message.sender())
    }

    /// An independent copy of the shuffled neighbor ordering
    ///
    /// The ordering is stable between mutations; adding a neighbor inserts
    /// it at a random position, so embedders that advertise to a subset of
    /// neighbors should persist the table (snapshot included) to keep that
    /// subset stable across runs.
    pub fn ordered_neighbors(&self) -> Vec<N> {
        self.state.lock().list.clone()
    }

    /// Add a single neighbor
    ///
    /// A random existing route `x -> y` is split into `x -> neighbor` and
    /// `neighbor -> y`; if the table is empty the neighbor is routed to
    /// itself until a second neighbor arrives. Adding a neighbor that is
    /// already present has no effect.
    pub fn add_neighbor(&self, neighbor: N) {
        let mut state = self.state.lock();
        self.add_locked(&mut state, neighbor);
    }

    /// Add a group of neighbors, disrupting at most one existing route
    ///
    /// The new neighbors are chained together in a random permutation and
    /// the whole chain is spliced into one randomly chosen route, so any
    /// number of additions removes at most one pre-existing edge. Neighbors
    /// already present (and duplicates within the batch) are ignored.
    pub fn add_neighbors<I>(&self, neighbors: I)
    where
        I: IntoIterator<Item = N>,
    {
        let mut state = self.state.lock();

        let mut batch: HashSet<N> = HashSet::new();
        let mut fresh: Vec<N> = Vec::new();
        for neighbor in neighbors {
            if !self.routes.contains_key(&neighbor) && batch.insert(neighbor.clone()) {
                fresh.push(neighbor);
            }
        }

        match fresh.len() {
            0 => {}
            1 => {
                if let Some(neighbor) = fresh.pop() {
                    self.add_locked(&mut state, neighbor);
                }
            }
            _ => self.add_chain_locked(&mut state, fresh),
        }
    }

    /// Remove a single neighbor
    ///
    /// The two routes through the neighbor, `x -> neighbor -> y`, are merged
    /// into `x -> y`. Removing a neighbor that is not present has no effect.
    pub fn remove_neighbor(&self, neighbor: &N) {
        let mut state = self.state.lock();
        self.remove_locked(&mut state, neighbor);
    }

    /// Remove a group of neighbors
    ///
    /// Equivalent to removing each neighbor in turn, in iteration order.
    pub fn remove_neighbors<'a, I>(&self, neighbors: I)
    where
        I: IntoIterator<Item = &'a N>,
        N: 'a,
    {
        let mut state = self.state.lock();
        for neighbor in neighbors {
            self.remove_locked(&mut state, neighbor);
        }
    }

    /// Remove all neighbors and routes
    pub fn clear(&self) {
        let mut state = self.state.lock();
        self.routes.clear();
        state.list.clear();
    }

    /// An atomic point-in-time copy of the table state
    ///
    /// The snapshot never reflects a partially applied mutation and is
    /// isolated from mutations applied after it is taken.
    pub fn snapshot(&self) -> Snapshot<N> {
        let state = self.state.lock();
        let routes: HashMap<N, N> = self
            .routes
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        Snapshot::new(routes, state.list.clone())
    }

    fn add_locked(&self, state: &mut OrderState<N>, neighbor: N) {
        if self.routes.contains_key(&neighbor) {
            return;
        }

        match self.random_route(&mut state.rng) {
            // Empty table: the sole neighbor routes to itself. The next
            // addition always splits this route, fixing the self-loop.
            None => {
                self.routes.insert(neighbor.clone(), neighbor.clone());
            }
            // Split a random route x -> y into x -> neighbor -> y. The new
            // route neighbor -> y is written first, so concurrent readers
            // can reach y throughout.
            Some((x, y)) => {
                self.routes.insert(neighbor.clone(), y);
                self.routes.insert(x, neighbor.clone());
            }
        }

        Self::insert_into_ordering(state, neighbor);
    }

    /// Splices two or more new neighbors into the cycle as one chain.
    fn add_chain_locked(&self, state: &mut OrderState<N>, mut fresh: Vec<N>) {
        // The route to split is chosen before any new route is written.
        let split = self.random_route(&mut state.rng);

        fresh.shuffle(&mut state.rng);

        // Internal chain b1 -> b2 -> ... -> bk; touches no existing route.
        for pair in fresh.windows(2) {
            self.routes.insert(pair[0].clone(), pair[1].clone());
        }

        let first = fresh[0].clone();
        let last = fresh[fresh.len() - 1].clone();

        match split {
            // The table was empty: close the chain into a fresh cycle.
            None => {
                self.routes.insert(last, first);
            }
            // x -> y becomes x -> b1 -> ... -> bk -> y. As in the single
            // add, the route into y is written before x is redirected.
            Some((x, y)) => {
                self.routes.insert(last, y);
                self.routes.insert(x, first);
            }
        }

        for neighbor in fresh {
            Self::insert_into_ordering(state, neighbor);
        }
    }

    fn remove_locked(&self, state: &mut OrderState<N>, neighbor: &N) {
        if !self.routes.contains_key(neighbor) {
            return;
        }

        // Drop it from the advertising order first, so it can no longer be
        // picked as a walk seed while the routes are rewritten. The list is
        // duplicate-free, so one hit is the only hit.
        if let Some(position) = state.list.iter().position(|n| n == neighbor) {
            state.list.remove(position);
        }

        let successor = match self.next_hop(neighbor) {
            Some(successor) => successor,
            None => return,
        };

        // A self-route only exists when this is the last neighbor.
        if successor == *neighbor {
            self.routes.remove(neighbor);
            return;
        }

        // Merge x -> neighbor -> y into x -> y, redirecting the predecessor
        // before the neighbor's own route is deleted so y stays reachable.
        let predecessor = self
            .routes
            .iter()
            .find(|entry| entry.value() == neighbor)
            .map(|entry| entry.key().clone());
        if let Some(predecessor) = predecessor {
            self.routes.insert(predecessor, successor);
        }
        self.routes.remove(neighbor);
    }

    /// Picks a uniformly random route from the table, or `None` if empty.
    fn random_route(&self, rng: &mut StdRng) -> Option<(N, N)> {
        let len = self.routes.len();
        if len == 0 {
            return None;
        }

        let pick = rng.gen_range(0..len);
        self.routes
            .iter()
            .nth(pick)
            .map(|entry| (entry.key().clone(), entry.value().clone()))
    }

    fn insert_into_ordering(state: &mut OrderState<N>, neighbor: N) {
        let position = state.rng.gen_range(0..=state.list.len());
        state.list.insert(position, neighbor);
    }
}

impl<N: NeighborId> Default for RandomRoutingTable<N> {
    fn default() -> Self {
        Self::new()
    }
}
