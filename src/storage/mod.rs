//! Snapshot persistence
//!
//! Routes and the advertising order must be stable between runs of the
//! software for the advertisement algorithm to function as intended; a node
//! that rebuilds its routing table from scratch silently changes which
//! neighbors it advertises to. This module defines the [`SnapshotStore`]
//! seam for pluggable persistence and provides [`JsonFileStore`], a
//! file-backed reference adapter.
//!
//! Persistence adapters are the only place the core performs I/O.

mod json;

pub use json::JsonFileStore;

use crate::error::Result;
use crate::protocol::NeighborId;
use crate::routing::Snapshot;

/// Trait for snapshot persistence implementations
///
/// This abstraction allows different storage mechanisms to be used without
/// changing the rest of the codebase.
pub trait SnapshotStore<N: NeighborId> {
    /// Persist a snapshot, replacing any previously stored state
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the snapshot cannot be
    /// written.
    fn store(&self, snapshot: &Snapshot<N>) -> Result<()>;

    /// Load the previously stored snapshot
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if no snapshot can be read,
    /// including when the stored document is malformed, and
    /// [`Error::InvalidSnapshot`](crate::Error::InvalidSnapshot) if a
    /// well-formed document describes a state that violates the routing
    /// invariants.
    fn load(&self) -> Result<Snapshot<N>>;
}
