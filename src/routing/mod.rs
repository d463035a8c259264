//! Random routing over the trust graph
//!
//! This module implements the routing behavior described in section 4.2 of
//! NYU TR2008-918: each node pairs every trusted neighbor with exactly one
//! successor, forming a single cycle, so that a message arriving over a
//! given edge always continues along the same pseudo-random walk. The walk
//! structure is what limits how many distinct nodes an adversary can reach,
//! even across retries with manufactured identities.
//!
//! Two pieces:
//!
//! - [`RandomRoutingTable`]: the live, concurrently readable table
//! - [`Snapshot`]: an immutable validated dump of table state, the unit of
//!   persistence (see [`crate::storage`])

mod snapshot;
mod table;

pub use snapshot::Snapshot;
pub use table::RandomRoutingTable;
