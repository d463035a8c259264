//! # Kaleido
//!
//! The network-neutral core of the Kaleidoscope limited-advertisement
//! protocol (NYU TR2008-918, section 4): a node sends self-advertisements to
//! a bounded, random, but repeatable subset of the nodes reachable over its
//! social trust graph, and forwards advertisements arriving from neighbors
//! along stable pseudo-random walks. Repeatability is the point: it bounds
//! how many distinct nodes a malicious identity, sybils included, can reach
//! across retries.
//!
//! The crate provides the routing table, the advertisement engine, and a
//! snapshot persistence seam. Transports, identity formats, and payloads
//! are supplied by the embedder through small capability traits.
//!
//! ## Quick Start
//!
//! ```
//! use kaleido::{NodeName, RandomRoutingTable};
//!
//! let table: RandomRoutingTable<NodeName> = RandomRoutingTable::new();
//! table.add_neighbors(["alice", "bob", "carol"].map(NodeName::from));
//!
//! // every neighbor has a successor on the routing cycle
//! let next = table.next_hop(&NodeName::from("alice"));
//! assert!(next.is_some());
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod error;
pub mod node;
pub mod protocol;
pub mod routing;
pub mod storage;

// Re-export main types
pub use error::{Error, Result};
pub use node::{
    NodeParams, TrustGraphNode, DEFAULT_IDEAL_REACH, DEFAULT_MAX_ROUTE_LENGTH,
    DEFAULT_MIN_ROUTE_LENGTH,
};
pub use protocol::{Advertisement, NeighborId, NodeName, TextAdvertisement};
pub use routing::{RandomRoutingTable, Snapshot};
pub use storage::{JsonFileStore, SnapshotStore};
