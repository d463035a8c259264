//! Error types for the routing core and its persistence adapters.

use thiserror::Error;

/// Main error type for routing operations.
///
/// The core is total almost everywhere: lookups on unknown neighbors return
/// `None` and out-of-range TTLs make forwarding decline silently. Only two
/// things can actually fail: accepting a snapshot that violates the routing
/// invariants, and persistence I/O.
#[derive(Error, Debug)]
pub enum Error {
    /// A snapshot failed structural validation
    ///
    /// Carries a fixed reason string naming the violated invariant. Raised
    /// by [`Snapshot::validate`](crate::routing::Snapshot::validate) and by
    /// the snapshot-accepting table constructors.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(&'static str),

    /// A persistence adapter failed to read or write a snapshot
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
