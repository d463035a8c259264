//! Protocol value types
//!
//! This module defines the two capability traits the routing core is
//! polymorphic over, together with basic implementations of each:
//!
//! - **Identity**: [`NeighborId`] (content equality, hash, stable string
//!   rendering) with [`NodeName`] wrapping a plain string label
//! - **Message**: [`Advertisement`] (sender, inbound TTL, copy-with) with
//!   [`TextAdvertisement`] carrying a string payload
//!
//! Embedders with richer identity or message types implement the traits on
//! their own types; the core never depends on anything beyond the declared
//! capabilities.

mod identity;
mod message;

pub use identity::{NeighborId, NodeName};
pub use message::{Advertisement, TextAdvertisement};
