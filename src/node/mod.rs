//! The advertisement engine
//!
//! [`TrustGraphNode`] embodies the network-neutral behaviors of a node
//! participating in the limited-advertisement protocol: planning how many
//! walks a self-advertisement launches and how long each walk is, and
//! forwarding inbound advertisements along the stable walk determined by
//! the routing table.
//!
//! Embedders implement the trait by supplying the routing table and the
//! transport sink ([`TrustGraphNode::send_advertisement`]); the provided
//! methods implement the protocol itself and rarely need overriding. The
//! one common override is [`TrustGraphNode::handle_advertisement`], where a
//! node consumes the payload locally in addition to forwarding.

mod params;

pub use params::{
    NodeParams, DEFAULT_IDEAL_REACH, DEFAULT_MAX_ROUTE_LENGTH, DEFAULT_MIN_ROUTE_LENGTH,
};

use crate::protocol::{Advertisement, NeighborId};
use crate::routing::RandomRoutingTable;

/// A node participating in the limited-advertisement protocol
pub trait TrustGraphNode {
    /// Identity type for this node's neighbors
    type Id: NeighborId;

    /// Concrete advertisement type routed by this node
    type Message: Advertisement<Self::Id>;

    /// The routing table consulted for forwarding and for walk seeding
    fn routing_table(&self) -> &RandomRoutingTable<Self::Id>;

    /// Deliver `message` to `neighbor`, marked with the given TTL
    ///
    /// This is the transport seam. The implementation must get the payload
    /// to the neighbor such that it arrives with this node as its sender
    /// and `ttl` as its inbound TTL (see
    /// [`Advertisement::copy_with`]), and should not block the caller for
    /// long: mutators of this node's routing table serialize behind the
    /// same paths that call here.
    fn send_advertisement(&self, message: &Self::Message, neighbor: &Self::Id, ttl: u32);

    /// Protocol tunables for this node
    fn params(&self) -> NodeParams {
        NodeParams::default()
    }

    /// Process an advertisement received from a neighbor
    ///
    /// The default behavior forwards the message along its walk. Wrappers
    /// typically consume the payload locally before or after delegating
    /// here.
    fn handle_advertisement(&self, message: &Self::Message) {
        self.forward_advertisement(message);
    }

    /// Forwarding policy for received messages
    ///
    /// Declines messages on their terminal hop (TTL of 1 or less; the
    /// current node is the final recipient) and messages whose TTL exceeds
    /// `max_route_length`, which would otherwise let an adversary amplify
    /// its reach.
    fn should_forward(&self, message: &Self::Message) -> bool {
        let ttl = message.inbound_ttl();
        ttl > 1 && ttl <= self.params().max_route_length
    }

    /// Forward a received message to the next hop on its walk
    ///
    /// The next hop is the successor paired with the message's sender in
    /// the routing table, and the TTL decreases by one. The message is
    /// dropped, silently, if the policy declines it or the sender is not a
    /// known neighbor. Returns whether the message was sent onward.
    fn forward_advertisement(&self, message: &Self::Message) -> bool {
        if !self.should_forward(message) {
            return false;
        }

        let next = match self.routing_table().next_hop_for(message) {
            Some(next) => next,
            None => return false,
        };

        self.send_advertisement(message, &next, message.inbound_ttl() - 1);
        true
    }

    /// Perform limited advertisement of this node's information
    ///
    /// Targets `ideal_reach` total recipients by launching walks through
    /// some of this node's neighbors; the sender and inbound TTL of
    /// `message` are ignored. The walk count and lengths depend on the
    /// degree `d`:
    ///
    /// - `d * max_route_length < r`: every neighbor is sent a walk of
    ///   `max_route_length` (the reach is unattainable, saturate)
    /// - `d * min_route_length > r`: `r / min_route_length` walks, seeded
    ///   by the leading entries of the shuffled neighbor ordering
    /// - otherwise: one walk per neighbor
    ///
    /// Outside the saturating case, walk lengths distribute the reach
    /// exactly: `r / walks` each, with the remainder spread as one extra
    /// hop over the first `r % walks` walks, clamped to at least
    /// `min_route_length`. Using the stored neighbor ordering makes the
    /// seeded subset repeatable across runs, which is what denies an
    /// adversary extra reach from retrying.
    fn advertise_self(&self, message: &Self::Message) {
        let params = self.params();
        debug_assert!(params.is_valid());

        let neighbors = self.routing_table().ordered_neighbors();
        let degree = neighbors.len() as u32;
        let reach = params.ideal_reach;

        // Not enough neighbors to hit the ideal reach even at maximum walk
        // length: use them all, at maximum length.
        if degree * params.max_route_length < reach {
            for neighbor in &neighbors {
                self.send_advertisement(message, neighbor, params.max_route_length);
            }
            return;
        }

        // Use as many neighbors as possible, capped by how many walks of at
        // least the minimum length fit into the reach.
        let walks = if degree * params.min_route_length > reach {
            reach / params.min_route_length
        } else {
            degree
        };
        if walks == 0 {
            return;
        }

        let std_len = reach / walks;
        let remainder = reach % walks;

        for (i, neighbor) in neighbors.iter().take(walks as usize).enumerate() {
            let mut length = std_len;
            if (i as u32) < remainder {
                length += 1;
            }
            self.send_advertisement(message, neighbor, length.max(params.min_route_length));
        }
    }
}
