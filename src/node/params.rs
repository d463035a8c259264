//! Per-node protocol tunables.

use serde::{Deserialize, Serialize};

/// Default ideal reach, the parameter called `r` in TR2008-918
pub const DEFAULT_IDEAL_REACH: u32 = 100;

/// Default maximum route length, the parameter called `w_max` in TR2008-918
pub const DEFAULT_MAX_ROUTE_LENGTH: u32 = 20;

/// Default minimum route length, the parameter called `w_min` in TR2008-918
pub const DEFAULT_MIN_ROUTE_LENGTH: u32 = 7;

/// Tunable parameters governing a node's advertisement behavior
///
/// Instances are plain values; a node exposes its parameters through
/// [`TrustGraphNode::params`](crate::node::TrustGraphNode::params) and the
/// defaults suit most deployments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeParams {
    /// Ideal number of distinct nodes one self-advertisement reaches (`r`)
    pub ideal_reach: u32,

    /// Shortest walk length this node will choose when advertising
    /// (`w_min`). Related to how local a neighborhood an advertisement is
    /// meant to cover: many short walks and few long walks spread
    /// differently.
    pub min_route_length: u32,

    /// Longest walk length this node will choose, and the largest inbound
    /// TTL it will tolerate before dropping a message (`w_max`). Bounds the
    /// reach an adversarial node gets out of a single edge.
    pub max_route_length: u32,
}

impl Default for NodeParams {
    fn default() -> Self {
        Self {
            ideal_reach: DEFAULT_IDEAL_REACH,
            min_route_length: DEFAULT_MIN_ROUTE_LENGTH,
            max_route_length: DEFAULT_MAX_ROUTE_LENGTH,
        }
    }
}

impl NodeParams {
    /// Whether the parameters are usable: `min_route_length` is at least 1
    /// and `max_route_length` exceeds it by at least 1
    pub fn is_valid(&self) -> bool {
        self.min_route_length >= 1 && self.max_route_length > self.min_route_length
    }
}
