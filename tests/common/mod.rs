//! Common test helpers: an in-process trust graph whose nodes deliver
//! advertisements to each other through a queue, plus a node that records
//! its outbound sends without delivering them.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use kaleido::{
    Advertisement, NodeName, NodeParams, RandomRoutingTable, TextAdvertisement, TrustGraphNode,
};

type Envelope = (NodeName, TextAdvertisement<NodeName>);
type Outbox = Rc<RefCell<VecDeque<Envelope>>>;

/// A trust graph node that routes messages locally and records every
/// message that passes through it.
pub struct LocalNode {
    id: NodeName,
    params: NodeParams,
    table: RandomRoutingTable<NodeName>,
    outbox: Outbox,
    received: RefCell<Vec<TextAdvertisement<NodeName>>>,
}

impl LocalNode {
    /// How many messages have been delivered to this node.
    pub fn message_count(&self) -> usize {
        self.received.borrow().len()
    }

    /// Copies of the messages delivered to this node, in arrival order.
    pub fn messages(&self) -> Vec<TextAdvertisement<NodeName>> {
        self.received.borrow().clone()
    }

    /// Forget all delivered messages.
    pub fn clear_messages(&self) {
        self.received.borrow_mut().clear();
    }
}

impl TrustGraphNode for LocalNode {
    type Id = NodeName;
    type Message = TextAdvertisement<NodeName>;

    fn routing_table(&self) -> &RandomRoutingTable<NodeName> {
        &self.table
    }

    fn params(&self) -> NodeParams {
        self.params
    }

    fn send_advertisement(&self, message: &Self::Message, neighbor: &NodeName, ttl: u32) {
        // Stamp this node as the sender, then queue for delivery.
        let stamped = message.copy_with(self.id.clone(), ttl);
        self.outbox.borrow_mut().push_back((neighbor.clone(), stamped));
    }

    fn handle_advertisement(&self, message: &Self::Message) {
        self.received.borrow_mut().push(message.clone());
        self.forward_advertisement(message);
    }
}

/// A set of trust graph nodes that communicate in-process. Sends land in a
/// shared queue; [`LocalGraph::deliver_all`] drains it, letting forwarded
/// messages cascade until nothing is in flight.
pub struct LocalGraph {
    nodes: HashMap<NodeName, LocalNode>,
    outbox: Outbox,
    params: NodeParams,
    next_id: u32,
}

impl LocalGraph {
    pub fn new() -> Self {
        Self::with_params(NodeParams::default())
    }

    pub fn with_params(params: NodeParams) -> Self {
        Self {
            nodes: HashMap::new(),
            outbox: Rc::new(RefCell::new(VecDeque::new())),
            params,
            next_id: 0,
        }
    }

    /// Create a node with the next id in this graph's sequence.
    pub fn add_node(&mut self) -> NodeName {
        let id = NodeName::new(format!("#{}", self.next_id));
        self.next_id += 1;

        let node = LocalNode {
            id: id.clone(),
            params: self.params,
            table: RandomRoutingTable::with_rng(StdRng::seed_from_u64(u64::from(self.next_id))),
            outbox: Rc::clone(&self.outbox),
            received: RefCell::new(Vec::new()),
        };
        self.nodes.insert(id.clone(), node);

        id
    }

    pub fn node(&self, id: &NodeName) -> &LocalNode {
        &self.nodes[id]
    }

    /// Form a bidirectional trust link between two nodes. Symmetry matters:
    /// a node only forwards a message if its sender is a known neighbor.
    pub fn link(&self, a: &NodeName, b: &NodeName) {
        self.nodes[a].table.add_neighbor(b.clone());
        self.nodes[b].table.add_neighbor(a.clone());
    }

    /// Drain the delivery queue until no messages remain in flight.
    pub fn deliver_all(&self) {
        loop {
            let next = self.outbox.borrow_mut().pop_front();
            match next {
                Some((to, message)) => {
                    if let Some(node) = self.nodes.get(&to) {
                        node.handle_advertisement(&message);
                    }
                }
                None => break,
            }
        }
    }

    /// Total deliveries across the whole graph, repeats included.
    pub fn total_message_count(&self) -> usize {
        self.nodes.values().map(LocalNode::message_count).sum()
    }

    /// Forget every node's delivered messages.
    pub fn clear_messages(&self) {
        for node in self.nodes.values() {
            node.clear_messages();
        }
    }
}
