//! Fixed-capacity node storage
//!
//! Nodes live in a flat, append-only vector addressed by [`NodeId`]. The
//! capacity is chosen when the tree is built and never grows; ids are stable
//! for the lifetime of the arena.

use crate::{MCTSError, Result};

/// Index of a node inside a [`NodeArena`]
pub type NodeId = usize;

/// Id of the root node, which every arena contains
pub const ROOT: NodeId = 0;

/// Statistics for one visited position
///
/// `win_accumulator` holds the credit earned by the player to move at this
/// node. Provisional virtual-loss bookkeeping lives in `virtual_visits` and
/// `virtual_penalty` so `visit_count` only ever counts finished
/// backpropagation passes.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Owning parent, `None` for the root
    pub parent: Option<NodeId>,

    /// Column played from the parent to reach this node, `None` for the root
    pub action: Option<usize>,

    /// Completed backpropagation passes through this node
    pub visit_count: u64,

    /// Sum of credited outcomes; fractional for draws and evaluator scores
    pub win_accumulator: f64,

    /// Reserved for policy-guided priors
    pub prior: f64,

    /// True once every legal child has an edge
    pub expanded: bool,

    /// In-flight selections that passed through this node
    pub virtual_visits: u32,

    /// Total penalty applied by in-flight selections
    pub virtual_penalty: f64,
}

impl Node {
    fn new(parent: Option<NodeId>, action: Option<usize>) -> Self {
        Node {
            parent,
            action,
            visit_count: 0,
            win_accumulator: 0.0,
            prior: 0.0,
            expanded: false,
            virtual_visits: 0,
            virtual_penalty: 0.0,
        }
    }

    /// Average credit for the player to move here, 0 when never visited
    pub fn value(&self) -> f64 {
        crate::utils::win_rate(self.win_accumulator, self.visit_count)
    }

    /// Visit count including in-flight selections
    pub fn effective_visits(&self) -> u64 {
        self.visit_count + self.virtual_visits as u64
    }

    /// Returns true if no virtual loss is outstanding
    pub fn is_settled(&self) -> bool {
        self.virtual_visits == 0
    }
}

/// Append-only node store with a hard capacity
#[derive(Debug, Clone)]
pub struct NodeArena {
    nodes: Vec<Node>,
    capacity: usize,
}

impl NodeArena {
    /// Creates an arena holding only the root node
    ///
    /// `capacity` counts the root, so it must be at least 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut nodes = Vec::with_capacity(capacity);
        nodes.push(Node::new(None, None));
        NodeArena { nodes, capacity }
    }

    /// Appends a zeroed node and returns its id
    ///
    /// Fails with [`MCTSError::CorruptedTree`] if `parent` is not in the arena.
    pub fn allocate(&mut self, parent: NodeId, action: usize) -> Result<NodeId> {
        if parent >= self.nodes.len() {
            return Err(MCTSError::CorruptedTree { node: parent });
        }
        if self.nodes.len() >= self.capacity {
            return Err(MCTSError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        let id = self.nodes.len();
        self.nodes.push(Node::new(Some(parent), Some(action)));
        Ok(id)
    }

    /// Returns the node with the given id
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Returns the node with the given id for mutation
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    /// Returns the node with the given id, if it exists
    pub fn try_get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Number of allocated nodes, including the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root is allocated on construction
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Maximum number of nodes this arena can hold
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// All nodes in id order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}
