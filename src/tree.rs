//! Tree data structures for Monte Carlo Tree Search
//!
//! The tree is a [`NodeArena`] plus an [`EdgeIndex`]. It never stores board
//! positions: a position is recovered by replaying the actions along a
//! [`NodePath`] from the root.

use std::fmt;

use crate::arena::{Node, NodeArena, NodeId, ROOT};
use crate::edges::EdgeIndex;
use crate::{MCTSError, Result};

/// Search tree owning every node and edge
#[derive(Debug, Clone)]
pub struct SearchTree {
    arena: NodeArena,
    edges: EdgeIndex,
    num_actions: usize,
}

impl SearchTree {
    /// Creates a tree holding only the root
    ///
    /// `capacity` bounds the total node count (root included) and
    /// `num_actions` is the number of distinct action ids.
    pub fn new(capacity: usize, num_actions: usize) -> Self {
        SearchTree {
            arena: NodeArena::new(capacity),
            edges: EdgeIndex::with_capacity(capacity),
            num_actions,
        }
    }

    /// Returns the node with the given id
    pub fn node(&self, id: NodeId) -> &Node {
        self.arena.get(id)
    }

    /// Returns the root node
    pub fn root(&self) -> &Node {
        self.arena.get(ROOT)
    }

    /// Number of nodes in the tree
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Maximum number of nodes the tree can hold
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// Number of distinct action ids
    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    /// Returns the child reached by `action`, if it exists
    pub fn child(&self, parent: NodeId, action: usize) -> Option<NodeId> {
        self.edges.lookup(parent, action)
    }

    /// Returns `(action, child)` pairs for every existing child, ordered by action
    pub fn children(&self, parent: NodeId) -> Vec<(usize, NodeId)> {
        (0..self.num_actions)
            .filter_map(|action| self.edges.lookup(parent, action).map(|child| (action, child)))
            .collect()
    }

    /// Read access to the node storage
    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    /// Read access to the edge index
    pub fn edges(&self) -> &EdgeIndex {
        &self.edges
    }

    pub(crate) fn arena_mut(&mut self) -> &mut NodeArena {
        &mut self.arena
    }

    /// Allocates a child for `action` unless the edge already exists
    ///
    /// Returns the new id, or `None` if the child was already present.
    pub(crate) fn add_child(&mut self, parent: NodeId, action: usize) -> Result<Option<NodeId>> {
        if self.edges.contains(parent, action) {
            return Ok(None);
        }
        let child = self.arena.allocate(parent, action)?;
        self.edges.insert(parent, action, child);
        Ok(Some(child))
    }

    /// Charges a provisional visit and penalty to every node on `path`
    ///
    /// The path records the penalty so backpropagation can reverse it exactly.
    /// A path already carrying virtual loss is left unchanged.
    pub fn apply_virtual_loss(&mut self, path: &mut NodePath, penalty: f64) -> Result<()> {
        if path.virtual_loss.is_some() {
            return Ok(());
        }
        self.check_path(path)?;
        for &id in &path.nodes {
            let node = self.arena.get_mut(id);
            node.virtual_visits += 1;
            node.virtual_penalty += penalty;
        }
        path.virtual_loss = Some(penalty);
        Ok(())
    }

    /// Checks that `path` starts at the root and follows parent links
    pub fn check_path(&self, path: &NodePath) -> Result<()> {
        let Some(&first) = path.nodes.first() else {
            return Err(MCTSError::InvalidPath("path is empty".to_string()));
        };
        if first != ROOT {
            return Err(MCTSError::InvalidPath(format!(
                "path starts at node {} instead of the root",
                first
            )));
        }
        for pair in path.nodes.windows(2) {
            let (parent, child) = (pair[0], pair[1]);
            match self.arena.try_get(child) {
                Some(node) if node.parent == Some(parent) => {}
                Some(_) => {
                    return Err(MCTSError::InvalidPath(format!(
                        "node {} is not a child of node {}",
                        child, parent
                    )))
                }
                None => {
                    return Err(MCTSError::InvalidPath(format!(
                        "node {} does not exist",
                        child
                    )))
                }
            }
        }
        Ok(())
    }

    /// Copies the node table
    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot {
            nodes: self.arena.nodes().to_vec(),
        }
    }
}

/// Represents a path through the MCTS tree
///
/// A path is the sequence of node ids from the root to a selected leaf. When
/// the leaf's evaluation is deferred, the path also carries the virtual loss
/// that was charged to it; backpropagating the path settles that charge.
#[derive(Debug, Clone, PartialEq)]
pub struct NodePath {
    /// Node ids from the root (index 0) to the leaf
    pub nodes: Vec<NodeId>,

    /// Penalty charged to every node on the path, if any
    pub virtual_loss: Option<f64>,
}

impl NodePath {
    /// Creates a path containing only the root
    pub fn new() -> Self {
        NodePath {
            nodes: vec![ROOT],
            virtual_loss: None,
        }
    }

    /// Creates a path with the given node ids and no pending virtual loss
    pub fn from_nodes(nodes: Vec<NodeId>) -> Self {
        NodePath {
            nodes,
            virtual_loss: None,
        }
    }

    /// Extends the path with a new node
    pub fn push(&mut self, id: NodeId) {
        self.nodes.push(id);
    }

    /// Returns the last node on the path
    pub fn leaf(&self) -> NodeId {
        self.nodes.last().copied().unwrap_or(ROOT)
    }

    /// Returns the number of nodes on the path
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the path is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of moves from the root to the leaf
    pub fn depth(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

impl Default for NodePath {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path[")?;
        for (i, id) in self.nodes.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", id)?;
        }
        write!(f, "]")?;
        if let Some(penalty) = self.virtual_loss {
            write!(f, " (virtual loss {})", penalty)?;
        }
        Ok(())
    }
}

/// An owned copy of the node table, for inspection and analytics
#[derive(Debug, Clone, PartialEq)]
pub struct TreeSnapshot {
    nodes: Vec<Node>,
}

impl TreeSnapshot {
    /// All nodes in id order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The root node
    pub fn root(&self) -> &Node {
        &self.nodes[ROOT]
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Direct children of the root, as `(action, node)` pairs
    pub fn root_children(&self) -> impl Iterator<Item = (usize, &Node)> {
        self.nodes
            .iter()
            .filter(|node| node.parent == Some(ROOT))
            .filter_map(|node| node.action.map(|action| (action, node)))
    }
}

impl fmt::Display for TreeSnapshot {
    /// One row per node; the root's parent and action print as -1
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>6} {:>6} {:>6} {:>8} {:>10} {:>6} {:>8}",
            "id", "parent", "action", "visits", "wins", "prior", "expanded"
        )?;
        for (id, node) in self.nodes.iter().enumerate() {
            let parent = node.parent.map_or(-1, |p| p as i64);
            let action = node.action.map_or(-1, |a| a as i64);
            writeln!(
                f,
                "{:>6} {:>6} {:>6} {:>8} {:>10.3} {:>6.3} {:>8}",
                id,
                parent,
                action,
                node.visit_count,
                node.win_accumulator,
                node.prior,
                node.expanded
            )?;
        }
        Ok(())
    }
}
