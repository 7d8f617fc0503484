//! Edge index from `(parent, action)` to child node id

use std::collections::HashMap;

use crate::arena::NodeId;

/// Lookup table for the children of every expanded node
///
/// The index only records edges; it never creates nodes. Each `(parent, action)`
/// pair maps to at most one child.
#[derive(Debug, Clone, Default)]
pub struct EdgeIndex {
    edges: HashMap<(NodeId, usize), NodeId>,
}

impl EdgeIndex {
    /// Creates an empty index sized for roughly `capacity` edges
    pub fn with_capacity(capacity: usize) -> Self {
        EdgeIndex {
            edges: HashMap::with_capacity(capacity),
        }
    }

    /// Returns the child reached by playing `action` at `parent`
    pub fn lookup(&self, parent: NodeId, action: usize) -> Option<NodeId> {
        self.edges.get(&(parent, action)).copied()
    }

    /// Returns true if the edge already exists
    pub fn contains(&self, parent: NodeId, action: usize) -> bool {
        self.edges.contains_key(&(parent, action))
    }

    /// Records a new edge
    ///
    /// Returns false, leaving the existing edge untouched, if the pair is
    /// already present.
    pub fn insert(&mut self, parent: NodeId, action: usize, child: NodeId) -> bool {
        match self.edges.entry((parent, action)) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(child);
                true
            }
        }
    }

    /// Number of edges
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns true if no edge has been recorded
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
