//! Labelled directed graph.
//!
//! Mutations act in place. Removing a node also removes every edge touching
//! it, and edges may only be added between existing nodes, so every edge's
//! endpoints stay inside the node set after any public call.

mod bundle;
mod types;

pub use bundle::{EdgeBundle, NodeBundle};
pub use types::{BASE_NODE_ID, Edge, Labels, NAME_LABEL, Node, NodeId, symbol_labels};

use crate::errors::GrammarError;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Graph {
    nodes: NodeBundle,
    edges: EdgeBundle,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node. A node already holding the id is removed first,
    /// together with its edges.
    pub fn add_node(&mut self, node: Node) {
        if self.nodes.contains(&node.id) {
            self.detach(&node.id);
            self.nodes.remove(&node.id);
        }
        self.nodes.insert(node);
    }

    pub fn add_symbol_node(&mut self, id: impl Into<NodeId>, symbol: &str) {
        self.add_node(Node::with_symbol(id, symbol));
    }

    pub fn add_nodes_from<I: IntoIterator<Item = Node>>(&mut self, nodes: I) {
        for node in nodes {
            self.add_node(node);
        }
    }

    pub fn remove_node(&mut self, id: &NodeId) -> Result<Node, GrammarError> {
        let node = self
            .nodes
            .remove(id)
            .ok_or_else(|| GrammarError::node_absent(format!("no node has '{id}' as its id")))?;
        self.detach(id);
        Ok(node)
    }

    pub fn remove_nodes_from<'a, I: IntoIterator<Item = &'a NodeId>>(
        &mut self,
        ids: I,
    ) -> Result<(), GrammarError> {
        for id in ids {
            self.remove_node(id)?;
        }
        Ok(())
    }

    /// Adds an edge between two existing nodes, replacing an edge with the same endpoints.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), GrammarError> {
        for endpoint in [&edge.start, &edge.end] {
            if !self.nodes.contains(endpoint) {
                return Err(GrammarError::node_absent(format!(
                    "no node has '{endpoint}' as its id (edge {} -> {})",
                    edge.start, edge.end
                )));
            }
        }
        self.edges.insert(edge);
        Ok(())
    }

    /// Adds an edge without checking its endpoints.
    ///
    /// Only meant for layering exotic nodes over the graph; the caller is
    /// responsible for restoring referential integrity.
    pub fn add_edge_unchecked(&mut self, edge: Edge) {
        self.edges.insert(edge);
    }

    pub fn add_edges_from<I: IntoIterator<Item = Edge>>(
        &mut self,
        edges: I,
    ) -> Result<(), GrammarError> {
        for edge in edges {
            self.add_edge(edge)?;
        }
        Ok(())
    }

    pub fn remove_edge(&mut self, start: &NodeId, end: &NodeId) -> Result<Edge, GrammarError> {
        self.edges
            .remove(start, end)
            .ok_or_else(|| GrammarError::edge_absent(format!("no edge {start} -> {end}")))
    }

    pub fn in_edges(&self, id: &NodeId) -> Vec<&Edge> {
        self.edges.incoming(id)
    }

    pub fn out_edges(&self, id: &NodeId) -> Vec<&Edge> {
        self.edges.outgoing(id)
    }

    pub fn in_degree(&self, id: &NodeId) -> usize {
        self.edges.incoming(id).len()
    }

    pub fn out_degree(&self, id: &NodeId) -> usize {
        self.edges.outgoing(id).len()
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains(id)
    }

    pub fn contains_edge(&self, start: &NodeId, end: &NodeId) -> bool {
        self.edges.contains(start, end)
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn edge(&self, start: &NodeId, end: &NodeId) -> Option<&Edge> {
        self.edges.get(start, end)
    }

    pub fn symbol(&self, id: &NodeId) -> Option<&str> {
        self.nodes.get(id).map(Node::symbol)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.ids()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True when every edge starts and ends at a node of the graph.
    pub fn has_referential_integrity(&self) -> bool {
        self.edges
            .iter()
            .all(|edge| self.nodes.contains(&edge.start) && self.nodes.contains(&edge.end))
    }

    /// True when a node or an edge carries `symbol` as its `name` label.
    pub fn contains_label(&self, symbol: &str) -> bool {
        self.nodes.iter().any(|node| node.symbol() == symbol)
            || self.edges.iter().any(|edge| edge.symbol() == symbol)
    }

    /// Drops every edge touching `id` and returns them.
    pub(crate) fn detach(&mut self, id: &NodeId) -> Vec<Edge> {
        let mut touching: Vec<(NodeId, NodeId)> = self
            .edges
            .outgoing(id)
            .into_iter()
            .chain(self.edges.incoming(id))
            .map(|edge| (edge.start.clone(), edge.end.clone()))
            .collect();
        touching.sort();
        touching.dedup();
        touching
            .iter()
            .filter_map(|(start, end)| self.edges.remove(start, end))
            .collect()
    }
}
