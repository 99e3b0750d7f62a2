//! Graphs carrying exotic nodes.
//!
//! An exotic node stands for "some neighbouring node" when the graph is
//! used as a pattern. Anchors must always be bound to a target node;
//! wildcards may stay unmatched. Exotic and ordinary nodes share one id
//! namespace but never the same id, and no edge joins two exotic nodes.

mod matcher;
mod morphism;
mod permutation;

pub use matcher::MatchContext;
pub use morphism::Morphism;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    errors::GrammarError,
    graph::{Edge, Graph, Labels, Node, NodeBundle, NodeId},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExoticKind {
    Anchor,
    Wildcard,
}

impl ExoticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ExoticKind::Anchor => "anchor",
            ExoticKind::Wildcard => "wildcard",
        }
    }

    /// Degree test applied to every ordinary pattern node and its image.
    pub(crate) fn admits_degree(self, pattern_degree: usize, target_degree: usize) -> bool {
        match self {
            ExoticKind::Anchor => target_degree == pattern_degree,
            ExoticKind::Wildcard => target_degree <= pattern_degree,
        }
    }
}

/// Edges of an exotic graph sorted by the kind of their endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgePartition<'a> {
    pub between_ordinary: Vec<&'a Edge>,
    pub exotic_to_ordinary: Vec<&'a Edge>,
    pub ordinary_to_exotic: Vec<&'a Edge>,
    pub between_exotic: Vec<&'a Edge>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExoticGraph {
    kind: ExoticKind,
    graph: Graph,
    exotic: NodeBundle,
}

impl ExoticGraph {
    pub fn new(kind: ExoticKind) -> Self {
        Self {
            kind,
            graph: Graph::new(),
            exotic: NodeBundle::new(),
        }
    }

    pub fn anchor() -> Self {
        Self::new(ExoticKind::Anchor)
    }

    pub fn wildcard() -> Self {
        Self::new(ExoticKind::Wildcard)
    }

    pub fn kind(&self) -> ExoticKind {
        self.kind
    }

    /// Adds an ordinary node. An exotic or ordinary node already holding the
    /// id is removed first, together with its edges.
    pub fn add_node(&mut self, node: Node) {
        if self.exotic.contains(&node.id) {
            self.remove_exotic(&node.id);
        }
        self.graph.add_node(node);
    }

    pub fn add_symbol_node(&mut self, id: impl Into<NodeId>, symbol: &str) {
        self.add_node(Node::with_symbol(id, symbol));
    }

    /// Adds an exotic node. An ordinary or exotic node already holding the
    /// id is removed first, together with its edges.
    pub fn add_exotic_node(&mut self, id: impl Into<NodeId>, labels: Labels) {
        let id = id.into();
        if self.graph.contains_node(&id) {
            let _ = self.graph.remove_node(&id);
        }
        if self.exotic.contains(&id) {
            self.remove_exotic(&id);
        }
        self.exotic.insert(Node { id, labels });
    }

    pub fn remove_node(&mut self, id: &NodeId) -> Result<Node, GrammarError> {
        if self.exotic.contains(id) {
            return self.remove_exotic(id).ok_or_else(|| {
                GrammarError::node_absent(format!("no {} node has '{id}' as its id", self.kind.as_str()))
            });
        }
        self.graph.remove_node(id)
    }

    /// Adds an edge. Both endpoints must exist as ordinary or exotic nodes
    /// and at most one of them may be exotic.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), GrammarError> {
        self.check_exotic_edge(&edge)?;
        for endpoint in [&edge.start, &edge.end] {
            if !self.contains_node(endpoint) {
                return Err(GrammarError::node_absent(format!(
                    "no node has '{endpoint}' as its id (edge {} -> {})",
                    edge.start, edge.end
                )));
            }
        }
        self.graph.add_edge_unchecked(edge);
        Ok(())
    }

    /// Adds an edge whose endpoints may not exist yet. The exotic-to-exotic
    /// rule is still enforced.
    pub fn add_edge_unchecked(&mut self, edge: Edge) -> Result<(), GrammarError> {
        self.check_exotic_edge(&edge)?;
        self.graph.add_edge_unchecked(edge);
        Ok(())
    }

    pub fn remove_edge(&mut self, start: &NodeId, end: &NodeId) -> Result<Edge, GrammarError> {
        self.graph.remove_edge(start, end)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.graph.contains_node(id) || self.exotic.contains(id)
    }

    pub fn contains_edge(&self, start: &NodeId, end: &NodeId) -> bool {
        self.graph.contains_edge(start, end)
    }

    pub fn is_exotic(&self, id: &NodeId) -> bool {
        self.exotic.contains(id)
    }

    pub fn exotic_ids(&self) -> BTreeSet<NodeId> {
        self.exotic.id_set()
    }

    pub fn exotic_nodes(&self) -> impl Iterator<Item = &Node> {
        self.exotic.iter()
    }

    /// Ordinary nodes only.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.nodes()
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.graph.node(id)
    }

    /// All edges, including the ones touching exotic nodes.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.graph.edges()
    }

    pub fn in_edges(&self, id: &NodeId) -> Vec<&Edge> {
        self.graph.in_edges(id)
    }

    pub fn out_edges(&self, id: &NodeId) -> Vec<&Edge> {
        self.graph.out_edges(id)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn has_referential_integrity(&self) -> bool {
        self.graph
            .edges()
            .all(|edge| self.contains_node(&edge.start) && self.contains_node(&edge.end))
    }

    pub fn partition_edges(&self) -> EdgePartition<'_> {
        let mut partition = EdgePartition::default();
        for edge in self.graph.edges() {
            match (self.is_exotic(&edge.start), self.is_exotic(&edge.end)) {
                (false, false) => partition.between_ordinary.push(edge),
                (true, false) => partition.exotic_to_ordinary.push(edge),
                (false, true) => partition.ordinary_to_exotic.push(edge),
                (true, true) => partition.between_exotic.push(edge),
            }
        }
        partition
    }

    /// The graph left after removing every exotic node and its edges.
    pub fn ordinary_subgraph(&self) -> Graph {
        let mut graph = Graph::new();
        graph.add_nodes_from(self.graph.nodes().cloned());
        for edge in self.partition_edges().between_ordinary {
            graph.add_edge_unchecked(edge.clone());
        }
        graph
    }

    fn check_exotic_edge(&self, edge: &Edge) -> Result<(), GrammarError> {
        if self.is_exotic(&edge.start) && self.is_exotic(&edge.end) {
            return Err(GrammarError::invalid_exotic_graph(format!(
                "edges between {} nodes are not allowed ({} -> {})",
                self.kind.as_str(),
                edge.start,
                edge.end
            )));
        }
        Ok(())
    }

    fn remove_exotic(&mut self, id: &NodeId) -> Option<Node> {
        let node = self.exotic.remove(id)?;
        self.graph.detach(id);
        Some(node)
    }
}
