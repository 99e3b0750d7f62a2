//! Id-keyed node and edge storage.
//!
//! Nodes and edges only refer to each other by [`NodeId`]; the bundles are
//! flat ordered maps so iteration is deterministic.

use std::collections::{BTreeMap, BTreeSet};

use super::types::{Edge, Labels, Node, NodeId};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeBundle {
    nodes: BTreeMap<NodeId, Node>,
}

impl NodeBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the node, replacing any node with the same id.
    pub fn insert(&mut self, node: Node) -> Option<Node> {
        self.nodes.insert(node.id.clone(), node)
    }

    pub fn remove(&mut self, id: &NodeId) -> Option<Node> {
        self.nodes.remove(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn labels(&self, id: &NodeId) -> Option<&Labels> {
        self.nodes.get(id).map(|node| &node.labels)
    }

    pub fn ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.keys()
    }

    pub fn id_set(&self) -> BTreeSet<NodeId> {
        self.nodes.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Directed edges keyed by `(start, end)`, at most one per ordered pair.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeBundle {
    forward: BTreeMap<NodeId, BTreeMap<NodeId, Edge>>,
    reverse: BTreeMap<NodeId, BTreeSet<NodeId>>,
}

impl EdgeBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the edge, replacing an edge with the same endpoints.
    pub fn insert(&mut self, edge: Edge) -> Option<Edge> {
        self.reverse
            .entry(edge.end.clone())
            .or_default()
            .insert(edge.start.clone());
        self.forward
            .entry(edge.start.clone())
            .or_default()
            .insert(edge.end.clone(), edge)
    }

    pub fn remove(&mut self, start: &NodeId, end: &NodeId) -> Option<Edge> {
        let targets = self.forward.get_mut(start)?;
        let removed = targets.remove(end)?;
        if targets.is_empty() {
            self.forward.remove(start);
        }
        if let Some(sources) = self.reverse.get_mut(end) {
            sources.remove(start);
            if sources.is_empty() {
                self.reverse.remove(end);
            }
        }
        Some(removed)
    }

    pub fn get(&self, start: &NodeId, end: &NodeId) -> Option<&Edge> {
        self.forward.get(start).and_then(|targets| targets.get(end))
    }

    pub fn contains(&self, start: &NodeId, end: &NodeId) -> bool {
        self.get(start, end).is_some()
    }

    pub fn outgoing(&self, id: &NodeId) -> Vec<&Edge> {
        self.forward
            .get(id)
            .map(|targets| targets.values().collect())
            .unwrap_or_default()
    }

    pub fn incoming(&self, id: &NodeId) -> Vec<&Edge> {
        let Some(sources) = self.reverse.get(id) else {
            return Vec::new();
        };
        sources
            .iter()
            .filter_map(|source| self.get(source, id))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Edge> {
        self.forward.values().flat_map(|targets| targets.values())
    }

    pub fn len(&self) -> usize {
        self.forward.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_bundle_keeps_reverse_index_in_sync() {
        let mut edges = EdgeBundle::new();
        edges.insert(Edge::with_symbol("a", "b", "x"));
        edges.insert(Edge::with_symbol("c", "b", "y"));
        assert_eq!(edges.incoming(&"b".into()).len(), 2);

        edges.remove(&"a".into(), &"b".into());
        let incoming = edges.incoming(&"b".into());
        assert_eq!(incoming.len(), 1);
        assert_eq!(incoming[0].start, NodeId::from("c"));
        assert!(edges.outgoing(&"a".into()).is_empty());
        assert_eq!(edges.len(), 1);
    }

    #[test]
    fn edge_bundle_replaces_same_pair() {
        let mut edges = EdgeBundle::new();
        edges.insert(Edge::with_symbol("a", "b", "x"));
        let previous = edges.insert(Edge::with_symbol("a", "b", "y"));
        assert_eq!(previous.map(|e| e.symbol().to_string()), Some("x".into()));
        assert_eq!(edges.len(), 1);
        assert_eq!(edges.get(&"a".into(), &"b".into()).unwrap().symbol(), "y");
    }
}
