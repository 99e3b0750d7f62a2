use super::{Rewrite, fresh_ids};
use crate::{
    errors::GrammarError,
    graph::{Edge, Graph, Labels, NAME_LABEL, Node, NodeId, symbol_labels},
};

/// Rewrites one node carrying the left-hand side symbol into a copy of the
/// replacement graph. The replacement's `base` node inherits every edge of
/// the rewritten node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextFreeRule {
    name: String,
    lhs: Labels,
    rhs: Graph,
}

impl ContextFreeRule {
    pub fn new(name: impl Into<String>, lhs: &str, rhs: Graph) -> Result<Self, GrammarError> {
        Self::with_lhs_labels(name, symbol_labels(lhs), rhs)
    }

    /// Like [`ContextFreeRule::new`], keeping extra labels written on the
    /// left-hand side element.
    pub fn with_lhs_labels(name: impl Into<String>, mut lhs: Labels, rhs: Graph) -> Result<Self, GrammarError> {
        let name = name.into();
        if !rhs.contains_node(&NodeId::base()) {
            return Err(GrammarError::invalid_rule(format!(
                "context-free rule '{name}' has no 'base' node in its replacement graph"
            )));
        }
        lhs.entry(NAME_LABEL.to_string()).or_default();
        Ok(Self { name, lhs, rhs })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lhs_symbol(&self) -> &str {
        self.lhs.get(NAME_LABEL).map(String::as_str).unwrap_or("")
    }

    pub fn lhs_labels(&self) -> &Labels {
        &self.lhs
    }

    pub fn rhs(&self) -> &Graph {
        &self.rhs
    }

    /// Ids of the target nodes whose symbol equals the left-hand side.
    pub fn find_matches(&self, target: &Graph) -> Vec<NodeId> {
        let symbol = self.lhs_symbol();
        target
            .nodes()
            .filter(|node| node.symbol() == symbol)
            .map(|node| node.id.clone())
            .collect()
    }

    pub fn apply<F>(&self, node: &NodeId, target: &mut Graph, generate: &mut F) -> Result<Rewrite, GrammarError>
    where
        F: FnMut(&NodeId) -> NodeId,
    {
        let symbol = target
            .symbol(node)
            .ok_or_else(|| GrammarError::node_absent(format!("rule '{}': no node has '{node}' as its id", self.name)))?;
        if symbol != self.lhs_symbol() {
            return Err(GrammarError::rule_application(format!(
                "rule '{}' rewrites '{}' but node '{node}' is a '{symbol}'",
                self.name,
                self.lhs_symbol()
            )));
        }

        let fresh = fresh_ids(&self.name, self.rhs.node_ids(), target, generate)?;
        let base = fresh
            .get(&NodeId::base())
            .cloned()
            .ok_or_else(|| GrammarError::invalid_rule(format!("rule '{}' lost its 'base' node", self.name)))?;

        let incoming: Vec<Edge> = target.in_edges(node).into_iter().cloned().collect();
        let outgoing: Vec<Edge> = target.out_edges(node).into_iter().cloned().collect();

        for rhs_node in self.rhs.nodes() {
            target.add_node(Node {
                id: fresh[&rhs_node.id].clone(),
                labels: rhs_node.labels.clone(),
            });
        }
        for rhs_edge in self.rhs.edges() {
            target.add_edge(rhs_edge.remapped(fresh[&rhs_edge.start].clone(), fresh[&rhs_edge.end].clone()))?;
        }

        for edge in incoming {
            let start = if &edge.start == node { base.clone() } else { edge.start.clone() };
            target.add_edge(edge.remapped(start, base.clone()))?;
        }
        for edge in outgoing {
            let end = if &edge.end == node { base.clone() } else { edge.end.clone() };
            target.add_edge(edge.remapped(base.clone(), end))?;
        }

        target.remove_node(node)?;
        Ok(Rewrite {
            added: fresh.into_values().collect(),
            removed: vec![node.clone()],
        })
    }
}
