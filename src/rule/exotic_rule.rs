use std::collections::BTreeSet;

use super::{Rewrite, fresh_ids};
use crate::{
    errors::GrammarError,
    exotic::{ExoticGraph, ExoticKind, MatchContext, Morphism},
    graph::{Graph, Node, NodeId},
};

/// Rule whose sides are exotic graphs of one kind.
///
/// Exotic nodes are the splice points: they are bound to existing target
/// nodes by the match and survive the rewrite, while the matched ordinary
/// nodes are replaced by fresh copies of the replacement's ordinary nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExoticRule {
    name: String,
    lhs: ExoticGraph,
    rhs: ExoticGraph,
}

impl ExoticRule {
    pub fn new(name: impl Into<String>, lhs: ExoticGraph, rhs: ExoticGraph) -> Result<Self, GrammarError> {
        let name = name.into();
        if lhs.kind() != rhs.kind() {
            return Err(GrammarError::type_mismatch(format!(
                "rule '{name}' mixes a {} left-hand side with a {} replacement",
                lhs.kind().as_str(),
                rhs.kind().as_str()
            )));
        }
        let lhs_ids = lhs.exotic_ids();
        let rhs_ids = rhs.exotic_ids();
        if lhs_ids != rhs_ids {
            return Err(GrammarError::invalid_rule(format!(
                "rule '{name}': {} ids differ between sides ({} vs {})",
                lhs.kind().as_str(),
                join(&lhs_ids),
                join(&rhs_ids)
            )));
        }
        Ok(Self { name, lhs, rhs })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ExoticKind {
        self.lhs.kind()
    }

    pub fn lhs(&self) -> &ExoticGraph {
        &self.lhs
    }

    pub fn rhs(&self) -> &ExoticGraph {
        &self.rhs
    }

    pub fn find_matches(&self, target: &Graph) -> Vec<Morphism> {
        self.lhs.find_matches(target)
    }

    pub fn find_matches_in(&self, ctx: &MatchContext<'_>) -> Vec<Morphism> {
        self.lhs.find_matches_in(ctx)
    }

    pub fn apply<F>(&self, morphism: &Morphism, target: &mut Graph, generate: &mut F) -> Result<Rewrite, GrammarError>
    where
        F: FnMut(&NodeId) -> NodeId,
    {
        let matched = self.check_morphism(morphism, target)?;
        let fresh = fresh_ids(&self.name, self.rhs.nodes().map(|node| &node.id), target, generate)?;

        for rhs_node in self.rhs.nodes() {
            target.add_node(Node {
                id: fresh[&rhs_node.id].clone(),
                labels: rhs_node.labels.clone(),
            });
        }

        let resolve = |id: &NodeId| -> Option<NodeId> {
            if self.rhs.is_exotic(id) {
                morphism.get(id).cloned()
            } else {
                fresh.get(id).cloned()
            }
        };
        for rhs_edge in self.rhs.edges() {
            // Unmatched wildcards take their edges with them.
            let (Some(start), Some(end)) = (resolve(&rhs_edge.start), resolve(&rhs_edge.end)) else {
                continue;
            };
            target.add_edge(rhs_edge.remapped(start, end))?;
        }

        target.remove_nodes_from(&matched)?;
        Ok(Rewrite {
            added: fresh.into_values().collect(),
            removed: matched,
        })
    }

    /// Target ids of the matched ordinary nodes, after checking the morphism
    /// covers the whole left-hand side and points at live, distinct nodes.
    /// Bound exotic nodes must also land on distinct targets.
    fn check_morphism(&self, morphism: &Morphism, target: &Graph) -> Result<Vec<NodeId>, GrammarError> {
        let mut matched = Vec::with_capacity(self.lhs.node_count());
        let mut seen = BTreeSet::new();
        for node in self.lhs.nodes() {
            let bound = morphism.get(&node.id).ok_or_else(|| {
                GrammarError::rule_application(format!(
                    "rule '{}': node '{}' of the left-hand side is not matched",
                    self.name, node.id
                ))
            })?;
            self.check_live(bound, target)?;
            if !seen.insert(bound) {
                return Err(GrammarError::rule_application(format!(
                    "rule '{}': target node '{bound}' is matched twice",
                    self.name
                )));
            }
            matched.push(bound.clone());
        }

        let mut context = BTreeSet::new();
        for exotic in self.lhs.exotic_ids() {
            if !morphism.contains(&exotic) {
                return Err(GrammarError::rule_application(format!(
                    "rule '{}': {} '{exotic}' is missing from the match",
                    self.name,
                    self.kind().as_str()
                )));
            }
            match morphism.get(&exotic) {
                Some(bound) => {
                    self.check_live(bound, target)?;
                    if seen.contains(bound) {
                        return Err(GrammarError::rule_application(format!(
                            "rule '{}': {} '{exotic}' is bound to matched node '{bound}'",
                            self.name,
                            self.kind().as_str()
                        )));
                    }
                    if !context.insert(bound) {
                        return Err(GrammarError::rule_application(format!(
                            "rule '{}': {} '{exotic}' shares target node '{bound}' with another {}",
                            self.name,
                            self.kind().as_str(),
                            self.kind().as_str()
                        )));
                    }
                }
                None if self.kind() == ExoticKind::Wildcard => {}
                None => {
                    return Err(GrammarError::rule_application(format!(
                        "rule '{}': anchor '{exotic}' is unmatched",
                        self.name
                    )));
                }
            }
        }
        Ok(matched)
    }

    fn check_live(&self, id: &NodeId, target: &Graph) -> Result<(), GrammarError> {
        if target.contains_node(id) {
            Ok(())
        } else {
            Err(GrammarError::node_absent(format!(
                "rule '{}': matched node '{id}' is no longer in the graph",
                self.name
            )))
        }
    }
}

fn join(ids: &BTreeSet<NodeId>) -> String {
    let parts: Vec<String> = ids.iter().map(ToString::to_string).collect();
    format!("{{{}}}", parts.join(", "))
}
