//! Subgraph matching of exotic patterns.
//!
//! The ordinary part of the pattern is embedded first with VF2, comparing
//! the `name` label of nodes and edges. Each embedding is then extended by
//! binding the exotic neighbours of every ordinary pattern node to target
//! neighbours outside the embedding.

use std::collections::BTreeMap;

use ahash::{AHashMap, AHashSet};
use petgraph::{
    algo::subgraph_isomorphisms_iter,
    graph::{DiGraph, NodeIndex},
};
use tracing::trace;

use super::{
    ExoticGraph, ExoticKind,
    morphism::Morphism,
    permutation::{Odometer, k_permutations},
};
use crate::graph::{Graph, NodeId};

/// Index over a target graph, built once and shared by every pattern
/// matched against the same target.
#[derive(Debug)]
pub struct MatchContext<'a> {
    target: &'a Graph,
    index: DiGraph<String, String>,
    ids: Vec<NodeId>,
}

impl<'a> MatchContext<'a> {
    pub fn new(target: &'a Graph) -> Self {
        let (index, ids) = symbol_index(target);
        Self { target, index, ids }
    }

    pub fn target(&self) -> &'a Graph {
        self.target
    }

    /// Node-induced embeddings of `pattern` into the target, keyed by pattern id.
    fn embeddings(&self, pattern: &Graph) -> Vec<BTreeMap<NodeId, NodeId>> {
        if pattern.is_empty() {
            return Vec::new();
        }
        let (pattern_index, pattern_ids) = symbol_index(pattern);
        let pattern_ref = &pattern_index;
        let target_ref = &self.index;
        let mut node_match = |a: &String, b: &String| a == b;
        let mut edge_match = |a: &String, b: &String| a == b;
        let Some(mappings) = subgraph_isomorphisms_iter(
            &pattern_ref,
            &target_ref,
            &mut node_match,
            &mut edge_match,
        ) else {
            return Vec::new();
        };
        mappings
            .map(|mapping| {
                mapping
                    .into_iter()
                    .enumerate()
                    .map(|(at, image)| (pattern_ids[at].clone(), self.ids[image].clone()))
                    .collect()
            })
            .collect()
    }
}

fn symbol_index(graph: &Graph) -> (DiGraph<String, String>, Vec<NodeId>) {
    let mut index = DiGraph::with_capacity(graph.node_count(), graph.edge_count());
    let mut positions: AHashMap<&NodeId, NodeIndex> = AHashMap::with_capacity(graph.node_count());
    let mut ids = Vec::with_capacity(graph.node_count());
    for node in graph.nodes() {
        let at = index.add_node(node.symbol().to_string());
        positions.insert(&node.id, at);
        ids.push(node.id.clone());
    }
    for edge in graph.edges() {
        if let (Some(&start), Some(&end)) = (positions.get(&edge.start), positions.get(&edge.end)) {
            index.add_edge(start, end, edge.symbol().to_string());
        }
    }
    (index, ids)
}

/// Exotic neighbours on one side of one ordinary pattern node, with every
/// admissible way of binding them.
struct Slot {
    exotics: Vec<NodeId>,
    choices: Vec<Vec<Option<NodeId>>>,
}

impl ExoticGraph {
    /// All morphisms of this pattern into `target`.
    pub fn find_matches(&self, target: &Graph) -> Vec<Morphism> {
        self.find_matches_in(&MatchContext::new(target))
    }

    /// All morphisms of this pattern into the target indexed by `ctx`.
    ///
    /// A pattern without ordinary nodes has no matches.
    pub fn find_matches_in(&self, ctx: &MatchContext<'_>) -> Vec<Morphism> {
        let pattern = self.ordinary_subgraph();
        let mut matches = Vec::new();
        for embedding in ctx.embeddings(&pattern) {
            let Some(slots) = self.slots(&embedding, ctx.target()) else {
                trace!(kind = self.kind.as_str(), ?embedding, "embedding rejected by degree or neighbourhood");
                continue;
            };
            let radices = slots.iter().map(|slot| slot.choices.len()).collect();
            for cursor in Odometer::new(radices) {
                if let Some(morphism) = self.combine(&embedding, &slots, &cursor) {
                    matches.push(morphism);
                }
            }
        }
        matches
    }

    fn slots(&self, embedding: &BTreeMap<NodeId, NodeId>, target: &Graph) -> Option<Vec<Slot>> {
        let image: AHashSet<&NodeId> = embedding.values().collect();
        let mut slots = Vec::new();
        for (pattern_id, target_id) in embedding {
            let pattern_in = self.in_edges(pattern_id);
            let pattern_out = self.out_edges(pattern_id);
            let target_in = target.in_edges(target_id);
            let target_out = target.out_edges(target_id);
            if !self.kind.admits_degree(pattern_in.len(), target_in.len())
                || !self.kind.admits_degree(pattern_out.len(), target_out.len())
            {
                return None;
            }

            let sides = [
                (
                    pattern_in.iter().map(|edge| &edge.start).collect::<Vec<_>>(),
                    target_in.iter().map(|edge| &edge.start).collect::<Vec<_>>(),
                ),
                (
                    pattern_out.iter().map(|edge| &edge.end).collect(),
                    target_out.iter().map(|edge| &edge.end).collect(),
                ),
            ];
            for (pattern_side, target_side) in sides {
                let exotics: Vec<NodeId> = pattern_side
                    .into_iter()
                    .filter(|id| self.is_exotic(id))
                    .cloned()
                    .collect();
                if exotics.is_empty() {
                    continue;
                }
                let candidates: Vec<NodeId> = target_side
                    .into_iter()
                    .filter(|id| !image.contains(id))
                    .cloned()
                    .collect();
                let choices = self.slot_choices(candidates, exotics.len());
                if choices.is_empty() {
                    return None;
                }
                slots.push(Slot { exotics, choices });
            }
        }
        Some(slots)
    }

    fn slot_choices(&self, candidates: Vec<NodeId>, wanted: usize) -> Vec<Vec<Option<NodeId>>> {
        let mut pool: Vec<Option<NodeId>> = candidates.into_iter().map(Some).collect();
        if self.kind == ExoticKind::Wildcard && pool.len() < wanted {
            pool.resize(wanted, None);
        }
        k_permutations(&pool, wanted)
    }

    /// Merges one choice per slot into a morphism, or `None` when the choices
    /// disagree on an exotic node or bind two exotic nodes to one target.
    fn combine(
        &self,
        embedding: &BTreeMap<NodeId, NodeId>,
        slots: &[Slot],
        cursor: &[usize],
    ) -> Option<Morphism> {
        let mut bound: BTreeMap<&NodeId, &Option<NodeId>> = BTreeMap::new();
        for (slot, &choice) in slots.iter().zip(cursor) {
            for (exotic, target) in slot.exotics.iter().zip(&slot.choices[choice]) {
                match bound.get(exotic) {
                    Some(&existing) if existing != target => return None,
                    Some(_) => {}
                    None => {
                        bound.insert(exotic, target);
                    }
                }
            }
        }

        let mut taken = AHashSet::new();
        if !bound.values().filter_map(|target| target.as_ref()).all(|target| taken.insert(target)) {
            return None;
        }

        let mut morphism: Morphism = embedding
            .iter()
            .map(|(pattern, target)| (pattern.clone(), target.clone()))
            .collect();
        for exotic in self.exotic.ids() {
            match bound.get(exotic) {
                Some(Some(target)) => morphism.bind(exotic.clone(), target.clone()),
                Some(None) => morphism.unmatch(exotic.clone()),
                None if self.kind == ExoticKind::Wildcard => morphism.unmatch(exotic.clone()),
                None => return None,
            }
        }
        Some(morphism)
    }
}
