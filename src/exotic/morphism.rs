use std::collections::BTreeMap;

use crate::graph::NodeId;

/// Partial map from pattern node ids to target node ids.
///
/// Every pattern node appears as a key. Wildcards that found no target node
/// are kept as unmatched (`None`) entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Morphism {
    bindings: BTreeMap<NodeId, Option<NodeId>>,
}

impl Morphism {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, pattern: NodeId, target: NodeId) {
        self.bindings.insert(pattern, Some(target));
    }

    pub fn unmatch(&mut self, pattern: NodeId) {
        self.bindings.insert(pattern, None);
    }

    /// Target bound to `pattern`; `None` when unmatched or unknown.
    pub fn get(&self, pattern: &NodeId) -> Option<&NodeId> {
        self.bindings.get(pattern).and_then(Option::as_ref)
    }

    pub fn contains(&self, pattern: &NodeId) -> bool {
        self.bindings.contains_key(pattern)
    }

    pub fn is_unmatched(&self, pattern: &NodeId) -> bool {
        matches!(self.bindings.get(pattern), Some(None))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, Option<&NodeId>)> {
        self.bindings
            .iter()
            .map(|(pattern, target)| (pattern, target.as_ref()))
    }

    /// Bound target ids, unmatched entries skipped.
    pub fn targets(&self) -> impl Iterator<Item = &NodeId> {
        self.bindings.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl FromIterator<(NodeId, Option<NodeId>)> for Morphism {
    fn from_iter<I: IntoIterator<Item = (NodeId, Option<NodeId>)>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<(NodeId, NodeId)> for Morphism {
    fn from_iter<I: IntoIterator<Item = (NodeId, NodeId)>>(iter: I) -> Self {
        Self {
            bindings: iter
                .into_iter()
                .map(|(pattern, target)| (pattern, Some(target)))
                .collect(),
        }
    }
}
