//! Production rules.
//!
//! A rule pairs a left-hand side pattern with a replacement graph. Three
//! kinds exist: context-free rules rewrite a single node, anchor and
//! wildcard rules rewrite a matched region around exotic splice points.
//! Matching is a pure read of the target; applying mutates it in place.

mod bundle;
mod context_free;
mod exotic_rule;

pub use bundle::RuleBundle;
pub use context_free::ContextFreeRule;
pub use exotic_rule::ExoticRule;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    errors::GrammarError,
    exotic::{ExoticGraph, ExoticKind, MatchContext, Morphism},
    graph::{Graph, NodeId},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    ContextFree,
    Anchor,
    Wildcard,
}

impl RuleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleKind::ContextFree => "context_free",
            RuleKind::Anchor => "anchor",
            RuleKind::Wildcard => "wildcard",
        }
    }

    pub fn exotic_kind(self) -> Option<ExoticKind> {
        match self {
            RuleKind::ContextFree => None,
            RuleKind::Anchor => Some(ExoticKind::Anchor),
            RuleKind::Wildcard => Some(ExoticKind::Wildcard),
        }
    }
}

impl From<ExoticKind> for RuleKind {
    fn from(kind: ExoticKind) -> Self {
        match kind {
            ExoticKind::Anchor => RuleKind::Anchor,
            ExoticKind::Wildcard => RuleKind::Wildcard,
        }
    }
}

/// Where a rule can be applied: a single node for context-free rules, a
/// morphism of the left-hand side otherwise.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum RuleMatch {
    Node(NodeId),
    Morphism(Morphism),
}

/// Node ids a rule application added to and removed from the target.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rewrite {
    pub added: Vec<NodeId>,
    pub removed: Vec<NodeId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rule {
    ContextFree(ContextFreeRule),
    Anchor(ExoticRule),
    Wildcard(ExoticRule),
}

impl Rule {
    pub fn context_free(name: impl Into<String>, lhs: &str, rhs: Graph) -> Result<Self, GrammarError> {
        ContextFreeRule::new(name, lhs, rhs).map(Rule::ContextFree)
    }

    pub fn anchor(name: impl Into<String>, lhs: ExoticGraph, rhs: ExoticGraph) -> Result<Self, GrammarError> {
        Self::exotic_of(ExoticKind::Anchor, name.into(), lhs, rhs)
    }

    pub fn wildcard(name: impl Into<String>, lhs: ExoticGraph, rhs: ExoticGraph) -> Result<Self, GrammarError> {
        Self::exotic_of(ExoticKind::Wildcard, name.into(), lhs, rhs)
    }

    fn exotic_of(
        kind: ExoticKind,
        name: String,
        lhs: ExoticGraph,
        rhs: ExoticGraph,
    ) -> Result<Self, GrammarError> {
        if lhs.kind() != kind {
            return Err(GrammarError::type_mismatch(format!(
                "rule '{name}' expects a {} graph as left-hand side, got a {} graph",
                kind.as_str(),
                lhs.kind().as_str()
            )));
        }
        Ok(ExoticRule::new(name, lhs, rhs)?.into())
    }

    pub fn name(&self) -> &str {
        match self {
            Rule::ContextFree(rule) => rule.name(),
            Rule::Anchor(rule) | Rule::Wildcard(rule) => rule.name(),
        }
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            Rule::ContextFree(_) => RuleKind::ContextFree,
            Rule::Anchor(_) => RuleKind::Anchor,
            Rule::Wildcard(_) => RuleKind::Wildcard,
        }
    }

    pub fn find_matches(&self, target: &Graph) -> Vec<RuleMatch> {
        self.find_matches_in(&MatchContext::new(target))
    }

    /// Matches against a target already indexed in `ctx`.
    pub fn find_matches_in(&self, ctx: &MatchContext<'_>) -> Vec<RuleMatch> {
        match self {
            Rule::ContextFree(rule) => rule
                .find_matches(ctx.target())
                .into_iter()
                .map(RuleMatch::Node)
                .collect(),
            Rule::Anchor(rule) | Rule::Wildcard(rule) => rule
                .find_matches_in(ctx)
                .into_iter()
                .map(RuleMatch::Morphism)
                .collect(),
        }
    }

    /// Rewrites `target` at `found`, drawing new node ids from `generate`.
    ///
    /// The match must come from this rule and still be current; a node
    /// removed since matching is reported, never silently skipped.
    pub fn apply<F>(&self, found: &RuleMatch, target: &mut Graph, generate: &mut F) -> Result<Rewrite, GrammarError>
    where
        F: FnMut(&NodeId) -> NodeId,
    {
        debug!(rule = self.name(), kind = self.kind().as_str(), "applying rule");
        match (self, found) {
            (Rule::ContextFree(rule), RuleMatch::Node(node)) => rule.apply(node, target, generate),
            (Rule::Anchor(rule) | Rule::Wildcard(rule), RuleMatch::Morphism(morphism)) => {
                rule.apply(morphism, target, generate)
            }
            (rule, _) => Err(GrammarError::type_mismatch(format!(
                "match shape does not fit {} rule '{}'",
                rule.kind().as_str(),
                rule.name()
            ))),
        }
    }
}

impl From<ContextFreeRule> for Rule {
    fn from(rule: ContextFreeRule) -> Self {
        Rule::ContextFree(rule)
    }
}

impl From<ExoticRule> for Rule {
    fn from(rule: ExoticRule) -> Self {
        match rule.kind() {
            ExoticKind::Anchor => Rule::Anchor(rule),
            ExoticKind::Wildcard => Rule::Wildcard(rule),
        }
    }
}

/// Draws one fresh id per local id. Fails before anything is mutated when
/// the generator repeats itself or returns an id the target already holds.
pub(crate) fn fresh_ids<'a, F>(
    rule: &str,
    local: impl IntoIterator<Item = &'a NodeId>,
    target: &Graph,
    generate: &mut F,
) -> Result<BTreeMap<NodeId, NodeId>, GrammarError>
where
    F: FnMut(&NodeId) -> NodeId,
{
    let mut fresh = BTreeMap::new();
    let mut issued = BTreeSet::new();
    for id in local {
        let new_id = generate(id);
        if target.contains_node(&new_id) || !issued.insert(new_id.clone()) {
            return Err(GrammarError::duplicate_id(format!(
                "rule '{rule}': id generator returned '{new_id}' for '{id}', which is already in use"
            )));
        }
        fresh.insert(id.clone(), new_id);
    }
    Ok(fresh)
}
