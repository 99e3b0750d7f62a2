//! Grammar: vocabulary, start graph and production rules.
//!
//! The terminal and non-terminal sets are disjoint. Every graph the grammar
//! accepts, start graph and rule sides alike, only uses symbols from their
//! union. The grammar never owns a working graph; callers pass theirs to
//! [`Grammar::applicable_rules`] and [`Grammar::apply_rule`].

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::{
    config::GrammarConfig,
    errors::GrammarError,
    exotic::{ExoticGraph, MatchContext},
    graph::{Edge, Graph, Labels, NAME_LABEL, Node, NodeId},
    rule::{Rewrite, Rule, RuleBundle, RuleKind, RuleMatch},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grammar {
    config: GrammarConfig,
    terminals: BTreeSet<String>,
    non_terminals: BTreeSet<String>,
    start_symbol: Option<String>,
    start_graph: Option<Graph>,
    rules: RuleBundle,
}

impl Default for Grammar {
    fn default() -> Self {
        Self::with_config(GrammarConfig::default())
    }
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GrammarConfig) -> Self {
        let mut terminals = BTreeSet::new();
        if config.empty_symbol_is_terminal {
            terminals.insert(String::new());
        }
        Self {
            config,
            terminals,
            non_terminals: BTreeSet::new(),
            start_symbol: None,
            start_graph: None,
            rules: RuleBundle::new(),
        }
    }

    pub fn config(&self) -> &GrammarConfig {
        &self.config
    }

    pub fn define_terminal_symbol(&mut self, symbol: impl Into<String>) -> Result<(), GrammarError> {
        let symbol = symbol.into();
        if self.non_terminals.contains(&symbol) {
            return Err(GrammarError::symbol_conflict(format!(
                "'{symbol}' is already defined as a non-terminal symbol"
            )));
        }
        self.terminals.insert(symbol);
        Ok(())
    }

    pub fn define_non_terminal_symbol(&mut self, symbol: impl Into<String>) -> Result<(), GrammarError> {
        let symbol = symbol.into();
        if self.terminals.contains(&symbol) {
            return Err(GrammarError::symbol_conflict(format!(
                "'{symbol}' is already defined as a terminal symbol"
            )));
        }
        self.non_terminals.insert(symbol);
        Ok(())
    }

    /// Returns whether the symbol was defined. A start graph using it is dropped.
    pub fn undefine_terminal_symbol(&mut self, symbol: &str) -> bool {
        let removed = self.terminals.remove(symbol);
        if removed {
            self.drop_start_using(symbol);
        }
        removed
    }

    /// Returns whether the symbol was defined. A start graph using it is dropped.
    pub fn undefine_non_terminal_symbol(&mut self, symbol: &str) -> bool {
        let removed = self.non_terminals.remove(symbol);
        if removed {
            self.drop_start_using(symbol);
        }
        removed
    }

    fn drop_start_using(&mut self, symbol: &str) {
        let used = self.start_symbol.as_deref() == Some(symbol)
            || self
                .start_graph
                .as_ref()
                .is_some_and(|graph| graph.contains_label(symbol));
        if used {
            self.undefine_start_graph();
        }
    }

    pub fn is_terminal_symbol(&self, symbol: &str) -> bool {
        self.terminals.contains(symbol)
    }

    pub fn is_non_terminal_symbol(&self, symbol: &str) -> bool {
        self.non_terminals.contains(symbol)
    }

    pub fn is_vocabulary(&self, symbol: &str) -> bool {
        self.is_terminal_symbol(symbol) || self.is_non_terminal_symbol(symbol)
    }

    pub fn terminal_symbols(&self) -> impl Iterator<Item = &str> {
        self.terminals.iter().map(String::as_str)
    }

    pub fn non_terminal_symbols(&self) -> impl Iterator<Item = &str> {
        self.non_terminals.iter().map(String::as_str)
    }

    /// Starts derivations from a single `base` node carrying `symbol`, which
    /// becomes a non-terminal symbol.
    pub fn define_start_symbol(&mut self, symbol: &str, mut labels: Labels) -> Result<(), GrammarError> {
        self.define_non_terminal_symbol(symbol)?;
        labels.insert(NAME_LABEL.to_string(), symbol.to_string());
        let mut graph = Graph::new();
        graph.add_node(Node::new(NodeId::base(), labels));
        self.start_graph = Some(graph);
        self.start_symbol = Some(symbol.to_string());
        Ok(())
    }

    pub fn define_start_graph(&mut self, graph: Graph) -> Result<(), GrammarError> {
        self.check_graph_vocabulary(&graph, "start graph")?;
        self.start_graph = Some(graph);
        self.start_symbol = None;
        Ok(())
    }

    pub fn undefine_start_graph(&mut self) {
        self.start_graph = None;
        self.start_symbol = None;
    }

    pub fn start_graph(&self) -> Option<&Graph> {
        self.start_graph.as_ref()
    }

    /// Set when the start graph was defined from a single symbol.
    pub fn start_symbol(&self) -> Option<&str> {
        self.start_symbol.as_deref()
    }

    /// True when every checked label of `graph` is in the vocabulary.
    pub fn is_symbol_graph(&self, graph: &Graph) -> bool {
        self.check_graph_vocabulary(graph, "graph").is_ok()
    }

    /// True when every node of `graph` carries a terminal symbol.
    pub fn is_sentence(&self, graph: &Graph) -> bool {
        graph.nodes().all(|node| self.is_terminal_symbol(node.symbol()))
    }

    pub fn check_graph_vocabulary(&self, graph: &Graph, context: &str) -> Result<(), GrammarError> {
        self.check_elements(graph.nodes(), graph.edges(), context)
    }

    /// Exotic nodes carry no symbol; only ordinary nodes and edges are checked.
    fn check_exotic_vocabulary(&self, graph: &ExoticGraph, context: &str) -> Result<(), GrammarError> {
        self.check_elements(graph.nodes(), graph.edges(), context)
    }

    pub(crate) fn check_elements<'a>(
        &self,
        nodes: impl Iterator<Item = &'a Node>,
        edges: impl Iterator<Item = &'a Edge>,
        context: &str,
    ) -> Result<(), GrammarError> {
        for node in nodes {
            self.check_symbol(node.symbol(), || format!("node '{}' of {context}", node.id))?;
        }
        if self.config.check_edge_labels {
            for edge in edges {
                self.check_symbol(edge.symbol(), || {
                    format!("edge {} -> {} of {context}", edge.start, edge.end)
                })?;
            }
        }
        Ok(())
    }

    fn check_symbol(&self, symbol: &str, location: impl FnOnce() -> String) -> Result<(), GrammarError> {
        if self.is_vocabulary(symbol) {
            Ok(())
        } else {
            Err(GrammarError::vocabulary(format!(
                "'{symbol}' used by {} is neither a terminal nor a non-terminal symbol",
                location()
            )))
        }
    }

    /// Registers a rule after checking both of its sides against the vocabulary.
    pub fn add_rule(&mut self, rule: Rule) -> Result<(), GrammarError> {
        let context = format!("rule '{}'", rule.name());
        match &rule {
            Rule::ContextFree(inner) => {
                self.check_symbol(inner.lhs_symbol(), || format!("the left-hand side of {context}"))?;
                self.check_graph_vocabulary(inner.rhs(), &context)?;
            }
            Rule::Anchor(inner) | Rule::Wildcard(inner) => {
                self.check_exotic_vocabulary(inner.lhs(), &context)?;
                self.check_exotic_vocabulary(inner.rhs(), &context)?;
            }
        }
        debug!(rule = rule.name(), kind = rule.kind().as_str(), "rule registered");
        self.rules.insert(rule)
    }

    pub fn undefine_rule(&mut self, name: &str) -> Result<Rule, GrammarError> {
        self.rules.remove(name)
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn rules(&self) -> &RuleBundle {
        &self.rules
    }

    pub fn rules_of_kind(&self, kind: RuleKind) -> impl Iterator<Item = &Rule> {
        self.rules.of_kind(kind)
    }

    /// Every rule with at least one match in `graph`, with its matches.
    /// The target is indexed once and shared by all rules.
    pub fn applicable_rules(&self, graph: &Graph) -> BTreeMap<String, Vec<RuleMatch>> {
        let ctx = MatchContext::new(graph);
        self.rules
            .iter()
            .filter_map(|rule| {
                let found = rule.find_matches_in(&ctx);
                (!found.is_empty()).then(|| (rule.name().to_string(), found))
            })
            .collect()
    }

    pub fn apply_rule<F>(
        &self,
        name: &str,
        found: &RuleMatch,
        graph: &mut Graph,
        generate: &mut F,
    ) -> Result<Rewrite, GrammarError>
    where
        F: FnMut(&NodeId) -> NodeId,
    {
        let rule = self
            .rules
            .get(name)
            .ok_or_else(|| GrammarError::rule_absent(format!("no rule named '{name}'")))?;
        rule.apply(found, graph, generate)
    }
}
