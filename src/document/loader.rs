use std::collections::BTreeSet;

use tracing::debug;

use super::{EdgeElement, GrammarDocument, GraphElement, NodeElement, RuleElement, SymbolElement};
use crate::{
    config::GrammarConfig,
    errors::GrammarError,
    exotic::{ExoticGraph, ExoticKind},
    grammar::Grammar,
    graph::{Edge, Graph, Labels, NAME_LABEL, Node, NodeId},
    rule::{ContextFreeRule, ExoticRule, Rule, RuleKind},
};

pub(super) fn load_grammar(document: &GrammarDocument, config: &GrammarConfig) -> Result<Grammar, GrammarError> {
    let mut grammar = Grammar::with_config(config.clone());

    let terminals = document
        .terminal_symbols
        .as_ref()
        .ok_or_else(|| GrammarError::missing_element("terminal_symbols"))?;
    let non_terminals = document
        .non_terminal_symbols
        .as_ref()
        .ok_or_else(|| GrammarError::missing_element("non_terminal_symbols"))?;
    for symbol in terminals {
        grammar.define_terminal_symbol(symbol.as_str())?;
    }
    for symbol in non_terminals {
        grammar.define_non_terminal_symbol(symbol.as_str())?;
    }
    debug!(
        terminals = terminals.len(),
        non_terminals = non_terminals.len(),
        "symbols defined"
    );

    match (&document.start_symbol, document.start_graph.as_slice()) {
        (Some(_), [_, ..]) => {
            return Err(GrammarError::invalid_document(
                "both start_symbol and start_graph are present",
            ));
        }
        (Some(element), []) => {
            // A start symbol without a name leaves the grammar without a start graph.
            if let Some(symbol) = &element.name {
                grammar.define_start_symbol(symbol, element.attributes.clone())?;
                debug!(symbol = symbol.as_str(), "start symbol defined");
            }
        }
        (None, [element]) => {
            grammar.define_start_graph(parse_graph(element, false)?)?;
            debug!("start graph defined");
        }
        (None, []) => {}
        (None, elements) => {
            return Err(GrammarError::invalid_document(format!(
                "start_graph holds {} graphs, at most one is allowed",
                elements.len()
            )));
        }
    }

    let rules = document
        .production_rules
        .as_ref()
        .ok_or_else(|| GrammarError::missing_element("production_rules"))?;
    for element in rules {
        let rule = parse_rule(element, &config.acceptable_rule_kinds)?;
        grammar.add_rule(rule)?;
    }
    debug!(rules = grammar.rules().len(), "grammar loaded");
    Ok(grammar)
}

/// Parses a rule with the first kind, in priority order, whose left-hand
/// side is present in the element.
fn parse_rule(element: &RuleElement, kinds: &[RuleKind]) -> Result<Rule, GrammarError> {
    let name = element
        .name
        .as_deref()
        .ok_or_else(|| GrammarError::missing_attribute("a rule element has no 'name'"))?;
    for kind in kinds {
        match kind {
            RuleKind::ContextFree => {
                if let Some(lhs) = &element.nt {
                    return parse_context_free(name, lhs, element);
                }
            }
            RuleKind::Anchor => {
                if let Some(lhs) = &element.agraph {
                    return parse_exotic(name, ExoticKind::Anchor, lhs, element);
                }
            }
            RuleKind::Wildcard => {
                if let Some(lhs) = &element.wgraph {
                    return parse_exotic(name, ExoticKind::Wildcard, lhs, element);
                }
            }
        }
    }
    Err(GrammarError::unsupported_rule(format!(
        "rule '{name}' has no left-hand side of an accepted rule kind"
    )))
}

fn rhs_element<'a>(name: &str, element: &'a RuleElement) -> Result<&'a GraphElement, GrammarError> {
    element
        .graph
        .as_ref()
        .ok_or_else(|| GrammarError::missing_element(format!("rule '{name}' has no replacement 'graph'")))
}

fn parse_context_free(name: &str, lhs: &SymbolElement, element: &RuleElement) -> Result<Rule, GrammarError> {
    let symbol = lhs
        .name
        .as_ref()
        .ok_or_else(|| GrammarError::missing_attribute(format!("the 'nt' of rule '{name}' has no 'name'")))?;
    let mut labels = lhs.attributes.clone();
    labels.insert(NAME_LABEL.to_string(), symbol.clone());
    let rhs = parse_graph(rhs_element(name, element)?, true)?;
    Ok(ContextFreeRule::with_lhs_labels(name, labels, rhs)?.into())
}

fn parse_exotic(name: &str, kind: ExoticKind, lhs: &GraphElement, element: &RuleElement) -> Result<Rule, GrammarError> {
    let lhs = parse_exotic_graph(kind, lhs, &[])?;
    let inherited: Vec<Node> = lhs.exotic_nodes().cloned().collect();
    let rhs = parse_exotic_graph(kind, rhs_element(name, element)?, &inherited)?;
    Ok(ExoticRule::new(name, lhs, rhs)?.into())
}

/// Parses a plain graph element. With `require_base` the element must name
/// the symbol of its `base` node.
fn parse_graph(element: &GraphElement, require_base: bool) -> Result<Graph, GrammarError> {
    if !element.anodes.is_empty() || !element.wnodes.is_empty() {
        return Err(GrammarError::type_mismatch(
            "a plain graph element cannot declare anchor or wildcard nodes",
        ));
    }
    let mut graph = Graph::new();
    fill_graph(&mut graph, element, require_base)?;
    Ok(graph)
}

/// Parses an exotic graph element. `inherited` exotic nodes are added before
/// the element's own nodes, so the element may refer to them without
/// declaring them again.
fn parse_exotic_graph(
    kind: ExoticKind,
    element: &GraphElement,
    inherited: &[Node],
) -> Result<ExoticGraph, GrammarError> {
    let (own, foreign, tag) = match kind {
        ExoticKind::Anchor => (&element.anodes, &element.wnodes, "anodes"),
        ExoticKind::Wildcard => (&element.wnodes, &element.anodes, "wnodes"),
    };
    if !foreign.is_empty() {
        return Err(GrammarError::type_mismatch(format!(
            "a {} graph element may only declare '{tag}'",
            kind.as_str()
        )));
    }

    let mut graph = ExoticGraph::new(kind);
    for exotic in own {
        let id = exotic
            .id
            .clone()
            .ok_or_else(|| GrammarError::missing_attribute(format!("an entry of '{tag}' has no 'id'")))?;
        if graph.contains_node(&id) {
            return Err(GrammarError::duplicate_id(format!("{} '{id}' is declared twice", kind.as_str())));
        }
        graph.add_exotic_node(id, Labels::new());
    }
    for node in inherited {
        if !graph.contains_node(&node.id) {
            graph.add_exotic_node(node.id.clone(), node.labels.clone());
        }
    }
    fill_graph(&mut graph, element, false)?;
    Ok(graph)
}

/// Graph kinds a graph element can be parsed into.
trait ElementSink {
    fn has_node(&self, id: &NodeId) -> bool;
    fn has_edge(&self, start: &NodeId, end: &NodeId) -> bool;
    fn put_node(&mut self, node: Node);
    fn put_edge(&mut self, edge: Edge) -> Result<(), GrammarError>;
}

impl ElementSink for Graph {
    fn has_node(&self, id: &NodeId) -> bool {
        self.contains_node(id)
    }

    fn has_edge(&self, start: &NodeId, end: &NodeId) -> bool {
        self.contains_edge(start, end)
    }

    fn put_node(&mut self, node: Node) {
        self.add_node(node);
    }

    fn put_edge(&mut self, edge: Edge) -> Result<(), GrammarError> {
        self.add_edge(edge)
    }
}

impl ElementSink for ExoticGraph {
    fn has_node(&self, id: &NodeId) -> bool {
        self.contains_node(id)
    }

    fn has_edge(&self, start: &NodeId, end: &NodeId) -> bool {
        self.contains_edge(start, end)
    }

    fn put_node(&mut self, node: Node) {
        self.add_node(node);
    }

    fn put_edge(&mut self, edge: Edge) -> Result<(), GrammarError> {
        self.add_edge(edge)
    }
}

fn fill_graph<S: ElementSink>(sink: &mut S, element: &GraphElement, require_base: bool) -> Result<(), GrammarError> {
    match &element.base {
        Some(symbol) => {
            let base = NodeId::base();
            if sink.has_node(&base) {
                return Err(GrammarError::duplicate_id("node 'base' is declared twice"));
            }
            let mut labels = element.base_labels.clone();
            labels.insert(NAME_LABEL.to_string(), symbol.clone());
            sink.put_node(Node::new(base, labels));
        }
        None if require_base => {
            return Err(GrammarError::missing_attribute(
                "the replacement graph has no 'base' symbol",
            ));
        }
        None => {}
    }

    for element in &element.nodes {
        let node = parse_node(element)?;
        if sink.has_node(&node.id) {
            return Err(GrammarError::duplicate_id(format!("node '{}' is declared twice", node.id)));
        }
        sink.put_node(node);
    }

    let mut edge_ids = BTreeSet::new();
    for element in &element.edges {
        let edge = parse_edge(element)?;
        if let Some(id) = &edge.id {
            if !edge_ids.insert(id.clone()) {
                return Err(GrammarError::duplicate_id(format!("edge '{id}' is declared twice")));
            }
        }
        if sink.has_edge(&edge.start, &edge.end) {
            return Err(GrammarError::duplicate_id(format!(
                "edge {} -> {} is declared twice",
                edge.start, edge.end
            )));
        }
        sink.put_edge(edge)?;
    }
    Ok(())
}

fn parse_node(element: &NodeElement) -> Result<Node, GrammarError> {
    let id = element
        .id
        .clone()
        .ok_or_else(|| GrammarError::missing_attribute("a node element has no 'id'"))?;
    let mut labels = element.attributes.clone();
    labels.insert(NAME_LABEL.to_string(), element.name.clone().unwrap_or_default());
    Ok(Node::new(id, labels))
}

fn parse_edge(element: &EdgeElement) -> Result<Edge, GrammarError> {
    let id = element
        .id
        .as_ref()
        .ok_or_else(|| GrammarError::missing_attribute("an edge element has no 'id'"))?;
    let start = element
        .from
        .clone()
        .ok_or_else(|| GrammarError::missing_attribute(format!("edge '{id}' has no 'from'")))?;
    let end = element
        .to
        .clone()
        .ok_or_else(|| GrammarError::missing_attribute(format!("edge '{id}' has no 'to'")))?;
    let mut labels = element.attributes.clone();
    labels.insert(NAME_LABEL.to_string(), element.name.clone().unwrap_or_default());
    Ok(Edge::new(start, end, labels).with_id(id.to_string()))
}
