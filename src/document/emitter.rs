use std::collections::BTreeSet;

use super::{EdgeElement, ExoticElement, GrammarDocument, GraphElement, NodeElement, RuleElement, SymbolElement};
use crate::{
    exotic::{ExoticGraph, ExoticKind},
    grammar::Grammar,
    errors::GrammarError,
    graph::{Edge, Graph, Labels, NAME_LABEL, Node, NodeId},
    rule::Rule,
};

/// Keys of a node element that a flattened label must not reuse.
const NODE_KEYS: [&str; 1] = ["id"];
/// Keys of an edge element that a flattened label must not reuse.
const EDGE_KEYS: [&str; 3] = ["id", "from", "to"];

pub(super) fn emit_grammar(grammar: &Grammar) -> Result<GrammarDocument, GrammarError> {
    let mut document = GrammarDocument {
        // The empty symbol is implied.
        terminal_symbols: Some(
            grammar
                .terminal_symbols()
                .filter(|symbol| !symbol.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        non_terminal_symbols: Some(grammar.non_terminal_symbols().map(str::to_string).collect()),
        production_rules: Some(
            grammar
                .rules()
                .iter()
                .map(emit_rule)
                .collect::<Result<Vec<_>, GrammarError>>()?,
        ),
        ..GrammarDocument::default()
    };

    match (grammar.start_symbol(), grammar.start_graph()) {
        (Some(symbol), start) => {
            let attributes = start
                .and_then(|graph| graph.node(&NodeId::base()))
                .map(|node| without_name(&node.labels))
                .unwrap_or_default();
            document.start_symbol = Some(SymbolElement {
                name: Some(symbol.to_string()),
                attributes,
            });
        }
        (None, Some(graph)) => document.start_graph = vec![emit_graph(graph)?],
        (None, None) => {}
    }
    Ok(document)
}

fn emit_rule(rule: &Rule) -> Result<RuleElement, GrammarError> {
    let mut element = RuleElement {
        name: Some(rule.name().to_string()),
        ..RuleElement::default()
    };
    match rule {
        Rule::ContextFree(inner) => {
            element.nt = Some(SymbolElement {
                name: Some(inner.lhs_symbol().to_string()),
                attributes: without_name(inner.lhs_labels()),
            });
            element.graph = Some(emit_graph(inner.rhs())?);
        }
        Rule::Anchor(inner) | Rule::Wildcard(inner) => {
            let lhs = emit_exotic_graph(inner.lhs(), true)?;
            match inner.kind() {
                ExoticKind::Anchor => element.agraph = Some(lhs),
                ExoticKind::Wildcard => element.wgraph = Some(lhs),
            }
            // Exotic nodes of the replacement are inherited from the left-hand side.
            element.graph = Some(emit_exotic_graph(inner.rhs(), false)?);
        }
    }
    Ok(element)
}

fn emit_graph(graph: &Graph) -> Result<GraphElement, GrammarError> {
    emit_elements(graph.nodes(), graph.edges())
}

fn emit_exotic_graph(graph: &ExoticGraph, declare_exotics: bool) -> Result<GraphElement, GrammarError> {
    let mut element = emit_elements(graph.nodes(), graph.edges())?;
    if declare_exotics {
        let exotics: Vec<ExoticElement> = graph
            .exotic_nodes()
            .map(|node| ExoticElement {
                id: Some(node.id.clone()),
            })
            .collect();
        match graph.kind() {
            ExoticKind::Anchor => element.anodes = exotics,
            ExoticKind::Wildcard => element.wnodes = exotics,
        }
    }
    Ok(element)
}

fn emit_elements<'a>(
    nodes: impl Iterator<Item = &'a Node>,
    edges: impl Iterator<Item = &'a Edge>,
) -> Result<GraphElement, GrammarError> {
    let mut element = GraphElement::default();
    for node in nodes {
        if node.id.is_base() {
            element.base = Some(node.symbol().to_string());
            element.base_labels = without_name(&node.labels);
        } else {
            element.nodes.push(NodeElement {
                id: Some(node.id.clone()),
                name: Some(node.symbol().to_string()),
                attributes: flattened(&node.labels, &NODE_KEYS, || format!("node '{}'", node.id))?,
            });
        }
    }

    let edges: Vec<&Edge> = edges.collect();
    let mut taken: BTreeSet<String> = edges.iter().filter_map(|edge| edge.id.clone()).collect();
    let mut counter = 0usize;
    for edge in edges {
        // Edges built in code have no id; the document requires one.
        let id = match &edge.id {
            Some(id) => id.clone(),
            None => loop {
                counter += 1;
                let candidate = format!("e{counter}");
                if taken.insert(candidate.clone()) {
                    break candidate;
                }
            },
        };
        element.edges.push(EdgeElement {
            id: Some(NodeId::Name(id)),
            from: Some(edge.start.clone()),
            to: Some(edge.end.clone()),
            name: Some(edge.symbol().to_string()),
            attributes: flattened(&edge.labels, &EDGE_KEYS, || {
                format!("edge {} -> {}", edge.start, edge.end)
            })?,
        });
    }
    Ok(element)
}

/// Labels written inline next to the element's own keys.
fn flattened(
    labels: &Labels,
    reserved: &[&str],
    element: impl Fn() -> String,
) -> Result<Labels, GrammarError> {
    if let Some(key) = labels.keys().find(|key| reserved.contains(&key.as_str())) {
        return Err(GrammarError::invalid_document(format!(
            "{} carries a '{key}' label, which clashes with the element's own '{key}' key",
            element()
        )));
    }
    Ok(without_name(labels))
}

fn without_name(labels: &Labels) -> Labels {
    labels
        .iter()
        .filter(|(key, _)| key.as_str() != NAME_LABEL)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
