//! Step-by-step derivation of a working graph.
//!
//! A [`Derivation`] binds a grammar to one working graph and an id pool.
//! The caller lists the applicable rules, picks a rule and a match, and
//! applies it; ids of removed nodes go back to the pool. Nodes and edges
//! can also be edited by hand, under the same vocabulary checks.

use std::{collections::BTreeMap, iter};

use tracing::debug;

use crate::{
    config::IdPoolConfig,
    errors::GrammarError,
    grammar::Grammar,
    graph::{Edge, Graph, Labels, NAME_LABEL, Node, NodeId},
    id_pool::IdPool,
    rule::{Rewrite, RuleMatch},
};

#[derive(Clone, Debug)]
pub struct Derivation {
    grammar: Grammar,
    pool: IdPool,
    initial: Graph,
    graph: Graph,
}

impl Derivation {
    /// Starts from the grammar's start graph, renumbering its nodes with
    /// ids drawn from the pool.
    pub fn new(grammar: Grammar, config: IdPoolConfig) -> Result<Self, GrammarError> {
        let start = grammar
            .start_graph()
            .ok_or_else(|| GrammarError::missing_element("the grammar has no start graph"))?;
        let mut pool = IdPool::new(config);
        let renamed: BTreeMap<NodeId, NodeId> = start.node_ids().map(|id| (id.clone(), pool.pop())).collect();

        let mut graph = Graph::new();
        for node in start.nodes() {
            graph.add_node(Node {
                id: renamed[&node.id].clone(),
                labels: node.labels.clone(),
            });
        }
        for edge in start.edges() {
            graph.add_edge(edge.remapped(renamed[&edge.start].clone(), renamed[&edge.end].clone()))?;
        }

        debug!(nodes = graph.node_count(), edges = graph.edge_count(), "derivation started");
        Ok(Self {
            grammar,
            pool,
            initial: graph.clone(),
            graph,
        })
    }

    /// Continues from an existing graph whose symbols must all belong to the
    /// grammar's vocabulary. Its numeric ids are reserved in the pool.
    pub fn with_graph(grammar: Grammar, graph: Graph, config: IdPoolConfig) -> Result<Self, GrammarError> {
        grammar.check_graph_vocabulary(&graph, "the working graph")?;
        let mut pool = IdPool::new(config);
        pool.reserve(graph.node_ids());
        Ok(Self {
            grammar,
            pool,
            initial: graph.clone(),
            graph,
        })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }

    pub fn get_id_pool(&self) -> &IdPool {
        &self.pool
    }

    pub fn get_symbol(&self, id: &NodeId) -> Option<&str> {
        self.graph.symbol(id)
    }

    pub fn get_label(&self, id: &NodeId, label: &str) -> Option<&str> {
        self.graph.node(id).and_then(|node| node.label(label))
    }

    /// Adds a node carrying `symbol` under an id drawn from the pool.
    /// A `name` entry in `labels` is replaced by `symbol`.
    pub fn add_node(&mut self, symbol: &str, mut labels: Labels) -> Result<NodeId, GrammarError> {
        labels.insert(NAME_LABEL.to_string(), symbol.to_string());
        let id = self.pool.pop();
        let node = Node::new(id.clone(), labels);
        if let Err(e) = self
            .grammar
            .check_elements(iter::once(&node), iter::empty::<&Edge>(), "the working graph")
        {
            self.pool.push(&id);
            return Err(e);
        }
        self.graph.add_node(node);
        debug!(%id, symbol, "node added");
        Ok(id)
    }

    /// Removes a node with its edges and gives its id back to the pool.
    pub fn remove_node(&mut self, id: &NodeId) -> Result<Node, GrammarError> {
        let node = self.graph.remove_node(id)?;
        self.pool.push(id);
        debug!(%id, "node removed");
        Ok(node)
    }

    /// Adds an edge between two nodes of the working graph. Its symbol is
    /// checked when the grammar checks edge labels.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), GrammarError> {
        self.grammar
            .check_elements(iter::empty::<&Node>(), iter::once(&edge), "the working graph")?;
        self.graph.add_edge(edge)
    }

    pub fn remove_edge(&mut self, start: &NodeId, end: &NodeId) -> Result<Edge, GrammarError> {
        self.graph.remove_edge(start, end)
    }

    /// Returns to the initial graph.
    pub fn reset(&mut self) {
        self.graph = self.initial.clone();
        self.pool.reset();
        self.pool.reserve(self.graph.node_ids());
    }

    pub fn get_applicable_rule(&self) -> BTreeMap<String, Vec<RuleMatch>> {
        self.grammar.applicable_rules(&self.graph)
    }

    pub fn has_applicable_rule(&self) -> bool {
        !self.get_applicable_rule().is_empty()
    }

    pub fn apply_rule(&mut self, name: &str, found: &RuleMatch) -> Result<Rewrite, GrammarError> {
        let mut issued = Vec::new();
        let result = {
            let pool = &mut self.pool;
            let mut generate = |_: &NodeId| {
                let id = pool.pop();
                issued.push(id.clone());
                id
            };
            self.grammar.apply_rule(name, found, &mut self.graph, &mut generate)
        };

        match result {
            Ok(rewrite) => {
                for id in &rewrite.removed {
                    self.pool.push(id);
                }
                debug!(
                    rule = name,
                    added = rewrite.added.len(),
                    removed = rewrite.removed.len(),
                    "rule applied"
                );
                Ok(rewrite)
            }
            Err(e) => {
                for id in issued.iter().filter(|id| !self.graph.contains_node(id)) {
                    self.pool.push(id);
                }
                Err(e)
            }
        }
    }

    pub fn is_sentence(&self) -> bool {
        self.grammar.is_sentence(&self.graph)
    }

    pub fn terminal_nodes(&self) -> Vec<NodeId> {
        self.nodes_where(|symbol| self.grammar.is_terminal_symbol(symbol))
    }

    pub fn non_terminal_nodes(&self) -> Vec<NodeId> {
        self.nodes_where(|symbol| self.grammar.is_non_terminal_symbol(symbol))
    }

    fn nodes_where(&self, keep: impl Fn(&str) -> bool) -> Vec<NodeId> {
        self.graph
            .nodes()
            .filter(|node| keep(node.symbol()))
            .map(|node| node.id.clone())
            .collect()
    }
}
