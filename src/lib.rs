//! Graph-grammar rewriting over labelled directed graphs.
//!
//! graphgrammar finds where a production rule's left-hand side occurs in a
//! working graph and replaces the matched region with the rule's replacement
//! graph. Symbols are the `name` labels of nodes and edges, split into
//! terminal and non-terminal sets by the [`Grammar`].
//!
//! # Features
//!
//! - **Labelled Graphs**: id-keyed nodes and edges with cascading node removal
//! - **Exotic Patterns**: anchor nodes that must bind to a neighbour, wildcard nodes that may stay unmatched
//! - **Three Rule Kinds**: context-free, anchor and wildcard rules behind one [`Rule`] enum
//! - **Grammar Documents**: JSON load/save with vocabulary validation
//! - **Derivations**: a working graph bound to a grammar and a chunked id pool
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use graphgrammar::{Derivation, Grammar, IdPoolConfig};
//!
//! let grammar = Grammar::load_grammar("robot.json")?;
//! let mut derivation = Derivation::new(grammar, IdPoolConfig::default())?;
//! while !derivation.is_sentence() {
//!     let applicable = derivation.get_applicable_rule();
//!     let Some((name, matches)) = applicable.into_iter().next() else { break };
//!     derivation.apply_rule(&name, &matches[0])?;
//! }
//! # Ok::<(), graphgrammar::GrammarError>(())
//! ```
//!
//! # Public API Organization
//!
//! ## Graph Model
//! - [`Graph`], [`Node`], [`Edge`], [`NodeId`] - labelled directed graph
//! - [`ExoticGraph`], [`ExoticKind`] - graphs with anchor or wildcard nodes
//! - [`Morphism`], [`MatchContext`] - match results and the shared target index
//!
//! ## Rules and Grammar
//! - [`Rule`], [`RuleKind`], [`RuleMatch`], [`RuleBundle`] - production rules
//! - [`Grammar`] - vocabulary, start graph and rule registry
//! - [`GrammarDocument`] - serialized form of a grammar
//!
//! ## Driving
//! - [`Derivation`] - working graph plus id pool
//! - [`IdPool`] - chunked free-list of numeric ids
//!
//! ## Utilities
//! - [`GrammarError`] - error type of every fallible operation
//! - [`GrammarConfig`], [`IdPoolConfig`] - options

pub mod config;
pub mod derivation;
pub mod document;
pub mod errors;
pub mod exotic;
pub mod grammar;
pub mod graph;
pub mod id_pool;
pub mod rule;

pub use config::{GrammarConfig, IdPoolConfig};
pub use derivation::Derivation;
pub use document::{
    EdgeElement, ExoticElement, GrammarDocument, GraphElement, NodeElement, RuleElement, SymbolElement,
};
pub use errors::GrammarError;
pub use exotic::{EdgePartition, ExoticGraph, ExoticKind, MatchContext, Morphism};
pub use grammar::Grammar;
pub use graph::{BASE_NODE_ID, Edge, EdgeBundle, Graph, Labels, NAME_LABEL, Node, NodeBundle, NodeId, symbol_labels};
pub use id_pool::IdPool;
pub use rule::{ContextFreeRule, ExoticRule, Rewrite, Rule, RuleBundle, RuleKind, RuleMatch};
