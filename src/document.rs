//! Grammar description documents.
//!
//! A document lists the terminal and non-terminal symbols, at most one of a
//! start symbol or a start graph, and the production rules. JSON is the
//! on-disk form. Loading is all-or-nothing: the first invalid element aborts
//! it and no partially built grammar is returned.
//!
//! ```rust
//! use graphgrammar::Grammar;
//!
//! let grammar = Grammar::from_json_str(r#"{
//!     "terminal_symbols": ["t"],
//!     "non_terminal_symbols": ["S"],
//!     "start_symbol": { "name": "S" },
//!     "production_rules": [
//!         { "name": "grow", "nt": { "name": "S" },
//!           "graph": { "base": "t", "nodes": [{ "id": "n", "name": "S" }],
//!                      "edges": [{ "id": "e", "from": "base", "to": "n" }] } }
//!     ]
//! }"#).unwrap();
//! assert_eq!(grammar.rules().len(), 1);
//! ```

mod emitter;
mod loader;

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::GrammarConfig,
    errors::GrammarError,
    grammar::Grammar,
    graph::{Labels, NodeId},
};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal_symbols: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_terminal_symbols: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_symbol: Option<SymbolElement>,
    /// At most one graph is accepted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub start_graph: Vec<GraphElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_rules: Option<Vec<RuleElement>>,
}

/// A symbol with the extra labels written next to it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub attributes: Labels,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphElement {
    /// Symbol of the `base` node this element declares, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub base_labels: Labels,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<NodeElement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<EdgeElement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub anodes: Vec<ExoticElement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub wnodes: Vec<ExoticElement>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub attributes: Labels,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub attributes: Labels,
}

/// Anchor or wildcard declaration; carries nothing but its id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExoticElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NodeId>,
}

/// Rule element. Exactly one left-hand side (`nt`, `agraph` or `wgraph`)
/// is expected next to the replacement `graph`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nt: Option<SymbolElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agraph: Option<GraphElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wgraph: Option<GraphElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph: Option<GraphElement>,
}

impl GrammarDocument {
    /// Fails with [`GrammarError::InvalidDocument`] when a node or edge
    /// label would collide with a key of its element.
    pub fn from_grammar(grammar: &Grammar) -> Result<Self, GrammarError> {
        emitter::emit_grammar(grammar)
    }

    pub fn to_grammar(&self, config: &GrammarConfig) -> Result<Grammar, GrammarError> {
        loader::load_grammar(self, config)
    }
}

impl Grammar {
    pub fn from_json_str(json: &str) -> Result<Self, GrammarError> {
        Self::from_json_str_with(json, &GrammarConfig::default())
    }

    pub fn from_json_str_with(json: &str, config: &GrammarConfig) -> Result<Self, GrammarError> {
        let document: GrammarDocument =
            serde_json::from_str(json).map_err(|e| GrammarError::serialization(e.to_string()))?;
        document.to_grammar(config)
    }

    pub fn to_json_string(&self) -> Result<String, GrammarError> {
        serde_json::to_string_pretty(&GrammarDocument::from_grammar(self)?)
            .map_err(|e| GrammarError::serialization(e.to_string()))
    }

    pub fn load_grammar<P: AsRef<Path>>(path: P) -> Result<Self, GrammarError> {
        Self::load_grammar_with(path, &GrammarConfig::default())
    }

    pub fn load_grammar_with<P: AsRef<Path>>(path: P, config: &GrammarConfig) -> Result<Self, GrammarError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading grammar");
        let file = File::open(path).map_err(|e| GrammarError::io(format!("{}: {e}", path.display())))?;
        let document: GrammarDocument = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| GrammarError::serialization(format!("{}: {e}", path.display())))?;
        document.to_grammar(config)
    }

    pub fn save_grammar<P: AsRef<Path>>(&self, path: P) -> Result<(), GrammarError> {
        let path = path.as_ref();
        let document = GrammarDocument::from_grammar(self)?;
        let file = File::create(path).map_err(|e| GrammarError::io(format!("{}: {e}", path.display())))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &document)
            .map_err(|e| GrammarError::serialization(e.to_string()))?;
        writer.flush().map_err(|e| GrammarError::io(e.to_string()))?;
        debug!(path = %path.display(), rules = self.rules().len(), "grammar saved");
        Ok(())
    }
}
