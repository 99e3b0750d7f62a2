use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// Label name reserved for the symbol of a node or an edge.
pub const NAME_LABEL: &str = "name";

/// Node id reserved for the splice point of a replacement graph.
pub const BASE_NODE_ID: &str = "base";

/// Label name to label value. Every node and edge carries [`NAME_LABEL`].
pub type Labels = BTreeMap<String, String>;

/// Opaque node identity.
///
/// Rule and start graphs use the names written in the grammar document;
/// working graphs use numbers handed out by an id generator.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    Num(u64),
    Name(String),
}

impl NodeId {
    pub fn base() -> Self {
        NodeId::Name(BASE_NODE_ID.to_string())
    }

    pub fn is_base(&self) -> bool {
        matches!(self, NodeId::Name(name) if name == BASE_NODE_ID)
    }

    pub fn as_num(&self) -> Option<u64> {
        match self {
            NodeId::Num(value) => Some(*value),
            NodeId::Name(_) => None,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Num(value) => write!(f, "{value}"),
            NodeId::Name(name) => write!(f, "{name}"),
        }
    }
}

impl From<u64> for NodeId {
    fn from(value: u64) -> Self {
        NodeId::Num(value)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        NodeId::Name(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        NodeId::Name(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub labels: Labels,
}

impl Node {
    /// Creates a node, filling the `name` label with `""` when it is absent.
    pub fn new(id: impl Into<NodeId>, mut labels: Labels) -> Self {
        labels.entry(NAME_LABEL.to_string()).or_default();
        Self {
            id: id.into(),
            labels,
        }
    }

    pub fn with_symbol(id: impl Into<NodeId>, symbol: &str) -> Self {
        Self::new(id, symbol_labels(symbol))
    }

    pub fn symbol(&self) -> &str {
        self.labels.get(NAME_LABEL).map(String::as_str).unwrap_or("")
    }

    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels.get(name).map(String::as_str)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Edge {
    pub start: NodeId,
    pub end: NodeId,
    pub labels: Labels,
    /// Identifier written in the grammar document, only used to detect duplicates while parsing.
    pub id: Option<String>,
}

impl Edge {
    /// Creates an edge, filling the `name` label with `""` when it is absent.
    pub fn new(start: impl Into<NodeId>, end: impl Into<NodeId>, mut labels: Labels) -> Self {
        labels.entry(NAME_LABEL.to_string()).or_default();
        Self {
            start: start.into(),
            end: end.into(),
            labels,
            id: None,
        }
    }

    pub fn with_symbol(start: impl Into<NodeId>, end: impl Into<NodeId>, symbol: &str) -> Self {
        Self::new(start, end, symbol_labels(symbol))
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn symbol(&self) -> &str {
        self.labels.get(NAME_LABEL).map(String::as_str).unwrap_or("")
    }

    pub fn key(&self) -> (&NodeId, &NodeId) {
        (&self.start, &self.end)
    }

    /// Copy of the edge moved onto new endpoints, labels kept.
    pub fn remapped(&self, start: NodeId, end: NodeId) -> Self {
        Self {
            start,
            end,
            labels: self.labels.clone(),
            id: self.id.clone(),
        }
    }
}

// The document id takes no part in equality.
impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end && self.labels == other.labels
    }
}

impl Eq for Edge {}

pub fn symbol_labels(symbol: &str) -> Labels {
    let mut labels = Labels::new();
    labels.insert(NAME_LABEL.to_string(), symbol.to_string());
    labels
}
