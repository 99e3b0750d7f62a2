//! Options for grammar loading and id allocation.
//!
//! Both structures are plain values with sensible defaults; nothing in the
//! crate reads the environment or a file to build them.

use crate::rule::RuleKind;

/// Options controlling how a grammar document is turned into a [`Grammar`](crate::Grammar)
/// and how vocabulary checks are applied.
///
/// # Default Configuration
///
/// ```rust
/// use graphgrammar::{GrammarConfig, RuleKind};
/// let config = GrammarConfig::default();
/// assert_eq!(
///     config.acceptable_rule_kinds,
///     vec![RuleKind::ContextFree, RuleKind::Anchor, RuleKind::Wildcard]
/// );
/// assert!(config.empty_symbol_is_terminal);
/// assert!(config.check_edge_labels);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrammarConfig {
    /// Rule kinds tried, in order, when recognizing a rule element
    ///
    /// **Default:** context-free, anchor, wildcard
    ///
    /// The first kind whose left-hand side is present in the element wins.
    /// An element no listed kind recognizes is rejected as unsupported.
    pub acceptable_rule_kinds: Vec<RuleKind>,

    /// Whether the empty string starts out as a terminal symbol
    ///
    /// **Default:** `true`
    ///
    /// Nodes and edges without a `name` carry `""`, so disabling this makes
    /// every unnamed element a vocabulary violation until `""` is defined.
    pub empty_symbol_is_terminal: bool,

    /// Whether vocabulary checks also cover edge `name` labels
    ///
    /// **Default:** `true`
    pub check_edge_labels: bool,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            acceptable_rule_kinds: vec![RuleKind::ContextFree, RuleKind::Anchor, RuleKind::Wildcard],
            empty_symbol_is_terminal: true,
            check_edge_labels: true,
        }
    }
}

impl GrammarConfig {
    /// Accepts only the given rule kinds, in the given priority order.
    pub fn with_rule_kinds(kinds: impl IntoIterator<Item = RuleKind>) -> Self {
        Self {
            acceptable_rule_kinds: kinds.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Context-free rules only.
    pub fn context_free_only() -> Self {
        Self::with_rule_kinds([RuleKind::ContextFree])
    }

    pub fn accepts(&self, kind: RuleKind) -> bool {
        self.acceptable_rule_kinds.contains(&kind)
    }
}

/// Options for [`IdPool`](crate::IdPool).
///
/// ```rust
/// use graphgrammar::IdPoolConfig;
/// assert_eq!(IdPoolConfig::default().chunk_size, 100);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdPoolConfig {
    /// Number of ids added to the free set each time it runs dry
    ///
    /// **Default:** `100`. A value of `0` is treated as `1`.
    pub chunk_size: u64,
}

impl Default for IdPoolConfig {
    fn default() -> Self {
        Self { chunk_size: 100 }
    }
}

impl IdPoolConfig {
    pub fn with_chunk_size(chunk_size: u64) -> Self {
        Self { chunk_size }
    }
}
