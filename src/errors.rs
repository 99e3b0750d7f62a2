use thiserror::Error;

/// Error type for graph, rule and grammar operations.
#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("missing attribute: {0}")]
    MissingAttribute(String),
    #[error("missing element: {0}")]
    MissingElement(String),
    #[error("duplicated id: {0}")]
    DuplicateId(String),
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
    #[error("node absent: {0}")]
    NodeAbsent(String),
    #[error("edge absent: {0}")]
    EdgeAbsent(String),
    #[error("invalid exotic graph: {0}")]
    InvalidExoticGraph(String),
    #[error("invalid rule: {0}")]
    InvalidRule(String),
    #[error("unsupported rule: {0}")]
    UnsupportedRule(String),
    #[error("rule absent: {0}")]
    RuleAbsent(String),
    #[error("rule application error: {0}")]
    RuleApplication(String),
    #[error("vocabulary violation: {0}")]
    VocabularyViolation(String),
    #[error("symbol definition conflict: {0}")]
    SymbolDefinitionConflict(String),
    #[error("invalid document: {0}")]
    InvalidDocument(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl GrammarError {
    pub fn missing_attribute<T: Into<String>>(msg: T) -> Self {
        GrammarError::MissingAttribute(msg.into())
    }

    pub fn missing_element<T: Into<String>>(msg: T) -> Self {
        GrammarError::MissingElement(msg.into())
    }

    pub fn duplicate_id<T: Into<String>>(msg: T) -> Self {
        GrammarError::DuplicateId(msg.into())
    }

    pub fn type_mismatch<T: Into<String>>(msg: T) -> Self {
        GrammarError::TypeMismatch(msg.into())
    }

    pub fn node_absent<T: Into<String>>(msg: T) -> Self {
        GrammarError::NodeAbsent(msg.into())
    }

    pub fn edge_absent<T: Into<String>>(msg: T) -> Self {
        GrammarError::EdgeAbsent(msg.into())
    }

    pub fn invalid_exotic_graph<T: Into<String>>(msg: T) -> Self {
        GrammarError::InvalidExoticGraph(msg.into())
    }

    pub fn invalid_rule<T: Into<String>>(msg: T) -> Self {
        GrammarError::InvalidRule(msg.into())
    }

    pub fn unsupported_rule<T: Into<String>>(msg: T) -> Self {
        GrammarError::UnsupportedRule(msg.into())
    }

    pub fn rule_absent<T: Into<String>>(msg: T) -> Self {
        GrammarError::RuleAbsent(msg.into())
    }

    pub fn rule_application<T: Into<String>>(msg: T) -> Self {
        GrammarError::RuleApplication(msg.into())
    }

    pub fn vocabulary<T: Into<String>>(msg: T) -> Self {
        GrammarError::VocabularyViolation(msg.into())
    }

    pub fn symbol_conflict<T: Into<String>>(msg: T) -> Self {
        GrammarError::SymbolDefinitionConflict(msg.into())
    }

    pub fn invalid_document<T: Into<String>>(msg: T) -> Self {
        GrammarError::InvalidDocument(msg.into())
    }

    pub fn io<T: Into<String>>(msg: T) -> Self {
        GrammarError::Io(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        GrammarError::Serialization(msg.into())
    }
}
