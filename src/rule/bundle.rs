use std::collections::{BTreeMap, BTreeSet};

use super::{Rule, RuleKind};
use crate::errors::GrammarError;

/// Rules keyed by name, with an index from rule kind to rule names.
/// Names are unique across all kinds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleBundle {
    rules: BTreeMap<String, Rule>,
    by_kind: BTreeMap<RuleKind, BTreeSet<String>>,
}

impl RuleBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rule: Rule) -> Result<(), GrammarError> {
        if self.rules.contains_key(rule.name()) {
            return Err(GrammarError::duplicate_id(format!(
                "a rule named '{}' already exists",
                rule.name()
            )));
        }
        self.by_kind
            .entry(rule.kind())
            .or_default()
            .insert(rule.name().to_string());
        self.rules.insert(rule.name().to_string(), rule);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<Rule, GrammarError> {
        let rule = self
            .rules
            .remove(name)
            .ok_or_else(|| GrammarError::rule_absent(format!("no rule named '{name}'")))?;
        if let Some(names) = self.by_kind.get_mut(&rule.kind()) {
            names.remove(name);
            if names.is_empty() {
                self.by_kind.remove(&rule.kind());
            }
        }
        Ok(rule)
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    pub fn names_of_kind(&self, kind: RuleKind) -> impl Iterator<Item = &str> {
        self.by_kind
            .get(&kind)
            .into_iter()
            .flat_map(|names| names.iter().map(String::as_str))
    }

    pub fn of_kind(&self, kind: RuleKind) -> impl Iterator<Item = &Rule> {
        self.names_of_kind(kind).filter_map(|name| self.rules.get(name))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
