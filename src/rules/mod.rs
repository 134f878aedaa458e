use std::collections::HashMap;

use crate::{
    config::{GroupSpec, RuleSpec},
    error::ConfigError,
    types::GroupId,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rule {
    pub source: GroupId,
    pub target: GroupId,
    pub coefficient: f64,
}

/// Ordered interaction rules with a total `(source, target)` lookup.
#[derive(Clone, Debug, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
    index: HashMap<(GroupId, GroupId), f64>,
}

impl RuleTable {
    /// Resolves group names against `groups` and keeps the entries in the
    /// order given.
    pub fn resolve(groups: &[GroupSpec], specs: &[RuleSpec]) -> Result<Self, ConfigError> {
        let ids: HashMap<&str, GroupId> = groups
            .iter()
            .enumerate()
            .map(|(i, g)| (g.name.as_str(), GroupId(i)))
            .collect();
        let find = |name: &str| {
            ids.get(name)
                .copied()
                .ok_or_else(|| ConfigError::UnknownGroup(name.to_string()))
        };

        let mut table = RuleTable::default();
        for spec in specs {
            let source = find(&spec.source)?;
            let target = find(&spec.target)?;
            if !spec.coefficient.is_finite() {
                return Err(ConfigError::NonFiniteCoefficient {
                    from: spec.source.clone(),
                    to: spec.target.clone(),
                    coefficient: spec.coefficient,
                });
            }
            if table.index.contains_key(&(source, target)) {
                return Err(ConfigError::DuplicateRule {
                    from: spec.source.clone(),
                    to: spec.target.clone(),
                });
            }
            table.push(Rule {
                source,
                target,
                coefficient: spec.coefficient,
            });
        }
        Ok(table)
    }

    fn push(&mut self, rule: Rule) {
        self.index.insert((rule.source, rule.target), rule.coefficient);
        self.rules.push(rule);
    }

    /// Coefficient for `source -> target`; absent pairs are 0.
    pub fn lookup(&self, source: GroupId, target: GroupId) -> f64 {
        self.index.get(&(source, target)).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
