//! Append-only clause database with derivation tracking.

use crate::fol::Clause;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How a stored clause came to be (inference rule + premise indices)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derivation {
    /// Name of the rule that produced this clause
    pub rule_name: String,
    /// Store indices of the premise clauses
    pub premises: Vec<usize>,
}

impl Derivation {
    pub fn input() -> Self {
        Derivation {
            rule_name: "Input".into(),
            premises: vec![],
        }
    }

    pub fn negated_query() -> Self {
        Derivation {
            rule_name: "NegatedQuery".into(),
            premises: vec![],
        }
    }

    pub fn resolution(left: usize, right: usize) -> Self {
        Derivation {
            rule_name: "Resolution".into(),
            premises: vec![left, right],
        }
    }

    pub fn is_resolution(&self) -> bool {
        self.rule_name == "Resolution"
    }
}

/// Clause database for one refutation run.
///
/// Indices are stable: a clause keeps its index for the whole run and
/// premises always have smaller indices than their conclusions. A clause that
/// is a variant of one already stored is not added again.
#[derive(Debug, Clone, Default)]
pub(crate) struct ClauseStore {
    clauses: Vec<Clause>,
    derivations: Vec<Derivation>,
    variants: HashSet<Clause>,
}

impl ClauseStore {
    pub(crate) fn new() -> Self {
        ClauseStore::default()
    }

    /// Store `clause` unless a variant is already present.
    /// Returns the index of the new clause.
    pub(crate) fn insert(&mut self, clause: Clause, derivation: Derivation) -> Option<usize> {
        if !self.variants.insert(clause.normalized()) {
            return None;
        }
        let idx = self.clauses.len();
        self.clauses.push(clause);
        self.derivations.push(derivation);
        Some(idx)
    }

    /// Whether a variant of `clause` is stored
    pub(crate) fn contains_variant(&self, clause: &Clause) -> bool {
        self.variants.contains(&clause.normalized())
    }

    pub(crate) fn get(&self, idx: usize) -> &Clause {
        &self.clauses[idx]
    }

    pub(crate) fn derivation(&self, idx: usize) -> &Derivation {
        &self.derivations[idx]
    }

    pub(crate) fn len(&self) -> usize {
        self.clauses.len()
    }

    pub(crate) fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub(crate) fn into_clauses(self) -> Vec<Clause> {
        self.clauses
    }
}
