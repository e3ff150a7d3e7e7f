//! Refutation proofs

use super::rule::resolvents;
use super::store::{ClauseStore, Derivation};
use crate::fol::Clause;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A single step in a proof. Every step produces a clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    pub clause_idx: usize,
    pub derivation: Derivation,
    pub conclusion: Clause,
}

/// The clauses the empty clause depends on, premises before conclusions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    pub steps: Vec<ProofStep>,
    pub empty_clause_idx: usize,
}

impl Proof {
    /// Extract a proof by backward traversal from the empty clause.
    pub(crate) fn extract(store: &ClauseStore, empty_clause_idx: usize) -> Proof {
        let mut indices = Vec::new();
        let mut visited = HashSet::new();
        let mut to_visit = vec![empty_clause_idx];

        while let Some(idx) = to_visit.pop() {
            if !visited.insert(idx) {
                continue;
            }
            indices.push(idx);
            to_visit.extend(&store.derivation(idx).premises);
        }

        // Premises always have lower indices, so index order is topological
        indices.sort_unstable();

        let steps = indices
            .into_iter()
            .map(|idx| ProofStep {
                clause_idx: idx,
                derivation: store.derivation(idx).clone(),
                conclusion: store.get(idx).clone(),
            })
            .collect();

        Proof {
            steps,
            empty_clause_idx,
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Clauses taken from the input (knowledge base or negated query)
    pub fn leaves(&self) -> impl Iterator<Item = &ProofStep> {
        self.steps.iter().filter(|step| step.derivation.premises.is_empty())
    }

    /// Check the proof independently of the search that found it.
    ///
    /// The last step must be the empty clause, every premise must be an
    /// earlier step, and every resolution step's conclusion must be a
    /// resolvent (up to variable renaming) of its two premises.
    pub fn verify(&self) -> bool {
        let Some(last) = self.steps.last() else {
            return false;
        };
        if last.clause_idx != self.empty_clause_idx || !last.conclusion.is_empty() {
            return false;
        }

        let mut seen: HashMap<usize, &Clause> = HashMap::new();
        for step in &self.steps {
            let premises: Option<Vec<&Clause>> = step
                .derivation
                .premises
                .iter()
                .map(|idx| seen.get(idx).copied())
                .collect();
            let Some(premises) = premises else {
                return false;
            };

            if step.derivation.is_resolution() {
                let [left, right] = premises.as_slice() else {
                    return false;
                };
                if !resolvents(left, right)
                    .iter()
                    .any(|resolvent| resolvent.is_variant_of(&step.conclusion))
                {
                    return false;
                }
            } else if !premises.is_empty() {
                return false;
            }

            seen.insert(step.clause_idx, &step.conclusion);
        }
        true
    }
}

impl fmt::Display for Proof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            write!(f, "[{}] {}", step.clause_idx, step.conclusion)?;
            match step.derivation.premises.as_slice() {
                [] => writeln!(f, "  ({})", step.derivation.rule_name)?,
                premises => {
                    let premises: Vec<String> = premises.iter().map(usize::to_string).collect();
                    writeln!(f, "  ({} {})", step.derivation.rule_name, premises.join(", "))?
                }
            }
        }
        Ok(())
    }
}
