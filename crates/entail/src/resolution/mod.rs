//! Resolution refutation
//!
//! The query is negated and added to the knowledge base's clauses. Each round
//! resolves every pair of distinct stored clauses on every complementary
//! literal pair and adds the resolvents that are not variants of stored
//! clauses. Deriving the empty clause refutes the negated query, so the query
//! is entailed. A round that adds nothing means it is not.

mod proof;
mod rule;
mod store;

pub use proof::{Proof, ProofStep};
pub use rule::resolvents;
pub use store::Derivation;

use crate::config::{exceeds, Budget, ResolutionConfig};
use crate::error::Result;
use crate::fol::{Clause, Literal};
use crate::kb::ClauseKnowledgeBase;
use crate::trace::{BudgetExhausted, TraceEvent};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use store::ClauseStore;
use tracing::{debug, info, trace};

/// How a refutation run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResolutionStatus {
    /// The empty clause was derived: the query is entailed
    Refuted { proof: Proof },
    /// No new resolvent appeared: the query is not entailed
    Exhausted,
    /// A budget ran out first
    Inconclusive { reason: BudgetExhausted },
}

/// Result of [`resolve`]
#[derive(Debug, Clone)]
pub struct ResolutionResult {
    pub status: ResolutionStatus,
    /// The clause database at the end of the run, indexed as in the trace
    pub clauses: Vec<Clause>,
    /// Stored resolvents in derivation order
    pub trace: Vec<TraceEvent>,
    pub rounds: usize,
}

impl ResolutionResult {
    pub fn is_proved(&self) -> bool {
        matches!(self.status, ResolutionStatus::Refuted { .. })
    }

    pub fn is_inconclusive(&self) -> bool {
        matches!(self.status, ResolutionStatus::Inconclusive { .. })
    }

    pub fn proof(&self) -> Option<&Proof> {
        match &self.status {
            ResolutionStatus::Refuted { proof } => Some(proof),
            _ => None,
        }
    }
}

/// Decide whether `query` follows from the clauses of `kb` by refutation.
///
/// `query` may contain variables; refuting its negation then shows that some
/// instance of it is entailed. `kb` is not modified.
pub fn resolve(
    kb: &ClauseKnowledgeBase,
    query: &Literal,
    config: &ResolutionConfig,
) -> Result<ResolutionResult> {
    kb.signature().check(query)?;

    let mut store = ClauseStore::new();
    for clause in kb.clauses() {
        store.insert(clause.clone(), Derivation::input());
    }
    store.insert(Clause::unit(query.complement()), Derivation::negated_query());

    Ok(Refutation::new(store, config).run(query))
}

struct Refutation<'a> {
    store: ClauseStore,
    config: &'a ResolutionConfig,
    trace: Vec<TraceEvent>,
    round: usize,
    /// Pairs (i, j) with j below this bound were examined in an earlier round
    examined: usize,
    budget: Budget,
}

enum Outcome {
    Continue,
    Done(ResolutionStatus),
}

impl<'a> Refutation<'a> {
    fn new(store: ClauseStore, config: &'a ResolutionConfig) -> Self {
        Refutation {
            store,
            config,
            trace: Vec::new(),
            round: 0,
            examined: 0,
            budget: Budget::start(config.timeout()),
        }
    }

    fn run(mut self, query: &Literal) -> ResolutionResult {
        info!(
            clauses = self.store.len(),
            %query,
            memoize_pairs = self.config.memoize_pairs,
            "Starting resolution refutation"
        );

        if let Some(idx) = self.store.clauses().iter().position(Clause::is_empty) {
            info!("Input already contains the empty clause");
            let proof = Proof::extract(&self.store, idx);
            return self.finish(ResolutionStatus::Refuted { proof });
        }

        if exceeds(self.store.len(), self.config.max_clauses) {
            let reason = BudgetExhausted::Clauses {
                limit: self.config.max_clauses,
            };
            return self.finish(ResolutionStatus::Inconclusive { reason });
        }

        loop {
            self.round += 1;
            if exceeds(self.round, self.config.max_rounds) {
                let reason = BudgetExhausted::Rounds {
                    limit: self.config.max_rounds,
                };
                return self.finish(ResolutionStatus::Inconclusive { reason });
            }
            if let Outcome::Done(status) = self.step() {
                return self.finish(status);
            }
        }
    }

    /// One round of pairwise resolution
    fn step(&mut self) -> Outcome {
        let n = self.store.len();
        let first = if self.config.memoize_pairs {
            self.examined.max(1)
        } else {
            1
        };
        trace!(round = self.round, clauses = n, first_new = first, "Resolution round");

        let mut pending: Vec<(Clause, [usize; 2])> = Vec::new();
        let mut pending_keys: HashSet<Clause> = HashSet::new();

        for j in first..n {
            if self.budget.timed_out() {
                let reason = BudgetExhausted::timeout(self.budget.elapsed());
                return Outcome::Done(ResolutionStatus::Inconclusive { reason });
            }
            for i in 0..j {
                for resolvent in resolvents(self.store.get(i), self.store.get(j)) {
                    if resolvent.is_empty() {
                        return Outcome::Done(self.refuted(i, j));
                    }
                    // Resolvents come back normalized, so they key `pending_keys` directly
                    if self.store.contains_variant(&resolvent) || !pending_keys.insert(resolvent.clone()) {
                        continue;
                    }
                    pending.push((resolvent, [i, j]));
                }
            }
        }
        self.examined = n;

        if pending.is_empty() {
            info!(round = self.round, clauses = n, "No new resolvents, query not entailed");
            return Outcome::Done(ResolutionStatus::Exhausted);
        }

        for (clause, premises @ [i, j]) in pending {
            if let Some(index) = self.store.insert(clause.clone(), Derivation::resolution(i, j)) {
                debug!(round = self.round, "[{}] {}  (resolve {}, {})", index, clause, i, j);
                self.trace.push(TraceEvent::ClauseDerived {
                    round: self.round,
                    index,
                    premises,
                    clause,
                });
            }
            if exceeds(self.store.len(), self.config.max_clauses) {
                let reason = BudgetExhausted::Clauses {
                    limit: self.config.max_clauses,
                };
                return Outcome::Done(ResolutionStatus::Inconclusive { reason });
            }
        }

        Outcome::Continue
    }

    fn refuted(&mut self, i: usize, j: usize) -> ResolutionStatus {
        let index = self.store.len();
        // The empty clause is never stored before refutation, so this succeeds
        let stored = self.store.insert(Clause::empty(), Derivation::resolution(i, j));
        debug_assert_eq!(stored, Some(index));

        debug!(round = self.round, "[{}] {}  (resolve {}, {})", index, Clause::empty(), i, j);
        self.trace.push(TraceEvent::ClauseDerived {
            round: self.round,
            index,
            premises: [i, j],
            clause: Clause::empty(),
        });
        info!(round = self.round, clauses = self.store.len(), "Empty clause derived, query proven");

        ResolutionStatus::Refuted {
            proof: Proof::extract(&self.store, index),
        }
    }

    fn finish(self, status: ResolutionStatus) -> ResolutionResult {
        if let ResolutionStatus::Inconclusive { reason } = &status {
            info!(%reason, "Resolution inconclusive");
        }
        ResolutionResult {
            status,
            clauses: self.store.into_clauses(),
            trace: self.trace,
            rounds: self.round,
        }
    }
}
