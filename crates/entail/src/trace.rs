//! Derivation records shared by both engines.
//!
//! The trace is a side channel for debugging and tests. It is not part of the
//! entailment answer.

use crate::fol::{Clause, Literal};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// One derivation step, in the order the engine produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    /// Forward chaining added a fact by firing `rule` (index into the rule list)
    FactDerived {
        round: usize,
        rule: usize,
        fact: Literal,
    },
    /// Resolution stored a new clause at `index`, resolved from two stored clauses
    ClauseDerived {
        round: usize,
        index: usize,
        premises: [usize; 2],
        clause: Clause,
    },
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::FactDerived { fact, .. } => write!(f, "Derived new fact: {}", fact),
            TraceEvent::ClauseDerived {
                index,
                premises: [left, right],
                clause,
                ..
            } => write!(f, "[{}] {}  (resolve {}, {})", index, clause, left, right),
        }
    }
}

/// Which limit ended an inconclusive search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BudgetExhausted {
    Rounds { limit: usize },
    Facts { limit: usize },
    Clauses { limit: usize },
    Timeout { elapsed_ms: u64 },
}

impl BudgetExhausted {
    pub(crate) fn timeout(elapsed: Duration) -> Self {
        BudgetExhausted::Timeout {
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

impl fmt::Display for BudgetExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetExhausted::Rounds { limit } => write!(f, "round limit {} reached", limit),
            BudgetExhausted::Facts { limit } => write!(f, "fact limit {} reached", limit),
            BudgetExhausted::Clauses { limit } => write!(f, "clause limit {} reached", limit),
            BudgetExhausted::Timeout { elapsed_ms } => write!(f, "timed out after {}ms", elapsed_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fol::Term;

    #[test]
    fn test_fact_event_display() {
        let event = TraceEvent::FactDerived {
            round: 1,
            rule: 0,
            fact: Literal::positive("Parent", vec![Term::constant("John"), Term::constant("Mary")]),
        };
        assert_eq!(event.to_string(), "Derived new fact: Parent(John,Mary)");
    }

    #[test]
    fn test_clause_event_display() {
        let event = TraceEvent::ClauseDerived {
            round: 1,
            index: 4,
            premises: [0, 1],
            clause: Clause::unit(Literal::positive("Human", vec![Term::constant("Marcus")])),
        };
        assert_eq!(event.to_string(), "[4] Human(Marcus)  (resolve 0, 1)");
    }
}
