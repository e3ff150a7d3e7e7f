//! Forward chaining over definite rules
//!
//! Starting from the initial facts, every pass fires each rule against the
//! facts known so far and adds the instantiated heads that are new. The search
//! stops as soon as the query is derived (`Proved`), when a pass adds nothing
//! (`Saturated`: the query is not entailed), or when a budget from
//! [`ForwardConfig`] runs out (`Inconclusive`).
//!
//! Without function symbols no rule can introduce a new constant, so the fact
//! set is bounded by the Herbrand base of the input and saturation is reached
//! in finitely many passes. The budget covers the remaining cases.

mod matcher;

use crate::config::{exceeds, Budget, ForwardConfig};
use crate::error::{EntailError, Result};
use crate::fol::Literal;
use crate::kb::HornKnowledgeBase;
use crate::trace::{BudgetExhausted, TraceEvent};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use matcher::match_premises;

/// How a forward-chaining run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ForwardStatus {
    /// The query was derived (or was an initial fact)
    Proved,
    /// Fixpoint reached without the query
    Saturated,
    /// A budget ran out before either of the above
    Inconclusive { reason: BudgetExhausted },
}

/// Result of [`forward_chain`]
#[derive(Debug, Clone)]
pub struct ForwardResult {
    pub status: ForwardStatus,
    /// Every known fact at the end of the run, initial facts first
    pub known: IndexSet<Literal>,
    /// Derived facts in derivation order
    pub trace: Vec<TraceEvent>,
    /// Passes started over the rule set
    pub rounds: usize,
}

impl ForwardResult {
    pub fn is_proved(&self) -> bool {
        matches!(self.status, ForwardStatus::Proved)
    }

    pub fn is_inconclusive(&self) -> bool {
        matches!(self.status, ForwardStatus::Inconclusive { .. })
    }

    /// Facts added by rule firings, in order
    pub fn derived_facts(&self) -> impl Iterator<Item = &Literal> {
        self.trace.iter().filter_map(|event| match event {
            TraceEvent::FactDerived { fact, .. } => Some(fact),
            TraceEvent::ClauseDerived { .. } => None,
        })
    }
}

/// Decide whether `query` follows from `kb` by forward chaining.
///
/// `query` must be a ground positive literal consistent with the knowledge
/// base's predicate arities. `kb` is not modified; the run works on its own
/// copy of the fact set.
pub fn forward_chain(
    kb: &HornKnowledgeBase,
    query: &Literal,
    config: &ForwardConfig,
) -> Result<ForwardResult> {
    check_query(kb, query)?;
    let state = ForwardState::new(kb, config);
    Ok(state.run(query))
}

fn check_query(kb: &HornKnowledgeBase, query: &Literal) -> Result<()> {
    if !query.polarity {
        return Err(EntailError::MalformedLiteral {
            literal: query.to_string(),
            reason: "forward chaining queries must be positive".into(),
        });
    }
    if !query.is_ground() {
        return Err(EntailError::MalformedLiteral {
            literal: query.to_string(),
            reason: "forward chaining queries must be ground".into(),
        });
    }
    kb.signature().check(query)
}

struct ForwardState<'a> {
    kb: &'a HornKnowledgeBase,
    config: &'a ForwardConfig,
    known: IndexSet<Literal>,
    trace: Vec<TraceEvent>,
    round: usize,
    budget: Budget,
}

impl<'a> ForwardState<'a> {
    fn new(kb: &'a HornKnowledgeBase, config: &'a ForwardConfig) -> Self {
        ForwardState {
            kb,
            config,
            known: kb.facts().clone(),
            trace: Vec::new(),
            round: 0,
            budget: Budget::start(config.timeout()),
        }
    }

    fn run(mut self, query: &Literal) -> ForwardResult {
        info!(
            facts = self.known.len(),
            rules = self.kb.rules().len(),
            %query,
            "Starting forward chaining"
        );

        if self.known.contains(query) {
            info!("Query is an initial fact");
            return self.finish(ForwardStatus::Proved);
        }

        loop {
            self.round += 1;
            if exceeds(self.round, self.config.max_rounds) {
                let reason = BudgetExhausted::Rounds {
                    limit: self.config.max_rounds,
                };
                return self.finish(ForwardStatus::Inconclusive { reason });
            }
            trace!(round = self.round, facts = self.known.len(), "Forward chaining pass");

            let mut added_new_fact = false;

            for (rule_idx, rule) in self.kb.rules().iter().enumerate() {
                if self.budget.timed_out() {
                    let reason = BudgetExhausted::timeout(self.budget.elapsed());
                    return self.finish(ForwardStatus::Inconclusive { reason });
                }

                for subst in match_premises(&rule.premises, &self.known) {
                    let fact = rule.head.apply_substitution(&subst);
                    debug_assert!(fact.is_ground(), "rule {} derived non-ground {}", rule, fact);

                    if self.known.contains(&fact) {
                        continue;
                    }

                    debug!(round = self.round, rule = rule_idx, "Derived new fact: {}", fact);
                    self.known.insert(fact.clone());
                    self.trace.push(TraceEvent::FactDerived {
                        round: self.round,
                        rule: rule_idx,
                        fact: fact.clone(),
                    });
                    added_new_fact = true;

                    if fact == *query {
                        info!(round = self.round, "Query proven by forward chaining");
                        return self.finish(ForwardStatus::Proved);
                    }
                    if exceeds(self.known.len(), self.config.max_facts) {
                        let reason = BudgetExhausted::Facts {
                            limit: self.config.max_facts,
                        };
                        return self.finish(ForwardStatus::Inconclusive { reason });
                    }
                }
            }

            if !added_new_fact {
                info!(round = self.round, facts = self.known.len(), "Saturated without deriving query");
                return self.finish(ForwardStatus::Saturated);
            }
        }
    }

    fn finish(self, status: ForwardStatus) -> ForwardResult {
        if let ForwardStatus::Inconclusive { reason } = &status {
            info!(%reason, "Forward chaining inconclusive");
        }
        ForwardResult {
            status,
            known: self.known,
            trace: self.trace,
            rounds: self.round,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fol::Term;
    use crate::kb::Rule;

    fn lit(pred: &str, args: &[&str]) -> Literal {
        let args = args
            .iter()
            .map(|a| match a.strip_prefix('?') {
                Some(name) => Term::var(name),
                None => Term::constant(*a),
            })
            .collect();
        Literal::positive(pred, args)
    }

    fn family() -> HornKnowledgeBase {
        HornKnowledgeBase::from_parts(
            vec![
                lit("Father", &["John", "Mary"]),
                lit("Parent", &["Mary", "Susan"]),
            ],
            vec![
                Rule::new(lit("Parent", &["?x", "?y"]), vec![lit("Father", &["?x", "?y"])]),
                Rule::new(
                    lit("Grandparent", &["?x", "?z"]),
                    vec![lit("Parent", &["?x", "?y"]), lit("Parent", &["?y", "?z"])],
                ),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_grandparent_is_proved() {
        let query = lit("Grandparent", &["John", "Susan"]);
        let result = forward_chain(&family(), &query, &ForwardConfig::default()).unwrap();

        assert!(result.is_proved());
        let derived: Vec<&Literal> = result.derived_facts().collect();
        assert_eq!(
            derived,
            vec![&lit("Parent", &["John", "Mary"]), &query]
        );
    }

    #[test]
    fn test_not_entailed_saturates() {
        let query = lit("Grandparent", &["Susan", "John"]);
        let result = forward_chain(&family(), &query, &ForwardConfig::default()).unwrap();

        assert_eq!(result.status, ForwardStatus::Saturated);
        assert_eq!(result.known.len(), 4);
        assert!(!result.known.contains(&query));
    }

    #[test]
    fn test_initial_fact_is_proved_without_derivation() {
        let query = lit("Father", &["John", "Mary"]);
        let result = forward_chain(&family(), &query, &ForwardConfig::default()).unwrap();
        assert!(result.is_proved());
        assert!(result.trace.is_empty());
    }

    #[test]
    fn test_known_only_grows() {
        let kb = family();
        let query = lit("Grandparent", &["Nobody", "Else"]);
        let result = forward_chain(&kb, &query, &ForwardConfig::default()).unwrap();
        for fact in kb.facts() {
            assert!(result.known.contains(fact));
        }
        // Initial facts keep their leading positions
        let prefix: Vec<&Literal> = result.known.iter().take(kb.facts().len()).collect();
        let initial: Vec<&Literal> = kb.facts().iter().collect();
        assert_eq!(prefix, initial);
    }

    #[test]
    fn test_kb_is_not_modified() {
        let kb = family();
        let before = kb.facts().clone();
        let query = lit("Grandparent", &["John", "Susan"]);
        forward_chain(&kb, &query, &ForwardConfig::default()).unwrap();
        assert_eq!(kb.facts(), &before);
    }

    #[test]
    fn test_malformed_queries_rejected() {
        let kb = family();
        let config = ForwardConfig::default();

        let open = lit("Grandparent", &["John", "?who"]);
        assert!(matches!(
            forward_chain(&kb, &open, &config),
            Err(EntailError::MalformedLiteral { .. })
        ));

        let negated = lit("Grandparent", &["John", "Susan"]).complement();
        assert!(matches!(
            forward_chain(&kb, &negated, &config),
            Err(EntailError::MalformedLiteral { .. })
        ));

        let wrong_arity = lit("Parent", &["John"]);
        assert!(matches!(
            forward_chain(&kb, &wrong_arity, &config),
            Err(EntailError::ArityMismatch { .. })
        ));
    }

    #[test]
    fn test_round_budget_is_inconclusive() {
        // Successor chain: Num(Z), Num(?x) => Num(S(?x)) never saturates
        let kb = HornKnowledgeBase::from_parts(
            vec![Literal::positive("Num", vec![Term::constant("Z")])],
            vec![Rule::new(
                Literal::positive("Num", vec![Term::function("S", vec![Term::var("x")])]),
                vec![Literal::positive("Num", vec![Term::var("x")])],
            )],
        )
        .unwrap();
        let query = Literal::positive("Num", vec![Term::constant("Never")]);
        let config = ForwardConfig {
            max_rounds: 5,
            ..ForwardConfig::default()
        };

        let result = forward_chain(&kb, &query, &config).unwrap();
        assert_eq!(
            result.status,
            ForwardStatus::Inconclusive {
                reason: BudgetExhausted::Rounds { limit: 5 }
            }
        );
        assert_eq!(result.trace.len(), 5);
    }

    #[test]
    fn test_fact_budget_is_inconclusive() {
        let kb = HornKnowledgeBase::from_parts(
            vec![Literal::positive("Num", vec![Term::constant("Z")])],
            vec![Rule::new(
                Literal::positive("Num", vec![Term::function("S", vec![Term::var("x")])]),
                vec![Literal::positive("Num", vec![Term::var("x")])],
            )],
        )
        .unwrap();
        let query = Literal::positive("Num", vec![Term::constant("Never")]);
        let config = ForwardConfig {
            max_facts: 3,
            ..ForwardConfig::default()
        };

        let result = forward_chain(&kb, &query, &config).unwrap();
        assert!(result.is_inconclusive());
        assert_eq!(result.known.len(), 4);
    }

    #[test]
    fn test_deterministic() {
        let kb = family();
        let query = lit("Grandparent", &["Susan", "John"]);
        let a = forward_chain(&kb, &query, &ForwardConfig::default()).unwrap();
        let b = forward_chain(&kb, &query, &ForwardConfig::default()).unwrap();
        assert_eq!(a.trace, b.trace);
        assert_eq!(a.known, b.known);
    }
}
