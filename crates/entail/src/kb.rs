//! Knowledge bases
//!
//! Input is validated once, at construction time: predicate arities must be
//! consistent, facts must be ground, and every head variable of a rule must be
//! bound by one of its premises. The engines rely on these checks instead of
//! discovering malformed input mid-search.

use crate::error::{EntailError, Result};
use crate::fol::{Clause, Literal};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A definite rule: the conjunction of `premises` implies `head`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rule {
    pub head: Literal,
    pub premises: Vec<Literal>,
}

impl Rule {
    pub fn new(head: Literal, premises: Vec<Literal>) -> Self {
        Rule { head, premises }
    }

    /// The clause `~p1 | ... | ~pn | head`
    pub fn to_clause(&self) -> Clause {
        let mut literals: Vec<Literal> = self.premises.iter().map(Literal::complement).collect();
        literals.push(self.head.clone());
        Clause::new(literals)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} :- ", self.head)?;
        for (i, premise) in self.premises.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", premise)?;
        }
        Ok(())
    }
}

/// Predicate arities seen so far
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    arities: IndexMap<String, usize>,
}

impl Signature {
    pub fn new() -> Self {
        Signature::default()
    }

    /// Record the predicate of `literal`, rejecting a conflicting arity
    pub fn register(&mut self, literal: &Literal) -> Result<()> {
        self.check(literal)?;
        self.arities
            .entry(literal.predicate.clone())
            .or_insert(literal.arity());
        Ok(())
    }

    /// Check `literal` against known arities without recording it
    pub fn check(&self, literal: &Literal) -> Result<()> {
        if literal.predicate.is_empty() {
            return Err(EntailError::MalformedLiteral {
                literal: literal.to_string(),
                reason: "empty predicate name".into(),
            });
        }
        match self.arities.get(&literal.predicate) {
            Some(&expected) if expected != literal.arity() => Err(EntailError::ArityMismatch {
                predicate: literal.predicate.clone(),
                expected,
                found: literal.arity(),
            }),
            _ => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.arities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arities.is_empty()
    }
}

/// Ground facts plus definite rules, the input of forward chaining
#[derive(Debug, Clone, Default)]
pub struct HornKnowledgeBase {
    facts: IndexSet<Literal>,
    rules: Vec<Rule>,
    signature: Signature,
}

impl HornKnowledgeBase {
    pub fn new() -> Self {
        HornKnowledgeBase::default()
    }

    pub fn from_parts(facts: Vec<Literal>, rules: Vec<Rule>) -> Result<Self> {
        let mut kb = HornKnowledgeBase::new();
        for fact in facts {
            kb.add_fact(fact)?;
        }
        for rule in rules {
            kb.add_rule(rule)?;
        }
        Ok(kb)
    }

    /// Add a ground positive fact. Adding a known fact again is a no-op.
    pub fn add_fact(&mut self, fact: Literal) -> Result<()> {
        if !fact.polarity {
            return Err(EntailError::MalformedLiteral {
                literal: fact.to_string(),
                reason: "facts must be positive".into(),
            });
        }
        if !fact.is_ground() {
            return Err(EntailError::NonGroundFact(fact.to_string()));
        }
        self.signature.register(&fact)?;
        self.facts.insert(fact);
        Ok(())
    }

    /// Add a rule. Head and premises must be positive and every head variable
    /// must appear in a premise.
    pub fn add_rule(&mut self, rule: Rule) -> Result<()> {
        for literal in std::iter::once(&rule.head).chain(&rule.premises) {
            if !literal.polarity {
                return Err(EntailError::MalformedLiteral {
                    literal: literal.to_string(),
                    reason: format!("negated literal in rule {}", rule),
                });
            }
        }

        let mut bound = IndexSet::new();
        for premise in &rule.premises {
            premise.collect_variables(&mut bound);
        }
        if let Some(variable) = rule.head.variables().into_iter().find(|v| !bound.contains(v)) {
            return Err(EntailError::UnsafeRule {
                rule: rule.to_string(),
                variable: variable.to_string(),
            });
        }

        for literal in std::iter::once(&rule.head).chain(&rule.premises) {
            self.signature.register(literal)?;
        }

        if rule.premises.is_empty() {
            // Range restriction already forced the head to be ground
            self.facts.insert(rule.head);
        } else {
            self.rules.push(rule);
        }
        Ok(())
    }

    pub fn facts(&self) -> &IndexSet<Literal> {
        &self.facts
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }
}

/// A list of clauses, the input of resolution refutation
#[derive(Debug, Clone, Default)]
pub struct ClauseKnowledgeBase {
    clauses: Vec<Clause>,
    signature: Signature,
}

impl ClauseKnowledgeBase {
    pub fn new() -> Self {
        ClauseKnowledgeBase::default()
    }

    pub fn from_clauses(clauses: Vec<Clause>) -> Result<Self> {
        let mut kb = ClauseKnowledgeBase::new();
        for clause in clauses {
            kb.add_clause(clause)?;
        }
        Ok(kb)
    }

    pub fn add_clause(&mut self, clause: Clause) -> Result<()> {
        for literal in &clause.literals {
            self.signature.register(literal)?;
        }
        self.clauses.push(clause);
        Ok(())
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }
}

/// Everything read from one `.kb` source, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub facts: Vec<Literal>,
    pub rules: Vec<Rule>,
    pub clauses: Vec<Clause>,
    pub queries: Vec<Literal>,
}

impl Program {
    /// View the program as facts and rules.
    ///
    /// General clauses are accepted when they are definite: a positive unit
    /// becomes a fact, anything else with exactly one positive literal becomes
    /// a rule.
    pub fn to_horn(&self) -> Result<HornKnowledgeBase> {
        let mut kb = HornKnowledgeBase::from_parts(self.facts.clone(), self.rules.clone())?;
        for clause in &self.clauses {
            let mut positives = clause.positive_literals();
            let head = match (positives.next(), positives.next()) {
                (Some(head), None) => head.clone(),
                _ => return Err(EntailError::NotDefinite(clause.to_string())),
            };
            let premises: Vec<Literal> = clause.negative_literals().map(Literal::complement).collect();
            if premises.is_empty() {
                kb.add_fact(head)?;
            } else {
                kb.add_rule(Rule::new(head, premises))?;
            }
        }
        Ok(kb)
    }

    /// View the program as clauses: facts become unit clauses and rules become
    /// `~p1 | ... | ~pn | head`.
    pub fn to_clauses(&self) -> Result<ClauseKnowledgeBase> {
        let mut kb = ClauseKnowledgeBase::new();
        for fact in &self.facts {
            kb.add_clause(Clause::unit(fact.clone()))?;
        }
        for rule in &self.rules {
            kb.add_clause(rule.to_clause())?;
        }
        for clause in &self.clauses {
            kb.add_clause(clause.clone())?;
        }
        Ok(kb)
    }
}
