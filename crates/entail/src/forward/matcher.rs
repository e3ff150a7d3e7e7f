//! Premise matching against a ground fact set.

use crate::fol::{Literal, Substitution};
use crate::unification::unify_literals;
use indexmap::IndexSet;

/// All substitutions that satisfy every premise against `facts`, in input order.
///
/// Works premise by premise over an explicit frontier of partial
/// substitutions: each candidate is extended once per fact its instantiated
/// premise unifies with, and candidates with no match are dropped. Every call
/// starts from an empty substitution, so bindings from one rule application
/// never reach another.
pub(crate) fn match_premises(premises: &[Literal], facts: &IndexSet<Literal>) -> Vec<Substitution> {
    let mut frontier = vec![Substitution::new()];

    for premise in premises {
        let mut next = Vec::new();
        for subst in &frontier {
            let pattern = premise.apply_substitution(subst);
            let candidates = facts
                .iter()
                .filter(|fact| fact.predicate == pattern.predicate && fact.polarity == pattern.polarity);
            for fact in candidates {
                if let Ok(extended) = unify_literals(&pattern, fact, subst) {
                    next.push(extended);
                }
            }
        }
        if next.is_empty() {
            return next;
        }
        frontier = next;
    }

    frontier
}
