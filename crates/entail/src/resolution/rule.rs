//! Binary resolution between two clauses

use crate::fol::{Clause, Literal, Substitution};
use crate::unification::unify_literals;

/// All binary resolvents of `left` and `right`, one per complementary literal
/// pair that unifies.
///
/// Both clauses are renamed apart first so they share no variables. Each
/// resolvent is returned in normalized form, duplicates within one call
/// removed, in the order the literal pairs were tried.
pub fn resolvents(left: &Clause, right: &Clause) -> Vec<Clause> {
    let left = left.rename_apart("1");
    let right = right.rename_apart("2");
    let mut results: Vec<Clause> = Vec::new();

    for (i, lit1) in left.literals.iter().enumerate() {
        for (j, lit2) in right.literals.iter().enumerate() {
            if !lit1.is_complementary_to(lit2) {
                continue;
            }
            let Ok(mgu) = unify_literals(lit1, lit2, &Substitution::new()) else {
                continue;
            };

            let mut literals: Vec<Literal> = side_literals(&left, i, &mgu);
            literals.extend(side_literals(&right, j, &mgu));
            let resolvent = Clause::new(literals).normalized();

            if !results.contains(&resolvent) {
                results.push(resolvent);
            }
        }
    }

    results
}

/// Every literal of `clause` except the one at `skip`, with `subst` applied
fn side_literals(clause: &Clause, skip: usize, subst: &Substitution) -> Vec<Literal> {
    clause
        .literals
        .iter()
        .enumerate()
        .filter(|&(k, _)| k != skip)
        .map(|(_, lit)| lit.apply_substitution(subst))
        .collect()
}
