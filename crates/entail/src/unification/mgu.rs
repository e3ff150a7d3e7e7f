//! Most General Unifier (MGU) computation

use crate::fol::{Constant, FunctionSymbol, Literal, Substitution, Term, Variable};
use thiserror::Error;

/// Result of a unification attempt
pub type UnificationResult = Result<Substitution, UnificationError>;

/// Reasons unification can fail.
///
/// These are ordinary search outcomes: the engines drop the failed branch and
/// carry on. They never reach a caller of `forward_chain` or `resolve`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnificationError {
    /// Occurs check failed - variable occurs in term
    #[error("{0} occurs in {1}")]
    OccursCheck(Variable, Term),
    /// Constant symbols don't match
    #[error("constant clash: {0} vs {1}")]
    ConstantClash(Constant, Constant),
    /// Function symbols don't match
    #[error("function clash: {} vs {}", .0.name, .1.name)]
    FunctionClash(FunctionSymbol, FunctionSymbol),
    /// Function-constant clash
    #[error("function {} vs constant {}", .0.name, .1)]
    FunctionConstantClash(FunctionSymbol, Constant),
    /// Predicate names don't match
    #[error("predicate clash: {0} vs {1}")]
    PredicateClash(String, String),
    /// Arities don't match
    #[error("arity mismatch: {0} vs {1}")]
    ArityMismatch(usize, usize),
}

/// Unify two terms under an existing substitution.
///
/// On success returns the input substitution extended with the bindings that
/// make `x` and `y` identical. The input is never modified.
pub fn unify(x: &Term, y: &Term, subst: &Substitution) -> UnificationResult {
    unify_with(x, y, subst.clone())
}

/// Unify a variable with a term under an existing substitution
pub fn unify_variable(var: &Variable, x: &Term, subst: &Substitution) -> UnificationResult {
    bind_variable(var, x, subst.clone())
}

/// Unify two argument lists pairwise, left to right
pub fn unify_terms(args1: &[Term], args2: &[Term], subst: &Substitution) -> UnificationResult {
    if args1.len() != args2.len() {
        return Err(UnificationError::ArityMismatch(args1.len(), args2.len()));
    }
    unify_args(args1, args2, subst.clone())
}

/// Unify the atoms of two literals. Polarity is ignored; predicate name and
/// arity must agree.
pub fn unify_literals(lit1: &Literal, lit2: &Literal, subst: &Substitution) -> UnificationResult {
    if lit1.predicate != lit2.predicate {
        return Err(UnificationError::PredicateClash(
            lit1.predicate.clone(),
            lit2.predicate.clone(),
        ));
    }
    unify_terms(&lit1.args, &lit2.args, subst)
}

// The owned helpers below thread one substitution value through the
// recursion. Each caller hands over its own copy, so no binding made on one
// branch is visible on another.

fn unify_with(x: &Term, y: &Term, subst: Substitution) -> UnificationResult {
    if x == y {
        return Ok(subst);
    }

    let x = subst.resolve(x).clone();
    let y = subst.resolve(y).clone();

    match (&x, &y) {
        // Same term - nothing to do
        _ if x == y => Ok(subst),

        // Variable cases
        (Term::Variable(v), t) | (t, Term::Variable(v)) => bind_variable(v, t, subst),

        // Constant clash
        (Term::Constant(c1), Term::Constant(c2)) => {
            Err(UnificationError::ConstantClash(c1.clone(), c2.clone()))
        }

        // Function terms
        (Term::Function(f1, args1), Term::Function(f2, args2)) => {
            if f1.name != f2.name {
                return Err(UnificationError::FunctionClash(f1.clone(), f2.clone()));
            }
            if args1.len() != args2.len() {
                return Err(UnificationError::ArityMismatch(args1.len(), args2.len()));
            }
            unify_args(args1, args2, subst)
        }

        // Function-Constant clash
        (Term::Function(f, _), Term::Constant(c)) | (Term::Constant(c), Term::Function(f, _)) => {
            Err(UnificationError::FunctionConstantClash(f.clone(), c.clone()))
        }
    }
}

fn unify_args(args1: &[Term], args2: &[Term], subst: Substitution) -> UnificationResult {
    args1
        .iter()
        .zip(args2)
        .try_fold(subst, |subst, (a, b)| unify_with(a, b, subst))
}

fn bind_variable(var: &Variable, x: &Term, subst: Substitution) -> UnificationResult {
    if let Some(bound) = subst.get(var).cloned() {
        return unify_with(&bound, x, subst);
    }
    if let Term::Variable(other) = x {
        if let Some(bound) = subst.get(other).cloned() {
            return unify_with(&Term::Variable(var.clone()), &bound, subst);
        }
        if other == var {
            return Ok(subst);
        }
    }
    if occurs_check(var, x, &subst) {
        return Err(UnificationError::OccursCheck(var.clone(), subst.apply(x)));
    }
    Ok(subst.with_binding(var.clone(), x.clone()))
}

/// Check if variable occurs in term, looking through bindings
fn occurs_check(var: &Variable, term: &Term, subst: &Substitution) -> bool {
    match subst.resolve(term) {
        Term::Variable(v) => v == var,
        Term::Constant(_) => false,
        Term::Function(_, args) => args.iter().any(|arg| occurs_check(var, arg, subst)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Term {
        Term::var("x")
    }

    fn y() -> Term {
        Term::var("y")
    }

    fn c(name: &str) -> Term {
        Term::constant(name)
    }

    fn f(args: Vec<Term>) -> Term {
        Term::function("f", args)
    }

    #[test]
    fn test_unify_identical_terms_adds_nothing() {
        let empty = Substitution::new();
        assert!(unify(&x(), &x(), &empty).unwrap().is_empty());
        assert!(unify(&c("a"), &c("a"), &empty).unwrap().is_empty());
        let fx = f(vec![x(), c("a")]);
        assert!(unify(&fx, &fx, &empty).unwrap().is_empty());
    }

    #[test]
    fn test_unify_variables() {
        let result = unify(&x(), &y(), &Substitution::new()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.apply(&x()), result.apply(&y()));
    }

    #[test]
    fn test_unify_constant_variable() {
        let result = unify(&x(), &c("John"), &Substitution::new()).unwrap();
        assert_eq!(result.get(&Variable::new("x")), Some(&c("John")));

        let result = unify(&c("John"), &x(), &Substitution::new()).unwrap();
        assert_eq!(result.get(&Variable::new("x")), Some(&c("John")));
    }

    #[test]
    fn test_constant_clash() {
        let result = unify(&c("John"), &c("Mary"), &Substitution::new());
        assert!(matches!(result, Err(UnificationError::ConstantClash(_, _))));
    }

    #[test]
    fn test_unify_functions_threads_bindings() {
        // f(x, x) with f(a, y) binds x -> a and then y -> a
        let t1 = f(vec![x(), x()]);
        let t2 = f(vec![c("a"), y()]);
        let result = unify(&t1, &t2, &Substitution::new()).unwrap();
        assert_eq!(result.apply(&y()), c("a"));
        assert_eq!(result.apply(&t1), result.apply(&t2));
    }

    #[test]
    fn test_function_mismatches() {
        let empty = Substitution::new();
        let g = Term::function("g", vec![x()]);
        assert!(matches!(
            unify(&f(vec![x()]), &g, &empty),
            Err(UnificationError::FunctionClash(_, _))
        ));
        assert!(matches!(
            unify(&f(vec![x()]), &f(vec![x(), y()]), &empty),
            Err(UnificationError::ArityMismatch(1, 2))
        ));
        assert!(matches!(
            unify(&f(vec![x()]), &c("a"), &empty),
            Err(UnificationError::FunctionConstantClash(_, _))
        ));
    }

    #[test]
    fn test_occurs_check() {
        let result = unify(&x(), &f(vec![x()]), &Substitution::new());
        assert!(matches!(result, Err(UnificationError::OccursCheck(_, _))));
    }

    #[test]
    fn test_occurs_check_through_binding() {
        // With y -> x already bound, x against f(y) must still fail
        let subst = Substitution::new().extended(Variable::new("y"), x());
        let result = unify(&x(), &f(vec![y()]), &subst);
        assert!(matches!(result, Err(UnificationError::OccursCheck(_, _))));
    }

    #[test]
    fn test_unify_variable_uses_existing_bindings() {
        let subst = Substitution::new().extended(Variable::new("x"), c("a"));
        assert!(unify_variable(&Variable::new("x"), &c("a"), &subst).is_ok());
        assert!(unify_variable(&Variable::new("x"), &c("b"), &subst).is_err());

        // x unbound, y bound to a: x gets a through y
        let subst = Substitution::new().extended(Variable::new("y"), c("a"));
        let result = unify_variable(&Variable::new("x"), &y(), &subst).unwrap();
        assert_eq!(result.apply(&x()), c("a"));
    }

    #[test]
    fn test_unify_variable_with_itself() {
        let result = unify_variable(&Variable::new("x"), &x(), &Substitution::new()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_input_substitution_is_not_modified() {
        let base = Substitution::new().extended(Variable::new("x"), c("a"));
        let extended = unify(&y(), &c("b"), &base).unwrap();
        assert_eq!(base.len(), 1);
        assert_eq!(extended.len(), 2);
    }

    #[test]
    fn test_unify_literals() {
        let empty = Substitution::new();
        let l1 = Literal::positive("Parent", vec![x(), c("Mary")]);
        let l2 = Literal::negative("Parent", vec![c("John"), y()]);
        let mgu = unify_literals(&l1, &l2, &empty).unwrap();
        assert_eq!(mgu.apply(&x()), c("John"));
        assert_eq!(mgu.apply(&y()), c("Mary"));

        let l3 = Literal::positive("Father", vec![x(), y()]);
        assert!(matches!(
            unify_literals(&l1, &l3, &empty),
            Err(UnificationError::PredicateClash(_, _))
        ));

        let l4 = Literal::positive("Parent", vec![x()]);
        assert!(matches!(
            unify_literals(&l1, &l4, &empty),
            Err(UnificationError::ArityMismatch(2, 1))
        ));
    }
}
