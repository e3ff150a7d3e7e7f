//! Variable substitutions
//!
//! A [`Substitution`] is a value: extending one produces a new substitution and
//! leaves the original untouched, so alternative unification branches never
//! observe each other's bindings.
//!
//! Bindings may chain (`x -> ?y`, `y -> John`). [`Substitution::apply`] follows
//! such chains, which is sound because the unifier never records a binding that
//! lets a variable reach a term containing itself.

use super::clause::Clause;
use super::literal::Literal;
use super::term::{Term, Variable};
use indexmap::IndexMap;
use std::fmt;

/// A substitution mapping variables to terms, in binding order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitution {
    map: IndexMap<Variable, Term>,
}

impl Substitution {
    /// Create a new empty substitution
    pub fn new() -> Self {
        Substitution {
            map: IndexMap::new(),
        }
    }

    /// Return a copy of this substitution with `var -> term` added.
    ///
    /// The caller is responsible for the occurs check; `unify` performs it.
    pub fn extended(&self, var: Variable, term: Term) -> Substitution {
        self.clone().with_binding(var, term)
    }

    /// Consuming variant of [`Substitution::extended`] used on the unifier's
    /// owned path, where no other reference to `self` exists.
    pub(crate) fn with_binding(mut self, var: Variable, term: Term) -> Substitution {
        debug_assert!(
            !self.apply(&term).occurs(&var),
            "binding {} -> {} would be cyclic",
            var,
            term
        );
        self.map.insert(var, term);
        self
    }

    /// Get the term bound to a variable, if any (one step, no chain following)
    pub fn get(&self, var: &Variable) -> Option<&Term> {
        self.map.get(var)
    }

    pub fn contains(&self, var: &Variable) -> bool {
        self.map.contains_key(var)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn domain(&self) -> impl Iterator<Item = &Variable> {
        self.map.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &Term)> {
        self.map.iter()
    }

    /// Walk a chain of variable bindings until reaching an unbound variable or
    /// a non-variable term. Arguments of compound terms are not touched.
    pub fn resolve<'a>(&'a self, term: &'a Term) -> &'a Term {
        let mut current = term;
        while let Term::Variable(v) = current {
            match self.map.get(v) {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }

    /// Apply this substitution to a term, following chained bindings
    pub fn apply(&self, term: &Term) -> Term {
        match term {
            Term::Variable(v) => match self.map.get(v) {
                Some(bound) => self.apply(bound),
                None => term.clone(),
            },
            Term::Constant(_) => term.clone(),
            Term::Function(f, args) => {
                Term::Function(f.clone(), args.iter().map(|arg| self.apply(arg)).collect())
            }
        }
    }

    /// Compose two substitutions: applying the result equals applying `self`
    /// and then `other`.
    pub fn compose(&self, other: &Substitution) -> Substitution {
        let mut result = Substitution::new();

        for (var, term) in &self.map {
            result
                .map
                .insert(var.clone(), other.apply(&self.apply(term)));
        }

        for (var, term) in &other.map {
            if !self.map.contains_key(var) {
                result.map.insert(var.clone(), other.apply(term));
            }
        }

        result
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (var, term)) in self.map.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} -> {}", var, term)?;
        }
        write!(f, "}}")
    }
}

impl Term {
    /// Apply a substitution to this term
    pub fn apply_substitution(&self, subst: &Substitution) -> Term {
        subst.apply(self)
    }
}

impl Literal {
    /// Apply a substitution to every argument, keeping predicate and polarity
    pub fn apply_substitution(&self, subst: &Substitution) -> Literal {
        Literal {
            predicate: self.predicate.clone(),
            args: self.args.iter().map(|arg| subst.apply(arg)).collect(),
            polarity: self.polarity,
        }
    }
}

impl Clause {
    /// Apply a substitution to every literal, merging literals that become equal
    pub fn apply_substitution(&self, subst: &Substitution) -> Clause {
        Clause::new(
            self.literals
                .iter()
                .map(|lit| lit.apply_substitution(subst))
                .collect(),
        )
    }
}
