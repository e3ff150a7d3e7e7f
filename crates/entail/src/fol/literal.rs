//! Literals in first-order logic

use super::term::{Term, Variable};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A literal (positive or negative atomic formula)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    pub predicate: String,
    pub args: Vec<Term>,
    pub polarity: bool, // true = positive, false = negative
}

impl Literal {
    /// Create a new positive literal
    pub fn positive(predicate: impl Into<String>, args: Vec<Term>) -> Self {
        Literal {
            predicate: predicate.into(),
            args,
            polarity: true,
        }
    }

    /// Create a new negative literal
    pub fn negative(predicate: impl Into<String>, args: Vec<Term>) -> Self {
        Literal {
            predicate: predicate.into(),
            args,
            polarity: false,
        }
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// Get the complement of this literal
    pub fn complement(&self) -> Literal {
        Literal {
            predicate: self.predicate.clone(),
            args: self.args.clone(),
            polarity: !self.polarity,
        }
    }

    /// Same predicate and arity, opposite polarity. Arguments are left to the unifier.
    pub fn is_complementary_to(&self, other: &Literal) -> bool {
        self.polarity != other.polarity
            && self.predicate == other.predicate
            && self.args.len() == other.args.len()
    }

    pub fn is_ground(&self) -> bool {
        self.args.iter().all(Term::is_ground)
    }

    pub fn variables(&self) -> Vec<Variable> {
        let mut vars = IndexSet::new();
        self.collect_variables(&mut vars);
        vars.into_iter().collect()
    }

    pub fn collect_variables(&self, vars: &mut IndexSet<Variable>) {
        for term in &self.args {
            term.collect_variables(vars);
        }
    }

    pub fn map_variables(&self, f: &mut impl FnMut(&Variable) -> Variable) -> Literal {
        Literal {
            predicate: self.predicate.clone(),
            args: self.args.iter().map(|arg| arg.map_variables(f)).collect(),
            polarity: self.polarity,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.polarity {
            write!(f, "~")?;
        }
        write!(f, "{}(", self.predicate)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}
