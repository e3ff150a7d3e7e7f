//! First-order logic data structures
//!
//! This module provides the fundamental types for representing FOL sentences:
//! terms, literals, clauses and substitutions.

pub mod clause;
pub mod literal;
pub mod substitution;
pub mod term;


pub use clause::Clause;
pub use literal::Literal;
pub use substitution::Substitution;
pub use term::{Constant, FunctionSymbol, Term, Variable};
