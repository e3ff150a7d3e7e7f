//! Unification algorithm for first-order terms

mod mgu;


pub use mgu::{
    unify, unify_literals, unify_terms, unify_variable, UnificationError, UnificationResult,
};
