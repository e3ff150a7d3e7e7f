//! entail: first-order entailment checking
//!
//! Two strategies over one term, substitution and unification core:
//! forward chaining over definite rules and resolution refutation over
//! general clauses.

pub mod config;
pub mod error;
pub mod fol;
pub mod forward;
pub mod json;
pub mod kb;
pub mod parser;
pub mod resolution;
pub mod trace;
pub mod unification;

// Re-export commonly used types from fol
pub use fol::{Clause, Constant, FunctionSymbol, Literal, Substitution, Term, Variable};

pub use config::{EngineConfig, ForwardConfig, ResolutionConfig};
pub use error::{EntailError, Result};
pub use kb::{ClauseKnowledgeBase, HornKnowledgeBase, Program, Rule, Signature};
pub use trace::{BudgetExhausted, TraceEvent};

pub use forward::{forward_chain, ForwardResult, ForwardStatus};
pub use resolution::{resolve, resolvents, Derivation, Proof, ProofStep, ResolutionResult, ResolutionStatus};

pub use unification::{unify, unify_literals, UnificationError, UnificationResult};

pub use parser::{parse_file, parse_literal, parse_program};
