//! Error types for entail

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EntailError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Malformed literal {literal}: {reason}")]
    MalformedLiteral { literal: String, reason: String },

    #[error("Arity mismatch for predicate {predicate}: expected {expected}, found {found}")]
    ArityMismatch {
        predicate: String,
        expected: usize,
        found: usize,
    },

    #[error("Fact {0} is not ground")]
    NonGroundFact(String),

    #[error("Unsafe rule {rule}: head variable {variable} does not occur in any premise")]
    UnsafeRule { rule: String, variable: String },

    #[error("Clause {0} is not a definite clause and cannot be used for forward chaining")]
    NotDefinite(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, EntailError>;
