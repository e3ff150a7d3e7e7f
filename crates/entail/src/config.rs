//! Engine configuration types.
//!
//! Every limit uses 0 for "no limit". Hitting a limit ends the search with an
//! inconclusive result rather than a negative one.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Search budget for forward chaining
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForwardConfig {
    /// Passes over the rule set
    pub max_rounds: usize,
    /// Size of the known fact set, initial facts included
    pub max_facts: usize,
    pub timeout_ms: Option<u64>,
}

impl Default for ForwardConfig {
    fn default() -> Self {
        ForwardConfig {
            max_rounds: 1_000,
            max_facts: 100_000,
            timeout_ms: None,
        }
    }
}

impl ForwardConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// Search budget for resolution refutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Rounds of pairwise resolution
    pub max_rounds: usize,
    /// Size of the clause database, input clauses and negated query included
    pub max_clauses: usize,
    pub timeout_ms: Option<u64>,
    /// Skip clause pairs already examined in an earlier round
    pub memoize_pairs: bool,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        ResolutionConfig {
            max_rounds: 64,
            max_clauses: 10_000,
            timeout_ms: None,
            memoize_pairs: true,
        }
    }
}

impl ResolutionConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// Both engine budgets, as read from a TOML file:
///
/// ```toml
/// [forward]
/// max_rounds = 100
///
/// [resolution]
/// max_clauses = 5000
/// memoize_pairs = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub forward: ForwardConfig,
    pub resolution: ResolutionConfig,
}

impl EngineConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

/// Deadline tracking shared by both engines
#[derive(Debug, Clone, Copy)]
pub(crate) struct Budget {
    started: std::time::Instant,
    timeout: Option<Duration>,
}

impl Budget {
    pub(crate) fn start(timeout: Option<Duration>) -> Self {
        Budget {
            started: std::time::Instant::now(),
            timeout,
        }
    }

    pub(crate) fn timed_out(&self) -> bool {
        self.timeout
            .is_some_and(|limit| self.started.elapsed() >= limit)
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Limit check where 0 disables the limit
pub(crate) fn exceeds(value: usize, limit: usize) -> bool {
    limit != 0 && value > limit
}
