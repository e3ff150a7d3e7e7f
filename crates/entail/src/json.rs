//! JSON serialization types for query results

use crate::fol::Literal;
use crate::forward::{ForwardResult, ForwardStatus};
use crate::resolution::{Proof, ProofStep, ResolutionResult, ResolutionStatus};
use serde::{Deserialize, Serialize};

/// Outcome of one query, engine-independent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Proved,
    NotEntailed,
    Inconclusive,
}

/// JSON representation of an inference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceJson {
    pub rule: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub premises: Vec<usize>,
}

/// JSON representation of a proof step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStepJson {
    pub clause_idx: usize,
    pub clause: String,
    pub inference: InferenceJson,
}

impl From<&ProofStep> for ProofStepJson {
    fn from(step: &ProofStep) -> Self {
        ProofStepJson {
            clause_idx: step.clause_idx,
            clause: step.conclusion.to_string(),
            inference: InferenceJson {
                rule: step.derivation.rule_name.clone(),
                premises: step.derivation.premises.clone(),
            },
        }
    }
}

/// JSON representation of a proof
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofJson {
    pub steps: Vec<ProofStepJson>,
    pub empty_clause_idx: usize,
}

impl From<&Proof> for ProofJson {
    fn from(proof: &Proof) -> Self {
        ProofJson {
            steps: proof.steps.iter().map(ProofStepJson::from).collect(),
            empty_clause_idx: proof.empty_clause_idx,
        }
    }
}

/// JSON report for one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryReportJson {
    pub query: String,
    pub engine: String,
    pub result: Verdict,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reason: Option<String>,
    pub rounds: usize,
    /// Facts or clauses added by the engine, in derivation order
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub derived: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub proof: Option<ProofJson>,
}

impl QueryReportJson {
    pub fn from_forward(query: &Literal, result: &ForwardResult) -> Self {
        let (verdict, reason) = match &result.status {
            ForwardStatus::Proved => (Verdict::Proved, None),
            ForwardStatus::Saturated => (Verdict::NotEntailed, None),
            ForwardStatus::Inconclusive { reason } => (Verdict::Inconclusive, Some(reason.to_string())),
        };
        QueryReportJson {
            query: query.to_string(),
            engine: "forward".into(),
            result: verdict,
            reason,
            rounds: result.rounds,
            derived: result.trace.iter().map(ToString::to_string).collect(),
            proof: None,
        }
    }

    pub fn from_resolution(query: &Literal, result: &ResolutionResult) -> Self {
        let (verdict, reason, proof) = match &result.status {
            ResolutionStatus::Refuted { proof } => (Verdict::Proved, None, Some(ProofJson::from(proof))),
            ResolutionStatus::Exhausted => (Verdict::NotEntailed, None, None),
            ResolutionStatus::Inconclusive { reason } => {
                (Verdict::Inconclusive, Some(reason.to_string()), None)
            }
        };
        QueryReportJson {
            query: query.to_string(),
            engine: "resolution".into(),
            result: verdict,
            reason,
            rounds: result.rounds,
            derived: result.trace.iter().map(ToString::to_string).collect(),
            proof,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ForwardConfig, ResolutionConfig};
    use crate::parser::parse_program;

    const MORTAL: &str = "
        Man(Marcus).
        Human(?x) :- Man(?x).
        Mortal(?x) :- Human(?x).
    ";

    #[test]
    fn test_forward_report() {
        let program = parse_program(MORTAL).unwrap();
        let kb = program.to_horn().unwrap();
        let query = crate::parser::parse_literal("Mortal(Marcus)").unwrap();
        let result = crate::forward::forward_chain(&kb, &query, &ForwardConfig::default()).unwrap();

        let report = QueryReportJson::from_forward(&query, &result);
        assert_eq!(report.result, Verdict::Proved);
        assert_eq!(
            report.derived,
            vec![
                "Derived new fact: Human(Marcus)".to_string(),
                "Derived new fact: Mortal(Marcus)".to_string()
            ]
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["result"], "proved");
        assert_eq!(json["engine"], "forward");
        assert!(json.get("proof").is_none());
        assert!(json.get("reason").is_none());
    }

    #[test]
    fn test_resolution_report_carries_proof() {
        let program = parse_program(MORTAL).unwrap();
        let kb = program.to_clauses().unwrap();
        let query = crate::parser::parse_literal("Mortal(Marcus)").unwrap();
        let result = crate::resolution::resolve(&kb, &query, &ResolutionConfig::default()).unwrap();

        let report = QueryReportJson::from_resolution(&query, &result);
        assert_eq!(report.result, Verdict::Proved);
        let proof = report.proof.as_ref().unwrap();
        let last = proof.steps.last().unwrap();
        assert_eq!(last.clause_idx, proof.empty_clause_idx);
        assert_eq!(last.clause, "⊥");
        assert_eq!(last.inference.rule, "Resolution");

        let text = serde_json::to_string(&report).unwrap();
        let parsed: QueryReportJson = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_inconclusive_report() {
        let program = parse_program("Nat(zero).\nNat(s(?n)) :- Nat(?n).").unwrap();
        let kb = program.to_clauses().unwrap();
        let query = crate::parser::parse_literal("Nat(minus_one)").unwrap();
        let config = ResolutionConfig {
            max_rounds: 3,
            ..ResolutionConfig::default()
        };
        let result = crate::resolution::resolve(&kb, &query, &config).unwrap();

        let status = serde_json::to_value(&result.status).unwrap();
        assert_eq!(status["status"], "inconclusive");
        assert_eq!(status["reason"]["kind"], "rounds");
        assert_eq!(status["reason"]["limit"], 3);
        let parsed: ResolutionStatus = serde_json::from_value(status).unwrap();
        assert_eq!(parsed, result.status);

        let report = QueryReportJson::from_resolution(&query, &result);
        assert_eq!(report.result, Verdict::Inconclusive);
        assert_eq!(report.reason.as_deref(), Some("round limit 3 reached"));
        let text = serde_json::to_string(&report).unwrap();
        let parsed: QueryReportJson = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_not_entailed_report() {
        let program = parse_program(MORTAL).unwrap();
        let kb = program.to_clauses().unwrap();
        let query = crate::parser::parse_literal("Mortal(Caesar)").unwrap();
        let result = crate::resolution::resolve(&kb, &query, &ResolutionConfig::default()).unwrap();

        let json = serde_json::to_value(QueryReportJson::from_resolution(&query, &result)).unwrap();
        assert_eq!(json["result"], "not_entailed");
        assert!(json.get("proof").is_none());
    }
}
