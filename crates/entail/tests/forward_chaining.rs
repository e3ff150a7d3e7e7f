//! Integration tests for forward chaining

use entail::{
    forward_chain, parse_literal, parse_program, BudgetExhausted, ForwardConfig, ForwardStatus,
    Literal, TraceEvent,
};

fn run(source: &str, query: &str, config: &ForwardConfig) -> entail::ForwardResult {
    let program = parse_program(source).unwrap();
    let kb = program.to_horn().unwrap();
    let query = parse_literal(query).unwrap();
    forward_chain(&kb, &query, config).unwrap()
}

const FAMILY: &str = r#"
    Father(John, Mary).
    Parent(Mary, Susan).
    Parent(?x, ?y) :- Father(?x, ?y).
    Grandparent(?x, ?z) :- Parent(?x, ?y), Parent(?y, ?z).
"#;

#[test]
fn test_grandparent_scenario() {
    let result = run(FAMILY, "Grandparent(John, Susan)", &ForwardConfig::default());

    assert!(result.is_proved());
    let derived: Vec<String> = result.trace.iter().map(ToString::to_string).collect();
    assert_eq!(
        derived,
        vec![
            "Derived new fact: Parent(John,Mary)",
            "Derived new fact: Grandparent(John,Susan)",
        ]
    );
}

#[test]
fn test_trace_records_rule_and_round() {
    let result = run(FAMILY, "Grandparent(John, Susan)", &ForwardConfig::default());
    match &result.trace[0] {
        TraceEvent::FactDerived { round, rule, .. } => {
            assert_eq!(*round, 1);
            assert_eq!(*rule, 0);
        }
        other => panic!("Expected fact event, got {:?}", other),
    }
}

#[test]
fn test_unrelated_query_saturates() {
    let result = run(FAMILY, "Grandparent(Mary, John)", &ForwardConfig::default());
    assert_eq!(result.status, ForwardStatus::Saturated);

    // Parent(John,Mary) and Grandparent(John,Susan) are everything derivable
    assert_eq!(result.derived_facts().count(), 2);
}

#[test]
fn test_monotonic_and_deterministic() {
    let program = parse_program(FAMILY).unwrap();
    let kb = program.to_horn().unwrap();
    let query = parse_literal("Grandparent(Susan, John)").unwrap();

    let first = forward_chain(&kb, &query, &ForwardConfig::default()).unwrap();
    let second = forward_chain(&kb, &query, &ForwardConfig::default()).unwrap();

    for fact in kb.facts() {
        assert!(first.known.contains(fact));
    }
    assert_eq!(first.known, second.known);
    assert_eq!(first.trace, second.trace);
}

#[test]
fn test_definite_clauses_feed_forward_chaining() {
    let source = r#"
        Man(Marcus).
        ~Man(?x) | Human(?x).
        ~Human(?x) | Mortal(?x).
    "#;
    let result = run(source, "Mortal(Marcus)", &ForwardConfig::default());
    assert!(result.is_proved());
}

#[test]
fn test_non_definite_clause_rejected() {
    let program = parse_program("Man(Marcus). Human(?x) | God(?x).").unwrap();
    assert!(matches!(
        program.to_horn(),
        Err(entail::EntailError::NotDefinite(_))
    ));
}

#[test]
fn test_unsafe_rule_rejected_at_construction() {
    let program = parse_program("Parent(?x, ?y) :- Person(?x).").unwrap();
    assert!(matches!(
        program.to_horn(),
        Err(entail::EntailError::UnsafeRule { .. })
    ));
}

#[test]
fn test_arity_conflict_rejected() {
    let program = parse_program("Parent(John, Mary). Parent(John).").unwrap();
    assert!(matches!(
        program.to_horn(),
        Err(entail::EntailError::ArityMismatch { .. })
    ));
}

#[test]
fn test_unbounded_rules_are_inconclusive() {
    let source = r#"
        Nat(zero).
        Nat(s(?n)) :- Nat(?n).
    "#;
    let config = ForwardConfig {
        max_rounds: 10,
        ..ForwardConfig::default()
    };
    let result = run(source, "Nat(minus_one)", &config);
    assert_eq!(
        result.status,
        ForwardStatus::Inconclusive {
            reason: BudgetExhausted::Rounds { limit: 10 }
        }
    );

    // A reachable numeral is still found within budget
    let result = run(source, "Nat(s(s(s(zero))))", &config);
    assert!(result.is_proved());
}

#[test]
fn test_zero_timeout_is_inconclusive() {
    let config = ForwardConfig {
        timeout_ms: Some(0),
        ..ForwardConfig::default()
    };
    let result = run(FAMILY, "Grandparent(John, Susan)", &config);
    assert!(matches!(
        result.status,
        ForwardStatus::Inconclusive {
            reason: BudgetExhausted::Timeout { .. }
        }
    ));
}

#[test]
fn test_query_must_be_ground() {
    let program = parse_program(FAMILY).unwrap();
    let kb = program.to_horn().unwrap();
    let query: Literal = parse_literal("Grandparent(John, ?who)").unwrap();
    assert!(forward_chain(&kb, &query, &ForwardConfig::default()).is_err());
}
