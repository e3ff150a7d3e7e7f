//! Parser for the `.kb` knowledge-base format
//!
//! ```text
//! % comment
//! Father(John, Mary).                                  fact
//! Parent(?x, ?y) :- Father(?x, ?y).                    rule
//! ~Man(?x) | Human(?x).                                clause
//! ?- Grandparent(John, ?who).                          query
//! ```
//!
//! Variables carry a `?` sigil. Any other name is a constant, or a function
//! symbol when directly followed by `(`. A single ground positive literal is a
//! fact; every other disjunction is kept as a general clause.

mod syntax;

use crate::error::{EntailError, Result};
use crate::fol::{Clause, Literal};
use crate::kb::{Program, Rule};
use nom::combinator::all_consuming;
use nom::Finish;
use std::path::Path;
use syntax::Statement;

/// Parse a whole `.kb` source
pub fn parse_program(input: &str) -> Result<Program> {
    let text = strip_comments(input);
    let mut program = Program::default();
    let mut rest = text.as_str();

    while !rest.trim().is_empty() {
        match syntax::statement(rest).finish() {
            Ok((remaining, statement)) => {
                add_statement(&mut program, statement);
                rest = remaining;
            }
            Err(e) => {
                let offset = text.len() - e.input.len();
                return Err(EntailError::Parse(format!(
                    "line {}: cannot parse statement near {:?}",
                    line_of(&text, offset),
                    snippet(e.input)
                )));
            }
        }
    }

    Ok(program)
}

/// Read and parse a `.kb` file
pub fn parse_file(path: impl AsRef<Path>) -> Result<Program> {
    let content = std::fs::read_to_string(path)?;
    parse_program(&content)
}

/// Parse a single literal such as `~Parent(?x, John)`
pub fn parse_literal(input: &str) -> Result<Literal> {
    all_consuming(syntax::literal)(input.trim())
        .finish()
        .map(|(_, literal)| literal)
        .map_err(|e| EntailError::Parse(format!("invalid literal {:?} near {:?}", input, snippet(e.input))))
}

fn add_statement(program: &mut Program, statement: Statement) {
    match statement {
        Statement::Query(query) => program.queries.push(query),
        Statement::Rule(head, premises) => program.rules.push(Rule::new(head, premises)),
        Statement::Disjunction(mut literals) => {
            if literals.len() == 1 && literals[0].polarity && literals[0].is_ground() {
                program.facts.extend(literals.pop());
            } else {
                program.clauses.push(Clause::new(literals));
            }
        }
    }
}

/// Drop everything from `%` to the end of each line, keeping line breaks
fn strip_comments(input: &str) -> String {
    input
        .lines()
        .map(|line| line.split('%').next().unwrap_or(""))
        .collect::<Vec<_>>()
        .join("\n")
}

fn line_of(text: &str, offset: usize) -> usize {
    // Point at the first non-blank character of the failing statement
    let skipped = text[offset..].len() - text[offset..].trim_start().len();
    text[..offset + skipped].matches('\n').count() + 1
}

fn snippet(input: &str) -> String {
    input.trim_start().chars().take(24).collect()
}
