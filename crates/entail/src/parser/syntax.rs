//! nom grammar for `.kb` statements

use crate::fol::{Literal, Term};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, multispace0},
    combinator::{map, opt},
    multi::{separated_list0, separated_list1},
    sequence::{delimited, pair, preceded, separated_pair, terminated, tuple},
    IResult,
};

/// One statement, before it is sorted into a program
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Statement {
    /// `L1 | ... | Ln.` (a single ground positive literal is a fact)
    Disjunction(Vec<Literal>),
    /// `H :- P1, ..., Pn.`
    Rule(Literal, Vec<Literal>),
    /// `?- L.`
    Query(Literal),
}

/// Wrap a parser so it accepts surrounding whitespace
fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

/// `?name`
fn variable_term(input: &str) -> IResult<&str, Term> {
    map(preceded(char('?'), identifier), Term::var)(input)
}

/// `name` or `name(t1, ..., tn)` with n >= 1
fn symbol_term(input: &str) -> IResult<&str, Term> {
    let (input, name) = identifier(input)?;
    let (input, args) = opt(delimited(
        pair(char('('), multispace0),
        separated_list1(ws(char(',')), term),
        pair(multispace0, char(')')),
    ))(input)?;

    let term = match args {
        Some(args) => Term::function(name, args),
        None => Term::constant(name),
    };
    Ok((input, term))
}

pub(crate) fn term(input: &str) -> IResult<&str, Term> {
    alt((variable_term, symbol_term))(input)
}

/// `Pred(t1, ..., tn)`, `Pred()` or bare `Pred`
fn atom(input: &str) -> IResult<&str, (&str, Vec<Term>)> {
    let (input, name) = identifier(input)?;
    let (input, args) = opt(delimited(
        pair(char('('), multispace0),
        separated_list0(ws(char(',')), term),
        pair(multispace0, char(')')),
    ))(input)?;
    Ok((input, (name, args.unwrap_or_default())))
}

/// An atom, optionally negated with `~`
pub(crate) fn literal(input: &str) -> IResult<&str, Literal> {
    let (input, negated) = opt(terminated(char('~'), multispace0))(input)?;
    let (input, (predicate, args)) = atom(input)?;
    let literal = if negated.is_some() {
        Literal::negative(predicate, args)
    } else {
        Literal::positive(predicate, args)
    };
    Ok((input, literal))
}

fn query(input: &str) -> IResult<&str, Statement> {
    map(preceded(pair(tag("?-"), multispace0), literal), Statement::Query)(input)
}

fn rule(input: &str) -> IResult<&str, Statement> {
    map(
        separated_pair(literal, ws(tag(":-")), separated_list1(ws(char(',')), literal)),
        |(head, premises)| Statement::Rule(head, premises),
    )(input)
}

fn disjunction(input: &str) -> IResult<&str, Statement> {
    map(separated_list1(ws(char('|')), literal), Statement::Disjunction)(input)
}

/// One statement terminated by `.`, with leading and trailing whitespace
pub(crate) fn statement(input: &str) -> IResult<&str, Statement> {
    delimited(
        multispace0,
        alt((query, rule, disjunction)),
        tuple((multispace0, char('.'), multispace0)),
    )(input)
}
