//! Clauses (disjunctions of literals)

use super::literal::Literal;
use super::term::Variable;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// A clause: a set of literals read as their disjunction.
///
/// Duplicate literals are merged on construction, keeping first-occurrence
/// order. The empty clause stands for a contradiction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clause {
    pub literals: Vec<Literal>,
}

impl Clause {
    /// Create a new clause from literals
    pub fn new(literals: Vec<Literal>) -> Self {
        let mut seen = IndexSet::with_capacity(literals.len());
        for lit in literals {
            seen.insert(lit);
        }
        Clause {
            literals: seen.into_iter().collect(),
        }
    }

    pub fn unit(literal: Literal) -> Self {
        Clause {
            literals: vec![literal],
        }
    }

    pub fn empty() -> Self {
        Clause { literals: vec![] }
    }

    /// Check if this clause is empty (contradiction)
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// At most one positive literal
    pub fn is_horn(&self) -> bool {
        self.positive_literals().count() <= 1
    }

    /// Exactly one positive literal
    pub fn is_definite(&self) -> bool {
        self.positive_literals().count() == 1
    }

    pub fn positive_literals(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter().filter(|lit| lit.polarity)
    }

    pub fn negative_literals(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter().filter(|lit| !lit.polarity)
    }

    pub fn is_ground(&self) -> bool {
        self.literals.iter().all(Literal::is_ground)
    }

    pub fn variables(&self) -> Vec<Variable> {
        let mut vars = IndexSet::new();
        for lit in &self.literals {
            lit.collect_variables(&mut vars);
        }
        vars.into_iter().collect()
    }

    /// Rename every variable so this clause shares none with a clause renamed
    /// under a different tag.
    pub fn rename_apart(&self, tag: &str) -> Clause {
        let mut rename = |v: &Variable| Variable::new(format!("{}#{}", v.name, tag));
        Clause {
            literals: self
                .literals
                .iter()
                .map(|lit| lit.map_variables(&mut rename))
                .collect(),
        }
    }

    /// Canonical representative of this clause's variants.
    ///
    /// Literals are grouped by their shape with variables masked and the groups
    /// are laid out in shape order. Within the groups, the literal order is the
    /// one whose first-occurrence renaming to `_0`, `_1`, ... gives the least
    /// literal sequence. Two clauses normalize to the same value exactly when
    /// they differ only in variable names and literal order.
    pub fn normalized(&self) -> Clause {
        let mut literals = self.literals.clone();
        literals.sort_by_cached_key(shape);

        let mut groups = Vec::with_capacity(literals.len());
        let mut start = 0;
        for end in 1..=literals.len() {
            if end == literals.len() || shape(&literals[end]) != shape(&literals[start]) {
                groups.extend(std::iter::repeat(start..end).take(end - start));
                start = end;
            }
        }

        let mut search = LeastRenaming {
            literals: &literals,
            groups,
            best: None,
        };
        search.visit(&mut vec![false; literals.len()], &mut Vec::new(), &IndexMap::new());
        Clause {
            literals: search.best.unwrap_or_default(),
        }
    }

    /// Same clause up to variable renaming and literal order
    pub fn is_variant_of(&self, other: &Clause) -> bool {
        self.len() == other.len() && self.normalized() == other.normalized()
    }
}

/// A literal with every variable replaced by the same placeholder
fn shape(literal: &Literal) -> Literal {
    literal.map_variables(&mut |_| Variable::new(""))
}

/// Depth-first search for the literal order with the least renaming.
///
/// Position `k` may only hold a literal from `groups[k]`. Any candidate whose
/// renamed form is larger than another candidate's at the same position
/// cannot start the least sequence, so only ties are branched on.
struct LeastRenaming<'a> {
    literals: &'a [Literal],
    groups: Vec<Range<usize>>,
    best: Option<Vec<Literal>>,
}

impl LeastRenaming<'_> {
    fn visit(
        &mut self,
        used: &mut [bool],
        placed: &mut Vec<Literal>,
        names: &IndexMap<Variable, Variable>,
    ) {
        let k = placed.len();
        if k == self.literals.len() {
            if self.best.as_ref().map_or(true, |best| placed.as_slice() < best.as_slice()) {
                self.best = Some(placed.clone());
            }
            return;
        }

        let mut candidates = Vec::new();
        for i in self.groups[k].clone() {
            if used[i] {
                continue;
            }
            let mut names = names.clone();
            let renamed = self.literals[i].map_variables(&mut |v: &Variable| {
                let next = names.len();
                names
                    .entry(v.clone())
                    .or_insert_with(|| Variable::new(format!("_{}", next)))
                    .clone()
            });
            candidates.push((i, renamed, names));
        }

        let Some(least) = candidates.iter().map(|(_, lit, _)| lit).min().cloned() else {
            return;
        };
        for (i, renamed, names) in candidates {
            if renamed != least {
                continue;
            }
            used[i] = true;
            placed.push(renamed);
            self.visit(used, placed, &names);
            placed.pop();
            used[i] = false;
        }
    }
}

impl From<Literal> for Clause {
    fn from(literal: Literal) -> Self {
        Clause::unit(literal)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "⊥")
        } else {
            for (i, lit) in self.literals.iter().enumerate() {
                if i > 0 {
                    write!(f, " | ")?;
                }
                write!(f, "{}", lit)?;
            }
            Ok(())
        }
    }
}
