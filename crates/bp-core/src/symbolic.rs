//! Symbolic variables, joint assignments, and boolean expressions over them.
//!
//! # Model
//!
//! A [`Vocabulary`] declares every shared variable together with its finite,
//! ordered domain (e.g. one action variable per controlled vehicle, domain =
//! the discrete action set).  Units build [`Expr`]s through [`Var`] handles
//! and never see the vocabulary itself; the symbolic strategy validates every
//! expression against it before solving.
//!
//! Declaration order matters: the solver enumerates variables in declaration
//! order and each domain in its declared order, which is what makes the first
//! solution found reproducible.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Not;

use crate::{BpError, BpResult, Symbol};

// ── Var ───────────────────────────────────────────────────────────────────────

/// Handle to a declared symbolic variable.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Var {
    name: Symbol,
}

impl Var {
    /// A handle by name.  Nothing checks that the name is declared until a
    /// strategy validates an expression that mentions it.
    pub fn new(name: impl Into<Symbol>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &Symbol {
        &self.name
    }

    /// `self == value`.
    pub fn is(&self, value: impl Into<Symbol>) -> Expr {
        Expr::Eq(self.clone(), value.into())
    }

    /// `self != value`.
    pub fn is_not(&self, value: impl Into<Symbol>) -> Expr {
        !self.is(value)
    }

    /// `self ∈ values`.
    pub fn one_of<I, S>(&self, values: I) -> Expr
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        Expr::any(values.into_iter().map(|v| self.is(v)))
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

// ── Vocabulary ────────────────────────────────────────────────────────────────

/// One declared variable and its domain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VarDecl {
    pub var:    Var,
    pub domain: Vec<Symbol>,
}

impl VarDecl {
    pub fn contains(&self, value: &Symbol) -> bool {
        self.domain.contains(value)
    }
}

/// The ordered set of symbolic variable declarations of one program.
#[derive(Clone, Debug, Default)]
pub struct Vocabulary {
    decls: Vec<VarDecl>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name` ranging over `domain`.
    ///
    /// The domain must be non-empty and free of duplicates; names must be
    /// unique within the vocabulary.
    pub fn declare<I, S>(&mut self, name: impl Into<Symbol>, domain: I) -> BpResult<Var>
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        let name = name.into();
        if self.get(&name).is_some() {
            return Err(BpError::DuplicateVariable(name));
        }
        let mut values: Vec<Symbol> = Vec::new();
        for v in domain {
            let v = v.into();
            if values.contains(&v) {
                return Err(BpError::DuplicateValue { var: name, value: v });
            }
            values.push(v);
        }
        if values.is_empty() {
            return Err(BpError::EmptyDomain(name));
        }
        let var = Var::new(name);
        self.decls.push(VarDecl { var: var.clone(), domain: values });
        Ok(var)
    }

    pub fn get(&self, name: &Symbol) -> Option<&VarDecl> {
        self.decls.iter().find(|d| d.var.name() == name)
    }

    pub fn decls(&self) -> &[VarDecl] {
        &self.decls
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Number of total assignments, saturating at `u128::MAX`.
    pub fn space_size(&self) -> u128 {
        self.decls
            .iter()
            .fold(1u128, |acc, d| acc.saturating_mul(d.domain.len() as u128))
    }

    /// Check that every variable and value mentioned by `expr` is declared.
    pub fn validate(&self, expr: &Expr) -> BpResult<()> {
        match expr {
            Expr::True | Expr::False => Ok(()),
            Expr::Eq(var, value) => {
                let decl = self
                    .get(var.name())
                    .ok_or_else(|| BpError::UnknownVariable(var.name().clone()))?;
                if decl.contains(value) {
                    Ok(())
                } else {
                    Err(BpError::UnknownValue { var: var.name().clone(), value: value.clone() })
                }
            }
            Expr::Not(inner) => self.validate(inner),
            Expr::And(es) | Expr::Or(es) => es.iter().try_for_each(|e| self.validate(e)),
        }
    }
}

// ── Assignment ────────────────────────────────────────────────────────────────

/// A (possibly partial) map from variable name to domain value.
///
/// The symbolic strategy only ever hands *total* assignments to units.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment(BTreeMap<Symbol, Symbol>);

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, var: &Var, value: impl Into<Symbol>) -> Option<Symbol> {
        self.0.insert(var.name().clone(), value.into())
    }

    pub fn remove(&mut self, var: &Var) -> Option<Symbol> {
        self.0.remove(var.name())
    }

    /// Builder-style insert.
    pub fn with(mut self, var: &Var, value: impl Into<Symbol>) -> Self {
        self.insert(var, value);
        self
    }

    pub fn get(&self, var: &Var) -> Option<&Symbol> {
        self.0.get(var.name())
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Symbol> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &Symbol)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k}={v}")?;
        }
        f.write_str("}")
    }
}

// ── Expr ──────────────────────────────────────────────────────────────────────

/// Boolean expression over symbolic variables.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Expr {
    True,
    False,
    Eq(Var, Symbol),
    Not(Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
}

impl Expr {
    /// Conjunction of `exprs`; `True` when empty.
    pub fn all(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        let es: Vec<Expr> = exprs.into_iter().collect();
        match es.len() {
            0 => Expr::True,
            1 => es.into_iter().next().unwrap_or(Expr::True),
            _ => Expr::And(es),
        }
    }

    /// Disjunction of `exprs`; `False` when empty.
    pub fn any(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        let es: Vec<Expr> = exprs.into_iter().collect();
        match es.len() {
            0 => Expr::False,
            1 => es.into_iter().next().unwrap_or(Expr::False),
            _ => Expr::Or(es),
        }
    }

    pub fn and(self, other: Expr) -> Expr {
        match self {
            Expr::And(mut es) => {
                es.push(other);
                Expr::And(es)
            }
            e => Expr::And(vec![e, other]),
        }
    }

    pub fn or(self, other: Expr) -> Expr {
        match self {
            Expr::Or(mut es) => {
                es.push(other);
                Expr::Or(es)
            }
            e => Expr::Or(vec![e, other]),
        }
    }

    /// Three-valued evaluation against a partial assignment.
    ///
    /// Returns `None` when the result depends on a variable that is still
    /// unassigned.  The solver uses this to prune a branch as soon as it is
    /// decided.
    pub fn eval_partial(&self, a: &Assignment) -> Option<bool> {
        match self {
            Expr::True => Some(true),
            Expr::False => Some(false),
            Expr::Eq(var, value) => a.get(var).map(|v| v == value),
            Expr::Not(inner) => inner.eval_partial(a).map(|b| !b),
            Expr::And(es) => {
                let mut unknown = false;
                for e in es {
                    match e.eval_partial(a) {
                        Some(false) => return Some(false),
                        None => unknown = true,
                        Some(true) => {}
                    }
                }
                if unknown { None } else { Some(true) }
            }
            Expr::Or(es) => {
                let mut unknown = false;
                for e in es {
                    match e.eval_partial(a) {
                        Some(true) => return Some(true),
                        None => unknown = true,
                        Some(false) => {}
                    }
                }
                if unknown { None } else { Some(false) }
            }
        }
    }

    /// Evaluate against a total assignment.  Unassigned variables make their
    /// comparisons undecided, which counts as `false`.
    pub fn eval(&self, a: &Assignment) -> bool {
        self.eval_partial(a).unwrap_or(false)
    }

    /// Syntactically `False` (including an empty disjunction).
    pub fn is_false(&self) -> bool {
        match self {
            Expr::False => true,
            Expr::Or(es) => es.iter().all(Expr::is_false),
            _ => false,
        }
    }

    /// Syntactically `True` (including an empty conjunction).
    pub fn is_true(&self) -> bool {
        match self {
            Expr::True => true,
            Expr::And(es) => es.iter().all(Expr::is_true),
            _ => false,
        }
    }
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        match self {
            Expr::True => Expr::False,
            Expr::False => Expr::True,
            Expr::Not(inner) => *inner,
            e => Expr::Not(Box::new(e)),
        }
    }
}

impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        if b { Expr::True } else { Expr::False }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, es: &[Expr], op: &str) -> fmt::Result {
            f.write_str("(")?;
            for (i, e) in es.iter().enumerate() {
                if i > 0 {
                    write!(f, " {op} ")?;
                }
                write!(f, "{e}")?;
            }
            f.write_str(")")
        }
        match self {
            Expr::True => f.write_str("true"),
            Expr::False => f.write_str("false"),
            Expr::Eq(var, value) => write!(f, "{var} == {value}"),
            Expr::Not(inner) => write!(f, "!{inner}"),
            Expr::And(es) => join(f, es, "&&"),
            Expr::Or(es) => join(f, es, "||"),
        }
    }
}
