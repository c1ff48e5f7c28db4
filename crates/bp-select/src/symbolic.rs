//! Selection of a joint assignment over shared symbolic variables.
//!
//! Each unit votes with formulas over the program's [`Vocabulary`]:
//!
//! ```text
//! enabled   = request_1 ∨ … ∨ request_n
//! forbidden = block_1   ∨ … ∨ block_n
//! accepted  = ∧ over units with a non-trivial waitFor of (request_i ∨ waitFor_i)
//! goal      = enabled ∧ ¬forbidden ∧ accepted
//! ```
//!
//! `accepted` only ever removes assignments.  If `enabled` alone has no
//! solution the round is quiescent; otherwise an unsatisfiable `goal` is a
//! deadlock.
//!
//! Among the solutions of `goal` the strategy picks the one that grants the
//! most individual requests, so one unit asking for "anything" does not
//! crowd out a peer asking for something specific.  Remaining ties go to the
//! lexicographically smallest assignment.

use bp_core::{Event, Expr, Formula, Statement, Vocabulary};

use crate::{EventSelectionStrategy, SelectError, SelectResult, Selection, Solver};

pub struct SymbolicStrategy {
    vocabulary: Vocabulary,
}

impl SymbolicStrategy {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Declarations may only change between rounds; the program holds the
    /// strategy exclusively while a round runs.
    pub fn vocabulary_mut(&mut self) -> &mut Vocabulary {
        &mut self.vocabulary
    }

    /// The three round-level constraints `(enabled, forbidden, accepted)`.
    pub fn constraints(statements: &[&Statement]) -> SelectResult<(Expr, Expr, Expr)> {
        let mut requests = Vec::new();
        let mut blocks = Vec::new();
        let mut accepts = Vec::new();
        for s in statements {
            let request = s.request.as_ref().map(|f| expr("request", f)).transpose()?;
            if let Some(r) = request {
                requests.push(r.clone());
            }
            if let Some(b) = &s.block {
                blocks.push(expr("block", b)?.clone());
            }
            if let Some(w) = &s.wait_for {
                let w = expr("waitFor", w)?;
                if !w.is_true() {
                    accepts.push(match request {
                        Some(r) => r.clone().or(w.clone()),
                        None => w.clone(),
                    });
                }
            }
        }
        Ok((Expr::any(requests), Expr::any(blocks), Expr::all(accepts)))
    }
}

fn expr<'a>(role: &'static str, formula: &'a Formula) -> SelectResult<&'a Expr> {
    formula.as_expr().ok_or_else(|| SelectError::Malformed {
        role,
        reason: format!("event set `{formula}` needs the enumerative strategy"),
    })
}

impl EventSelectionStrategy for SymbolicStrategy {
    fn name(&self) -> &'static str {
        "symbolic"
    }

    fn validate(&self, statement: &Statement) -> SelectResult<()> {
        for (role, formula) in statement.roles() {
            let e = expr(role, formula)?;
            self.vocabulary
                .validate(e)
                .map_err(|source| SelectError::Undeclared { role, source })?;
        }
        Ok(())
    }

    fn select(&mut self, statements: &[&Statement]) -> SelectResult<Selection> {
        let (enabled, forbidden, accepted) = Self::constraints(statements)?;
        let solver = Solver::new(&self.vocabulary);
        if !solver.is_satisfiable(&enabled) {
            return Ok(Selection::Quiescent);
        }
        let goal = Expr::all([enabled, !forbidden, accepted]);
        let wanted: Vec<Expr> = statements
            .iter()
            .filter_map(|s| s.request.as_ref().and_then(Formula::as_expr))
            .filter(|e| !e.is_true())
            .cloned()
            .collect();
        Ok(match solver.solve_best(&goal, &wanted) {
            Some(assignment) => Selection::Event(Event::joint(assignment)),
            None => {
                tracing::debug!(units = statements.len(), "symbolic constraints unsatisfiable");
                Selection::Deadlocked
            }
        })
    }
}
